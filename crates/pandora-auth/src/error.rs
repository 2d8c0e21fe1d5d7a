//! Error types for the pandora-auth crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("user not found by {key}")]
    NotFound { key: String },

    #[error("wrong password: {key}")]
    WrongPassword { key: String },

    #[error("cannot create a user without an email")]
    MissingEmail,

    #[error(transparent)]
    Store(#[from] pandora_graph::GraphError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
