//! pandora-core: Shared user types, configuration, and error handling for Pandora.
//!
//! This crate provides the foundational types used by the user store:
//! - User types returned to and accepted from the authentication layer
//! - Layered configuration (file + environment)
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use crate::config::{AuthSettings, Neo4jSettings, PandoraConfig};
pub use error::PandoraError;
pub use types::{Claims, CreateUserData, UserData, UserInfo};
