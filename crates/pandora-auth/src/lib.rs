//! pandora-auth: Graph-backed user store for the authentication layer.
//!
//! [`UserStore`] implements the [`AuthUserStore`] contract (validate
//! credentials, find by email, find by id, create) on top of a
//! [`UserBackend`]. The Neo4j backend opens a fresh client per call and
//! leaves password comparison to the database.

pub mod backend;
pub mod error;
pub mod store;

pub use backend::{Neo4jBackend, UserBackend};
pub use error::{AuthError, Result};
pub use store::{AuthUserStore, UserStore};
