//! Pandora Graph — Neo4j client for user accounts.
//!
//! All user reads and writes flow through this crate so that the user
//! label and the query parameters are applied consistently. User-supplied
//! values are always bound as query parameters, never interpolated.

pub mod client;
pub mod mutations;
pub mod queries;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use mutations::NodeFields;
pub use queries::{UserLookup, UserRow};
