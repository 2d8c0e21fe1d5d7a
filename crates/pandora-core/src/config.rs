//! Configuration management for Pandora services.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (PANDORA__ prefix, `__` separator)
//! 2. Config file (pandora.toml, prefix configurable)
//! 3. Defaults

use serde::Deserialize;

use crate::error::PandoraError;

/// Top-level Pandora configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PandoraConfig {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub auth: AuthSettings,
}

/// Connection settings for the Neo4j graph database.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,

    /// Upper bound for a single store call in seconds. Zero disables the limit.
    #[serde(default)]
    pub query_timeout_secs: u64,
}

/// Settings for the user store itself.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Node label carried by every user node.
    #[serde(default = "default_user_label")]
    pub user_label: String,

    /// Role value that grants admin rights.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,

    /// Recorded as `created_by` on nodes created by the store.
    #[serde(default = "default_created_by")]
    pub created_by: String,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "pandora-dev".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_user_label() -> String {
    "User".to_string()
}

fn default_admin_role() -> String {
    "admin".to_string()
}

fn default_created_by() -> String {
    "system".to_string()
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
            query_timeout_secs: 0,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            user_label: default_user_label(),
            admin_role: default_admin_role(),
            created_by: default_created_by(),
        }
    }
}

impl AuthSettings {
    /// Reject labels that cannot be safely interpolated into Cypher.
    pub fn validate(&self) -> Result<(), PandoraError> {
        let label = &self.user_label;
        let valid = label
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(PandoraError::Invalid(format!(
                "auth.user_label must be an identifier, got {label:?}"
            )));
        }
        Ok(())
    }
}

impl PandoraConfig {
    /// Load configuration from `{file_prefix}.toml` (optional) and `PANDORA__*`
    /// environment variables.
    pub fn load(file_prefix: &str) -> Result<Self, PandoraError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("PANDORA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: PandoraConfig = cfg.try_deserialize()?;
        loaded.auth.validate()?;

        tracing::debug!(
            uri = %loaded.neo4j.uri,
            user_label = %loaded.auth.user_label,
            "Loaded configuration"
        );
        Ok(loaded)
    }
}
