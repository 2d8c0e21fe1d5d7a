//! Storage seam between the user store and the graph database.

use async_trait::async_trait;

use pandora_core::{AuthSettings, PandoraConfig, PandoraError};
use pandora_graph::{GraphClient, GraphConfig, GraphError, NodeFields, UserLookup, UserRow};

/// Where user rows come from.
#[async_trait]
pub trait UserBackend: Send + Sync {
    /// Run a lookup and return every matching row, in database order.
    async fn fetch_users(&self, lookup: &UserLookup) -> Result<Vec<UserRow>, GraphError>;

    /// Persist a new user node and return its uid.
    async fn create_user_node(&self, fields: &NodeFields) -> Result<String, GraphError>;
}

/// Neo4j-backed user storage.
///
/// Every call connects with a fresh [`GraphClient`] and drops it on return;
/// nothing is shared between calls.
#[derive(Debug, Clone)]
pub struct Neo4jBackend {
    graph: GraphConfig,
    user_label: String,
    created_by: String,
}

impl Neo4jBackend {
    pub fn new(graph: GraphConfig, auth: &AuthSettings) -> Result<Self, PandoraError> {
        auth.validate()?;
        Ok(Self {
            graph,
            user_label: auth.user_label.clone(),
            created_by: auth.created_by.clone(),
        })
    }

    pub fn from_config(config: &PandoraConfig) -> Result<Self, PandoraError> {
        Self::new(GraphConfig::from(&config.neo4j), &config.auth)
    }

    pub fn user_label(&self) -> &str {
        &self.user_label
    }

    async fn connect(&self) -> Result<GraphClient, GraphError> {
        GraphClient::connect(&self.graph).await.map_err(|e| {
            tracing::error!(error = %e, uri = %self.graph.uri, "Neo4j connect failed");
            e
        })
    }
}

#[async_trait]
impl UserBackend for Neo4jBackend {
    async fn fetch_users(&self, lookup: &UserLookup) -> Result<Vec<UserRow>, GraphError> {
        let client = self.connect().await?;
        client.find_users(&self.user_label, lookup).await
    }

    async fn create_user_node(&self, fields: &NodeFields) -> Result<String, GraphError> {
        let client = self.connect().await?;
        client
            .create_node(&self.user_label, fields, &self.created_by)
            .await
    }
}
