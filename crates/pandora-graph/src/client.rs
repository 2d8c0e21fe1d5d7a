//! Neo4j connection management and shared graph client.

use std::future::Future;
use std::time::Duration;

use neo4rs::{ConfigBuilder, Graph, Query, Row};

use pandora_core::Neo4jSettings;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Graph call exceeded {seconds}s limit")]
    Timeout { seconds: u64 },
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
    /// Bounds each connect and each query. `None` waits indefinitely.
    pub query_timeout: Option<Duration>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GraphConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
            query_timeout: (settings.query_timeout_secs > 0)
                .then(|| Duration::from_secs(settings.query_timeout_secs)),
        }
    }
}

/// Neo4j graph client with connection pooling.
///
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    query_timeout: Option<Duration>,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = bounded(config.query_timeout, async {
            Graph::connect(neo_config)
                .await
                .map_err(|e| GraphError::Connection(e.to_string()))
        })
        .await?;

        tracing::debug!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self {
            graph,
            query_timeout: config.query_timeout,
        })
    }

    /// Execute a write-only query outside an explicit transaction.
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        bounded(self.query_timeout, async {
            self.graph.run(query).await.map_err(GraphError::from)
        })
        .await
    }

    /// Execute a read query inside a transaction, collect all rows, and
    /// discard the transaction.
    pub async fn read_rows(&self, query: Query) -> Result<Vec<Row>, GraphError> {
        bounded(self.query_timeout, self.read_rows_in_txn(query)).await
    }

    /// Execute write queries inside one transaction and commit it.
    pub async fn write_all(&self, queries: Vec<Query>) -> Result<(), GraphError> {
        bounded(self.query_timeout, self.write_all_in_txn(queries)).await
    }

    async fn read_rows_in_txn(&self, query: Query) -> Result<Vec<Row>, GraphError> {
        let mut txn = self.graph.start_txn().await?;
        let mut stream = txn.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next(txn.handle()).await? {
            rows.push(row);
        }
        txn.rollback().await?;
        Ok(rows)
    }

    async fn write_all_in_txn(&self, queries: Vec<Query>) -> Result<(), GraphError> {
        let mut txn = self.graph.start_txn().await?;
        for query in queries {
            txn.run(query).await?;
        }
        txn.commit().await?;
        Ok(())
    }
}

/// Run `fut` under the optional time limit.
async fn bounded<T, F>(limit: Option<Duration>, fut: F) -> Result<T, GraphError>
where
    F: Future<Output = Result<T, GraphError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| GraphError::Timeout {
                seconds: limit.as_secs(),
            })?,
        None => fut.await,
    }
}
