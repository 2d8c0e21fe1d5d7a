//! Write operations for user nodes.
//!
//! New nodes get a fresh `uid` plus `created_at`/`created_by` audit
//! properties. Properties are written in insertion order.

use chrono::Utc;
use neo4rs::{query, Query};
use uuid::Uuid;

use pandora_core::CreateUserData;

use crate::client::{GraphClient, GraphError};

/// Properties reserved for bookkeeping; callers cannot set them.
const RESERVED: &[&str] = &["uid", "created_at", "created_by"];

/// An ordered set of string properties for a new node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFields(Vec<(String, String)>);

impl NodeFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value in place so the order is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the CREATE statement for a node labelled `label`.
    ///
    /// Property keys become parameter names prefixed with `p_`, so keys must
    /// be identifiers; reserved and non-identifier keys are rejected.
    pub fn create_cypher(&self, label: &str) -> Result<String, GraphError> {
        let mut assignments = vec![
            "n.uid = $uid".to_string(),
            "n.created_at = $created_at".to_string(),
            "n.created_by = $created_by".to_string(),
        ];
        for key in self.keys() {
            if RESERVED.contains(&key) || !is_identifier(key) {
                return Err(GraphError::Serialization(format!(
                    "Invalid property name for {label} node: {key:?}"
                )));
            }
            assignments.push(format!("n.{key} = $p_{key}"));
        }

        Ok(format!("CREATE (n:{label}) SET {}", assignments.join(", ")))
    }

    /// Parameters for [`create_cypher`](Self::create_cypher), audit values first.
    pub fn create_params(&self, uid: &str, created_by: &str) -> Vec<(String, String)> {
        let mut params = vec![
            ("uid".to_string(), uid.to_string()),
            ("created_at".to_string(), Utc::now().to_rfc3339()),
            ("created_by".to_string(), created_by.to_string()),
        ];
        params.extend(
            self.0
                .iter()
                .map(|(key, value)| (format!("p_{key}"), value.clone())),
        );
        params
    }

    /// Build the parameterized CREATE query.
    pub fn create_query(
        &self,
        label: &str,
        uid: &str,
        created_by: &str,
    ) -> Result<Query, GraphError> {
        let cypher = self.create_cypher(label)?;
        let q = self
            .create_params(uid, created_by)
            .into_iter()
            .fold(query(&cypher), |q, (name, value)| q.param(&name, value));
        Ok(q)
    }
}

impl From<&CreateUserData> for NodeFields {
    fn from(data: &CreateUserData) -> Self {
        let mut fields = NodeFields::new();
        for (key, value) in data.ordered_fields() {
            fields.insert(key, value);
        }
        fields
    }
}

impl GraphClient {
    /// Create a node labelled `label` with the given fields in a committed
    /// transaction. Returns the generated uid.
    pub async fn create_node(
        &self,
        label: &str,
        fields: &NodeFields,
        created_by: &str,
    ) -> Result<String, GraphError> {
        let uid = Uuid::new_v4().to_string();
        let q = fields.create_query(label, &uid, created_by)?;

        self.write_all(vec![q]).await.map_err(|e| {
            tracing::error!(error = %e, label, "Node creation failed");
            e
        })?;

        tracing::info!(uid = %uid, label, "Created node");
        Ok(uid)
    }
}

fn is_identifier(key: &str) -> bool {
    key.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
