//! Read operations and Cypher query builder for user lookups.

use neo4rs::{query, Query};
use serde::Deserialize;

use crate::client::{GraphClient, GraphError};

/// Columns every user lookup returns.
const USER_COLUMNS: &str = "n.uid AS uid, n.name AS name, n.email AS email, n.role AS role";

/// Password comparison evaluated by the database. Null when the node has no
/// stored password.
///
/// The stored `password` must be written with the same unsalted
/// `apoc.util.sha256([plain])` call, or every comparison is false.
const CHECK_PASSWORD: &str = "n.password = apoc.util.sha256([$password]) AS checkpwd";

/// A user row as returned by the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserRow {
    pub uid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Result of the password comparison; only present for credential lookups.
    #[serde(default)]
    pub checkpwd: Option<bool>,
}

/// The ways a user can be looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// Match on email, login or phone and compare the password.
    Credentials { username: String, password: String },
    /// Match on email.
    Email(String),
    /// Match on the user's uid.
    Id(String),
}

impl UserLookup {
    /// The value the lookup is keyed on, for error messages and logs.
    pub fn key(&self) -> &str {
        match self {
            Self::Credentials { username, .. } => username,
            Self::Email(email) => email,
            Self::Id(id) => id,
        }
    }

    /// Whether the lookup asks the database to compare a password.
    pub fn checks_password(&self) -> bool {
        matches!(self, Self::Credentials { .. })
    }

    /// Render the Cypher text for nodes carrying `label`.
    ///
    /// Nodes without a `uid` are never matched.
    ///
    /// `label` must already be validated as an identifier; lookup values are
    /// only ever referenced as parameters.
    pub fn cypher(&self, label: &str) -> String {
        match self {
            // TODO normalize phone numbers before matching on `phone`
            Self::Credentials { .. } => format!(
                "MATCH (n:{label})
                 WHERE n.uid IS NOT NULL
                   AND (n.email = $username OR n.login = $username OR n.phone = $username)
                 RETURN {USER_COLUMNS}, {CHECK_PASSWORD}"
            ),
            Self::Email(_) => format!(
                "MATCH (n:{label})
                 WHERE n.uid IS NOT NULL AND n.email = $id
                 RETURN {USER_COLUMNS}"
            ),
            Self::Id(_) => format!(
                "MATCH (n:{label} {{uid: $id}})
                 RETURN {USER_COLUMNS}"
            ),
        }
    }

    /// Query parameters, by name without the `$`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Credentials { username, password } => vec![
                ("username", username.clone()),
                ("password", password.clone()),
            ],
            Self::Email(value) | Self::Id(value) => vec![("id", value.clone())],
        }
    }

    /// Build the parameterized query.
    pub fn to_query(&self, label: &str) -> Query {
        self.params()
            .into_iter()
            .fold(query(&self.cypher(label)), |q, (name, value)| {
                q.param(name, value)
            })
    }
}

impl GraphClient {
    /// Run a user lookup and decode every matching row.
    pub async fn find_users(
        &self,
        label: &str,
        lookup: &UserLookup,
    ) -> Result<Vec<UserRow>, GraphError> {
        let rows = self.read_rows(lookup.to_query(label)).await.map_err(|e| {
            tracing::error!(error = %e, key = %lookup.key(), "User query failed");
            e
        })?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            let user = row.to::<UserRow>().map_err(|e| {
                tracing::error!(error = %e, key = %lookup.key(), "Failed to decode user row");
                GraphError::Serialization(format!("Failed to deserialize user: {e}"))
            })?;
            users.push(user);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> UserLookup {
        UserLookup::Credentials {
            username: "ann@example.com".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_credentials_query() {
        let lookup = credentials();
        let cypher = lookup.cypher("User");
        assert!(cypher.starts_with("MATCH (n:User)"));
        assert!(cypher.contains("n.email = $username"));
        assert!(cypher.contains("n.login = $username"));
        assert!(cypher.contains("n.phone = $username"));
        assert!(cypher.contains("AS checkpwd"));
        assert!(!cypher.contains("s3cret"));
        assert!(!cypher.contains("ann@example.com"));

        assert_eq!(
            lookup.params(),
            vec![
                ("username", "ann@example.com".to_string()),
                ("password", "s3cret".to_string()),
            ]
        );
        assert!(lookup.checks_password());
        assert_eq!(lookup.key(), "ann@example.com");
    }

    #[test]
    fn test_email_query() {
        let lookup = UserLookup::Email("bob@example.com".to_string());
        let cypher = lookup.cypher("Account");
        assert!(cypher.starts_with("MATCH (n:Account)"));
        assert!(cypher.contains("n.email = $id"));
        assert!(!cypher.contains("checkpwd"));
        assert_eq!(lookup.params(), vec![("id", "bob@example.com".to_string())]);
        assert!(!lookup.checks_password());
    }

    #[test]
    fn test_id_query() {
        let lookup = UserLookup::Id("0b7c".to_string());
        let cypher = lookup.cypher("User");
        assert!(cypher.starts_with("MATCH (n:User {uid: $id})"));
        assert!(cypher.contains("RETURN n.uid AS uid, n.name AS name"));
        assert_eq!(lookup.key(), "0b7c");
    }

    #[test]
    fn test_lookups_skip_nodes_without_uid() {
        assert!(credentials().cypher("User").contains("WHERE n.uid IS NOT NULL"));
        assert!(UserLookup::Email("a@x".to_string())
            .cypher("User")
            .contains("WHERE n.uid IS NOT NULL AND n.email = $id"));
        // Matching on `uid = $id` already excludes missing uids.
        assert!(UserLookup::Id("u1".to_string())
            .cypher("User")
            .contains("{uid: $id}"));

        // Such a row would not decode, failing the lookup for every match.
        let orphan = serde_json::json!({
            "uid": null,
            "name": "Ann",
            "email": "a@x",
            "role": null,
        });
        assert!(serde_json::from_value::<UserRow>(orphan).is_err());
    }

    #[test]
    fn test_user_row_tolerates_missing_fields() {
        let json = serde_json::json!({
            "uid": "u1",
            "name": "Ann",
            "email": null,
        });
        let row: UserRow = serde_json::from_value(json).unwrap();
        assert_eq!(row.uid, "u1");
        assert_eq!(row.name.as_deref(), Some("Ann"));
        assert_eq!(row.email, None);
        assert_eq!(row.role, None);
        assert_eq!(row.checkpwd, None);
    }
}
