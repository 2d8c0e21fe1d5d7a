//! User types exchanged with the authentication layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Authenticated User ────────────────────────────────────────────

/// Extra claims attached to an authenticated user (e.g. for token issuing).
pub type Claims = BTreeMap<String, serde_json::Value>;

/// A user as handed back to the authentication layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub admin: bool,
    pub claims: Claims,
}

impl UserInfo {
    /// Build a user, deriving `admin` and the `email`/`role` claims from `role`.
    pub fn new(id: String, name: String, email: String, role: &str, admin_role: &str) -> Self {
        let mut claims = Claims::new();
        claims.insert("email".to_string(), serde_json::Value::String(email.clone()));
        claims.insert("role".to_string(), serde_json::Value::String(role.to_string()));

        Self {
            id,
            name,
            email,
            admin: role == admin_role,
            claims,
        }
    }

    /// The role claim, empty if the user has none.
    pub fn role(&self) -> &str {
        self.claims
            .get("role")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

// ── Account Creation ──────────────────────────────────────────────

/// Account data supplied by the authentication layer (e.g. from an OAuth
/// provider profile) when a new user signs up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserData {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    /// Accepted but not stored: login uniqueness is not enforced yet.
    pub nickname: String,
    pub email: String,
    pub avatar: String,
    pub location: String,
}

/// The flat set of properties written to a new user node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserData {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: String,
    pub location: String,
}

impl From<&UserData> for CreateUserData {
    fn from(account: &UserData) -> Self {
        Self {
            name: account.name.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            avatar: account.avatar.clone(),
            location: account.location.clone(),
        }
    }
}

impl CreateUserData {
    /// Property names and values in submission order.
    pub fn ordered_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("name", self.name.as_str()),
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("email", self.email.as_str()),
            ("avatar", self.avatar.as_str()),
            ("location", self.location.as_str()),
        ]
    }
}
