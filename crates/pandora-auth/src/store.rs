//! The user store behind the authentication layer.

use async_trait::async_trait;

use pandora_core::{CreateUserData, PandoraConfig, PandoraError, UserData, UserInfo};
use pandora_graph::{NodeFields, UserLookup, UserRow};

use crate::backend::{Neo4jBackend, UserBackend};
use crate::error::{AuthError, Result};

/// The user store contract the authentication layer programs against.
#[async_trait]
pub trait AuthUserStore: Send + Sync {
    /// Find the user matching `username` (email, login or phone) and check
    /// `password` against the stored hash.
    async fn validate_credentials(&self, username: &str, password: &str) -> Result<UserInfo>;

    async fn find_user_by_email(&self, email: &str) -> Result<UserInfo>;

    async fn find_user_by_id(&self, user_id: &str) -> Result<UserInfo>;

    /// Create a user from an external account profile and return it as
    /// stored.
    async fn create_user(&self, account: &UserData) -> Result<UserInfo>;

    /// Release held resources.
    fn close(&self) {}
}

/// Graph-backed [`AuthUserStore`].
pub struct UserStore<B = Neo4jBackend> {
    backend: B,
    admin_role: String,
}

impl UserStore<Neo4jBackend> {
    /// Build a Neo4j-backed store from loaded configuration.
    pub fn from_config(config: &PandoraConfig) -> std::result::Result<Self, PandoraError> {
        let backend = Neo4jBackend::from_config(config)?;
        Ok(Self::new(backend).with_admin_role(&config.auth.admin_role))
    }
}

impl<B: UserBackend> UserStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            admin_role: "admin".to_string(),
        }
    }

    /// Role value that marks a user as admin.
    pub fn with_admin_role(mut self, role: &str) -> Self {
        self.admin_role = role.to_string();
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run `lookup` and map the first match to a [`UserInfo`].
    ///
    /// A password flag that is present and false fails the lookup; a missing
    /// flag does not.
    pub async fn find_user(&self, lookup: &UserLookup) -> Result<UserInfo> {
        let rows = self.backend.fetch_users(lookup).await?;

        let Some(row) = rows.into_iter().next() else {
            tracing::debug!(key = %lookup.key(), "User not found");
            return Err(AuthError::NotFound {
                key: lookup.key().to_string(),
            });
        };

        if lookup.checks_password() && row.checkpwd == Some(false) {
            tracing::debug!(key = %lookup.key(), "Password check failed");
            return Err(AuthError::WrongPassword {
                key: lookup.key().to_string(),
            });
        }

        Ok(self.to_user_info(row))
    }

    fn to_user_info(&self, row: UserRow) -> UserInfo {
        let role = row.role.unwrap_or_default();
        UserInfo::new(
            row.uid,
            row.name.unwrap_or_default(),
            row.email.unwrap_or_default(),
            &role,
            &self.admin_role,
        )
    }
}

#[async_trait]
impl<B: UserBackend> AuthUserStore for UserStore<B> {
    async fn validate_credentials(&self, username: &str, password: &str) -> Result<UserInfo> {
        self.find_user(&UserLookup::Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<UserInfo> {
        self.find_user(&UserLookup::Email(email.to_string())).await
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<UserInfo> {
        self.find_user(&UserLookup::Id(user_id.to_string())).await
    }

    async fn create_user(&self, account: &UserData) -> Result<UserInfo> {
        // TODO store account.nickname as `login` once logins are kept unique
        let data = CreateUserData::from(account);
        if data.email.is_empty() {
            return Err(AuthError::MissingEmail);
        }

        let fields = NodeFields::from(&data);
        let uid = self.backend.create_user_node(&fields).await?;
        tracing::info!(uid = %uid, email = %data.email, "Created user");

        self.find_user_by_email(&data.email).await
    }
}
