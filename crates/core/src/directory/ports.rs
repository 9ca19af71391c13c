//! Directory port interfaces

use async_trait::async_trait;
use openslot_domain::Result;

/// Trait for user persistence operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Register a user. Registering an existing user is a no-op.
    async fn add_user(&self, email: &str) -> Result<()>;

    /// List all registered user emails.
    async fn list_users(&self) -> Result<Vec<String>>;
}

/// Trait for group persistence operations.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Link a user to a group, creating the group if needed. Re-linking an
    /// existing membership is a no-op.
    async fn add_user_to_group(&self, user_email: &str, group_name: &str) -> Result<()>;

    /// List all group names.
    async fn list_groups(&self) -> Result<Vec<String>>;
}
