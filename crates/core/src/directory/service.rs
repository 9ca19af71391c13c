//! Directory service - user and group management over repository ports.

use std::sync::Arc;

use openslot_domain::{OpenSlotError, Result};
use tracing::info;

use super::ports::{GroupRepository, UserRepository};

/// Directory service
pub struct DirectoryService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl DirectoryService {
    /// Create a new directory service.
    pub fn new(users: Arc<dyn UserRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { users, groups }
    }

    /// Link a user to a group, registering both as needed.
    pub async fn add_user_to_group(&self, user_email: &str, group_name: &str) -> Result<()> {
        let email = normalize_email(user_email)?;
        let group = group_name.trim();
        if group.is_empty() {
            return Err(OpenSlotError::InvalidInput("group name must not be empty".to_string()));
        }

        // Membership rows reference the users table, so the user row must
        // exist before the link is written.
        self.users.add_user(&email).await?;
        self.groups.add_user_to_group(&email, group).await?;

        info!(user_email = %email, group_name = %group, "user linked to group");
        Ok(())
    }

    /// List all registered user emails.
    pub async fn list_users(&self) -> Result<Vec<String>> {
        self.users.list_users().await
    }

    /// List all group names.
    pub async fn list_groups(&self) -> Result<Vec<String>> {
        self.groups.list_groups().await
    }
}

fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(OpenSlotError::InvalidInput(format!("invalid user email: {raw:?}")));
    }
    Ok(email.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct InMemoryDirectory {
        users: Mutex<Vec<String>>,
        groups: Mutex<Vec<String>>,
        memberships: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl UserRepository for InMemoryDirectory {
        async fn add_user(&self, email: &str) -> Result<()> {
            let mut users = self.users.lock().unwrap();
            if !users.iter().any(|u| u == email) {
                users.push(email.to_string());
            }
            Ok(())
        }

        async fn list_users(&self) -> Result<Vec<String>> {
            Ok(self.users.lock().unwrap().clone())
        }
    }

    #[async_trait]
    impl GroupRepository for InMemoryDirectory {
        async fn add_user_to_group(&self, user_email: &str, group_name: &str) -> Result<()> {
            let mut groups = self.groups.lock().unwrap();
            if !groups.iter().any(|g| g == group_name) {
                groups.push(group_name.to_string());
            }
            let mut memberships = self.memberships.lock().unwrap();
            let link = (user_email.to_string(), group_name.to_string());
            if !memberships.contains(&link) {
                memberships.push(link);
            }
            Ok(())
        }

        async fn list_groups(&self) -> Result<Vec<String>> {
            Ok(self.groups.lock().unwrap().clone())
        }
    }

    fn service() -> (DirectoryService, Arc<InMemoryDirectory>) {
        let store = Arc::new(InMemoryDirectory::default());
        (DirectoryService::new(store.clone(), store.clone()), store)
    }

    #[tokio::test]
    async fn linking_registers_user_and_group() {
        let (svc, store) = service();

        svc.add_user_to_group("ada@example.com", "compilers").await.unwrap();

        assert_eq!(svc.list_users().await.unwrap(), ["ada@example.com"]);
        assert_eq!(svc.list_groups().await.unwrap(), ["compilers"]);
        assert_eq!(store.memberships.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn relinking_is_a_no_op() {
        let (svc, store) = service();

        svc.add_user_to_group("ada@example.com", "compilers").await.unwrap();
        svc.add_user_to_group("ada@example.com", "compilers").await.unwrap();

        assert_eq!(store.memberships.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn email_and_group_are_validated() {
        let (svc, _) = service();

        assert!(svc.add_user_to_group("not-an-email", "compilers").await.is_err());
        assert!(svc.add_user_to_group("ada@example.com", "  ").await.is_err());
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_trimmed() {
        let (svc, _) = service();

        svc.add_user_to_group("  ada@example.com ", " compilers ").await.unwrap();

        assert_eq!(svc.list_users().await.unwrap(), ["ada@example.com"]);
        assert_eq!(svc.list_groups().await.unwrap(), ["compilers"]);
    }
}
