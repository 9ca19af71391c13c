//! SQLite-backed implementation of the UserRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use openslot_core::UserRepository;
use openslot_domain::Result;
use rusqlite::params;
use tracing::instrument;

use super::manager::DbManager;
use crate::errors::map_sql_error;

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

impl SqliteUserRepository {
    /// Create a new user repository.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[instrument(skip(self))]
    async fn add_user(&self, email: &str) -> Result<()> {
        let conn = self.db.get_connection()?;
        conn.execute(
            "INSERT OR IGNORE INTO users (email, created_at) VALUES (?1, ?2)",
            params![email, Utc::now().timestamp()],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<String>> {
        let conn = self.db.get_connection()?;
        let mut stmt =
            conn.prepare("SELECT email FROM users ORDER BY email").map_err(map_sql_error)?;
        let users = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(map_sql_error)?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(map_sql_error)?;
        Ok(users)
    }
}
