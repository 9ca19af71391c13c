//! SQLite-backed implementation of the GroupRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use openslot_core::GroupRepository;
use openslot_domain::Result;
use rusqlite::params;
use tracing::instrument;

use super::manager::DbManager;
use crate::errors::map_sql_error;

/// SQLite implementation of GroupRepository
pub struct SqliteGroupRepository {
    db: Arc<DbManager>,
}

impl SqliteGroupRepository {
    /// Create a new group repository.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GroupRepository for SqliteGroupRepository {
    #[instrument(skip(self))]
    async fn add_user_to_group(&self, user_email: &str, group_name: &str) -> Result<()> {
        let mut conn = self.db.get_connection()?;

        // Group creation and membership link commit together.
        let tx = conn.transaction().map_err(map_sql_error)?;
        tx.execute("INSERT OR IGNORE INTO groups (name) VALUES (?1)", params![group_name])
            .map_err(map_sql_error)?;
        tx.execute(
            "INSERT OR IGNORE INTO user_groups (user_email, group_name) VALUES (?1, ?2)",
            params![user_email, group_name],
        )
        .map_err(map_sql_error)?;
        tx.commit().map_err(map_sql_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_groups(&self) -> Result<Vec<String>> {
        let conn = self.db.get_connection()?;
        let mut stmt =
            conn.prepare("SELECT name FROM groups ORDER BY name").map_err(map_sql_error)?;
        let groups = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(map_sql_error)?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(map_sql_error)?;
        Ok(groups)
    }
}
