//! SQLite-backed implementation of the TokenRepository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openslot_core::TokenRepository;
use openslot_domain::{OpenSlotError, Result, TokenSet};
use rusqlite::{params, OptionalExtension};
use tracing::{debug, instrument};

use super::manager::DbManager;
use crate::errors::map_sql_error;

/// SQLite implementation of TokenRepository
pub struct SqliteTokenRepository {
    db: Arc<DbManager>,
}

impl SqliteTokenRepository {
    /// Create a new token repository.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    #[instrument(skip(self))]
    async fn get(&self, user_email: &str) -> Result<TokenSet> {
        let conn = self.db.get_connection()?;

        let row = conn
            .query_row(
                "SELECT access_token, refresh_token, expires_at, id_token
                 FROM user_tokens WHERE user_email = ?1",
                params![user_email],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(map_sql_error)?;

        let (access_token, refresh_token, expires_at, id_token) = row.ok_or_else(|| {
            OpenSlotError::NotFound(format!(
                "user {user_email} has not authorized calendar access"
            ))
        })?;

        Ok(TokenSet {
            access_token,
            refresh_token,
            expires_at: timestamp_to_datetime(expires_at)?,
            id_token,
        })
    }

    #[instrument(skip(self, tokens))]
    async fn put(&self, user_email: &str, tokens: &TokenSet) -> Result<()> {
        let conn = self.db.get_connection()?;
        let now = Utc::now().timestamp();

        // Authorizing is what registers a user, so ensure the row exists
        // before the token upsert references it.
        conn.execute(
            "INSERT OR IGNORE INTO users (email, created_at) VALUES (?1, ?2)",
            params![user_email, now],
        )
        .map_err(map_sql_error)?;

        // Refresh responses may omit the refresh token and the ID token;
        // keep the previously stored values in that case.
        conn.execute(
            "INSERT INTO user_tokens (
                user_email, access_token, refresh_token, expires_at, id_token, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_email) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = COALESCE(excluded.refresh_token, user_tokens.refresh_token),
                expires_at = excluded.expires_at,
                id_token = COALESCE(excluded.id_token, user_tokens.id_token),
                updated_at = excluded.updated_at",
            params![
                user_email,
                tokens.access_token,
                tokens.refresh_token,
                tokens.expires_at.timestamp(),
                tokens.id_token,
                now
            ],
        )
        .map_err(map_sql_error)?;

        debug!(user_email, "stored calendar credential");
        Ok(())
    }
}

fn timestamp_to_datetime(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| OpenSlotError::Database(format!("invalid expiry timestamp {ts}")))
}
