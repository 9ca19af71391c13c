//! Application context (dependency injection).

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use openslot_core::{
    AvailabilityService, CalendarPort, DirectoryService, MeetingScheduler, TokenRepository,
};
use openslot_domain::{Config, OpenSlotError, Result};
use openslot_infra::{
    DbManager, GoogleCalendarClient, GoogleOAuthFlow, SqliteGroupRepository,
    SqliteTokenRepository, SqliteUserRepository,
};
use tracing::{info, warn};

const MAX_CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// Shared application state wiring services to their adapters.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub tokens: Arc<dyn TokenRepository>,
    pub availability: AvailabilityService,
    pub directory: DirectoryService,
    pub scheduler: MeetingScheduler,
    pub oauth: GoogleOAuthFlow,
    pending_states: Mutex<HashSet<String>>,
}

impl AppContext {
    /// Connect to the database (with retry), run migrations, and wire the
    /// real Google adapters.
    pub async fn initialize(config: Config) -> Result<Self> {
        let db = connect_with_retry(&config).await?;
        db.run_migrations()?;
        Self::with_calendar(config, db, Arc::new(GoogleCalendarClient::new()))
    }

    /// Wire the context around an arbitrary calendar port (used by tests).
    pub fn with_calendar(
        config: Config,
        db: Arc<DbManager>,
        calendar: Arc<dyn CalendarPort>,
    ) -> Result<Self> {
        let policy = config.availability.policy();
        policy.validate()?;

        let tokens: Arc<dyn TokenRepository> = Arc::new(SqliteTokenRepository::new(db.clone()));
        let users = Arc::new(SqliteUserRepository::new(db.clone()));
        let groups = Arc::new(SqliteGroupRepository::new(db.clone()));

        Ok(Self {
            availability: AvailabilityService::new(tokens.clone(), calendar, policy),
            directory: DirectoryService::new(users, groups),
            scheduler: MeetingScheduler::new(config.scheduling.meeting_link_base.clone()),
            oauth: GoogleOAuthFlow::new(config.google.clone()),
            tokens,
            db,
            config,
            pending_states: Mutex::new(HashSet::new()),
        })
    }

    /// Remember an issued OAuth state for callback validation.
    pub fn register_oauth_state(&self, state: String) {
        if let Ok(mut guard) = self.pending_states.lock() {
            guard.insert(state);
        }
    }

    /// Consume a pending OAuth state. Returns false for unknown states.
    pub fn take_oauth_state(&self, state: &str) -> bool {
        self.pending_states.lock().map(|mut guard| guard.remove(state)).unwrap_or(false)
    }

    /// Refresh the stored credential when it has expired.
    pub async fn ensure_fresh_token(&self, user_email: &str) -> Result<()> {
        let tokens = self.tokens.get(user_email).await?;
        if !tokens.is_expired() {
            return Ok(());
        }

        let Some(refresh_token) = tokens.refresh_token.as_deref() else {
            return Err(OpenSlotError::Auth(
                "credential expired and no refresh token is stored".to_string(),
            ));
        };

        info!(user_email, "refreshing expired access token");
        let refreshed = self.oauth.refresh_access_token(refresh_token).await?;
        self.tokens.put(user_email, &refreshed).await
    }
}

/// Open the database, backing off while the file system or volume is not
/// ready yet.
async fn connect_with_retry(config: &Config) -> Result<Arc<DbManager>> {
    let mut attempts: u32 = 0;
    loop {
        let opened = DbManager::new(&config.database.path, config.database.pool_size)
            .and_then(|db| {
                db.health_check()?;
                Ok(db)
            });

        match opened {
            Ok(db) => {
                info!("Connected to the database");
                return Ok(Arc::new(db));
            }
            Err(err) if attempts + 1 < MAX_CONNECT_ATTEMPTS => {
                attempts += 1;
                warn!(error = %err, attempts, "database not ready, backing off");
                tokio::time::sleep(CONNECT_BACKOFF).await;
            }
            Err(err) => return Err(err),
        }
    }
}
