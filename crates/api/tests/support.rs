use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use openslot_api::AppContext;
use openslot_core::CalendarPort;
use openslot_domain::{
    AvailabilityConfig, BusyInterval, Config, DatabaseConfig, GoogleConfig, Horizon, HttpConfig,
    Result, SchedulingConfig, TokenSet,
};
use openslot_infra::DbManager;
use tempfile::TempDir;

/// Calendar stub: one 10:00-11:00 meeting on the first full day of the
/// horizon, deterministic regardless of when the test runs.
pub struct StubCalendar;

#[async_trait]
impl CalendarPort for StubCalendar {
    async fn list_busy_intervals(
        &self,
        _access_token: &str,
        horizon: &Horizon,
    ) -> Result<Vec<BusyInterval>> {
        let day = horizon.from.date_naive() + Duration::days(1);
        let start = day.and_hms_opt(10, 0, 0).expect("valid wall clock").and_utc();
        Ok(vec![BusyInterval::timed(start, start + Duration::hours(1))])
    }
}

/// Application context over a temporary database and the stub calendar.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    _temp_dir: TempDir,
}

pub async fn test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir should be created");
    let db_path = temp_dir.path().join("api-test.db");

    let db = Arc::new(DbManager::new(&db_path, 2).expect("db manager should be created"));
    db.run_migrations().expect("migrations should succeed");

    let config = Config {
        database: DatabaseConfig { path: db_path.display().to_string(), pool_size: 2 },
        http: HttpConfig::default(),
        google: GoogleConfig {
            client_id: "client-test".to_string(),
            client_secret: "secret-test".to_string(),
            redirect_uri: "http://localhost:8080/oauth2callback".to_string(),
        },
        availability: AvailabilityConfig::default(),
        scheduling: SchedulingConfig::default(),
    };

    let ctx = AppContext::with_calendar(config, db, Arc::new(StubCalendar))
        .expect("context should be wired");

    TestApp { ctx: Arc::new(ctx), _temp_dir: temp_dir }
}

/// Store a non-expired credential for the user, as the OAuth callback would.
pub async fn seed_token(ctx: &AppContext, email: &str) {
    let tokens = TokenSet {
        access_token: "access-test".to_string(),
        refresh_token: Some("refresh-test".to_string()),
        expires_at: Utc::now() + Duration::hours(1),
        id_token: None,
    };
    ctx.tokens.put(email, &tokens).await.expect("token should be stored");
}
