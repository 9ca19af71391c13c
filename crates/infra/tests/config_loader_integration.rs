//! Integration tests for the configuration loader.

use openslot_infra::config::load_from_file;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("config file should be written");
    path
}

#[test]
fn loads_toml_config_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "openslot.toml",
        r#"
[database]
path = "/tmp/openslot.db"

[google]
client_id = "client-123"
client_secret = "secret"
redirect_uri = "http://localhost:8080/oauth2callback"
"#,
    );

    let config = load_from_file(Some(&path)).unwrap();

    assert_eq!(config.database.path, "/tmp/openslot.db");
    assert_eq!(config.database.pool_size, 4);
    assert_eq!(config.http.bind_addr, "0.0.0.0:8080");
    assert_eq!(config.availability.day_start_hour, 9);
    assert_eq!(config.availability.day_end_hour, 17);
    assert_eq!(config.availability.min_gap_minutes, 30);
    assert_eq!(config.availability.horizon_days, 7);
}

#[test]
fn loads_json_config_with_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "config.json",
        r#"{
            "database": { "path": "/tmp/openslot.db", "pool_size": 8 },
            "http": { "bind_addr": "127.0.0.1:9090" },
            "google": {
                "client_id": "client-123",
                "client_secret": "secret",
                "redirect_uri": "http://localhost:9090/oauth2callback"
            },
            "availability": {
                "day_start_hour": 8,
                "day_end_hour": 18,
                "min_gap_minutes": 15,
                "horizon_days": 5
            }
        }"#,
    );

    let config = load_from_file(Some(&path)).unwrap();

    assert_eq!(config.database.pool_size, 8);
    assert_eq!(config.http.bind_addr, "127.0.0.1:9090");
    assert_eq!(config.availability.day_start_hour, 8);
    assert_eq!(config.availability.horizon_days, 5);
}

#[test]
fn invalid_working_hours_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "openslot.toml",
        r#"
[database]
path = "/tmp/openslot.db"

[google]
client_id = "client-123"
client_secret = "secret"
redirect_uri = "http://localhost:8080/oauth2callback"

[availability]
day_start_hour = 17
day_end_hour = 9
min_gap_minutes = 30
horizon_days = 7
"#,
    );

    assert!(load_from_file(Some(&path)).is_err());
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    assert!(load_from_file(Some(&path)).is_err());
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.yaml", "database:\n  path: /tmp/openslot.db\n");

    assert!(load_from_file(Some(&path)).is_err());
}
