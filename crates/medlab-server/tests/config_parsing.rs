use std::{env, fs};

use medlab_auth::PasswordEncoding;
use medlab_server::StorageBackend;
use medlab_server::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    // Create a temporary TOML configuration file
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("medlab.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
body_limit_bytes = 1024

[storage]
backend = "memory"

[storage.postgres]
host = "db"
port = 5433
database = "clinic"
user = "test"
password = "test"
pool_size = 4
min_connections = 1
max_lifetime_secs = 120

[logging]
level = "debug"

[security]
enabled = true
realm = "clinic"
password_encoder = "noop"

[bootstrap]
seed_patients = false
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.server.body_limit_bytes, 1024);
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.storage.postgres.pool_size, 4);
    let pool = cfg.storage.postgres.to_postgres_config();
    assert_eq!(pool.min_connections, Some(1));
    assert_eq!(pool.max_lifetime.as_secs(), 120);
    assert_eq!(
        cfg.storage.postgres.connection_url(),
        "postgres://test:test@db:5433/clinic"
    );
    assert_eq!(cfg.logging.level.to_ascii_lowercase(), "debug");
    assert_eq!(cfg.security.realm, "clinic");
    assert_eq!(cfg.security.password_encoder, PasswordEncoding::Noop);
    assert!(!cfg.bootstrap.seed_patients);

    // 2) Env override should win over file
    unsafe {
        env::set_var("MEDLAB__SERVER__PORT", "9091");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.server.port, 9091);
    // cleanup env var
    unsafe {
        env::remove_var("MEDLAB__SERVER__PORT");
    }

    // 3) Invalid config (unknown log level) should error
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[storage]
backend = "memory"

[logging]
level = "chatty"
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("logging.level must be one of"));

    // 4) Postgres without a pool should error
    let no_pool_path = dir.path().join("no_pool.toml");
    let no_pool_toml = r#"
[storage.postgres]
url = "postgres://localhost/medlab"
pool_size = 0
"#;
    fs::write(&no_pool_path, no_pool_toml).expect("write no-pool toml");
    let err = load_config(no_pool_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("pool_size must be > 0"));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.toml");

    let cfg = load_config(path.to_str()).expect("defaults should be valid");
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.storage.backend, StorageBackend::Postgres);
    assert!(cfg.security.enabled);
    assert!(cfg.bootstrap.seed_patients);
}
