use calcache::cache::ExpiryPolicy;
use calcache::config::Config;
use chrono::Duration;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all CALCACHE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("CALCACHE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    let config = Config::try_load_from_path(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
cache_dir = "/srv/scanner-cache"
expiration_minutes = 15
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&path);
    assert_eq!(config.cache_dir, Some(PathBuf::from("/srv/scanner-cache")));
    assert_eq!(config.expiration_minutes, 15);
    assert_eq!(
        config.expiry_policy().max_age(),
        Some(Duration::minutes(15))
    );
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "expiration_minutes = 15\n").unwrap();

    std::env::set_var("CALCACHE_EXPIRATION_MINUTES", "0");
    let config = Config::load_from_path(&path);
    clear_env();

    assert_eq!(config.expiration_minutes, 0);
    assert_eq!(config.expiry_policy(), ExpiryPolicy::never());
}

#[test]
fn test_invalid_toml_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "expiration_minutes = \"soon\"\n").unwrap();

    assert!(Config::try_load_from_path(&path).is_err());
    assert_eq!(Config::load_from_path(&path), Config::default());
}

#[test]
fn test_save_then_load() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = Config {
        cache_dir: Some(dir.path().join("stores")),
        expiration_minutes: 90,
    };

    config.save(&path).unwrap();
    assert_eq!(Config::try_load_from_path(&path).unwrap(), config);
}
