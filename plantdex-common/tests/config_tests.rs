//! Configuration loading and root folder resolution
//!
//! Tests touching PLANTDEX_ROOT_FOLDER are marked #[serial] so they do not
//! race each other on the process environment.

use plantdex_common::config::{
    database_path, default_root_folder, load_toml_config, resolve_root_folder, TomlConfig,
    ROOT_FOLDER_ENV,
};
use plantdex_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_config_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.toml");

    let config = load_toml_config(&path).unwrap();

    assert!(config.root_folder.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_config_file_is_parsed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/plantdex"

[logging]
level = "debug"
ansi = false
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/plantdex")));
    assert_eq!(config.logging.level, "debug");
    assert!(!config.logging.ansi);
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "root_folder = [not toml").unwrap();

    let result = load_toml_config(&path);

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/plantdex-env");
    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/plantdex-toml")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, &toml_config);
    env::remove_var(ROOT_FOLDER_ENV);

    assert_eq!(resolved, PathBuf::from("/tmp/plantdex-env"));
}

#[test]
#[serial]
fn test_toml_used_without_env_var() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/plantdex-toml")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, &toml_config);

    assert_eq!(resolved, PathBuf::from("/tmp/plantdex-toml"));
}

#[test]
#[serial]
fn test_falls_back_to_compiled_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let resolved = resolve_root_folder(None, &TomlConfig::default());

    assert_eq!(resolved, default_root_folder());
    assert!(database_path(&resolved).ends_with("plantdex.db"));
}

#[tokio::test]
async fn test_init_database_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("plantdex.db");

    let pool = plantdex_common::db::init_database(&db_path).await.unwrap();

    assert!(db_path.exists());
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM thumbnail_cache")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, 0);
}
