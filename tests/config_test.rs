//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global → Local: each layer REPLACES the keys it sets
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Environment variables are process-global, so every test that loads
//! settings holds `ENV_LOCK`.

use std::fs;
use std::sync::Mutex;

use tempfile::TempDir;

use treenav::application::ApplicationError;
use treenav::config::{local_config_path, Settings, DEFAULT_BASE_URL};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn write_local(dir: &TempDir, content: &str) {
    fs::write(local_config_path(dir.path()), content).unwrap();
}

// ============================================================
// file layers
// ============================================================

#[test]
fn given_no_config_files_when_load_then_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();

    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_local_config_with_scalars_when_load_then_overrides_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    write_local(
        &dir,
        r#"
default_language = "de_DE"

[api]
base_url = "http://localhost:3000/api"
timeout_secs = 3
"#,
    );

    let settings = Settings::load_from(None, Some(dir.path())).expect("load settings");

    assert_eq!(settings.default_language, "de_DE");
    assert_eq!(settings.api.base_url, "http://localhost:3000/api");
    assert_eq!(settings.api.timeout_secs, 3);
    assert_eq!(
        settings.api.translations_path, "/locales",
        "unset keys keep their default"
    );
}

#[test]
fn given_global_and_local_config_when_load_then_local_wins_per_key() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let global_dir = TempDir::new().unwrap();
    let global_path = global_dir.path().join("treenav.toml");
    fs::write(
        &global_path,
        r#"
default_language = "fr_FR"

[api]
timeout_secs = 30
translations_path = "/translations"
"#,
    )
    .unwrap();
    let local_dir = TempDir::new().unwrap();
    write_local(&local_dir, "[api]\ntimeout_secs = 5\n");

    let settings =
        Settings::load_from(Some(&global_path), Some(local_dir.path())).expect("load settings");

    assert_eq!(settings.default_language, "fr_FR");
    assert_eq!(settings.api.timeout_secs, 5);
    assert_eq!(settings.api.translations_path, "/translations");
    assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
}

#[test]
fn given_missing_global_file_when_load_then_ignores_it() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let settings = Settings::load_from(Some(&missing), None).expect("load settings");

    assert_eq!(settings.api.timeout_secs, 10);
}

#[test]
fn given_invalid_toml_when_load_then_returns_config_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    write_local(&dir, "[api\nbase_url = ");

    let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

    match err {
        ApplicationError::Config { message } => assert!(message.contains(".treenav.toml")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn given_wrong_value_type_when_load_then_returns_config_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    write_local(&dir, "[api]\ntimeout_secs = \"soon\"\n");

    let result = Settings::load_from(None, Some(dir.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

// ============================================================
// environment overrides
// ============================================================

#[test]
fn given_env_vars_when_load_then_override_files() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    write_local(&dir, "[api]\ntimeout_secs = 5\nbase_url = \"http://file/api\"\n");

    std::env::set_var("TREENAV_API__TIMEOUT_SECS", "42");
    std::env::set_var("TREENAV_DEFAULT_LANGUAGE", "it_IT");
    let result = Settings::load_from(None, Some(dir.path()));
    std::env::remove_var("TREENAV_API__TIMEOUT_SECS");
    std::env::remove_var("TREENAV_DEFAULT_LANGUAGE");

    let settings = result.expect("load settings");
    assert_eq!(settings.api.timeout_secs, 42);
    assert_eq!(settings.default_language, "it_IT");
    assert_eq!(settings.api.base_url, "http://file/api");
}

// ============================================================
// rendering
// ============================================================

#[test]
fn given_loaded_settings_when_rendered_then_contains_effective_values() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    write_local(&dir, "[api]\ntranslations_path = \"/i18n\"\n");

    let settings = Settings::load_from(None, Some(dir.path())).unwrap();
    let text = settings.to_toml().unwrap();

    assert!(text.contains("translations_path = \"/i18n\""));
    assert!(text.contains("default_language = \"es_ES\""));
}
