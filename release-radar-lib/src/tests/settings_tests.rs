use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |var| map.get(var).cloned()
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = load_from(&dir.path().join("settings.toml"), no_env).unwrap();
    assert_eq!(loaded.settings, Settings::default());
    assert_eq!(loaded.settings.debounce_ms, 400);
    assert_eq!(loaded.settings.min_query_chars, 2);
    assert_eq!(loaded.source("backend.base_url"), SettingSource::Default);
    assert_eq!(loaded.source("igdb.client_id"), SettingSource::Missing);
}

#[test]
fn file_values_are_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[backend]
base_url = "https://radar.example.com/api/v1"

[lookup]
source = "igdb"

[igdb]
client_id = "abc123"
client_secret = "s3cr3t-value"

[form]
debounce_ms = 250
"#,
    )
    .unwrap();

    let loaded = load_from(&path, no_env).unwrap();
    let s = &loaded.settings;
    assert_eq!(s.backend_url, "https://radar.example.com/api/v1");
    assert_eq!(s.lookup_source, LookupSourceKind::Igdb);
    assert!(s.igdb.is_configured());
    assert_eq!(s.debounce_ms, 250);
    assert_eq!(s.min_query_chars, 2);
    assert_eq!(loaded.source("form.debounce_ms"), SettingSource::ConfigFile);
    assert_eq!(loaded.source("form.min_query_chars"), SettingSource::Default);
    assert_eq!(s.debounce_gate().quiet_period(), Duration::from_millis(250));
}

#[test]
fn environment_beats_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[backend]\nbase_url = \"http://file\"\n[form]\ndebounce_ms = 250\n").unwrap();

    let env = env_of(&[
        (ENV_BACKEND_URL, "http://env"),
        (ENV_DEBOUNCE_MS, "50"),
        (ENV_IGDB_CLIENT_ID, "from-env"),
    ]);
    let loaded = load_from(&path, env).unwrap();
    assert_eq!(loaded.settings.backend_url, "http://env");
    assert_eq!(loaded.settings.debounce_ms, 50);
    assert_eq!(loaded.settings.igdb.client_id, "from-env");
    assert_eq!(loaded.source("backend.base_url"), SettingSource::EnvVar(ENV_BACKEND_URL));
    assert_eq!(loaded.source("form.debounce_ms"), SettingSource::EnvVar(ENV_DEBOUNCE_MS));
}

#[test]
fn unparsable_env_debounce_falls_through() {
    let dir = tempfile::tempdir().unwrap();
    let env = env_of(&[(ENV_DEBOUNCE_MS, "soon")]);
    let loaded = load_from(&dir.path().join("none.toml"), env).unwrap();
    assert_eq!(loaded.settings.debounce_ms, 400);
    assert_eq!(loaded.source("form.debounce_ms"), SettingSource::Default);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[backend\nbase_url = ").unwrap();
    assert!(matches!(load_from(&path, no_env), Err(SettingsError::Parse(_))));
}

#[test]
fn save_setting_preserves_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");

    save_setting(&path, "backend.base_url", "https://radar.example.com").unwrap();
    save_setting(&path, "form.debounce_ms", "300").unwrap();
    save_setting(&path, "lookup.source", "IGDB").unwrap();

    let loaded = load_from(&path, no_env).unwrap();
    assert_eq!(loaded.settings.backend_url, "https://radar.example.com");
    assert_eq!(loaded.settings.debounce_ms, 300);
    assert_eq!(loaded.settings.lookup_source, LookupSourceKind::Igdb);
    assert!(!path.with_extension("toml.tmp").exists());
}

#[test]
fn empty_value_removes_the_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    save_setting(&path, "igdb.client_id", "abc").unwrap();
    save_setting(&path, "igdb.client_id", "").unwrap();
    let loaded = load_from(&path, no_env).unwrap();
    assert_eq!(loaded.settings.igdb.client_id, "");
    assert_eq!(loaded.source("igdb.client_id"), SettingSource::Missing);
}

#[test]
fn save_setting_rejects_unknown_keys_and_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    assert!(matches!(
        save_setting(&path, "backend.port", "8080"),
        Err(SettingsError::Invalid(_))
    ));
    assert!(save_setting(&path, "form.debounce_ms", "fast").is_err());
    assert!(save_setting(&path, "form.min_query_chars", "0").is_err());
    assert!(save_setting(&path, "lookup.source", "steam").is_err());
    assert!(!path.exists());
}

#[test]
fn oversized_debounce_is_rejected_and_file_stays_loadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    save_setting(&path, "form.debounce_ms", "250").unwrap();

    for value in ["18446744073709551615", "60001", "-5"] {
        assert!(matches!(
            save_setting(&path, "form.debounce_ms", value),
            Err(SettingsError::Invalid(_))
        ));
    }
    save_setting(&path, "form.debounce_ms", "60000").unwrap();

    let loaded = load_from(&path, no_env).unwrap();
    assert_eq!(loaded.settings.debounce_ms, MAX_DEBOUNCE_MS);
    assert_eq!(loaded.source("form.debounce_ms"), SettingSource::ConfigFile);
}

#[test]
fn out_of_range_form_values_in_file_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[form]\ndebounce_ms = -1\nmin_query_chars = -3\n").unwrap();

    let loaded = load_from(&path, no_env).unwrap();
    assert_eq!(loaded.settings.debounce_ms, 400);
    assert_eq!(loaded.settings.min_query_chars, 2);
    assert_eq!(loaded.source("form.debounce_ms"), SettingSource::Default);

    // The file can still be repaired through save_setting.
    save_setting(&path, "form.debounce_ms", "500").unwrap();
    assert_eq!(load_from(&path, no_env).unwrap().settings.debounce_ms, 500);
}

#[test]
fn env_debounce_above_maximum_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let env = env_of(&[(ENV_DEBOUNCE_MS, "90000")]);
    let loaded = load_from(&dir.path().join("none.toml"), env).unwrap();
    assert_eq!(loaded.settings.debounce_ms, 400);
}

#[test]
fn secrets_are_masked_for_display() {
    let mut settings = Settings::default();
    settings.igdb.client_secret = "abcdefghijkl".to_string();
    settings.session_cookie = Some("ab".to_string());
    assert_eq!(settings.display_value("igdb.client_secret").as_deref(), Some("abcd****"));
    assert_eq!(settings.display_value("backend.session_cookie").as_deref(), Some("****"));
    assert_eq!(settings.display_value("igdb.client_id"), None);
    assert_eq!(
        settings.display_value("backend.base_url").as_deref(),
        Some(DEFAULT_BACKEND_URL)
    );
}
