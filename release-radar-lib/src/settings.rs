//! Shared application settings.
//!
//! The settings file is `~/.config/release-radar/settings.toml`. Every value
//! resolves through a priority chain: environment variable, then the file,
//! then the built-in default. [`LoadedSettings`] remembers which link of
//! the chain each value came from so `config show` can report it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use release_radar_lookup::{DEFAULT_BACKEND_URL, IgdbCredentials};

use crate::debounce::{DEFAULT_QUIET_PERIOD, DebounceGate, MIN_QUERY_CHARS};
use crate::error::SettingsError;

pub const ENV_BACKEND_URL: &str = "RELEASE_RADAR_BACKEND_URL";
pub const ENV_IGDB_CLIENT_ID: &str = "IGDB_CLIENT_ID";
pub const ENV_IGDB_CLIENT_SECRET: &str = "IGDB_CLIENT_SECRET";
pub const ENV_DEBOUNCE_MS: &str = "RELEASE_RADAR_DEBOUNCE_MS";

/// Largest accepted `form.debounce_ms`.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Every key `config set` accepts, in display order.
pub const KEYS: &[&str] = &[
    "backend.base_url",
    "backend.session_cookie",
    "lookup.source",
    "igdb.client_id",
    "igdb.client_secret",
    "form.debounce_ms",
    "form.min_query_chars",
];

/// Keys whose values are masked when displayed.
const SECRET_KEYS: &[&str] = &["backend.session_cookie", "igdb.client_secret"];

/// Canonical path to the settings file: `~/.config/release-radar/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("release-radar").join("settings.toml")
}

/// Which catalog the forms search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupSourceKind {
    /// The tracker backend's lookup endpoints.
    #[default]
    Backend,
    /// IGDB directly, with the configured client credentials.
    Igdb,
}

impl std::fmt::Display for LookupSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend => f.write_str("backend"),
            Self::Igdb => f.write_str("igdb"),
        }
    }
}

impl std::str::FromStr for LookupSourceKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "backend" => Ok(Self::Backend),
            "igdb" => Ok(Self::Igdb),
            other => Err(SettingsError::invalid(format!(
                "Unknown lookup source '{}' (expected 'backend' or 'igdb')",
                other
            ))),
        }
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    EnvVar(&'static str),
    ConfigFile,
    Default,
    Missing,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub session_cookie: Option<String>,
    pub lookup_source: LookupSourceKind,
    pub igdb: IgdbCredentials,
    pub debounce_ms: u64,
    pub min_query_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            session_cookie: None,
            lookup_source: LookupSourceKind::default(),
            igdb: IgdbCredentials::default(),
            debounce_ms: DEFAULT_QUIET_PERIOD.as_millis() as u64,
            min_query_chars: MIN_QUERY_CHARS,
        }
    }
}

impl Settings {
    /// A debounce gate configured from these settings.
    pub fn debounce_gate(&self) -> DebounceGate {
        DebounceGate::new(Duration::from_millis(self.debounce_ms), self.min_query_chars)
    }

    /// Display value of `key`, secrets masked.
    pub fn display_value(&self, key: &str) -> Option<String> {
        let value = match key {
            "backend.base_url" => Some(self.backend_url.clone()),
            "backend.session_cookie" => self.session_cookie.clone(),
            "lookup.source" => Some(self.lookup_source.to_string()),
            "igdb.client_id" => non_empty(&self.igdb.client_id),
            "igdb.client_secret" => non_empty(&self.igdb.client_secret),
            "form.debounce_ms" => Some(self.debounce_ms.to_string()),
            "form.min_query_chars" => Some(self.min_query_chars.to_string()),
            _ => None,
        }?;
        if SECRET_KEYS.contains(&key) {
            Some(mask(&value))
        } else {
            Some(value)
        }
    }
}

/// Settings together with the provenance of each value.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    sources: BTreeMap<&'static str, SettingSource>,
}

impl LoadedSettings {
    pub fn source(&self, key: &str) -> SettingSource {
        self.sources
            .get(key)
            .copied()
            .unwrap_or(SettingSource::Missing)
    }
}

// On-disk layout. Every field optional so partial files load.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    #[serde(default)]
    backend: BackendSection,
    #[serde(default)]
    lookup: LookupSection,
    #[serde(default)]
    igdb: IgdbSection,
    #[serde(default)]
    form: FormSection,
}

#[derive(Debug, Default, Deserialize)]
struct BackendSection {
    base_url: Option<String>,
    session_cookie: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LookupSection {
    source: Option<LookupSourceKind>,
}

#[derive(Debug, Default, Deserialize)]
struct IgdbSection {
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FormSection {
    // Signed so hand-edited out-of-range values are ignored rather than
    // failing the whole file.
    debounce_ms: Option<i64>,
    min_query_chars: Option<i64>,
}

/// Load settings from the canonical file and the process environment.
pub fn load() -> Result<LoadedSettings, SettingsError> {
    load_from(&settings_path(), |var| std::env::var(var).ok())
}

/// Load settings from `path`, resolving overrides through `env`.
///
/// A missing file is not an error; every value then comes from the
/// environment or the defaults.
pub fn load_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<LoadedSettings, SettingsError> {
    let file: FileSettings = match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no settings file at {}", path.display());
            FileSettings::default()
        }
        Err(e) => return Err(e.into()),
    };

    let env = |var: &str| env(var).filter(|v| !v.trim().is_empty());
    let defaults = Settings::default();
    let mut sources = BTreeMap::new();

    let backend_url = resolve(
        &mut sources,
        "backend.base_url",
        env(ENV_BACKEND_URL).map(|v| (v, ENV_BACKEND_URL)),
        file.backend.base_url,
    )
    .unwrap_or_else(|| {
        sources.insert("backend.base_url", SettingSource::Default);
        defaults.backend_url.clone()
    });

    let session_cookie = resolve(
        &mut sources,
        "backend.session_cookie",
        None,
        file.backend.session_cookie,
    );

    let lookup_source = match file.lookup.source {
        Some(source) => {
            sources.insert("lookup.source", SettingSource::ConfigFile);
            source
        }
        None => {
            sources.insert("lookup.source", SettingSource::Default);
            defaults.lookup_source
        }
    };

    let client_id = resolve(
        &mut sources,
        "igdb.client_id",
        env(ENV_IGDB_CLIENT_ID).map(|v| (v, ENV_IGDB_CLIENT_ID)),
        file.igdb.client_id,
    );
    let client_secret = resolve(
        &mut sources,
        "igdb.client_secret",
        env(ENV_IGDB_CLIENT_SECRET).map(|v| (v, ENV_IGDB_CLIENT_SECRET)),
        file.igdb.client_secret,
    );

    let env_debounce = env(ENV_DEBOUNCE_MS).and_then(|v| match v.trim().parse::<u64>() {
        Ok(ms) if ms <= MAX_DEBOUNCE_MS => Some(ms),
        _ => {
            log::warn!(
                "ignoring ${}: '{}' is not a number of milliseconds up to {}",
                ENV_DEBOUNCE_MS,
                v,
                MAX_DEBOUNCE_MS
            );
            None
        }
    });
    let file_debounce = file.form.debounce_ms.and_then(|ms| {
        let valid = u64::try_from(ms).ok().filter(|ms| *ms <= MAX_DEBOUNCE_MS);
        if valid.is_none() {
            log::warn!("ignoring form.debounce_ms = {} in {}", ms, path.display());
        }
        valid
    });
    let debounce_ms = match (env_debounce, file_debounce) {
        (Some(ms), _) => {
            sources.insert("form.debounce_ms", SettingSource::EnvVar(ENV_DEBOUNCE_MS));
            ms
        }
        (None, Some(ms)) => {
            sources.insert("form.debounce_ms", SettingSource::ConfigFile);
            ms
        }
        (None, None) => {
            sources.insert("form.debounce_ms", SettingSource::Default);
            defaults.debounce_ms
        }
    };

    let file_min_chars = file
        .form
        .min_query_chars
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| *n >= 1);
    let min_query_chars = match file_min_chars {
        Some(n) => {
            sources.insert("form.min_query_chars", SettingSource::ConfigFile);
            n
        }
        _ => {
            sources.insert("form.min_query_chars", SettingSource::Default);
            defaults.min_query_chars
        }
    };

    Ok(LoadedSettings {
        settings: Settings {
            backend_url,
            session_cookie,
            lookup_source,
            igdb: IgdbCredentials {
                client_id: client_id.unwrap_or_default(),
                client_secret: client_secret.unwrap_or_default(),
            },
            debounce_ms,
            min_query_chars,
        },
        sources,
    })
}

/// Env beats file. Records the winning source, or `Missing`.
fn resolve(
    sources: &mut BTreeMap<&'static str, SettingSource>,
    key: &'static str,
    env: Option<(String, &'static str)>,
    file: Option<String>,
) -> Option<String> {
    if let Some((value, var)) = env {
        sources.insert(key, SettingSource::EnvVar(var));
        return Some(value);
    }
    if let Some(value) = file.filter(|v| !v.trim().is_empty()) {
        sources.insert(key, SettingSource::ConfigFile);
        return Some(value);
    }
    sources.insert(key, SettingSource::Missing);
    None
}

/// Set one key in the settings file at `path`. An empty value removes it.
///
/// Uses `toml::Value` for a surgical update so unrelated keys and tables are
/// preserved. The file is written atomically.
pub fn save_setting(path: &Path, key: &str, value: &str) -> Result<(), SettingsError> {
    let (section, field) = key
        .split_once('.')
        .filter(|_| KEYS.contains(&key))
        .ok_or_else(|| {
            SettingsError::invalid(format!(
                "Unknown setting '{}'. Known settings: {}",
                key,
                KEYS.join(", ")
            ))
        })?;
    let new_value = if value.trim().is_empty() {
        None
    } else {
        Some(typed_value(key, value.trim())?)
    };

    let mut doc: toml::Value = match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Value::Table(Default::default()),
        Err(e) => return Err(e.into()),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| SettingsError::invalid("settings.toml root is not a table"))?;
    let section_value = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section_table = section_value
        .as_table_mut()
        .ok_or_else(|| SettingsError::invalid(format!("[{}] is not a table", section)))?;

    match new_value {
        Some(v) => {
            section_table.insert(field.to_string(), v);
        }
        None => {
            section_table.remove(field);
        }
    }

    // Write atomically
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;

    log::debug!("saved {} to {}", key, path.display());
    Ok(())
}

fn typed_value(key: &str, value: &str) -> Result<toml::Value, SettingsError> {
    match key {
        "form.debounce_ms" => match value.parse::<u16>() {
            Ok(ms) if u64::from(ms) <= MAX_DEBOUNCE_MS => Ok(toml::Value::Integer(i64::from(ms))),
            _ => Err(SettingsError::invalid(format!(
                "{} must be a number of milliseconds between 0 and {}",
                key, MAX_DEBOUNCE_MS
            ))),
        },
        "form.min_query_chars" => match value.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(toml::Value::Integer(i64::from(n))),
            _ => Err(SettingsError::invalid(format!("{} must be a positive integer", key))),
        },
        "lookup.source" => {
            let source: LookupSourceKind = value.parse()?;
            Ok(toml::Value::String(source.to_string()))
        }
        _ => Ok(toml::Value::String(value.to_string())),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
