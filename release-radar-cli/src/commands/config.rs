use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use release_radar_lib::settings::{self, KEYS};

use crate::CliError;

/// Show every setting, its value and where it came from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings::settings_path();
    let loaded = settings::load()?;

    log::info!(
        "{}",
        "release-radar Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    if path.exists() {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    for key in KEYS {
        let source_str = format!("({})", loaded.source(key));
        match loaded.settings.display_value(key) {
            Some(v) => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", key).if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", key).if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings::settings_path().display());
    Ok(())
}

/// Write one key to the settings file.
pub(crate) fn run_config_set(key: &str, value: &str) -> Result<(), CliError> {
    if !KEYS.contains(&key) {
        return Err(CliError::config(format!(
            "Unknown setting '{}'. Known settings: {}",
            key,
            KEYS.join(", ")
        )));
    }
    let path = settings::settings_path();
    settings::save_setting(&path, key, value)?;

    if value.trim().is_empty() {
        log::info!(
            "{} Removed {} from {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            key.if_supports_color(Stdout, |t| t.cyan()),
            path.display(),
        );
    } else {
        log::info!(
            "{} Set {} in {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            key.if_supports_color(Stdout, |t| t.cyan()),
            path.display(),
        );
    }
    Ok(())
}
