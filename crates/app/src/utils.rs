use shared::settings::AppSettings;
use std::path::{Path, PathBuf};

/// Environment variables checked for the Gemini key, in order
pub const CREDENTIAL_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Get the config file path
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("syncspace");
        p.push("settings.json");
        p
    })
}

/// Load settings from `path`, falling back to defaults.
///
/// The flag reports whether the file was read successfully.
pub fn load_settings_from(path: Option<&Path>) -> (AppSettings, bool) {
    let Some(path) = path else {
        return (AppSettings::default(), false);
    };
    if !path.exists() {
        return (AppSettings::default(), false);
    }
    match AppSettings::load_from(path) {
        Ok(settings) => (settings, true),
        Err(e) => {
            tracing::warn!("ignoring settings file: {:#}", e);
            (AppSettings::default(), false)
        }
    }
}

/// Load settings from disk or return defaults
pub fn load_settings_or_default() -> (AppSettings, bool) {
    load_settings_from(config_path().as_deref())
}

/// First non-blank credential among [`CREDENTIAL_ENV_VARS`]
pub fn env_credential() -> Option<String> {
    first_credential(CREDENTIAL_ENV_VARS.iter().map(|name| std::env::var(name).ok()))
}

fn first_credential(values: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
}
