use std::path::{Path, PathBuf};

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use tonnage_provider_socrata::{DEFAULT_DATASET, DEFAULT_DOMAIN};
use tonnage_store::DEFAULT_STORE_PATH;

/// Settings file picked up from the working directory when present.
const DEFAULT_SETTINGS_FILE: &str = "tonnage.toml";

#[derive(serde::Deserialize)]
pub(crate) struct Settings {
    pub socrata: SocrataSettings,
    pub store: StoreSettings,
}

#[derive(serde::Deserialize)]
pub(crate) struct SocrataSettings {
    pub domain: String,
    pub dataset: String,
    pub app_token: Option<Secret<String>>,
    pub timeout_secs: u64,
}

#[derive(serde::Deserialize)]
pub(crate) struct StoreSettings {
    pub path: PathBuf,
}

/// Load defaults, then the settings file, then `TONNAGE_*` environment variables.
///
/// An explicitly named file must exist; the default one is optional.
pub(crate) fn get_settings(file: Option<&Path>) -> Result<Settings, ConfigError> {
    let file_source = match file {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
    };

    let settings = defaults()?
        .add_source(file_source)
        .add_source(
            Environment::with_prefix("TONNAGE")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

/// Built-in values every other source layers over.
fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("socrata.domain", DEFAULT_DOMAIN)?
        .set_default("socrata.dataset", DEFAULT_DATASET)?
        .set_default("socrata.timeout_secs", 30)?
        .set_default("store.path", DEFAULT_STORE_PATH)
}
