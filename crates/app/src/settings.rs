//! Settings for the `ynup` binary, read from a TOML file merged with
//! `YNUP_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/ynup.toml";

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Personal access token for the budgeting service.
    pub token: String,
    /// Budget to operate on.
    pub budget_id: String,
    /// Payee recorded on generated balance corrections.
    pub payee_id: Option<String>,
    /// Log filter level for the workspace crates.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("YNUP"))
            .build()?;

        settings.try_deserialize()
    }
}
