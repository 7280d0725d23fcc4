use shared_types::{AppConfig, SearchSettings};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the working directory.
const CONFIG_PATH: &str = "config.toml";

/// Parse config text, falling back to defaults on error.
fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(path = CONFIG_PATH, error = %e, "failed to parse config, using defaults");
        AppConfig::default()
    })
}

/// Read `config.toml` into the global `OnceLock`. Only the first call has
/// effect. A missing or unparseable file yields the defaults.
pub fn load_app_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config = parse_config(&contents);
            tracing::info!(
                default_page_size = config.search.default_page_size,
                "loaded {CONFIG_PATH}"
            );
            config
        }
        Err(e) => {
            tracing::info!(path = CONFIG_PATH, error = %e, "config file not found, using defaults");
            AppConfig::default()
        }
    })
}

/// Search settings, or the defaults if `load_app_config()` hasn't run.
pub fn search_settings() -> SearchSettings {
    CONFIG
        .get()
        .map(|c| c.search.clone())
        .unwrap_or_default()
}
