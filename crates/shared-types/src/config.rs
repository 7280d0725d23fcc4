use serde::{Deserialize, Serialize};

/// Page size used when the search form does not send one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// `[search]` table of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchSettings,
}
