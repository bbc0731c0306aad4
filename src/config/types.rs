use crate::parser::SITE_ORIGIN;
use crate::ConfigError;
use serde::Deserialize;
use url::Url;

/// Main configuration structure for Hourse-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Parses the configured site origin
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.site.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))
    }
}

/// Listing site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin that relative listing links resolve against
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Search filter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Number of listings per results page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Lower bound of the price window (10k TWD)
    #[serde(rename = "min-price", default = "default_min_price")]
    pub min_price: u32,

    /// Upper bound of the price window (10k TWD)
    #[serde(rename = "max-price", default = "default_max_price")]
    pub max_price: u32,

    /// Cities to search, e.g. "台北市"
    pub cities: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_base_url() -> String {
    SITE_ORIGIN.to_string()
}

fn default_page_size() -> u32 {
    30
}

fn default_min_price() -> u32 {
    500
}

fn default_max_price() -> u32 {
    3000
}
