use crate::config::types::{Config, OutputConfig, SearchConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_search_config(&config.search)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the listing site origin
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use HTTPS scheme",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates search filter configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page-size must be >= 1, got {}",
            config.page_size
        )));
    }

    if config.min_price > config.max_price {
        return Err(ConfigError::Validation(format!(
            "min-price ({}) must not exceed max-price ({})",
            config.min_price, config.max_price
        )));
    }

    if config.cities.is_empty() {
        return Err(ConfigError::Validation(
            "at least one city must be configured".to_string(),
        ));
    }

    if let Some(city) = config.cities.iter().find(|city| city.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "city names cannot be blank, got '{}'",
            city
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
