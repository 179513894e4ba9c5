use crate::config::types::{Config, HttpConfig, PortalConfig, SsoConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sso_config(&config.sso)?;
    validate_portal_config(&config.portal)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates the CAS gateway endpoints
fn validate_sso_config(config: &SsoConfig) -> Result<(), ConfigError> {
    validate_http_url("sso.base-url", &config.base_url)?;
    validate_http_url("sso.service-url", &config.service_url)?;
    Ok(())
}

fn validate_portal_config(config: &PortalConfig) -> Result<(), ConfigError> {
    validate_http_url("portal.direct-url", &config.direct_url)
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Checks that `value` is an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
