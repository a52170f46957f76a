//! Configuration validation
//!
//! Runs the config's own checks, then the ones that only matter when serving HTTP.

use anyhow::Result;
use greenmate_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.http_rate_limit_per_minute() == 0 {
        return Err(anyhow::anyhow!("HTTP rate limit cannot be 0"));
    }

    if config.request_timeout_secs() == 0 {
        return Err(anyhow::anyhow!("Request timeout cannot be 0"));
    }

    if config.trusted_proxy_count() > 10 {
        tracing::warn!(
            trusted_proxy_count = config.trusted_proxy_count(),
            "TRUSTED_PROXY_COUNT is very high - ensure this matches your actual proxy setup"
        );
    }

    if config.weather_api_key().is_none() {
        tracing::warn!("WEATHER_API_KEY is not set - GET care recommendations will fail");
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenmate_core::GreenMateConfig;

    #[test]
    fn test_default_config_passes() {
        let config: Config = GreenMateConfig::default().into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut inner = GreenMateConfig::default();
        inner.base.environment = "production".to_string();
        inner.weather_api_key = Some("key".to_string());
        let config: Config = inner.into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let mut inner = GreenMateConfig::default();
        inner.base.http_rate_limit_per_minute = 0;
        assert!(validate_config(&inner.into()).is_err());
    }
}
