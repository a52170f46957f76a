//! Configuration module
//!
//! Service configuration loaded from the environment (and `.env` in
//! development): server, storage, image normalization and weather settings.

use std::env;

use crate::models::OutputFormat;
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const HTTP_RATE_LIMIT_PER_MINUTE: u32 = 100;
const RATE_LIMITER_SHARD_COUNT: usize = 16;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const TRUSTED_PROXY_COUNT: usize = 0;

const MAX_FILE_SIZE_MB: usize = 10;
const IMAGE_MAX_DIMENSION: u32 = 1200;
const IMAGE_QUALITY: u8 = 85;
const THUMBNAIL_SIZE: u32 = 300;
const LOCAL_STORAGE_PATH: &str = "./uploads";
const WEATHER_API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const WEATHER_TIMEOUT_SECS: u64 = 10;

/// Largest output edge we will ever encode, matching the upload dimension cap.
const IMAGE_DIMENSION_LIMIT: u32 = 4096;

/// Settings every GreenMate process needs
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub http_rate_limit_per_minute: u32,
    pub rate_limiter_shard_count: usize,
    pub request_timeout_secs: u64,
    /// Reverse proxies in front of the service; 0 means `X-Forwarded-For` is ignored.
    pub trusted_proxy_count: usize,
    pub environment: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            http_rate_limit_per_minute: HTTP_RATE_LIMIT_PER_MINUTE,
            rate_limiter_shard_count: RATE_LIMITER_SHARD_COUNT,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            trusted_proxy_count: TRUSTED_PROXY_COUNT,
            environment: "development".to_string(),
        }
    }
}

/// Full service configuration
#[derive(Clone, Debug)]
pub struct GreenMateConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Image normalization
    pub max_file_size_bytes: usize,
    pub image_max_width: u32,
    pub image_max_height: u32,
    pub image_quality: u8,
    pub image_format: OutputFormat,
    pub thumbnail_size: u32,
    // Weather provider
    pub weather_api_key: Option<String>,
    pub weather_api_base_url: String,
    pub weather_timeout_secs: u64,
}

impl Default for GreenMateConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some(LOCAL_STORAGE_PATH.to_string()),
            local_storage_base_url: Some(format!("http://localhost:{}/uploads", SERVER_PORT)),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            image_max_width: IMAGE_MAX_DIMENSION,
            image_max_height: IMAGE_MAX_DIMENSION,
            image_quality: IMAGE_QUALITY,
            image_format: OutputFormat::Jpeg,
            thumbnail_size: THUMBNAIL_SIZE,
            weather_api_key: None,
            weather_api_base_url: WEATHER_API_BASE_URL.to_string(),
            weather_timeout_secs: WEATHER_TIMEOUT_SECS,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<GreenMateConfig>);

impl From<GreenMateConfig> for Config {
    fn from(config: GreenMateConfig) -> Self {
        Config(Box::new(config))
    }
}

impl Config {
    fn inner(&self) -> &GreenMateConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = GreenMateConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn http_rate_limit_per_minute(&self) -> u32 {
        self.inner().base.http_rate_limit_per_minute
    }

    pub fn rate_limiter_shard_count(&self) -> usize {
        self.inner().base.rate_limiter_shard_count
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().base.request_timeout_secs
    }

    pub fn trusted_proxy_count(&self) -> usize {
        self.inner().base.trusted_proxy_count
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn image_max_width(&self) -> u32 {
        self.inner().image_max_width
    }

    pub fn image_max_height(&self) -> u32 {
        self.inner().image_max_height
    }

    pub fn image_quality(&self) -> u8 {
        self.inner().image_quality
    }

    pub fn image_format(&self) -> OutputFormat {
        self.inner().image_format
    }

    pub fn thumbnail_size(&self) -> u32 {
        self.inner().thumbnail_size
    }

    pub fn weather_api_key(&self) -> Option<&str> {
        self.inner().weather_api_key.as_deref()
    }

    pub fn weather_api_base_url(&self) -> &str {
        &self.inner().weather_api_base_url
    }

    pub fn weather_timeout_secs(&self) -> u64 {
        self.inner().weather_timeout_secs
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl GreenMateConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            http_rate_limit_per_minute: env::var("HTTP_RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| HTTP_RATE_LIMIT_PER_MINUTE.to_string())
                .parse()
                .unwrap_or(HTTP_RATE_LIMIT_PER_MINUTE),
            rate_limiter_shard_count: env::var("RATE_LIMITER_SHARD_COUNT")
                .unwrap_or_else(|_| RATE_LIMITER_SHARD_COUNT.to_string())
                .parse()
                .unwrap_or(RATE_LIMITER_SHARD_COUNT),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            trusted_proxy_count: env::var("TRUSTED_PROXY_COUNT")
                .unwrap_or_else(|_| TRUSTED_PROXY_COUNT.to_string())
                .parse()
                .unwrap_or(TRUSTED_PROXY_COUNT),
            environment,
        };

        let server_port = base.server_port;
        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Local,
        };

        let image_format = match env::var("IMAGE_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => OutputFormat::Jpeg,
        };

        let config = GreenMateConfig {
            base,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok().filter(|s| !s.is_empty()),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok()
                .filter(|s| !s.is_empty()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    (storage_backend == StorageBackend::Local)
                        .then(|| LOCAL_STORAGE_PATH.to_string())
                }),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    (storage_backend == StorageBackend::Local)
                        .then(|| format!("http://localhost:{}/uploads", server_port))
                }),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            image_max_width: env::var("IMAGE_MAX_WIDTH")
                .unwrap_or_else(|_| IMAGE_MAX_DIMENSION.to_string())
                .parse()
                .unwrap_or(IMAGE_MAX_DIMENSION),
            image_max_height: env::var("IMAGE_MAX_HEIGHT")
                .unwrap_or_else(|_| IMAGE_MAX_DIMENSION.to_string())
                .parse()
                .unwrap_or(IMAGE_MAX_DIMENSION),
            image_quality: env::var("IMAGE_QUALITY")
                .unwrap_or_else(|_| IMAGE_QUALITY.to_string())
                .parse()
                .unwrap_or(IMAGE_QUALITY),
            image_format,
            thumbnail_size: env::var("THUMBNAIL_SIZE")
                .unwrap_or_else(|_| THUMBNAIL_SIZE.to_string())
                .parse()
                .unwrap_or(THUMBNAIL_SIZE),
            weather_api_key: env::var("WEATHER_API_KEY").ok().filter(|s| !s.is_empty()),
            weather_api_base_url: env::var("WEATHER_API_BASE_URL")
                .unwrap_or_else(|_| WEATHER_API_BASE_URL.to_string()),
            weather_timeout_secs: env::var("WEATHER_TIMEOUT_SECS")
                .unwrap_or_else(|_| WEATHER_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(WEATHER_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        for (name, value) in [
            ("IMAGE_MAX_WIDTH", self.image_max_width),
            ("IMAGE_MAX_HEIGHT", self.image_max_height),
            ("THUMBNAIL_SIZE", self.thumbnail_size),
        ] {
            if value == 0 || value > IMAGE_DIMENSION_LIMIT {
                return Err(anyhow::anyhow!(
                    "{} must be between 1 and {}",
                    name,
                    IMAGE_DIMENSION_LIMIT
                ));
            }
        }

        if !(1..=100).contains(&self.image_quality) {
            return Err(anyhow::anyhow!("IMAGE_QUALITY must be between 1 and 100"));
        }

        if self.base.rate_limiter_shard_count == 0 {
            return Err(anyhow::anyhow!(
                "RATE_LIMITER_SHARD_COUNT must be greater than 0"
            ));
        }

        if is_production_env(&self.base.environment) && self.weather_api_key.is_none() {
            return Err(anyhow::anyhow!(
                "WEATHER_API_KEY must be set in production"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GreenMateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.image_max_width, 1200);
        assert_eq!(config.image_quality, 85);
        assert_eq!(config.thumbnail_size, 300);
    }

    #[test]
    fn test_s3_backend_requires_bucket_and_region() {
        let mut config = GreenMateConfig {
            storage_backend: StorageBackend::S3,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.s3_bucket = Some("plants".to_string());
        assert!(config.validate().is_err());

        config.s3_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_image_settings_rejected() {
        let config = GreenMateConfig {
            image_quality: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GreenMateConfig {
            image_max_width: 5000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_requires_weather_key() {
        let mut config = GreenMateConfig::default();
        config.base.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.weather_api_key = Some("key".to_string());
        assert!(config.validate().is_ok());
        assert!(Config::from(config).is_production());
    }
}
