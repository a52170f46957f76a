//! Application state shared by every handler.
//!
//! Process-level clients are built once in `setup` and handed out by `Arc`.

use std::sync::Arc;

use greenmate_care::CareService;
use greenmate_core::Config;
use greenmate_processing::UploadOptions;
use greenmate_storage::Storage;
use tokio_util::sync::CancellationToken;

use crate::middleware::HttpRateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub care: CareService,
    pub rate_limiter: Arc<HttpRateLimiter>,
    /// Upload defaults derived from `config`; handlers override per request.
    pub upload_defaults: UploadOptions,
    /// Cancelled on graceful shutdown to stop background tasks.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>, care: CareService) -> Self {
        let rate_limiter = Arc::new(
            HttpRateLimiter::with_shards(
                config.http_rate_limit_per_minute(),
                config.rate_limiter_shard_count(),
            )
            .with_trusted_proxies(config.trusted_proxy_count()),
        );
        let upload_defaults = UploadOptions::from_config(&config);
        Self {
            config,
            storage,
            care,
            rate_limiter,
            upload_defaults,
            shutdown: CancellationToken::new(),
        }
    }
}
