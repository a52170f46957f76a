//! API constants
//!
//! Every versioned route is mounted under [`API_PREFIX`].

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version segment
pub const API_VERSION: &str = "v1";

/// Versioned prefix for all API routes, e.g. `/api/v1`
pub const API_PREFIX: &str = "/api/v1";

/// Public path under which locally stored files are served.
pub const LOCAL_FILES_PATH: &str = "/uploads";

/// Window used by the HTTP rate limiter.
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// How often expired rate-limit buckets are swept.
pub const RATE_LIMIT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Timeout for individual health probes.
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Default cap on in-flight HTTP requests.
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 10_000;
