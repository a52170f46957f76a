pub mod rate_limit;
pub mod timeout;

pub use rate_limit::{rate_limit_middleware, HttpRateLimiter};
pub use timeout::request_timeout_middleware;
