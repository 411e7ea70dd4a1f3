//! # Runtime Module
//!
//! The HTTP surface of the SmartBiz feedback service: configuration, shared
//! state, routing, middleware and handlers.

/// Bearer-token authentication middleware.
pub mod auth;
/// Environment-driven runtime configuration.
pub mod config;
/// Structured error responses and request ids.
pub mod error;
/// HTTP request handlers organized by functionality.
pub mod handlers;
/// Runtime state and server entry point.
pub mod http;
/// Per-IP rate limiting middleware.
pub mod rate_limit;
/// Router and middleware stack.
pub mod router;
/// Fixed response security headers.
pub mod security_headers;
/// Signal handling for graceful shutdown.
pub mod shutdown;
/// Request deadline middleware.
pub mod timeout;
/// Request and response bodies.
pub mod types;

pub use config::{AnalysisSettings, ConfigError, HttpRuntimeConfig, HttpRuntimeConfigBuilder, LogFormat};
pub use error::{ApiError, ApiErrorKind, ApiResult, ErrorCode, ErrorResponse, RequestId};
pub use http::{FeedbackRuntime, ServerError, serve};
pub use rate_limit::{LimitScope, RateLimitConfig, RateLimitState};
pub use shutdown::shutdown_signal;
