//! # Rate Limiting
//!
//! Per-IP request quotas. Every `/api` request draws from the API limiter;
//! login and registration additionally draw from a stricter auth limiter.
//! Requests that arrive without `ConnectInfo` (in-process tests, unusual
//! transports) all share the bucket of [`UNKNOWN_CLIENT_IP`].

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
};
use serde::Serialize;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
};

use crate::runtime::error::{ApiError, request_id_from_extensions};
use crate::runtime::http::FeedbackRuntime;

/// Rate limiter for per-IP requests
pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Bucket shared by requests without a known peer address
pub const UNKNOWN_CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests per minute per IP across `/api`
    pub api_per_ip_rpm: u32,
    /// Maximum login/registration attempts per minute per IP
    pub auth_per_ip_rpm: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            api_per_ip_rpm: 100,
            auth_per_ip_rpm: 10,
        }
    }
}

/// Which quota a request exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    Api,
    Auth,
}

impl LimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Auth => "auth",
        }
    }
}

/// Rate limiting state
pub struct RateLimitState {
    pub api_limiter: IpRateLimiter,
    pub auth_limiter: IpRateLimiter,
    pub config: RateLimitConfig,
}

impl std::fmt::Debug for RateLimitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Rate limit rejection details
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitError {
    pub error: String,
    pub message: String,
    /// Seconds until the next request is allowed
    pub retry_after: u64,
}

impl RateLimitState {
    /// Try to create a new rate limit state with the given configuration
    ///
    /// Returns None if any rate limit value is 0.
    pub fn try_new(config: RateLimitConfig) -> Option<Self> {
        let api_quota = Quota::per_minute(NonZeroU32::new(config.api_per_ip_rpm)?);
        let auth_quota = Quota::per_minute(NonZeroU32::new(config.auth_per_ip_rpm)?);

        Some(Self {
            api_limiter: RateLimiter::keyed(api_quota),
            auth_limiter: RateLimiter::keyed(auth_quota),
            config,
        })
    }

    /// Check and consume one request from the given scope
    pub fn check(&self, scope: LimitScope, client_ip: IpAddr) -> Result<(), RateLimitError> {
        let limiter = match scope {
            LimitScope::Api => &self.api_limiter,
            LimitScope::Auth => &self.auth_limiter,
        };

        limiter.check_key(&client_ip).map_err(|not_until| {
            let retry_after = not_until
                .wait_time_from(DefaultClock::default().now())
                .as_secs()
                .max(1);
            let message = match scope {
                LimitScope::Api => "Too many requests from this IP, please try again later.",
                LimitScope::Auth => {
                    "Too many authentication attempts from this IP, please try again later."
                }
            };
            RateLimitError {
                error: format!("{}_rate_limit_exceeded", scope.as_str()),
                message: message.to_string(),
                retry_after,
            }
        })
    }
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(UNKNOWN_CLIENT_IP)
}

async fn enforce(runtime: &FeedbackRuntime, scope: LimitScope, request: Request, next: Next) -> Response {
    let ip = client_ip(&request);
    if let Err(err) = runtime.rate_limit_state.check(scope, ip) {
        tracing::warn!(
            client_ip = %ip,
            scope = scope.as_str(),
            retry_after = err.retry_after,
            "Rate limit exceeded"
        );
        let request_id = request_id_from_extensions(request.extensions());
        return ApiError::rate_limit_exceeded(scope, err, request_id).into_response();
    }
    next.run(request).await
}

/// Middleware applying the API quota
pub async fn api_rate_limit(
    State(runtime): State<FeedbackRuntime>,
    request: Request,
    next: Next,
) -> Response {
    enforce(&runtime, LimitScope::Api, request, next).await
}

/// Middleware applying the auth quota
pub async fn auth_rate_limit(
    State(runtime): State<FeedbackRuntime>,
    request: Request,
    next: Next,
) -> Response {
    enforce(&runtime, LimitScope::Auth, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(api: u32, auth: u32) -> RateLimitState {
        RateLimitState::try_new(RateLimitConfig {
            api_per_ip_rpm: api,
            auth_per_ip_rpm: auth,
        })
        .unwrap()
    }

    #[test]
    fn test_zero_quota_rejected() {
        assert!(
            RateLimitState::try_new(RateLimitConfig {
                api_per_ip_rpm: 0,
                auth_per_ip_rpm: 10,
            })
            .is_none()
        );
    }

    #[test]
    fn test_quota_exhaustion_per_ip() {
        let state = state(100, 2);
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let other = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(state.check(LimitScope::Auth, ip).is_ok());
        assert!(state.check(LimitScope::Auth, ip).is_ok());
        let err = state.check(LimitScope::Auth, ip).unwrap_err();
        assert_eq!(err.error, "auth_rate_limit_exceeded");
        assert!(err.retry_after >= 1);

        assert!(state.check(LimitScope::Auth, other).is_ok());
        assert!(state.check(LimitScope::Api, ip).is_ok());
    }
}
