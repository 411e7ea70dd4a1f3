//! HTTP router configuration
//!
//! Layers added last run first: request ids are assigned before tracing,
//! rate limiting or authentication can reject a request.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::runtime::{
    auth::require_auth,
    config::HttpRuntimeConfig,
    error::{ApiError, RequestId, request_id_middleware},
    handlers::{
        create_feedback, feedback_analytics, get_feedback, health_check, list_feedback, login, me,
        register,
    },
    http::FeedbackRuntime,
    rate_limit::{api_rate_limit, auth_rate_limit},
    security_headers::security_headers_middleware,
    timeout::{RequestTimeout, request_timeout_middleware},
};

impl FeedbackRuntime {
    /// Create the Axum router with all endpoints and middleware
    pub fn router(self, config: &HttpRuntimeConfig) -> Router {
        // Login and registration draw from the stricter auth quota
        let auth_routes = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route_layer(middleware::from_fn_with_state(
                self.clone(),
                auth_rate_limit,
            ));

        let protected_routes = Router::new()
            .route("/auth/me", get(me))
            .route("/feedback", get(list_feedback).post(create_feedback))
            .route("/feedback/analytics", get(feedback_analytics))
            .route("/feedback/{id}", get(get_feedback))
            .route_layer(middleware::from_fn_with_state(self.clone(), require_auth));

        let api = Router::new()
            .route("/health", get(health_check))
            .merge(auth_routes)
            .merge(protected_routes)
            .layer(middleware::from_fn_with_state(self.clone(), api_rate_limit));

        Router::new()
            .nest("/api", api)
            .fallback(route_not_found)
            .with_state(self)
            .layer(DefaultBodyLimit::max(config.max_body_size))
            .layer(RequestBodyLimitLayer::new(config.max_body_size))
            .layer(middleware::from_fn_with_state(
                RequestTimeout(config.request_timeout()),
                request_timeout_middleware,
            ))
            .layer(cors_layer(&config.frontend_url))
            .layer(middleware::from_fn(security_headers_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(request_id_middleware))
    }
}

async fn route_not_found(request_id: RequestId) -> ApiError {
    ApiError::not_found("route", request_id)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .allow_credentials(true);

    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(err) => {
            tracing::warn!(frontend_url, error = %err, "Invalid frontend origin; cross-origin requests disabled");
            layer
        }
    }
}
