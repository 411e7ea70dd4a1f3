//! # HTTP Runtime
//!
//! Shared state for the feedback API and the server entry point. The runtime
//! owns the sentiment analyzer, the feedback repository, the authenticator
//! and the rate limiters; handlers receive it through axum's `State`.


use std::{net::SocketAddr, sync::Arc};

use smartbiz_core::{
    AnalyzerConfig, Authenticator, FeedbackRepository, InMemoryFeedbackRepository,
    OpenAiCompletionClient, OpenAiConfig, SentimentAnalyzer, StaticCredentialAuthenticator,
    analysis::AnalysisError,
};
use tokio::net::TcpListener;

use crate::runtime::{
    config::{ConfigError, HttpRuntimeConfig},
    rate_limit::RateLimitState,
    shutdown::shutdown_signal,
};

/// Errors raised while assembling or running the server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build analysis client: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server state shared by every handler
#[derive(Clone)]
pub struct FeedbackRuntime {
    pub analyzer: SentimentAnalyzer,
    pub repository: Arc<dyn FeedbackRepository>,
    pub authenticator: Arc<dyn Authenticator>,
    pub rate_limit_state: Arc<RateLimitState>,
}

impl std::fmt::Debug for FeedbackRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackRuntime")
            .field("analyzer", &self.analyzer)
            .field("rate_limit_state", &self.rate_limit_state)
            .finish_non_exhaustive()
    }
}

impl FeedbackRuntime {
    /// Assemble a runtime from already-built components
    pub fn new(
        analyzer: SentimentAnalyzer,
        repository: Arc<dyn FeedbackRepository>,
        authenticator: Arc<dyn Authenticator>,
        rate_limit_state: RateLimitState,
    ) -> Self {
        Self {
            analyzer,
            repository,
            authenticator,
            rate_limit_state: Arc::new(rate_limit_state),
        }
    }

    /// Build the production runtime: OpenAI-compatible analysis, in-memory
    /// storage and the demo credential authenticator
    pub fn from_config(config: &HttpRuntimeConfig) -> Result<Self, ServerError> {
        let settings = &config.analysis;
        let client = OpenAiCompletionClient::new(OpenAiConfig {
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            timeout: settings.timeout(),
        })?;

        if !client.has_api_key() {
            tracing::warn!("No completion API key configured; every analysis will use the fallback result");
        }

        let analyzer = SentimentAnalyzer::new(
            Arc::new(client),
            AnalyzerConfig::default()
                .with_model(settings.model.clone())
                .with_timeout(settings.timeout()),
        );

        let rate_limit_state = RateLimitState::try_new(config.rate_limit.clone()).ok_or_else(|| {
            ConfigError::ValidationError("rate limit quotas must be greater than 0".to_string())
        })?;

        Ok(Self::new(
            analyzer,
            Arc::new(InMemoryFeedbackRepository::new()),
            Arc::new(StaticCredentialAuthenticator::new(config.demo.clone())),
            rate_limit_state,
        ))
    }
}

/// Bind the configured address and serve until SIGINT or SIGTERM
pub async fn serve(config: HttpRuntimeConfig) -> Result<(), ServerError> {
    let runtime = FeedbackRuntime::from_config(&config)?;
    let app = runtime.router(&config);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %addr,
        frontend_url = %config.frontend_url,
        model = %config.analysis.model,
        "SmartBiz feedback server listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
