//! Subcommand implementations

use std::net::IpAddr;

use serde_json::json;
use smartbiz_core::{
    FeedbackAnalysisRequest, ValidationError, validation::validate_feedback_content,
};
use smartbiz_http::runtime::{
    ConfigError, FeedbackRuntime, HttpRuntimeConfig, HttpRuntimeConfigBuilder, ServerError, serve,
};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Invalid feedback: {0}")]
    InvalidContent(#[from] ValidationError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

fn load_config(
    bind: Option<IpAddr>,
    port: Option<u16>,
) -> Result<HttpRuntimeConfig, ConfigError> {
    let mut builder = HttpRuntimeConfigBuilder::from_env()?;
    if let Some(addr) = bind {
        builder = builder.bind_addr(addr);
    }
    if let Some(port) = port {
        builder = builder.port(port);
    }
    builder.build()
}

/// `smartbiz serve`
pub async fn run_serve(bind: Option<IpAddr>, port: Option<u16>) -> Result<(), CliError> {
    let config = load_config(bind, port)?;
    serve(config).await?;
    Ok(())
}

/// `smartbiz analyze`: one-off analysis printed as pretty JSON
pub async fn run_analyze(content: &str) -> Result<(), CliError> {
    let config = load_config(None, None)?;
    let request = FeedbackAnalysisRequest::new(validate_feedback_content(content)?);
    let runtime = FeedbackRuntime::from_config(&config)?;

    let result = runtime.analyzer.analyze_request(&request).await;
    if result.is_fallback() {
        tracing::warn!("Analysis fell back to the default result");
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// `smartbiz check-config`: validate the environment and print a summary
pub fn run_check_config() -> Result<(), CliError> {
    let config = load_config(None, None)?;
    println!("{}", serde_json::to_string_pretty(&config_summary(&config))?);
    Ok(())
}

/// Effective configuration without secrets
fn config_summary(config: &HttpRuntimeConfig) -> serde_json::Value {
    json!({
        "listen": config.socket_addr().to_string(),
        "frontend_url": config.frontend_url,
        "max_body_size": config.max_body_size,
        "request_timeout_secs": config.request_timeout_secs,
        "rate_limit": {
            "api_per_ip_rpm": config.rate_limit.api_per_ip_rpm,
            "auth_per_ip_rpm": config.rate_limit.auth_per_ip_rpm,
        },
        "analysis": {
            "base_url": config.analysis.base_url,
            "model": config.analysis.model,
            "timeout_secs": config.analysis.timeout_secs,
            "api_key_configured": config.analysis.api_key.is_some(),
        },
        "demo_email": config.demo.email,
    })
}
