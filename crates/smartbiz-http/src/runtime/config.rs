//! # Environment-Based Configuration
//!
//! Runtime settings are read from environment variables so a deployment can
//! be reconfigured without a rebuild. The CLI loads a `.env` file first when
//! one exists.
//!
//! ## Environment Variables
//!
//! ### Server
//! - `SMARTBIZ_BIND` - Listen address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 5500)
//! - `FRONTEND_URL` - Origin allowed by CORS (default: http://localhost:3200)
//! - `SMARTBIZ_MAX_BODY_SIZE` - Maximum request body size in bytes (default: 10485760 / 10MB)
//! - `SMARTBIZ_REQUEST_TIMEOUT_SECS` - Whole-request timeout in seconds (default: 60)
//!
//! ### Rate Limiting
//! - `SMARTBIZ_RATE_LIMIT_API_PER_IP_RPM` - Requests per minute per IP on `/api` (default: 100)
//! - `SMARTBIZ_RATE_LIMIT_AUTH_PER_IP_RPM` - Requests per minute per IP on auth routes (default: 10)
//!
//! ### Analysis
//! - `OPENAI_API_KEY` - Completion service key. Without it every analysis falls back.
//! - `OPENAI_BASE_URL` - Completion service base URL (default: https://api.openai.com/v1)
//! - `SMARTBIZ_ANALYSIS_MODEL` - Chat model (default: gpt-3.5-turbo)
//! - `SMARTBIZ_ANALYSIS_TIMEOUT_SECS` - Upstream timeout, 1-120 seconds (default: 30)
//!
//! ### Demo Account
//! - `SMARTBIZ_DEMO_EMAIL`, `SMARTBIZ_DEMO_PASSWORD`, `SMARTBIZ_DEMO_TOKEN`
//!
//! ### Logging
//! - `SMARTBIZ_LOG_FORMAT` - `json` or `pretty` (default: json)

use smartbiz_core::analysis::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use smartbiz_core::auth::DemoCredentials;
use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
    time::Duration,
};

use crate::runtime::rate_limit::RateLimitConfig;

/// Upper bound for `SMARTBIZ_ANALYSIS_TIMEOUT_SECS`
pub const MAX_ANALYSIS_TIMEOUT_SECS: u64 = 120;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log output format selected for the CLI subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{other}', expected json or pretty")),
        }
    }
}

/// Completion-service settings
#[derive(Clone, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl AnalysisSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for AnalysisSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisSettings")
            .field("has_api_key", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct HttpRuntimeConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub frontend_url: String,
    pub max_body_size: usize,
    pub request_timeout_secs: u64,
    pub rate_limit: RateLimitConfig,
    pub analysis: AnalysisSettings,
    pub demo: DemoCredentials,
    pub log_format: LogFormat,
}

impl Default for HttpRuntimeConfig {
    fn default() -> Self {
        // Defaults always pass validation
        let builder = HttpRuntimeConfigBuilder::default();
        builder.into_config()
    }
}

impl HttpRuntimeConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Builder for `HttpRuntimeConfig` with environment variable support
#[derive(Debug, Clone)]
pub struct HttpRuntimeConfigBuilder {
    bind_addr: IpAddr,
    port: u16,
    frontend_url: String,
    max_body_size: usize,
    request_timeout_secs: u64,
    rate_limit: RateLimitConfig,
    analysis: AnalysisSettings,
    demo: DemoCredentials,
    log_format: LogFormat,
}

impl Default for HttpRuntimeConfigBuilder {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5500,
            frontend_url: "http://localhost:3200".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout_secs: 60,
            rate_limit: RateLimitConfig::default(),
            analysis: AnalysisSettings::default(),
            demo: DemoCredentials::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl HttpRuntimeConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot be
    /// parsed. Range checks happen in [`build`](Self::build).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::default();

        // Server
        if let Some(addr) = get_env_parsed::<IpAddr>("SMARTBIZ_BIND")? {
            builder = builder.bind_addr(addr);
        }
        if let Some(port) = get_env_parsed::<u16>("PORT")? {
            builder = builder.port(port);
        }
        if let Some(url) = get_env_string("FRONTEND_URL") {
            builder = builder.frontend_url(url);
        }
        if let Some(max_size) = get_env_parsed::<usize>("SMARTBIZ_MAX_BODY_SIZE")? {
            builder = builder.max_body_size(max_size);
        }
        if let Some(timeout) = get_env_parsed::<u64>("SMARTBIZ_REQUEST_TIMEOUT_SECS")? {
            builder = builder.request_timeout_secs(timeout);
        }

        // Rate Limiting
        let mut rate_limit = RateLimitConfig::default();
        if let Some(rpm) = get_env_parsed::<u32>("SMARTBIZ_RATE_LIMIT_API_PER_IP_RPM")? {
            rate_limit.api_per_ip_rpm = rpm;
        }
        if let Some(rpm) = get_env_parsed::<u32>("SMARTBIZ_RATE_LIMIT_AUTH_PER_IP_RPM")? {
            rate_limit.auth_per_ip_rpm = rpm;
        }
        builder = builder.rate_limit(rate_limit);

        // Analysis
        let mut analysis = AnalysisSettings {
            api_key: get_env_string("OPENAI_API_KEY").filter(|key| !key.trim().is_empty()),
            ..AnalysisSettings::default()
        };
        if let Some(base_url) = get_env_string("OPENAI_BASE_URL") {
            analysis.base_url = base_url;
        }
        if let Some(model) = get_env_string("SMARTBIZ_ANALYSIS_MODEL") {
            analysis.model = model;
        }
        if let Some(timeout) = get_env_parsed::<u64>("SMARTBIZ_ANALYSIS_TIMEOUT_SECS")? {
            analysis.timeout_secs = timeout;
        }
        builder = builder.analysis(analysis);

        // Demo Account
        let mut demo = DemoCredentials::default();
        if let Some(email) = get_env_string("SMARTBIZ_DEMO_EMAIL") {
            demo.email = email.trim().to_lowercase();
        }
        if let Some(password) = get_env_string("SMARTBIZ_DEMO_PASSWORD") {
            demo.password = password;
        }
        if let Some(token) = get_env_string("SMARTBIZ_DEMO_TOKEN") {
            demo.token = token;
        }
        builder = builder.demo(demo);

        // Logging
        if let Some(format) = get_env_parsed::<LogFormat>("SMARTBIZ_LOG_FORMAT")? {
            builder = builder.log_format(format);
        }

        Ok(builder)
    }

    /// Set listen address
    #[must_use]
    pub fn bind_addr(mut self, addr: IpAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set listen port
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the origin allowed by CORS
    #[must_use]
    pub fn frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = url.into();
        self
    }

    /// Set maximum request body size in bytes
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set request timeout in seconds
    #[must_use]
    pub fn request_timeout_secs(mut self, timeout: u64) -> Self {
        self.request_timeout_secs = timeout;
        self
    }

    /// Set rate limiting configuration
    #[must_use]
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Set completion-service settings
    #[must_use]
    pub fn analysis(mut self, analysis: AnalysisSettings) -> Self {
        self.analysis = analysis;
        self
    }

    /// Set the demo account
    #[must_use]
    pub fn demo(mut self, demo: DemoCredentials) -> Self {
        self.demo = demo;
        self
    }

    /// Set log output format
    #[must_use]
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Validate configuration and build `HttpRuntimeConfig`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn build(self) -> Result<HttpRuntimeConfig, ConfigError> {
        self.validate()?;
        Ok(self.into_config())
    }

    fn into_config(self) -> HttpRuntimeConfig {
        HttpRuntimeConfig {
            bind_addr: self.bind_addr,
            port: self.port,
            frontend_url: self.frontend_url,
            max_body_size: self.max_body_size,
            request_timeout_secs: self.request_timeout_secs,
            rate_limit: self.rate_limit,
            analysis: self.analysis,
            demo: self.demo,
            log_format: self.log_format,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs > 300 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be <= 300 (5 minutes)".to_string(),
            ));
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_body_size must be greater than 0".to_string(),
            ));
        }
        if self.max_body_size > 100 * 1024 * 1024 {
            return Err(ConfigError::ValidationError(
                "max_body_size must be <= 100MB".to_string(),
            ));
        }

        if self.rate_limit.api_per_ip_rpm == 0 {
            return Err(ConfigError::ValidationError(
                "rate_limit.api_per_ip_rpm must be greater than 0".to_string(),
            ));
        }
        if self.rate_limit.auth_per_ip_rpm == 0 {
            return Err(ConfigError::ValidationError(
                "rate_limit.auth_per_ip_rpm must be greater than 0".to_string(),
            ));
        }

        if self.analysis.timeout_secs == 0 || self.analysis.timeout_secs > MAX_ANALYSIS_TIMEOUT_SECS
        {
            return Err(ConfigError::ValidationError(format!(
                "analysis.timeout_secs must be between 1 and {MAX_ANALYSIS_TIMEOUT_SECS}"
            )));
        }
        // The analysis deadline must fire first so the fallback is stored
        if self.request_timeout_secs <= self.analysis.timeout_secs {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than analysis.timeout_secs".to_string(),
            ));
        }
        if self.analysis.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "analysis.model cannot be empty".to_string(),
            ));
        }
        if !(self.analysis.base_url.starts_with("http://")
            || self.analysis.base_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(
                "analysis.base_url must be an http(s) URL".to_string(),
            ));
        }

        if self.frontend_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "frontend_url cannot be empty".to_string(),
            ));
        }

        if self.demo.token.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "demo.token cannot be empty".to_string(),
            ));
        }
        if self.demo.email.trim().is_empty() || self.demo.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "demo.email and demo.password cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// Environment variable helper functions

fn get_env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn get_env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!(
                    "invalid {} value '{val}': {e}",
                    std::any::type_name::<T>().rsplit("::").next().unwrap_or("value")
                ),
            }),
        Err(_) => Ok(None),
    }
}
