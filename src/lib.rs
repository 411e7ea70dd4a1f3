//! # SmartBiz
//!
//! Facade over the SmartBiz feedback service crates.
//!
//! - [`domain`]: feedback analysis, records, storage, analytics, auth, validation
//! - [`http`]: the Axum runtime serving `/api`
//!
//! ```no_run
//! use smartbiz::http::{HttpRuntimeConfigBuilder, serve};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpRuntimeConfigBuilder::from_env()?.build()?;
//! serve(config).await?;
//! # Ok(())
//! # }
//! ```

pub use smartbiz_core as domain;
pub use smartbiz_http as http;

pub use smartbiz_core::{
    Feedback, FeedbackAnalysisResult, FeedbackAnalytics, Sentiment, SentimentAnalyzer,
};
pub use smartbiz_http::{FeedbackRuntime, HttpRuntimeConfig, serve};
