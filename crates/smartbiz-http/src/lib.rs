//! # SmartBiz HTTP Runtime
//!
//! Axum server for the SmartBiz feedback service: demo-account
//! authentication, feedback submission with sentiment analysis, per-user
//! listing and analytics.

pub mod runtime;

pub use runtime::*;
