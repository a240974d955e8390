//! Core types shared by every module.
//!
//! - **Errors**: application error type with thiserror derives
//! - **Config**: configuration structures for validation, logging, reporting and tracing

mod config;
mod errors;

pub use config::{
    AccessLogConfig, Config, ObservabilityConfig, PipelineConfig, RemoteSinkConfig,
    ReporterConfig, ValidationConfig,
};
pub use errors::{CoercionError, Error, Result};
