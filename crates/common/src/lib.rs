//! Shared configuration and error types for the postbox service.

pub mod config;
pub mod error;

pub use config::{AdminConfig, AdmissionConfig, AppConfig, ServerConfig};
pub use error::{PostboxError, PostboxResult};
