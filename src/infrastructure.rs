//! Infrastructure layer for markup extraction, configuration and logging
//!
//! This module provides the HTML extractors, the layered configuration
//! and the tracing setup used by the page data service.

pub mod config; // Layered configuration loading
pub mod logging; // Logging infrastructure
pub mod parsing; // Markup extractors
pub mod parsing_error; // Extraction error types

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, ConfigManager, LoggingConfig};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{DocumentSource, PageDocument, ParsingConfig, ParsingError, ParsingResult, ReadyState};
