//! Configuration types for ctxmap processing.
//!
//! This module provides configuration structures that control how models
//! are written and how strictly validation results are judged. All types
//! implement [`serde::Deserialize`] for flexible loading from external
//! sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining writer and validation settings.
//! - [`WriterConfig`] - Controls the layout of serialized documents.
//! - [`ValidationConfig`] - Controls whether warnings fail a check.
//!
//! # Example
//!
//! ```
//! # use ctxmap::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.writer().indent_width(), 4);
//! assert!(!config.validation().deny_warnings());
//! ```

use serde::Deserialize;

/// Top-level application configuration combining writer and validation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Writer configuration section.
    #[serde(default)]
    writer: WriterConfig,

    /// Validation configuration section.
    #[serde(default)]
    validation: ValidationConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified writer and validation configurations.
    pub fn new(writer: WriterConfig, validation: ValidationConfig) -> Self {
        Self { writer, validation }
    }

    /// Returns the writer configuration.
    pub fn writer(&self) -> &WriterConfig {
        &self.writer
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }
}

/// Layout settings for serialized documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Number of spaces per nesting level.
    indent_width: usize,
}

impl WriterConfig {
    /// Creates a new [`WriterConfig`] indenting by `indent_width` spaces.
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    /// Returns the number of spaces per nesting level.
    pub fn indent_width(&self) -> usize {
        self.indent_width
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

/// Policy applied to validation reports.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Treat warnings as failures.
    deny_warnings: bool,
}

impl ValidationConfig {
    pub fn new(deny_warnings: bool) -> Self {
        Self { deny_warnings }
    }

    /// Returns `true` if warnings fail a check.
    pub fn deny_warnings(&self) -> bool {
        self.deny_warnings
    }
}
