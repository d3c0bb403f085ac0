//! Error types for asset orchestration.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for settings persistence.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read or written.
    #[error("settings IO error at '{path}': {source}")]
    Io {
        /// Settings file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Settings file content is not valid.
    #[error("settings format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type for per-asset operations.
#[derive(Debug, Error)]
pub enum MarkbindError {
    /// The markup of an asset is malformed.
    #[error("failed to parse '{path}': {source}")]
    Parse {
        /// Asset source path.
        path: String,
        /// Underlying parse error.
        source: markbind_markup::ParseError,
    },

    /// Code generation failed.
    #[error("generation error: {0}")]
    Codegen(#[from] markbind_codegen::CodegenError),

    /// The asset has no file setting.
    #[error(
        "cannot find '{path}' in the configuration; enable binding generation for this file first"
    )]
    NotConfigured {
        /// Asset source path.
        path: String,
    },

    /// Generation is switched off for the project.
    #[error("binding generation is disabled in the project settings")]
    Disabled,

    /// File system error on a specific path.
    #[error("IO error at '{path}': {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Settings could not be persisted.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl MarkbindError {
    /// Creates a not-configured error.
    pub fn not_configured(path: impl Into<String>) -> Self {
        Self::NotConfigured { path: path.into() }
    }

    /// Creates an IO error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
