// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for caption-rename

use thiserror::Error;

/// Result type alias for caption-rename operations
pub type Result<T> = std::result::Result<T, RenameError>;

/// caption-rename error types
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Captioning model not available: {0}")]
    ModelUnavailable(String),

    #[error("Caption error: {0}")]
    Caption(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
