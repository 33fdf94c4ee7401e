// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Run configuration for caption-rename
//!
//! Everything here is assembled from command-line flags for a single run.
//! Nothing is read from or written to disk.

use serde::Serialize;
use std::path::PathBuf;

use crate::{RenameError, Result};

/// Name of the subfolder (under the scanned directory) that receives copies
pub const OUTPUT_DIR_NAME: &str = "Renamed with AI";

/// Settings for one batch run
#[derive(Debug, Serialize, Clone)]
pub struct RenameConfig {
    /// Directory to scan
    pub dir: PathBuf,

    /// Filename glob, matched inside `dir`
    pub pattern: String,

    /// Log intended actions without touching the filesystem
    pub dry_run: bool,

    /// Maximum stem length in characters
    pub max_length: usize,

    /// Output subfolder name
    pub output_dir: String,

    /// Captioning backend
    pub engine: EngineConfig,
}

/// Vision model settings
#[derive(Debug, Serialize, Clone)]
pub struct EngineConfig {
    pub url: String,
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

// Default value functions
fn default_dir() -> PathBuf { PathBuf::from(".") }
fn default_pattern() -> String { "*.webp".to_string() }
fn default_max_length() -> usize { 40 }
fn default_output_dir() -> String { OUTPUT_DIR_NAME.to_string() }
fn default_max_tokens() -> u32 { 30 }
fn default_timeout() -> u64 { 120 }
fn default_url() -> String { "http://localhost:11434".to_string() }
fn default_model() -> String { "moondream".to_string() }

fn default_prompt() -> String {
    "Describe this image in one short sentence.".to_string()
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            pattern: default_pattern(),
            dry_run: false,
            max_length: default_max_length(),
            output_dir: default_output_dir(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
            prompt: default_prompt(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
        }
    }
}

impl RenameConfig {
    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.pattern.trim().is_empty() {
            return Err(RenameError::Config("pattern must not be empty".to_string()));
        }
        glob::Pattern::new(&self.pattern)?;
        if self.max_length == 0 {
            return Err(RenameError::Config("max_length must be at least 1".to_string()));
        }
        if self.output_dir.is_empty() || self.output_dir.contains(['/', '\\']) {
            return Err(RenameError::Config(format!(
                "output directory must be a single folder name, got {:?}",
                self.output_dir
            )));
        }
        if self.engine.max_tokens == 0 {
            return Err(RenameError::Config("max_tokens must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Full path of the output subfolder
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(&self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_surface() {
        let config = RenameConfig::default();
        assert_eq!(config.dir, PathBuf::from("."));
        assert_eq!(config.pattern, "*.webp");
        assert!(!config.dry_run);
        assert_eq!(config.max_length, 40);
        assert_eq!(config.engine.max_tokens, 30);
        assert_eq!(config.output_path(), PathBuf::from("./Renamed with AI"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_length() {
        let config = RenameConfig { max_length: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(RenameError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_nested_output_dir() {
        let config = RenameConfig { output_dir: "a/b".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let config = RenameConfig { pattern: "[*.webp".to_string(), ..Default::default() };
        assert!(matches!(config.validate(), Err(RenameError::Pattern(_))));
    }

    #[test]
    fn test_serializes_for_display() {
        let json = serde_json::to_value(RenameConfig::default()).unwrap();
        assert_eq!(json["pattern"], "*.webp");
        assert_eq!(json["output_dir"], "Renamed with AI");
        assert_eq!(json["engine"]["model"], "moondream");
    }
}
