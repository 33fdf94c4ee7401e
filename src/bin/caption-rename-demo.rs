// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! caption-rename demo
//!
//! Previews what caption-rename would do to a directory. Always runs in
//! dry-run mode, so no files are created or modified.

use anyhow::Context;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use tokio::signal;

use caption_rename::config::{EngineConfig, RenameConfig};
use caption_rename::{process_images, BatchSummary, OllamaCaptioner, RenameError};

#[derive(Parser, Debug)]
#[command(name = "caption-rename-demo")]
#[command(version)]
#[command(about = "Preview AI image renaming without touching any files")]
struct Args {
    /// Directory containing images
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// File pattern to match
    #[arg(long, default_value = "*.webp")]
    pattern: String,

    /// Ollama server URL
    #[arg(long, default_value = "http://localhost:11434")]
    url: String,

    /// Vision model used for captions
    #[arg(long, default_value = "moondream")]
    model: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

/// Wait for Enter; `false` if the user pressed Ctrl+C or stdin closed
async fn confirm() -> anyhow::Result<bool> {
    let read_line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).map(|n| n > 0)
    });

    tokio::select! {
        answer = read_line => Ok(answer.context("prompt task failed")??),
        _ = signal::ctrl_c() => Ok(false),
    }
}

/// Connect to the model, printing install hints if it is missing, then preview
async fn preview(config: &RenameConfig) -> anyhow::Result<Option<BatchSummary>> {
    println!("Checking dependencies...");
    let captioner = match OllamaCaptioner::connect(&config.engine).await {
        Ok(captioner) => captioner,
        Err(RenameError::ModelUnavailable(reason)) => {
            println!("Missing dependency: {}", reason);
            println!("Install Ollama from https://ollama.com and start it with: ollama serve");
            println!("Then install the model with: ollama pull {}", config.engine.model);
            return Ok(None);
        }
        Err(e) => return Err(e).context("failed to load captioning model"),
    };
    println!("All dependencies are installed.");

    println!("\nRunning the image analyzer in demonstration mode...\n");
    Ok(Some(process_images(config, &captioner).await?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_target(false)
        .init();

    let config = RenameConfig {
        dir: args.dir,
        pattern: args.pattern,
        dry_run: true,
        engine: EngineConfig {
            url: args.url,
            model: args.model,
            ..EngineConfig::default()
        },
        ..RenameConfig::default()
    };
    config.validate()?;

    println!("AI Image Recognition and Naming Demo");
    println!("====================================");
    println!("This demo shows how images would be analyzed and saved with");
    println!("AI-generated descriptive names to a '{}' subfolder.", config.output_dir);
    println!("This is a preview only - no files will be created or modified.");
    println!();

    if !args.yes {
        println!("Press Enter to continue or Ctrl+C to cancel...");
        if !confirm().await? {
            println!("\nDemo cancelled.");
            return Ok(());
        }
    }

    // Once the prompt has installed a Ctrl+C handler the default one is gone,
    // so everything after it must listen for the signal itself
    let summary = tokio::select! {
        summary = preview(&config) => match summary? {
            Some(summary) => summary,
            None => return Ok(()),
        },
        _ = signal::ctrl_c() => {
            println!("\nDemo interrupted.");
            return Ok(());
        }
    };

    println!("\nWould process {} images.", summary.processed);
    println!("\nDemo completed. To actually process your files, run:");
    println!("caption-rename --dir {}", config.dir.display());
    println!();
    println!("This will create a '{}' subfolder with copies of your images", config.output_dir);
    println!("renamed according to their content. Your original files will be preserved.");
    println!();
    println!("See caption-rename --help for more options.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["caption-rename-demo"]).unwrap();
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.pattern, "*.webp");
        assert!(!args.yes);
    }

    #[tokio::test]
    async fn test_preview_stops_without_backend() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.webp"), b"a").unwrap();
        let config = RenameConfig {
            dir: dir.path().to_path_buf(),
            dry_run: true,
            engine: EngineConfig {
                // Nothing listens on port 1, so the connection is refused at once
                url: "http://127.0.0.1:1".to_string(),
                ..EngineConfig::default()
            },
            ..RenameConfig::default()
        };

        let summary = preview(&config).await.unwrap();

        assert!(summary.is_none());
        assert!(!config.output_path().exists());
    }
}
