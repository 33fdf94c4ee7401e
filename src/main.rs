// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! caption-rename: copy images under names generated from local AI captions

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use caption_rename::config::{EngineConfig, RenameConfig, OUTPUT_DIR_NAME};
use caption_rename::{process_images, OllamaCaptioner, Result};

/// Rename images based on AI recognition and save them to a subfolder
#[derive(Parser, Debug)]
#[command(name = "caption-rename")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Rename images based on AI recognition and save to 'Renamed with AI' subfolder", long_about = None)]
struct Cli {
    /// Directory containing images
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// File pattern to match
    #[arg(long, default_value = "*.webp")]
    pattern: String,

    /// Show what would be done without copying any files
    #[arg(long)]
    dry_run: bool,

    /// Ollama server URL
    #[arg(long, default_value = "http://localhost:11434")]
    url: String,

    /// Vision model used for captions
    #[arg(long, default_value = "moondream")]
    model: String,

    /// Maximum length of the generated name (before suffix and extension)
    #[arg(long, default_value = "40")]
    max_length: usize,

    /// Maximum number of tokens in a caption
    #[arg(long, default_value = "30")]
    max_tokens: u32,

    /// Output format for the final report
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long)]
    trace: bool,

    /// Suppress non-essential logging
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn to_config(&self) -> RenameConfig {
        RenameConfig {
            dir: self.dir.clone(),
            pattern: self.pattern.clone(),
            dry_run: self.dry_run,
            max_length: self.max_length,
            output_dir: OUTPUT_DIR_NAME.to_string(),
            engine: EngineConfig {
                url: self.url.clone(),
                model: self.model.clone(),
                max_tokens: self.max_tokens,
                ..EngineConfig::default()
            },
        }
    }

    fn log_filter(&self) -> &'static str {
        if self.trace {
            "trace"
        } else if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_target(false)
        .init();

    let config = cli.to_config();
    config.validate()?;

    if cli.show_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if config.dry_run {
        warn!("DRY RUN MODE - no files will be created");
    }

    println!("Loading AI image captioning model '{}'...", config.engine.model);
    let captioner = OllamaCaptioner::connect(&config.engine).await?;

    println!(
        "\nLooking for images matching '{}' in '{}'",
        config.pattern,
        config.dir.display()
    );
    let summary = process_images(&config, &captioner).await?;
    info!("Batch finished: {} of {} file(s)", summary.processed, summary.images.len());

    if cli.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mode = if config.dry_run { "Would process" } else { "Processed" };
    println!("\n{} {} images.", mode, summary.processed);
    if !config.dry_run && summary.processed > 0 {
        println!("All processed images were saved to the '{}' subfolder.", config.output_dir);
    }
    if config.dry_run {
        println!("Run without --dry-run to actually process the files.");
    }

    Ok(())
}
