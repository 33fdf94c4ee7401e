// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Batch processing: caption every matching image and copy it under its new name

use serde::Serialize;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::caption::{caption_image, CaptionGenerator};
use crate::config::RenameConfig;
use crate::naming::{generate_name, SynthesizedName};
use crate::Result;

/// What happened to one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Copied,
    WouldCopy,
    CopyFailed(String),
}

/// Record of one processed image
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedImage {
    pub source: PathBuf,
    pub caption: String,
    pub new_name: String,
    pub destination: PathBuf,
    pub outcome: Outcome,
}

/// Result of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Files copied, or that would have been copied in dry-run mode
    pub processed: usize,
    pub dry_run: bool,
    pub output_dir: PathBuf,
    pub images: Vec<ProcessedImage>,
}

/// List regular files in `dir` matching `pattern`, in glob order
pub fn find_images(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    // Only the pattern is a glob; the directory is taken literally
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let full_pattern = Path::new(&escaped_dir).join(pattern);

    let mut images = Vec::new();
    for entry in glob::glob(&full_pattern.to_string_lossy())? {
        match entry {
            Ok(path) if path.is_file() => images.push(path),
            Ok(path) => debug!("Skipping non-file match: {:?}", path),
            Err(e) => error!("Cannot read {:?}: {}", e.path(), e.error()),
        }
    }

    Ok(images)
}

/// Copy a file's bytes, permissions and access/modification times
///
/// Times and permissions are applied through the open destination handle, so
/// a read-only source still yields a complete copy. A destination left
/// half-written by a failure is removed.
pub fn copy_with_metadata(from: &Path, to: &Path) -> io::Result<u64> {
    let mut reader = File::open(from)?;
    let metadata = reader.metadata()?;
    let mut writer = File::create(to)?;

    let copied = io::copy(&mut reader, &mut writer).and_then(|bytes| {
        let times = FileTimes::new()
            .set_accessed(metadata.accessed()?)
            .set_modified(metadata.modified()?);
        writer.set_times(times)?;
        writer.set_permissions(metadata.permissions())?;
        Ok(bytes)
    });

    if copied.is_err() {
        drop(writer);
        if let Err(e) = fs::remove_file(to) {
            warn!("Could not remove partial copy {:?}: {}", to, e);
        }
    }
    copied
}

/// Caption, rename and copy every image in `config.dir` matching `config.pattern`
///
/// Per-file failures are logged and skipped. Errors are returned only for an
/// invalid pattern or an output directory that cannot be created.
pub async fn process_images(
    config: &RenameConfig,
    generator: &dyn CaptionGenerator,
) -> Result<BatchSummary> {
    let images = find_images(&config.dir, &config.pattern)?;
    let output_dir = config.output_path();

    if config.dry_run {
        println!("Would create output directory: {}", output_dir.display());
    } else {
        fs::create_dir_all(&output_dir)?;
        println!("Created output directory: {}", output_dir.display());
    }

    info!("Found {} file(s) matching '{}'", images.len(), config.pattern);

    let mut summary = BatchSummary {
        processed: 0,
        dry_run: config.dry_run,
        output_dir: output_dir.clone(),
        images: Vec::with_capacity(images.len()),
    };

    for source in images {
        let file_name = source.file_name().unwrap_or_default().to_string_lossy().into_owned();
        println!("Processing: {}", file_name);

        let caption = caption_image(generator, &source).await;
        let name = SynthesizedName::new(generate_name(caption.as_str(), config.max_length), &source);
        let new_name = name.file_name();
        let destination = output_dir.join(&new_name);
        let shown = display_relative(&destination, &config.dir);

        println!("  → AI caption: \"{}\"", caption);
        println!("  → New name: {}", new_name);

        let outcome = if config.dry_run {
            summary.processed += 1;
            println!("  → Would copy to: {}", shown);
            Outcome::WouldCopy
        } else {
            match copy_with_metadata(&source, &destination) {
                Ok(bytes) => {
                    summary.processed += 1;
                    debug!("Copied {} bytes to {:?}", bytes, destination);
                    println!("  → Copied to: {}", shown);
                    Outcome::Copied
                }
                Err(e) => {
                    error!("Error copying {:?}: {}", source, e);
                    println!("  Error copying file: {}", e);
                    Outcome::CopyFailed(e.to_string())
                }
            }
        };

        summary.images.push(ProcessedImage {
            source,
            caption: caption.to_string(),
            new_name,
            destination,
            outcome,
        });
    }

    Ok(summary)
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}
