// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! caption-rename: copy images under names generated from local AI captions
//!
//! Each image matching a glob is described by a local vision model, the
//! description is turned into a short filesystem-safe stem, and the file is
//! copied into a `Renamed with AI` subfolder as `{stem}_{suffix}{ext}`.
//! Originals are never touched.

pub mod batch;
pub mod caption;
pub mod config;
pub mod error;
pub mod naming;
pub mod ollama;

pub use batch::{process_images, BatchSummary};
pub use caption::{Caption, CaptionGenerator, OllamaCaptioner};
pub use config::RenameConfig;
pub use error::{RenameError, Result};
