// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Image captioning using local vision models

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, GenericImageView};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::ollama::OllamaClient;
use crate::{RenameError, Result};

/// Caption text reported when an image cannot be described
pub const UNRECOGNIZED_CAPTION: &str = "unrecognized_image";

/// Longest side sent to the vision model
const MAX_DIMENSION: u32 = 1024;

/// Outcome of captioning one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caption {
    Described(String),
    Unrecognized,
}

impl Caption {
    pub fn as_str(&self) -> &str {
        match self {
            Caption::Described(text) => text,
            Caption::Unrecognized => UNRECOGNIZED_CAPTION,
        }
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can describe an image in free text
#[async_trait]
pub trait CaptionGenerator: Send + Sync {
    /// Name of the backend, for logs
    fn name(&self) -> &str;

    /// Describe the image at `path`
    async fn describe(&self, path: &Path) -> Result<String>;
}

/// Caption an image, substituting [`Caption::Unrecognized`] on any failure
pub async fn caption_image(generator: &dyn CaptionGenerator, path: &Path) -> Caption {
    match generator.describe(path).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                warn!("Empty caption from {} for {:?}", generator.name(), path);
                Caption::Unrecognized
            } else {
                Caption::Described(text.to_string())
            }
        }
        Err(e) => {
            warn!("Error processing {:?}: {}", path, e);
            Caption::Unrecognized
        }
    }
}

/// Decode an image as RGB, shrink it if needed and encode it as JPEG
pub fn prepare_image(path: &Path) -> Result<Vec<u8>> {
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    debug!("Decoded {:?}: {}x{}", path, width, height);

    let img = if width > MAX_DIMENSION || height > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, image::imageops::FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel, and the model expects plain RGB anyway
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    rgb.write_to(&mut cursor, image::ImageFormat::Jpeg)?;

    Ok(buffer)
}

/// Captioner backed by a vision model served by Ollama
pub struct OllamaCaptioner {
    client: OllamaClient,
    model: String,
    prompt: String,
    max_tokens: u32,
}

impl OllamaCaptioner {
    /// Connect to Ollama and make sure the configured model is installed
    ///
    /// This is the one fatal step: without a model there is nothing to do.
    pub async fn connect(config: &EngineConfig) -> Result<Self> {
        let client = OllamaClient::new(&config.url, Duration::from_secs(config.timeout_secs))?;

        info!("Checking Ollama availability at {}...", client.base_url());
        client.health_check().await?;

        if !client.model_available(&config.model).await? {
            return Err(RenameError::ModelUnavailable(format!(
                "model '{}' is not installed. Try: ollama pull {}",
                config.model, config.model
            )));
        }
        info!("Vision model '{}' available", config.model);

        Ok(Self {
            client,
            model: config.model.clone(),
            prompt: config.prompt.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl CaptionGenerator for OllamaCaptioner {
    fn name(&self) -> &str {
        &self.model
    }

    async fn describe(&self, path: &Path) -> Result<String> {
        let image_data = prepare_image(path)?;
        let encoded = general_purpose::STANDARD.encode(&image_data);

        let text = self
            .client
            .generate_with_image(&self.model, &self.prompt, &encoded, self.max_tokens)
            .await?;

        if text.trim().is_empty() {
            return Err(RenameError::Caption("model returned an empty caption".to_string()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl CaptionGenerator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn describe(&self, _path: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    #[async_trait]
    impl CaptionGenerator for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn describe(&self, path: &Path) -> Result<String> {
            Err(RenameError::Caption(format!("cannot read {:?}", path)))
        }
    }

    #[tokio::test]
    async fn test_caption_is_trimmed() {
        let caption = caption_image(&Fixed("  a cat on a mat\n"), Path::new("cat.webp")).await;
        assert_eq!(caption, Caption::Described("a cat on a mat".to_string()));
    }

    #[tokio::test]
    async fn test_failure_becomes_fallback() {
        let caption = caption_image(&Broken, Path::new("missing.webp")).await;
        assert_eq!(caption, Caption::Unrecognized);
        assert_eq!(caption.as_str(), UNRECOGNIZED_CAPTION);
    }

    #[tokio::test]
    async fn test_blank_reply_becomes_fallback() {
        let caption = caption_image(&Fixed("   "), Path::new("x.webp")).await;
        assert_eq!(caption, Caption::Unrecognized);
    }

    #[test]
    fn test_prepare_image_outputs_rgb_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 128]))
            .save(&path)
            .unwrap();

        let bytes = prepare_image(&path).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_prepare_image_downscales_large_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(2048, 512).save(&path).unwrap();

        let bytes = prepare_image(&path).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1024, 256));
    }

    #[test]
    fn test_prepare_image_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.webp");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(prepare_image(&path).is_err());
    }
}
