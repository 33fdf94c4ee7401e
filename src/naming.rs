// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Turning captions into filenames

use std::fmt;
use std::path::Path;

use crate::caption::UNRECOGNIZED_CAPTION;

/// Stem used when a caption yields nothing usable
pub const UNNAMED_STEM: &str = "unnamed";

/// Default maximum stem length in characters
pub const DEFAULT_MAX_LENGTH: usize = 40;

/// Length of the random disambiguation suffix
pub const SUFFIX_LEN: usize = 6;

/// Lead-in phrases that carry no information, in match priority order
const BOILERPLATE_PREFIXES: &[&str] = &[
    "a photo of ",
    "an image of ",
    "photo of ",
    "picture of ",
    "this is ",
    "there is ",
];

const ILLEGAL_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Remove the first matching boilerplate prefix from a lowercased caption
pub fn strip_boilerplate(caption: &str) -> &str {
    BOILERPLATE_PREFIXES
        .iter()
        .find_map(|prefix| caption.strip_prefix(prefix))
        .unwrap_or(caption)
}

/// Sanitize text for use as a filename and limit its length
///
/// Words are never cut: once the text is over `max_length`, whole
/// underscore-delimited words are kept while each one plus a separator
/// still fits, and everything after the first word that does not is dropped.
pub fn clean_name(text: &str, max_length: usize) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect::<String>()
        .to_lowercase();

    if cleaned.chars().count() <= max_length {
        return cleaned;
    }

    let mut kept = Vec::new();
    let mut current_length = 0;
    for word in cleaned.split('_') {
        let word_length = word.chars().count();
        if current_length + word_length + 1 > max_length {
            break;
        }
        kept.push(word);
        current_length += word_length + 1;
    }

    kept.join("_")
}

/// Generate a short filename stem from an image caption
pub fn generate_name(caption: &str, max_length: usize) -> String {
    let caption = caption.trim();
    if caption.is_empty() || caption == UNRECOGNIZED_CAPTION {
        return UNNAMED_STEM.to_string();
    }

    let lowered = caption.to_lowercase();
    let stem = clean_name(strip_boilerplate(&lowered), max_length);

    if stem.is_empty() {
        UNNAMED_STEM.to_string()
    } else {
        stem
    }
}

/// Random six-character hex token from a v4 UUID
pub fn unique_suffix() -> String {
    let mut suffix = uuid::Uuid::new_v4().simple().to_string();
    suffix.truncate(SUFFIX_LEN);
    suffix
}

/// Destination filename: stem, disambiguation suffix and original extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedName {
    pub stem: String,
    pub suffix: String,
    /// Original extension with its leading dot, or empty
    pub extension: String,
}

impl SynthesizedName {
    /// Name for `source` with a fresh random suffix
    pub fn new(stem: String, source: &Path) -> Self {
        Self::with_suffix(stem, unique_suffix(), source)
    }

    pub fn with_suffix(stem: String, suffix: String, source: &Path) -> Self {
        let extension = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self { stem, suffix, extension }
    }

    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SynthesizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}{}", self.stem, self.suffix, self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_of_cat() {
        assert_eq!(
            generate_name("A photo of a cat sitting on a mat", DEFAULT_MAX_LENGTH),
            "a_cat_sitting_on_a_mat"
        );
    }

    #[test]
    fn test_empty_and_sentinel_are_unnamed() {
        assert_eq!(generate_name("", DEFAULT_MAX_LENGTH), "unnamed");
        assert_eq!(generate_name("   ", DEFAULT_MAX_LENGTH), "unnamed");
        assert_eq!(generate_name(UNRECOGNIZED_CAPTION, DEFAULT_MAX_LENGTH), "unnamed");
    }

    #[test]
    fn test_every_prefix_is_stripped() {
        for prefix in BOILERPLATE_PREFIXES {
            let caption = format!("{}red bicycle", prefix);
            assert_eq!(generate_name(&caption, DEFAULT_MAX_LENGTH), "red_bicycle", "{}", prefix);
        }
    }

    #[test]
    fn test_only_first_prefix_is_stripped() {
        assert_eq!(strip_boilerplate("this is there is a dog"), "there is a dog");
        assert_eq!(strip_boilerplate("a dog, this is"), "a dog, this is");
    }

    #[test]
    fn test_prefix_must_be_anchored() {
        assert_eq!(
            generate_name("Look, a photo of a bird", DEFAULT_MAX_LENGTH),
            "look,_a_photo_of_a_bird"
        );
    }

    #[test]
    fn test_illegal_characters_removed() {
        let name = generate_name(r#"a "sign" reading <stop|go> 1/2: why?*\"#, DEFAULT_MAX_LENGTH);
        for c in ILLEGAL_CHARS {
            assert!(!name.contains(*c), "{:?} still in {}", c, name);
        }
        assert_eq!(name, "a_sign_reading_stopgo_12_why");
    }

    #[test]
    fn test_long_caption_keeps_whole_words() {
        let caption = "a large group of people standing around a table with plates of food";
        let stem = generate_name(caption, DEFAULT_MAX_LENGTH);
        assert!(stem.chars().count() <= DEFAULT_MAX_LENGTH);
        assert_eq!(stem, "a_large_group_of_people_standing_around");
        // Ends on a word boundary of the full name
        assert!(clean_name(caption, usize::MAX).starts_with(&format!("{}_", stem)));
    }

    #[test]
    fn test_short_caption_untouched() {
        assert_eq!(clean_name("two dogs", 40), "two_dogs");
    }

    #[test]
    fn test_first_word_too_long_falls_back() {
        assert_eq!(clean_name("supercalifragilistic word", 10), "");
        assert_eq!(generate_name("supercalifragilistic word", 10), "unnamed");
    }

    #[test]
    fn test_newlines_become_underscores() {
        assert_eq!(generate_name("a dog\non grass", DEFAULT_MAX_LENGTH), "a_dog_on_grass");
    }

    #[test]
    fn test_generate_name_is_deterministic() {
        let caption = "There is a boat on the lake at sunset";
        assert_eq!(
            generate_name(caption, DEFAULT_MAX_LENGTH),
            generate_name(caption, DEFAULT_MAX_LENGTH)
        );
    }

    #[test]
    fn test_unique_suffix_shape() {
        let a = unique_suffix();
        let b = unique_suffix();
        assert_eq!(a.len(), SUFFIX_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_synthesized_name_preserves_extension_case() {
        let name = SynthesizedName::with_suffix(
            "cat".to_string(),
            "a1b2c3".to_string(),
            Path::new("/pics/IMG_001.WebP"),
        );
        assert_eq!(name.file_name(), "cat_a1b2c3.WebP");

        let bare = SynthesizedName::with_suffix("cat".to_string(), "a1b2c3".to_string(), Path::new("README"));
        assert_eq!(bare.file_name(), "cat_a1b2c3");
    }
}
