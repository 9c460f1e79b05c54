//! Configuration structures for the chunking, layout and ingestion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DocdeckError, Result};
use crate::services::prompts::DEFAULT_SYSTEM_PROMPT;

/// Main configuration for the docdeck pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocdeckConfig {
    /// Retrieval chunking configuration.
    pub chunking: ChunkingConfig,

    /// Slide layout configuration.
    pub layout: LayoutConfig,

    /// Index document ingestion configuration.
    pub ingest: IngestConfig,

    /// Question answering configuration.
    pub retrieval: RetrievalConfig,
}

/// Chunk builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Word budget for combined text chunks.
    pub max_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_words: 400 }
    }
}

/// How overlapping boxes on a page are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum OverlapStrategy {
    /// One pairwise pass; multi-way overlaps may survive.
    #[default]
    SinglePass,
    /// Repeat the pairwise pass until no pair overlaps or `max_passes` is hit.
    FixedPoint { max_passes: usize },
}

/// Slide layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Slide width in inches.
    pub slide_width: f64,

    /// Slide height in inches.
    pub slide_height: f64,

    /// Largest font size tried when fitting text (points).
    pub max_font_size: u32,

    /// Smallest font size returned when fitting text (points).
    pub min_font_size: u32,

    /// Fill colour of table and missing-image placeholder blocks.
    pub placeholder_color: [u8; 3],

    /// Label written on table placeholders.
    pub table_label: String,

    /// Label written on missing-image placeholders.
    pub image_label: String,

    /// Overlap resolution strategy.
    pub overlap: OverlapStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            slide_width: 13.33,
            slide_height: 7.5,
            max_font_size: 36,
            min_font_size: 6,
            placeholder_color: [192, 192, 192],
            table_label: "TP".to_string(),
            image_label: "IP".to_string(),
            overlap: OverlapStrategy::SinglePass,
        }
    }
}

/// Ingestion configuration for the retrieval path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Folder the extraction collaborator writes image crops into.
    pub image_dir: PathBuf,

    /// Images sent per captioning call.
    pub caption_batch_size: usize,

    /// Separator between descriptions in a combined captioning response.
    pub caption_delimiter: String,

    /// Maximum collaborator calls in flight at once.
    pub max_concurrent_calls: usize,

    /// System prompt used for table summaries.
    pub system_prompt: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("image_blocks"),
            caption_batch_size: 4,
            caption_delimiter: "###".to_string(),
            max_concurrent_calls: 5,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Question answering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Passages requested from the retriever per question.
    pub top_k: usize,

    /// System prompt sent with every answer request.
    pub system_prompt: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 15,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl DocdeckConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_words == 0 {
            return Err(DocdeckError::Config("chunking.max_words must be positive".into()));
        }
        if !(self.layout.slide_width > 0.0 && self.layout.slide_height > 0.0) {
            return Err(DocdeckError::Config(format!(
                "slide size must be positive, got {}x{}",
                self.layout.slide_width, self.layout.slide_height
            )));
        }
        if self.layout.min_font_size > self.layout.max_font_size {
            return Err(DocdeckError::Config(format!(
                "min_font_size {} exceeds max_font_size {}",
                self.layout.min_font_size, self.layout.max_font_size
            )));
        }
        if let OverlapStrategy::FixedPoint { max_passes: 0 } = self.layout.overlap {
            return Err(DocdeckError::Config("overlap.max_passes must be positive".into()));
        }
        if self.ingest.caption_batch_size == 0 {
            return Err(DocdeckError::Config("ingest.caption_batch_size must be positive".into()));
        }
        if self.ingest.max_concurrent_calls == 0 {
            return Err(DocdeckError::Config("ingest.max_concurrent_calls must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DocdeckConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.max_words, 400);
        assert_eq!(config.layout.max_font_size, 36);
        assert_eq!(config.ingest.caption_batch_size, 4);
        assert_eq!(config.retrieval.top_k, 15);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: DocdeckConfig =
            serde_json::from_str(r#"{"chunking": {"max_words": 120}}"#).unwrap();
        assert_eq!(config.chunking.max_words, 120);
        assert_eq!(config.layout.slide_width, 13.33);
        assert_eq!(config.layout.overlap, OverlapStrategy::SinglePass);
    }

    #[test]
    fn test_overlap_strategy_json() {
        let config: DocdeckConfig = serde_json::from_str(
            r#"{"layout": {"overlap": {"mode": "fixed_point", "max_passes": 8}}}"#,
        )
        .unwrap();
        assert_eq!(config.layout.overlap, OverlapStrategy::FixedPoint { max_passes: 8 });
    }

    #[test]
    fn test_validate_rejects_inverted_font_range() {
        let mut config = DocdeckConfig::default();
        config.layout.min_font_size = 40;
        assert!(matches!(config.validate(), Err(DocdeckError::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DocdeckConfig::default();
        config.ingest.max_concurrent_calls = 2;
        config.save(&path).unwrap();

        let loaded = DocdeckConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ingest.max_concurrent_calls, 2);
    }
}
