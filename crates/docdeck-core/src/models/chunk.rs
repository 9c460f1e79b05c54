//! Retrieval chunks built from extracted elements.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkKind {
    /// One or more adjacent text-like elements.
    #[serde(rename = "COMBINED_ELEMENT")]
    Combined,
    /// Exactly one table element.
    Table,
    /// Exactly one image element.
    Image,
}

impl ChunkKind {
    /// Name written into index metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Combined => "COMBINED_ELEMENT",
            ChunkKind::Table => "Table",
            ChunkKind::Image => "Image",
        }
    }
}

/// Chunk metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source document name.
    pub filename: String,
    /// Page of the last constituent element.
    pub page_number: u32,
    /// Table markup (table chunks only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_markup: Option<String>,
    /// Bitmap reference (image chunks only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<PathBuf>,
}

/// A retrieval unit of one or more elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    pub text: String,
    pub word_count: usize,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Flat metadata mapping handed to the indexing collaborator.
    pub fn index_metadata(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("filename".into(), Value::from(self.metadata.filename.clone()));
        map.insert("page_number".into(), Value::from(self.metadata.page_number));
        map.insert("type".into(), Value::from(self.kind.as_str()));
        if let Some(markup) = &self.metadata.table_markup {
            map.insert("table_markup".into(), Value::from(markup.clone()));
        }
        if let Some(path) = &self.metadata.image_reference {
            map.insert(
                "image_reference".into(),
                Value::from(path.to_string_lossy().into_owned()),
            );
        }
        map
    }
}
