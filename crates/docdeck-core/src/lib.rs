//! Core library for turning parsed document elements into slides and
//! retrieval-ready chunks.
//!
//! This crate provides:
//! - Element models and ingestion of partitioner JSON output
//! - Word-budgeted chunking for retrieval
//! - Slide reconstruction (overlap resolution, coordinate scaling, font fitting)
//! - Collaborator traits for completion, captioning and retrieval services
//! - Ingest and question-answering flows built on those traits

pub mod chunking;
pub mod error;
pub mod layout;
pub mod models;
pub mod pipeline;
pub mod services;

pub use chunking::{ChunkBuilder, build_chunks, word_count};
pub use error::{DocdeckError, ElementError, LayoutError, Result, ServiceError};
pub use layout::{
    Canvas, DeckWriter, JsonDeckWriter, LayoutRenderer, OverlapResolver, PlacedShape, RenderedDeck,
    Shape, Slide, fit_text, group_by_page, render_document,
};
pub use models::chunk::{Chunk, ChunkKind, ChunkMetadata};
pub use models::config::{DocdeckConfig, OverlapStrategy};
pub use models::element::{
    BoundingBox, Element, ElementKind, LoadedDocument, load_document, load_elements,
};
pub use pipeline::{Answer, DocumentPipeline, IndexDocument, answer_question, build_index_documents};
pub use services::{CompletionService, ImageCaptioner, ImageInput, RetrievedPassage, Retriever};
