//! End-to-end flows built from the chunking, layout and service layers.

mod answer;
mod ingest;

pub use answer::{Answer, answer_question, format_sources};
pub use ingest::{
    IndexDocument, IndexMetadata, build_index_documents, clear_image_dir, encode_image_data_url,
};

use tracing::{info, warn};

use crate::chunking::ChunkBuilder;
use crate::error::Result;
use crate::layout::{RenderedDeck, render_document};
use crate::models::chunk::Chunk;
use crate::models::config::DocdeckConfig;
use crate::models::element::Element;
use crate::services::{CompletionService, ImageCaptioner, Retriever};

/// Configured entry point for chunking, rendering, ingesting and answering.
#[derive(Debug, Clone, Default)]
pub struct DocumentPipeline {
    config: DocdeckConfig,
}

impl DocumentPipeline {
    pub fn new(config: DocdeckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DocdeckConfig {
        &self.config
    }

    /// Group elements into retrieval chunks.
    pub fn chunk(&self, elements: &[Element], filename: &str) -> Vec<Chunk> {
        ChunkBuilder::new(self.config.chunking.max_words).build(elements, filename)
    }

    /// Lay elements out as a slide deck, one slide per page.
    pub fn render_deck(&self, elements: Vec<Element>) -> Result<RenderedDeck> {
        Ok(render_document(elements, &self.config.layout)?)
    }

    /// Chunk a document and turn the chunks into index documents.
    ///
    /// Extracted images are removed from the image folder afterwards; a
    /// failure to clean up is logged and does not fail the ingest.
    pub async fn ingest<C, I>(
        &self,
        filename: &str,
        elements: &[Element],
        completion: &C,
        captioner: &I,
    ) -> Result<Vec<IndexDocument>>
    where
        C: CompletionService,
        I: ImageCaptioner,
    {
        let chunks = self.chunk(elements, filename);
        info!("{}: {} elements -> {} chunks", filename, elements.len(), chunks.len());

        let documents = build_index_documents(&chunks, completion, captioner, &self.config.ingest).await?;

        if let Err(e) = clear_image_dir(&self.config.ingest.image_dir) {
            warn!(
                "Failed to clear image folder {}: {}",
                self.config.ingest.image_dir.display(),
                e
            );
        }
        Ok(documents)
    }

    /// Answer a question from retrieved passages.
    pub async fn answer<R, C>(&self, question: &str, retriever: &R, completion: &C) -> Result<Answer>
    where
        R: Retriever,
        C: CompletionService,
    {
        answer_question(question, retriever, completion, &self.config.retrieval).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::models::chunk::ChunkKind;
    use crate::models::element::{BoundingBox, ElementKind};
    use crate::services::ImageInput;
    use pretty_assertions::assert_eq;
    use std::fs;

    struct Summarizer;

    impl CompletionService for Summarizer {
        async fn complete(&self, _system_prompt: &str, _prompt: &str) -> std::result::Result<String, ServiceError> {
            Ok("table summary".to_string())
        }
    }

    struct Describer;

    impl ImageCaptioner for Describer {
        async fn describe(&self, _instructions: &str, images: &[ImageInput]) -> std::result::Result<String, ServiceError> {
            Ok(vec!["The image shows a chart"; images.len()].join("###"))
        }
    }

    fn element(id: &str, kind: ElementKind, text: &str, page: u32) -> Element {
        Element {
            id: id.to_string(),
            kind,
            text: text.to_string(),
            page_number: page,
            bbox: BoundingBox::new(10.0, 10.0, 110.0, 60.0),
            layout_width: 200.0,
            layout_height: 100.0,
            table_markup: None,
            image_reference: None,
        }
    }

    #[test]
    fn test_chunk_uses_configured_budget() {
        let mut config = DocdeckConfig::default();
        config.chunking.max_words = 3;
        let pipeline = DocumentPipeline::new(config);
        let elements = vec![
            element("a", ElementKind::NarrativeText, "one two", 1),
            element("b", ElementKind::NarrativeText, "three four", 1),
        ];

        let chunks = pipeline.chunk(&elements, "doc.pdf");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "one two");
    }

    #[test]
    fn test_render_deck_one_slide_per_page() {
        let pipeline = DocumentPipeline::default();
        let elements = vec![
            element("a", ElementKind::Title, "Intro", 2),
            element("b", ElementKind::NarrativeText, "Body", 1),
        ];

        let deck = pipeline.render_deck(elements).unwrap();

        let pages: Vec<u32> = deck.slides.iter().map(|s| s.page_number).collect();
        assert_eq!(pages, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_ingest_clears_image_folder() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("figure-1.jpg");
        fs::write(&image_path, b"jpeg").unwrap();

        let mut config = DocdeckConfig::default();
        config.ingest.image_dir = dir.path().to_path_buf();
        let pipeline = DocumentPipeline::new(config);

        let mut figure = element("f", ElementKind::Image, "", 1);
        figure.image_reference = Some(image_path.clone());
        let mut table = element("t", ElementKind::Table, "a b", 1);
        table.table_markup = Some("<table></table>".to_string());
        let elements = vec![
            element("a", ElementKind::NarrativeText, "Quarterly results", 1),
            figure,
            table,
        ];

        let docs = pipeline
            .ingest("report.pdf", &elements, &Summarizer, &Describer)
            .await
            .unwrap();

        let kinds: Vec<ChunkKind> = docs.iter().map(|d| d.metadata.kind).collect();
        assert_eq!(kinds, vec![ChunkKind::Combined, ChunkKind::Image, ChunkKind::Table]);
        assert_eq!(docs[1].text, "The image shows a chart");
        assert_eq!(docs[2].text, "table summary");
        assert!(!image_path.exists());
    }
}
