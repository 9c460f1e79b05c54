//! Word-budgeted chunk builder.

use tracing::{debug, trace};

use super::word_count;
use crate::models::chunk::{Chunk, ChunkKind, ChunkMetadata};
use crate::models::element::Element;

/// Running text accumulator for a combined chunk.
#[derive(Debug, Default)]
struct Accumulator {
    text: String,
    word_count: usize,
    page_number: u32,
}

impl Accumulator {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn push(&mut self, text: &str, words: usize, page_number: u32) {
        if !text.is_empty() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(text);
        }
        self.word_count += words;
        self.page_number = page_number;
    }

    fn take(&mut self, filename: &str) -> Option<Chunk> {
        if self.is_empty() {
            *self = Accumulator::default();
            return None;
        }
        let acc = std::mem::take(self);
        Some(Chunk {
            kind: ChunkKind::Combined,
            text: acc.text,
            word_count: acc.word_count,
            metadata: ChunkMetadata {
                filename: filename.to_string(),
                page_number: acc.page_number,
                table_markup: None,
                image_reference: None,
            },
        })
    }
}

/// Builds retrieval chunks from elements in reading order.
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    max_words: usize,
}

impl ChunkBuilder {
    /// Create a builder with the given word budget.
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    /// Word budget for combined chunks.
    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Group elements into chunks.
    ///
    /// Adjacent text-like elements are merged until adding the next one would
    /// exceed the word budget. Tables and images always become singleton
    /// chunks and flush any pending text first. No element is ever split, so
    /// an element larger than the budget forms its own oversized chunk.
    pub fn build(&self, elements: &[Element], filename: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current = Accumulator::default();

        for element in elements {
            if !element.kind.is_text_like() {
                chunks.extend(current.take(filename));
                chunks.push(singleton_chunk(element, filename));
                continue;
            }

            let words = word_count(&element.text);
            if current.word_count + words > self.max_words && !current.is_empty() {
                trace!(
                    "Flushing chunk at {} words before element {} ({} words)",
                    current.word_count, element.id, words
                );
                chunks.extend(current.take(filename));
            }
            current.push(&element.text, words, element.page_number);
        }
        chunks.extend(current.take(filename));

        debug!(
            "Built {} chunks from {} elements (budget {} words)",
            chunks.len(),
            elements.len(),
            self.max_words
        );

        chunks
    }
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self::new(400)
    }
}

fn singleton_chunk(element: &Element, filename: &str) -> Chunk {
    let kind = if element.kind.is_table() {
        ChunkKind::Table
    } else {
        ChunkKind::Image
    };
    Chunk {
        kind,
        text: element.text.clone(),
        word_count: word_count(&element.text),
        metadata: ChunkMetadata {
            filename: filename.to_string(),
            page_number: element.page_number,
            table_markup: if kind == ChunkKind::Table {
                element.table_markup.clone()
            } else {
                None
            },
            image_reference: if kind == ChunkKind::Image {
                element.image_reference.clone()
            } else {
                None
            },
        },
    }
}

/// Group elements into chunks with the given word budget.
pub fn build_chunks(elements: &[Element], filename: &str, max_words: usize) -> Vec<Chunk> {
    ChunkBuilder::new(max_words).build(elements, filename)
}
