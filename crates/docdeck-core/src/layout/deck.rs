//! Rendered slide decks and the writer seam to presentation formats.

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::render::{Canvas, PlacedShape};
use crate::error::LayoutError;

/// One slide per source page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub page_number: u32,
    pub shapes: Vec<PlacedShape>,
}

/// Ordered slides sharing one canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDeck {
    pub canvas: Canvas,
    pub slides: Vec<Slide>,
}

impl RenderedDeck {
    /// Total number of shapes over all slides.
    pub fn shape_count(&self) -> usize {
        self.slides.iter().map(|s| s.shapes.len()).sum()
    }
}

/// Serializes a rendered deck into an output format.
pub trait DeckWriter {
    /// Write the deck to `out`.
    fn write_deck(&self, deck: &RenderedDeck, out: &mut dyn Write) -> Result<(), LayoutError>;
}

/// Writes the deck as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDeckWriter {
    pub pretty: bool,
}

impl DeckWriter for JsonDeckWriter {
    fn write_deck(&self, deck: &RenderedDeck, out: &mut dyn Write) -> Result<(), LayoutError> {
        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, deck)
        } else {
            serde_json::to_writer(&mut *out, deck)
        };
        result.map_err(|e| LayoutError::Write(e.to_string()))?;
        out.flush().map_err(|e| LayoutError::Write(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::render::{Frame, Shape};

    #[test]
    fn test_json_writer() {
        let deck = RenderedDeck {
            canvas: Canvas {
                width: 13.33,
                height: 7.5,
            },
            slides: vec![Slide {
                page_number: 1,
                shapes: vec![PlacedShape {
                    element_id: "e1".to_string(),
                    frame: Frame {
                        left: 0.0,
                        top: 0.0,
                        width: 1.0,
                        height: 1.0,
                    },
                    shape: Shape::TextBox {
                        text: "hi".to_string(),
                        font_size: 12,
                        word_wrap: true,
                    },
                }],
            }],
        };

        let mut buf = Vec::new();
        JsonDeckWriter::default().write_deck(&deck, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["slides"][0]["shapes"][0]["shape"]["kind"], "text_box");
        assert_eq!(value["slides"][0]["shapes"][0]["shape"]["font_size"], 12u32);

        let parsed: RenderedDeck = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, deck);
        assert_eq!(parsed.shape_count(), 1);
    }
}
