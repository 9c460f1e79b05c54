//! Pixel-to-inch page layout and text fitting.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LayoutError;
use crate::models::config::LayoutConfig;
use crate::models::element::{BoundingBox, Element};

/// English Metric Units per inch, as used by presentation formats.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f64 = 1.2;
/// Average glyph advance as a multiple of the font size.
const CHAR_WIDTH: f64 = 0.6;
const POINTS_PER_INCH: f64 = 72.0;

/// Physical output surface in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    /// Create a canvas, rejecting non-positive sizes.
    pub fn new(width: f64, height: f64) -> Result<Self, LayoutError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(LayoutError::InvalidCanvas { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Shape position and size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Frame in whole EMU as `(left, top, width, height)`.
    pub fn to_emu(&self) -> (i64, i64, i64, i64) {
        let emu = |inches: f64| (inches * EMU_PER_INCH).round() as i64;
        (emu(self.left), emu(self.top), emu(self.width), emu(self.height))
    }
}

/// Pixel-to-inch factors for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageScale {
    pub x: f64,
    pub y: f64,
}

impl PageScale {
    /// Scale a page of `layout_width` x `layout_height` pixels onto `canvas`.
    /// Axes scale independently.
    pub fn new(
        page: u32,
        layout_width: f64,
        layout_height: f64,
        canvas: &Canvas,
    ) -> Result<Self, LayoutError> {
        if !(layout_width > 0.0 && layout_height > 0.0) {
            return Err(LayoutError::InvalidPageSize {
                page,
                width: layout_width,
                height: layout_height,
            });
        }
        Ok(Self {
            x: canvas.width / layout_width,
            y: canvas.height / layout_height,
        })
    }

    /// Map a pixel box onto the canvas.
    pub fn frame(&self, bbox: &BoundingBox) -> Frame {
        let left = bbox.x1.min(bbox.x2);
        let top = bbox.y1.min(bbox.y2);
        let right = bbox.x1.max(bbox.x2);
        let bottom = bbox.y1.max(bbox.y2);
        Frame {
            left: left * self.x,
            top: top * self.y,
            width: (right - left) * self.x,
            height: (bottom - top) * self.y,
        }
    }
}

/// What gets drawn inside a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Solid block with a short label (tables, unresolved images).
    Placeholder { label: String, fill: [u8; 3] },
    /// Bitmap drawn from disk.
    Picture {
        path: PathBuf,
        pixel_width: u32,
        pixel_height: u32,
    },
    /// Word-wrapped text box.
    TextBox {
        text: String,
        font_size: u32,
        word_wrap: bool,
    },
}

/// A shape placed on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedShape {
    pub element_id: String,
    pub frame: Frame,
    pub shape: Shape,
}

/// Largest font size (points) whose estimated footprint fits the box.
///
/// Candidates run from `max_size` down to `min_size`. Height is estimated as
/// `lines * 1.2 * size/72` and width as `chars * 0.6 * size/72`. When nothing
/// fits, `min_size` is returned and the text may overflow.
pub fn fit_text(text: &str, box_width: f64, box_height: f64, max_size: u32, min_size: u32) -> u32 {
    let (lo, hi) = (min_size.min(max_size), min_size.max(max_size));
    let lines = text.matches('\n').count() + 1;
    let chars = text.chars().count();

    for size in (lo..=hi).rev() {
        let inches = size as f64 / POINTS_PER_INCH;
        let height = lines as f64 * LINE_HEIGHT * inches;
        let width = chars as f64 * CHAR_WIDTH * inches;
        if height <= box_height && width <= box_width {
            return size;
        }
    }
    lo
}

/// Bitmap pixel size when `path` names a readable image.
fn probe_image(path: &Path) -> Option<(u32, u32)> {
    if !path.exists() {
        return None;
    }
    match image::image_dimensions(path) {
        Ok(dims) => Some(dims),
        Err(e) => {
            warn!("Unreadable image {}: {}", path.display(), e);
            None
        }
    }
}

/// Places a page's elements onto a canvas.
#[derive(Debug, Clone)]
pub struct LayoutRenderer {
    canvas: Canvas,
    config: LayoutConfig,
}

impl LayoutRenderer {
    /// Create a renderer for the configured slide size.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        let canvas = Canvas::new(config.slide_width, config.slide_height)?;
        Ok(Self { canvas, config })
    }

    /// Canvas shapes are placed on.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Place every element of one page.
    ///
    /// The page size is taken from the first element. Tables become labelled
    /// placeholder blocks, images become pictures when their reference is a
    /// readable bitmap and placeholders otherwise, and everything else becomes
    /// a text box sized with [`fit_text`].
    pub fn render_page(&self, page: u32, elements: &[Element]) -> Result<Vec<PlacedShape>, LayoutError> {
        let Some(first) = elements.first() else {
            return Ok(Vec::new());
        };
        let scale = PageScale::new(page, first.layout_width, first.layout_height, &self.canvas)?;

        let shapes: Vec<PlacedShape> = elements
            .iter()
            .map(|element| self.place(element, &scale))
            .collect();

        debug!(
            "Page {}: placed {} shapes (scale {:.5} x {:.5})",
            page,
            shapes.len(),
            scale.x,
            scale.y
        );
        Ok(shapes)
    }

    fn place(&self, element: &Element, scale: &PageScale) -> PlacedShape {
        let frame = scale.frame(&element.bbox);
        let shape = if element.kind.is_table() {
            self.placeholder(&self.config.table_label)
        } else if element.kind.is_image() {
            let picture = element
                .image_reference
                .as_deref()
                .and_then(|path| probe_image(path).map(|dims| (path, dims)));
            match picture {
                Some((path, (pixel_width, pixel_height))) => Shape::Picture {
                    path: path.to_path_buf(),
                    pixel_width,
                    pixel_height,
                },
                None => {
                    debug!("Image {} not found, using placeholder", element.id);
                    self.placeholder(&self.config.image_label)
                }
            }
        } else {
            Shape::TextBox {
                text: element.text.clone(),
                font_size: fit_text(
                    &element.text,
                    frame.width,
                    frame.height,
                    self.config.max_font_size,
                    self.config.min_font_size,
                ),
                word_wrap: true,
            }
        };

        PlacedShape {
            element_id: element.id.clone(),
            frame,
            shape,
        }
    }

    fn placeholder(&self, label: &str) -> Shape {
        Shape::Placeholder {
            label: label.to_string(),
            fill: self.config.placeholder_color,
        }
    }
}
