//! Extracted document elements and their page geometry.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ElementError, Result};

/// Element type reported by the extraction collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Title,
    NarrativeText,
    ListItem,
    UncategorizedText,
    Header,
    Footer,
    FigureCaption,
    Formula,
    Address,
    EmailAddress,
    CodeSnippet,
    PageNumber,
    PageBreak,
    /// Table region; carries HTML-like markup.
    Table,
    /// Image region; carries a reference to the extracted bitmap.
    Image,
    /// Any other type name, treated as text.
    Other(String),
}

impl ElementKind {
    /// Type name as written by the extraction collaborator.
    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Title => "Title",
            ElementKind::NarrativeText => "NarrativeText",
            ElementKind::ListItem => "ListItem",
            ElementKind::UncategorizedText => "UncategorizedText",
            ElementKind::Header => "Header",
            ElementKind::Footer => "Footer",
            ElementKind::FigureCaption => "FigureCaption",
            ElementKind::Formula => "Formula",
            ElementKind::Address => "Address",
            ElementKind::EmailAddress => "EmailAddress",
            ElementKind::CodeSnippet => "CodeSnippet",
            ElementKind::PageNumber => "PageNumber",
            ElementKind::PageBreak => "PageBreak",
            ElementKind::Table => "Table",
            ElementKind::Image => "Image",
            ElementKind::Other(name) => name,
        }
    }

    /// Check if this is a table element.
    pub fn is_table(&self) -> bool {
        matches!(self, ElementKind::Table)
    }

    /// Check if this is an image element.
    pub fn is_image(&self) -> bool {
        matches!(self, ElementKind::Image)
    }

    /// Everything that is neither a table nor an image.
    pub fn is_text_like(&self) -> bool {
        !self.is_table() && !self.is_image()
    }
}

impl From<String> for ElementKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Title" => ElementKind::Title,
            "NarrativeText" => ElementKind::NarrativeText,
            "ListItem" => ElementKind::ListItem,
            "UncategorizedText" => ElementKind::UncategorizedText,
            "Header" => ElementKind::Header,
            "Footer" => ElementKind::Footer,
            "FigureCaption" => ElementKind::FigureCaption,
            "Formula" => ElementKind::Formula,
            "Address" => ElementKind::Address,
            "EmailAddress" => ElementKind::EmailAddress,
            "CodeSnippet" => ElementKind::CodeSnippet,
            "PageNumber" => ElementKind::PageNumber,
            "PageBreak" => ElementKind::PageBreak,
            "Table" => ElementKind::Table,
            "Image" => ElementKind::Image,
            _ => ElementKind::Other(name),
        }
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned box given by its top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create from corner coordinates.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create from top-left corner and size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Smallest box containing every point.
    pub fn from_points(points: &[[f64; 2]]) -> Option<Self> {
        let first = points.first()?;
        let init = Self::new(first[0], first[1], first[0], first[1]);
        Some(points.iter().fold(init, |b, p| {
            Self::new(b.x1.min(p[0]), b.y1.min(p[1]), b.x2.max(p[0]), b.y2.max(p[1]))
        }))
    }

    /// Get the width of the box.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Get the height of the box.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Get the area of the box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Width and height of the intersection, zero on an axis without overlap.
    pub fn overlap_extent(&self, other: &BoundingBox) -> (f64, f64) {
        let ow = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let oh = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        (ow, oh)
    }

    /// True when both axis projections intersect with positive length.
    /// Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        let (ow, oh) = self.overlap_extent(other);
        ow > 0.0 && oh > 0.0
    }

    /// The four corners in the extraction collaborator's winding order:
    /// top-left, bottom-left, bottom-right, top-right.
    pub fn corner_points(&self) -> [[f64; 2]; 4] {
        [
            [self.x1, self.y1],
            [self.x1, self.y2],
            [self.x2, self.y2],
            [self.x2, self.y1],
        ]
    }
}

/// One extracted unit of document content.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Identifier within the document.
    pub id: String,
    /// Element type.
    pub kind: ElementKind,
    /// Raw text, empty for pure images.
    pub text: String,
    /// Source page (1-based).
    pub page_number: u32,
    /// Box in page-pixel coordinates.
    pub bbox: BoundingBox,
    /// Page width in pixels.
    pub layout_width: f64,
    /// Page height in pixels.
    pub layout_height: f64,
    /// HTML-like markup for tables.
    pub table_markup: Option<String>,
    /// Path to the extracted bitmap for images.
    pub image_reference: Option<PathBuf>,
}

impl Element {
    /// Copy of this element placed at a new box.
    pub fn with_bbox(&self, bbox: BoundingBox) -> Self {
        Self {
            bbox,
            ..self.clone()
        }
    }
}

/// Element record as produced by the extraction collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedElement {
    #[serde(rename = "type")]
    pub element_type: ElementKind,
    #[serde(default)]
    pub element_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: ExtractedMetadata,
}

/// Metadata block of an extraction record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<ExtractedCoordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_as_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Corner points plus the page pixel size they refer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedCoordinates {
    pub points: Vec<[f64; 2]>,
    pub layout_width: f64,
    pub layout_height: f64,
}

impl TryFrom<ExtractedElement> for Element {
    type Error = ElementError;

    fn try_from(record: ExtractedElement) -> std::result::Result<Self, Self::Error> {
        let ExtractedElement {
            element_type,
            element_id,
            text,
            metadata,
        } = record;

        let coordinates = metadata.coordinates.ok_or_else(|| ElementError::MissingCoordinates {
            id: element_id.clone(),
        })?;
        if coordinates.points.len() < 4 {
            return Err(ElementError::IncompletePoints {
                id: element_id,
                count: coordinates.points.len(),
            });
        }
        let bbox = BoundingBox::from_points(&coordinates.points).ok_or_else(|| {
            ElementError::IncompletePoints {
                id: element_id.clone(),
                count: 0,
            }
        })?;

        Ok(Element {
            id: element_id,
            kind: element_type,
            text,
            page_number: metadata.page_number.unwrap_or(1),
            bbox,
            layout_width: coordinates.layout_width,
            layout_height: coordinates.layout_height,
            table_markup: metadata.text_as_html,
            image_reference: metadata.image_path,
        })
    }
}

/// Elements of one document plus the source name the extractor recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    /// First `metadata.filename` found among the records.
    pub filename: Option<String>,
    pub elements: Vec<Element>,
}

/// Parse a JSON array of extraction records into a document.
pub fn load_document<R: Read>(reader: R) -> Result<LoadedDocument> {
    let records: Vec<ExtractedElement> = serde_json::from_reader(reader)?;
    let mut filename = None;
    let mut elements = Vec::with_capacity(records.len());
    for mut record in records {
        if filename.is_none() {
            filename = record.metadata.filename.take();
        }
        elements.push(Element::try_from(record)?);
    }
    Ok(LoadedDocument { filename, elements })
}

/// Parse a JSON array of extraction records into elements.
pub fn load_elements<R: Read>(reader: R) -> Result<Vec<Element>> {
    Ok(load_document(reader)?.elements)
}
