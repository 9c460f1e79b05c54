//! Slide reconstruction: page grouping, overlap resolution and layout.

mod deck;
mod overlap;
mod page;
mod render;

pub use deck::{DeckWriter, JsonDeckWriter, RenderedDeck, Slide};
pub use overlap::{
    OverlapResolver, ResolvedPage, count_overlapping_pairs, partition_overlapping, split_overlap,
};
pub use page::{PageGroup, group_by_page};
pub use render::{
    Canvas, EMU_PER_INCH, Frame, LayoutRenderer, PageScale, PlacedShape, Shape, fit_text,
};

use rayon::prelude::*;
use tracing::info;

use crate::error::LayoutError;
use crate::models::config::LayoutConfig;
use crate::models::element::Element;

/// Render every page of a document into a slide deck.
///
/// Elements are grouped by page; each page is resolved for overlaps and laid
/// out independently of the others, so pages are processed in parallel.
/// Slides come back in ascending page order.
pub fn render_document(elements: Vec<Element>, config: &LayoutConfig) -> Result<RenderedDeck, LayoutError> {
    let renderer = LayoutRenderer::new(config.clone())?;
    let resolver = OverlapResolver::new(config.overlap);
    let pages = group_by_page(elements);

    info!("Rendering {} pages", pages.len());

    let slides = pages
        .into_par_iter()
        .map(|page| -> Result<Slide, LayoutError> {
            let resolved = resolver.resolve(&page.elements);
            info!(
                "Processing page {}: {} overlapping, {} free",
                page.page_number,
                resolved.overlapping.len(),
                resolved.non_overlapping.len()
            );
            let shapes = renderer.render_page(page.page_number, &resolved.into_elements())?;
            Ok(Slide {
                page_number: page.page_number,
                shapes,
            })
        })
        .collect::<Result<Vec<_>, LayoutError>>()?;

    Ok(RenderedDeck {
        canvas: renderer.canvas(),
        slides,
    })
}
