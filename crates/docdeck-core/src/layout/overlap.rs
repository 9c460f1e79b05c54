//! Bounding-box overlap detection and symmetric area redistribution.
//!
//! Resolution works on an indexed working copy of the boxes of one page.
//! Every ordered pair `(i, j)` is visited in index order and an overlapping
//! pair is rewritten in place, so later pairs see the boxes produced by
//! earlier ones. A box touched by several pairs keeps the last write.

use tracing::debug;

use crate::models::config::OverlapStrategy;
use crate::models::element::{BoundingBox, Element};

/// Split the overlap of two boxes evenly between them.
///
/// `first` keeps its top-left corner and loses `ow/2` of width and `oh/2` of
/// height. `second` loses the same amounts and has its top-left corner moved
/// by `(+ow/2, +oh/2)`. Returns `None` when the boxes do not overlap.
/// Dimensions are clamped at zero so degenerate input never yields a
/// negative-size box.
pub fn split_overlap(first: &BoundingBox, second: &BoundingBox) -> Option<(BoundingBox, BoundingBox)> {
    let (ow, oh) = first.overlap_extent(second);
    if ow <= 0.0 || oh <= 0.0 {
        return None;
    }
    let (dw, dh) = (ow / 2.0, oh / 2.0);

    let resized_first = BoundingBox::from_xywh(
        first.x1,
        first.y1,
        (first.width() - dw).max(0.0),
        (first.height() - dh).max(0.0),
    );
    let resized_second = BoundingBox::from_xywh(
        second.x1 + dw,
        second.y1 + dh,
        (second.width() - dw).max(0.0),
        (second.height() - dh).max(0.0),
    );
    Some((resized_first, resized_second))
}

/// Partition box indices into those overlapping at least one other box and
/// the rest. Both lists are in ascending index order.
pub fn partition_overlapping(boxes: &[BoundingBox]) -> (Vec<usize>, Vec<usize>) {
    let mut flagged = vec![false; boxes.len()];
    for i in 0..boxes.len() {
        for j in (i + 1)..boxes.len() {
            if boxes[i].overlaps(&boxes[j]) {
                flagged[i] = true;
                flagged[j] = true;
            }
        }
    }
    (0..boxes.len()).partition(|&i| flagged[i])
}

/// Number of unordered pairs that still overlap.
pub fn count_overlapping_pairs(boxes: &[BoundingBox]) -> usize {
    let mut count = 0;
    for i in 0..boxes.len() {
        for j in (i + 1)..boxes.len() {
            if boxes[i].overlaps(&boxes[j]) {
                count += 1;
            }
        }
    }
    count
}

/// One relaxation pass over every ordered pair. Returns how many pairs were
/// rewritten.
fn relax(boxes: &mut [BoundingBox]) -> usize {
    let mut adjusted = 0;
    for i in 0..boxes.len() {
        for j in 0..boxes.len() {
            if i == j {
                continue;
            }
            if let Some((a, b)) = split_overlap(&boxes[i], &boxes[j]) {
                boxes[i] = a;
                boxes[j] = b;
                adjusted += 1;
            }
        }
    }
    adjusted
}

/// Elements of one page after overlap resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
    /// Elements that overlapped another element, with adjusted boxes.
    pub overlapping: Vec<Element>,
    /// Elements that overlapped nothing, unchanged.
    pub non_overlapping: Vec<Element>,
    /// Relaxation passes that were run.
    pub passes: usize,
}

impl ResolvedPage {
    /// Merge both lists for rendering, adjusted elements first.
    pub fn into_elements(self) -> Vec<Element> {
        let mut elements = self.overlapping;
        elements.extend(self.non_overlapping);
        elements
    }
}

/// Resolves overlapping element boxes on a single page.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapResolver {
    strategy: OverlapStrategy,
}

impl OverlapResolver {
    /// Create a resolver using the given strategy.
    pub fn new(strategy: OverlapStrategy) -> Self {
        Self { strategy }
    }

    /// Detect overlaps among the page's elements and shrink the overlapping
    /// ones. Types and text are never touched; only boxes change.
    pub fn resolve(&self, elements: &[Element]) -> ResolvedPage {
        let boxes: Vec<BoundingBox> = elements.iter().map(|e| e.bbox).collect();
        let (overlapping_idx, free_idx) = partition_overlapping(&boxes);

        let mut working: Vec<BoundingBox> = overlapping_idx.iter().map(|&i| boxes[i]).collect();
        let max_passes = match self.strategy {
            OverlapStrategy::SinglePass => 1,
            OverlapStrategy::FixedPoint { max_passes } => max_passes.max(1),
        };

        let mut passes = 0;
        while passes < max_passes {
            let adjusted = relax(&mut working);
            passes += 1;
            if adjusted == 0 || count_overlapping_pairs(&working) == 0 {
                break;
            }
        }

        let remaining = count_overlapping_pairs(&working);
        if remaining > 0 {
            debug!(
                "{} overlapping pairs remain after {} passes",
                remaining, passes
            );
        }

        let overlapping = overlapping_idx
            .iter()
            .zip(&working)
            .map(|(&i, bbox)| elements[i].with_bbox(*bbox))
            .collect();
        let non_overlapping = free_idx.iter().map(|&i| elements[i].clone()).collect();

        ResolvedPage {
            overlapping,
            non_overlapping,
            passes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::element::ElementKind;
    use pretty_assertions::assert_eq;

    fn element(id: &str, bbox: BoundingBox) -> Element {
        Element {
            id: id.to_string(),
            kind: ElementKind::NarrativeText,
            text: format!("text {}", id),
            page_number: 1,
            bbox,
            layout_width: 1000.0,
            layout_height: 1000.0,
            table_markup: None,
            image_reference: None,
        }
    }

    fn ids(elements: &[Element]) -> Vec<&str> {
        elements.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_split_overlap_formula() {
        let a = BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::from_xywh(5.0, 5.0, 10.0, 10.0);

        let (ra, rb) = split_overlap(&a, &b).unwrap();

        assert_eq!(ra, BoundingBox::new(0.0, 0.0, 7.5, 7.5));
        assert_eq!(rb, BoundingBox::new(7.5, 7.5, 15.0, 15.0));
        assert!(!ra.overlaps(&rb));
        assert_eq!(ra.area(), 7.5 * 7.5);
        assert_eq!(rb.area(), 7.5 * 7.5);
    }

    #[test]
    fn test_split_overlap_none_for_touching() {
        let a = BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::from_xywh(10.0, 0.0, 10.0, 10.0);
        assert_eq!(split_overlap(&a, &b), None);
    }

    #[test]
    fn test_split_overlap_contained_box() {
        let outer = BoundingBox::from_xywh(0.0, 0.0, 100.0, 100.0);
        let inner = BoundingBox::from_xywh(10.0, 10.0, 4.0, 4.0);

        let (shrunk_outer, shrunk_inner) = split_overlap(&outer, &inner).unwrap();

        assert_eq!(shrunk_outer, BoundingBox::new(0.0, 0.0, 98.0, 98.0));
        assert_eq!(shrunk_inner, BoundingBox::new(12.0, 12.0, 14.0, 14.0));
    }

    #[test]
    fn test_non_overlapping_pass_through() {
        let elements = vec![
            element("a", BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0)),
            element("b", BoundingBox::from_xywh(20.0, 0.0, 10.0, 10.0)),
            element("c", BoundingBox::from_xywh(10.0, 0.0, 10.0, 10.0)),
        ];

        let resolved = OverlapResolver::default().resolve(&elements);

        assert!(resolved.overlapping.is_empty());
        assert_eq!(resolved.non_overlapping, elements);
    }

    #[test]
    fn test_every_overlapping_pair_is_reported() {
        let elements = vec![
            element("a", BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0)),
            element("c", BoundingBox::from_xywh(100.0, 0.0, 10.0, 10.0)),
            element("b", BoundingBox::from_xywh(5.0, 5.0, 10.0, 10.0)),
            element("free", BoundingBox::from_xywh(300.0, 300.0, 10.0, 10.0)),
            element("d", BoundingBox::from_xywh(105.0, 5.0, 10.0, 10.0)),
        ];

        let resolved = OverlapResolver::default().resolve(&elements);

        assert_eq!(ids(&resolved.overlapping), vec!["a", "c", "b", "d"]);
        assert_eq!(ids(&resolved.non_overlapping), vec!["free"]);
        assert_eq!(resolved.overlapping[0].bbox, BoundingBox::new(0.0, 0.0, 7.5, 7.5));
        assert_eq!(resolved.overlapping[2].bbox, BoundingBox::new(7.5, 7.5, 15.0, 15.0));
        assert_eq!(resolved.overlapping[1].bbox, BoundingBox::new(100.0, 0.0, 107.5, 7.5));
        assert_eq!(resolved.overlapping[3].bbox, BoundingBox::new(107.5, 7.5, 115.0, 15.0));
    }

    #[test]
    fn test_resolution_keeps_text_and_kind() {
        let elements = vec![
            element("a", BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0)),
            element("b", BoundingBox::from_xywh(5.0, 5.0, 10.0, 10.0)),
        ];

        let resolved = OverlapResolver::default().resolve(&elements);

        for (before, after) in elements.iter().zip(&resolved.overlapping) {
            assert_eq!(before.text, after.text);
            assert_eq!(before.kind, after.kind);
        }
        assert_eq!(resolved.passes, 1);
    }

    #[test]
    fn test_into_elements_puts_adjusted_first() {
        let elements = vec![
            element("free", BoundingBox::from_xywh(50.0, 50.0, 10.0, 10.0)),
            element("a", BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0)),
            element("b", BoundingBox::from_xywh(5.0, 5.0, 10.0, 10.0)),
        ];

        let merged = OverlapResolver::default().resolve(&elements).into_elements();

        assert_eq!(ids(&merged), vec!["a", "b", "free"]);
    }

    #[test]
    fn test_fixed_point_clears_three_way_overlap() {
        let elements = vec![
            element("a", BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0)),
            element("b", BoundingBox::from_xywh(2.0, 2.0, 10.0, 10.0)),
            element("c", BoundingBox::from_xywh(4.0, 4.0, 10.0, 10.0)),
        ];

        let single = OverlapResolver::default().resolve(&elements);
        let boxes: Vec<BoundingBox> = single.overlapping.iter().map(|e| e.bbox).collect();
        assert_eq!(count_overlapping_pairs(&boxes), 1);

        let resolved = OverlapResolver::new(OverlapStrategy::FixedPoint { max_passes: 20 })
            .resolve(&elements);
        let boxes: Vec<BoundingBox> = resolved.overlapping.iter().map(|e| e.bbox).collect();
        assert_eq!(count_overlapping_pairs(&boxes), 0);
        assert_eq!(resolved.passes, 2);
        assert_eq!(boxes[1], BoundingBox::new(6.5, 6.5, 8.5, 8.5));
    }

    #[test]
    fn test_empty_page() {
        let resolved = OverlapResolver::default().resolve(&[]);
        assert!(resolved.overlapping.is_empty());
        assert!(resolved.non_overlapping.is_empty());
    }
}
