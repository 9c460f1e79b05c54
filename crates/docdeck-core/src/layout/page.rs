//! Grouping of elements by source page.

use std::collections::BTreeMap;

use crate::models::element::Element;

/// Elements of one source page in extraction order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup {
    pub page_number: u32,
    pub elements: Vec<Element>,
}

/// Group elements by page number, pages ascending.
///
/// Extraction order is kept within each page and no element is dropped.
pub fn group_by_page<I>(elements: I) -> Vec<PageGroup>
where
    I: IntoIterator<Item = Element>,
{
    let mut pages: BTreeMap<u32, Vec<Element>> = BTreeMap::new();
    for element in elements {
        pages.entry(element.page_number).or_default().push(element);
    }
    pages
        .into_iter()
        .map(|(page_number, elements)| PageGroup {
            page_number,
            elements,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::element::{BoundingBox, ElementKind};
    use pretty_assertions::assert_eq;

    fn element(id: &str, page: u32) -> Element {
        Element {
            id: id.to_string(),
            kind: ElementKind::NarrativeText,
            text: String::new(),
            page_number: page,
            bbox: BoundingBox::from_xywh(0.0, 0.0, 1.0, 1.0),
            layout_width: 10.0,
            layout_height: 10.0,
            table_markup: None,
            image_reference: None,
        }
    }

    #[test]
    fn test_group_by_page_sorted_and_stable() {
        let elements = vec![
            element("c", 3),
            element("a1", 1),
            element("c2", 3),
            element("a2", 1),
            element("b", 2),
        ];

        let pages = group_by_page(elements);

        let layout: Vec<(u32, Vec<&str>)> = pages
            .iter()
            .map(|p| (p.page_number, p.elements.iter().map(|e| e.id.as_str()).collect()))
            .collect();
        assert_eq!(
            layout,
            vec![
                (1, vec!["a1", "a2"]),
                (2, vec!["b"]),
                (3, vec!["c", "c2"]),
            ]
        );
    }

    #[test]
    fn test_group_by_page_empty() {
        assert!(group_by_page(Vec::new()).is_empty());
    }
}
