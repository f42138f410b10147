use serde::{Deserialize, Serialize};

/// Rows shown per table page.
pub const PAGE_SIZE: usize = 10;

/// Number of pages needed for `total` rows (`0` when there are no rows).
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// The rows of a 1-based page.
///
/// Out-of-range pages (including page 0) yield an empty slice rather than
/// being clamped; the page selector never offers them.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let Some(start) = page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// One slot in the page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "page")]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Model of the pagination control under the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSelector {
    pub items: Vec<PageItem>,
    pub current: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageSelector {
    /// Always shows the first page, the last page and `current ± 1`; any
    /// skipped run collapses into a single ellipsis.
    pub fn new(current: usize, total_pages: usize) -> Self {
        let mut items = Vec::new();
        let mut last_shown = 0;

        for page in 1..=total_pages {
            let near_current = page + 1 >= current && page <= current.saturating_add(1);
            if page == 1 || page == total_pages || near_current {
                if last_shown > 0 && page - last_shown > 1 {
                    items.push(PageItem::Ellipsis);
                }
                items.push(PageItem::Page(page));
                last_shown = page;
            }
        }

        Self {
            items,
            current,
            total_pages,
            has_previous: current > 1,
            has_next: current < total_pages,
        }
    }

    /// The control is only rendered when there is more than one page.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, PAGE_SIZE), 0);
        assert_eq!(page_count(1, PAGE_SIZE), 1);
        assert_eq!(page_count(10, PAGE_SIZE), 1);
        assert_eq!(page_count(11, PAGE_SIZE), 2);
        assert_eq!(page_count(95, PAGE_SIZE), 10);
    }

    #[test]
    fn test_pages_concatenate_to_whole_collection() {
        for n in [0usize, 1, 9, 10, 11, 25, 100] {
            let items: Vec<usize> = (0..n).collect();
            let pages = page_count(n, PAGE_SIZE);
            let mut joined = Vec::new();
            for p in 1..=pages {
                let slice = page_slice(&items, p, PAGE_SIZE);
                if p < pages {
                    assert_eq!(slice.len(), PAGE_SIZE);
                } else {
                    assert!(!slice.is_empty() && slice.len() <= PAGE_SIZE);
                }
                joined.extend_from_slice(slice);
            }
            assert_eq!(joined, items);
        }
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let items: Vec<usize> = (0..15).collect();
        assert!(page_slice(&items, 0, PAGE_SIZE).is_empty());
        assert!(page_slice(&items, 3, PAGE_SIZE).is_empty());
        assert!(page_slice(&items, usize::MAX, PAGE_SIZE).is_empty());
        assert_eq!(page_slice(&items, 2, PAGE_SIZE), &items[10..15]);
    }

    #[test]
    fn test_selector_small_total_has_no_ellipsis() {
        let selector = PageSelector::new(2, 3);
        assert_eq!(selector.items, vec![Page(1), Page(2), Page(3)]);
        assert!(selector.has_previous);
        assert!(selector.has_next);
    }

    #[test]
    fn test_selector_collapses_middle_pages() {
        let selector = PageSelector::new(5, 10);
        assert_eq!(
            selector.items,
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_selector_at_boundaries() {
        let first = PageSelector::new(1, 10);
        assert_eq!(first.items, vec![Page(1), Page(2), Ellipsis, Page(10)]);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let last = PageSelector::new(10, 10);
        assert_eq!(last.items, vec![Page(1), Ellipsis, Page(9), Page(10)]);
        assert!(last.has_previous);
        assert!(!last.has_next);
    }

    #[test]
    fn test_selector_visibility() {
        assert!(!PageSelector::new(1, 1).is_visible());
        assert!(!PageSelector::new(1, 0).is_visible());
        assert!(PageSelector::new(1, 2).is_visible());
    }
}
