//! Client-side pagination over an ordered slice.

use serde::{Deserialize, Serialize};

use crate::error::{OatrackError, Result};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One bounded slice of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number, always within `1..=page_count`.
    pub page: usize,
    /// Never zero, even for an empty input.
    pub page_count: usize,
    /// Length of the whole input.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// Whether prev/next controls are worth showing at all.
    pub fn shows_controls(&self) -> bool {
        self.page_count > 1
    }
}

/// Number of pages `total` items occupy, at least one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Clamps a requested page number into `1..=page_count`.
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

/// Slices `items` into page `page` of `page_size` rows.
///
/// Out-of-range page numbers are clamped, so this never reads past the end
/// of `items`.
///
/// # Errors
///
/// Returns `OatrackError::Validation` when `page_size` is zero.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Result<Page<T>> {
    if page_size == 0 {
        return Err(OatrackError::validation(
            "page_size",
            "page size must be greater than zero",
        ));
    }

    let total = items.len();
    let page_count = page_count(total, page_size);
    let page = clamp_page(page, page_count);

    let start = ((page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);

    Ok(Page {
        items: items[start..end].to_vec(),
        page,
        page_count,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_items_two_pages() {
        let items: Vec<u32> = (1..=12).collect();

        let first = paginate(&items, 10, 1).unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.page_count, 2);
        assert!(!first.has_prev());
        assert!(first.has_next());

        let second = paginate(&items, 10, 2).unwrap();
        assert_eq!(second.items, vec![11, 12]);
        assert_eq!(second.page_count, 2);
        assert!(second.has_prev());
        assert!(!second.has_next());
    }

    #[test]
    fn test_empty_input_never_errors() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 10, 1).unwrap();

        assert!(page.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total, 0);
        assert!(!page.shows_controls());
    }

    #[test]
    fn test_pages_reconstruct_input() {
        let items: Vec<u32> = (0..37).collect();

        for page_size in [1, 3, 10, 36, 37, 50] {
            let count = paginate(&items, page_size, 1).unwrap().page_count;
            let mut rebuilt = Vec::new();
            for page in 1..=count {
                rebuilt.extend(paginate(&items, page_size, page).unwrap().items);
            }
            assert_eq!(rebuilt, items, "page_size {}", page_size);
        }
    }

    #[test]
    fn test_out_of_range_pages_are_clamped() {
        let items: Vec<u32> = (1..=12).collect();

        let zero = paginate(&items, 10, 0).unwrap();
        assert_eq!(zero.page, 1);
        assert_eq!(zero.items.len(), 10);

        let beyond = paginate(&items, 10, 99).unwrap();
        assert_eq!(beyond.page, 2);
        assert_eq!(beyond.items, vec![11, 12]);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let items = vec![1, 2, 3];
        let err = paginate(&items, 0, 1).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let items: Vec<u32> = (0..20).collect();
        let page = paginate(&items, 10, 1).unwrap();
        assert_eq!(page.page_count, 2);
    }
}
