//! Pagination utilities for list endpoints

use serde::Serialize;

/// Page size applied when the client does not send a limit
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on client-supplied limits
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination metadata returned alongside paged results.
///
/// The requested page is reported unchanged even when it is past the end;
/// an out-of-range page returns an empty result list with `has_next` false.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Sanitize client paging input into (page, limit, offset)
pub fn sanitize(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;
    (page, limit, offset)
}

/// Compute page metadata from the total result count
pub fn page_meta(total: i64, page: i64, limit: i64) -> PageMeta {
    let total_pages = (total + limit - 1) / limit;
    PageMeta {
        current_page: page,
        total_pages,
        total,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_defaults() {
        let (page, limit, offset) = sanitize(None, None);
        assert_eq!(page, 1);
        assert_eq!(limit, DEFAULT_PAGE_SIZE);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_sanitize_clamps() {
        let (page, limit, offset) = sanitize(Some(0), Some(1000));
        assert_eq!(page, 1);
        assert_eq!(limit, MAX_PAGE_SIZE);
        assert_eq!(offset, 0);

        let (page, _, offset) = sanitize(Some(3), Some(10));
        assert_eq!(page, 3);
        assert_eq!(offset, 20);
    }

    #[test]
    fn test_page_meta_normal() {
        let meta = page_meta(25, 2, 10);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total, 25);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_page_meta_first_and_last() {
        let meta = page_meta(25, 1, 10);
        assert!(meta.has_next);
        assert!(!meta.has_prev);

        let meta = page_meta(25, 3, 10);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_page_meta_out_of_range_not_clamped() {
        let meta = page_meta(25, 99, 10);
        assert_eq!(meta.current_page, 99);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_page_meta_empty() {
        let meta = page_meta(0, 1, 10);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }
}
