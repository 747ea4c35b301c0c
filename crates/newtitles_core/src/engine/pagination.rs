//! Fixed-size pagination over ordered listings.
//!
//! # Responsibility
//! - Slice a listing into 1-based pages.
//! - Track the current page and reset it when the listing changes.
//!
//! # Invariants
//! - `paginate` never fails; out-of-range pages are empty slices.
//! - `page_count` is at least 1, so an empty listing still shows page 1.
//! - `PageCursor::page()` stays within `1..=page_count` of the last clamp.

/// Page size used when none (or zero) is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Upper bound accepted for configured page sizes.
pub const PAGE_SIZE_MAX: usize = 100;

/// Normalizes a requested page size: `0` → default, large values capped.
pub fn normalize_page_size(page_size: usize) -> usize {
    match page_size {
        0 => DEFAULT_PAGE_SIZE,
        value if value > PAGE_SIZE_MAX => PAGE_SIZE_MAX,
        value => value,
    }
}

/// Returns items `[(page-1)*page_size, page*page_size)` clipped to bounds.
///
/// Page `0`, a zero page size, or a page past the end yields an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// `ceil(count / page_size)`, minimum 1.
pub fn page_count(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Current-page state bound to one listing generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
    page_size: usize,
    generation: u64,
}

impl PageCursor {
    /// Creates a cursor on page 1 with a normalized page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: normalize_page_size(page_size),
            generation: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Resets to page 1 when `generation` differs from the last one seen.
    ///
    /// Returns whether a reset happened.
    pub fn observe_listing(&mut self, generation: u64) -> bool {
        if self.generation == generation {
            return false;
        }
        self.generation = generation;
        self.page = 1;
        true
    }

    /// Moves to `requested`, clamped into `1..=page_count(total)`.
    ///
    /// Returns the page actually applied.
    pub fn go_to(&mut self, requested: usize, total: usize) -> usize {
        let last = page_count(total, self.page_size);
        self.page = requested.clamp(1, last);
        self.page
    }

    /// Absolute listing index for a position on the current page.
    pub fn absolute_index(&self, page_relative: usize) -> usize {
        (self.page - 1) * self.page_size + page_relative
    }

    /// Current page of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_page_size, page_count, paginate, PageCursor, DEFAULT_PAGE_SIZE};

    #[test]
    fn normalize_page_size_defaults_and_caps() {
        assert_eq!(normalize_page_size(0), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(25), 25);
        assert_eq!(normalize_page_size(5_000), 100);
    }

    #[test]
    fn paginate_handles_degenerate_inputs() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 0, 2).is_empty());
        assert!(paginate(&items, 1, 0).is_empty());
        assert!(paginate(&items, usize::MAX, usize::MAX).is_empty());
        assert_eq!(paginate(&items, 2, 2), &[3]);
    }

    #[test]
    fn page_count_is_at_least_one() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 1);
    }

    #[test]
    fn cursor_clamps_requested_pages() {
        let mut cursor = PageCursor::new(10);
        assert_eq!(cursor.go_to(9, 25), 3);
        assert_eq!(cursor.go_to(0, 25), 1);
        assert_eq!(cursor.go_to(2, 0), 1);
    }

    #[test]
    fn cursor_resets_only_on_new_generation() {
        let mut cursor = PageCursor::new(10);
        assert!(cursor.observe_listing(1));
        cursor.go_to(3, 30);
        assert!(!cursor.observe_listing(1));
        assert_eq!(cursor.page(), 3);
        assert!(cursor.observe_listing(2));
        assert_eq!(cursor.page(), 1);
    }

    #[test]
    fn absolute_index_accounts_for_page_offset() {
        let mut cursor = PageCursor::new(10);
        cursor.go_to(2, 25);
        assert_eq!(cursor.absolute_index(2), 12);
    }
}
