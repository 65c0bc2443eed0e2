use std::ops::RangeInclusive;

/// How many page buttons the listing shows at once.
const WINDOW_SIZE: usize = 5;

/// Numbered-page view over the loaded part of the feed.
///
/// Pages past the loaded data exist only while the feed reports more
/// results; selecting one sets [`PageWindow::needs_more`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Current page, one-indexed and clamped to `1..=total_pages`
    pub current: usize,
    pub total_pages: usize,
    pub total_loaded_pages: usize,
    /// Page buttons to display
    pub pages: RangeInclusive<usize>,
    /// The current page is not loaded yet and the feed can load more
    pub needs_more: bool,
    page_size: usize,
}

impl PageWindow {
    pub fn compute(
        loaded_len: usize,
        has_more: bool,
        page_size: usize,
        requested_page: usize,
    ) -> Self {
        let page_size = page_size.max(1);
        let total_loaded_pages = loaded_len.div_ceil(page_size);
        let total_pages = (total_loaded_pages + usize::from(has_more)).max(1);
        let current = requested_page.clamp(1, total_pages);

        let last_window_start = total_pages.saturating_sub(WINDOW_SIZE - 1).max(1);
        let start = current.saturating_sub(2).min(last_window_start).max(1);
        let end = total_pages.min(start + WINDOW_SIZE - 1);

        PageWindow {
            current,
            total_pages,
            total_loaded_pages,
            pages: start..=end,
            needs_more: current > total_loaded_pages && has_more,
            page_size,
        }
    }

    /// Returns the items shown on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.current - 1) * self.page_size).min(items.len());
        let end = (self.current * self.page_size).min(items.len());
        &items[start..end]
    }
}
