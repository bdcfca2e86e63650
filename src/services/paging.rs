//! Page-number pagination shared by list endpoints.

use serde::Serialize;

/// One page of results plus the numbers a pager needs.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Resolved window for a 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub total_pages: usize,
    pub offset: usize,
    pub limit: usize,
}

impl PageWindow {
    /// Clamp `requested` into `1..=total_pages` (page 1 when there are no rows).
    #[must_use]
    pub fn resolve(requested: Option<usize>, per_page: usize, total: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total.div_ceil(per_page);
        let page = requested.unwrap_or(1).clamp(1, total_pages.max(1));
        Self { page, total_pages, offset: (page - 1) * per_page, limit: per_page }
    }

    #[must_use]
    pub fn into_page<T>(self, items: Vec<T>, total: usize) -> Page<T> {
        Page { items, page: self.page, total_pages: self.total_pages, total }
    }
}

/// Paginate an in-memory list.
#[must_use]
pub fn paginate<T>(items: Vec<T>, requested: Option<usize>, per_page: usize) -> Page<T> {
    let total = items.len();
    let window = PageWindow::resolve(requested, per_page, total);
    let slice = items
        .into_iter()
        .skip(window.offset)
        .take(window.limit)
        .collect();
    window.into_page(slice, total)
}

#[cfg(test)]
#[path = "paging_test.rs"]
mod tests;
