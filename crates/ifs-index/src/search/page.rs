//! Page window arithmetic.

use serde::Serialize;

/// A one-based page of fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// One-based page number.
    pub page: usize,
    /// Results per page, never zero.
    pub page_length: usize,
}

impl PageWindow {
    /// Creates a window, normalizing out-of-range input.
    ///
    /// Pages below 1 become page 1. A zero `page_length` falls back to
    /// `default_length`, and the result is never zero.
    pub fn new(page: usize, page_length: usize, default_length: usize) -> Self {
        let page_length = if page_length == 0 {
            default_length
        } else {
            page_length
        };
        Self {
            page: page.max(1),
            page_length: page_length.max(1),
        }
    }

    /// Number of results skipped before this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_length)
    }

    /// Pages needed to show `total` results.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_length)
    }

    /// One-based position of the first result on this page.
    pub fn show_min(&self) -> usize {
        self.offset().saturating_add(1)
    }

    /// One-based position of the last result on this page, capped at `total`.
    pub fn show_max(&self, total: usize) -> usize {
        self.show_min()
            .saturating_add(self.page_length - 1)
            .min(total)
    }
}
