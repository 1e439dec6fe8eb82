//! Pagination utilities for the query engine.
//!
//! Offset-based: `skip = (page - 1) * limit`, inputs normalized to sane
//! bounds before use.

use serde::Serialize;

/// Pagination parameters as requested by a client.
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub limit: u32,
}

impl Pagination {
    /// Clamp to sane bounds and return `(skip, limit)`.
    pub fn normalize(self) -> (usize, usize) {
        let page = if self.page == 0 { 1 } else { self.page };
        let limit = self.limit.clamp(1, 100);
        (((page - 1) as usize) * limit as usize, limit as usize)
    }

    /// The page index actually served after normalization.
    pub fn effective_page(self) -> u32 {
        if self.page == 0 {
            1
        } else {
            self.page
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Pagination envelope returned alongside a page of items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub pages: usize,
}

impl PageInfo {
    pub fn new(total: usize, pagination: Pagination) -> Self {
        let (_, limit) = pagination.normalize();
        Self {
            total,
            page: pagination.effective_page(),
            limit: limit as u32,
            pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (skip, limit) = Pagination { page: 0, limit: 0 }.normalize();
        assert_eq!(skip, 0);
        assert_eq!(limit, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (skip, limit) = Pagination { page: 5, limit: 1000 }.normalize();
        assert_eq!(skip, 400);
        assert_eq!(limit, 100);
    }

    #[test]
    fn page_info_rounds_pages_up() {
        let info = PageInfo::new(21, Pagination { page: 1, limit: 10 });
        assert_eq!(info.pages, 3);
        let empty = PageInfo::new(0, Pagination::default());
        assert_eq!(empty.pages, 0);
    }
}
