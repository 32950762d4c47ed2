//! Page/limit validation ahead of paged queries
//!
//! Bounds the result window requested from the engine.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// `from`/`size` pair sent to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub from: u64,
    pub size: u64,
}

impl Window {
    pub fn new(from: u64, size: u64) -> Self {
        Self { from, size }
    }
}

/// A validated 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Clamp raw caller input: `page < 1` becomes 1, `limit < 1` becomes
    /// [`DEFAULT_PAGE_LIMIT`], `limit > 100` becomes [`MAX_PAGE_LIMIT`].
    pub fn new(page: i64, limit: i64) -> Self {
        let page = page.clamp(1, u32::MAX as i64) as u32;
        let limit = if limit < 1 {
            DEFAULT_PAGE_LIMIT
        } else {
            limit.min(MAX_PAGE_LIMIT as i64) as u32
        };

        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    pub fn window(&self) -> Window {
        Window::new(self.offset(), self.limit as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
