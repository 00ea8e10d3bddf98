//! Offset pagination primitives.

/// A validated page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }

    /// Number of pages needed for `total` items; 0 when there are none.
    pub fn total_pages(&self, total: i64) -> u32 {
        if total <= 0 || self.page_size == 0 {
            return 0;
        }
        let size = self.page_size as i64;
        ((total + size - 1) / size) as u32
    }

    /// Slices an already-filtered in-memory collection.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let offset = self.offset().max(0) as usize;
        items
            .iter()
            .skip(offset)
            .take(self.page_size as usize)
            .cloned()
            .collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
        }
    }
}

/// One page of results plus the total number of matching items.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
