use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page request with a bounded page size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Builds a page request, clamping `page` to at least 1 and
    /// `page_size` into `[1, MAX_PAGE_SIZE]`.
    pub fn clamped(page: i64, page_size: i64) -> Self {
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE as i64) as u32,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_sub(1) * self.page_size as usize
    }

    /// The `[offset, offset + page_size)` window of `items`, empty past the end
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.page_size as usize).min(items.len());
        &items[start..end]
    }

    /// `ceil(total / page_size)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_bounds() {
        assert_eq!(Pagination::clamped(0, 0), Pagination { page: 1, page_size: 1 });
        assert_eq!(Pagination::clamped(-4, 500), Pagination { page: 1, page_size: 100 });
        assert_eq!(Pagination::clamped(3, 25), Pagination { page: 3, page_size: 25 });
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::clamped(1, 10).offset(), 0);
        assert_eq!(Pagination::clamped(3, 10).offset(), 20);

        let unclamped = Pagination { page: 0, page_size: 10 };
        assert_eq!(unclamped.offset(), 0);
        assert_eq!(unclamped.slice(&[1, 2, 3]), &[1, 2, 3]);
    }

    #[test]
    fn test_slice() {
        let ids: Vec<i64> = (1..=25).collect();
        assert_eq!(Pagination::clamped(1, 10).slice(&ids), &ids[0..10]);
        assert_eq!(Pagination::clamped(3, 10).slice(&ids), &ids[20..25]);
        assert!(Pagination::clamped(4, 10).slice(&ids).is_empty());
    }

    #[test]
    fn test_total_pages() {
        let pagination = Pagination::clamped(1, 10);
        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(10), 1);
        assert_eq!(pagination.total_pages(11), 2);
    }
}
