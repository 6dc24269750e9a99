//! Page-number pagination over an in-memory result set.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of items per page.
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Maximum number of items per page.
pub const MAX_PER_PAGE: i64 = 100;

/// Clamp a user-provided page size to `1..=MAX_PER_PAGE`.
pub fn clamp_per_page(per_page: Option<i64>) -> i64 {
    per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
}

/// Clamp a user-provided 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            per_page: clamp_per_page(per_page),
        }
    }

    fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
    /// 1-based position of the first item on this page.
    pub from: Option<i64>,
    /// 1-based position of the last item on this page.
    pub to: Option<i64>,
}

/// Page numbers for navigation. `prev`/`next` are absent at the edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub first: i64,
    pub last: i64,
    pub prev: Option<i64>,
    pub next: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
    pub links: PageLinks,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
            links: self.links,
        }
    }
}

// ---------------------------------------------------------------------------
// Slicing
// ---------------------------------------------------------------------------

/// Cut one page out of an already sorted result set.
///
/// A page past the end yields empty `data` with the same totals.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let per_page = request.per_page;
    let current_page = request.page;
    let last_page = ((total + per_page - 1) / per_page).max(1);

    let offset = request.offset();
    let data: Vec<T> = items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(per_page as usize)
        .collect();

    let (from, to) = if data.is_empty() {
        (None, None)
    } else {
        (Some(offset + 1), Some(offset + data.len() as i64))
    };

    Page {
        data,
        meta: PageMeta {
            total,
            per_page,
            current_page,
            last_page,
            from,
            to,
        },
        links: PageLinks {
            first: 1,
            last: last_page,
            prev: (current_page > 1).then(|| (current_page - 1).min(last_page)),
            next: (current_page < last_page).then_some(current_page + 1),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: i64) -> Vec<i64> {
        (1..=n).collect()
    }

    #[test]
    fn clamp_per_page_bounds() {
        assert_eq!(clamp_per_page(None), 15);
        assert_eq!(clamp_per_page(Some(0)), 1);
        assert_eq!(clamp_per_page(Some(-5)), 1);
        assert_eq!(clamp_per_page(Some(500)), 100);
        assert_eq!(clamp_per_page(Some(40)), 40);
    }

    #[test]
    fn clamp_page_floors_at_one() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(clamp_page(Some(4)), 4);
    }

    #[test]
    fn first_page_of_twenty_three() {
        let page = paginate(items(23), PageRequest::new(Some(1), Some(10)));
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.meta.total, 23);
        assert_eq!(page.meta.from, Some(1));
        assert_eq!(page.meta.to, Some(10));
        assert_eq!(page.data, items(10));
        assert_eq!(page.links.prev, None);
        assert_eq!(page.links.next, Some(2));
    }

    #[test]
    fn last_page_of_twenty_three() {
        let page = paginate(items(23), PageRequest::new(Some(3), Some(10)));
        assert_eq!(page.meta.from, Some(21));
        assert_eq!(page.meta.to, Some(23));
        assert_eq!(page.data, vec![21, 22, 23]);
        assert_eq!(page.links.prev, Some(2));
        assert_eq!(page.links.next, None);
        assert_eq!(page.links.last, 3);
    }

    #[test]
    fn empty_result_has_one_page() {
        let page = paginate(Vec::<i64>::new(), PageRequest::default());
        assert_eq!(page.meta.last_page, 1);
        assert_eq!(page.meta.per_page, 15);
        assert_eq!(page.meta.from, None);
        assert_eq!(page.meta.to, None);
        assert_eq!(page.links.next, None);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = paginate(items(5), PageRequest::new(Some(9), Some(10)));
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total, 5);
        assert_eq!(page.meta.current_page, 9);
        assert_eq!(page.links.prev, Some(1));
        assert_eq!(page.links.next, None);
    }

    #[test]
    fn map_keeps_meta() {
        let page = paginate(items(3), PageRequest::default()).map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20, 30]);
        assert_eq!(page.meta.to, Some(3));
    }
}
