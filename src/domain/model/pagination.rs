use serde::*;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Highest page whose offset still fits an `i64` at any limit.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Offset pagination over a listing. Out of range values are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Pagination {
            page: page.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Paging metadata sent next to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub has_more: bool,
    pub total_pages: i64,
    pub total: i64,
    pub current_page: i64,
}

impl PageSummary {
    pub fn new(total: i64, pagination: &Pagination) -> Self {
        // halves round up, as the clients expect
        let total_pages = (total as f64 / pagination.limit() as f64).round() as i64;
        PageSummary {
            has_more: pagination.page() < total_pages,
            total_pages,
            total,
            current_page: pagination.page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_is_offset_of_previous_pages() {
        for page in 1..5 {
            for limit in 1..20 {
                let p = Pagination::new(Some(page), Some(limit));
                assert_eq!(p.skip(), (page - 1) * limit);
            }
        }
        assert_eq!(Pagination::default().skip(), 0);
        assert_eq!(Pagination::new(None, None), Pagination::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let p = Pagination::new(Some(0), Some(-5));
        assert_eq!((p.page(), p.limit()), (1, 1));

        let p = Pagination::new(Some(-3), Some(1000));
        assert_eq!((p.page(), p.limit()), (1, MAX_LIMIT));
    }

    #[test]
    fn huge_pages_keep_the_offset_in_range() {
        for limit in [1, 10, MAX_LIMIT, i64::MAX] {
            let p = Pagination::new(Some(i64::MAX), Some(limit));
            assert_eq!(p.page(), MAX_PAGE);
            assert_eq!(p.skip(), (MAX_PAGE - 1) * p.limit());
            assert!(p.skip() >= 0);

            let summary = PageSummary::new(0, &p);
            assert_eq!(summary.current_page, MAX_PAGE);
            assert!(!summary.has_more);
        }
    }

    #[test]
    fn total_pages_rounds() {
        let p = Pagination::new(Some(1), Some(10));
        assert_eq!(PageSummary::new(0, &p).total_pages, 0);
        assert_eq!(PageSummary::new(14, &p).total_pages, 1);
        assert_eq!(PageSummary::new(15, &p).total_pages, 2);
        assert_eq!(PageSummary::new(25, &p).total_pages, 3);
    }

    #[test]
    fn has_more_compares_page_with_total_pages() {
        let summary = PageSummary::new(30, &Pagination::new(Some(2), Some(10)));
        assert!(summary.has_more);
        assert_eq!(summary.current_page, 2);

        let summary = PageSummary::new(30, &Pagination::new(Some(3), Some(10)));
        assert!(!summary.has_more);

        // 14 tweets at 10 per page round down to one page
        let summary = PageSummary::new(14, &Pagination::new(Some(1), Some(10)));
        assert!(!summary.has_more);
    }
}
