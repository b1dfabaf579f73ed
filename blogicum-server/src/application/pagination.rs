use crate::data::post_repository::Pagination;

/// Every listing is sliced into pages of this many posts.
pub(crate) const PAGE_SIZE: u32 = 10;

/// 1-based page number as requested by the client, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageRequest(i64);

impl PageRequest {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    /// Missing or non-numeric input means the first page; an over-long number is
    /// treated as "very far" and ends up on the last page.
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::first();
        };
        match raw.parse::<i64>() {
            Ok(number) => Self(number),
            Err(_) if raw.chars().all(|c| c.is_ascii_digit()) => Self(i64::MAX),
            Err(_) => Self::first(),
        }
    }

    /// Clamps into `1..=num_pages` for a listing of `total` items.
    pub(crate) fn resolve(self, total: i64) -> PageWindow {
        let page_size = i64::from(PAGE_SIZE);
        let num_pages = ((total.max(0) + page_size - 1) / page_size).max(1);
        let number = self.0.clamp(1, num_pages);

        PageWindow {
            number: u32::try_from(number).unwrap_or(u32::MAX),
            num_pages: u32::try_from(num_pages).unwrap_or(u32::MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub(crate) number: u32,
    pub(crate) num_pages: u32,
}

impl PageWindow {
    pub(crate) fn pagination(&self) -> Pagination {
        Pagination {
            page: self.number,
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) number: u32,
    pub(crate) num_pages: u32,
    pub(crate) total: i64,
    pub(crate) page_size: u32,
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, window: PageWindow, total: i64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total,
            page_size: PAGE_SIZE,
        }
    }

    pub(crate) fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub(crate) fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[cfg(test)]
mod tests {
    use super::{PAGE_SIZE, PageRequest, PageWindow};

    #[test]
    fn parse_falls_back_to_first_page() {
        assert_eq!(PageRequest::parse(None), PageRequest::first());
        assert_eq!(PageRequest::parse(Some("")), PageRequest::first());
        assert_eq!(PageRequest::parse(Some("abc")), PageRequest::first());
        assert_eq!(PageRequest::parse(Some("2.5")), PageRequest::first());
    }

    #[test]
    fn out_of_range_pages_clamp_to_nearest_valid_page() {
        assert_eq!(
            PageRequest::parse(Some("0")).resolve(35),
            PageWindow { number: 1, num_pages: 4 }
        );
        assert_eq!(
            PageRequest::parse(Some("-3")).resolve(35),
            PageWindow { number: 1, num_pages: 4 }
        );
        assert_eq!(
            PageRequest::parse(Some("99")).resolve(35),
            PageWindow { number: 4, num_pages: 4 }
        );
        assert_eq!(
            PageRequest::parse(Some("99999999999999999999999")).resolve(35),
            PageWindow { number: 4, num_pages: 4 }
        );
    }

    #[test]
    fn empty_listing_has_one_page() {
        assert_eq!(
            PageRequest::parse(Some("3")).resolve(0),
            PageWindow { number: 1, num_pages: 1 }
        );
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        let window = PageRequest::parse(Some("2")).resolve(i64::from(PAGE_SIZE) * 2);
        assert_eq!(window, PageWindow { number: 2, num_pages: 2 });

        let pagination = window.pagination();
        assert_eq!(pagination.limit(), 10);
        assert_eq!(pagination.offset(), 10);
    }
}
