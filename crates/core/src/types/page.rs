//! Client-side pagination over a fully loaded list.

/// Number of books shown per catalog page.
pub const BOOKS_PER_PAGE: usize = 16;

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage<T> {
    pub items: Vec<T>,
    /// 1-based page number actually shown.
    pub current_page: usize,
    /// Always at least 1, even for an empty list.
    pub total_pages: usize,
}

impl<T: Clone> CatalogPage<T> {
    /// Slice out the requested page.
    ///
    /// Out-of-range requests are clamped to the first or last page. A
    /// `per_page` of zero is treated as one.
    #[must_use]
    pub fn paginate(all: &[T], requested_page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = all.len().div_ceil(per_page).max(1);
        let current_page = requested_page.clamp(1, total_pages);

        let items = all
            .iter()
            .skip((current_page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        Self {
            items,
            current_page,
            total_pages,
        }
    }
}

impl<T> CatalogPage<T> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page numbers for the pagination control.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_first_page_holds_at_most_per_page() {
        let all = numbers(40);
        let page = CatalogPage::paginate(&all, 1, BOOKS_PER_PAGE);
        assert_eq!(page.items.len(), 16);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_short_list_fits_one_page() {
        let all = numbers(5);
        let page = CatalogPage::paginate(&all, 1, BOOKS_PER_PAGE);
        assert_eq!(page.items, all);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_last_page_is_partial() {
        let all = numbers(40);
        let page = CatalogPage::paginate(&all, 3, BOOKS_PER_PAGE);
        assert_eq!(page.items, (33..=40).collect::<Vec<_>>());
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let all = numbers(20);
        assert_eq!(CatalogPage::paginate(&all, 0, 16).current_page, 1);
        assert_eq!(CatalogPage::paginate(&all, 99, 16).current_page, 2);
    }

    #[test]
    fn test_empty_list_has_one_empty_page() {
        let page = CatalogPage::<usize>::paginate(&[], 1, BOOKS_PER_PAGE);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page_numbers(), vec![1]);
    }
}
