/// Page navigation state for a loaded document.
///
/// Pages are 1-indexed. Before a document has loaded `total_pages` is 0 and
/// both navigation directions are disabled.
///
/// # Example
///
/// ```
/// use docmark::viewer::Pager;
///
/// let mut pager = Pager::default();
/// pager.on_load_success(3);
/// pager.next_page();
/// assert_eq!(pager.current_page(), 2);
/// assert!(pager.can_prev());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    total_pages: usize,
}

impl Pager {
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub const fn is_loaded(&self) -> bool {
        self.total_pages > 0
    }

    /// A document finished loading: record its size and go back to page 1.
    pub const fn on_load_success(&mut self, total_pages: usize) {
        self.total_pages = total_pages;
        self.current_page = if total_pages == 0 { 0 } else { 1 };
    }

    pub const fn can_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub const fn can_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Advance one page; silently ignored on the last page.
    pub const fn next_page(&mut self) {
        if self.can_next() {
            self.current_page += 1;
        }
    }

    /// Go back one page; silently ignored on the first page.
    pub const fn prev_page(&mut self) {
        if self.can_prev() {
            self.current_page -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unloaded_pager_cannot_move() {
        let mut pager = Pager::default();
        assert!(!pager.can_next());
        assert!(!pager.can_prev());
        pager.next_page();
        pager.prev_page();
        assert_eq!(pager.current_page(), 0);
    }

    #[test]
    fn test_load_resets_to_first_page() {
        let mut pager = Pager::default();
        pager.on_load_success(4);
        pager.next_page();
        pager.next_page();
        pager.on_load_success(7);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.total_pages(), 7);
    }

    #[test]
    fn test_next_page_stops_at_last_page() {
        let mut pager = Pager::default();
        pager.on_load_success(5);
        for _ in 0..10 {
            pager.next_page();
        }
        assert_eq!(pager.current_page(), 5);
        assert!(!pager.can_next());
    }

    #[test]
    fn test_prev_page_stops_at_first_page() {
        let mut pager = Pager::default();
        pager.on_load_success(2);
        pager.prev_page();
        assert_eq!(pager.current_page(), 1);
        assert!(!pager.can_prev());
    }

    #[test]
    fn test_single_page_document_disables_both() {
        let mut pager = Pager::default();
        pager.on_load_success(1);
        assert!(!pager.can_next());
        assert!(!pager.can_prev());
    }

    proptest! {
        #[test]
        fn prop_current_page_stays_in_bounds(
            total in 1usize..50,
            moves in proptest::collection::vec(any::<bool>(), 0..200),
        ) {
            let mut pager = Pager::default();
            pager.on_load_success(total);
            for forward in moves {
                if forward {
                    pager.next_page();
                } else {
                    pager.prev_page();
                }
                prop_assert!(pager.current_page() >= 1);
                prop_assert!(pager.current_page() <= total);
                prop_assert_eq!(pager.can_next(), pager.current_page() < total);
                prop_assert_eq!(pager.can_prev(), pager.current_page() > 1);
            }
        }
    }
}
