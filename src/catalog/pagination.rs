use serde::Serialize;

/// One page of a listing. `page` is 1-indexed and already clamped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Number of pages for `len` items; never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slice `items` into the requested page. Out-of-range page numbers clamp to
/// the nearest valid page; a zero page size counts as one.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page_number: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let page = page_number.clamp(1, total_pages);
    let start = ((page - 1) * page_size).min(total_items);
    let end = (start + page_size).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total_items,
    }
}

/// Current page number of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Advance one page; a no-op on the last page.
    pub fn next(&mut self, total_items: usize) -> bool {
        if self.page < total_pages(total_items, self.page_size) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; a no-op on the first page.
    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, clamped to the available range.
    pub fn go_to(&mut self, page: usize, total_items: usize) {
        self.page = page.clamp(1, total_pages(total_items, self.page_size));
    }

    /// Back to the first page, as after any filter change.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn view<T: Clone>(&self, items: &[T]) -> Page<T> {
        paginate(items, self.page_size, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventeen_items_make_three_pages() {
        let items: Vec<u32> = (1..=17).collect();

        let first = paginate(&items, 8, 1);
        assert_eq!(first.items, (1..=8).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_prev());
        assert!(first.has_next());

        let last = paginate(&items, 8, 3);
        assert_eq!(last.items, vec![17]);
        assert!(!last.has_next());
    }

    #[test]
    fn empty_listing_has_one_empty_page() {
        let page = paginate::<u32>(&[], 8, 1);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 0);
    }

    #[test]
    fn out_of_range_requests_clamp() {
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(paginate(&items, 4, 0).page, 1);
        assert_eq!(paginate(&items, 4, 99).items, vec![9, 10]);
        assert_eq!(paginate(&items, 0, 2).items, vec![2]);
    }

    #[test]
    fn pager_stops_at_boundaries() {
        let mut pager = Pager::new(8);
        assert!(!pager.prev());
        assert_eq!(pager.page(), 1);

        assert!(pager.next(17));
        assert!(pager.next(17));
        assert!(!pager.next(17));
        assert_eq!(pager.page(), 3);

        pager.go_to(10, 17);
        assert_eq!(pager.page(), 3);

        pager.reset();
        assert_eq!(pager.view(&(1..=17).collect::<Vec<u32>>()).items.len(), 8);
    }
}
