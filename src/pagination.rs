use serde::Serialize;

/// Page-link window: the edges plus a band around the current page, with
/// `None` marking an elided gap.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One rendered page of items together with the backend's totals.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize, total_items: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page, 1, 2, 2, 1);

        Self {
            items,
            pages,
            page: current_page,
            total_pages,
            total_items,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_totals_list_every_page() {
        assert_eq!(
            get_pages(4, 2, 1, 2, 2, 1),
            vec![Some(1), Some(2), Some(3), Some(4)]
        );
        assert!(get_pages(0, 1, 1, 2, 2, 1).is_empty());
    }

    #[test]
    fn large_totals_elide_gaps_around_current() {
        assert_eq!(
            get_pages(20, 10, 1, 2, 2, 1),
            vec![
                Some(1),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(20)
            ]
        );
    }

    #[test]
    fn zero_page_is_treated_as_first() {
        let paginated = Paginated::new(vec!["a"], 0, 3, 60);

        assert_eq!(paginated.page, 1);
        assert!(!paginated.has_previous());
        assert!(paginated.has_next());
        assert_eq!(paginated.total_items, 60);
    }
}
