use serde::Serialize;

use crate::types::page_size::{PageSize, PageWindow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    pub current_page: usize,
    pub num_pages: usize,
    pub results_per_page: usize,
    pub total_results: usize,
    pub valid_pages: Vec<usize>,
    pub first_result: usize,
    pub last_result: usize,
}

/// Builds the pagination metadata for one page of search results.
///
/// `valid_pages` holds at most `max_pages_to_show` page numbers, trimmed one
/// page at a time from whichever side of `current_page` has more pages left
/// (the back on a tie). `first_result` and `last_result` are 1-indexed and
/// clamped to `total_results`, so an empty result set yields `0..0`.
pub fn compute_pager(
    current_page: usize,
    total_results: usize,
    results_per_page: PageSize,
    max_pages_to_show: PageWindow,
) -> Pager {
    let current_page = current_page.max(1);
    let rpp = results_per_page.get();
    let num_pages = total_results.div_ceil(rpp);
    let valid_pages = window_pages(current_page, num_pages, max_pages_to_show.get());

    let first_result = (current_page - 1)
        .saturating_mul(rpp)
        .saturating_add(1)
        .min(total_results);
    let last_result = first_result.saturating_add(rpp - 1).min(total_results);

    Pager {
        current_page,
        num_pages,
        results_per_page: rpp,
        total_results,
        valid_pages,
        first_result,
        last_result,
    }
}

fn window_pages(current_page: usize, num_pages: usize, max_pages: usize) -> Vec<usize> {
    if num_pages <= max_pages {
        return (1..=num_pages).collect();
    }

    let to_remove = num_pages - max_pages;
    let current = current_page as i64;
    let len = num_pages as i64;
    let mut front = 0usize;
    let mut back = 0usize;
    while front + back < to_remove {
        let before = current - 1 - front as i64;
        let after = len - current - back as i64;
        if after >= before {
            back += 1;
        } else {
            front += 1;
        }
    }

    (1 + front..=num_pages - back).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(current: usize, total: usize, rpp: usize, max: usize) -> Pager {
        compute_pager(
            current,
            total,
            PageSize::try_from(rpp).unwrap(),
            PageWindow::try_from(max).unwrap(),
        )
    }

    #[test]
    fn empty_results_clamp_bounds_to_zero() {
        let p = pager(1, 0, 15, 7);
        assert_eq!(p.num_pages, 0);
        assert!(p.valid_pages.is_empty());
        assert_eq!(p.first_result, 0);
        assert_eq!(p.last_result, 0);
    }

    #[test]
    fn window_contains_current_page() {
        let p = pager(3, 100, 10, 7);
        assert_eq!(p.num_pages, 10);
        assert_eq!(p.valid_pages, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(p.first_result, 21);
        assert_eq!(p.last_result, 30);
    }

    #[test]
    fn window_centers_on_middle_page() {
        assert_eq!(pager(5, 100, 10, 7).valid_pages, vec![2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(pager(6, 100, 10, 7).valid_pages, vec![3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn window_tie_trims_back_first() {
        // 1..=6 on page 3: before=2, after=3 -> back; then 2/2 tie -> back.
        assert_eq!(pager(3, 6, 1, 4).valid_pages, vec![1, 2, 3, 4]);
    }

    #[test]
    fn window_at_last_page_keeps_tail() {
        assert_eq!(pager(10, 100, 10, 7).valid_pages, vec![4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn page_past_end_is_left_as_requested() {
        let p = pager(20, 100, 10, 7);
        assert_eq!(p.current_page, 20);
        assert_eq!(p.valid_pages, vec![4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(p.first_result, 100);
        assert_eq!(p.last_result, 100);
    }

    #[test]
    fn last_page_is_partial() {
        let p = pager(4, 35, 10, 7);
        assert_eq!(p.num_pages, 4);
        assert_eq!(p.first_result, 31);
        assert_eq!(p.last_result, 35);
    }

    #[test]
    fn page_count_and_window_length_hold_across_inputs() {
        for total in [0usize, 1, 9, 10, 11, 99, 100, 101, 1000] {
            for rpp in [1usize, 3, 10, 15] {
                for current in [1usize, 2, 5, 50] {
                    let p = pager(current, total, rpp, 7);
                    assert_eq!(p.num_pages, total.div_ceil(rpp));
                    assert_eq!(p.valid_pages.len(), p.num_pages.min(7));
                    assert!(p.first_result <= total);
                    assert!(p.last_result <= total);
                    if total > 0 {
                        assert!(p.first_result <= p.last_result);
                    }
                }
            }
        }
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        let p = pager(0, 50, 10, 7);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.first_result, 1);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(pager(1, 5, 10, 7)).unwrap();
        assert_eq!(value["numPages"], 1);
        assert_eq!(value["validPages"], serde_json::json!([1]));
        assert_eq!(value["lastResult"], 5);
    }
}
