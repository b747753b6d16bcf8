//! 1-based windowing over sorted collections.

/// Select the items at 1-based positions `start_index ..= start_index + count - 1`.
///
/// Returns the selected items, in order, with the size of the whole input.
/// A `count` of zero (or less) selects nothing but still reports the total.
pub fn windowed<T>(items: Vec<T>, start_index: i64, count: i64) -> (Vec<T>, usize) {
    let total = items.len();
    if count <= 0 || items.is_empty() {
        return (Vec::new(), total);
    }

    let last = start_index.saturating_add(count - 1);
    let page = items
        .into_iter()
        .zip(1_i64..)
        .filter(|(_, index)| (start_index..=last).contains(index))
        .map(|(item, _)| item)
        .collect();

    (page, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Vec<&'static str> {
        vec!["a", "b", "c", "d", "e"]
    }

    #[test]
    fn test_first_page() {
        assert_eq!(windowed(letters(), 1, 2), (vec!["a", "b"], 5));
    }

    #[test]
    fn test_middle_page() {
        assert_eq!(windowed(letters(), 3, 2), (vec!["c", "d"], 5));
    }

    #[test]
    fn test_window_past_end_is_truncated() {
        assert_eq!(windowed(letters(), 4, 10), (vec!["d", "e"], 5));
        assert_eq!(windowed(letters(), 9, 10), (Vec::<&str>::new(), 5));
    }

    #[test]
    fn test_zero_count_reports_total() {
        for start in [0, 1, 3, 100] {
            assert_eq!(windowed(letters(), start, 0), (Vec::<&str>::new(), 5));
        }
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(windowed(Vec::<u8>::new(), 1, 10), (vec![], 0));
    }

    #[test]
    fn test_start_below_one_keeps_inclusive_range() {
        // positions 0..=1 overlap the collection only at position 1
        assert_eq!(windowed(letters(), 0, 2), (vec!["a"], 5));
    }

    #[test]
    fn test_huge_count_does_not_overflow() {
        assert_eq!(windowed(letters(), 2, i64::MAX).0, vec!["b", "c", "d", "e"]);
    }
}
