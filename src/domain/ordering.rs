//! Dense display-order bookkeeping for reorderable sub-entity lists.
//!
//! After every add/remove/reorder the `display_order` of a list must be the
//! exact sequence `0..n-1` matching array position. Orders are recomputed
//! wholesale rather than stored sparse.

use std::collections::HashSet;
use std::hash::Hash;

/// True when `requested` lists exactly the elements of `current`, each
/// once, in any order. Duplicates fail: writing positions 0..n-1 over a
/// list with a repeated id would leave the stored order sparse.
pub fn is_permutation_of<T: Eq + Hash>(requested: &[T], current: &[T]) -> bool {
    if requested.len() != current.len() {
        return false;
    }
    let unique: HashSet<&T> = requested.iter().collect();
    unique.len() == requested.len() && current.iter().all(|item| unique.contains(item))
}

/// Assign `0..n-1` to each item in list position via the provided setter.
pub fn assign_dense_order<T, F>(items: &mut [T], mut set_order: F)
where
    F: FnMut(&mut T, i32),
{
    for (index, item) in items.iter_mut().enumerate() {
        set_order(item, index as i32);
    }
}

/// Move the item at `from` so it ends up at `to`, shifting the in-between
/// items by one. Returns false (list untouched) when either index is out of
/// bounds.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Translate a focused index across a `move_item(from, to)` so it keeps
/// pointing at the same element: the moved item carries its focus along,
/// and anything between the old and new position shifts by one toward the
/// vacated slot.
pub fn translate_focus(focus: usize, from: usize, to: usize) -> usize {
    if focus == from {
        to
    } else if from < focus && focus <= to {
        focus - 1
    } else if to <= focus && focus < from {
        focus + 1
    } else {
        focus
    }
}

/// Translate a focused index across a removal at `removed`. Focus on the
/// removed element clamps to the nearest surviving position.
pub fn translate_focus_after_remove(focus: usize, removed: usize, new_len: usize) -> Option<usize> {
    if new_len == 0 {
        return None;
    }
    let shifted = if focus > removed { focus - 1 } else { focus };
    Some(shifted.min(new_len - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Img {
        url: &'static str,
        order: i32,
    }

    fn imgs() -> Vec<Img> {
        vec![
            Img { url: "a", order: 0 },
            Img { url: "b", order: 1 },
            Img { url: "c", order: 2 },
        ]
    }

    #[test]
    fn orders_are_dense_after_move() {
        let mut list = imgs();
        assert!(move_item(&mut list, 0, 2));
        assign_dense_order(&mut list, |img, o| img.order = o);

        let urls: Vec<_> = list.iter().map(|i| i.url).collect();
        assert_eq!(urls, vec!["b", "c", "a"]);
        let orders: Vec<_> = list.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn orders_are_dense_after_remove() {
        let mut list = imgs();
        list.remove(1);
        assign_dense_order(&mut list, |img, o| img.order = o);

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].url, "a");
        assert_eq!(list[0].order, 0);
        assert_eq!(list[1].url, "c");
        assert_eq!(list[1].order, 1);
    }

    #[test]
    fn out_of_bounds_move_is_rejected() {
        let mut list = imgs();
        assert!(!move_item(&mut list, 0, 3));
        assert_eq!(list, imgs());
    }

    #[test]
    fn focus_follows_moved_item() {
        assert_eq!(translate_focus(1, 1, 3), 3);
    }

    #[test]
    fn focus_shifts_toward_vacated_slot() {
        // Item moved down past the focus: focus shifts up by one.
        assert_eq!(translate_focus(2, 0, 3), 1);
        // Item moved up past the focus: focus shifts down by one.
        assert_eq!(translate_focus(2, 4, 1), 3);
        // Focus outside the affected range is untouched.
        assert_eq!(translate_focus(0, 2, 4), 0);
    }

    #[test]
    fn permutation_check_rejects_duplicates_and_strangers() {
        assert!(is_permutation_of(&[2, 0, 1], &[0, 1, 2]));
        assert!(is_permutation_of::<i32>(&[], &[]));

        // Duplicate entry standing in for a missing one.
        assert!(!is_permutation_of(&[0, 0], &[0, 1]));
        // Element not in the current list.
        assert!(!is_permutation_of(&[0, 9], &[0, 1]));
        // Wrong cardinality.
        assert!(!is_permutation_of(&[0], &[0, 1]));
    }

    #[test]
    fn focus_survives_removal() {
        assert_eq!(translate_focus_after_remove(2, 0, 3), Some(1));
        assert_eq!(translate_focus_after_remove(1, 1, 2), Some(1));
        assert_eq!(translate_focus_after_remove(2, 2, 2), Some(1));
        assert_eq!(translate_focus_after_remove(0, 0, 0), None);
    }
}
