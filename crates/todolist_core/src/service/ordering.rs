//! Display ordering policy.
//!
//! # Invariants
//! - Incomplete items precede completed ones.
//! - Within a completion bucket, `high < medium < low` by rank.
//! - Ties keep insertion order (stable sort).
//! - Ordering is a pure function of the insertion-order slice.

use crate::model::todo_item::TodoItem;

fn sort_key(item: &TodoItem) -> (bool, u8) {
    (item.is_completed(), item.priority().rank())
}

/// Insertion positions listed in display order.
///
/// `display_positions(items)[i]` is the insertion position of the item shown
/// at display index `i`.
pub fn display_positions(items: &[TodoItem]) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..items.len()).collect();
    positions.sort_by_key(|&position| sort_key(&items[position]));
    positions
}

/// Items cloned into display order.
pub fn display_order(items: &[TodoItem]) -> Vec<TodoItem> {
    display_positions(items)
        .into_iter()
        .map(|position| items[position].clone())
        .collect()
}
