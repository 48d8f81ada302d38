/// Largest scroll offset that still fills every visible row.
pub fn max_offset(item_count: usize, visible_rows: usize) -> usize {
    item_count.saturating_sub(visible_rows)
}

/// Move the scroll offset one row up.
pub fn scroll_up(offset: usize) -> usize {
    offset.saturating_sub(1)
}

/// Move the scroll offset one row down if a later full page exists.
pub fn scroll_down(offset: usize, max_offset: usize) -> usize {
    if offset < max_offset {
        offset + 1
    } else {
        max_offset
    }
}
