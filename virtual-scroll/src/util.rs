//! Pure range arithmetic used by [`crate::Calculator`].
//!
//! Coordinates: item offsets are *virtual* (as if every item were rendered), while scroll
//! positions and content sizes are measured on the rendered content, which excludes the backward
//! placeholder. `offset - placeholders.backward` converts an item offset to rendered coordinates.
use core::cmp;

use crate::{Direction, ItemSize, ItemsRange, Placeholders, TriggersOffsets};

/// The active element line never goes above/below these viewport fractions.
pub const MIN_RATIO_INDEX_LINE: f64 = 0.15;
pub const MAX_RATIO_INDEX_LINE: f64 = 0.85;

fn size_at(items_sizes: &[ItemSize], index: usize) -> u64 {
    items_sizes.get(index).map_or(0, |s| s.size as u64)
}

fn offset_at(items_sizes: &[ItemSize], index: usize) -> u64 {
    items_sizes.get(index).map_or(0, |s| s.offset)
}

/// Inputs for [`shift_range_by_segment`].
#[derive(Clone, Copy, Debug)]
pub struct ShiftRangeParams<'a> {
    pub direction: Direction,
    pub current_range: ItemsRange,
    pub page_size: usize,
    pub segment_size: usize,
    pub total_count: usize,
    pub items_sizes: &'a [ItemSize],
    pub placeholders: Placeholders,
    pub triggers_offsets: TriggersOffsets,
    pub viewport_size: u32,
    pub content_size: u64,
}

/// Shifts the range by one segment toward `direction`.
///
/// The edge in `direction` moves by `max(segment_size, page_size - range.len())`, so a window
/// shorter than a page is refilled first. The opposite edge only drops the items that are already
/// far enough out of the viewport (see [`segment_size_to_hide`]); the window never shrinks below
/// `page_size` items when the collection has them.
pub fn shift_range_by_segment(params: &ShiftRangeParams<'_>) -> ItemsRange {
    let total = params.total_count;
    let page = params.page_size;
    if page == 0 {
        return ItemsRange::new(0, total);
    }

    let range = params.current_range;
    let fill = page.saturating_sub(range.len());
    let segment = cmp::max(params.segment_size, fill);
    let hide = segment_size_to_hide(params);

    let shifted = match params.direction {
        Direction::Backward => {
            let mut start = range.start_index.saturating_sub(segment);
            if start >= total {
                start = total.saturating_sub(page);
            }
            let end = cmp::max(
                range.end_index.saturating_sub(hide),
                cmp::min(start.saturating_add(page), total),
            );
            ItemsRange::new(start, end)
        }
        Direction::Forward => {
            // The end goes first: the new start depends on it.
            let mut end = cmp::min(range.end_index.saturating_add(segment), total);
            if end < page && end < total {
                end = cmp::min(page, total);
            }
            let start = cmp::min(
                range.start_index.saturating_add(hide),
                end.saturating_sub(page),
            );
            ItemsRange::new(start, end)
        }
    };
    shifted.clamped(total)
}

/// Number of items that can be dropped from the edge opposite to the shift.
///
/// Dropping a whole segment would often bring the opposite trigger straight into view, so only
/// items that lie beyond the viewport plus both trigger offsets are dropped.
pub fn segment_size_to_hide(params: &ShiftRangeParams<'_>) -> usize {
    match params.direction {
        Direction::Forward => segment_size_to_hide_backward(params),
        Direction::Backward => segment_size_to_hide_forward(params),
    }
}

fn segment_size_to_hide_forward(params: &ShiftRangeParams<'_>) -> usize {
    let range = params.current_range;
    if range.is_empty() {
        return 0;
    }
    let distance = (params.viewport_size as u64).saturating_add(params.triggers_offsets.sum());
    let backward_placeholder = params.placeholders.backward;

    let mut hide = 0usize;
    let mut index = range.end_index - 1;
    while index > range.start_index {
        let offset = offset_at(params.items_sizes, index).saturating_sub(backward_placeholder);
        if offset <= distance {
            break;
        }
        hide += 1;
        index -= 1;
    }
    hide
}

fn segment_size_to_hide_backward(params: &ShiftRangeParams<'_>) -> usize {
    let range = params.current_range;
    let used = (params.viewport_size as u64).saturating_add(params.triggers_offsets.sum());
    // A list that is not scrolled far enough has nothing to hide.
    let Some(distance) = params.content_size.checked_sub(used) else {
        return 0;
    };

    let mut hide = 0usize;
    let mut sum = 0u64;
    let mut index = range.start_index;
    while index < range.end_index {
        let size = size_at(params.items_sizes, index);
        if sum.saturating_add(size) >= distance {
            break;
        }
        sum = sum.saturating_add(size);
        hide += 1;
        index += 1;
    }
    hide
}

/// Computes a page-sized range starting at `start`.
///
/// With `page_size == 0` (or a page that covers the collection) the whole collection is returned.
/// A range running past the end is moved back so that it still holds `page_size` items.
pub fn get_range_by_index(start: usize, page_size: usize, total_count: usize) -> ItemsRange {
    if page_size > 0 && page_size < total_count {
        let mut start_index = start;
        let mut end_index = start.saturating_add(page_size);
        if end_index >= total_count {
            end_index = total_count;
            start_index = end_index - page_size;
        }
        ItemsRange::new(start_index, end_index)
    } else {
        ItemsRange::new(0, total_count)
    }
}

/// Computes the smallest range starting at `start` whose items cover the viewport, the item
/// crossing the viewport edge included.
///
/// When the items after `start` cannot cover the viewport (or only the last item would cross
/// its edge), the range ends at the last item and starts at the item crossing the viewport edge
/// counted from the end.
pub fn get_range_by_items_sizes(
    start: usize,
    total_count: usize,
    viewport_size: u32,
    items_sizes: &[ItemSize],
) -> ItemsRange {
    let viewport = viewport_size as u64;
    let start = cmp::min(start, total_count);

    let mut sum = 0u64;
    let mut crossing = None;
    for index in start..total_count {
        let size = size_at(items_sizes, index);
        if sum.saturating_add(size) > viewport {
            crossing = Some(index);
            break;
        }
        sum = sum.saturating_add(size);
    }
    if let Some(end) = crossing {
        if end + 1 < total_count {
            return ItemsRange::new(start, end + 1);
        }
    }

    let mut start_index = start;
    sum = 0;
    for index in (1..total_count).rev() {
        let size = size_at(items_sizes, index);
        if sum.saturating_add(size) > viewport {
            start_index = index;
            break;
        }
        sum = sum.saturating_add(size);
    }
    ItemsRange::new(start_index, total_count)
}

/// Inputs for [`get_range_by_scroll_position`].
#[derive(Clone, Copy, Debug)]
pub struct ScrollPositionParams<'a> {
    pub page_size: usize,
    pub total_count: usize,
    pub items_sizes: &'a [ItemSize],
    /// Virtual scroll position (backward placeholder included).
    pub scroll_position: u64,
    pub trigger_offset: u32,
}

/// Computes a range centered on the item found at `scroll_position - trigger_offset`.
///
/// Items are walked from index 0 until their cumulative size exceeds the target position; the
/// number of walked items is the center of a `page_size` window. Near the end of the collection
/// the start is moved back so the window still holds `page_size` items.
pub fn get_range_by_scroll_position(params: &ScrollPositionParams<'_>) -> ItemsRange {
    let total = params.total_count;
    if params.page_size == 0 {
        return ItemsRange::new(0, total);
    }

    let target = params
        .scroll_position
        .saturating_sub(params.trigger_offset as u64);
    let mut index = 0usize;
    let mut cumulative = 0u64;
    while index < total {
        cumulative = cumulative.saturating_add(size_at(params.items_sizes, index));
        index += 1;
        if cumulative > target {
            break;
        }
    }

    let page = params.page_size;
    let mut start = index.saturating_sub(page / 2);
    let end = cmp::min(start.saturating_add(page), total);
    if end == total {
        let missing = page.saturating_sub(end.saturating_sub(start));
        if missing > 0 {
            start = start.saturating_sub(missing);
        }
    }
    ItemsRange::new(start, end).clamped(total)
}

/// Inputs for [`get_active_element_index_by_scroll_position`].
#[derive(Clone, Copy, Debug)]
pub struct ActiveElementParams<'a> {
    pub total_count: usize,
    pub items_sizes: &'a [ItemSize],
    pub scroll_position: u64,
    pub viewport_size: u32,
    pub content_size: u64,
    pub placeholders: Placeholders,
    pub current_range: ItemsRange,
}

/// Returns the index of the item under the "index line" of the viewport.
///
/// The line slides from 15% to 85% of the viewport as the list scrolls from top to bottom, so
/// the first and last items can become active. Pinned edges short-circuit to the edge item.
pub fn get_active_element_index_by_scroll_position(
    params: &ActiveElementParams<'_>,
) -> Option<usize> {
    let range = params.current_range;
    if params.total_count == 0 || range.is_empty() {
        return None;
    }

    let viewport = params.viewport_size as u64;
    let max_position = params.content_size.saturating_sub(viewport);
    let position = params.scroll_position.min(max_position);

    if range.start_index == 0 && position == 0 {
        return Some(range.start_index);
    }
    if range.end_index == params.total_count && position.saturating_add(viewport) >= params.content_size
    {
        return Some(range.end_index - 1);
    }

    let backward = params.placeholders.backward;
    let with_placeholder = position.saturating_add(backward);
    let known_content = params
        .content_size
        .saturating_add(params.placeholders.forward)
        .saturating_add(backward);
    let scrollable = known_content.saturating_sub(viewport);
    let ratio = if scrollable == 0 {
        MIN_RATIO_INDEX_LINE
    } else {
        with_placeholder as f64 / scrollable as f64
    };
    let index_line = ratio.clamp(MIN_RATIO_INDEX_LINE, MAX_RATIO_INDEX_LINE);
    let line = position as f64 + viewport as f64 * index_line;

    let mut active = None;
    for index in range.start_index..range.end_index {
        let offset = offset_at(params.items_sizes, index).saturating_sub(backward);
        if (offset as f64) < line {
            active = Some(index);
        } else {
            break;
        }
    }
    active
}

/// Sums item sizes before and after `range`.
pub fn get_placeholders_by_range(
    range: ItemsRange,
    items_sizes: &[ItemSize],
    total_count: usize,
) -> Placeholders {
    Placeholders {
        backward: items_sizes_sum(0, range.start_index, items_sizes, total_count),
        forward: items_sizes_sum(range.end_index, total_count, items_sizes, total_count),
    }
}

fn items_sizes_sum(start: usize, end: usize, items_sizes: &[ItemSize], total_count: usize) -> u64 {
    let end = cmp::min(cmp::min(end, total_count), items_sizes.len());
    if start >= end {
        return 0;
    }
    items_sizes[start..end]
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.size as u64))
}

/// Returns the first rendered item that is not above `scroll_position`.
pub fn get_first_visible_item_index(
    items_sizes: &[ItemSize],
    scroll_position: u64,
    placeholders: Placeholders,
    current_range: ItemsRange,
) -> Option<usize> {
    if current_range.is_empty() {
        return None;
    }
    let mut index = current_range.start_index;
    let last = current_range.end_index - 1;
    while index < last
        && offset_at(items_sizes, index).saturating_sub(placeholders.backward) < scroll_position
    {
        index += 1;
    }
    Some(index)
}
