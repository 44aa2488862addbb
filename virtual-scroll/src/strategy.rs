use core::cmp;

use crate::state::{Geometry, WindowState};
use crate::util::{
    ScrollPositionParams, ShiftRangeParams, get_range_by_index, get_range_by_items_sizes,
    get_range_by_scroll_position, shift_range_by_segment,
};
use crate::{Direction, HasItemsOutRange, ItemsRange, VirtualScrollConfig};

/// How the rendered window is computed.
///
/// The strategy is picked once when a [`crate::Calculator`] is built:
/// - `Virtualized` keeps roughly `page_size` items rendered and slides the window.
/// - `Unvirtualized` always renders the whole collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeStrategy {
    Virtualized,
    Unvirtualized,
}

impl RangeStrategy {
    pub fn for_config(config: &VirtualScrollConfig, disable_virtual_scroll: bool) -> Self {
        if disable_virtual_scroll || !config.is_virtualized() {
            Self::Unvirtualized
        } else {
            Self::Virtualized
        }
    }

    /// Range after a trigger fired in `direction`.
    ///
    /// Returns the current range when nothing is left to render in `direction`.
    pub fn shift_to_direction(
        self,
        state: &WindowState,
        geometry: &Geometry<'_>,
        direction: Direction,
    ) -> ItemsRange {
        let total = state.total_count;
        match self {
            Self::Unvirtualized => ItemsRange::new(0, total),
            Self::Virtualized => {
                let has_items = HasItemsOutRange::from_range(state.range, total);
                if !has_items.get(direction) {
                    return state.range.clamped(total);
                }
                shift_range_by_segment(&ShiftRangeParams {
                    direction,
                    current_range: state.range,
                    page_size: geometry.config.page_size,
                    segment_size: geometry.config.segment_size,
                    total_count: total,
                    items_sizes: geometry.items_sizes,
                    placeholders: state.placeholders,
                    triggers_offsets: geometry.triggers_offsets,
                    viewport_size: geometry.viewport_size,
                    content_size: geometry.content_size,
                })
            }
        }
    }

    /// Range that makes `index` rendered. Returns the current range when it already is.
    pub fn shift_to_index(
        self,
        state: &WindowState,
        geometry: &Geometry<'_>,
        index: usize,
    ) -> ItemsRange {
        let total = state.total_count;
        match self {
            Self::Unvirtualized => ItemsRange::new(0, total),
            Self::Virtualized => {
                if total == 0 || state.range.contains(index) {
                    return state.range.clamped(total);
                }
                let index = cmp::min(index, total - 1);
                get_range_by_index(index, geometry.config.page_size, total)
            }
        }
    }

    /// Range centered on the item found at the virtual scroll `position`.
    pub fn shift_to_scroll_position(
        self,
        state: &WindowState,
        geometry: &Geometry<'_>,
        position: u64,
    ) -> ItemsRange {
        let total = state.total_count;
        match self {
            Self::Unvirtualized => ItemsRange::new(0, total),
            Self::Virtualized => get_range_by_scroll_position(&ScrollPositionParams {
                page_size: geometry.config.page_size,
                total_count: total,
                items_sizes: geometry.items_sizes,
                scroll_position: position,
                trigger_offset: geometry.triggers_offsets.backward,
            }),
        }
    }

    /// Initial range after the whole collection was replaced.
    ///
    /// With given items sizes the window covers the viewport from `start_index`; otherwise it
    /// holds a page.
    pub fn reset(
        self,
        geometry: &Geometry<'_>,
        total_count: usize,
        start_index: usize,
    ) -> ItemsRange {
        match self {
            Self::Unvirtualized => ItemsRange::new(0, total_count),
            Self::Virtualized => match geometry.given_items_sizes {
                Some(given) => get_range_by_items_sizes(
                    start_index,
                    total_count,
                    geometry.viewport_size,
                    given,
                ),
                None => get_range_by_index(start_index, geometry.config.page_size, total_count),
            },
        }
    }

    /// Range after `count` items were inserted at `position`.
    ///
    /// Insertions before (or at) the start move the window, insertions inside grow it, and
    /// insertions after it leave the indexes alone.
    pub fn add_items(
        self,
        config: &VirtualScrollConfig,
        range: ItemsRange,
        position: usize,
        count: usize,
        total_count: usize,
    ) -> ItemsRange {
        match self {
            Self::Unvirtualized => ItemsRange::new(0, total_count),
            Self::Virtualized => {
                if range.is_empty() {
                    // Nothing rendered yet: open a page on the inserted items.
                    return get_range_by_index(
                        cmp::min(position, range.start_index),
                        config.page_size,
                        total_count,
                    );
                }
                range_after_insert(range, position, count).clamped(total_count)
            }
        }
    }

    /// Range after `count` items were removed starting at `position`.
    ///
    /// Removed items before the window move it back, removed items inside shrink it.
    pub fn remove_items(
        self,
        config: &VirtualScrollConfig,
        range: ItemsRange,
        position: usize,
        count: usize,
        total_count: usize,
    ) -> ItemsRange {
        match self {
            Self::Unvirtualized => ItemsRange::new(0, total_count),
            Self::Virtualized => {
                let next = range_after_remove(range, position, count).clamped(total_count);
                refill_if_empty(next, config, total_count)
            }
        }
    }

    /// Range after a move: the removal (in old indexes) followed by the insertion (in new
    /// indexes).
    #[allow(clippy::too_many_arguments)]
    pub fn move_items(
        self,
        config: &VirtualScrollConfig,
        range: ItemsRange,
        add_position: usize,
        add_count: usize,
        remove_position: usize,
        remove_count: usize,
        total_count: usize,
    ) -> ItemsRange {
        match self {
            Self::Unvirtualized => ItemsRange::new(0, total_count),
            Self::Virtualized => {
                let removed = range_after_remove(range, remove_position, remove_count);
                let next = if removed.is_empty() {
                    removed
                } else {
                    range_after_insert(removed, add_position, add_count)
                };
                refill_if_empty(next.clamped(total_count), config, total_count)
            }
        }
    }
}

fn range_after_insert(range: ItemsRange, position: usize, count: usize) -> ItemsRange {
    if position <= range.start_index {
        ItemsRange::new(
            range.start_index.saturating_add(count),
            range.end_index.saturating_add(count),
        )
    } else if position < range.end_index {
        ItemsRange::new(range.start_index, range.end_index.saturating_add(count))
    } else {
        range
    }
}

fn range_after_remove(range: ItemsRange, position: usize, count: usize) -> ItemsRange {
    let removed_end = position.saturating_add(count);
    let before = cmp::min(removed_end, range.start_index).saturating_sub(position);
    let inside = cmp::min(removed_end, range.end_index)
        .saturating_sub(cmp::max(position, range.start_index));
    ItemsRange::new(
        range.start_index - before,
        range
            .end_index
            .saturating_sub(before)
            .saturating_sub(inside),
    )
}

fn refill_if_empty(
    range: ItemsRange,
    config: &VirtualScrollConfig,
    total_count: usize,
) -> ItemsRange {
    if range.is_empty() && total_count > 0 {
        return get_range_by_index(
            cmp::min(range.start_index, total_count - 1),
            config.page_size,
            total_count,
        );
    }
    range
}
