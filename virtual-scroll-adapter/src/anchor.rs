use virtual_scroll::{Calculator, Direction, EdgeItem, ItemsRange, Placeholders};

use crate::{IndexesChangedParams, ScrollMode, ScrollToPageMode};

/// Page up/down scrolls to the edge item only when it is smaller than this fraction of the
/// viewport.
const MAX_SCROLL_TO_EDGE_ITEM_RELATION: u64 = 3;

/// What to capture before the renderer applies a range change, so the scroll position can be
/// restored afterwards.
///
/// Typical use cases:
/// - loading older items above the viewport without the content jumping
/// - dropping items at the far edge while the visible ones stay put
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestoreScrollParams {
    /// The viewport edge to anchor on; the window shifted toward it.
    pub direction: Direction,
    /// The range and placeholders that are still rendered.
    pub range: ItemsRange,
    pub placeholders: Placeholders,
}

impl RestoreScrollParams {
    /// Returns `None` when the change needs no restoration: unfixed scrolling or a change
    /// without a direction.
    pub fn from_indexes_changed(params: &IndexesChangedParams) -> Option<Self> {
        if params.scroll_mode != ScrollMode::Fixed {
            return None;
        }
        Some(Self {
            direction: params.shift_direction?,
            range: params.old_range,
            placeholders: params.old_placeholders,
        })
    }
}

/// Captures the edge item as rendered before the change described by `params`.
///
/// Call it before the renderer applies the new range; the scroll position must be current.
pub fn capture_edge_item(calc: &Calculator, params: &RestoreScrollParams) -> Option<EdgeItem> {
    calc.edge_visible_item_for(params.direction, params.range, params.placeholders)
}

/// Scroll position that puts a captured edge item back in place.
///
/// Call it after the new range was rendered and its sizes were measured.
pub fn restore_scroll_position(calc: &Calculator, edge: &EdgeItem) -> Option<u64> {
    calc.scroll_position_to_edge_item(edge)
}

/// Picks how page up/down scrolls past the edge item with key `edge_item_key`.
///
/// Items smaller than a third of the viewport are scrolled to, larger ones (and unknown keys)
/// scroll by a whole viewport.
pub fn scroll_to_page_mode(calc: &Calculator, edge_item_key: &str) -> ScrollToPageMode {
    let size = calc
        .items_sizes()
        .iter()
        .find(|s| s.key.as_deref() == Some(edge_item_key))
        .map(|s| s.size as u64);
    match size {
        Some(size)
            if calc.strategy() == virtual_scroll::RangeStrategy::Virtualized
                && size * MAX_SCROLL_TO_EDGE_ITEM_RELATION <= calc.viewport_size() as u64 =>
        {
            ScrollToPageMode::EdgeItem
        }
        _ => ScrollToPageMode::Viewport,
    }
}
