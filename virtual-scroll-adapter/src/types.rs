use virtual_scroll::{Direction, ItemsRange, Placeholders};

/// How the renderer treats the scroll position after a range change.
///
/// - `Fixed`: the first visible item keeps its position in the viewport; the renderer restores
///   the scroll position from an edge item.
/// - `Unfixed`: the content moves by the native scroll rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollMode {
    #[default]
    Fixed,
    Unfixed,
}

/// Payload of the `indexes_initialized` and `indexes_changed` callbacks.
///
/// `old_range` and `old_placeholders` describe what is still rendered when the callback runs, so
/// the renderer can capture an edge item before it re-renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexesChangedParams {
    pub range: ItemsRange,
    pub old_range: ItemsRange,
    pub old_placeholders: Placeholders,
    /// `None` when no direction applies (reset, move, scroll to a position).
    pub shift_direction: Option<Direction>,
    pub scroll_mode: ScrollMode,
}

/// How page up/down should scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollToPageMode {
    /// Scroll to the edge item, so small items are not cut in half.
    EdgeItem,
    /// Scroll by the viewport size.
    Viewport,
}
