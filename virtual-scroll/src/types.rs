use alloc::string::String;
use alloc::vec::Vec;

/// Direction of a window shift or of a list edge.
///
/// `Backward` points toward index 0, `Forward` toward `total_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Backward => Self::Forward,
            Self::Forward => Self::Backward,
        }
    }
}

/// Half-open index interval `[start_index, end_index)` of rendered items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemsRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl ItemsRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
    };

    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    /// Returns the range clamped so that `start <= end <= total_count`.
    pub fn clamped(self, total_count: usize) -> Self {
        let end_index = self.end_index.min(total_count);
        let start_index = self.start_index.min(end_index);
        Self {
            start_index,
            end_index,
        }
    }
}

/// Pixel size standing in for unrendered content before and after the range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placeholders {
    pub backward: u64,
    pub forward: u64,
}

/// Whether unrendered items exist beyond each edge of the range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HasItemsOutRange {
    pub backward: bool,
    pub forward: bool,
}

impl HasItemsOutRange {
    pub fn from_range(range: ItemsRange, total_count: usize) -> Self {
        Self {
            backward: range.start_index > 0,
            forward: range.end_index < total_count,
        }
    }

    pub fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Backward => self.backward,
            Direction::Forward => self.forward,
        }
    }
}

/// Distance in pixels between each trigger and its list edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggersOffsets {
    pub backward: u32,
    pub forward: u32,
}

impl TriggersOffsets {
    pub fn get(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Backward => self.backward,
            Direction::Forward => self.forward,
        }
    }

    pub fn sum(&self) -> u64 {
        self.backward as u64 + self.forward as u64
    }
}

/// Visibility of each trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggersVisibility {
    pub backward: bool,
    pub forward: bool,
}

impl Default for TriggersVisibility {
    fn default() -> Self {
        Self {
            backward: true,
            forward: true,
        }
    }
}

/// Where a trigger sits relative to its list edge.
///
/// `Null` pins it to the edge (offset `0`); it is used right after a reset so the first load only
/// happens once the user really reaches the edge. `Offset` moves it by the computed offset so
/// loading starts ahead of the edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerPosition {
    #[default]
    Null,
    Offset,
}

/// Trigger positions of both edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggersPositions {
    pub backward: TriggerPosition,
    pub forward: TriggerPosition,
}

/// Measured size of one item of the logical collection.
///
/// `offset` is measured from the top of the scroll content, so it already includes whatever is
/// rendered before the items container and the items hidden above the current window.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSize {
    pub size: u32,
    pub offset: u64,
    pub key: Option<String>,
}

impl ItemSize {
    pub fn new(size: u32, offset: u64) -> Self {
        Self {
            size,
            offset,
            key: None,
        }
    }

    pub fn keyed(size: u32, offset: u64, key: impl Into<String>) -> Self {
        Self {
            size,
            offset,
            key: Some(key.into()),
        }
    }

    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size as u64)
    }
}

/// Index-aligned sizes for the whole logical collection.
pub type ItemsSizes = Vec<ItemSize>;

/// An item touching a viewport edge, used to restore the scroll position after a range shift.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeItem {
    pub key: Option<String>,
    pub index: usize,
    /// The viewport edge the item crosses.
    pub direction: Direction,
    /// The item border the distance is measured from.
    pub border: Direction,
    pub border_distance: u64,
}

/// Outcome of a calculator operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeChangeResult {
    pub range: ItemsRange,
    pub old_range: ItemsRange,
    pub shift_direction: Option<Direction>,
    pub indexes_changed: bool,

    pub placeholders: Placeholders,
    pub old_placeholders: Placeholders,
    pub placeholders_changed: bool,

    pub has_items_out_range: HasItemsOutRange,
    pub has_items_out_range_changed: bool,

    pub active_element_index: Option<usize>,
}

impl RangeChangeResult {
    pub fn start_index(&self) -> usize {
        self.range.start_index
    }

    pub fn end_index(&self) -> usize {
        self.range.end_index
    }

    pub fn has_items_backward(&self) -> bool {
        self.has_items_out_range.backward
    }

    pub fn has_items_forward(&self) -> bool {
        self.has_items_out_range.forward
    }

    pub fn before_placeholder_size(&self) -> u64 {
        self.placeholders.backward
    }

    pub fn after_placeholder_size(&self) -> u64 {
        self.placeholders.forward
    }
}

/// Outcome of a scroll position update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveElementChange {
    pub index: Option<usize>,
    pub changed: bool,
}
