use crate::util::get_placeholders_by_range;
use crate::{
    Direction, HasItemsOutRange, ItemSize, ItemsRange, Placeholders, RangeChangeResult,
    RangeStrategy, TriggersOffsets, VirtualScrollConfig,
};

/// An immutable snapshot of the rendered window.
///
/// Every transition consumes a snapshot and returns the next one together with a
/// [`RangeChangeResult`] describing the difference, so the state machine can be driven and
/// tested without a live [`crate::Calculator`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    pub range: ItemsRange,
    pub placeholders: Placeholders,
    pub total_count: usize,
}

/// Measurements a transition reads but never changes.
#[derive(Clone, Copy, Debug)]
pub struct Geometry<'a> {
    pub config: VirtualScrollConfig,
    pub items_sizes: &'a [ItemSize],
    /// Sizes known before anything is rendered; they only shape the window on reset.
    pub given_items_sizes: Option<&'a [ItemSize]>,
    pub viewport_size: u32,
    pub content_size: u64,
    pub triggers_offsets: TriggersOffsets,
}

impl WindowState {
    pub fn has_items_out_range(&self) -> HasItemsOutRange {
        HasItemsOutRange::from_range(self.range, self.total_count)
    }

    /// Moves to `range` over a collection of `total_count` items.
    ///
    /// The range is clamped into `[0, total_count]` and placeholders are always recomputed, even
    /// when the indexes stay the same.
    pub fn transition(
        self,
        range: ItemsRange,
        total_count: usize,
        items_sizes: &[ItemSize],
        shift_direction: Option<Direction>,
    ) -> (Self, RangeChangeResult) {
        let range = range.clamped(total_count);
        let placeholders = get_placeholders_by_range(range, items_sizes, total_count);
        let next = Self {
            range,
            placeholders,
            total_count,
        };

        let old_has_items = self.has_items_out_range();
        let has_items = next.has_items_out_range();
        vtrace!(
            start = range.start_index,
            end = range.end_index,
            total_count,
            backward = placeholders.backward,
            forward = placeholders.forward,
            "WindowState::transition"
        );

        let result = RangeChangeResult {
            range,
            old_range: self.range,
            shift_direction,
            indexes_changed: self.range != range,
            placeholders,
            old_placeholders: self.placeholders,
            placeholders_changed: self.placeholders != placeholders,
            has_items_out_range: has_items,
            has_items_out_range_changed: old_has_items != has_items,
            active_element_index: None,
        };
        (next, result)
    }

    pub fn shift_to_direction(
        self,
        strategy: RangeStrategy,
        geometry: &Geometry<'_>,
        direction: Direction,
    ) -> (Self, RangeChangeResult) {
        let range = strategy.shift_to_direction(&self, geometry, direction);
        self.transition(
            range,
            self.total_count,
            geometry.items_sizes,
            Some(direction),
        )
    }

    pub fn shift_to_index(
        self,
        strategy: RangeStrategy,
        geometry: &Geometry<'_>,
        index: usize,
    ) -> (Self, RangeChangeResult) {
        let range = strategy.shift_to_index(&self, geometry, index);
        let direction = if range == self.range {
            None
        } else if index < self.range.start_index {
            Some(Direction::Backward)
        } else {
            Some(Direction::Forward)
        };
        self.transition(range, self.total_count, geometry.items_sizes, direction)
    }

    pub fn shift_to_scroll_position(
        self,
        strategy: RangeStrategy,
        geometry: &Geometry<'_>,
        position: u64,
    ) -> (Self, RangeChangeResult) {
        let range = strategy.shift_to_scroll_position(&self, geometry, position);
        self.transition(range, self.total_count, geometry.items_sizes, None)
    }

    pub fn reset(
        self,
        strategy: RangeStrategy,
        geometry: &Geometry<'_>,
        total_count: usize,
        start_index: usize,
    ) -> (Self, RangeChangeResult) {
        let range = strategy.reset(geometry, total_count, start_index);
        self.transition(range, total_count, geometry.items_sizes, None)
    }

    /// `geometry.items_sizes` must already contain the inserted entries.
    pub fn add_items(
        self,
        strategy: RangeStrategy,
        geometry: &Geometry<'_>,
        position: usize,
        count: usize,
        total_count: usize,
    ) -> (Self, RangeChangeResult) {
        let range = strategy.add_items(&geometry.config, self.range, position, count, total_count);
        let direction = if position <= self.range.start_index {
            Direction::Backward
        } else {
            Direction::Forward
        };
        self.transition(range, total_count, geometry.items_sizes, Some(direction))
    }

    /// `geometry.items_sizes` must already have the removed entries spliced out.
    pub fn remove_items(
        self,
        strategy: RangeStrategy,
        geometry: &Geometry<'_>,
        position: usize,
        count: usize,
        total_count: usize,
    ) -> (Self, RangeChangeResult) {
        let range =
            strategy.remove_items(&geometry.config, self.range, position, count, total_count);
        let direction = if position < self.range.start_index {
            Direction::Backward
        } else {
            Direction::Forward
        };
        self.transition(range, total_count, geometry.items_sizes, Some(direction))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn move_items(
        self,
        strategy: RangeStrategy,
        geometry: &Geometry<'_>,
        add_position: usize,
        add_count: usize,
        remove_position: usize,
        remove_count: usize,
        total_count: usize,
    ) -> (Self, RangeChangeResult) {
        let range = strategy.move_items(
            &geometry.config,
            self.range,
            add_position,
            add_count,
            remove_position,
            remove_count,
            total_count,
        );
        self.transition(range, total_count, geometry.items_sizes, None)
    }

    /// Recomputes placeholders after the item sizes changed. The range is kept.
    pub fn refresh(self, geometry: &Geometry<'_>) -> (Self, RangeChangeResult) {
        self.transition(self.range, self.total_count, geometry.items_sizes, None)
    }
}
