use alloc::vec::Vec;

use crate::state::{Geometry, WindowState};
use crate::util::{
    ActiveElementParams, get_active_element_index_by_scroll_position,
    get_first_visible_item_index,
};
use crate::{
    ActiveElementChange, CalculatorOptions, ConfigError, Direction, EdgeItem, HasItemsOutRange,
    ItemSize, ItemsRange, ItemsSizes, Placeholders, RangeChangeResult, RangeStrategy,
    TriggersOffsets, VirtualScrollConfig,
};

/// Owns the rendered window of one list and computes how it moves.
///
/// The calculator never touches the UI. Its host feeds it the collection size, item sizes,
/// viewport/content geometry and the scroll position, and gets a [`RangeChangeResult`] back from
/// every operation. The window itself lives in a [`WindowState`] snapshot that each operation
/// replaces as a whole.
#[derive(Clone, Debug)]
pub struct Calculator {
    config: VirtualScrollConfig,
    strategy: RangeStrategy,
    window: WindowState,
    items_sizes: ItemsSizes,
    given_items_sizes: Option<ItemsSizes>,

    viewport_size: u32,
    content_size: u64,
    scroll_position: u64,
    triggers_offsets: TriggersOffsets,
    active_element_index: Option<usize>,
}

impl Calculator {
    /// Creates a calculator with the window reset to the start of the collection.
    pub fn new(options: CalculatorOptions) -> Result<Self, ConfigError> {
        options.config.validate()?;
        let strategy = RangeStrategy::for_config(&options.config, options.disable_virtual_scroll);
        vdebug!(
            total_count = options.total_count,
            page_size = options.config.page_size,
            segment_size = options.config.segment_size,
            "Calculator::new"
        );

        let mut items_sizes = options.items_sizes;
        items_sizes.resize(options.total_count, ItemSize::default());

        let mut calculator = Self {
            config: options.config,
            strategy,
            window: WindowState::default(),
            items_sizes,
            given_items_sizes: options.given_items_sizes,
            viewport_size: options.viewport_size,
            content_size: options.content_size,
            scroll_position: options.scroll_position,
            triggers_offsets: options.triggers_offsets,
            active_element_index: None,
        };
        let (window, _) =
            calculator
                .window
                .reset(strategy, &calculator.geometry(), options.total_count, 0);
        calculator.window = window;
        Ok(calculator)
    }

    pub fn config(&self) -> &VirtualScrollConfig {
        &self.config
    }

    pub fn strategy(&self) -> RangeStrategy {
        self.strategy
    }

    pub fn window(&self) -> WindowState {
        self.window
    }

    pub fn range(&self) -> ItemsRange {
        self.window.range
    }

    pub fn placeholders(&self) -> Placeholders {
        self.window.placeholders
    }

    pub fn total_count(&self) -> usize {
        self.window.total_count
    }

    pub fn items_sizes(&self) -> &[ItemSize] {
        &self.items_sizes
    }

    pub fn given_items_sizes(&self) -> Option<&[ItemSize]> {
        self.given_items_sizes.as_deref()
    }

    pub fn viewport_size(&self) -> u32 {
        self.viewport_size
    }

    pub fn content_size(&self) -> u64 {
        self.content_size
    }

    pub fn scroll_position(&self) -> u64 {
        self.scroll_position
    }

    pub fn triggers_offsets(&self) -> TriggersOffsets {
        self.triggers_offsets
    }

    pub fn has_items_out_range(&self) -> HasItemsOutRange {
        self.window.has_items_out_range()
    }

    pub fn has_items_out_range_to(&self, direction: Direction) -> bool {
        self.has_items_out_range().get(direction)
    }

    pub fn set_viewport_size(&mut self, viewport_size: u32) {
        self.viewport_size = viewport_size;
    }

    pub fn set_content_size(&mut self, content_size: u64) {
        self.content_size = content_size;
    }

    pub fn set_triggers_offsets(&mut self, triggers_offsets: TriggersOffsets) {
        self.triggers_offsets = triggers_offsets;
    }

    /// Stores the scroll position without touching the active element.
    pub fn set_scroll_position(&mut self, scroll_position: u64) {
        self.scroll_position = scroll_position;
    }

    fn geometry(&self) -> Geometry<'_> {
        Geometry {
            config: self.config,
            items_sizes: &self.items_sizes,
            given_items_sizes: self.given_items_sizes.as_deref(),
            viewport_size: self.viewport_size,
            content_size: self.content_size,
            triggers_offsets: self.triggers_offsets,
        }
    }

    fn apply(&mut self, (window, mut result): (WindowState, RangeChangeResult)) -> RangeChangeResult {
        self.window = window;
        result.active_element_index = self.active_element_index;
        result
    }

    /// Adopts a collection size that changed since the caller queued its event.
    fn sync_total_count(&mut self, total_count: usize) {
        if self.window.total_count == total_count {
            return;
        }
        vdebug!(
            from = self.window.total_count,
            to = total_count,
            "Calculator: total count changed under a pending event"
        );
        self.items_sizes.resize(total_count, ItemSize::default());
        self.window.total_count = total_count;
        self.window.range = self.window.range.clamped(total_count);
    }

    /// Replaces the stored sizes. Placeholders are recomputed; the range is kept.
    pub fn update_items_sizes(&mut self, items_sizes: &[ItemSize]) -> RangeChangeResult {
        self.items_sizes.clear();
        self.items_sizes.extend_from_slice(items_sizes);
        self.items_sizes
            .resize(self.window.total_count, ItemSize::default());
        let next = self.window.refresh(&self.geometry());
        self.apply(next)
    }

    /// Replaces the sizes known up front. They take effect on the next reset.
    pub fn update_given_items_sizes(&mut self, sizes: Option<ItemsSizes>) {
        self.given_items_sizes = sizes;
    }

    /// Moves the window one segment toward `direction` after a trigger fired.
    ///
    /// `indexes_changed == false` in the result means everything in `direction` is already
    /// rendered: more data has to be loaded.
    pub fn shift_range_to_direction(
        &mut self,
        direction: Direction,
        total_count: usize,
    ) -> RangeChangeResult {
        self.sync_total_count(total_count);
        vtrace!(?direction, total_count, "Calculator::shift_range_to_direction");
        let next = self
            .window
            .shift_to_direction(self.strategy, &self.geometry(), direction);
        self.apply(next)
    }

    /// Makes `index` rendered. A no-op when it already is.
    pub fn shift_range_to_index(&mut self, index: usize, total_count: usize) -> RangeChangeResult {
        self.sync_total_count(total_count);
        vtrace!(index, total_count, "Calculator::shift_range_to_index");
        let next = self
            .window
            .shift_to_index(self.strategy, &self.geometry(), index);
        self.apply(next)
    }

    /// Rebuilds the window around the virtual scroll `position` (backward placeholder included).
    pub fn shift_range_to_scroll_position(
        &mut self,
        position: u64,
        total_count: usize,
    ) -> RangeChangeResult {
        self.sync_total_count(total_count);
        vtrace!(position, total_count, "Calculator::shift_range_to_scroll_position");
        let next = self
            .window
            .shift_to_scroll_position(self.strategy, &self.geometry(), position);
        self.apply(next)
    }

    /// Used when the user drags the scrollbar into a zone whose items are not rendered.
    pub fn shift_range_to_virtual_scroll_position(&mut self, position: u64) -> RangeChangeResult {
        let total_count = self.window.total_count;
        self.shift_range_to_scroll_position(position, total_count)
    }

    /// Handles `count` items inserted at `position`; `total_count` is the new size.
    pub fn add_items(
        &mut self,
        position: usize,
        count: usize,
        total_count: usize,
    ) -> RangeChangeResult {
        let position = position.min(self.items_sizes.len());
        self.items_sizes
            .splice(position..position, core::iter::repeat_n(ItemSize::default(), count));
        self.items_sizes.resize(total_count, ItemSize::default());
        vtrace!(position, count, total_count, "Calculator::add_items");
        let next = self.window.add_items(
            self.strategy,
            &self.geometry(),
            position,
            count,
            total_count,
        );
        self.apply(next)
    }

    /// Handles `count` items removed at `position`; `total_count` is the new size.
    pub fn remove_items(
        &mut self,
        position: usize,
        count: usize,
        total_count: usize,
    ) -> RangeChangeResult {
        let start = position.min(self.items_sizes.len());
        let end = position.saturating_add(count).min(self.items_sizes.len());
        self.items_sizes.drain(start..end);
        self.items_sizes.resize(total_count, ItemSize::default());
        vtrace!(position, count, total_count, "Calculator::remove_items");
        let next = self.window.remove_items(
            self.strategy,
            &self.geometry(),
            position,
            count,
            total_count,
        );
        self.apply(next)
    }

    /// Handles a move: `remove_position` is an index before the move, `add_position` an index
    /// after it.
    pub fn move_items(
        &mut self,
        add_position: usize,
        add_count: usize,
        remove_position: usize,
        remove_count: usize,
        total_count: usize,
    ) -> RangeChangeResult {
        move_entries(
            &mut self.items_sizes,
            add_position,
            add_count,
            remove_position,
            remove_count,
        );
        self.items_sizes.resize(total_count, ItemSize::default());
        vtrace!(
            add_position,
            add_count,
            remove_position,
            remove_count,
            "Calculator::move_items"
        );
        let next = self.window.move_items(
            self.strategy,
            &self.geometry(),
            add_position,
            add_count,
            remove_position,
            remove_count,
            total_count,
        );
        self.apply(next)
    }

    /// Discards sizes and window and opens a fresh window at the start of `count` items.
    pub fn reset_items(&mut self, count: usize) -> RangeChangeResult {
        self.reset_items_from(count, 0)
    }

    /// Same as [`Self::reset_items`], with the window opened at `start_index`.
    pub fn reset_items_from(&mut self, count: usize, start_index: usize) -> RangeChangeResult {
        vdebug!(count, start_index, "Calculator::reset_items");
        self.items_sizes.clear();
        self.items_sizes.resize(count, ItemSize::default());
        self.active_element_index = None;
        let next = self
            .window
            .reset(self.strategy, &self.geometry(), count, start_index);
        self.apply(next)
    }

    /// Stores the scroll position (rendered coordinates) and optionally recomputes the active
    /// element.
    pub fn scroll_position_change(
        &mut self,
        position: u64,
        update_active_element: bool,
    ) -> ActiveElementChange {
        self.scroll_position = position;
        if !update_active_element {
            return ActiveElementChange {
                index: None,
                changed: false,
            };
        }

        let index = self.get_active_element_index();
        let changed = index.is_some() && index != self.active_element_index;
        if changed {
            self.active_element_index = index;
        }
        ActiveElementChange { index, changed }
    }

    /// Index of the item under the active line of the viewport, if any item is rendered.
    pub fn get_active_element_index(&self) -> Option<usize> {
        get_active_element_index_by_scroll_position(&ActiveElementParams {
            total_count: self.window.total_count,
            items_sizes: &self.items_sizes,
            scroll_position: self.scroll_position,
            viewport_size: self.viewport_size,
            content_size: self.content_size,
            placeholders: self.window.placeholders,
            current_range: self.window.range,
        })
    }

    pub fn active_element_index(&self) -> Option<usize> {
        self.active_element_index
    }

    pub fn first_visible_item_index(&self) -> Option<usize> {
        get_first_visible_item_index(
            &self.items_sizes,
            self.scroll_position,
            self.window.placeholders,
            self.window.range,
        )
    }

    /// The rendered item crossing the viewport edge in `direction`.
    pub fn edge_visible_item(&self, direction: Direction) -> Option<EdgeItem> {
        self.edge_visible_item_for(direction, self.window.range, self.window.placeholders)
    }

    /// Same as [`Self::edge_visible_item`] for an explicit range and placeholders, e.g. the
    /// values from before a range change.
    pub fn edge_visible_item_for(
        &self,
        direction: Direction,
        range: ItemsRange,
        placeholders: Placeholders,
    ) -> Option<EdgeItem> {
        let range = range.clamped(self.items_sizes.len());
        let scroll = self.scroll_position;
        let viewport_end = scroll.saturating_add(self.viewport_size as u64);
        let rendered = |index: usize| -> (u64, u64) {
            let item = &self.items_sizes[index];
            let start = item.offset.saturating_sub(placeholders.backward);
            (start, start.saturating_add(item.size as u64))
        };
        let measured: Vec<usize> = (range.start_index..range.end_index)
            .filter(|&i| self.items_sizes[i].size > 0)
            .collect();

        match direction {
            Direction::Backward => {
                let index = measured
                    .iter()
                    .copied()
                    .find(|&i| rendered(i).1 > scroll)
                    .or_else(|| measured.last().copied())?;
                let (_, end) = rendered(index);
                Some(EdgeItem {
                    key: self.items_sizes[index].key.clone(),
                    index,
                    direction,
                    border: Direction::Forward,
                    border_distance: end.saturating_sub(scroll),
                })
            }
            Direction::Forward => {
                let index = measured
                    .iter()
                    .copied()
                    .take_while(|&i| rendered(i).0 < viewport_end)
                    .last()
                    .or_else(|| measured.first().copied())?;
                let (start, _) = rendered(index);
                Some(EdgeItem {
                    key: self.items_sizes[index].key.clone(),
                    index,
                    direction,
                    border: Direction::Backward,
                    border_distance: viewport_end.saturating_sub(start),
                })
            }
        }
    }

    /// Scroll position that puts `edge` back at its recorded distance from the viewport edge.
    ///
    /// The item is looked up by key when the edge item has one, by index otherwise.
    pub fn scroll_position_to_edge_item(&self, edge: &EdgeItem) -> Option<u64> {
        let index = match &edge.key {
            Some(key) => self
                .items_sizes
                .iter()
                .position(|s| s.key.as_ref() == Some(key))?,
            None => edge.index,
        };
        let item = self.items_sizes.get(index)?;
        let start = item
            .offset
            .saturating_sub(self.window.placeholders.backward);
        let end = start.saturating_add(item.size as u64);
        let viewport = self.viewport_size as u64;
        let distance = edge.border_distance;

        let position = match (edge.direction, edge.border) {
            (Direction::Backward, Direction::Backward) => start.saturating_add(distance),
            (Direction::Backward, Direction::Forward) => end.saturating_sub(distance),
            (Direction::Forward, Direction::Backward) => {
                start.saturating_add(distance).saturating_sub(viewport)
            }
            (Direction::Forward, Direction::Forward) => {
                end.saturating_sub(distance).saturating_sub(viewport)
            }
        };
        Some(position)
    }
}

/// Removes `remove_count` entries at `remove_position`, then inserts `add_count` entries at
/// `add_position`. The removed entries travel with the move when both counts match.
pub(crate) fn move_entries(
    entries: &mut Vec<ItemSize>,
    add_position: usize,
    add_count: usize,
    remove_position: usize,
    remove_count: usize,
) {
    let start = remove_position.min(entries.len());
    let end = remove_position.saturating_add(remove_count).min(entries.len());
    let removed: Vec<ItemSize> = entries.drain(start..end).collect();

    let at = add_position.min(entries.len());
    if removed.len() == add_count {
        entries.splice(at..at, removed);
    } else {
        entries.splice(at..at, core::iter::repeat_n(ItemSize::default(), add_count));
    }
}
