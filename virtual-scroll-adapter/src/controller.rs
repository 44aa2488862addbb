use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::String;
use core::fmt;

use virtual_scroll::{
    Calculator, CalculatorOptions, ConfigError, Direction, EdgeItem, HasItemsOutRange,
    IntersectionEvent, ItemSize, ItemsContainer, ItemsRange, ItemsSizes, ItemsSizesController,
    ItemsSizesOptions, ObserversController, ObserversOptions, Placeholders, RangeChangeResult,
    TriggerPosition, TriggersCoefficients, TriggersHost, TriggersOffsets, TriggersPositions,
};

use crate::anchor::{self, RestoreScrollParams};
use crate::{
    IndexesChangedParams, ScrollControllerCallbacks, ScrollControllerOptions, ScrollMode,
    ScrollToPageMode,
};

/// The facade a list view talks to.
///
/// It owns one [`Calculator`], one [`ItemsSizesController`] and one [`ObserversController`] and
/// turns UI events into window changes:
/// - `viewport_resized` / `content_resized` / `scroll_position_change` when the scroll container
///   changes
/// - `add_items` / `remove_items` / `move_items` / `reset_items` when the collection changes
/// - `update_items_sizes` after every render
/// - `queue_intersection` + `process_intersections` (or `check_triggers_visibility`) for the edge
///   triggers
///
/// Results fan out through [`ScrollControllerCallbacks`]. Host errors (element count mismatch,
/// missing triggers) are logged and the last good state is kept.
pub struct ScrollController {
    calculator: Calculator,
    items_sizes: ItemsSizesController,
    observers: ObserversController,
    callbacks: ScrollControllerCallbacks,

    viewport_size: u32,
    content_size: u64,
    intersections: VecDeque<IntersectionEvent>,
}

impl fmt::Debug for ScrollController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollController")
            .field("calculator", &self.calculator)
            .field("items_sizes", &self.items_sizes)
            .field("observers", &self.observers)
            .field("callbacks", &self.callbacks)
            .field("viewport_size", &self.viewport_size)
            .field("content_size", &self.content_size)
            .field("pending_intersections", &self.intersections.len())
            .finish()
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_recoverable(context: &'static str, err: &dyn fmt::Display) {
    vwarn!(error = %err, context, "recoverable virtual scroll error");
}

impl ScrollController {
    /// Builds the controllers and fires `indexes_initialized` for the initial window.
    pub fn new(
        options: ScrollControllerOptions,
        callbacks: ScrollControllerCallbacks,
        items_container: Option<Box<dyn ItemsContainer>>,
        triggers_host: Option<Box<dyn TriggersHost>>,
    ) -> Result<Self, ConfigError> {
        let items_sizes = ItemsSizesController::new(
            ItemsSizesOptions::new(options.total_count)
                .with_items_query_selector(options.items_query_selector),
            items_container,
        );

        let mut observers = ObserversController::new(ObserversOptions {
            triggers_query_selector: options.triggers_query_selector,
            viewport_size: options.viewport_size,
            content_size: options.content_size,
            triggers_visibility: options.triggers_visibility,
            triggers_positions: TriggersPositions::default(),
            coefficients: options.triggers_coefficients,
            additional_offsets: options.additional_triggers_offsets,
        })?;
        observers.set_scroll_position(options.scroll_position);

        let calculator = Calculator::new(
            CalculatorOptions::new(options.config, options.total_count)
                .with_disable_virtual_scroll(options.disable_virtual_scroll)
                .with_viewport_size(options.viewport_size)
                .with_content_size(options.content_size)
                .with_scroll_position(options.scroll_position)
                .with_triggers_offsets(observers.triggers_offsets())
                .with_items_sizes(items_sizes.items_sizes().to_vec())
                .with_given_items_sizes(options.given_items_sizes),
        )?;
        // Only a valid config gets to observe the host.
        if let Err(err) = observers.set_list_container(triggers_host) {
            log_recoverable("ScrollController::new", &err);
        }
        vdebug!(
            total_count = options.total_count,
            start_index = options.start_index,
            strategy = ?calculator.strategy(),
            "ScrollController::new"
        );

        let mut controller = Self {
            calculator,
            items_sizes,
            observers,
            callbacks,
            viewport_size: options.viewport_size,
            content_size: options.content_size,
            intersections: VecDeque::new(),
        };
        let result = controller.reset_window(options.total_count, options.start_index);
        controller.handle_initializing_result(&result, true);
        Ok(controller)
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn range(&self) -> ItemsRange {
        self.calculator.range()
    }

    pub fn placeholders(&self) -> Placeholders {
        self.calculator.placeholders()
    }

    pub fn total_count(&self) -> usize {
        self.calculator.total_count()
    }

    pub fn items_sizes(&self) -> &[ItemSize] {
        self.items_sizes.items_sizes()
    }

    pub fn has_items_out_range(&self) -> HasItemsOutRange {
        self.calculator.has_items_out_range()
    }

    pub fn triggers_offsets(&self) -> TriggersOffsets {
        self.observers.triggers_offsets()
    }

    pub fn active_element_index(&self) -> Option<usize> {
        self.calculator.active_element_index()
    }

    pub fn first_visible_item_index(&self) -> Option<usize> {
        self.calculator.first_visible_item_index()
    }

    /// Stops trigger observation. Queued intersections are dropped.
    pub fn destroy(&mut self) {
        vdebug!("ScrollController::destroy");
        self.intersections.clear();
        self.observers.destroy();
    }

    // Scroll container ------------------------------------------------------------------------

    /// Returns `true` when the size changed.
    pub fn viewport_resized(&mut self, viewport_size: u32) -> bool {
        if self.viewport_size == viewport_size {
            return false;
        }
        self.viewport_size = viewport_size;
        let offsets = self.observers.set_viewport_size(viewport_size);
        self.calculator.set_triggers_offsets(offsets);
        self.calculator.set_viewport_size(viewport_size);
        true
    }

    /// Returns `true` when the size changed.
    pub fn content_resized(&mut self, content_size: u64) -> bool {
        if self.content_size == content_size {
            return false;
        }
        self.content_size = content_size;
        self.calculator.set_content_size(content_size);
        self.observers.set_content_size(content_size);
        true
    }

    /// Handles a regular scroll; `position` is measured on the rendered content.
    pub fn scroll_position_change(&mut self, position: u64, update_active_element: bool) {
        let change = self
            .calculator
            .scroll_position_change(position, update_active_element);
        if change.changed {
            if let (Some(index), Some(cb)) =
                (change.index, self.callbacks.active_element_changed.as_ref())
            {
                cb(index);
            }
        }
        self.observers.set_scroll_position(position);
    }

    // Host objects ----------------------------------------------------------------------------

    /// Replaces the items container and re-measures the rendered window.
    pub fn set_items_container(&mut self, items_container: Option<Box<dyn ItemsContainer>>) {
        self.items_sizes.set_items_container(items_container);
        self.remeasure_from_scratch();
    }

    pub fn set_items_query_selector(&mut self, selector: impl Into<String>) {
        self.items_sizes.set_items_query_selector(selector);
        self.remeasure_from_scratch();
    }

    fn remeasure_from_scratch(&mut self) {
        self.items_sizes.reset_items(self.calculator.total_count());
        self.update_items_sizes();
    }

    /// Replaces the list container; the triggers are rebound inside it.
    pub fn set_list_container(&mut self, triggers_host: Option<Box<dyn TriggersHost>>) {
        if let Err(err) = self.observers.set_list_container(triggers_host) {
            log_recoverable("ScrollController::set_list_container", &err);
        }
    }

    pub fn set_triggers_query_selector(&mut self, selector: impl Into<String>) {
        if let Err(err) = self.observers.set_triggers_query_selector(selector) {
            log_recoverable("ScrollController::set_triggers_query_selector", &err);
        }
    }

    /// Number of elements (e.g. sticky headers) rendered in addition to the window.
    pub fn set_items_rendered_outside_range(&mut self, count: usize) {
        self.items_sizes.set_count_items_rendered_outside_range(count);
    }

    // Triggers --------------------------------------------------------------------------------

    pub fn set_trigger_visible(&mut self, direction: Direction, visible: bool) {
        self.observers.set_trigger_visible(direction, visible);
    }

    pub fn set_trigger_position(&mut self, direction: Direction, position: TriggerPosition) {
        let offsets = self.observers.set_trigger_position(direction, position);
        self.calculator.set_triggers_offsets(offsets);
    }

    pub fn set_additional_triggers_offsets(&mut self, offsets: TriggersOffsets) {
        let offsets = self.observers.set_additional_triggers_offsets(offsets);
        self.calculator.set_triggers_offsets(offsets);
    }

    pub fn set_triggers_offset_coefficients(
        &mut self,
        coefficients: TriggersCoefficients,
    ) -> Result<(), ConfigError> {
        let offsets = self.observers.set_triggers_offset_coefficients(coefficients)?;
        self.calculator.set_triggers_offsets(offsets);
        Ok(())
    }

    /// Polls the triggers against the current scroll geometry and fires the visible ones.
    pub fn check_triggers_visibility(&mut self) {
        let content_before = self.items_sizes.content_size_before_items();
        for direction in self.observers.check_triggers_visibility(content_before) {
            self.on_trigger(direction);
        }
    }

    /// Queues an intersection reported by the host. A repeat of the last queued event is dropped.
    pub fn queue_intersection(&mut self, event: IntersectionEvent) {
        if self.intersections.back() == Some(&event) {
            return;
        }
        self.intersections.push_back(event);
    }

    pub fn pending_intersections(&self) -> usize {
        self.intersections.len()
    }

    /// Runs the queued intersections in order, each one against the state left by the previous
    /// one. Returns how many events were processed.
    pub fn process_intersections(&mut self) -> usize {
        let mut processed = 0;
        while let Some(event) = self.intersections.pop_front() {
            processed += 1;
            if let Some(direction) = self.observers.on_intersection(event) {
                self.on_trigger(direction);
            }
        }
        processed
    }

    /// Shifts the window after the trigger in `direction` fired.
    ///
    /// This is the only place that reports `items_ended`.
    fn on_trigger(&mut self, direction: Direction) {
        let total_count = self.calculator.total_count();
        let result = self
            .calculator
            .shift_range_to_direction(direction, total_count);
        self.process_calculator_result(&result, ScrollMode::Fixed);

        // From now on the trigger fires ahead of the edge.
        let offsets = self
            .observers
            .set_trigger_position(direction, TriggerPosition::Offset);
        self.calculator.set_triggers_offsets(offsets);

        if !result.indexes_changed {
            vtrace!(?direction, "ScrollController: items ended");
            if let Some(cb) = self.callbacks.items_ended.as_ref() {
                cb(direction);
            }
        }
    }

    // Items sizes -----------------------------------------------------------------------------

    /// Measures the current window. Call it after every render.
    pub fn update_items_sizes(&mut self) {
        let range = self.calculator.range();
        self.update_items_sizes_for(range);
    }

    pub fn update_items_sizes_for(&mut self, range: ItemsRange) {
        let result = match self.items_sizes.update_items_sizes(range) {
            Ok(sizes) => self.calculator.update_items_sizes(sizes),
            Err(err) => {
                log_recoverable("ScrollController::update_items_sizes", &err);
                return;
            }
        };
        self.process_calculator_result(&result, ScrollMode::Fixed);
    }

    // Collection changes ----------------------------------------------------------------------

    pub fn add_items(&mut self, position: usize, count: usize, scroll_mode: ScrollMode) {
        self.items_sizes.add_items(position, count);
        let total_count = self.calculator.total_count().saturating_add(count);
        let result = self.calculator.add_items(position, count, total_count);

        // Items arrived in this direction: the next load should start ahead of the edge.
        if let Some(direction) = result.shift_direction {
            let offsets = self
                .observers
                .set_trigger_position(direction, TriggerPosition::Offset);
            self.calculator.set_triggers_offsets(offsets);
        }
        self.process_calculator_result(&result, scroll_mode);
    }

    pub fn remove_items(&mut self, position: usize, count: usize, scroll_mode: ScrollMode) {
        let total_count = self.calculator.total_count();
        let count = count.min(total_count.saturating_sub(position));
        self.items_sizes.remove_items(position, count);
        let result = self
            .calculator
            .remove_items(position, count, total_count - count);
        self.process_calculator_result(&result, scroll_mode);
    }

    /// `remove_position` is an index before the move, `add_position` one after it.
    pub fn move_items(
        &mut self,
        add_position: usize,
        add_count: usize,
        remove_position: usize,
        remove_count: usize,
    ) {
        self.items_sizes
            .move_items(add_position, add_count, remove_position, remove_count);
        let total_count = self
            .calculator
            .total_count()
            .saturating_add(add_count)
            .saturating_sub(remove_count);
        let result = self.calculator.move_items(
            add_position,
            add_count,
            remove_position,
            remove_count,
            total_count,
        );
        self.process_calculator_result(&result, ScrollMode::Fixed);
    }

    /// Replaces the whole collection and fires `indexes_initialized` for the new window.
    ///
    /// `has_items_out_range_changed` and `placeholders_changed` only fire when those values
    /// actually changed.
    pub fn reset_items(&mut self, total_count: usize, start_index: usize) {
        let result = self.reset_window(total_count, start_index);
        self.handle_initializing_result(&result, false);
    }

    /// Replaces the sizes known before rendering. They shape the window on the next reset.
    pub fn update_given_items_sizes(&mut self, sizes: Option<ItemsSizes>) {
        self.calculator.update_given_items_sizes(sizes);
    }

    fn reset_window(&mut self, total_count: usize, start_index: usize) -> RangeChangeResult {
        let offsets = self.observers.reset_items();
        self.calculator.set_triggers_offsets(offsets);
        self.items_sizes.reset_items(total_count);
        self.intersections.clear();

        self.calculator.reset_items_from(total_count, start_index)
    }

    // Scrolling -------------------------------------------------------------------------------

    /// Makes `index` rendered. Returns whether the window changed.
    pub fn scroll_to_item(&mut self, index: usize) -> bool {
        let total_count = self.calculator.total_count();
        let result = self.calculator.shift_range_to_index(index, total_count);
        self.process_calculator_result(&result, ScrollMode::Fixed);
        result.indexes_changed
    }

    /// Rebuilds the window around a virtual scroll position, e.g. after the user dragged the
    /// scrollbar into the placeholder. Returns whether the window changed.
    pub fn scroll_to_virtual_position(&mut self, position: u64) -> bool {
        let result = self
            .calculator
            .shift_range_to_virtual_scroll_position(position);
        self.process_calculator_result(&result, ScrollMode::Fixed);
        result.indexes_changed
    }

    pub fn capture_edge_item(&self, direction: Direction) -> Option<EdgeItem> {
        self.calculator.edge_visible_item(direction)
    }

    /// Captures the edge item to restore after the change announced by `indexes_changed`.
    pub fn capture_restore_edge_item(&self, params: &IndexesChangedParams) -> Option<EdgeItem> {
        let params = RestoreScrollParams::from_indexes_changed(params)?;
        anchor::capture_edge_item(&self.calculator, &params)
    }

    pub fn scroll_position_to_edge_item(&self, edge: &EdgeItem) -> Option<u64> {
        anchor::restore_scroll_position(&self.calculator, edge)
    }

    pub fn scroll_to_page_mode(&self, edge_item_key: &str) -> ScrollToPageMode {
        anchor::scroll_to_page_mode(&self.calculator, edge_item_key)
    }

    // Results ---------------------------------------------------------------------------------

    fn process_calculator_result(&mut self, result: &RangeChangeResult, scroll_mode: ScrollMode) {
        if result.placeholders_changed {
            if let Some(cb) = self.callbacks.placeholders_changed.as_ref() {
                cb(result.placeholders);
            }
        }

        if result.has_items_out_range_changed {
            self.observers
                .set_has_items_out_range(result.has_items_out_range);
            if let Some(cb) = self.callbacks.has_items_out_range_changed.as_ref() {
                cb(result.has_items_out_range);
            }
        }

        if result.indexes_changed {
            vtrace!(
                start = result.range.start_index,
                end = result.range.end_index,
                ?scroll_mode,
                "ScrollController: indexes changed"
            );
            if let Some(cb) = self.callbacks.indexes_changed.as_ref() {
                cb(&indexes_changed_params(result, scroll_mode));
            }
        }
    }

    /// `announce_all` reports every value, changed or not; the first window has no prior state.
    fn handle_initializing_result(&mut self, result: &RangeChangeResult, announce_all: bool) {
        if let Some(cb) = self.callbacks.indexes_initialized.as_ref() {
            cb(&indexes_changed_params(result, ScrollMode::Fixed));
        }

        let has_items_out_range = self.calculator.has_items_out_range();
        self.observers.set_has_items_out_range(has_items_out_range);
        if announce_all || result.has_items_out_range_changed {
            if let Some(cb) = self.callbacks.has_items_out_range_changed.as_ref() {
                cb(has_items_out_range);
            }
        }
        if announce_all || result.placeholders_changed {
            if let Some(cb) = self.callbacks.placeholders_changed.as_ref() {
                cb(result.placeholders);
            }
        }
    }
}

fn indexes_changed_params(result: &RangeChangeResult, scroll_mode: ScrollMode) -> IndexesChangedParams {
    IndexesChangedParams {
        range: result.range,
        old_range: result.old_range,
        old_placeholders: result.old_placeholders,
        shift_direction: result.shift_direction,
        scroll_mode,
    }
}
