use crate::*;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use std::sync::{Arc, Mutex};

use virtual_scroll::{
    ConfigError, Direction, HasItemsOutRange, IntersectionEvent, ItemSize, ItemsContainer,
    ItemsRange, MeasuredItem, Placeholders, TriggerPosition, TriggersCoefficients, TriggersHost,
    TriggersOffsets, VirtualScrollConfig,
};

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Initialized(IndexesChangedParams),
    Changed(IndexesChangedParams),
    Placeholders(Placeholders),
    HasItems(HasItemsOutRange),
    Active(usize),
    Ended(Direction),
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Event>>>);

impl Recorder {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    fn take(&self) -> Vec<Event> {
        core::mem::take(&mut *self.0.lock().unwrap())
    }

    fn callbacks(&self) -> ScrollControllerCallbacks {
        let (a, b, c, d, e, f) = (
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
        );
        ScrollControllerCallbacks::new()
            .with_indexes_initialized(move |p| a.push(Event::Initialized(*p)))
            .with_indexes_changed(move |p| b.push(Event::Changed(*p)))
            .with_placeholders_changed(move |p| c.push(Event::Placeholders(p)))
            .with_has_items_out_range_changed(move |h| d.push(Event::HasItems(h)))
            .with_active_element_changed(move |i| e.push(Event::Active(i)))
            .with_items_ended(move |dir| f.push(Event::Ended(dir)))
    }
}

fn changed_ranges(events: &[Event]) -> Vec<ItemsRange> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Changed(p) => Some(p.range),
            _ => None,
        })
        .collect()
}

/// A list whose rendered items are all `item_size` px and keyed `item-{index}`.
#[derive(Clone)]
struct FakeList {
    rendered: Rc<Cell<ItemsRange>>,
    item_size: u32,
    sticky_header: Rc<Cell<bool>>,
}

impl FakeList {
    fn new(item_size: u32) -> Self {
        Self {
            rendered: Rc::new(Cell::new(ItemsRange::EMPTY)),
            item_size,
            sticky_header: Rc::new(Cell::new(false)),
        }
    }
}

impl ItemsContainer for FakeList {
    fn measure_items(&self, _selector: &str) -> Vec<MeasuredItem> {
        let range = self.rendered.get();
        let header = self
            .sticky_header
            .get()
            .then(|| MeasuredItem::outside_range(30));
        header
            .into_iter()
            .chain(
                (range.start_index..range.end_index)
                    .map(|i| MeasuredItem::keyed(self.item_size, format!("item-{i}"))),
            )
            .collect()
    }

    fn content_size_before_items(&self) -> u64 {
        0
    }
}

/// Page 10, segment 5, a 300px viewport over 500px of rendered content.
fn options(total_count: usize) -> ScrollControllerOptions {
    ScrollControllerOptions::new(VirtualScrollConfig::new(10).with_segment_size(5), total_count)
        .with_viewport_size(300)
        .with_content_size(500)
}

fn measured_controller(recorder: &Recorder) -> (ScrollController, FakeList) {
    let list = FakeList::new(50);
    let controller = ScrollController::new(
        options(100),
        recorder.callbacks(),
        Some(Box::new(list.clone())),
        None,
    )
    .unwrap();
    (controller, list)
}

fn bare_controller(recorder: &Recorder, options: ScrollControllerOptions) -> ScrollController {
    ScrollController::new(options, recorder.callbacks(), None, None).unwrap()
}

fn render(controller: &mut ScrollController, list: &FakeList) {
    list.rendered.set(controller.range());
    controller.update_items_sizes();
}

fn trigger(controller: &mut ScrollController, event: IntersectionEvent) {
    controller.queue_intersection(event);
    controller.process_intersections();
}

// Lifecycle -----------------------------------------------------------------------------------

#[test]
fn new_reports_the_initial_window_once() {
    let recorder = Recorder::default();
    let controller = bare_controller(&recorder, options(100));

    assert_eq!(controller.range(), ItemsRange::new(0, 10));
    assert_eq!(controller.total_count(), 100);
    assert_eq!(
        recorder.take(),
        [
            Event::Initialized(IndexesChangedParams {
                range: ItemsRange::new(0, 10),
                old_range: ItemsRange::new(0, 10),
                old_placeholders: Placeholders::default(),
                shift_direction: None,
                scroll_mode: ScrollMode::Fixed,
            }),
            Event::HasItems(HasItemsOutRange {
                backward: false,
                forward: true
            }),
            Event::Placeholders(Placeholders::default()),
        ]
    );
    assert_eq!(controller.triggers_offsets(), TriggersOffsets::default());
}

#[test]
fn invalid_coefficients_are_rejected() {
    let recorder = Recorder::default();
    let err = ScrollController::new(
        options(10).with_triggers_coefficients(TriggersCoefficients {
            backward: -1.0,
            forward: 0.3,
        }),
        recorder.callbacks(),
        None,
        None,
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::InvalidTriggerCoefficient(-1.0));
    assert!(recorder.take().is_empty());
}

#[test]
fn reset_items_pins_the_triggers_and_reinitializes() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(100));
    controller.set_trigger_position(Direction::Forward, TriggerPosition::Offset);
    assert_eq!(controller.triggers_offsets().forward, 90);
    controller.queue_intersection(IntersectionEvent::ForwardIn);
    recorder.take();

    controller.reset_items(50, 20);
    assert_eq!(controller.pending_intersections(), 0);
    assert_eq!(controller.triggers_offsets(), TriggersOffsets::default());
    assert_eq!(controller.total_count(), 50);
    assert_eq!(
        recorder.take(),
        [
            Event::Initialized(IndexesChangedParams {
                range: ItemsRange::new(20, 30),
                old_range: ItemsRange::new(0, 10),
                old_placeholders: Placeholders::default(),
                shift_direction: None,
                scroll_mode: ScrollMode::Fixed,
            }),
            Event::HasItems(HasItemsOutRange {
                backward: true,
                forward: true
            }),
        ]
    );
}

#[test]
fn reset_to_the_same_window_only_reinitializes() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(100));
    recorder.take();

    controller.reset_items(100, 0);
    assert_eq!(
        recorder.take(),
        [Event::Initialized(IndexesChangedParams {
            range: ItemsRange::new(0, 10),
            old_range: ItemsRange::new(0, 10),
            old_placeholders: Placeholders::default(),
            shift_direction: None,
            scroll_mode: ScrollMode::Fixed,
        })]
    );
}

#[test]
fn given_items_sizes_open_a_viewport_sized_window() {
    let recorder = Recorder::default();
    let given: Vec<ItemSize> = (0..10).map(|i| ItemSize::new(50, i * 50)).collect();
    let mut controller = bare_controller(
        &recorder,
        options(10).with_given_items_sizes(Some(given.clone())),
    );
    assert_eq!(controller.range(), ItemsRange::new(0, 7));

    controller.reset_items(5, 2);
    assert_eq!(controller.range(), ItemsRange::new(2, 5));

    controller.update_given_items_sizes(None);
    controller.reset_items(20, 0);
    assert_eq!(controller.range(), ItemsRange::new(0, 10));

    controller.update_given_items_sizes(Some(given));
    controller.reset_items(10, 0);
    assert_eq!(controller.range(), ItemsRange::new(0, 7));
}

// Triggers ------------------------------------------------------------------------------------

#[test]
fn forward_trigger_shifts_the_window_and_unlocks_its_offset() {
    let recorder = Recorder::default();
    let (mut controller, list) = measured_controller(&recorder);
    render(&mut controller, &list);
    recorder.take();

    controller.queue_intersection(IntersectionEvent::ForwardIn);
    assert_eq!(controller.process_intersections(), 1);

    assert_eq!(
        recorder.take(),
        [
            Event::Placeholders(Placeholders {
                backward: 150,
                forward: 0
            }),
            Event::HasItems(HasItemsOutRange {
                backward: true,
                forward: true
            }),
            Event::Changed(IndexesChangedParams {
                range: ItemsRange::new(3, 15),
                old_range: ItemsRange::new(0, 10),
                old_placeholders: Placeholders::default(),
                shift_direction: Some(Direction::Forward),
                scroll_mode: ScrollMode::Fixed,
            }),
        ]
    );
    assert_eq!(
        controller.triggers_offsets(),
        TriggersOffsets {
            backward: 0,
            forward: 90
        }
    );
    assert_eq!(
        controller.calculator().triggers_offsets(),
        controller.triggers_offsets()
    );
}

#[test]
fn items_ended_fires_only_when_nothing_is_left_to_render() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(8));
    assert_eq!(controller.range(), ItemsRange::new(0, 8));
    recorder.take();

    trigger(&mut controller, IntersectionEvent::ForwardIn);
    assert_eq!(recorder.take(), [Event::Ended(Direction::Forward)]);

    controller.add_items(8, 10, ScrollMode::Fixed);
    recorder.take();
    trigger(&mut controller, IntersectionEvent::ForwardIn);
    let events = recorder.take();
    assert_eq!(changed_ranges(&events), [ItemsRange::new(3, 13)]);
    assert!(!events.contains(&Event::Ended(Direction::Forward)));
}

#[test]
fn repeated_intersections_are_coalesced_and_run_in_order() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(100).with_content_size(0));
    recorder.take();

    controller.queue_intersection(IntersectionEvent::ForwardIn);
    controller.queue_intersection(IntersectionEvent::ForwardIn);
    assert_eq!(controller.pending_intersections(), 1);
    controller.queue_intersection(IntersectionEvent::ForwardOut);
    controller.queue_intersection(IntersectionEvent::ForwardIn);
    assert_eq!(controller.pending_intersections(), 3);

    assert_eq!(controller.process_intersections(), 3);
    assert_eq!(controller.pending_intersections(), 0);
    assert_eq!(
        changed_ranges(&recorder.take()),
        [ItemsRange::new(0, 15), ItemsRange::new(0, 20)]
    );
}

#[test]
fn hidden_trigger_is_ignored() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(100));
    controller.set_trigger_visible(Direction::Forward, false);
    recorder.take();

    trigger(&mut controller, IntersectionEvent::ForwardIn);
    assert!(recorder.take().is_empty());
    assert_eq!(controller.range(), ItemsRange::new(0, 10));
}

#[test]
fn polling_the_triggers_follows_the_scroll_position() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(100));
    recorder.take();

    // At the top only the backward trigger is in view, and nothing is above.
    controller.check_triggers_visibility();
    assert_eq!(recorder.take(), [Event::Ended(Direction::Backward)]);

    controller.scroll_position_change(200, false);
    controller.check_triggers_visibility();
    let events = recorder.take();
    assert_eq!(changed_ranges(&events), [ItemsRange::new(5, 15)]);
    assert!(events.contains(&Event::HasItems(HasItemsOutRange {
        backward: true,
        forward: true
    })));
}

#[test]
fn viewport_resize_recomputes_trigger_offsets() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(100));
    controller.set_trigger_position(Direction::Forward, TriggerPosition::Offset);

    assert!(controller.viewport_resized(600));
    assert!(!controller.viewport_resized(600));
    assert_eq!(
        controller.triggers_offsets(),
        TriggersOffsets {
            backward: 0,
            forward: 180
        }
    );
    assert_eq!(controller.calculator().viewport_size(), 600);
    assert_eq!(
        controller.calculator().triggers_offsets(),
        controller.triggers_offsets()
    );

    assert!(controller.content_resized(800));
    assert!(!controller.content_resized(800));
    assert_eq!(controller.calculator().content_size(), 800);
}

#[derive(Debug, Default)]
struct HostLog {
    observing: bool,
    disconnects: usize,
    offsets: [u32; 2],
}

struct FakeTriggersHost {
    triggers: usize,
    log: Rc<RefCell<HostLog>>,
}

impl TriggersHost for FakeTriggersHost {
    fn bind_triggers(&mut self, _selector: &str) -> usize {
        self.triggers
    }

    fn set_trigger_visible(&mut self, _direction: Direction, _visible: bool) {}

    fn apply_trigger_offset(&mut self, direction: Direction, offset: u32) {
        let slot = match direction {
            Direction::Backward => 0,
            Direction::Forward => 1,
        };
        self.log.borrow_mut().offsets[slot] = offset;
    }

    fn observe(&mut self) {
        self.log.borrow_mut().observing = true;
    }

    fn disconnect(&mut self) {
        let mut log = self.log.borrow_mut();
        log.observing = false;
        log.disconnects += 1;
    }
}

#[test]
fn triggers_host_sees_offsets_and_teardown() {
    let recorder = Recorder::default();
    let log = Rc::new(RefCell::new(HostLog::default()));
    let mut controller = ScrollController::new(
        options(100).with_content_size(0),
        recorder.callbacks(),
        None,
        Some(Box::new(FakeTriggersHost {
            triggers: 2,
            log: log.clone(),
        })),
    )
    .unwrap();
    assert!(log.borrow().observing);
    assert_eq!(log.borrow().offsets, [0, 0]);

    trigger(&mut controller, IntersectionEvent::ForwardIn);
    assert_eq!(log.borrow().offsets, [0, 90]);

    controller.destroy();
    assert!(!log.borrow().observing);
    assert_eq!(log.borrow().disconnects, 1);
}

#[test]
fn invalid_config_leaves_the_triggers_host_untouched() {
    let recorder = Recorder::default();
    let log = Rc::new(RefCell::new(HostLog::default()));
    let err = ScrollController::new(
        ScrollControllerOptions::new(VirtualScrollConfig::new(10).with_segment_size(50), 100),
        recorder.callbacks(),
        None,
        Some(Box::new(FakeTriggersHost {
            triggers: 2,
            log: log.clone(),
        })),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ConfigError::SegmentLargerThanPage {
            segment_size: 50,
            page_size: 10,
        }
    );
    assert!(!log.borrow().observing);
    assert_eq!(log.borrow().disconnects, 0);
    assert!(recorder.take().is_empty());
}

#[test]
fn list_container_without_triggers_is_not_observed() {
    let recorder = Recorder::default();
    let log = Rc::new(RefCell::new(HostLog::default()));
    let controller = ScrollController::new(
        options(100),
        recorder.callbacks(),
        None,
        Some(Box::new(FakeTriggersHost {
            triggers: 1,
            log: log.clone(),
        })),
    )
    .unwrap();
    assert!(!log.borrow().observing);
    assert_eq!(controller.range(), ItemsRange::new(0, 10));
}

// Collection changes --------------------------------------------------------------------------

#[test]
fn add_items_reports_the_requested_scroll_mode() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(100));
    assert!(controller.scroll_to_item(50));
    assert!(!controller.scroll_to_item(55));
    assert_eq!(controller.range(), ItemsRange::new(50, 60));
    recorder.take();

    controller.add_items(10, 5, ScrollMode::Unfixed);
    assert_eq!(controller.total_count(), 105);
    assert_eq!(controller.items_sizes().len(), 105);
    assert_eq!(
        recorder.take(),
        [Event::Changed(IndexesChangedParams {
            range: ItemsRange::new(55, 65),
            old_range: ItemsRange::new(50, 60),
            old_placeholders: Placeholders::default(),
            shift_direction: Some(Direction::Backward),
            scroll_mode: ScrollMode::Unfixed,
        })]
    );
    // Items arrived above: the backward trigger no longer waits for the edge.
    assert_eq!(controller.triggers_offsets().backward, 90);
}

#[test]
fn remove_items_past_the_end_is_clamped() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(100));
    recorder.take();

    controller.remove_items(95, 20, ScrollMode::Fixed);
    assert_eq!(controller.total_count(), 95);
    assert_eq!(controller.items_sizes().len(), 95);
    assert_eq!(controller.range(), ItemsRange::new(0, 10));
    assert!(recorder.take().is_empty());
}

#[test]
fn move_items_keeps_the_total_count() {
    let recorder = Recorder::default();
    let mut controller = bare_controller(&recorder, options(100));
    recorder.take();

    controller.move_items(0, 2, 20, 2);
    assert_eq!(controller.total_count(), 100);
    assert_eq!(controller.range(), ItemsRange::new(2, 12));
    let events = recorder.take();
    assert_eq!(changed_ranges(&events), [ItemsRange::new(2, 12)]);
    assert!(events.iter().all(|e| match e {
        Event::Changed(p) => p.shift_direction.is_none(),
        _ => true,
    }));
}

// Measurement ---------------------------------------------------------------------------------

#[test]
fn element_count_mismatch_keeps_the_last_sizes() {
    let recorder = Recorder::default();
    let (mut controller, list) = measured_controller(&recorder);
    recorder.take();

    list.rendered.set(ItemsRange::new(0, 3));
    controller.update_items_sizes();
    assert!(controller.items_sizes().iter().all(|s| s.size == 0));
    assert!(recorder.take().is_empty());
}

#[test]
fn items_rendered_outside_range_are_expected() {
    let recorder = Recorder::default();
    let (mut controller, list) = measured_controller(&recorder);
    list.sticky_header.set(true);

    render(&mut controller, &list);
    assert_eq!(controller.items_sizes()[0].size, 0);

    controller.set_items_rendered_outside_range(1);
    render(&mut controller, &list);
    assert_eq!(controller.items_sizes()[0].size, 50);
    assert_eq!(controller.items_sizes()[9].offset, 450);
}

// Scrolling -----------------------------------------------------------------------------------

#[test]
fn active_element_callback_fires_on_change_only() {
    let recorder = Recorder::default();
    let (mut controller, list) = measured_controller(&recorder);
    render(&mut controller, &list);
    recorder.take();

    controller.scroll_position_change(0, true);
    assert_eq!(recorder.take(), [Event::Active(0)]);
    controller.scroll_position_change(0, true);
    assert!(recorder.take().is_empty());
    assert_eq!(controller.active_element_index(), Some(0));
}

#[test]
fn backward_shift_restores_the_scroll_position_from_the_edge_item() {
    let recorder = Recorder::default();
    let (mut controller, list) = measured_controller(&recorder);
    render(&mut controller, &list);
    trigger(&mut controller, IntersectionEvent::ForwardIn);
    render(&mut controller, &list);
    assert_eq!(controller.range(), ItemsRange::new(3, 15));
    assert_eq!(controller.placeholders().backward, 150);

    controller.scroll_position_change(100, false);
    recorder.take();
    trigger(&mut controller, IntersectionEvent::BackwardIn);

    let params = recorder
        .take()
        .into_iter()
        .find_map(|e| match e {
            Event::Changed(p) => Some(p),
            _ => None,
        })
        .unwrap();
    assert_eq!(params.range, ItemsRange::new(0, 11));
    assert_eq!(params.old_range, ItemsRange::new(3, 15));
    assert_eq!(params.old_placeholders.backward, 150);
    assert_eq!(params.shift_direction, Some(Direction::Backward));

    let edge = controller.capture_restore_edge_item(&params).unwrap();
    assert_eq!(edge.key.as_deref(), Some("item-5"));
    assert_eq!(edge.border_distance, 50);

    render(&mut controller, &list);
    assert_eq!(controller.scroll_position_to_edge_item(&edge), Some(250));
}

#[test]
fn unfixed_changes_need_no_restoration() {
    let recorder = Recorder::default();
    let (controller, _list) = measured_controller(&recorder);
    let params = IndexesChangedParams {
        range: ItemsRange::new(5, 15),
        old_range: ItemsRange::new(0, 10),
        old_placeholders: Placeholders::default(),
        shift_direction: Some(Direction::Backward),
        scroll_mode: ScrollMode::Unfixed,
    };
    assert_eq!(RestoreScrollParams::from_indexes_changed(&params), None);
    assert_eq!(controller.capture_restore_edge_item(&params), None);
}

#[test]
fn page_mode_depends_on_the_edge_item_size() {
    let recorder = Recorder::default();
    let (mut controller, list) = measured_controller(&recorder);
    render(&mut controller, &list);
    assert_eq!(
        controller.scroll_to_page_mode("item-2"),
        ScrollToPageMode::EdgeItem
    );
    assert_eq!(
        controller.scroll_to_page_mode("missing"),
        ScrollToPageMode::Viewport
    );

    let list = FakeList::new(50);
    let mut controller = ScrollController::new(
        options(100).with_disable_virtual_scroll(true),
        recorder.callbacks(),
        Some(Box::new(list.clone())),
        None,
    )
    .unwrap();
    assert_eq!(controller.range(), ItemsRange::new(0, 100));
    render(&mut controller, &list);
    assert_eq!(
        controller.scroll_to_page_mode("item-2"),
        ScrollToPageMode::Viewport
    );
}

#[test]
fn callbacks_debug_lists_the_registered_hooks() {
    let recorder = Recorder::default();
    let debug = format!("{:?}", recorder.callbacks());
    assert!(debug.contains("items_ended: true"));
    let empty: String = format!("{:?}", ScrollControllerCallbacks::new());
    assert!(empty.contains("items_ended: false"));
}
