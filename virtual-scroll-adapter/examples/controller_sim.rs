// Example: a simulated list view driving `ScrollController`.
//
// The "host" renders fixed 40px rows, reports trigger intersections and restores the scroll
// position after backward shifts.
use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use virtual_scroll::{Direction, IntersectionEvent, ItemsContainer, ItemsRange, MeasuredItem};
use virtual_scroll_adapter::{
    IndexesChangedParams, ScrollController, ScrollControllerCallbacks, ScrollControllerOptions,
    virtual_scroll::VirtualScrollConfig,
};

const ROW: u32 = 40;

#[derive(Clone)]
struct Rows {
    rendered: Rc<Cell<ItemsRange>>,
}

impl ItemsContainer for Rows {
    fn measure_items(&self, _selector: &str) -> Vec<MeasuredItem> {
        let range = self.rendered.get();
        (range.start_index..range.end_index)
            .map(|i| MeasuredItem::keyed(ROW, format!("row-{i}")))
            .collect()
    }

    fn content_size_before_items(&self) -> u64 {
        0
    }
}

fn main() {
    let changes: Arc<Mutex<Vec<IndexesChangedParams>>> = Arc::default();
    let sink = changes.clone();
    let callbacks = ScrollControllerCallbacks::new()
        .with_indexes_changed(move |params| {
            if let Ok(mut changes) = sink.lock() {
                changes.push(*params);
            }
        })
        .with_items_ended(|direction| println!("items ended: {direction:?}"));

    let rows = Rows {
        rendered: Rc::new(Cell::new(ItemsRange::EMPTY)),
    };
    let mut controller = ScrollController::new(
        ScrollControllerOptions::new(VirtualScrollConfig::new(20), 500)
            .with_viewport_size(400)
            .with_content_size(20 * ROW as u64),
        callbacks,
        Some(Box::new(rows.clone())),
        None,
    )
    .expect("valid config");

    let render = |controller: &mut ScrollController| {
        rows.rendered.set(controller.range());
        controller.update_items_sizes();
        let len = controller.range().len() as u64;
        controller.content_resized(len * ROW as u64);
    };
    render(&mut controller);

    // Scroll down a few pages.
    let mut scroll = 0u64;
    for _ in 0..5 {
        scroll += 300;
        controller.scroll_position_change(scroll, true);
        controller.queue_intersection(IntersectionEvent::ForwardIn);
        controller.process_intersections();
        render(&mut controller);
        println!(
            "range={:?} placeholders={:?} active={:?}",
            controller.range(),
            controller.placeholders(),
            controller.active_element_index()
        );
    }

    // Scroll back up and keep the first visible row in place.
    controller.scroll_position_change(50, false);
    controller.queue_intersection(IntersectionEvent::BackwardIn);
    controller.process_intersections();

    let last = changes.lock().ok().and_then(|c| c.last().copied());
    if let Some(params) = last.filter(|p| p.shift_direction == Some(Direction::Backward)) {
        let edge = controller.capture_restore_edge_item(&params);
        render(&mut controller);
        if let Some(edge) = edge {
            println!(
                "restored {:?} at scroll={:?}",
                edge.key,
                controller.scroll_position_to_edge_item(&edge)
            );
        }
    }
}
