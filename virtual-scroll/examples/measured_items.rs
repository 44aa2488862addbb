// Example: measuring rendered items through a simulated container.
use virtual_scroll::{
    Calculator, CalculatorOptions, ItemsContainer, ItemsRange, ItemsSizesController,
    ItemsSizesOptions, MeasuredItem, VirtualScrollConfig,
};

/// Renders item `i` with a height of `20 + i % 3 * 10`.
struct SimContainer {
    range: ItemsRange,
}

impl ItemsContainer for SimContainer {
    fn measure_items(&self, _selector: &str) -> Vec<MeasuredItem> {
        (self.range.start_index..self.range.end_index)
            .map(|i| MeasuredItem::keyed(20 + (i % 3) as u32 * 10, format!("item-{i}")))
            .collect()
    }

    fn content_size_before_items(&self) -> u64 {
        48
    }
}

fn main() {
    let total = 1_000;
    let mut calc = Calculator::new(
        CalculatorOptions::new(VirtualScrollConfig::new(30), total)
            .with_viewport_size(400)
            .with_content_size(900),
    )
    .expect("valid config");

    let mut sizes = ItemsSizesController::new(ItemsSizesOptions::new(total), None);
    sizes.set_items_container(Some(Box::new(SimContainer {
        range: calc.range(),
    })));

    match sizes.update_items_sizes(calc.range()) {
        Ok(measured) => {
            let result = calc.update_items_sizes(measured);
            println!(
                "measured {:?}: placeholders={:?}",
                result.range, result.placeholders
            );
        }
        Err(err) => eprintln!("measure failed: {err}"),
    }

    calc.set_scroll_position(120);
    println!("first visible={:?}", calc.first_visible_item_index());
    println!(
        "edge items: backward={:?} forward={:?}",
        calc.edge_visible_item(virtual_scroll::Direction::Backward),
        calc.edge_visible_item(virtual_scroll::Direction::Forward)
    );
}
