// Example: the window keeps the same items across inserts, removals and moves.
use virtual_scroll::{Calculator, CalculatorOptions, VirtualScrollConfig};

fn main() {
    let mut calc = Calculator::new(CalculatorOptions::new(VirtualScrollConfig::new(20), 500))
        .expect("valid config");
    calc.shift_range_to_index(200, 500);
    println!("range={:?}", calc.range());

    let result = calc.add_items(0, 10, 510);
    println!("prepend 10: range={:?} ({:?})", result.range, result.shift_direction);

    let result = calc.add_items(215, 3, 513);
    println!("insert inside: range={:?}", result.range);

    let result = calc.remove_items(100, 50, 463);
    println!("remove 50 before: range={:?}", result.range);

    let result = calc.move_items(400, 5, 0, 5, 463);
    println!("move 5 to the tail: range={:?}", result.range);

    let result = calc.reset_items(8);
    println!("reset to 8 items: range={:?}", result.range);
}
