// Example: a trigger-driven window over a large collection.
use virtual_scroll::{Calculator, CalculatorOptions, Direction, VirtualScrollConfig};

fn main() {
    let mut calc = Calculator::new(CalculatorOptions::new(VirtualScrollConfig::new(40), 10_000))
        .expect("valid config");
    println!("initial range={:?}", calc.range());

    // The forward trigger keeps firing while the user scrolls down.
    for _ in 0..5 {
        let result = calc.shift_range_to_direction(Direction::Forward, calc.total_count());
        println!(
            "shift forward: range={:?} placeholders={:?}",
            result.range, result.placeholders
        );
    }

    let result = calc.shift_range_to_index(9_990, calc.total_count());
    println!("scroll to 9990: range={:?}", result.range);

    let result = calc.shift_range_to_direction(Direction::Forward, calc.total_count());
    println!(
        "at the end: indexes_changed={} (load more data)",
        result.indexes_changed
    );
}
