//! A headless virtual scroll engine for lists backed by a large collection.
//!
//! For the facade that wires everything to a UI (callbacks, intersection queue, scroll
//! anchoring), see the `virtual-scroll-adapter` crate.
//!
//! The crate decides which window `[start, end)` of the collection is rendered. It keeps the
//! placeholders standing in for the items outside the window, tracks measured item sizes and
//! turns edge-trigger intersections into window shifts. Collection mutations (insert, remove,
//! move, reset) keep the window on the same items.
//!
//! It is UI-agnostic. The host is expected to provide:
//! - the collection size and its structural changes
//! - viewport size, content size and scroll position
//! - access to the rendered items ([`ItemsContainer`]) and the edge triggers ([`TriggersHost`])
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod calculator;
mod error;
mod items_sizes;
mod observers;
mod options;
mod state;
mod strategy;
mod types;
pub mod util;


pub use calculator::Calculator;
pub use error::{ConfigError, ItemsSizesError, ObserversError};
pub use items_sizes::{ItemsContainer, ItemsSizesController, MeasuredItem};
pub use observers::{IntersectionEvent, ObserversController, TriggersHost};
pub use options::{
    CalculatorOptions, DEFAULT_ITEMS_QUERY_SELECTOR, DEFAULT_PAGE_SIZE,
    DEFAULT_TRIGGER_OFFSET_COEFFICIENT, DEFAULT_TRIGGERS_QUERY_SELECTOR, ItemsSizesOptions,
    ObserversOptions, TriggersCoefficients, VirtualScrollConfig,
};
pub use state::{Geometry, WindowState};
pub use strategy::RangeStrategy;
pub use types::{
    ActiveElementChange, Direction, EdgeItem, HasItemsOutRange, ItemSize, ItemsRange, ItemsSizes,
    Placeholders, RangeChangeResult, TriggerPosition, TriggersOffsets, TriggersPositions,
    TriggersVisibility,
};
