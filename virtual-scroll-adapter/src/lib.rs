//! A list-view facade over the `virtual-scroll` crate.
//!
//! `virtual-scroll` decides which window of a collection is rendered. This crate wires its three
//! controllers together the way a list view needs them:
//!
//! - [`ScrollController`] forwards scroll, resize, collection and trigger events and fans the
//!   results out through [`ScrollControllerCallbacks`]
//! - intersections reported by the host are queued and processed in order
//! - scroll anchoring: capture an edge item before a range change and restore the scroll
//!   position after the new range was measured
//!
//! It stays framework-agnostic; the host implements [`virtual_scroll::ItemsContainer`] and
//! [`virtual_scroll::TriggersHost`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod options;
mod types;

#[cfg(test)]
mod tests;

pub use anchor::{
    RestoreScrollParams, capture_edge_item, restore_scroll_position, scroll_to_page_mode,
};
pub use controller::ScrollController;
pub use options::{
    ActiveElementChangedCallback, HasItemsOutRangeChangedCallback, IndexesChangedCallback,
    IndexesInitializedCallback, ItemsEndedCallback, PlaceholdersChangedCallback,
    ScrollControllerCallbacks, ScrollControllerOptions,
};
pub use types::{IndexesChangedParams, ScrollMode, ScrollToPageMode};

pub use virtual_scroll;
