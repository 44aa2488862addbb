use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::calculator::move_entries;
use crate::{ItemSize, ItemsRange, ItemsSizes, ItemsSizesError, ItemsSizesOptions};

/// One element found in the items container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeasuredItem {
    pub size: u32,
    pub key: Option<String>,
    /// Set for elements rendered in addition to the range (e.g. sticky headers). They count
    /// toward the expected element count but get no slot.
    pub outside_range: bool,
}

impl MeasuredItem {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn keyed(size: u32, key: impl Into<String>) -> Self {
        Self {
            size,
            key: Some(key.into()),
            outside_range: false,
        }
    }

    pub fn outside_range(size: u32) -> Self {
        Self {
            size,
            key: None,
            outside_range: true,
        }
    }
}

/// The rendered items, as seen by [`ItemsSizesController`].
///
/// A UI toolkit implements this over its element tree; tests implement it over plain vectors.
pub trait ItemsContainer {
    /// Measures every element matching `selector`, in render order.
    fn measure_items(&self, selector: &str) -> Vec<MeasuredItem>;

    /// Size of whatever the scroll content renders before the items container.
    fn content_size_before_items(&self) -> u64;
}

/// Keeps an index-aligned [`ItemSize`] for every item of the collection.
///
/// Only the rendered window is measured; the other entries keep the last measured values (or
/// zeros when they were never rendered).
pub struct ItemsSizesController {
    items_query_selector: String,
    items_container: Option<Box<dyn ItemsContainer>>,
    items_sizes: ItemsSizes,
    count_items_rendered_outside_range: usize,
}

impl fmt::Debug for ItemsSizesController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemsSizesController")
            .field("items_query_selector", &self.items_query_selector)
            .field("has_items_container", &self.items_container.is_some())
            .field("items_count", &self.items_sizes.len())
            .field(
                "count_items_rendered_outside_range",
                &self.count_items_rendered_outside_range,
            )
            .finish_non_exhaustive()
    }
}

impl ItemsSizesController {
    pub fn new(options: ItemsSizesOptions, items_container: Option<Box<dyn ItemsContainer>>) -> Self {
        let mut controller = Self {
            items_query_selector: options.items_query_selector,
            items_container,
            items_sizes: Vec::new(),
            count_items_rendered_outside_range: 0,
        };
        controller.reset_items(options.total_count);
        controller
    }

    pub fn items_sizes(&self) -> &[ItemSize] {
        &self.items_sizes
    }

    pub fn items_query_selector(&self) -> &str {
        &self.items_query_selector
    }

    /// Size of the content before the items container; `0` without a container.
    pub fn content_size_before_items(&self) -> u64 {
        self.items_container
            .as_ref()
            .map_or(0, |c| c.content_size_before_items())
    }

    /// Replaces the container. The next [`Self::update_items_sizes`] measures the new one.
    pub fn set_items_container(&mut self, items_container: Option<Box<dyn ItemsContainer>>) {
        vdebug!(
            attached = items_container.is_some(),
            "ItemsSizesController::set_items_container"
        );
        self.items_container = items_container;
    }

    pub fn set_items_query_selector(&mut self, selector: impl Into<String>) {
        self.items_query_selector = selector.into();
    }

    pub fn set_count_items_rendered_outside_range(&mut self, count: usize) {
        self.count_items_rendered_outside_range = count;
    }

    /// Measures the rendered elements and stores their sizes in `[range.start, range.end)`.
    ///
    /// Offsets chain from the closest measured item before the range, so a window that jumped
    /// (say from `[0, 5)` to `[10, 15)`) still gets offsets that continue the measured content.
    /// On a count mismatch nothing is written and the stale sizes stay in place.
    pub fn update_items_sizes(
        &mut self,
        range: ItemsRange,
    ) -> Result<&[ItemSize], ItemsSizesError> {
        let range = range.clamped(self.items_sizes.len());
        let Some(container) = self.items_container.as_ref() else {
            for item in &mut self.items_sizes[range.start_index..range.end_index] {
                *item = ItemSize::default();
            }
            return Ok(&self.items_sizes);
        };

        let elements = container.measure_items(&self.items_query_selector);
        let expected = range.len() + self.count_items_rendered_outside_range;
        if elements.len() != expected {
            return Err(ItemsSizesError::ElementsCountMismatch {
                expected,
                actual: elements.len(),
                selector: self.items_query_selector.clone(),
            });
        }

        let content_before = container.content_size_before_items();
        let first_item_offset = self.items_sizes.first().map_or(0, |s| s.offset);
        let rendered_before = self.rendered_item_before(range.start_index);

        let mut position = range.start_index;
        for element in elements.into_iter().filter(|e| !e.outside_range) {
            if position >= range.end_index {
                break;
            }
            let previous = if position == range.start_index {
                rendered_before.clone()
            } else {
                self.items_sizes.get(position - 1).cloned()
            };
            let mut offset = previous.map_or(0, |p| p.end());
            if position == range.start_index {
                offset = offset.saturating_add(content_before);
                // The first item's offset already holds `content_before`.
                if position != 0 {
                    offset = offset.saturating_sub(first_item_offset);
                }
            }
            self.items_sizes[position] = ItemSize {
                size: element.size,
                offset,
                key: element.key,
            };
            position += 1;
        }
        vtrace!(
            start = range.start_index,
            end = range.end_index,
            content_before,
            "ItemsSizesController::update_items_sizes"
        );
        Ok(&self.items_sizes)
    }

    /// The last rendered item before `start`: the first one whose successor was never measured,
    /// or `start - 1`.
    fn rendered_item_before(&self, start: usize) -> Option<ItemSize> {
        self.items_sizes
            .iter()
            .enumerate()
            .take(start)
            .find(|(index, _)| {
                let next = self.items_sizes.get(index + 1);
                next.is_none_or(|n| n.size == 0) || *index + 1 == start
            })
            .map(|(_, item)| item.clone())
    }

    pub fn add_items(&mut self, position: usize, count: usize) -> &[ItemSize] {
        let position = position.min(self.items_sizes.len());
        self.items_sizes
            .splice(position..position, core::iter::repeat_n(ItemSize::default(), count));
        &self.items_sizes
    }

    pub fn remove_items(&mut self, position: usize, count: usize) -> &[ItemSize] {
        let start = position.min(self.items_sizes.len());
        let end = position.saturating_add(count).min(self.items_sizes.len());
        self.items_sizes.drain(start..end);
        &self.items_sizes
    }

    /// `remove_position` is an index before the move, `add_position` one after it.
    pub fn move_items(
        &mut self,
        add_position: usize,
        add_count: usize,
        remove_position: usize,
        remove_count: usize,
    ) -> &[ItemSize] {
        move_entries(
            &mut self.items_sizes,
            add_position,
            add_count,
            remove_position,
            remove_count,
        );
        &self.items_sizes
    }

    pub fn reset_items(&mut self, count: usize) -> &[ItemSize] {
        self.items_sizes.clear();
        self.items_sizes.resize(count, ItemSize::default());
        &self.items_sizes
    }
}
