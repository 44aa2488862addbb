use alloc::string::String;
use alloc::sync::Arc;

use virtual_scroll::{
    DEFAULT_ITEMS_QUERY_SELECTOR, DEFAULT_TRIGGERS_QUERY_SELECTOR, Direction, HasItemsOutRange,
    ItemsSizes, Placeholders, TriggersCoefficients, TriggersOffsets, TriggersVisibility,
    VirtualScrollConfig,
};

use crate::IndexesChangedParams;

/// Called once the window of a fresh collection is known.
pub type IndexesInitializedCallback = Arc<dyn Fn(&IndexesChangedParams) + Send + Sync>;

/// Called when the rendered window moved or resized.
pub type IndexesChangedCallback = Arc<dyn Fn(&IndexesChangedParams) + Send + Sync>;

pub type PlaceholdersChangedCallback = Arc<dyn Fn(Placeholders) + Send + Sync>;

pub type HasItemsOutRangeChangedCallback = Arc<dyn Fn(HasItemsOutRange) + Send + Sync>;

pub type ActiveElementChangedCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Called when a trigger fired but everything in that direction is already rendered: the data
/// layer should load more items.
pub type ItemsEndedCallback = Arc<dyn Fn(Direction) + Send + Sync>;

/// Callbacks fanned out by [`crate::ScrollController`].
///
/// Every callback fires at most once per event, and only when its value changed.
#[derive(Clone, Default)]
pub struct ScrollControllerCallbacks {
    pub indexes_initialized: Option<IndexesInitializedCallback>,
    pub indexes_changed: Option<IndexesChangedCallback>,
    pub placeholders_changed: Option<PlaceholdersChangedCallback>,
    pub has_items_out_range_changed: Option<HasItemsOutRangeChangedCallback>,
    pub active_element_changed: Option<ActiveElementChangedCallback>,
    pub items_ended: Option<ItemsEndedCallback>,
}

impl ScrollControllerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indexes_initialized(
        mut self,
        f: impl Fn(&IndexesChangedParams) + Send + Sync + 'static,
    ) -> Self {
        self.indexes_initialized = Some(Arc::new(f));
        self
    }

    pub fn with_indexes_changed(
        mut self,
        f: impl Fn(&IndexesChangedParams) + Send + Sync + 'static,
    ) -> Self {
        self.indexes_changed = Some(Arc::new(f));
        self
    }

    pub fn with_placeholders_changed(
        mut self,
        f: impl Fn(Placeholders) + Send + Sync + 'static,
    ) -> Self {
        self.placeholders_changed = Some(Arc::new(f));
        self
    }

    pub fn with_has_items_out_range_changed(
        mut self,
        f: impl Fn(HasItemsOutRange) + Send + Sync + 'static,
    ) -> Self {
        self.has_items_out_range_changed = Some(Arc::new(f));
        self
    }

    pub fn with_active_element_changed(mut self, f: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.active_element_changed = Some(Arc::new(f));
        self
    }

    pub fn with_items_ended(mut self, f: impl Fn(Direction) + Send + Sync + 'static) -> Self {
        self.items_ended = Some(Arc::new(f));
        self
    }
}

impl core::fmt::Debug for ScrollControllerCallbacks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollControllerCallbacks")
            .field("indexes_initialized", &self.indexes_initialized.is_some())
            .field("indexes_changed", &self.indexes_changed.is_some())
            .field("placeholders_changed", &self.placeholders_changed.is_some())
            .field(
                "has_items_out_range_changed",
                &self.has_items_out_range_changed.is_some(),
            )
            .field("active_element_changed", &self.active_element_changed.is_some())
            .field("items_ended", &self.items_ended.is_some())
            .finish()
    }
}

/// Configuration for [`crate::ScrollController`].
#[derive(Clone, Debug)]
pub struct ScrollControllerOptions {
    pub config: VirtualScrollConfig,
    pub disable_virtual_scroll: bool,
    pub total_count: usize,
    /// First index of the initial window.
    pub start_index: usize,
    pub viewport_size: u32,
    pub content_size: u64,
    pub scroll_position: u64,
    pub items_query_selector: String,
    pub triggers_query_selector: String,
    pub triggers_visibility: TriggersVisibility,
    pub triggers_coefficients: TriggersCoefficients,
    pub additional_triggers_offsets: TriggersOffsets,
    /// Sizes known before anything is rendered. A reset then sizes the window to the viewport.
    pub given_items_sizes: Option<ItemsSizes>,
}

impl Default for ScrollControllerOptions {
    fn default() -> Self {
        Self {
            config: VirtualScrollConfig::default(),
            disable_virtual_scroll: false,
            total_count: 0,
            start_index: 0,
            viewport_size: 0,
            content_size: 0,
            scroll_position: 0,
            items_query_selector: String::from(DEFAULT_ITEMS_QUERY_SELECTOR),
            triggers_query_selector: String::from(DEFAULT_TRIGGERS_QUERY_SELECTOR),
            triggers_visibility: TriggersVisibility::default(),
            triggers_coefficients: TriggersCoefficients::default(),
            additional_triggers_offsets: TriggersOffsets::default(),
            given_items_sizes: None,
        }
    }
}

impl ScrollControllerOptions {
    pub fn new(config: VirtualScrollConfig, total_count: usize) -> Self {
        Self {
            config,
            total_count,
            ..Self::default()
        }
    }

    pub fn with_disable_virtual_scroll(mut self, disable: bool) -> Self {
        self.disable_virtual_scroll = disable;
        self
    }

    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_viewport_size(mut self, viewport_size: u32) -> Self {
        self.viewport_size = viewport_size;
        self
    }

    pub fn with_content_size(mut self, content_size: u64) -> Self {
        self.content_size = content_size;
        self
    }

    pub fn with_scroll_position(mut self, scroll_position: u64) -> Self {
        self.scroll_position = scroll_position;
        self
    }

    pub fn with_items_query_selector(mut self, selector: impl Into<String>) -> Self {
        self.items_query_selector = selector.into();
        self
    }

    pub fn with_triggers_query_selector(mut self, selector: impl Into<String>) -> Self {
        self.triggers_query_selector = selector.into();
        self
    }

    pub fn with_triggers_visibility(mut self, visibility: TriggersVisibility) -> Self {
        self.triggers_visibility = visibility;
        self
    }

    pub fn with_triggers_coefficients(mut self, coefficients: TriggersCoefficients) -> Self {
        self.triggers_coefficients = coefficients;
        self
    }

    pub fn with_additional_triggers_offsets(mut self, offsets: TriggersOffsets) -> Self {
        self.additional_triggers_offsets = offsets;
        self
    }

    pub fn with_given_items_sizes(mut self, sizes: Option<ItemsSizes>) -> Self {
        self.given_items_sizes = sizes;
        self
    }
}
