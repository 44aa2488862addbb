use alloc::string::String;

use crate::{ConfigError, ItemsSizes, TriggersOffsets, TriggersPositions, TriggersVisibility};

/// Page size used when a list enables virtualization without specifying one.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Trigger offset as a fraction of the viewport size.
pub const DEFAULT_TRIGGER_OFFSET_COEFFICIENT: f32 = 0.3;

pub const DEFAULT_ITEMS_QUERY_SELECTOR: &str = ".controls-ListView__itemV";
pub const DEFAULT_TRIGGERS_QUERY_SELECTOR: &str = ".controls-BaseControl__loadingTrigger";

/// Virtual scroll window configuration.
///
/// - `page_size` is the target number of rendered items. `0` disables virtualization: the whole
///   collection is rendered.
/// - `segment_size` is the maximum number of items a single trigger-driven step adds to the
///   window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualScrollConfig {
    pub page_size: usize,
    pub segment_size: usize,
}

impl VirtualScrollConfig {
    /// Creates a config with `segment_size = ceil(page_size / 4)`.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            segment_size: page_size.div_ceil(4),
        }
    }

    /// A config that renders the whole collection.
    pub fn unvirtualized() -> Self {
        Self {
            page_size: 0,
            segment_size: 0,
        }
    }

    pub fn with_segment_size(mut self, segment_size: usize) -> Self {
        self.segment_size = segment_size;
        self
    }

    pub fn is_virtualized(&self) -> bool {
        self.page_size > 0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Ok(());
        }
        if self.segment_size == 0 {
            return Err(ConfigError::ZeroSegmentSize {
                page_size: self.page_size,
            });
        }
        if self.segment_size > self.page_size {
            return Err(ConfigError::SegmentLargerThanPage {
                segment_size: self.segment_size,
                page_size: self.page_size,
            });
        }
        Ok(())
    }
}

impl Default for VirtualScrollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Configuration for [`crate::Calculator`].
#[derive(Clone, Debug, Default)]
pub struct CalculatorOptions {
    pub config: VirtualScrollConfig,
    /// Forces the unvirtualized strategy regardless of `config.page_size`.
    pub disable_virtual_scroll: bool,
    pub total_count: usize,
    pub viewport_size: u32,
    /// Full size of the scroll content (rendered items, placeholders and whatever is rendered
    /// around the list).
    pub content_size: u64,
    pub scroll_position: u64,
    pub triggers_offsets: TriggersOffsets,
    /// Initial sizes. Missing entries are treated as unmeasured.
    pub items_sizes: ItemsSizes,
    /// Sizes known before anything is rendered. When set, a reset sizes the window to cover the
    /// viewport instead of holding a page.
    pub given_items_sizes: Option<ItemsSizes>,
}

impl CalculatorOptions {
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

    pub fn with_triggers_offsets(mut self, triggers_offsets: TriggersOffsets) -> Self {
        self.triggers_offsets = triggers_offsets;
        self
    }

    pub fn with_items_sizes(mut self, items_sizes: ItemsSizes) -> Self {
        self.items_sizes = items_sizes;
        self
    }

    pub fn with_given_items_sizes(mut self, sizes: Option<ItemsSizes>) -> Self {
        self.given_items_sizes = sizes;
        self
    }
}

/// Trigger offset coefficients, applied to the viewport size.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggersCoefficients {
    pub backward: f32,
    pub forward: f32,
}

impl TriggersCoefficients {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for c in [self.backward, self.forward] {
            if !c.is_finite() || c < 0.0 {
                return Err(ConfigError::InvalidTriggerCoefficient(c));
            }
        }
        Ok(())
    }
}

impl Default for TriggersCoefficients {
    fn default() -> Self {
        Self {
            backward: DEFAULT_TRIGGER_OFFSET_COEFFICIENT,
            forward: DEFAULT_TRIGGER_OFFSET_COEFFICIENT,
        }
    }
}

/// Configuration for [`crate::ObserversController`].
#[derive(Clone, Debug)]
pub struct ObserversOptions {
    pub triggers_query_selector: String,
    pub viewport_size: u32,
    pub content_size: u64,
    pub triggers_visibility: TriggersVisibility,
    /// Initial trigger positions; both pinned to their edges by default.
    pub triggers_positions: TriggersPositions,
    pub coefficients: TriggersCoefficients,
    /// Extra distance added to each trigger offset once the trigger is unlocked.
    pub additional_offsets: TriggersOffsets,
}

impl Default for ObserversOptions {
    fn default() -> Self {
        Self {
            triggers_query_selector: String::from(DEFAULT_TRIGGERS_QUERY_SELECTOR),
            viewport_size: 0,
            content_size: 0,
            triggers_visibility: TriggersVisibility::default(),
            triggers_positions: TriggersPositions::default(),
            coefficients: TriggersCoefficients::default(),
            additional_offsets: TriggersOffsets::default(),
        }
    }
}

impl ObserversOptions {
    pub fn with_triggers_query_selector(mut self, selector: impl Into<String>) -> Self {
        self.triggers_query_selector = selector.into();
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

    pub fn with_triggers_visibility(mut self, visibility: TriggersVisibility) -> Self {
        self.triggers_visibility = visibility;
        self
    }

    pub fn with_triggers_positions(mut self, positions: TriggersPositions) -> Self {
        self.triggers_positions = positions;
        self
    }

    pub fn with_coefficients(mut self, coefficients: TriggersCoefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    pub fn with_additional_offsets(mut self, additional_offsets: TriggersOffsets) -> Self {
        self.additional_offsets = additional_offsets;
        self
    }
}

/// Configuration for [`crate::ItemsSizesController`].
#[derive(Clone, Debug)]
pub struct ItemsSizesOptions {
    pub items_query_selector: String,
    pub total_count: usize,
}

impl ItemsSizesOptions {
    pub fn new(total_count: usize) -> Self {
        Self {
            items_query_selector: String::from(DEFAULT_ITEMS_QUERY_SELECTOR),
            total_count,
        }
    }

    pub fn with_items_query_selector(mut self, selector: impl Into<String>) -> Self {
        self.items_query_selector = selector.into();
        self
    }
}
