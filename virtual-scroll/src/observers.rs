use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{
    ConfigError, Direction, HasItemsOutRange, ObserversError, ObserversOptions, TriggerPosition,
    TriggersCoefficients, TriggersOffsets, TriggersVisibility,
};

/// An edge trigger entering or leaving the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntersectionEvent {
    BackwardIn,
    BackwardOut,
    ForwardIn,
    ForwardOut,
}

impl IntersectionEvent {
    pub fn direction(self) -> Direction {
        match self {
            Self::BackwardIn | Self::BackwardOut => Direction::Backward,
            Self::ForwardIn | Self::ForwardOut => Direction::Forward,
        }
    }

    pub fn is_enter(self) -> bool {
        matches!(self, Self::BackwardIn | Self::ForwardIn)
    }
}

/// The two trigger elements of one list, as seen by [`ObserversController`].
pub trait TriggersHost {
    /// Looks up the list's own triggers (not those of nested lists) and returns how many were
    /// found. Exactly two are expected: backward first, forward second.
    fn bind_triggers(&mut self, selector: &str) -> usize;

    /// Shows or hides a trigger. A hidden trigger takes no space and never intersects.
    fn set_trigger_visible(&mut self, direction: Direction, visible: bool);

    fn apply_trigger_offset(&mut self, direction: Direction, offset: u32);

    /// Starts reporting [`IntersectionEvent`]s for the bound triggers.
    fn observe(&mut self);

    fn disconnect(&mut self);
}

/// Owns the edge triggers of one list: their offsets, their visibility and the decision which
/// direction an intersection maps to.
pub struct ObserversController {
    triggers_host: Option<Box<dyn TriggersHost>>,
    triggers_bound: bool,
    triggers_query_selector: String,

    viewport_size: u32,
    content_size: u64,
    scroll_position: u64,
    has_items_out_range: HasItemsOutRange,

    triggers_visibility: TriggersVisibility,
    coefficients: TriggersCoefficients,
    additional_offsets: TriggersOffsets,
    backward_position: TriggerPosition,
    forward_position: TriggerPosition,
    triggers_offsets: TriggersOffsets,
}

impl fmt::Debug for ObserversController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserversController")
            .field("triggers_bound", &self.triggers_bound)
            .field("triggers_query_selector", &self.triggers_query_selector)
            .field("viewport_size", &self.viewport_size)
            .field("content_size", &self.content_size)
            .field("scroll_position", &self.scroll_position)
            .field("triggers_visibility", &self.triggers_visibility)
            .field("triggers_offsets", &self.triggers_offsets)
            .finish_non_exhaustive()
    }
}

impl ObserversController {
    pub fn new(options: ObserversOptions) -> Result<Self, ConfigError> {
        options.coefficients.validate()?;
        let mut controller = Self {
            triggers_host: None,
            triggers_bound: false,
            triggers_query_selector: options.triggers_query_selector,
            viewport_size: options.viewport_size,
            content_size: options.content_size,
            scroll_position: 0,
            has_items_out_range: HasItemsOutRange::default(),
            triggers_visibility: options.triggers_visibility,
            coefficients: options.coefficients,
            additional_offsets: options.additional_offsets,
            backward_position: options.triggers_positions.backward,
            forward_position: options.triggers_positions.forward,
            triggers_offsets: TriggersOffsets::default(),
        };
        controller.recalculate_offsets();
        Ok(controller)
    }

    pub fn triggers_offsets(&self) -> TriggersOffsets {
        self.triggers_offsets
    }

    pub fn triggers_visibility(&self) -> TriggersVisibility {
        self.triggers_visibility
    }

    pub fn has_items_out_range(&self) -> HasItemsOutRange {
        self.has_items_out_range
    }

    pub fn is_bound(&self) -> bool {
        self.triggers_bound
    }

    /// Replaces the list container and rebinds its triggers.
    ///
    /// The previous host is disconnected first. On error the controller stays unbound and no
    /// intersection is reported until a container with two triggers is set.
    pub fn set_list_container(
        &mut self,
        triggers_host: Option<Box<dyn TriggersHost>>,
    ) -> Result<(), ObserversError> {
        self.disconnect();
        self.triggers_host = triggers_host;
        self.update_triggers()
    }

    pub fn set_triggers_query_selector(
        &mut self,
        selector: impl Into<String>,
    ) -> Result<(), ObserversError> {
        self.triggers_query_selector = selector.into();
        self.disconnect();
        self.update_triggers()
    }

    fn disconnect(&mut self) {
        if self.triggers_bound {
            if let Some(host) = self.triggers_host.as_mut() {
                host.disconnect();
            }
        }
        self.triggers_bound = false;
    }

    fn update_triggers(&mut self) -> Result<(), ObserversError> {
        let Some(host) = self.triggers_host.as_mut() else {
            return Ok(());
        };
        let found = host.bind_triggers(&self.triggers_query_selector);
        if found != 2 {
            return Err(ObserversError::TriggersNotFound {
                selector: self.triggers_query_selector.clone(),
                found,
            });
        }
        host.set_trigger_visible(Direction::Backward, self.triggers_visibility.backward);
        host.set_trigger_visible(Direction::Forward, self.triggers_visibility.forward);
        host.observe();
        self.triggers_bound = true;
        vdebug!(
            selector = self.triggers_query_selector.as_str(),
            "ObserversController: triggers bound"
        );
        self.recalculate_offsets();
        Ok(())
    }

    /// Tears the observation down. The controller can be reattached with
    /// [`Self::set_list_container`].
    pub fn destroy(&mut self) {
        self.disconnect();
        self.triggers_host = None;
    }

    pub fn set_viewport_size(&mut self, viewport_size: u32) -> TriggersOffsets {
        if self.viewport_size != viewport_size {
            self.viewport_size = viewport_size;
            self.recalculate_offsets();
        }
        self.triggers_offsets
    }

    pub fn set_content_size(&mut self, content_size: u64) {
        self.content_size = content_size;
    }

    pub fn set_scroll_position(&mut self, scroll_position: u64) {
        self.scroll_position = scroll_position;
    }

    pub fn set_has_items_out_range(&mut self, has_items_out_range: HasItemsOutRange) {
        self.has_items_out_range = has_items_out_range;
    }

    pub fn set_additional_triggers_offsets(&mut self, offsets: TriggersOffsets) -> TriggersOffsets {
        self.additional_offsets = offsets;
        self.recalculate_offsets();
        self.triggers_offsets
    }

    pub fn set_triggers_offset_coefficients(
        &mut self,
        coefficients: TriggersCoefficients,
    ) -> Result<TriggersOffsets, ConfigError> {
        coefficients.validate()?;
        self.coefficients = coefficients;
        self.recalculate_offsets();
        Ok(self.triggers_offsets)
    }

    pub fn set_trigger_position(
        &mut self,
        direction: Direction,
        position: TriggerPosition,
    ) -> TriggersOffsets {
        let current = match direction {
            Direction::Backward => &mut self.backward_position,
            Direction::Forward => &mut self.forward_position,
        };
        if *current != position {
            *current = position;
            self.recalculate_offsets();
        }
        self.triggers_offsets
    }

    pub fn trigger_position(&self, direction: Direction) -> TriggerPosition {
        match direction {
            Direction::Backward => self.backward_position,
            Direction::Forward => self.forward_position,
        }
    }

    pub fn set_trigger_visible(&mut self, direction: Direction, visible: bool) {
        let current = match direction {
            Direction::Backward => &mut self.triggers_visibility.backward,
            Direction::Forward => &mut self.triggers_visibility.forward,
        };
        if *current == visible {
            return;
        }
        *current = visible;
        if !self.triggers_bound {
            return;
        }
        if let Some(host) = self.triggers_host.as_mut() {
            host.set_trigger_visible(direction, visible);
        }
    }

    pub fn set_triggers_visibility(&mut self, visibility: TriggersVisibility) {
        self.set_trigger_visible(Direction::Backward, visibility.backward);
        self.set_trigger_visible(Direction::Forward, visibility.forward);
    }

    /// Pins both triggers to their edges, so the first load after a reset only happens at the
    /// very edge of the list.
    pub fn reset_items(&mut self) -> TriggersOffsets {
        self.backward_position = TriggerPosition::Null;
        self.forward_position = TriggerPosition::Null;
        self.recalculate_offsets();
        self.triggers_offsets
    }

    /// Maps an intersection to the direction to shift. Hidden triggers and leave events map to
    /// nothing.
    pub fn on_intersection(&self, event: IntersectionEvent) -> Option<Direction> {
        let direction = event.direction();
        let visible = match direction {
            Direction::Backward => self.triggers_visibility.backward,
            Direction::Forward => self.triggers_visibility.forward,
        };
        (event.is_enter() && visible).then_some(direction)
    }

    /// Polls trigger visibility from the stored scroll geometry and returns the directions that
    /// should fire, forward first.
    ///
    /// The backward trigger only fires when forward cannot: either nothing is left to render
    /// forward or the forward trigger is out of view.
    pub fn check_triggers_visibility(&self, content_size_before_list: u64) -> Vec<Direction> {
        let position = self.scroll_position.saturating_sub(content_size_before_list);
        let viewport = self.viewport_size as u64;

        let backward_visible = self.triggers_visibility.backward
            && position <= self.triggers_offsets.backward as u64;
        let forward_visible = self.triggers_visibility.forward
            && position.saturating_add(viewport)
                >= self
                    .content_size
                    .saturating_sub(self.triggers_offsets.forward as u64);

        let mut fired = Vec::new();
        if forward_visible {
            fired.push(Direction::Forward);
        }
        if backward_visible && (!self.has_items_out_range.forward || !forward_visible) {
            fired.push(Direction::Backward);
        }
        vtrace!(
            position,
            backward_visible,
            forward_visible,
            fired = fired.len(),
            "ObserversController::check_triggers_visibility"
        );
        fired
    }

    fn offset_for(&self, position: TriggerPosition, coefficient: f32, additional: u32) -> u32 {
        match position {
            TriggerPosition::Null => 0,
            TriggerPosition::Offset => {
                let base = (self.viewport_size as f64 * coefficient as f64) as u32;
                base.saturating_add(additional)
            }
        }
    }

    fn recalculate_offsets(&mut self) {
        self.triggers_offsets = TriggersOffsets {
            backward: self.offset_for(
                self.backward_position,
                self.coefficients.backward,
                self.additional_offsets.backward,
            ),
            forward: self.offset_for(
                self.forward_position,
                self.coefficients.forward,
                self.additional_offsets.forward,
            ),
        };
        if !self.triggers_bound {
            return;
        }
        if let Some(host) = self.triggers_host.as_mut() {
            host.apply_trigger_offset(Direction::Backward, self.triggers_offsets.backward);
            host.apply_trigger_offset(Direction::Forward, self.triggers_offsets.forward);
        }
    }
}
