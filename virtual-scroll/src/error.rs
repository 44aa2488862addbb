use alloc::string::String;

/// Rejected [`crate::VirtualScrollConfig`] or trigger configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("segment size {segment_size} exceeds page size {page_size}")]
    SegmentLargerThanPage {
        segment_size: usize,
        page_size: usize,
    },
    #[error("segment size must be non-zero when page size is {page_size}")]
    ZeroSegmentSize { page_size: usize },
    #[error("trigger offset coefficient must be finite and non-negative, got {0}")]
    InvalidTriggerCoefficient(f32),
}

/// Failure to measure the rendered items.
///
/// This is recoverable: the previously stored sizes are kept untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ItemsSizesError {
    #[error(
        "{actual} elements match `{selector}` but {expected} were expected for the rendered range; \
         check that each item carries the selector"
    )]
    ElementsCountMismatch {
        expected: usize,
        actual: usize,
        selector: String,
    },
}

/// Failure to bind the edge triggers.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ObserversError {
    #[error("expected 2 triggers matching `{selector}`, found {found}")]
    TriggersNotFound { selector: String, found: usize },
}
