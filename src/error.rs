//! Error type reported by [`try_render`](crate::try_render).

/// Errors surfaced while rendering.
///
/// Rendering itself never fails: an error only reports that part of the
/// output was degraded to literal text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Nested lists or quotes went deeper than the recursion guard allows.
    #[error("nesting depth exceeded the limit of {limit}")]
    DepthExceeded {
        /// The nesting limit that was hit.
        limit: usize,
    },
}
