use thiserror::Error;

/// Errors returned by the boundary operations on [`crate::Map`].
///
/// The search engine and its supporting crates (`jps-grid`, `jps-search`) assume validated
/// input and never produce one of these themselves; every fallible [`crate::Map`] method
/// validates its own arguments before delegating.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    #[error("coordinate ({x}, {y}) is out of bounds for a {width}x{height} map")]
    OutOfBounds { x: i32, y: i32, width: i32, height: i32 },

    #[error("endpoint ({x}, {y}) sits on a blocked cell")]
    BlockedEndpoint { x: i32, y: i32 },

    #[error("invalid map configuration: {reason}")]
    ConfigInvalid { reason: &'static str },
}
