//! Error kinds surfaced at the façade boundary.
//!
//! Every [`crate::Locustron`] operation pre-checks its inputs before it
//! touches the strategy, so a `Err` return here is always a guarantee that no
//! state was mutated.

/// The failure modes of the façade's public operations.
#[derive(Debug, thiserror::Error)]
pub enum LocustronError {
    /// A required coordinate was missing, non-finite, or otherwise malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `add` was called with an identity that is already registered.
    #[error("object is already registered")]
    DuplicateRegistration,

    /// `update`, `remove`, or `get_bbox` was called with an identity that
    /// isn't registered.
    #[error("object is not registered")]
    UnknownObject,

    /// `query` was called with a non-positive width or height.
    #[error("query extent must be strictly positive, got w={w}, h={h}")]
    InvalidExtent {
        /// The offending width.
        w: f32,
        /// The offending height.
        h: f32,
    },

    /// `Locustron::new` was given a strategy name the façade doesn't know.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    /// An internal consistency check failed. Should be unreachable.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

pub(crate) fn invalid_input(msg: impl Into<String>) -> LocustronError {
    LocustronError::InvalidInput(msg.into())
}

pub(crate) fn invariant_violation(msg: impl Into<String>) -> LocustronError {
    let msg = msg.into();
    log::error!("locustron invariant violation: {msg}");
    LocustronError::InvariantViolation(msg)
}
