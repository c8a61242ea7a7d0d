use thiserror::Error;

/// Strict-path failures: programmer or data errors that a correctly wired
/// caller never produces. Degenerate-but-expected inputs (a non-positive
/// pitch, a zero-unit footprint) are handled permissively and never reach
/// this type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown container type id: {0}")]
    UnknownContainerType(String),
}
