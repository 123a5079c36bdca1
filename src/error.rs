use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the transport core.
///
/// The simulation has few explicit error paths: configuration is validated
/// once up front, and the only runtime failure is a histogram bin index
/// escaping its valid range, which signals broken angle bookkeeping upstream
/// and must not be ignored. Packet loss/regeneration is a modeled physical
/// outcome, never an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A computed index fell outside its valid range (internal invariant
    /// violation).
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}
