// ─────────────────────────────────────────────────────────────────────
// Nawa — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all fallible Nawa boundaries.
///
/// The integration hot path never returns these: buffer and index
/// mismatches there degrade to ignored calls. Errors only surface from
/// configuration, persistence decoding, file IO and readout fitting.
#[derive(Error, Debug)]
pub enum NawaError {
    /// Invalid configuration parameter.
    #[error("config error: {0}")]
    Config(String),

    /// A vector or encoded block did not match the expected width.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    Dimension { expected: usize, got: usize },

    /// Encoded weight stream is malformed or truncated.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Underlying file IO failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Readout used before fitting, or stored readout is unusable.
    #[error("readout error: {0}")]
    Readout(String),
}

pub type NawaResult<T> = Result<T, NawaError>;
