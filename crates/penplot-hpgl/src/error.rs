//! Error types for HP-GL encoding.

use thiserror::Error;

/// Errors that can occur while composing or sending an HP-GL statement.
///
/// Everything except [`HpglError::Io`] is a parameter problem detected before
/// any byte is composed. The [`Plotter`](crate::Plotter) session reports those
/// through its diagnostics hook and skips the call; I/O errors come from the
/// sink and are handed back to the caller untouched.
#[derive(Error, Debug)]
pub enum HpglError {
    /// Pen carousel slot outside 0..=6.
    #[error("pen slot {0} is not a valid pen slot (expected 0-6)")]
    PenOutOfRange(i32),

    /// Line type pattern outside 0..=6.
    #[error("line type {0} is not a valid pattern (expected 0-6)")]
    LineTypeOutOfRange(i32),

    /// Fill model outside 1..=4.
    #[error("fill model {0} is not a valid fill type (expected 1-4)")]
    InvalidFillModel(i32),

    /// Hatch fill models need both a spacing and an angle.
    #[error("fill model {0} needs both a spacing and an angle")]
    MissingHatchParameters(i32),

    /// Chord resolution must be a positive number of degrees.
    #[error("circle resolution must be a positive number of degrees, got {0}")]
    InvalidResolution(f64),

    /// Pen speed must be positive.
    #[error("pen speed must be a positive number of cm/s, got {0}")]
    InvalidSpeed(f64),

    /// A path or polygon was given without any vertices.
    #[error("{0} needs at least one vertex")]
    EmptyPath(&'static str),

    /// Label text contains the ETX byte that terminates `LB`.
    #[error("label text contains the ETX terminator at byte {0}")]
    EmbeddedLabelTerminator(usize),

    /// Session scale must be a positive finite number.
    #[error("plotter scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    /// A coordinate or size was NaN or infinite, before or after scaling.
    #[error("{0} is not a finite number")]
    NonFinite(&'static str),

    /// The sink failed to accept the statement.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HpglError {
    /// True when the error describes a bad argument rather than a failed write.
    pub fn is_invalid_parameter(&self) -> bool {
        !matches!(self, HpglError::Io(_))
    }
}

/// Result type for HP-GL operations.
pub type Result<T> = std::result::Result<T, HpglError>;
