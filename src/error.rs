//! Error types surfaced while building the simulation.
//!
//! None of these are raised once a tick is running: tuning values and level
//! geometry are validated up front so the per-tick loop only has to deal with
//! recoverable gameplay conditions.
use thiserror::Error;

/// Rejected tuning value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A tuning value was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
    },
    /// Mass was zero or negative, which would divide forces by zero.
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f32),
    /// Friction multiplier outside `[0, 1]`.
    #[error("{field} must lie within [0, 1], got {value}")]
    FrictionOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
    },
    /// A quantity that must be strictly positive was not.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
    },
    /// The hook length range was inverted.
    #[error("hook length range is inverted: min {min} > max {max}")]
    InvertedHookRange {
        /// Configured minimum length.
        min: f32,
        /// Configured maximum length.
        max: f32,
    },
}

/// Rejected level geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The cell size was zero, negative or not finite.
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    /// The grid had no rows or no columns.
    #[error("grid must contain at least one row and one column")]
    Empty,
    /// A row's length differed from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based row number.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A tile value is not covered by the lookup table.
    #[error("tile id {value} at ({column}, {row}) has no entry in the lookup table")]
    UnknownTile {
        /// Offending tile value.
        value: u32,
        /// Column of the cell.
        column: usize,
        /// Row of the cell.
        row: usize,
    },
    /// A CSV token could not be parsed as a tile value.
    #[error("line {line}: cannot parse {token:?} as a tile id")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// Token that failed to parse.
        token: String,
    },
}

/// Failure while loading a tuning file.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The file could not be read.
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    /// The file was not valid JSON for the expected schema.
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    /// The file parsed but carried invalid values.
    #[error("invalid tuning value: {0}")]
    Invalid(#[from] ConfigError),
}
