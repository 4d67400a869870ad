//! Error types for game construction
//!
//! The simulation itself has no runtime errors: out-of-range inputs are
//! defined no-ops. Only a bad configuration is reported, and only when a
//! [`crate::Game`] is built.

/// Error type for invalid game configuration
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Grid has a zero or oversized dimension
    #[error("Invalid grid: {cols}x{rows} (dimensions must be 1..=2147483647)")]
    InvalidGrid { cols: u32, rows: u32 },

    /// A cadence or delay is zero
    #[error("Invalid cadence: {name} must be greater than 0 ms")]
    InvalidCadence { name: &'static str },

    /// Flash or blink length is zero
    #[error("Invalid animation length: {name} must be at least 1 step")]
    InvalidAnimation { name: &'static str },

    /// A probability lies outside [0, 1]
    #[error("Invalid probability: {name} = {value} (expected 0.0..=1.0)")]
    InvalidProbability { name: &'static str, value: f64 },

    /// Actor rows/columns don't fit the grid
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Malformed JSON configuration
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
