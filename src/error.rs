//! Error types for census loading.
//!
//! Parsing failures are reported as [`CensusError`]; the CLI layer wraps
//! them in `anyhow` context naming the offending file.

/// Errors that can occur while reading a census table.
#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    /// The census file has no header row.
    #[error("census is empty: expected a header row of dates")]
    MissingHeader,

    /// The header row names no date columns.
    #[error("census header has no date columns")]
    NoDates,

    /// A quoted field was still open at end of input.
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote {
        /// Line where the quoted field began (1-indexed).
        line: usize,
    },

    /// A data row has more fields than the header.
    #[error("line {line}: expected at most {expected} fields, found {found}")]
    TooManyFields {
        /// Line of the offending row (1-indexed).
        line: usize,
        /// Number of fields in the header.
        expected: usize,
        /// Number of fields in the row.
        found: usize,
    },

    /// A data row has a blank nest identifier.
    #[error("line {line}: missing nest identifier")]
    MissingNest {
        /// Line of the offending row (1-indexed).
        line: usize,
    },
}
