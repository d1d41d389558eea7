//! Structural parse errors for the CtrlCmd wire format.

use thiserror::Error;

/// Failure to decode a value out of a CtrlCmd byte buffer.
///
/// This error is purely structural — it never carries information about
/// *why* a server sent malformed bytes, only that the declared lengths and
/// the available bytes didn't line up. Callers at the façade boundary treat
/// any `ReadError` as "no result" (see the crate's error handling design);
/// it never needs to be inspected in detail by application code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("need {needed} more byte(s) but only {available} remain")]
    UnexpectedEof { needed: usize, available: usize },

    #[error("string length prefix {0} is below the minimum of 6")]
    StringTooShort(i32),

    #[error("vector length prefix {0} is below the minimum of 8")]
    VectorTooShort(i32),

    #[error("vector element count {0} is negative")]
    VectorCountNegative(i32),

    #[error("struct length prefix {0} is below the minimum of 4")]
    StructTooShort(i32),

    #[error("declared length {declared} exceeds the {available} byte(s) remaining in the buffer")]
    LengthExceedsBuffer { declared: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, ReadError>;
