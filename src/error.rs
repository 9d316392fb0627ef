use std::fmt;

/// Errors surfaced by the table and trail structures.
///
/// Structural invariant violations (a slot observed in an impossible state)
/// are not part of this taxonomy: they are programming errors and assert
/// via `unreachable!` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested key is not present. Always recoverable by the caller.
    KeyNotFound(String),
    /// A structural limit was hit: two distinct keys that no level of the
    /// table can tell apart, or a probe table with no free slot left.
    CapacityExhausted(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound(key) => write!(f, "Key not found: {}", key),
            Error::CapacityExhausted(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
