use thiserror::Error;

/// Errors surfaced by the parsing and matching operations.
///
/// Computing a diff never fails; running out of time yields a valid
/// (possibly non-minimal) edit script instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A percent escape could not be decoded.
    #[error("illegal escape in {0:?}")]
    IllegalEscape(String),

    /// A delta length token was not a non-negative integer.
    #[error("invalid number in delta token {0:?}")]
    InvalidNumber(String),

    /// A delta token carried an unknown operation code.
    #[error("unknown operation in delta token {0:?}")]
    InvalidOp(String),

    /// The delta consumed a different number of code units than the source
    /// text provides.
    #[error("delta walks {delta} code units, source text has {source_len}")]
    LengthMismatch { delta: usize, source_len: usize },

    /// A hunk header did not match `@@ -n(,n)? +n(,n)? @@`.
    #[error("invalid patch header {0:?}")]
    InvalidPatch(String),

    /// A patch body line began with something other than ` `, `-` or `+`.
    #[error("unknown patch mode {mode:?} in line {line:?}")]
    InvalidMode { mode: char, line: String },

    /// The match pattern exceeds the bit width of the matcher.
    #[error("pattern of {len} code units exceeds the {max}-unit match limit")]
    PatternTooLong { len: usize, max: usize },
}
