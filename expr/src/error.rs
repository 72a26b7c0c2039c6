/// Error taxonomy for the expression evaluator (component J), scoped to
/// `EvalError::ParseError`'s kind in the kernel-wide taxonomy (see
/// `geom::GeomError`/`path::PathError` for the scalar/path counterparts).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// The input could not be parsed. Carries the byte offset where
    /// parsing stopped, per spec §4.10.
    #[error("parse error at byte {offset}: {message}")]
    Parse { message: &'static str, offset: usize },

    /// Addition/subtraction of mismatched dimensions that the default-unit
    /// reinterpretation rule couldn't resolve, or a non-dimensionless
    /// exponent.
    #[error("dimension mismatch at byte {offset}: {message}")]
    DimensionMismatch { message: &'static str, offset: usize },

    /// A unit suffix did not resolve to any entry in the unit table.
    #[error("unknown unit {unit:?} at byte {offset}")]
    UnknownUnit { unit: String, offset: usize },

    /// The input was not valid UTF-8.
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

pub type EvalResult<T> = Result<T, EvalError>;
