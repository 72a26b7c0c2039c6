/// Error taxonomy for the conic clipper (component I), scoped to the
/// `RangeError` kind in the kernel-wide taxonomy (see
/// `geom::GeomError`/`path::PathError` for the scalar/path counterparts).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgorithmsError {
    /// A parameter outside its contract, e.g. a non-positive length
    /// tolerance.
    #[error("range error: {0}")]
    RangeError(&'static str),
}

pub type AlgorithmsResult<T> = Result<T, AlgorithmsError>;
