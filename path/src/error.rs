/// Error taxonomy for path-level operations (see `geom::GeomError` for the
/// scalar/planar counterpart this wraps and extends).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error(transparent)]
    Geom(#[from] geom::GeomError),

    /// A curve-to-curve stitch exceeded the path's stitching tolerance.
    #[error("path curves do not stitch: {0}")]
    NotRepresentable(&'static str),

    /// A `PathTime`/`PathVectorTime` index fell outside the owning
    /// path/path-vector.
    #[error("time index out of range: {0}")]
    RangeError(&'static str),
}

pub type PathResult<T> = Result<T, PathError>;
