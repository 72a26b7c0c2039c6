/// Error taxonomy for the geometry kernel (see `geom`'s top-level docs).
///
/// Variants are kinds, not one-off messages: callers match on the variant,
/// not the text, since the text is meant for humans (message-stack / dialog
/// surfaces), not control flow.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeomError {
    /// A geometric object could not satisfy its invariants at construction
    /// (e.g. a circle with negative squared radius, non-finite coefficients,
    /// conic coefficients that do not describe a conic).
    #[error("object not representable: {0}")]
    NotRepresentable(&'static str),

    /// An intersection query does not have a finite solution set (coincident
    /// lines, identical circles).
    #[error("infinite solutions: {0}")]
    InfiniteSolutions(&'static str),

    /// A parameter fell outside its contract: a time outside `[0, 1]`, an
    /// inverted interval, a non-finite numeric input.
    #[error("value out of range: {0}")]
    RangeError(&'static str),

    /// A caller-supplied computation budget (max iterations, max recursion
    /// complexity) was exceeded before convergence.
    #[error("computation exceeded its budget: {0}")]
    Budget(&'static str),
}

pub type GeomResult<T> = Result<T, GeomError>;

impl GeomError {
    pub fn not_representable(why: &'static str) -> Self {
        GeomError::NotRepresentable(why)
    }
}

/// A minimal non-finite-value guard used at construction boundaries.
#[inline]
pub(crate) fn require_finite(v: f64, what: &'static str) -> GeomResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(GeomError::RangeError(what))
    }
}
