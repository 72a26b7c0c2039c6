//! Non-empty closed intervals and their optional (possibly-empty) variant.

/// A non-empty closed interval `[a, b]` with `a <= b`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    /// Builds `[min(a,b), max(a,b)]`.
    pub fn new(a: f64, b: f64) -> Self {
        Interval { min: a.min(b), max: a.max(b) }
    }

    pub fn singular(v: f64) -> Self {
        Interval { min: v, max: v }
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn extent(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn middle(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    pub fn interior_contains(&self, v: f64) -> bool {
        self.min < v && v < self.max
    }

    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn interior_intersects(&self, other: &Interval) -> bool {
        self.min < other.max && other.min < self.max
    }

    /// Union: always non-empty.
    pub fn union(&self, other: &Interval) -> Interval {
        Interval { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    pub fn expand_to(&self, v: f64) -> Interval {
        Interval { min: self.min.min(v), max: self.max.max(v) }
    }

    /// Intersection: may be empty.
    pub fn intersection(&self, other: &Interval) -> OptInterval {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if min <= max {
            OptInterval::from(Interval { min, max })
        } else {
            OptInterval::empty()
        }
    }

    /// Approximate equality, useful for round-trip tests.
    pub fn near(&self, other: &Interval, eps: f64) -> bool {
        (self.min - other.min).abs() <= eps && (self.max - other.max).abs() <= eps
    }
}

/// An interval that may be empty (the neutral element for union).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct OptInterval(Option<Interval>);

impl OptInterval {
    pub fn empty() -> Self {
        OptInterval(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_interval(&self) -> Option<Interval> {
        self.0
    }

    pub fn union(&self, other: &OptInterval) -> OptInterval {
        match (self.0, other.0) {
            (Some(a), Some(b)) => OptInterval(Some(a.union(&b))),
            (Some(a), None) => OptInterval(Some(a)),
            (None, Some(b)) => OptInterval(Some(b)),
            (None, None) => OptInterval(None),
        }
    }

    pub fn intersection(&self, other: &OptInterval) -> OptInterval {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.intersection(&b),
            _ => OptInterval(None),
        }
    }
}

impl From<Interval> for OptInterval {
    fn from(i: Interval) -> Self {
        OptInterval(Some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_intersection() {
        let a = Interval::new(0.0, 5.0);
        let b = Interval::new(4.0, 8.0);
        assert_eq!(a.union(&b), Interval::new(0.0, 8.0));
        let i = a.intersection(&b).as_interval().unwrap();
        assert_eq!(i, Interval::new(4.0, 5.0));
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(2.0, 3.0);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn boundary_semantics() {
        let a = Interval::new(0.0, 1.0);
        assert!(a.contains(1.0));
        assert!(!a.interior_contains(1.0));
    }
}
