//! Axis-aligned rectangles, `D2<Interval>`.

use crate::interval::{Interval, OptInterval};
use crate::point::Point;

/// An axis-aligned rectangle, non-empty in both dimensions.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: Interval,
    pub y: Interval,
}

impl Rect {
    pub fn new(x: Interval, y: Interval) -> Self {
        Rect { x, y }
    }

    pub fn from_points(a: Point, b: Point) -> Self {
        Rect { x: Interval::new(a.x, b.x), y: Interval::new(a.y, b.y) }
    }

    pub fn min(&self) -> Point {
        Point::new(self.x.min(), self.y.min())
    }

    pub fn max(&self) -> Point {
        Point::new(self.x.max(), self.y.max())
    }

    pub fn width(&self) -> f64 {
        self.x.extent()
    }

    pub fn height(&self) -> f64 {
        self.y.extent()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x.intersects(&other.x) && self.y.intersects(&other.y)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect { x: self.x.union(&other.x), y: self.y.union(&other.y) }
    }

    pub fn intersection(&self, other: &Rect) -> OptRect {
        match (self.x.intersection(&other.x).as_interval(), self.y.intersection(&other.y).as_interval()) {
            (Some(x), Some(y)) => OptRect::from(Rect { x, y }),
            _ => OptRect::empty(),
        }
    }

    /// Squared Euclidean distance from `point` to the nearest point of
    /// `self`: zero if `point` is contained, otherwise the distance to the
    /// nearest edge/corner.
    pub fn distance_sq(&self, point: Point) -> f64 {
        let dx = if point.x < self.x.min() {
            self.x.min() - point.x
        } else if point.x > self.x.max() {
            point.x - self.x.max()
        } else {
            0.0
        };
        let dy = if point.y < self.y.min() {
            self.y.min() - point.y
        } else if point.y > self.y.max() {
            point.y - self.y.max()
        } else {
            0.0
        };
        dx * dx + dy * dy
    }
}

/// A rectangle that may be empty.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct OptRect(Option<Rect>);

impl OptRect {
    pub fn empty() -> Self {
        OptRect(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_rect(&self) -> Option<Rect> {
        self.0
    }

    pub fn union(&self, other: &OptRect) -> OptRect {
        match (self.0, other.0) {
            (Some(a), Some(b)) => OptRect(Some(a.union(&b))),
            (Some(a), None) => OptRect(Some(a)),
            (None, Some(b)) => OptRect(Some(b)),
            (None, None) => OptRect(None),
        }
    }
}

impl From<Rect> for OptRect {
    fn from(r: Rect) -> Self {
        OptRect(Some(r))
    }
}

/// How an SVG `preserveAspectRatio` descriptor aligns a source rect inside a
/// destination viewport once the meet/slice scale has been chosen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Align {
    None,
    XMinYMin,
    XMidYMin,
    XMaxYMin,
    XMinYMid,
    XMidYMid,
    XMaxYMid,
    XMinYMax,
    XMidYMax,
    XMaxYMax,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeetOrSlice {
    Meet,
    Slice,
}

impl Rect {
    /// The affine taking `self` to `viewport` under an SVG-style
    /// `preserveAspectRatio` descriptor. Returns the identity transform if
    /// `self` is degenerate in either axis (mirroring "empty source ->
    /// identity").
    pub fn transform_to(&self, viewport: &Rect, align: Align, fit: MeetOrSlice) -> crate::affine::Affine {
        if self.width() == 0.0 || self.height() == 0.0 {
            return crate::affine::Affine::IDENTITY;
        }
        let sx = viewport.width() / self.width();
        let sy = viewport.height() / self.height();
        let scale = match (align, fit) {
            (Align::None, _) => (sx, sy),
            (_, MeetOrSlice::Meet) => {
                let s = sx.min(sy);
                (s, s)
            }
            (_, MeetOrSlice::Slice) => {
                let s = sx.max(sy);
                (s, s)
            }
        };

        let scaled_w = self.width() * scale.0;
        let scaled_h = self.height() * scale.1;

        let (align_x, align_y) = match align {
            Align::None => (0.0, 0.0),
            Align::XMinYMin => (0.0, 0.0),
            Align::XMidYMin => (0.5, 0.0),
            Align::XMaxYMin => (1.0, 0.0),
            Align::XMinYMid => (0.0, 0.5),
            Align::XMidYMid => (0.5, 0.5),
            Align::XMaxYMid => (1.0, 0.5),
            Align::XMinYMax => (0.0, 1.0),
            Align::XMidYMax => (0.5, 1.0),
            Align::XMaxYMax => (1.0, 1.0),
        };

        let tx = viewport.min().x - self.min().x * scale.0
            + align_x * (viewport.width() - scaled_w);
        let ty = viewport.min().y - self.min().y * scale.1
            + align_y * (viewport.height() - scaled_h);

        crate::affine::Affine::new(scale.0, 0.0, 0.0, scale.1, tx, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_sq_zero_when_contained() {
        let r = Rect::new(Interval::new(0.0, 10.0), Interval::new(0.0, 10.0));
        assert_eq!(r.distance_sq(Point::new(5.0, 5.0)), 0.0);
    }

    #[test]
    fn distance_sq_corner() {
        let r = Rect::new(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0));
        let d = r.distance_sq(Point::new(2.0, 2.0));
        assert!((d - 2.0).abs() < 1e-12);
    }
}
