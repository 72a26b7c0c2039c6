//! Implicit conic sections and their rectangle clip (component I).

use crate::error::{AlgorithmsError, AlgorithmsResult};
use geom::{Point, Rect, Vector};

/// The six coefficients of `A*x^2 + B*x*y + C*y^2 + D*x + E*y + F = 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct XAx {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl XAx {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        XAx { a, b, c, d, e, f }
    }

    /// `circle(center, r)`: the implicit form of `(x-cx)^2 + (y-cy)^2 = r^2`.
    pub fn circle(center: Point, r: f64) -> Self {
        XAx {
            a: 1.0,
            b: 0.0,
            c: 1.0,
            d: -2.0 * center.x,
            e: -2.0 * center.y,
            f: center.x * center.x + center.y * center.y - r * r,
        }
    }

    pub fn evaluate(&self, p: Point) -> f64 {
        self.a * p.x * p.x + self.b * p.x * p.y + self.c * p.y * p.y + self.d * p.x + self.e * p.y + self.f
    }

    /// The gradient `(dF/dx, dF/dy)`, normal to the conic at `p`.
    pub fn gradient_at(&self, p: Point) -> Vector {
        Vector::new(2.0 * self.a * p.x + self.b * p.y + self.d, self.b * p.x + 2.0 * self.c * p.y + self.e)
    }

    /// Tangent direction at `p` (perpendicular to the gradient).
    pub fn tangent_at(&self, p: Point) -> Vector {
        self.gradient_at(p).normal()
    }

    /// Roots of `self` along the full line `p0 + t*d`, `t` unrestricted.
    /// `F(p0 + t*d)` is a quadratic in `t`.
    fn roots_on_line(&self, p0: Point, d: Vector) -> Vec<f64> {
        let qa = self.a * d.x * d.x + self.b * d.x * d.y + self.c * d.y * d.y;
        let qb = 2.0 * self.a * p0.x * d.x + self.b * (p0.x * d.y + p0.y * d.x) + 2.0 * self.c * p0.y * d.y + self.d * d.x + self.e * d.y;
        let qc = self.evaluate(p0);

        if qa.abs() < geom::EPSILON {
            if qb.abs() > geom::EPSILON {
                return vec![-qc / qb];
            }
            return Vec::new();
        }
        let disc = qb * qb - 4.0 * qa * qc;
        if disc < 0.0 {
            return Vec::new();
        }
        let sq = disc.sqrt();
        vec![(-qb - sq) / (2.0 * qa), (-qb + sq) / (2.0 * qa)]
    }

    /// Roots of `self` restricted to the segment `p0 -> p1`, as parameters
    /// in `[0, 1]`.
    fn roots_on_segment(&self, p0: Point, p1: Point) -> Vec<f64> {
        let d = p1 - p0;
        self.roots_on_line(p0, d).into_iter().filter(|t| (0.0..=1.0).contains(t)).collect()
    }

    /// The center of a central conic: the point where the gradient
    /// vanishes (`2A*cx + B*cy + D = 0`, `B*cx + 2C*cy + E = 0`). `None`
    /// for a parabola, which has no unique center.
    fn center(&self) -> Option<Point> {
        let det = 4.0 * self.a * self.c - self.b * self.b;
        if det.abs() < geom::EPSILON {
            return None;
        }
        let cx = (-2.0 * self.c * self.d + self.b * self.e) / det;
        let cy = (-2.0 * self.a * self.e + self.b * self.d) / det;
        Some(Point::new(cx, cy))
    }

    /// Whether `self` is an ellipse (a bounded central conic):
    /// `B^2 - 4AC < 0`.
    fn is_ellipse(&self) -> bool {
        4.0 * self.a * self.c - self.b * self.b > geom::EPSILON
    }

    /// Every point where `self` crosses the boundary of `rect`, ordered by
    /// perimeter position (walking the rectangle counter-clockwise from its
    /// bottom-left corner). For a conic whose intersection with `rect` is a
    /// single closed/open convex arc (true of the ellipses and circles this
    /// clipper targets), perimeter order coincides with the conic's own
    /// traversal order.
    fn boundary_crossings(&self, rect: &Rect) -> Vec<Point> {
        let corners = [rect.min(), Point::new(rect.max().x, rect.min().y), rect.max(), Point::new(rect.min().x, rect.max().y)];
        let mut crossings = Vec::new();
        for i in 0..4 {
            let p0 = corners[i];
            let p1 = corners[(i + 1) % 4];
            let mut ts = self.roots_on_segment(p0, p1);
            ts.sort_by(|x, y| x.partial_cmp(y).unwrap());
            for t in ts {
                crossings.push(p0 + (p1 - p0) * t);
            }
        }
        crossings
    }
}

/// A rational quadratic Bezier: weight 1 at the endpoints, `weight` on the
/// middle control point. Represents a conic arc exactly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RatQuad {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub weight: f64,
}

impl RatQuad {
    pub fn sample(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let b0 = u * u;
        let b1 = 2.0 * t * u * self.weight;
        let b2 = t * t;
        let denom = b0 + b1 + b2;
        Point::new(
            (b0 * self.p0.x + b1 * self.p1.x + b2 * self.p2.x) / denom,
            (b0 * self.p0.y + b1 * self.p1.y + b2 * self.p2.y) / denom,
        )
    }

    /// Builds the unique `RatQuad` through `start`, `mid` (at `t = 0.5`) and
    /// `end`, with apex `apex` (the middle Bezier control point, typically
    /// the intersection of the tangents at `start`/`end`). Falls back to
    /// `weight = 1` (an ordinary quadratic Bezier) when `apex` is `None`
    /// (parallel tangents).
    fn through_three_points(start: Point, mid: Point, end: Point, apex: Option<Point>) -> RatQuad {
        let apex = match apex {
            Some(a) => a,
            None => {
                // Plain quadratic Bezier control point solving B(0.5) == mid.
                let control = Point::new(2.0 * mid.x - 0.5 * (start.x + end.x), 2.0 * mid.y - 0.5 * (start.y + end.y));
                return RatQuad { p0: start, p1: control, p2: end, weight: 1.0 };
            }
        };

        let half_sum = Point::new(0.25 * (start.x + end.x), 0.25 * (start.y + end.y));
        let num_x = half_sum.x - 0.5 * mid.x;
        let den_x = 0.5 * mid.x - 0.5 * apex.x;
        let num_y = half_sum.y - 0.5 * mid.y;
        let den_y = 0.5 * mid.y - 0.5 * apex.y;

        let weight = if den_x.abs() >= den_y.abs() && den_x.abs() > geom::EPSILON {
            num_x / den_x
        } else if den_y.abs() > geom::EPSILON {
            num_y / den_y
        } else {
            1.0
        };

        RatQuad { p0: start, p1: apex, p2: end, weight: weight.max(geom::EPSILON) }
    }
}

/// `p` displaced by `-v`; `geom::Point` only defines `Point + Vector`.
fn sub_vec(p: Point, v: Vector) -> Point {
    Point::new(p.x - v.x, p.y - v.y)
}

/// Finds the "better midpoint" between `p` and `q` on `conic`: the
/// intersection of the conic's tangents at `p`/`q` paired with the line
/// through that apex and `midpoint(p, q)`, falling back to the
/// perpendicular bisector of `p, q` when the tangents are parallel.
fn better_midpoint(conic: &XAx, p: Point, q: Point) -> (Point, Option<Point>) {
    let tp = conic.tangent_at(p);
    let tq = conic.tangent_at(q);
    let cross = tp.cross(&tq);
    let midpoint = Point::new(0.5 * (p.x + q.x), 0.5 * (p.y + q.y));

    if cross.abs() > geom::EPSILON {
        // Intersect the two tangent lines: p + s*tp == q + u*tq.
        let diff = q - p;
        let s = diff.cross(&tq) / cross;
        let apex = p + tp * s;

        let line_dir = apex - midpoint;
        if line_dir.length() > geom::EPSILON {
            let base = sub_vec(midpoint, line_dir * 2.0);
            let far = midpoint + line_dir * 2.0;
            let ts = conic.roots_on_segment(base, far);
            if let Some(&best) = ts.iter().min_by(|a, b| {
                let pa = base + (far - base) * **a;
                let pb = base + (far - base) * **b;
                pa.distance_sq(&midpoint).partial_cmp(&pb.distance_sq(&midpoint)).unwrap()
            }) {
                let m = base + (far - base) * best;
                return (m, Some(apex));
            }
        }
    }

    perpendicular_bisector_midpoint(conic, p, q)
}

fn perpendicular_bisector_midpoint(conic: &XAx, p: Point, q: Point) -> (Point, Option<Point>) {
    let midpoint = Point::new(0.5 * (p.x + q.x), 0.5 * (p.y + q.y));
    let chord = q - p;
    let perp = chord.normal();
    if perp.length() < geom::EPSILON {
        return (midpoint, None);
    }
    let a = sub_vec(midpoint, perp * 2.0);
    let b = midpoint + perp * 2.0;
    let ts = conic.roots_on_segment(a, b);
    if let Some(&best) = ts.iter().min_by(|x, y| {
        let px = a + (b - a) * **x;
        let py = a + (b - a) * **y;
        px.distance_sq(&midpoint).partial_cmp(&py.distance_sq(&midpoint)).unwrap()
    }) {
        (a + (b - a) * best, None)
    } else {
        (midpoint, None)
    }
}

/// Recursively subdivides the conic arc from `p` to `q` into `2^depth + 1`
/// points, stopping early once consecutive points are within `tol`.
fn subdivide_arc(conic: &XAx, p: Point, q: Point, depth: u32, tol: f64) -> Vec<Point> {
    if depth == 0 || p.distance(&q) < tol {
        return vec![p, q];
    }
    let (mid, apex) = better_midpoint(conic, p, q);
    let _ = apex;
    let mut left = subdivide_arc(conic, p, mid, depth - 1, tol);
    let right = subdivide_arc(conic, mid, q, depth - 1, tol);
    left.pop();
    left.extend(right);
    left
}

/// Builds the closed chain of `RatQuad`s for an ellipse that lies entirely
/// inside a rectangle (so `boundary_crossings` finds none): quarters it at
/// the four axis rays from its center, each of which meets the ellipse
/// exactly once in either direction since an ellipse is star-shaped about
/// its own center, then subdivides each quarter the same way a
/// boundary-crossing arc is subdivided. `None` if `conic` isn't a
/// (non-degenerate) ellipse.
fn closed_loop(conic: &XAx, depth: u32, tol: f64) -> Option<Vec<RatQuad>> {
    let center = conic.center()?;
    if !conic.is_ellipse() {
        return None;
    }
    let xs = conic.roots_on_line(center, Vector::new(1.0, 0.0));
    let ys = conic.roots_on_line(center, Vector::new(0.0, 1.0));
    if xs.len() != 2 || ys.len() != 2 {
        return None;
    }
    let (x_lo, x_hi) = (xs[0].min(xs[1]), xs[0].max(xs[1]));
    let (y_lo, y_hi) = (ys[0].min(ys[1]), ys[0].max(ys[1]));

    // Four points at ray angles 0/90/180/270 from the center, in that
    // (increasing-angle, so CCW) order; the starting point at angle 0
    // matches the "starting from (1, 0)" seed scenario for a unit circle.
    let right = center + Vector::new(1.0, 0.0) * x_hi;
    let top = center + Vector::new(0.0, 1.0) * y_hi;
    let left = center + Vector::new(1.0, 0.0) * x_lo;
    let bottom = center + Vector::new(0.0, 1.0) * y_lo;

    let quarter_depth = depth.saturating_sub(1);
    let seeds = [right, top, left, bottom, right];
    let mut arcs = Vec::new();
    for w in seeds.windows(2) {
        let points = subdivide_arc(conic, w[0], w[1], quarter_depth, tol);
        arcs.extend(ratquads_from_chain(conic, &points));
    }
    Some(arcs)
}

/// Clips `conic` against `rect`: emits a chain of `RatQuad`s covering the
/// conic's intersection with `rect`, recursing to `depth`, plus any
/// isolated points (tangencies that don't continue across the rectangle).
/// A conic that lies entirely inside `rect` has no boundary crossings at
/// all; it is detected via its center and its full closed chain is emitted
/// instead of the empty result a purely crossing-based walk would give.
///
/// `tol` doubles as the recursion's length-based stopping budget; it must
/// be a positive, finite distance.
pub fn clip_to_rect(conic: &XAx, rect: &Rect, depth: u32, tol: f64) -> AlgorithmsResult<(Vec<RatQuad>, Vec<Point>)> {
    if !(tol.is_finite() && tol > 0.0) {
        return Err(AlgorithmsError::RangeError("tolerance must be a positive, finite distance"));
    }

    let crossings = conic.boundary_crossings(rect);
    if crossings.is_empty() {
        if let Some(center) = conic.center() {
            if conic.is_ellipse() && rect.contains(center) {
                if let Some(arcs) = closed_loop(conic, depth, tol) {
                    return Ok((arcs, Vec::new()));
                }
            }
        }
        return Ok((Vec::new(), Vec::new()));
    }
    if crossings.len() % 2 != 0 {
        // An isolated tangency; report it and drop it from pairing.
        return Ok((Vec::new(), crossings));
    }

    let mut arcs = Vec::new();
    let mut isolated = Vec::new();
    let n = crossings.len();
    for i in (0..n).step_by(2) {
        let p = crossings[i];
        let q = crossings[(i + 1) % n];
        if p.distance(&q) < tol {
            isolated.push(p);
            continue;
        }
        let points = subdivide_arc(conic, p, q, depth, tol);
        arcs.extend(ratquads_from_chain(conic, &points));
    }
    Ok((arcs, isolated))
}

/// Turns a chain of `2^k + 1` collinear-on-the-conic points into
/// non-overlapping `RatQuad`s, one per consecutive point triple.
fn ratquads_from_chain(conic: &XAx, points: &[Point]) -> Vec<RatQuad> {
    let mut out = Vec::new();
    let mut i = 0;
    while i + 2 < points.len() {
        let (start, mid, end) = (points[i], points[i + 1], points[i + 2]);
        let tp = conic.tangent_at(start);
        let tq = conic.tangent_at(end);
        let cross = tp.cross(&tq);
        let apex = if cross.abs() > geom::EPSILON {
            let diff = end - start;
            let s = diff.cross(&tq) / cross;
            Some(start + tp * s)
        } else {
            None
        };
        out.push(RatQuad::through_three_points(start, mid, end, apex));
        i += 2;
    }
    if i + 1 < points.len() {
        // Odd leftover point (possible if the chain collapsed early due to
        // the tolerance stop): approximate with a straight `RatQuad`.
        let start = points[i];
        let end = points[i + 1];
        let mid = Point::new(0.5 * (start.x + end.x), 0.5 * (start.y + end.y));
        out.push(RatQuad { p0: start, p1: mid, p2: end, weight: 1.0 });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::{point, Interval};

    #[test]
    fn circle_evaluates_to_zero_on_boundary() {
        let c = XAx::circle(point(0.0, 0.0), 1.0);
        assert!(c.evaluate(point(1.0, 0.0)).abs() < 1e-9);
        assert!(c.evaluate(point(0.0, 1.0)).abs() < 1e-9);
        assert!(c.evaluate(point(0.0, 0.0)) < 0.0);
    }

    #[test]
    fn seed_scenario_unit_circle_clip() {
        let conic = XAx::circle(point(0.0, 0.0), 1.0);
        let rect = Rect::new(Interval::new(-2.0, 2.0), Interval::new(-2.0, 2.0));
        let (arcs, isolated) = clip_to_rect(&conic, &rect, 4, 1e-9).unwrap();
        assert!(isolated.is_empty());
        assert_eq!(arcs.len(), 16);
        assert!(arcs[0].p0.near(&point(1.0, 0.0), 1e-6));
        for arc in &arcs {
            let a = arc.p0.distance(&point(0.0, 0.0));
            let b = arc.p2.distance(&point(0.0, 0.0));
            assert!((a - 1.0).abs() < 1e-6);
            assert!((b - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn clip_misses_conic_outside_rect() {
        let conic = XAx::circle(point(10.0, 10.0), 1.0);
        let rect = Rect::new(Interval::new(-2.0, 2.0), Interval::new(-2.0, 2.0));
        let (arcs, isolated) = clip_to_rect(&conic, &rect, 4, 1e-9).unwrap();
        assert!(arcs.is_empty());
        assert!(isolated.is_empty());
    }

    #[test]
    fn nonpositive_tolerance_is_a_range_error() {
        let conic = XAx::circle(point(0.0, 0.0), 1.0);
        let rect = Rect::new(Interval::new(-2.0, 2.0), Interval::new(-2.0, 2.0));
        assert!(matches!(clip_to_rect(&conic, &rect, 4, 0.0), Err(AlgorithmsError::RangeError(_))));
    }
}
