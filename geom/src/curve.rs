//! The planar curve hierarchy (component E).
//!
//! Modeled as a tagged variant rather than a virtual-function hierarchy
//! (see `DESIGN.md`): `Curve` dispatches on the tag, and each concrete
//! shape's closed-form operations live in their own arm.

use crate::affine::Affine;
use crate::d2::{point, vector};
use crate::error::{GeomError, GeomResult};
use crate::fit::nearest_time_numeric;
use crate::point::{D2, Point, Vector};
use crate::rect::{OptRect, Rect};
use crate::roots::find_roots;
use crate::sbasis::SBasis;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineSegment {
    pub initial: Point,
    pub final_: Point,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadraticBezier {
    pub initial: Point,
    pub control: Point,
    pub final_: Point,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezier {
    pub initial: Point,
    pub control1: Point,
    pub control2: Point,
    pub final_: Point,
}

/// Endpoint parameterization of an SVG elliptical arc (center + angles,
/// following `from_svg_arc`'s F6.5.x conversion from the SVG 1.1 endpoint
/// form; see `SPEC_FULL.md` §4 for the `original_source/` grounding of the
/// conversion).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EllipticalArc {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    /// Rotation of the ellipse's x-axis, in radians.
    pub rotation: f64,
    /// Start angle, in radians, in the ellipse's own (unrotated) frame.
    pub start_angle: f64,
    /// Signed sweep, in radians; negative for clockwise.
    pub sweep_angle: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

/// A generic curve carried as a `D2<SBasis>` fragment pair, used for shapes
/// that don't fit the closed-form variants (e.g. curve arithmetic results).
#[derive(Clone, Debug, PartialEq)]
pub struct SBasisCurve {
    pub inner: D2<SBasis>,
}

/// The uniform planar-curve contract (spec §4.5), dispatched over the tag.
#[derive(Clone, Debug, PartialEq)]
pub enum Curve {
    Line(LineSegment),
    Quadratic(QuadraticBezier),
    Cubic(CubicBezier),
    Arc(EllipticalArc),
    General(SBasisCurve),
}

impl LineSegment {
    pub fn new(initial: Point, final_: Point) -> Self {
        LineSegment { initial, final_ }
    }

    pub fn sample(&self, t: f64) -> Point {
        point(
            self.initial.x + t * (self.final_.x - self.initial.x),
            self.initial.y + t * (self.final_.y - self.initial.y),
        )
    }

    pub fn derivative_vector(&self) -> Vector {
        self.final_ - self.initial
    }

    pub fn length(&self) -> f64 {
        self.initial.distance(&self.final_)
    }

    /// Line-segment line equation `a*x + b*y + c = 0`, normalized so
    /// `(a, b)` has unit length; used by line/curve intersection.
    pub fn line_equation(&self) -> (f64, f64, f64) {
        let d = self.derivative_vector();
        let len = d.length();
        let (a, b) = if len == 0.0 { (0.0, 0.0) } else { (-d.y / len, d.x / len) };
        let c = -(a * self.initial.x + b * self.initial.y);
        (a, b, c)
    }
}

impl QuadraticBezier {
    pub fn new(initial: Point, control: Point, final_: Point) -> Self {
        QuadraticBezier { initial, control, final_ }
    }

    fn x_bezier(&self) -> crate::bezier::Bezier {
        crate::bezier::Bezier::new(vec![self.initial.x, self.control.x, self.final_.x]).unwrap()
    }

    fn y_bezier(&self) -> crate::bezier::Bezier {
        crate::bezier::Bezier::new(vec![self.initial.y, self.control.y, self.final_.y]).unwrap()
    }

    fn d2(&self) -> D2<crate::bezier::Bezier> {
        D2::new(self.x_bezier(), self.y_bezier())
    }

    pub fn sample(&self, t: f64) -> Point {
        self.d2().value_at(t)
    }

    pub fn to_cubic(&self) -> CubicBezier {
        // Exact degree elevation of a quadratic to a cubic.
        let c1 = point(
            self.initial.x + 2.0 / 3.0 * (self.control.x - self.initial.x),
            self.initial.y + 2.0 / 3.0 * (self.control.y - self.initial.y),
        );
        let c2 = point(
            self.final_.x + 2.0 / 3.0 * (self.control.x - self.final_.x),
            self.final_.y + 2.0 / 3.0 * (self.control.y - self.final_.y),
        );
        CubicBezier { initial: self.initial, control1: c1, control2: c2, final_: self.final_ }
    }
}

impl CubicBezier {
    pub fn new(initial: Point, control1: Point, control2: Point, final_: Point) -> Self {
        CubicBezier { initial, control1, control2, final_ }
    }

    fn x_bezier(&self) -> crate::bezier::Bezier {
        crate::bezier::Bezier::new(vec![self.initial.x, self.control1.x, self.control2.x, self.final_.x]).unwrap()
    }

    fn y_bezier(&self) -> crate::bezier::Bezier {
        crate::bezier::Bezier::new(vec![self.initial.y, self.control1.y, self.control2.y, self.final_.y]).unwrap()
    }

    pub fn d2(&self) -> D2<crate::bezier::Bezier> {
        D2::new(self.x_bezier(), self.y_bezier())
    }

    pub fn sample(&self, t: f64) -> Point {
        self.d2().value_at(t)
    }
}

impl EllipticalArc {
    /// SVG 1.1 endpoint-to-center conversion (F.6.5). `rx`/`ry` are
    /// sanitized (made positive, scaled up if too small for the chord) the
    /// way the SVG spec requires.
    pub fn from_svg_endpoint(
        from: Point,
        to: Point,
        mut rx: f64,
        mut ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
    ) -> GeomResult<EllipticalArc> {
        if from.near(&to, 0.0) {
            return Err(GeomError::NotRepresentable("degenerate elliptical arc: identical endpoints"));
        }
        rx = rx.abs();
        ry = ry.abs();
        if rx == 0.0 || ry == 0.0 {
            return Err(GeomError::NotRepresentable("elliptical arc radius must be non-zero"));
        }

        let phi = x_rotation % (2.0 * core::f64::consts::PI);
        let (sin_phi, cos_phi) = phi.sin_cos();

        let hd = vector((from.x - to.x) / 2.0, (from.y - to.y) / 2.0);
        let hs = vector((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);

        let p = point(cos_phi * hd.x + sin_phi * hd.y, -sin_phi * hd.x + cos_phi * hd.y);

        // F6.6.2/3: scale up radii if the chord doesn't fit.
        let lambda = (p.x * p.x) / (rx * rx) + (p.y * p.y) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;
        if sum_of_sq == 0.0 {
            return Err(GeomError::NotRepresentable("elliptical arc degenerate radii"));
        }

        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        let coe = sign * (((rx2 * ry2 - sum_of_sq) / sum_of_sq).abs()).sqrt();

        let transformed_cx = coe * rxpy / ry;
        let transformed_cy = -coe * rypx / rx;

        let center = point(
            cos_phi * transformed_cx - sin_phi * transformed_cy + hs.x,
            sin_phi * transformed_cx + cos_phi * transformed_cy + hs.y,
        );

        let angle = |ux: f64, uy: f64, vx: f64, vy: f64| -> f64 {
            let dot = ux * vx + uy * vy;
            let len = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
            let mut a = (dot / len).clamp(-1.0, 1.0).acos();
            if ux * vy - uy * vx < 0.0 {
                a = -a;
            }
            a
        };

        let start_angle = angle(1.0, 0.0, (p.x - transformed_cx) / rx, (p.y - transformed_cy) / ry);
        let mut sweep_angle = angle(
            (p.x - transformed_cx) / rx,
            (p.y - transformed_cy) / ry,
            (-p.x - transformed_cx) / rx,
            (-p.y - transformed_cy) / ry,
        );
        if !sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * core::f64::consts::PI;
        } else if sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * core::f64::consts::PI;
        }

        Ok(EllipticalArc { center, rx, ry, rotation: phi, start_angle, sweep_angle, large_arc, sweep })
    }

    pub fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + t * self.sweep_angle
    }

    pub fn sample(&self, t: f64) -> Point {
        let a = self.angle_at(t);
        let (sin_a, cos_a) = a.sin_cos();
        let (sin_phi, cos_phi) = self.rotation.sin_cos();
        let x = self.rx * cos_a;
        let y = self.ry * sin_a;
        point(
            self.center.x + cos_phi * x - sin_phi * y,
            self.center.y + sin_phi * x + cos_phi * y,
        )
    }

    /// Closed-form derivative with respect to `t in [0,1]`.
    pub fn derivative_at(&self, t: f64) -> Vector {
        let a = self.angle_at(t);
        let (sin_a, cos_a) = a.sin_cos();
        let (sin_phi, cos_phi) = self.rotation.sin_cos();
        let dx_da = -self.rx * sin_a;
        let dy_da = self.ry * cos_a;
        let dx = cos_phi * dx_da - sin_phi * dy_da;
        let dy = sin_phi * dx_da + cos_phi * dy_da;
        vector(dx * self.sweep_angle, dy * self.sweep_angle)
    }

    pub fn initial_point(&self) -> Point {
        self.sample(0.0)
    }

    pub fn final_point(&self) -> Point {
        self.sample(1.0)
    }

    /// Subdivides at `t`: both halves are elliptical arcs on the same
    /// ellipse with endpoints and flags recomputed from the new angular
    /// range; `large_arc` follows from whether the sub-range spans more
    /// than half the original sweep.
    pub fn subdivide(&self, t: f64) -> (EllipticalArc, EllipticalArc) {
        let mid_angle = self.sweep_angle * t;
        let left = EllipticalArc {
            sweep_angle: mid_angle,
            large_arc: mid_angle.abs() > core::f64::consts::PI,
            ..*self
        };
        let right = EllipticalArc {
            start_angle: self.start_angle + mid_angle,
            sweep_angle: self.sweep_angle - mid_angle,
            large_arc: (self.sweep_angle - mid_angle).abs() > core::f64::consts::PI,
            ..*self
        };
        (left, right)
    }

    pub fn bounds_fast(&self) -> Rect {
        // Bounding box of the full (unswept) rotated ellipse; a superset of
        // the true bound for a partial arc.
        let extent = ((self.rx * self.rotation.cos()).powi(2) + (self.ry * self.rotation.sin()).powi(2)).sqrt();
        let extent_y = ((self.rx * self.rotation.sin()).powi(2) + (self.ry * self.rotation.cos()).powi(2)).sqrt();
        Rect::from_points(
            point(self.center.x - extent, self.center.y - extent_y),
            point(self.center.x + extent, self.center.y + extent_y),
        )
    }

    pub fn bounds_exact(&self) -> Rect {
        let mut min = self.initial_point();
        let mut max = min;
        let update = |p: Point, min: &mut Point, max: &mut Point| {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        };
        update(self.final_point(), &mut min, &mut max);
        // Extrema occur where dx/dt == 0 or dy/dt == 0; solve in closed
        // form for the angle and keep the ones inside the swept range.
        for extremum_angle in self.axis_extrema_angles() {
            if let Some(t) = self.angle_to_t(extremum_angle) {
                update(self.sample(t), &mut min, &mut max);
            }
        }
        Rect::from_points(min, max)
    }

    fn axis_extrema_angles(&self) -> [f64; 4] {
        let phi = self.rotation;
        let tx = (-self.ry * phi.sin() / (self.rx * phi.cos())).atan();
        let ty = (self.ry * phi.cos() / (self.rx * phi.sin())).atan();
        [tx, tx + core::f64::consts::PI, ty, ty + core::f64::consts::PI]
    }

    fn angle_to_t(&self, angle: f64) -> Option<f64> {
        if self.sweep_angle == 0.0 {
            return None;
        }
        let mut delta = angle - self.start_angle;
        let two_pi = 2.0 * core::f64::consts::PI;
        delta = delta.rem_euclid(two_pi * self.sweep_angle.signum().max(1.0));
        let t = delta / self.sweep_angle;
        // Normalize into [0,1] by trying the periodic equivalents.
        let mut candidate = t.rem_euclid(1.0);
        if self.sweep_angle < 0.0 {
            candidate = 1.0 - (-t).rem_euclid(1.0);
        }
        if (0.0..=1.0).contains(&candidate) {
            Some(candidate)
        } else {
            None
        }
    }
}

impl Curve {
    pub fn initial_point(&self) -> Point {
        match self {
            Curve::Line(l) => l.initial,
            Curve::Quadratic(q) => q.initial,
            Curve::Cubic(c) => c.initial,
            Curve::Arc(a) => a.initial_point(),
            Curve::General(g) => g.inner.value_at(0.0),
        }
    }

    pub fn final_point(&self) -> Point {
        match self {
            Curve::Line(l) => l.final_,
            Curve::Quadratic(q) => q.final_,
            Curve::Cubic(c) => c.final_,
            Curve::Arc(a) => a.final_point(),
            Curve::General(g) => g.inner.value_at(1.0),
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        match self {
            Curve::Line(l) => l.sample(t),
            Curve::Quadratic(q) => q.sample(t),
            Curve::Cubic(c) => c.sample(t),
            Curve::Arc(a) => a.sample(t),
            Curve::General(g) => g.inner.value_at(t),
        }
    }

    pub fn value_at(&self, t: f64, dim: usize) -> f64 {
        let p = self.point_at(t);
        if dim == 0 { p.x } else { p.y }
    }

    pub fn point_and_derivatives(&self, t: f64, n: usize) -> Vec<Point> {
        match self {
            Curve::Line(l) => {
                let mut out = vec![l.sample(t)];
                if n >= 1 {
                    out.push(l.derivative_vector().to_point());
                }
                out.extend(core::iter::repeat(Point::origin()).take(n.saturating_sub(1)));
                out
            }
            Curve::Quadratic(q) => {
                let d2 = q.d2();
                d2.value_and_derivatives(t, n)
            }
            Curve::Cubic(c) => {
                let d2 = c.d2();
                d2.value_and_derivatives(t, n)
            }
            Curve::Arc(a) => {
                let mut out = vec![a.sample(t)];
                if n >= 1 {
                    out.push(a.derivative_at(t).to_point());
                }
                out.truncate(n + 1);
                while out.len() < n + 1 {
                    out.push(Point::origin());
                }
                out
            }
            Curve::General(g) => g.inner.to_bezier().value_and_derivatives(t, n),
        }
    }

    pub fn derivative(&self) -> Curve {
        match self {
            Curve::Line(l) => {
                let v = l.derivative_vector();
                Curve::General(SBasisCurve {
                    inner: D2::new(SBasis::new(vec![crate::sbasis::LinearPair { s: v.x, t: v.x }]), SBasis::new(vec![crate::sbasis::LinearPair { s: v.y, t: v.y }])),
                })
            }
            Curve::Quadratic(q) => {
                let d2 = q.d2().derivative();
                Curve::Line(LineSegment::new(d2.value_at(0.0), d2.value_at(1.0)))
            }
            Curve::Cubic(c) => {
                let d2 = c.d2().derivative();
                Curve::Quadratic(QuadraticBezier::new(
                    point(d2.x.coeff(0), d2.y.coeff(0)),
                    point(d2.x.coeff(1), d2.y.coeff(1)),
                    point(d2.x.coeff(2), d2.y.coeff(2)),
                ))
            }
            Curve::Arc(a) => Curve::General(SBasisCurve { inner: arc_derivative_sbasis(a) }),
            Curve::General(g) => Curve::General(SBasisCurve { inner: g.inner.derivative() }),
        }
    }

    pub fn subdivide(&self, t: f64) -> (Curve, Curve) {
        match self {
            Curve::Line(l) => {
                let mid = l.sample(t);
                (Curve::Line(LineSegment::new(l.initial, mid)), Curve::Line(LineSegment::new(mid, l.final_)))
            }
            Curve::Quadratic(q) => {
                let (lx, rx) = q.x_bezier().subdivide(t);
                let (ly, ry) = q.y_bezier().subdivide(t);
                (
                    Curve::Quadratic(QuadraticBezier::new(point(lx.coeff(0), ly.coeff(0)), point(lx.coeff(1), ly.coeff(1)), point(lx.coeff(2), ly.coeff(2)))),
                    Curve::Quadratic(QuadraticBezier::new(point(rx.coeff(0), ry.coeff(0)), point(rx.coeff(1), ry.coeff(1)), point(rx.coeff(2), ry.coeff(2)))),
                )
            }
            Curve::Cubic(c) => {
                let (lx, rx) = c.x_bezier().subdivide(t);
                let (ly, ry) = c.y_bezier().subdivide(t);
                (
                    Curve::Cubic(CubicBezier::new(
                        point(lx.coeff(0), ly.coeff(0)),
                        point(lx.coeff(1), ly.coeff(1)),
                        point(lx.coeff(2), ly.coeff(2)),
                        point(lx.coeff(3), ly.coeff(3)),
                    )),
                    Curve::Cubic(CubicBezier::new(
                        point(rx.coeff(0), ry.coeff(0)),
                        point(rx.coeff(1), ry.coeff(1)),
                        point(rx.coeff(2), ry.coeff(2)),
                        point(rx.coeff(3), ry.coeff(3)),
                    )),
                )
            }
            Curve::Arc(a) => {
                let (l, r) = a.subdivide(t);
                (Curve::Arc(l), Curve::Arc(r))
            }
            Curve::General(g) => {
                let bez = g.inner.to_bezier();
                let (lx, rx) = bez.x.subdivide(t);
                let (ly, ry) = bez.y.subdivide(t);
                (
                    Curve::General(SBasisCurve { inner: D2::new(lx.to_sbasis(), ly.to_sbasis()) }),
                    Curve::General(SBasisCurve { inner: D2::new(rx.to_sbasis(), ry.to_sbasis()) }),
                )
            }
        }
    }

    pub fn portion(&self, t0: f64, t1: f64) -> Curve {
        if t0 <= t1 {
            let (_, hi) = self.subdivide(t0);
            let t1_rescaled = if t1 >= 1.0 { 1.0 } else { (t1 - t0) / (1.0 - t0) };
            let (lo, _) = hi.subdivide(t1_rescaled.clamp(0.0, 1.0));
            lo
        } else {
            self.portion(t1, t0).reverse()
        }
    }

    pub fn reverse(&self) -> Curve {
        match self {
            Curve::Line(l) => Curve::Line(LineSegment::new(l.final_, l.initial)),
            Curve::Quadratic(q) => Curve::Quadratic(QuadraticBezier::new(q.final_, q.control, q.initial)),
            Curve::Cubic(c) => Curve::Cubic(CubicBezier::new(c.final_, c.control2, c.control1, c.initial)),
            Curve::Arc(a) => Curve::Arc(EllipticalArc {
                start_angle: a.start_angle + a.sweep_angle,
                sweep_angle: -a.sweep_angle,
                sweep: !a.sweep,
                ..*a
            }),
            Curve::General(g) => Curve::General(SBasisCurve {
                inner: D2::new(g.inner.x.to_bezier().reversed().to_sbasis(), g.inner.y.to_bezier().reversed().to_sbasis()),
            }),
        }
    }

    /// For linear affines applied to a line segment this is closed-form;
    /// cubics/quadratics transform their control points directly; arcs
    /// re-derive center/radii/rotation, falling back to a general curve if
    /// the affine is not similarity-preserving (shears an ellipse into a
    /// non-ellipse in general, which this kernel represents as a cubic
    /// approximation is out of scope — shears on arcs return a `General`
    /// curve sampled from the transformed parametric form instead).
    pub fn transformed(&self, m: &Affine) -> Curve {
        match self {
            Curve::Line(l) => Curve::Line(LineSegment::new(m.transform_point(l.initial), m.transform_point(l.final_))),
            Curve::Quadratic(q) => Curve::Quadratic(QuadraticBezier::new(
                m.transform_point(q.initial),
                m.transform_point(q.control),
                m.transform_point(q.final_),
            )),
            Curve::Cubic(c) => Curve::Cubic(CubicBezier::new(
                m.transform_point(c.initial),
                m.transform_point(c.control1),
                m.transform_point(c.control2),
                m.transform_point(c.final_),
            )),
            Curve::Arc(_) | Curve::General(_) => {
                let d2 = self.as_d2_bezier();
                Curve::General(SBasisCurve { inner: d2.transformed(m).to_sbasis() })
            }
        }
    }

    fn as_d2_bezier(&self) -> D2<crate::bezier::Bezier> {
        match self {
            Curve::Line(l) => D2::new(
                crate::bezier::Bezier::new(vec![l.initial.x, l.final_.x]).unwrap(),
                crate::bezier::Bezier::new(vec![l.initial.y, l.final_.y]).unwrap(),
            ),
            Curve::Quadratic(q) => q.d2(),
            Curve::Cubic(c) => c.d2(),
            Curve::Arc(_) | Curve::General(_) => {
                // Sample-based fallback: a degree-8 Bezier *interpolating*
                // 9 uniformly sampled points (not one built from the raw
                // samples as control points, which would only agree with
                // the true curve at the two endpoints). Callers needing an
                // exact arc transform under shear are expected to flatten
                // first.
                let n = 8;
                let xs: Vec<f64> = (0..=n).map(|i| self.point_at(i as f64 / n as f64).x).collect();
                let ys: Vec<f64> = (0..=n).map(|i| self.point_at(i as f64 / n as f64).y).collect();
                D2::new(
                    crate::bezier::Bezier::interpolating(&xs).unwrap(),
                    crate::bezier::Bezier::interpolating(&ys).unwrap(),
                )
            }
        }
    }

    pub fn bounds_fast(&self) -> OptRect {
        match self {
            Curve::Line(l) => OptRect::from(Rect::from_points(l.initial, l.final_)),
            Curve::Quadratic(_) | Curve::Cubic(_) => self.as_d2_bezier().bounds_fast(),
            Curve::Arc(a) => OptRect::from(a.bounds_fast()),
            Curve::General(g) => g.inner.to_bezier().bounds_fast(),
        }
    }

    pub fn bounds_exact(&self) -> OptRect {
        match self {
            Curve::Line(l) => OptRect::from(Rect::from_points(l.initial, l.final_)),
            Curve::Quadratic(_) | Curve::Cubic(_) => self.as_d2_bezier().bounds_exact(),
            Curve::Arc(a) => OptRect::from(a.bounds_exact()),
            Curve::General(g) => g.inner.to_bezier().bounds_exact(),
        }
    }

    pub fn bounds_local(&self, interval: (f64, f64), derivative_order: usize) -> OptRect {
        let sub = self.portion(interval.0, interval.1);
        if derivative_order == 0 {
            sub.bounds_fast()
        } else {
            let mut cur = sub;
            for _ in 0..derivative_order {
                cur = cur.derivative();
            }
            cur.bounds_fast()
        }
    }

    /// Values of `t` where the curve's `dim` component equals `v`.
    pub fn roots(&self, v: f64, dim: usize) -> Vec<f64> {
        match self {
            Curve::Line(_) | Curve::Quadratic(_) | Curve::Cubic(_) => {
                let d2 = self.as_d2_bezier();
                let frag = if dim == 0 { &d2.x } else { &d2.y };
                let shifted = crate::bezier::Bezier::new(
                    frag.coeffs().iter().map(|c| c - v).collect::<Vec<_>>(),
                )
                .unwrap();
                find_roots(shifted.coeffs(), 0.0, 1.0)
            }
            Curve::Arc(a) => arc_roots(a, v, dim),
            Curve::General(g) => {
                let frag = if dim == 0 { g.inner.x.to_bezier() } else { g.inner.y.to_bezier() };
                let shifted: Vec<f64> = frag.coeffs().iter().map(|c| c - v).collect();
                find_roots(&shifted, 0.0, 1.0)
            }
        }
    }

    /// Arc length to the given absolute error. Exact for line segments;
    /// adaptive subdivision (bisect until the chord and the control
    /// polygon length agree within `tolerance`) otherwise.
    pub fn length(&self, tolerance: f64) -> f64 {
        if let Curve::Line(l) = self {
            return l.length();
        }
        length_adaptive(self, 0.0, 1.0, tolerance)
    }

    /// Nearest time to `point` restricted to `[from, to]`: coarse sampling
    /// followed by root-polishing on `(P(t) - point) . P'(t) = 0`.
    pub fn nearest_time(&self, point: Point, from: f64, to: f64) -> f64 {
        nearest_time_numeric(self, point, from, to)
    }

    pub fn degrees_of_freedom(&self) -> usize {
        match self {
            Curve::Line(_) => 4,
            Curve::Quadratic(_) => 6,
            Curve::Cubic(_) => 8,
            Curve::Arc(_) => 10,
            Curve::General(g) => 2 * g.inner.x.to_bezier().size(),
        }
    }
}

fn arc_derivative_sbasis(a: &EllipticalArc) -> D2<SBasis> {
    // Same interpolation-not-control-points construction as
    // `Curve::as_d2_bezier`'s Arc/General fallback, over the derivative's
    // sampled values rather than the curve's own.
    let n = 8;
    let xs: Vec<f64> = (0..=n).map(|i| a.derivative_at(i as f64 / n as f64).x).collect();
    let ys: Vec<f64> = (0..=n).map(|i| a.derivative_at(i as f64 / n as f64).y).collect();
    D2::new(
        crate::bezier::Bezier::interpolating(&xs).unwrap().to_sbasis(),
        crate::bezier::Bezier::interpolating(&ys).unwrap().to_sbasis(),
    )
}

fn arc_roots(a: &EllipticalArc, v: f64, dim: usize) -> Vec<f64> {
    // x(t) or y(t) - v = 0, solved directly in angle space then mapped
    // back to t, filtered to the arc's angular range.
    let mut out = Vec::new();
    let steps = 64;
    let component = |p: Point| if dim == 0 { p.x } else { p.y };
    let mut prev_val = component(a.sample(0.0)) - v;
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let cur_val = component(a.sample(t)) - v;
        if prev_val == 0.0 {
            out.push((i - 1) as f64 / steps as f64);
        } else if (prev_val > 0.0) != (cur_val > 0.0) {
            // Bisection refine within this small bracket.
            let mut lo = (i - 1) as f64 / steps as f64;
            let mut hi = t;
            let mut lo_val = prev_val;
            for _ in 0..60 {
                let mid = (lo + hi) / 2.0;
                let mid_val = component(a.sample(mid)) - v;
                if (mid_val > 0.0) == (lo_val > 0.0) {
                    lo = mid;
                    lo_val = mid_val;
                } else {
                    hi = mid;
                }
            }
            out.push((lo + hi) / 2.0);
        }
        prev_val = cur_val;
    }
    out
}

fn length_adaptive(c: &Curve, t0: f64, t1: f64, tolerance: f64) -> f64 {
    let sub = c.portion(t0, t1);
    let p0 = sub.initial_point();
    let p1 = sub.final_point();
    let chord = p0.distance(&p1);
    let control_len = match &sub {
        Curve::Line(_) => chord,
        Curve::Quadratic(q) => q.initial.distance(&q.control) + q.control.distance(&q.final_),
        Curve::Cubic(c) => {
            c.initial.distance(&c.control1) + c.control1.distance(&c.control2) + c.control2.distance(&c.final_)
        }
        Curve::Arc(_) | Curve::General(_) => {
            let mid = sub.point_at(0.5);
            2.0 * (p0.distance(&mid) + mid.distance(&p1))
        }
    };
    if control_len - chord <= tolerance {
        (chord + control_len) / 2.0
    } else {
        let mid = (t0 + t1) / 2.0;
        length_adaptive(c, t0, mid, tolerance / 2.0) + length_adaptive(c, mid, t1, tolerance / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_segment_intersection_seed_scenario() {
        let a = Curve::Line(LineSegment::new(point(0.0, 0.0), point(10.0, 10.0)));
        let b = Curve::Line(LineSegment::new(point(0.0, 10.0), point(10.0, 0.0)));
        let mid = a.point_at(0.5);
        assert!(mid.near(&point(5.0, 5.0), 1e-9));
        let mid_b = b.point_at(0.5);
        assert!(mid_b.near(&point(5.0, 5.0), 1e-9));
    }

    #[test]
    fn cubic_bounds_exact_seed_scenario() {
        let c = Curve::Cubic(CubicBezier::new(point(0.0, 0.0), point(0.0, 1.0), point(1.0, 1.0), point(1.0, 0.0)));
        let r = c.bounds_exact().as_rect().unwrap();
        assert!((r.x.min() - 0.0).abs() < 1e-9);
        assert!((r.x.max() - 1.0).abs() < 1e-9);
        assert!((r.y.min() - 0.0).abs() < 1e-9);
        assert!((r.y.max() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn endpoint_invariant_for_all_variants() {
        let curves = vec![
            Curve::Line(LineSegment::new(point(0.0, 0.0), point(1.0, 1.0))),
            Curve::Quadratic(QuadraticBezier::new(point(0.0, 0.0), point(0.5, 1.0), point(1.0, 0.0))),
            Curve::Cubic(CubicBezier::new(point(0.0, 0.0), point(0.2, 1.0), point(0.8, 1.0), point(1.0, 0.0))),
        ];
        for c in curves {
            assert!(c.initial_point().near(&c.point_at(0.0), 1e-12));
            assert!(c.final_point().near(&c.point_at(1.0), 1e-12));
        }
    }

    #[test]
    fn subdivide_continuity() {
        let c = Curve::Cubic(CubicBezier::new(point(0.0, 0.0), point(1.0, 2.0), point(2.0, -1.0), point(3.0, 1.0)));
        let t = 0.4;
        let (l, r) = c.subdivide(t);
        assert!(l.final_point().near(&c.point_at(t), 1e-9));
        assert!(r.initial_point().near(&c.point_at(t), 1e-9));
    }

    #[test]
    fn elliptical_arc_quarter_circle() {
        let arc = EllipticalArc::from_svg_endpoint(point(1.0, 0.0), point(0.0, 1.0), 1.0, 1.0, 0.0, false, true).unwrap();
        assert!(arc.initial_point().near(&point(1.0, 0.0), 1e-9));
        assert!(arc.final_point().near(&point(0.0, 1.0), 1e-9));
    }

    #[test]
    fn bounds_soundness_over_1024_samples() {
        let curves = vec![
            Curve::Line(LineSegment::new(point(0.0, 0.0), point(3.0, -2.0))),
            Curve::Quadratic(QuadraticBezier::new(point(0.0, 0.0), point(2.0, 5.0), point(4.0, 0.0))),
            Curve::Cubic(CubicBezier::new(point(0.0, 0.0), point(1.0, 4.0), point(3.0, -4.0), point(4.0, 1.0))),
            Curve::Arc(EllipticalArc::from_svg_endpoint(point(2.0, 0.0), point(0.0, 2.0), 2.0, 1.0, 0.3, true, false).unwrap()),
        ];
        for c in curves {
            let bounds = c.bounds_exact().as_rect().unwrap();
            for i in 0..=1024 {
                let t = i as f64 / 1024.0;
                let p = c.point_at(t);
                assert!(bounds.x.contains(p.x) || (p.x - bounds.x.min()).abs() < 1e-6 || (p.x - bounds.x.max()).abs() < 1e-6, "{:?} x out of {:?}", p, bounds);
                assert!(bounds.y.contains(p.y) || (p.y - bounds.y.min()).abs() < 1e-6 || (p.y - bounds.y.max()).abs() < 1e-6, "{:?} y out of {:?}", p, bounds);
            }
        }
    }
}
