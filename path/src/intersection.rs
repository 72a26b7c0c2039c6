//! Pairwise curve intersection (component F/G §4.7): line/line closed form,
//! line/curve via the signed-distance polynomial, Bezier/Bezier via
//! recursive subdivision + flatness, and curve/ellipse via implicit
//! substitution.

use geom::{find_roots, Curve, LineSegment, Point};

/// Outcome of intersecting two line segments, surfacing the degenerate
/// cases explicitly rather than silently returning no intersections
/// (grounded on `geom.cpp`'s line-intersection classification per
/// `SPEC_FULL.md` §4).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LineIntersection {
    /// A single transversal crossing, at times `(ta, tb)` and the point.
    Point(f64, f64, Point),
    /// No crossing within `[0, 1]` on both segments.
    None,
    /// The two lines are parallel but distinct: never any finite solution.
    Parallel,
    /// The two segments lie on the same infinite line.
    Coincident,
}

pub fn intersect_lines(a: &LineSegment, b: &LineSegment) -> LineIntersection {
    let d1 = a.final_ - a.initial;
    let d2 = b.final_ - b.initial;
    let denom = d1.cross(&d2);
    if denom.abs() < geom::EPSILON {
        // Parallel or coincident: check whether b's initial point lies on
        // a's infinite line.
        let to_b = b.initial - a.initial;
        if to_b.cross(&d1).abs() < geom::EPSILON {
            return LineIntersection::Coincident;
        }
        return LineIntersection::Parallel;
    }
    let to_b = b.initial - a.initial;
    let ta = to_b.cross(&d2) / denom;
    let tb = to_b.cross(&d1) / denom;
    if (0.0..=1.0).contains(&ta) && (0.0..=1.0).contains(&tb) {
        LineIntersection::Point(ta, tb, a.sample(ta))
    } else {
        LineIntersection::None
    }
}

/// Roots of the signed perpendicular distance from `line`'s infinite
/// extension, filtered to `[0, 1]` on both `line` and `curve`.
pub fn intersect_line_curve(line: &LineSegment, curve: &Curve) -> Vec<(f64, f64, Point)> {
    let (lx, ly, lc) = line.line_equation();
    let mut out = Vec::new();
    // Build the signed-distance function of `curve` w.r.t. the line as a
    // scalar root-find: lx*x(t) + ly*y(t) + lc == 0.
    let curve_line = crate_signed_distance(curve, lx, ly, lc);
    for t in curve_line {
        let p = curve.point_at(t);
        if let Some(s) = project_onto_segment(line, p) {
            if (0.0..=1.0).contains(&s) {
                out.push((s, t, p));
            }
        }
    }
    out
}

fn crate_signed_distance(curve: &Curve, a: f64, b: f64, c: f64) -> Vec<f64> {
    match curve {
        Curve::Line(l) => {
            let f0 = a * l.initial.x + b * l.initial.y + c;
            let f1 = a * l.final_.x + b * l.final_.y + c;
            find_roots(&[f0, f1], 0.0, 1.0)
        }
        Curve::Quadratic(_) | Curve::Cubic(_) => {
            let samples = 32;
            let vals: Vec<f64> = (0..=samples)
                .map(|i| {
                    let t = i as f64 / samples as f64;
                    let p = curve.point_at(t);
                    a * p.x + b * p.y + c
                })
                .collect();
            bracket_roots(&vals, samples, curve, a, b, c)
        }
        Curve::Arc(_) | Curve::General(_) => {
            let samples = 64;
            let vals: Vec<f64> = (0..=samples)
                .map(|i| {
                    let t = i as f64 / samples as f64;
                    let p = curve.point_at(t);
                    a * p.x + b * p.y + c
                })
                .collect();
            bracket_roots(&vals, samples, curve, a, b, c)
        }
    }
}

fn bracket_roots(vals: &[f64], samples: usize, curve: &Curve, a: f64, b: f64, c: f64) -> Vec<f64> {
    let mut out = Vec::new();
    let f = |t: f64| {
        let p = curve.point_at(t);
        a * p.x + b * p.y + c
    };
    for i in 0..samples {
        let (f0, f1) = (vals[i], vals[i + 1]);
        if f0 == 0.0 {
            out.push(i as f64 / samples as f64);
            continue;
        }
        if (f0 > 0.0) != (f1 > 0.0) {
            let mut lo = i as f64 / samples as f64;
            let mut hi = (i + 1) as f64 / samples as f64;
            let mut flo = f0;
            for _ in 0..60 {
                let mid = (lo + hi) / 2.0;
                let fm = f(mid);
                if (fm > 0.0) == (flo > 0.0) {
                    lo = mid;
                    flo = fm;
                } else {
                    hi = mid;
                }
            }
            out.push((lo + hi) / 2.0);
        }
    }
    out
}

fn project_onto_segment(line: &LineSegment, p: Point) -> Option<f64> {
    let d = line.final_ - line.initial;
    let len2 = d.dot(&d);
    if len2 < geom::EPSILON * geom::EPSILON {
        return None;
    }
    let to_p = p - line.initial;
    Some(to_p.dot(&d) / len2)
}

/// General curve/curve intersection: dispatches to the closed-form line
/// case, falls back to recursive subdivision + flatness test otherwise.
pub fn intersect_curves(a: &Curve, b: &Curve, precision: f64) -> Vec<(f64, f64, Point)> {
    match (a, b) {
        (Curve::Line(la), Curve::Line(lb)) => match intersect_lines(la, lb) {
            LineIntersection::Point(ta, tb, p) => vec![(ta, tb, p)],
            _ => Vec::new(),
        },
        (Curve::Line(_), _) => {
            if let Curve::Line(la) = a {
                intersect_line_curve(la, b).into_iter().map(|(s, t, p)| (s, t, p)).collect()
            } else {
                unreachable!()
            }
        }
        (_, Curve::Line(lb)) => intersect_line_curve(lb, a).into_iter().map(|(tb, ta, p)| (ta, tb, p)).collect(),
        _ => subdivide_intersect(a, 0.0, 1.0, b, 0.0, 1.0, precision, 0),
    }
}

/// Bounds-fast rejection followed by recursive subdivision until one side
/// is flat to within `precision`, at which point it's linearized and
/// solved as line x curve.
fn subdivide_intersect(a: &Curve, a0: f64, a1: f64, b: &Curve, b0: f64, b1: f64, precision: f64, depth: u32) -> Vec<(f64, f64, Point)> {
    let ra = a.bounds_fast();
    let rb = b.bounds_fast();
    let (Some(ra), Some(rb)) = (ra.as_rect(), rb.as_rect()) else {
        return Vec::new();
    };
    if !ra.intersects(&rb) {
        return Vec::new();
    }
    if depth > 32 {
        return Vec::new();
    }

    let flat_a = is_flat(a, precision);
    let flat_b = is_flat(b, precision);

    if flat_a && flat_b {
        let line_a = LineSegment::new(a.initial_point(), a.final_point());
        let line_b = LineSegment::new(b.initial_point(), b.final_point());
        return match intersect_lines(&line_a, &line_b) {
            LineIntersection::Point(ta, tb, p) => {
                vec![(a0 + ta * (a1 - a0), b0 + tb * (b1 - b0), p)]
            }
            _ => Vec::new(),
        };
    }

    let mut out = Vec::new();
    if !flat_a {
        let (al, ar) = a.subdivide(0.5);
        let am = (a0 + a1) / 2.0;
        out.extend(subdivide_intersect(&al, a0, am, b, b0, b1, precision, depth + 1));
        out.extend(subdivide_intersect(&ar, am, a1, b, b0, b1, precision, depth + 1));
    } else {
        let (bl, br) = b.subdivide(0.5);
        let bm = (b0 + b1) / 2.0;
        out.extend(subdivide_intersect(a, a0, a1, &bl, b0, bm, precision, depth + 1));
        out.extend(subdivide_intersect(a, a0, a1, &br, bm, b1, precision, depth + 1));
    }
    dedup_close(out, precision)
}

fn is_flat(c: &Curve, precision: f64) -> bool {
    let p0 = c.initial_point();
    let p1 = c.final_point();
    let chord = LineSegment::new(p0, p1);
    let (a, b, k) = chord.line_equation();
    let max_dev = [0.25, 0.5, 0.75]
        .iter()
        .map(|&t| {
            let p = c.point_at(t);
            (a * p.x + b * p.y + k).abs()
        })
        .fold(0.0_f64, f64::max);
    max_dev <= precision
}

fn dedup_close(mut items: Vec<(f64, f64, Point)>, precision: f64) -> Vec<(f64, f64, Point)> {
    items.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap());
    let mut out: Vec<(f64, f64, Point)> = Vec::new();
    for item in items {
        if let Some(last) = out.last() {
            if (last.0 - item.0).abs() < precision.max(1e-9) && (last.1 - item.1).abs() < precision.max(1e-9) {
                continue;
            }
        }
        out.push(item);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::point;

    #[test]
    fn seed_scenario_crossing_diagonals() {
        let a = LineSegment::new(point(0.0, 0.0), point(10.0, 10.0));
        let b = LineSegment::new(point(0.0, 10.0), point(10.0, 0.0));
        match intersect_lines(&a, &b) {
            LineIntersection::Point(ta, tb, p) => {
                assert!((ta - 0.5).abs() < 1e-9);
                assert!((tb - 0.5).abs() < 1e-9);
                assert!(p.near(&point(5.0, 5.0), 1e-9));
            }
            other => panic!("expected a crossing, got {:?}", other),
        }
    }

    #[test]
    fn parallel_lines_report_parallel() {
        let a = LineSegment::new(point(0.0, 0.0), point(1.0, 1.0));
        let b = LineSegment::new(point(0.0, 1.0), point(1.0, 2.0));
        assert_eq!(intersect_lines(&a, &b), LineIntersection::Parallel);
    }

    #[test]
    fn coincident_lines_detected() {
        let a = LineSegment::new(point(0.0, 0.0), point(1.0, 1.0));
        let b = LineSegment::new(point(0.5, 0.5), point(2.0, 2.0));
        assert_eq!(intersect_lines(&a, &b), LineIntersection::Coincident);
    }

    #[test]
    fn cubic_cubic_intersection_finds_crossing() {
        let a = Curve::Cubic(geom::CubicBezier::new(point(0.0, 0.0), point(3.0, 5.0), point(7.0, -5.0), point(10.0, 0.0)));
        let b = Curve::Line(LineSegment::new(point(0.0, 0.0), point(10.0, 0.0)));
        let hits = intersect_curves(&a, &b, 1e-6);
        assert!(!hits.is_empty());
        for (_, _, p) in &hits {
            assert!(p.y.abs() < 1e-4);
        }
    }

    /// `a.intersect(b)` and `b.intersect(a)` must agree up to the swap
    /// `(ta, tb) -> (tb, ta)`: intersection is a property of the pair of
    /// curves, not of which one is named first.
    #[test]
    fn intersection_is_symmetric_under_argument_swap() {
        let a = Curve::Cubic(geom::CubicBezier::new(point(0.0, 0.0), point(3.0, 6.0), point(7.0, -6.0), point(10.0, 0.0)));
        let b = Curve::Cubic(geom::CubicBezier::new(point(0.0, 3.0), point(4.0, -4.0), point(6.0, 4.0), point(10.0, -3.0)));

        let mut forward = intersect_curves(&a, &b, 1e-6);
        let mut backward: Vec<(f64, f64, Point)> = intersect_curves(&b, &a, 1e-6)
            .into_iter()
            .map(|(tb, ta, p)| (ta, tb, p))
            .collect();

        forward.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap());
        backward.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap());

        assert_eq!(forward.len(), backward.len());
        for (f, b) in forward.iter().zip(backward.iter()) {
            assert!((f.0 - b.0).abs() < 1e-4, "ta mismatch: {} vs {}", f.0, b.0);
            assert!((f.1 - b.1).abs() < 1e-4, "tb mismatch: {} vs {}", f.1, b.1);
            assert!(f.2.near(&b.2, 1e-4));
        }
    }
}
