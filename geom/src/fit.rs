//! Least-squares fitting helpers (component K): circle fitting (grounded on
//! the Kasa-style algebraic fit used by `circle.cpp` in `original_source/`),
//! ellipse fitting, Bezier fitting from a point cloud and the numeric
//! nearest-time search shared by the curve hierarchy.

use crate::affine::Affine;
use crate::curve::Curve;
use crate::d2::point;
use crate::error::{GeomError, GeomResult};
use crate::point::Point;

/// An axis-free circle: center and radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// A general conic `a x^2 + b xy + c y^2 + d x + e y + f = 0`, used as the
/// intermediate result of ellipse fitting before it is reduced to center
/// and axes form.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub rotation: f64,
}

/// Algebraic (Kasa) circle fit: minimizes `sum (x_i^2 + y_i^2 + D x_i + E
/// y_i + F)^2`, which is linear in `D, E, F` and closed-form via the normal
/// equations. Requires at least 3 non-collinear points.
pub fn fit_circle(points: &[Point]) -> GeomResult<Circle> {
    if points.len() < 3 {
        return Err(GeomError::NotRepresentable("circle fit needs at least 3 points"));
    }

    let n = points.len() as f64;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    let mut sxz = 0.0; // sum x * (x^2+y^2)
    let mut syz = 0.0;
    let mut sz = 0.0; // sum (x^2+y^2)

    for p in points {
        let z = p.x * p.x + p.y * p.y;
        sx += p.x;
        sy += p.y;
        sxx += p.x * p.x;
        syy += p.y * p.y;
        sxy += p.x * p.y;
        sxz += p.x * z;
        syz += p.y * z;
        sz += z;
    }

    // Normal equations for [D, E, F] from minimizing sum(x^2+y^2+Dx+Ey+F)^2:
    //   [sxx sxy sx] [D]   [-sxz]
    //   [sxy syy sy] [E] = [-syz]
    //   [sx  sy  n ] [F]   [-sz ]
    let m = [[sxx, sxy, sx], [sxy, syy, sy], [sx, sy, n]];
    let rhs = [-sxz, -syz, -sz];
    let [d, e, f] = solve_3x3(m, rhs)
        .ok_or(GeomError::NotRepresentable("circle fit: points are collinear or coincident"))?;

    let cx = -d / 2.0;
    let cy = -e / 2.0;
    let r2 = cx * cx + cy * cy - f;
    if r2 < 0.0 {
        return Err(GeomError::NotRepresentable("circle fit: degenerate solution"));
    }
    Ok(Circle { center: point(cx, cy), radius: r2.sqrt() })
}

/// Solve a 3x3 linear system via Cramer's rule; returns `None` for a
/// singular (or near-singular) matrix.
fn solve_3x3(m: [[f64; 3]; 3], rhs: [f64; 3]) -> Option<[f64; 3]> {
    let det3 = |a: [[f64; 3]; 3]| -> f64 {
        a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
            - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
            + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0])
    };
    let det = det3(m);
    if det.abs() < 1e-12 {
        return None;
    }
    let mut result = [0.0; 3];
    for col in 0..3 {
        let mut mc = m;
        for row in 0..3 {
            mc[row][col] = rhs[row];
        }
        result[col] = det3(mc) / det;
    }
    Some(result)
}

/// Algebraic ellipse fit via the general conic `a x^2 + b xy + c y^2 + d x +
/// e y + f = 0`, normalized `f = -1`, solved by least squares, then reduced
/// to center/axes/rotation form.
pub fn fit_ellipse(points: &[Point]) -> GeomResult<Ellipse> {
    if points.len() < 5 {
        return Err(GeomError::NotRepresentable("ellipse fit needs at least 5 points"));
    }

    // Normal equations for [a,b,c,d,e] minimizing sum(ax^2+bxy+cy^2+dx+ey-1)^2.
    let mut ata = [[0.0; 5]; 5];
    let mut atb = [0.0; 5];
    for p in points {
        let row = [p.x * p.x, p.x * p.y, p.y * p.y, p.x, p.y];
        for i in 0..5 {
            atb[i] += row[i] * 1.0;
            for j in 0..5 {
                ata[i][j] += row[i] * row[j];
            }
        }
    }
    let coeffs = solve_5x5(ata, atb)
        .ok_or(GeomError::NotRepresentable("ellipse fit: points are degenerate"))?;
    let [a, b, c, d, e] = coeffs;
    let f = -1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant >= 0.0 {
        return Err(GeomError::NotRepresentable("ellipse fit: conic is not an ellipse"));
    }

    let cx = (2.0 * c * d - b * e) / discriminant;
    let cy = (2.0 * a * e - b * d) / discriminant;

    let num = 2.0 * (a * e * e + c * d * d + f * b * b - b * d * e - 4.0 * a * c * f);
    let common = ((a - c).powi(2) + b * b).sqrt();
    let denom1 = discriminant * (common - (a + c));
    let denom2 = discriminant * (-common - (a + c));
    if denom1 <= 0.0 || denom2 <= 0.0 {
        return Err(GeomError::NotRepresentable("ellipse fit: degenerate axis lengths"));
    }
    let axis1 = (num / denom1).sqrt();
    let axis2 = (num / denom2).sqrt();
    let (rx, ry) = (axis1.max(axis2), axis1.min(axis2));

    let rotation = if b == 0.0 {
        if a < c { 0.0 } else { core::f64::consts::FRAC_PI_2 }
    } else {
        0.5 * b.atan2(a - c)
    };

    Ok(Ellipse { center: point(cx, cy), rx, ry, rotation })
}

fn solve_5x5(m: [[f64; 5]; 5], rhs: [f64; 5]) -> Option<[f64; 5]> {
    // Gaussian elimination with partial pivoting.
    let mut a = m;
    let mut b = rhs;
    for col in 0..5 {
        let mut pivot = col;
        for row in col + 1..5 {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..5 {
            let factor = a[row][col] / a[col][col];
            for k in col..5 {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = [0.0; 5];
    for row in (0..5).rev() {
        let mut s = b[row];
        for k in row + 1..5 {
            s -= a[row][k] * x[k];
        }
        x[row] = s / a[row][row];
    }
    Some(x)
}

/// Least-squares cubic Bezier fit through `points`, holding the endpoints
/// fixed and solving for the two interior control points (the standard
/// Graphics Gems I fitting approach, adapted to this kernel's `Point`
/// type).
pub fn fit_cubic_bezier(points: &[Point], tangent_start: crate::point::Vector, tangent_end: crate::point::Vector) -> GeomResult<crate::curve::CubicBezier> {
    if points.len() < 2 {
        return Err(GeomError::NotRepresentable("bezier fit needs at least 2 points"));
    }
    let first = points[0];
    let last = *points.last().unwrap();

    let params = chord_length_parameterize(points);

    let mut c = [[0.0; 2]; 2];
    let mut x = [0.0; 2];
    for (p, &u) in points.iter().zip(params.iter()) {
        let b0 = (1.0 - u).powi(3);
        let b1 = 3.0 * u * (1.0 - u).powi(2);
        let b2 = 3.0 * u * u * (1.0 - u);
        let b3 = u.powi(3);

        let a1 = tangent_start * b1;
        let a2 = tangent_end * b2;

        c[0][0] += a1.dot(&a1);
        c[0][1] += a1.dot(&a2);
        c[1][0] = c[0][1];
        c[1][1] += a2.dot(&a2);

        let shortfall = crate::point::Vector::new(
            p.x - (first.x * b0 + first.x * b1 + last.x * b2 + last.x * b3),
            p.y - (first.y * b0 + first.y * b1 + last.y * b2 + last.y * b3),
        );
        x[0] += a1.dot(&shortfall);
        x[1] += a2.dot(&shortfall);
    }

    let det_c0_c1 = c[0][0] * c[1][1] - c[1][0] * c[0][1];
    let (alpha_l, alpha_r) = if det_c0_c1.abs() > 1e-12 {
        let det_c0_x = c[0][0] * x[1] - c[1][0] * x[0];
        let det_x_c1 = x[0] * c[1][1] - x[1] * c[0][1];
        (det_x_c1 / det_c0_c1, det_c0_x / det_c0_c1)
    } else {
        let c0 = c[0][0] + c[0][1];
        let c1 = c[1][0] + c[1][1];
        let a = if c0.abs() > 1e-12 { x[0] / c0 } else { 0.0 };
        (a, a)
    };

    let seg_len = first.distance(&last);
    let eps = 1e-6 * seg_len.max(1.0);
    let (alpha_l, alpha_r) = if alpha_l < eps || alpha_r < eps {
        let dist = seg_len / 3.0;
        (dist, dist)
    } else {
        (alpha_l, alpha_r)
    };

    let c1 = first + tangent_start * alpha_l;
    let c2 = last + tangent_end * alpha_r;
    Ok(crate::curve::CubicBezier::new(first, c1, c2, last))
}

fn chord_length_parameterize(points: &[Point]) -> Vec<f64> {
    let mut u = vec![0.0; points.len()];
    for i in 1..points.len() {
        u[i] = u[i - 1] + points[i].distance(&points[i - 1]);
    }
    let total = *u.last().unwrap();
    if total > 0.0 {
        for v in u.iter_mut() {
            *v /= total;
        }
    }
    u
}

/// Coarse sampling followed by Newton refinement on the perpendicularity
/// condition `(C(t) - point) . C'(t) = 0`, restricted to `[from, to]`.
pub fn nearest_time_numeric(curve: &Curve, target: Point, from: f64, to: f64) -> f64 {
    let samples = 32;
    let mut best_t = from;
    let mut best_d2 = f64::INFINITY;
    for i in 0..=samples {
        let t = from + (to - from) * i as f64 / samples as f64;
        let d2 = curve.point_at(t).distance_sq(&target);
        if d2 < best_d2 {
            best_d2 = d2;
            best_t = t;
        }
    }

    let mut t = best_t;
    for _ in 0..16 {
        let pd = curve.point_and_derivatives(t, 2);
        let p = pd[0];
        let d1 = pd.get(1).copied().unwrap_or(Point::origin());
        let d2 = pd.get(2).copied().unwrap_or(Point::origin());
        let diff = p - target;
        let f = diff.x * d1.x + diff.y * d1.y;
        let fp = d1.x * d1.x + d1.y * d1.y + diff.x * d2.x + diff.y * d2.y;
        if fp.abs() < 1e-14 {
            break;
        }
        let next = t - f / fp;
        if !next.is_finite() {
            break;
        }
        let clamped = next.clamp(from, to);
        if (clamped - t).abs() < 1e-14 {
            t = clamped;
            break;
        }
        t = clamped;
    }
    t
}

/// Affine least-squares map: fits `m` such that `m.transform_point(src[i])`
/// is as close as possible to `dst[i]` (used by the unit-test harness and,
/// per `SPEC_FULL.md`, kept public as a general-purpose fitting helper).
pub fn fit_affine(src: &[Point], dst: &[Point]) -> GeomResult<Affine> {
    if src.len() != dst.len() || src.len() < 3 {
        return Err(GeomError::NotRepresentable("affine fit needs matching point sets of at least 3 points"));
    }
    // Solve the two independent 3-parameter linear regressions
    // x' = xx*x + yx*y + tx and y' = xy*x + yy*y + ty.
    let n = src.len() as f64;
    let (mut sx, mut sy, mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for p in src {
        sx += p.x;
        sy += p.y;
        sxx += p.x * p.x;
        syy += p.y * p.y;
        sxy += p.x * p.y;
    }
    let m = [[sxx, sxy, sx], [sxy, syy, sy], [sx, sy, n]];

    let mut rhs_x = [0.0; 3];
    let mut rhs_y = [0.0; 3];
    for (p, q) in src.iter().zip(dst.iter()) {
        rhs_x[0] += p.x * q.x;
        rhs_x[1] += p.y * q.x;
        rhs_x[2] += q.x;
        rhs_y[0] += p.x * q.y;
        rhs_y[1] += p.y * q.y;
        rhs_y[2] += q.y;
    }

    let [xx, yx, tx] = solve_3x3(m, rhs_x).ok_or(GeomError::NotRepresentable("affine fit: source points are degenerate"))?;
    let [xy, yy, ty] = solve_3x3(m, rhs_y).ok_or(GeomError::NotRepresentable("affine fit: source points are degenerate"))?;
    Ok(Affine::new(xx, xy, yx, yy, tx, ty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_fit_exact_on_circle_points() {
        let center = point(3.0, -1.0);
        let radius = 5.0;
        let pts: Vec<Point> = (0..8)
            .map(|i| {
                let a = i as f64 / 8.0 * core::f64::consts::TAU;
                point(center.x + radius * a.cos(), center.y + radius * a.sin())
            })
            .collect();
        let fit = fit_circle(&pts).unwrap();
        assert!(fit.center.near(&center, 1e-6));
        assert!((fit.radius - radius).abs() < 1e-6);
    }

    #[test]
    fn circle_fit_rejects_collinear_points() {
        let pts = vec![point(0.0, 0.0), point(1.0, 0.0), point(2.0, 0.0)];
        assert!(fit_circle(&pts).is_err());
    }

    #[test]
    fn affine_fit_recovers_known_transform() {
        let m = Affine::rotation(0.3).then(&Affine::translation(2.0, -1.0));
        let src = vec![point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0), point(1.0, 1.0)];
        let dst: Vec<Point> = src.iter().map(|p| m.transform_point(*p)).collect();
        let fitted = fit_affine(&src, &dst).unwrap();
        for p in &src {
            assert!(fitted.transform_point(*p).near(&m.transform_point(*p), 1e-6));
        }
    }
}
