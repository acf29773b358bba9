//! Ear-clipping triangulation of simple planar loops.

use crate::geometry::Point2d;

/// Twice the signed area; positive for counter-clockwise loops.
pub fn signed_area2(points: &[Point2d]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

fn cross(o: Point2d, a: Point2d, b: Point2d) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn same_point(a: Point2d, b: Point2d, eps: f64) -> bool {
    (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps
}

/// Inside or on the boundary of triangle `abc`; coincident corners do not count.
fn blocks_ear(p: Point2d, a: Point2d, b: Point2d, c: Point2d, eps: f64) -> bool {
    if same_point(p, a, eps) || same_point(p, b, eps) || same_point(p, c, eps) {
        return false;
    }
    cross(a, b, p) >= -eps && cross(b, c, p) >= -eps && cross(c, a, p) >= -eps
}

/// Triangulate a counter-clockwise simple polygon.
///
/// Returned triangles index into `points` and keep the loop's winding.
/// Collinear runs yield zero-area triangles so every boundary edge of the
/// loop still appears in exactly one triangle.
pub fn ear_clip(points: &[Point2d], eps: f64) -> Vec<[usize; 3]> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut triangles = Vec::with_capacity(points.len().saturating_sub(2));

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&k| {
            let (ia, ib, ic) = (remaining[(k + n - 1) % n], remaining[k], remaining[(k + 1) % n]);
            let (a, b, c) = (points[ia], points[ib], points[ic]);
            if cross(a, b, c) < -eps {
                return false;
            }
            !remaining
                .iter()
                .filter(|&&j| j != ia && j != ib && j != ic)
                .any(|&j| blocks_ear(points[j], a, b, c, eps))
        });

        match ear {
            Some(k) => {
                triangles.push([remaining[(k + n - 1) % n], remaining[k], remaining[(k + 1) % n]]);
                remaining.remove(k);
            }
            None => {
                // Self-intersecting input; fall back to a fan over what is left.
                tracing::debug!(left = n, "no ear found, fanning remainder");
                for k in 1..n - 1 {
                    triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
                }
                return triangles;
            }
        }
    }

    if remaining.len() == 3 {
        triangles.push([remaining[0], remaining[1], remaining[2]]);
    }
    triangles
}
