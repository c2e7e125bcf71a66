use crate::geom::Aabb;
use crate::geom::Point;

/// A closed line segment between two grid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

/// Twice the signed area of the triangle `o`, `p`, `q`. Positive when `q` lies to the left of the
/// directed line `o -> p`.
fn cross(o: Point, p: Point, q: Point) -> i128 {
    let (ox, oy) = (i128::from(o.x), i128::from(o.y));

    (i128::from(p.x) - ox) * (i128::from(q.y) - oy) - (i128::from(p.y) - oy) * (i128::from(q.x) - ox)
}

/// Checks that `q` lies in the bounding box of `p` and `r`. Only meaningful when all three points
/// are colinear.
fn within_box(p: Point, q: Point, r: Point) -> bool {
    p.x.min(r.x) <= q.x && q.x <= p.x.max(r.x) && p.y.min(r.y) <= q.y && q.y <= p.y.max(r.y)
}

impl Segment {
    pub const fn new(a: Point, b: Point) -> Self {
        Segment { a, b }
    }

    /// Checks whether `p` lies on the segment, endpoints included.
    pub fn contains(&self, p: Point) -> bool {
        cross(self.a, self.b, p) == 0 && within_box(self.a, p, self.b)
    }

    /// Checks whether the two closed segments share at least one point.
    pub fn intersects(&self, other: &Segment) -> bool {
        let d1 = cross(other.a, other.b, self.a).signum();
        let d2 = cross(other.a, other.b, self.b).signum();
        let d3 = cross(self.a, self.b, other.a).signum();
        let d4 = cross(self.a, self.b, other.b).signum();

        if d1 * d2 < 0 && d3 * d4 < 0 {
            return true;
        }

        (d1 == 0 && within_box(other.a, self.a, other.b))
            || (d2 == 0 && within_box(other.a, self.b, other.b))
            || (d3 == 0 && within_box(self.a, other.a, self.b))
            || (d4 == 0 && within_box(self.a, other.b, self.b))
    }

    /// Shortest distance from `p` to any point of the segment.
    pub fn distance_to(&self, p: Point) -> f64 {
        let (ax, ay) = (f64::from(self.a.x), f64::from(self.a.y));
        let (dx, dy) = (f64::from(self.b.x) - ax, f64::from(self.b.y) - ay);
        let (px, py) = (f64::from(p.x), f64::from(p.y));

        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.a.distance(&p);
        }

        let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);

        (px - (ax + t * dx)).hypot(py - (ay + t * dy))
    }

    /// Checks whether the two segments meet somewhere inside `rect` (boundary included) at a
    /// point that is not an endpoint shared by both of them. Colinear segments overlapping over
    /// more than a single point always meet this way.
    pub fn crosses_within(&self, other: &Segment, rect: &Aabb) -> bool {
        if !self.intersects(other) {
            return false;
        }

        let shared = |p: Point| (p == self.a || p == self.b) && (p == other.a || p == other.b);

        let (d1x, d1y) = (
            i128::from(self.b.x) - i128::from(self.a.x),
            i128::from(self.b.y) - i128::from(self.a.y),
        );
        let (d2x, d2y) = (
            i128::from(other.b.x) - i128::from(other.a.x),
            i128::from(other.b.y) - i128::from(other.a.y),
        );

        let mut denom = d1x * d2y - d1y * d2x;

        if denom != 0 {
            // Two non-parallel segments share exactly one point. If they share an endpoint, that
            // endpoint is the point.
            if [self.a, self.b].into_iter().any(shared) {
                return false;
            }

            let (ex, ey) = (
                i128::from(other.a.x) - i128::from(self.a.x),
                i128::from(other.a.y) - i128::from(self.a.y),
            );
            let mut num = ex * d2y - ey * d2x;

            if denom < 0 {
                denom = -denom;
                num = -num;
            }

            // intersection is a + d1 * num / denom, compared against the box scaled by denom
            let x = i128::from(self.a.x) * denom + d1x * num;
            let y = i128::from(self.a.y) * denom + d1y * num;

            return i128::from(rect.min.x) * denom <= x
                && x <= i128::from(rect.max.x) * denom
                && i128::from(rect.min.y) * denom <= y
                && y <= i128::from(rect.max.y) * denom;
        }

        // Parallel and intersecting, hence colinear. Points on a common line are ordered
        // lexicographically along it.
        let lo = self.a.min(self.b).max(other.a.min(other.b));
        let hi = self.a.max(self.b).min(other.a.max(other.b));

        if lo == hi {
            return !shared(lo) && rect.contains(lo);
        }

        rect.intersects_segment(&Segment::new(lo, hi))
    }
}
