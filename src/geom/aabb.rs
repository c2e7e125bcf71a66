use core::fmt::Debug;

use crate::geom::Circle;
use crate::geom::Point;
use crate::geom::Segment;

/// A closed, axis-aligned rectangle on the integer grid. The `y` axis grows upwards, so `min` is
/// the bottom-left corner and `max` the top-right one.
///
/// Every containment and intersection test here is inclusive: geometry touching an edge belongs to
/// the rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}

impl Aabb {
    /// Create an AABB from its bottom-left corner and its size.
    pub const fn new(origin: Point, width: i32, height: i32) -> Self {
        Aabb {
            min: origin,
            max: Point {
                x: origin.x + width,
                y: origin.y + height,
            },
        }
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// The split point used by [`Aabb::split`]. West and south halves are `width >> 1` and
    /// `height >> 1` wide.
    pub fn center(&self) -> Point {
        Point {
            x: self.min.x + (self.width() >> 1),
            y: self.min.y + (self.height() >> 1),
        }
    }

    /// Halving must leave every quadrant at least one unit wide and tall.
    pub fn can_split(&self) -> bool {
        self.width() >= 2 && self.height() >= 2
    }

    /// Splits the bounding box into four quadrants, returned as `[nw, ne, sw, se]`.
    ///
    /// For odd sizes the east and north quadrants take the remainder, so the four quadrants always
    /// cover the whole box.
    pub fn split(&self) -> [Aabb; 4] {
        let center = self.center();

        let nw = Aabb {
            min: Point {
                x: self.min.x,
                y: center.y,
            },
            max: Point {
                x: center.x,
                y: self.max.y,
            },
        };

        let ne = Aabb {
            min: center,
            max: self.max,
        };

        let sw = Aabb {
            min: self.min,
            max: center,
        };

        let se = Aabb {
            min: Point {
                x: center.x,
                y: self.min.y,
            },
            max: Point {
                x: self.max.x,
                y: center.y,
            },
        };

        [nw, ne, sw, se]
    }

    pub fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// The four edges, counter-clockwise from the bottom one.
    fn edges(&self) -> [Segment; 4] {
        let bl = self.min;
        let br = Point::new(self.max.x, self.min.y);
        let tr = self.max;
        let tl = Point::new(self.min.x, self.max.y);

        [
            Segment::new(bl, br),
            Segment::new(br, tr),
            Segment::new(tr, tl),
            Segment::new(tl, bl),
        ]
    }

    pub fn intersects_segment(&self, s: &Segment) -> bool {
        if self.contains(s.a) || self.contains(s.b) {
            return true;
        }

        self.edges().iter().any(|edge| edge.intersects(s))
    }

    pub fn intersects_circle(&self, c: &Circle) -> bool {
        self.distance_to(c.center) <= c.radius
    }

    /// Shortest distance from `p` to the rectangle, `0` when `p` is inside.
    pub fn distance_to(&self, p: Point) -> f64 {
        let dx = (i64::from(self.min.x) - i64::from(p.x))
            .max(i64::from(p.x) - i64::from(self.max.x))
            .max(0);
        let dy = (i64::from(self.min.y) - i64::from(p.y))
            .max(i64::from(p.y) - i64::from(self.max.y))
            .max(0);

        (dx as f64).hypot(dy as f64)
    }
}

impl Debug for Aabb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}, {:?}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb;
    use crate::geom::Circle;
    use crate::geom::Point;
    use crate::geom::Segment;

    fn square(side: i32) -> Aabb {
        Aabb::new(Point::new(0, 0), side, side)
    }

    #[test]
    fn split_even() {
        let [nw, ne, sw, se] = square(20).split();

        assert_eq!(nw, Aabb::new(Point::new(0, 10), 10, 10));
        assert_eq!(ne, Aabb::new(Point::new(10, 10), 10, 10));
        assert_eq!(sw, Aabb::new(Point::new(0, 0), 10, 10));
        assert_eq!(se, Aabb::new(Point::new(10, 0), 10, 10));
    }

    #[test]
    fn split_odd_covers_parent() {
        let [nw, ne, sw, se] = Aabb::new(Point::new(0, 0), 5, 3).split();

        assert_eq!(sw, Aabb::new(Point::new(0, 0), 2, 1));
        assert_eq!(se, Aabb::new(Point::new(2, 0), 3, 1));
        assert_eq!(nw, Aabb::new(Point::new(0, 1), 2, 2));
        assert_eq!(ne, Aabb::new(Point::new(2, 1), 3, 2));
    }

    #[test]
    fn split_guard() {
        assert!(square(2).can_split());
        assert!(!square(1).can_split());
        assert!(!Aabb::new(Point::new(0, 0), 8, 1).can_split());
    }

    #[test]
    fn inclusive_edges() {
        let b = square(10);

        assert!(b.contains(Point::new(10, 10)));
        assert!(b.contains(Point::new(0, 5)));
        assert!(!b.contains(Point::new(11, 5)));

        // touches the corner only
        let s = Segment::new(Point::new(10, 10), Point::new(20, 30));
        assert!(b.intersects_segment(&s));
    }

    #[test]
    fn segment_passing_through() {
        let b = Aabb::new(Point::new(4, 4), 2, 2);

        let s = Segment::new(Point::new(0, 5), Point::new(10, 5));
        assert!(b.intersects_segment(&s));

        let s = Segment::new(Point::new(0, 0), Point::new(10, 2));
        assert!(!b.intersects_segment(&s));
    }

    #[test]
    fn circle_and_distance() {
        let b = Aabb::new(Point::new(10, 10), 10, 10);

        assert_eq!(b.distance_to(Point::new(15, 15)), 0.0);
        assert_eq!(b.distance_to(Point::new(7, 6)), 5.0);

        let c = Circle::new(Point::new(7, 6), 5.0).unwrap();
        assert!(b.intersects_circle(&c));

        let c = Circle::new(Point::new(7, 6), 4.5).unwrap();
        assert!(!b.intersects_circle(&c));
    }
}
