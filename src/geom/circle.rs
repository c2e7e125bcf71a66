use crate::MapError;
use crate::geom::Point;
use crate::geom::Segment;

/// A closed disc used by range searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// Fails for a negative or NaN `radius`. A radius of `0` is allowed and matches geometry
    /// passing exactly through `center`.
    pub fn new(center: Point, radius: f64) -> Result<Self, MapError> {
        if radius.is_nan() || radius < 0.0 {
            return Err(MapError::InvalidRadius { radius });
        }

        Ok(Circle { center, radius })
    }

    pub fn contains(&self, p: Point) -> bool {
        self.center.distance(&p) <= self.radius
    }

    pub fn intersects_segment(&self, s: &Segment) -> bool {
        s.distance_to(self.center) <= self.radius
    }
}
