use crate::MapError;
use crate::geom::Aabb;
use crate::model::Geometry;
use crate::model::Road;
use crate::quadtree::node::Black;

/// Order of a PM quadtree.
///
/// Only order 3 is implemented. Order 1 is known to exist but its rule is not, so it is rejected
/// like any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Three,
}

impl Order {
    /// Number of roads a leaf may hold when it holds no point.
    pub fn max_roads(self) -> usize {
        match self {
            Order::Three => 3,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Order::Three => 3,
        }
    }
}

impl TryFrom<u8> for Order {
    type Error = MapError;

    fn try_from(order: u8) -> Result<Self, Self::Error> {
        match order {
            3 => Ok(Order::Three),
            other => Err(MapError::UnsupportedOrder(other)),
        }
    }
}

/// Why a leaf could not be made valid, even at the smallest region size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Two roads cross away from a common endpoint.
    IntersectingRoads,

    /// Anything else: two point objects too close together, a point lying on a road it does not
    /// end, too many roads squeezed through one unit cell.
    Unresolvable,
}

/// Checks a leaf against the PM rules of `order`, for the leaf covering `rect`.
///
/// A valid leaf holds
/// * at most one point,
/// * if it holds a point, only roads ending at that point,
/// * if it holds no point, at most `order.max_roads()` roads,
/// * no two roads meeting inside `rect` other than at a shared endpoint.
pub fn is_valid(order: Order, black: &Black, rect: &Aabb) -> bool {
    if black.num_points() > 1 {
        return false;
    }

    match black.points().next() {
        Some(point) => {
            if !black.roads().all(|road| ends_at(road, point)) {
                return false;
            }
        }
        None => {
            if black.num_roads() > order.max_roads() {
                return false;
            }
        }
    }

    !has_crossing(black, rect)
}

/// Name the reason a leaf at minimum size is invalid.
pub fn classify(black: &Black, rect: &Aabb) -> Violation {
    if has_crossing(black, rect) {
        Violation::IntersectingRoads
    } else {
        Violation::Unresolvable
    }
}

fn ends_at(road: &Road, point: &Geometry) -> bool {
    match point {
        Geometry::City(city) => road.has_endpoint(city),
        _ => false,
    }
}

fn has_crossing(black: &Black, rect: &Aabb) -> bool {
    let segments: Vec<_> = black.roads().map(Road::segment).collect();

    segments.iter().enumerate().any(|(i, a)| {
        segments[i + 1..]
            .iter()
            .any(|b| a.crosses_within(b, rect))
    })
}
