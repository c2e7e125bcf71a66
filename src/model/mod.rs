//! Map objects stored in the quadtree.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::geom::Aabb;
use crate::geom::Circle;
use crate::geom::Point;

pub use crate::model::city::City;
pub use crate::model::portal::Portal;
pub use crate::model::road::Road;

mod city;
mod portal;
mod road;

/// Anything a quadtree leaf can hold.
///
/// The total order puts every city before every portal, and every portal before every road, so
/// the point objects of a leaf always come first.
#[derive(Debug, Clone)]
pub enum Geometry {
    City(Rc<City>),
    Portal(Rc<Portal>),
    Road(Road),
}

impl Geometry {
    fn rank(&self) -> u8 {
        match self {
            Geometry::City(_) => 0,
            Geometry::Portal(_) => 1,
            Geometry::Road(_) => 2,
        }
    }

    /// Cities and portals are points, roads are not.
    pub fn is_point(&self) -> bool {
        !matches!(self, Geometry::Road(_))
    }

    pub fn as_city(&self) -> Option<&Rc<City>> {
        match self {
            Geometry::City(city) => Some(city),
            _ => None,
        }
    }

    pub fn as_portal(&self) -> Option<&Rc<Portal>> {
        match self {
            Geometry::Portal(portal) => Some(portal),
            _ => None,
        }
    }

    pub fn as_road(&self) -> Option<&Road> {
        match self {
            Geometry::Road(road) => Some(road),
            _ => None,
        }
    }

    /// Location of a point object.
    pub fn point(&self) -> Option<Point> {
        match self {
            Geometry::City(city) => Some(city.point()),
            Geometry::Portal(portal) => Some(portal.point()),
            Geometry::Road(_) => None,
        }
    }

    /// Inclusive test against a quadtree region.
    pub fn intersects(&self, rect: &Aabb) -> bool {
        match self {
            Geometry::City(city) => rect.contains(city.point()),
            Geometry::Portal(portal) => rect.contains(portal.point()),
            Geometry::Road(road) => rect.intersects_segment(&road.segment()),
        }
    }

    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        match self {
            Geometry::City(city) => circle.contains(city.point()),
            Geometry::Portal(portal) => circle.contains(portal.point()),
            Geometry::Road(road) => circle.intersects_segment(&road.segment()),
        }
    }

    pub fn distance_to(&self, p: Point) -> f64 {
        match self {
            Geometry::City(city) => city.point().distance(&p),
            Geometry::Portal(portal) => portal.point().distance(&p),
            Geometry::Road(road) => road.segment().distance_to(p),
        }
    }
}

impl PartialEq for Geometry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Geometry {}

impl PartialOrd for Geometry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Geometry {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Geometry::City(a), Geometry::City(b)) => a.cmp(b),
            (Geometry::Portal(a), Geometry::Portal(b)) => a.cmp(b),
            (Geometry::Road(a), Geometry::Road(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::City(city) => fmt::Display::fmt(city, f),
            Geometry::Portal(portal) => fmt::Display::fmt(portal, f),
            Geometry::Road(road) => fmt::Display::fmt(road, f),
        }
    }
}

impl From<Rc<City>> for Geometry {
    fn from(city: Rc<City>) -> Self {
        Geometry::City(city)
    }
}

impl From<Rc<Portal>> for Geometry {
    fn from(portal: Rc<Portal>) -> Self {
        Geometry::Portal(portal)
    }
}

impl From<Road> for Geometry {
    fn from(road: Road) -> Self {
        Geometry::Road(road)
    }
}
