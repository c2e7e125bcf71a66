use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use crate::geom::Point;

/// A named city. Two cities are the same city when they have the same name.
#[derive(Debug, Clone)]
pub struct City {
    name: String,
    x: i32,
    y: i32,
    z: i32,
}

impl City {
    pub fn new(name: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        City {
            name: name.into(),
            x,
            y,
            z,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Elevation level of the city.
    pub fn z(&self) -> i32 {
        self.z
    }
}

impl PartialEq for City {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for City {}

impl PartialOrd for City {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for City {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for City {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
