use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use crate::geom::Point;
use crate::model::Road;

/// A teleport portal connecting levels. Compared by name, like [`City`](crate::model::City).
///
/// A portal remembers, per level, the road it was snapped to when paths were stitched across
/// levels. The slot is written through a shared reference since a portal is shared by every leaf
/// that holds it.
#[derive(Debug, Clone)]
pub struct Portal {
    name: String,
    x: i32,
    y: i32,
    z: i32,
    nearest_road: RefCell<BTreeMap<i32, Road>>,
}

impl Portal {
    pub fn new(name: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Portal {
            name: name.into(),
            x,
            y,
            z,
            nearest_road: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    /// Checks whether both portals sit at the same `(x, y, z)`, regardless of their names.
    pub fn same_location(&self, other: &Portal) -> bool {
        (self.x, self.y, self.z) == (other.x, other.y, other.z)
    }

    pub fn set_nearest_road(&self, level: i32, road: Road) {
        self.nearest_road.borrow_mut().insert(level, road);
    }

    pub fn nearest_road(&self, level: i32) -> Option<Road> {
        self.nearest_road.borrow().get(&level).cloned()
    }
}

impl PartialEq for Portal {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Portal {}

impl PartialOrd for Portal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Portal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for Portal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
