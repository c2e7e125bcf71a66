use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;
use tracing::warn;

use crate::MapError;
use crate::MapResult;
use crate::config::MapConfig;
use crate::geom::Aabb;
use crate::geom::Circle;
use crate::geom::Point;
use crate::model::City;
use crate::model::Geometry;
use crate::model::Portal;
use crate::model::Road;
use crate::quadtree::nearest::Target;

pub use crate::quadtree::nearest::Cities;
pub use crate::quadtree::nearest::Portals;
pub use crate::quadtree::nearest::Roads;
pub use crate::quadtree::node::Black;
pub use crate::quadtree::node::Gray;
pub use crate::quadtree::node::Node;
pub use crate::quadtree::node::NodeKind;
pub use crate::quadtree::node::Quadrant;
pub use crate::quadtree::range::RangeFilter;
pub use crate::quadtree::validity::Order;
pub use crate::quadtree::validity::Violation;

mod nearest;
mod node;
mod range;
mod validity;

/// A PM quadtree over the world `[0, width] x [0, height]`, holding one level of a map.
///
/// Cities are only on the map through the roads ending at them. Portals are mapped on their own.
#[derive(Debug, Clone)]
pub struct PmQuadtree {
    root: Node,
    world: Aabb,
    order: Order,

    roads: BTreeSet<Road>,
    portals: BTreeMap<String, Rc<Portal>>,

    /// Number of mapped roads ending at each city. A city has an entry iff it is on the map.
    city_roads: HashMap<String, usize>,
}

impl PmQuadtree {
    pub fn new(config: &MapConfig) -> MapResult<Self> {
        let order = config.validate()?;
        let world = Aabb::new(Point::new(0, 0), config.width, config.height);

        Ok(Self::from_parts(world, order))
    }

    pub fn with_size(width: i32, height: i32) -> MapResult<Self> {
        Self::new(&MapConfig::new(width, height))
    }

    /// Build from settings that were already validated.
    pub(crate) fn from_parts(world: Aabb, order: Order) -> Self {
        PmQuadtree {
            root: Node::White,
            world,
            order,
            roads: BTreeSet::new(),
            portals: BTreeMap::new(),
            city_roads: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn world(&self) -> Aabb {
        self.world
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Map `road` along with its endpoints. On failure the tree is left as it was.
    pub fn add_road(&mut self, road: Road) -> MapResult<()> {
        let (start, end) = (road.start(), road.end());

        if start.name() == end.name() {
            return Err(MapError::StartEqualsEnd {
                start: start.name().to_string(),
                end: end.name().to_string(),
            });
        }

        if self.roads.contains(&road) {
            return Err(MapError::RoadAlreadyMapped {
                start: start.name().to_string(),
                end: end.name().to_string(),
            });
        }

        if !self.world.contains(start.point()) || !self.world.contains(end.point()) {
            return Err(MapError::RoadOutOfBounds {
                start: start.name().to_string(),
                end: end.name().to_string(),
            });
        }

        let g = Geometry::Road(road.clone());
        self.root = match self.root.add(&g, self.world, self.order) {
            Ok(root) => root,
            Err(violation) => {
                warn!(%road, ?violation, "road rejected");

                let (start, end) = (start.name().to_string(), end.name().to_string());
                return Err(match violation {
                    Violation::IntersectingRoads => MapError::RoadIntersectsAnotherRoad { start, end },
                    Violation::Unresolvable => MapError::RoadViolatesRules { start, end },
                });
            }
        };

        for city in [start, end] {
            *self.city_roads.entry(city.name().to_string()).or_default() += 1;
        }

        debug!(%road, "road mapped");
        self.roads.insert(road);

        Ok(())
    }

    /// Unmap `road`, together with every endpoint no other road ends at. Returns the road as it
    /// was mapped.
    pub fn remove_road(&mut self, road: &Road) -> MapResult<Road> {
        let Some(mapped) = self.roads.take(road) else {
            return Err(MapError::RoadNotMapped {
                start: road.start().name().to_string(),
                end: road.end().name().to_string(),
            });
        };

        self.root = self
            .root
            .remove(&Geometry::Road(mapped.clone()), self.world, self.order);

        for city in [mapped.start(), mapped.end()] {
            if let Some(count) = self.city_roads.get_mut(city.name()) {
                *count -= 1;
                if *count == 0 {
                    self.city_roads.remove(city.name());
                }
            }
        }

        debug!(road = %mapped, "road unmapped");

        Ok(mapped)
    }

    pub fn add_portal(&mut self, portal: Portal) -> MapResult<Rc<Portal>> {
        if self.portals.contains_key(portal.name()) {
            return Err(MapError::PortalAlreadyMapped {
                name: portal.name().to_string(),
            });
        }

        if self.portals.values().any(|p| p.same_location(&portal)) {
            return Err(MapError::DuplicatePortalLocation {
                name: portal.name().to_string(),
            });
        }

        if !self.world.contains(portal.point()) {
            return Err(MapError::PortalOutOfBounds {
                name: portal.name().to_string(),
            });
        }

        let portal = Rc::new(portal);
        self.root = match self
            .root
            .add(&Geometry::Portal(portal.clone()), self.world, self.order)
        {
            Ok(root) => root,
            Err(violation) => {
                warn!(%portal, ?violation, "portal rejected");

                return Err(MapError::PortalViolatesRules {
                    name: portal.name().to_string(),
                });
            }
        };

        debug!(%portal, location = ?portal.point(), "portal mapped");
        self.portals
            .insert(portal.name().to_string(), portal.clone());

        Ok(portal)
    }

    /// Unmap the portal called `name`, if there is one.
    pub fn remove_portal(&mut self, name: &str) -> Option<Rc<Portal>> {
        let portal = self.portals.remove(name)?;

        self.root = self
            .root
            .remove(&Geometry::Portal(portal.clone()), self.world, self.order);

        debug!(%portal, "portal unmapped");

        Some(portal)
    }

    /// Every mapped object touching `circle` and accepted by `filter`.
    pub fn range(&self, circle: &Circle, filter: RangeFilter) -> BTreeSet<Geometry> {
        let mut out = BTreeSet::new();

        if self.world.intersects_circle(circle) {
            range::search(&self.root, self.world, circle, filter, &mut out);
        }

        out
    }

    pub fn nearest_city(&self, query: Point) -> MapResult<Rc<City>> {
        self.nearest::<Cities>(query, self.num_cities())
    }

    pub fn nearest_portal(&self, query: Point) -> MapResult<Rc<Portal>> {
        self.nearest::<Portals>(query, self.num_portals())
    }

    pub fn nearest_road(&self, query: Point) -> MapResult<Road> {
        self.nearest::<Roads>(query, self.num_roads())
    }

    fn nearest<T: Target>(&self, query: Point, count: usize) -> MapResult<T::Item> {
        let not_found = MapError::NotFound { kind: T::KIND };

        if count == 0 {
            return Err(not_found);
        }

        nearest::nearest::<T>(&self.root, query).ok_or(not_found)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_white()
    }

    pub fn contains_city(&self, name: &str) -> bool {
        self.city_roads.contains_key(name)
    }

    /// Checks for `road` in either direction.
    pub fn contains_road(&self, road: &Road) -> bool {
        self.roads.contains(road)
    }

    pub fn contains_portal(&self, name: &str) -> bool {
        self.portals.contains_key(name)
    }

    /// Checks whether a portal is mapped at `location`.
    pub fn contains_portal_location(&self, location: Point) -> bool {
        self.portals.values().any(|p| p.point() == location)
    }

    pub fn num_cities(&self) -> usize {
        self.city_roads.len()
    }

    pub fn num_roads(&self) -> usize {
        self.roads.len()
    }

    pub fn num_portals(&self) -> usize {
        self.portals.len()
    }

    /// Mapped roads, by their undirected key.
    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.iter()
    }

    /// Mapped portals, by name.
    pub fn portals(&self) -> impl Iterator<Item = &Rc<Portal>> {
        self.portals.values()
    }

    pub fn portal(&self, name: &str) -> Option<&Rc<Portal>> {
        self.portals.get(name)
    }

    pub fn clear(&mut self) {
        self.root = Node::White;
        self.roads.clear();
        self.portals.clear();
        self.city_roads.clear();
    }

    /// Checks every structural invariant of the tree.
    pub fn is_well_formed(&self) -> bool {
        self.root.is_well_formed(self.world, self.order)
    }
}
