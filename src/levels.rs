//! A map spanning several elevation levels, one PM quadtree per level.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

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
use crate::quadtree::Order;
use crate::quadtree::PmQuadtree;
use crate::quadtree::RangeFilter;

/// Quadtrees keyed by elevation, all covering the same world. A level exists once something was
/// mapped on it.
///
/// Levels are only handed out by shared reference, so every portal goes through
/// [`Levels::add_portal`] and the name registry stays in step with the trees.
#[derive(Debug, Clone)]
pub struct Levels {
    world: Aabb,
    order: Order,
    trees: BTreeMap<i32, PmQuadtree>,

    /// Level of every mapped portal, by name.
    portal_levels: HashMap<String, i32>,
}

impl Levels {
    pub fn new(config: &MapConfig) -> MapResult<Self> {
        let order = config.validate()?;

        Ok(Levels {
            world: Aabb::new(Point::new(0, 0), config.width, config.height),
            order,
            trees: BTreeMap::new(),
            portal_levels: HashMap::new(),
        })
    }

    pub fn level(&self, z: i32) -> Option<&PmQuadtree> {
        self.trees.get(&z)
    }

    /// Levels in ascending order.
    pub fn levels(&self) -> impl Iterator<Item = (i32, &PmQuadtree)> {
        self.trees.iter().map(|(z, tree)| (*z, tree))
    }

    fn level_or_create(&mut self, z: i32) -> &mut PmQuadtree {
        let (world, order) = (self.world, self.order);

        self.trees.entry(z).or_insert_with(|| {
            debug!(z, "level created");
            PmQuadtree::from_parts(world, order)
        })
    }

    /// Map `road` on the level of its endpoints.
    pub fn add_road(&mut self, road: Road) -> MapResult<()> {
        let z = road.start().z();

        if road.end().z() != z {
            return Err(MapError::RoadNotOnOneLevel {
                start: road.start().name().to_string(),
                end: road.end().name().to_string(),
            });
        }

        self.level_or_create(z).add_road(road)
    }

    pub fn remove_road(&mut self, road: &Road) -> MapResult<Road> {
        match self.trees.get_mut(&road.start().z()) {
            Some(tree) => tree.remove_road(road),
            None => Err(MapError::RoadNotMapped {
                start: road.start().name().to_string(),
                end: road.end().name().to_string(),
            }),
        }
    }

    /// Map `portal` on its own level. Portal names are unique across all levels.
    pub fn add_portal(&mut self, portal: Portal) -> MapResult<Rc<Portal>> {
        if self.portal_levels.contains_key(portal.name()) {
            return Err(MapError::PortalAlreadyMapped {
                name: portal.name().to_string(),
            });
        }

        let z = portal.z();
        let portal = self.level_or_create(z).add_portal(portal)?;
        self.portal_levels.insert(portal.name().to_string(), z);

        Ok(portal)
    }

    pub fn remove_portal(&mut self, name: &str) -> Option<Rc<Portal>> {
        let z = self.portal_levels.remove(name)?;

        self.trees.get_mut(&z)?.remove_portal(name)
    }

    pub fn portal(&self, name: &str) -> Option<&Rc<Portal>> {
        let z = self.portal_levels.get(name)?;

        self.trees.get(z)?.portal(name)
    }

    /// Find the road on level `z` closest to the portal called `name` and remember it in the
    /// portal's nearest-road slot for that level.
    pub fn snap_portal(&self, name: &str, z: i32) -> MapResult<Road> {
        let portal = self
            .portal(name)
            .ok_or(MapError::NotFound { kind: "portal" })?;
        let road = self.nearest_road(z, portal.point())?;

        debug!(%portal, z, %road, "portal snapped");
        portal.set_nearest_road(z, road.clone());

        Ok(road)
    }

    pub fn nearest_city(&self, z: i32, query: Point) -> MapResult<Rc<City>> {
        self.level(z)
            .ok_or(MapError::NotFound { kind: "city" })?
            .nearest_city(query)
    }

    pub fn nearest_portal(&self, z: i32, query: Point) -> MapResult<Rc<Portal>> {
        self.level(z)
            .ok_or(MapError::NotFound { kind: "portal" })?
            .nearest_portal(query)
    }

    pub fn nearest_road(&self, z: i32, query: Point) -> MapResult<Road> {
        self.level(z)
            .ok_or(MapError::NotFound { kind: "road" })?
            .nearest_road(query)
    }

    pub fn range(&self, z: i32, circle: &Circle, filter: RangeFilter) -> BTreeSet<Geometry> {
        self.level(z)
            .map(|tree| tree.range(circle, filter))
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.trees.clear();
        self.portal_levels.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::Levels;
    use crate::MapError;
    use crate::config::MapConfig;
    use crate::geom::Point;
    use crate::model::City;
    use crate::model::Portal;
    use crate::model::Road;

    fn levels() -> Levels {
        Levels::new(&MapConfig::new(32, 32)).unwrap()
    }

    fn city(name: &str, x: i32, y: i32, z: i32) -> Rc<City> {
        Rc::new(City::new(name, x, y, z))
    }

    #[test]
    fn road_across_levels() {
        let mut map = levels();

        let err = map
            .add_road(Road::new(city("a", 1, 1, 0), city("b", 9, 9, 1)))
            .unwrap_err();

        assert!(matches!(err, MapError::RoadNotOnOneLevel { .. }));
    }

    #[test]
    fn levels_are_independent() {
        let mut map = levels();

        map.add_road(Road::new(city("a", 1, 1, 0), city("b", 30, 30, 0)))
            .unwrap();
        // crosses a-b, but on another level
        map.add_road(Road::new(city("c", 1, 30, 1), city("d", 30, 1, 1)))
            .unwrap();

        assert_eq!(map.levels().count(), 2);
        assert_eq!(map.nearest_city(1, Point::new(0, 32)).unwrap().name(), "c");
        assert!(map.nearest_city(2, Point::new(0, 0)).is_err());
    }

    #[test]
    fn portal_names_are_global() {
        let mut map = levels();

        map.add_portal(Portal::new("p", 4, 4, 0)).unwrap();
        let err = map.add_portal(Portal::new("p", 4, 4, 3)).unwrap_err();

        assert!(matches!(err, MapError::PortalAlreadyMapped { .. }));
        assert!(map.remove_portal("p").is_some());
        assert!(map.level(0).unwrap().is_empty());
    }

    #[test]
    fn portal_registry_follows_the_levels() {
        let mut map = levels();

        map.add_portal(Portal::new("p", 4, 4, 0)).unwrap();
        map.add_portal(Portal::new("q", 8, 8, 2)).unwrap();

        let on_level: Vec<_> = map
            .levels()
            .flat_map(|(z, tree)| tree.portals().map(move |p| (z, p.name().to_string())))
            .collect();
        assert_eq!(on_level, [(0, "p".to_string()), (2, "q".to_string())]);

        for name in ["p", "q"] {
            let portal = map.portal(name).unwrap();
            assert_eq!(map.level(portal.z()).unwrap().portal(name), Some(portal));
        }

        assert!(map.remove_portal("q").is_some());
        assert!(map.portal("q").is_none());
        assert!(!map.level(2).unwrap().contains_portal("q"));
    }

    #[test]
    fn snap_portal_fills_the_slot() {
        let mut map = levels();

        map.add_road(Road::new(city("a", 2, 20, 1), city("b", 30, 20, 1)))
            .unwrap();
        map.add_portal(Portal::new("p", 10, 4, 0)).unwrap();

        let road = map.snap_portal("p", 1).unwrap();
        let portal = map.portal("p").unwrap();

        assert_eq!(portal.nearest_road(1), Some(road));
        assert_eq!(portal.nearest_road(0), None);
        assert!(map.snap_portal("p", 0).is_err());
    }
}
