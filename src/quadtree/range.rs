use std::collections::BTreeSet;

use crate::geom::Aabb;
use crate::geom::Circle;
use crate::model::Geometry;
use crate::quadtree::node::Node;

/// Kinds of geometry a range search reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeFilter {
    Cities,
    Portals,
    Roads,
    CitiesAndRoads,
    #[default]
    All,
}

impl RangeFilter {
    pub fn accepts(self, g: &Geometry) -> bool {
        match (self, g) {
            (RangeFilter::All, _) => true,
            (RangeFilter::Cities | RangeFilter::CitiesAndRoads, Geometry::City(_)) => true,
            (RangeFilter::Roads | RangeFilter::CitiesAndRoads, Geometry::Road(_)) => true,
            (RangeFilter::Portals, Geometry::Portal(_)) => true,
            _ => false,
        }
    }
}

/// Collect into `out` every geometry below `node` accepted by `filter` and touching `circle`.
pub(crate) fn search(
    node: &Node,
    rect: Aabb,
    circle: &Circle,
    filter: RangeFilter,
    out: &mut BTreeSet<Geometry>,
) {
    match node {
        Node::White => {}
        Node::Black(black) => {
            for g in black.geometry() {
                // a road reaching several leaves only needs testing once
                if filter.accepts(g) && !out.contains(g) && g.intersects_circle(circle) {
                    out.insert(g.clone());
                }
            }
        }
        Node::Gray(gray) => {
            debug_assert_eq!(gray.rect(), rect);

            for (child, region) in gray.children().iter().zip(gray.regions()) {
                if region.intersects_circle(circle) {
                    search(child, *region, circle, filter, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::RangeFilter;
    use crate::model::City;
    use crate::model::Geometry;
    use crate::model::Portal;
    use crate::model::Road;

    #[test]
    fn filter_kinds() {
        let a = Rc::new(City::new("a", 0, 0, 0));
        let b = Rc::new(City::new("b", 1, 1, 0));

        let city: Geometry = a.clone().into();
        let portal: Geometry = Rc::new(Portal::new("p", 2, 2, 0)).into();
        let road: Geometry = Road::new(a, b).into();

        assert!(RangeFilter::Cities.accepts(&city));
        assert!(!RangeFilter::Cities.accepts(&road));
        assert!(RangeFilter::CitiesAndRoads.accepts(&road));
        assert!(!RangeFilter::CitiesAndRoads.accepts(&portal));
        assert!(RangeFilter::Portals.accepts(&portal));
        assert!(!RangeFilter::Roads.accepts(&city));

        for g in [&city, &portal, &road] {
            assert!(RangeFilter::All.accepts(g));
        }
    }
}
