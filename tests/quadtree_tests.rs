use std::collections::BTreeSet;
use std::rc::Rc;

use pmquad::MapError;
use pmquad::PmQuadtree;
use pmquad::geom::Circle;
use pmquad::geom::Point;
use pmquad::model::City;
use pmquad::model::Geometry;
use pmquad::model::Portal;
use pmquad::model::Road;
use pmquad::quadtree::NodeKind;
use pmquad::quadtree::Quadrant;
use pmquad::quadtree::RangeFilter;
use tracing_subscriber::EnvFilter;

/// Run with `RUST_LOG=pmquad=trace` to see what the tree does.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn city(name: &str, x: i32, y: i32) -> Rc<City> {
    Rc::new(City::new(name, x, y, 0))
}

fn names(found: &BTreeSet<Geometry>) -> Vec<String> {
    found.iter().map(ToString::to_string).collect()
}

#[test]
fn single_road_scenario() -> anyhow::Result<()> {
    init_tracing();

    let mut tree = PmQuadtree::with_size(20, 20)?;
    let a = city("A", 5, 5);
    let b = city("B", 15, 15);

    tree.add_road(Road::new(a.clone(), b.clone()))?;

    assert_eq!(tree.nearest_city(Point::new(0, 0))?, a);
    assert_eq!(tree.nearest_city(Point::new(20, 20))?, b);

    let around_a = tree.range(&Circle::new(Point::new(5, 5), 1.0)?, RangeFilter::Cities);
    assert_eq!(names(&around_a), ["A"]);

    let everything = tree.range(&Circle::new(Point::new(10, 10), 0.0)?, RangeFilter::All);
    assert_eq!(names(&everything), ["A-B"]);

    tree.remove_road(&Road::new(a, b))?;
    assert!(tree.is_empty());

    Ok(())
}

#[test]
fn point_on_split_line() -> anyhow::Result<()> {
    init_tracing();

    let mut tree = PmQuadtree::with_size(20, 20)?;
    let a = city("A", 10, 10);

    tree.add_road(Road::new(a.clone(), city("B", 18, 2)))?;

    let exact = tree.range(&Circle::new(Point::new(10, 10), 0.0)?, RangeFilter::Cities);
    assert_eq!(names(&exact), ["A"]);

    for query in [Point::new(9, 10), Point::new(11, 10), Point::new(10, 11), Point::new(10, 9)] {
        assert_eq!(tree.nearest_city(query)?, a);
    }

    Ok(())
}

#[test]
fn rejected_road_leaves_tree_unmodified() -> anyhow::Result<()> {
    init_tracing();

    let mut tree = PmQuadtree::with_size(64, 64)?;
    tree.add_road(Road::new(city("A", 4, 4), city("B", 60, 60)))?;
    tree.add_road(Road::new(city("B", 60, 60), city("C", 60, 4)))?;

    let before = tree.root().to_string();

    let crossing = tree.add_road(Road::new(city("D", 4, 60), city("E", 60, 30)));
    assert!(matches!(crossing, Err(MapError::RoadIntersectsAnotherRoad { .. })));

    let outside = tree.add_road(Road::new(city("D", 4, 60), city("F", 70, 30)));
    assert!(matches!(outside, Err(MapError::RoadOutOfBounds { .. })));

    let duplicate = tree.add_road(Road::new(city("C", 60, 4), city("B", 60, 60)));
    assert!(matches!(duplicate, Err(MapError::RoadAlreadyMapped { .. })));

    assert_eq!(tree.root().to_string(), before);
    assert_eq!(tree.num_roads(), 2);
    assert_eq!(tree.num_cities(), 3);
    assert!(!tree.contains_city("D"));
    assert!(tree.is_well_formed());

    Ok(())
}

#[test]
fn road_through_a_city_it_does_not_end_at() -> anyhow::Result<()> {
    init_tracing();

    let mut tree = PmQuadtree::with_size(16, 16)?;
    tree.add_road(Road::new(city("A", 8, 8), city("B", 8, 2)))?;

    let err = tree
        .add_road(Road::new(city("C", 2, 8), city("D", 14, 8)))
        .unwrap_err();

    assert!(err.is_structural());
    assert_eq!(tree.num_roads(), 1);

    Ok(())
}

#[test]
fn nearest_road_and_portal() -> anyhow::Result<()> {
    init_tracing();

    let mut tree = PmQuadtree::with_size(32, 32)?;
    let low = Road::new(city("A", 2, 4), city("B", 30, 4));
    let high = Road::new(city("C", 2, 28), city("D", 30, 28));

    tree.add_road(low.clone())?;
    tree.add_road(high.clone())?;
    tree.add_portal(Portal::new("P", 16, 16, 0))?;
    tree.add_portal(Portal::new("Q", 4, 20, 0))?;

    assert_eq!(tree.nearest_road(Point::new(16, 10))?, low);
    assert_eq!(tree.nearest_road(Point::new(16, 20))?, high);
    assert_eq!(tree.nearest_portal(Point::new(20, 20))?.name(), "P");
    assert_eq!(tree.nearest_portal(Point::new(0, 20))?.name(), "Q");

    // queries do not change anything
    let outline = tree.root().to_string();
    assert_eq!(tree.nearest_road(Point::new(16, 10))?, low);
    assert_eq!(tree.root().to_string(), outline);

    let around_q = Circle::new(Point::new(6, 19), 4.0)?;
    let portals = tree.range(&around_q, RangeFilter::Portals);
    assert_eq!(names(&portals), ["Q"]);
    assert_eq!(tree.range(&around_q, RangeFilter::Portals), portals);
    assert_eq!(tree.root().to_string(), outline);

    let cities_and_roads =
        tree.range(&Circle::new(Point::new(2, 4), 1.0)?, RangeFilter::CitiesAndRoads);
    assert_eq!(names(&cities_and_roads), ["A", "A-B"]);

    Ok(())
}

#[test]
fn walking_the_tree() -> anyhow::Result<()> {
    let mut tree = PmQuadtree::with_size(16, 16)?;
    tree.add_road(Road::new(city("A", 2, 2), city("B", 14, 2)))?;
    tree.add_portal(Portal::new("P", 4, 12, 0))?;

    let root = tree.root().as_gray().expect("root is split");
    assert_eq!(root.center(), Point::new(8, 8));
    assert_eq!(root.child(Quadrant::Ne).kind(), NodeKind::White);
    assert_eq!(root.child_rect(Quadrant::Nw).min, Point::new(0, 8));

    let nw = root.child(Quadrant::Nw).as_black().expect("portal leaf");
    assert_eq!(nw.portal().map(|p| p.name()), Some("P"));
    assert_eq!(nw.num_points(), 1);

    insta::assert_snapshot!(tree.root().to_string(), @r"
gray (8, 8):
  black: P
  white
  black: A, A-B
  black: B, A-B
");

    Ok(())
}
