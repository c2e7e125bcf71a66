use std::fmt;
use std::rc::Rc;

use tracing::debug;
use tracing::trace;

use crate::geom::Aabb;
use crate::geom::Point;
use crate::model::City;
use crate::model::Geometry;
use crate::model::Portal;
use crate::model::Road;
use crate::quadtree::validity;
use crate::quadtree::validity::Order;
use crate::quadtree::validity::Violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    White,
    Black,
    Gray,
}

/// Position of a child inside a [`Gray`]. Children are stored and visited in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Nw, Quadrant::Ne, Quadrant::Sw, Quadrant::Se];
}

/// A PM quadtree node.
///
/// Nodes never change once built. Mutations return the node that should take the place of the
/// old one in its parent, sharing every untouched subtree with the old version. The region a node
/// covers is not stored on the node, it is handed down by the caller.
#[derive(Debug, Clone, Default)]
pub enum Node {
    /// Empty leaf.
    #[default]
    White,

    /// Non-empty leaf.
    Black(Rc<Black>),

    /// Internal node with exactly four children.
    Gray(Rc<Gray>),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::White => NodeKind::White,
            Node::Black(_) => NodeKind::Black,
            Node::Gray(_) => NodeKind::Gray,
        }
    }

    pub fn is_white(&self) -> bool {
        matches!(self, Node::White)
    }

    pub fn as_black(&self) -> Option<&Black> {
        match self {
            Node::Black(black) => Some(black.as_ref()),
            _ => None,
        }
    }

    pub fn as_gray(&self) -> Option<&Gray> {
        match self {
            Node::Gray(gray) => Some(gray.as_ref()),
            _ => None,
        }
    }

    /// Add `g` to the node covering `rect`. Fails when no amount of splitting can make the
    /// affected leaves valid.
    pub(crate) fn add(&self, g: &Geometry, rect: Aabb, order: Order) -> Result<Node, Violation> {
        match self {
            Node::White => Black::default().add(g, rect, order),
            Node::Black(black) => Black::clone(black).add(g, rect, order),
            Node::Gray(gray) => {
                debug_assert_eq!(gray.rect, rect);

                let mut gray = Gray::clone(gray);
                gray.insert(g, order)?;

                Ok(Node::Gray(Rc::new(gray)))
            }
        }
    }

    /// Remove `g` from the node covering `rect`, merging subtrees that became valid leaves.
    pub(crate) fn remove(&self, g: &Geometry, rect: Aabb, order: Order) -> Node {
        match self {
            // removal fans out into quadrants that may already be empty
            Node::White => Node::White,
            Node::Black(black) => Black::clone(black).remove(g, &rect),
            Node::Gray(gray) => {
                debug_assert_eq!(gray.rect, rect);

                let mut gray = Gray::clone(gray);
                gray.delete(g, order);
                gray.collapse(order)
            }
        }
    }

    /// Every geometry held by the leaves below this node. Geometry reaching several leaves is
    /// listed once per leaf.
    pub fn geometry(&self) -> Vec<Geometry> {
        let mut out = Vec::new();
        self.collect_geometry(&mut out);

        out
    }

    fn collect_geometry(&self, out: &mut Vec<Geometry>) {
        match self {
            Node::White => {}
            Node::Black(black) => out.extend(black.geometry.iter().cloned()),
            Node::Gray(gray) => {
                for child in &gray.children {
                    child.collect_geometry(out);
                }
            }
        }
    }

    /// Recursively checks the structure below this node, for the node covering `rect`: leaves
    /// are non-empty, valid and only hold geometry touching their region, and internal nodes
    /// cover the region they are found at.
    pub fn is_well_formed(&self, rect: Aabb, order: Order) -> bool {
        match self {
            Node::White => true,
            Node::Black(black) => {
                !black.geometry.is_empty()
                    && black.counts_match()
                    && black.geometry.iter().all(|g| g.intersects(&rect))
                    && validity::is_valid(order, black, &rect)
            }
            Node::Gray(gray) => {
                gray.rect == rect
                    && gray
                        .children
                        .iter()
                        .zip(gray.regions)
                        .all(|(child, region)| child.is_well_formed(region, order))
            }
        }
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = depth * 2;

        match self {
            Node::White => write!(f, "{:indent$}white", ""),
            Node::Black(black) => {
                let names: Vec<String> = black.geometry.iter().map(ToString::to_string).collect();

                write!(f, "{:indent$}black: {}", "", names.join(", "))
            }
            Node::Gray(gray) => {
                let center = gray.center();
                write!(f, "{:indent$}gray ({}, {}):", "", center.x, center.y)?;

                for child in &gray.children {
                    f.write_str("\n")?;
                    child.write_outline(f, depth + 1)?;
                }

                Ok(())
            }
        }
    }
}

/// Renders the tree as an indented outline, children in [`Quadrant`] order.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

/// A leaf holding geometry fragments, sorted by the [`Geometry`] order and free of duplicates.
/// Points always precede roads.
#[derive(Debug, Clone, Default)]
pub struct Black {
    geometry: Vec<Geometry>,

    /// Cities and portals
    num_points: usize,
    num_portals: usize,
}

impl Black {
    pub fn geometry(&self) -> &[Geometry] {
        &self.geometry
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn num_portals(&self) -> usize {
        self.num_portals
    }

    pub fn num_roads(&self) -> usize {
        self.geometry.len() - self.num_points
    }

    pub fn points(&self) -> impl Iterator<Item = &Geometry> {
        self.geometry[..self.num_points].iter()
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.geometry[self.num_points..]
            .iter()
            .filter_map(Geometry::as_road)
    }

    /// The city of this leaf, if its point is a city.
    pub fn city(&self) -> Option<&Rc<City>> {
        self.geometry.first().and_then(Geometry::as_city)
    }

    /// The portal of this leaf, if its point is a portal.
    pub fn portal(&self) -> Option<&Rc<Portal>> {
        self.points().find_map(Geometry::as_portal)
    }

    pub fn contains(&self, g: &Geometry) -> bool {
        self.geometry.binary_search(g).is_ok()
    }

    /// Insert `g` unless it is already present. Returns whether it was inserted.
    pub(crate) fn insert(&mut self, g: Geometry) -> bool {
        let Err(index) = self.geometry.binary_search(&g) else {
            return false;
        };

        if g.is_point() {
            self.num_points += 1;
        }
        if g.as_portal().is_some() {
            self.num_portals += 1;
        }

        self.geometry.insert(index, g);

        true
    }

    /// Remove `g` if present. Returns whether it was removed.
    pub(crate) fn erase(&mut self, g: &Geometry) -> bool {
        let Ok(index) = self.geometry.binary_search(g) else {
            return false;
        };

        let g = self.geometry.remove(index);

        if g.is_point() {
            self.num_points -= 1;
        }
        if g.as_portal().is_some() {
            self.num_portals -= 1;
        }

        true
    }

    fn counts_match(&self) -> bool {
        let points = self.geometry.iter().filter(|g| g.is_point()).count();
        let portals = self.geometry.iter().filter(|g| g.as_portal().is_some()).count();

        points == self.num_points && portals == self.num_portals
    }

    fn add(mut self, g: &Geometry, rect: Aabb, order: Order) -> Result<Node, Violation> {
        // a road brings along the endpoints lying inside this leaf
        if let Geometry::Road(road) = g {
            for city in [road.start(), road.end()] {
                if rect.contains(city.point()) {
                    self.insert(Geometry::City(city.clone()));
                }
            }
        }

        self.insert(g.clone());

        if validity::is_valid(order, &self, &rect) {
            Ok(Node::Black(Rc::new(self)))
        } else {
            self.partition(rect, order)
        }
    }

    /// Replace this invalid leaf with a gray node over the same region.
    fn partition(self, rect: Aabb, order: Order) -> Result<Node, Violation> {
        if !rect.can_split() {
            let violation = validity::classify(&self, &rect);
            debug!(?rect, ?violation, "leaf cannot be split any further");

            return Err(violation);
        }

        trace!(?rect, fragments = self.geometry.len(), "partitioning leaf");

        // Storage order re-adds every point before any road, so a quadrant already holds its
        // point by the time a road reaches it.
        let mut gray = Gray::new(rect);
        for g in &self.geometry {
            gray.insert(g, order)?;
        }

        Ok(Node::Gray(Rc::new(gray)))
    }

    fn remove(mut self, g: &Geometry, rect: &Aabb) -> Node {
        self.erase(g);

        // drop the endpoints this road brought, unless another road here still ends at them
        if let Geometry::Road(road) = g {
            for city in [road.start(), road.end()] {
                if rect.contains(city.point()) && !self.roads().any(|r| r.has_endpoint(city)) {
                    self.erase(&Geometry::City(city.clone()));
                }
            }
        }

        if self.geometry.is_empty() {
            Node::White
        } else {
            Node::Black(Rc::new(self))
        }
    }
}

/// An internal node. Caches its own region and the regions of its four children.
#[derive(Debug, Clone)]
pub struct Gray {
    rect: Aabb,
    regions: [Aabb; 4],
    children: [Node; 4],
}

impl Gray {
    fn new(rect: Aabb) -> Self {
        Gray {
            rect,
            regions: rect.split(),
            children: Default::default(),
        }
    }

    pub fn rect(&self) -> Aabb {
        self.rect
    }

    /// The point where the four children meet.
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn children(&self) -> &[Node; 4] {
        &self.children
    }

    pub fn regions(&self) -> &[Aabb; 4] {
        &self.regions
    }

    pub fn child(&self, quadrant: Quadrant) -> &Node {
        &self.children[quadrant as usize]
    }

    pub fn child_rect(&self, quadrant: Quadrant) -> Aabb {
        self.regions[quadrant as usize]
    }

    /// Hand `g` to every child whose region it touches.
    fn insert(&mut self, g: &Geometry, order: Order) -> Result<(), Violation> {
        for (child, region) in self.children.iter_mut().zip(&self.regions) {
            if g.intersects(region) {
                *child = child.add(g, *region, order)?;
            }
        }

        Ok(())
    }

    fn delete(&mut self, g: &Geometry, order: Order) {
        for (child, region) in self.children.iter_mut().zip(&self.regions) {
            if g.intersects(region) {
                *child = child.remove(g, *region, order);
            }
        }
    }

    /// Shrink this node after a removal, if a smaller shape holds the same geometry.
    fn collapse(self, order: Order) -> Node {
        let whites = self.children.iter().filter(|c| c.is_white()).count();

        if whites == 4 {
            trace!(rect = ?self.rect, "gray node emptied");
            return Node::White;
        }

        if whites == 3 {
            if let Some(black @ Node::Black(_)) = self.children.iter().find(|c| !c.is_white()) {
                trace!(rect = ?self.rect, "lifting single leaf");
                return black.clone();
            }
        }

        let mut fragments = Vec::new();
        for child in &self.children {
            child.collect_geometry(&mut fragments);
        }

        let mut merged = Black::default();
        for g in fragments {
            merged.insert(g);
        }

        if validity::is_valid(order, &merged, &self.rect) {
            debug!(rect = ?self.rect, fragments = merged.geometry.len(), "merged gray node into leaf");
            Node::Black(Rc::new(merged))
        } else {
            Node::Gray(Rc::new(self))
        }
    }
}
