//! Nearest-object search.
//!
//! A best-first walk over the tree: regions are queued by their distance to the query point and
//! leaves contribute their best candidate, so the first candidate popped is the closest object.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use crate::geom::Point;
use crate::model::City;
use crate::model::Portal;
use crate::model::Road;
use crate::quadtree::node::Black;
use crate::quadtree::node::Gray;
use crate::quadtree::node::Node;

/// A kind of object a nearest search can look for.
pub trait Target {
    type Item: Clone + Ord;

    /// Used in [`MapError::NotFound`](crate::MapError::NotFound).
    const KIND: &'static str;

    /// The closest qualifying object of a leaf, with its distance to `query`.
    fn best(black: &Black, query: Point) -> Option<(f64, Self::Item)>;
}

pub struct Cities;

pub struct Portals;

pub struct Roads;

impl Target for Cities {
    type Item = Rc<City>;
    const KIND: &'static str = "city";

    fn best(black: &Black, query: Point) -> Option<(f64, Self::Item)> {
        black
            .city()
            .map(|city| (city.point().distance(&query), city.clone()))
    }
}

impl Target for Portals {
    type Item = Rc<Portal>;
    const KIND: &'static str = "portal";

    fn best(black: &Black, query: Point) -> Option<(f64, Self::Item)> {
        black
            .portal()
            .map(|portal| (portal.point().distance(&query), portal.clone()))
    }
}

impl Target for Roads {
    type Item = Road;
    const KIND: &'static str = "road";

    fn best(black: &Black, query: Point) -> Option<(f64, Self::Item)> {
        black
            .roads()
            .map(|road| (road.segment().distance_to(query), road))
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.cmp(b)))
            .map(|(d, road)| (d, road.clone()))
    }
}

enum Pending<'a, I> {
    Candidate(I),

    /// A gray node still to be expanded, with its insertion sequence number.
    Region(&'a Gray, u64),
}

struct Entry<'a, I> {
    distance: f64,
    pending: Pending<'a, I>,
}

impl<I: Ord> PartialEq for Entry<'_, I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<I: Ord> Eq for Entry<'_, I> {}

impl<I: Ord> PartialOrd for Entry<'_, I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reversed, so that [`BinaryHeap`] pops the closest entry first. At equal distance candidates
/// beat regions, candidates follow the object order and regions their insertion order.
impl<I: Ord> Ord for Entry<'_, I> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| match (&self.pending, &other.pending) {
                (Pending::Candidate(a), Pending::Candidate(b)) => b.cmp(a),
                (Pending::Candidate(_), Pending::Region(..)) => Ordering::Greater,
                (Pending::Region(..), Pending::Candidate(_)) => Ordering::Less,
                (Pending::Region(_, a), Pending::Region(_, b)) => b.cmp(a),
            })
    }
}

/// The object of kind `T` closest to `query`, or `None` when the tree holds none.
pub(crate) fn nearest<T: Target>(root: &Node, query: Point) -> Option<T::Item> {
    match root {
        Node::White => None,
        Node::Black(black) => T::best(black, query).map(|(_, item)| item),
        Node::Gray(gray) => Some(search::<T>(gray, query)),
    }
}

/// Reaches a candidate whenever the tree holds an object of kind `T`, which callers check first.
fn search<T: Target>(root: &Gray, query: Point) -> T::Item {
    let mut heap = BinaryHeap::new();
    let mut seq = 0;

    heap.push(Entry {
        distance: root.rect().distance_to(query),
        pending: Pending::Region(root, seq),
    });

    while let Some(Entry { pending, .. }) = heap.pop() {
        let gray = match pending {
            Pending::Candidate(item) => return item,
            Pending::Region(gray, _) => gray,
        };

        for (child, region) in gray.children().iter().zip(gray.regions()) {
            match child {
                Node::White => {}
                Node::Black(black) => {
                    if let Some((distance, item)) = T::best(black, query) {
                        heap.push(Entry {
                            distance,
                            pending: Pending::Candidate(item),
                        });
                    }
                }
                Node::Gray(child) => {
                    seq += 1;
                    heap.push(Entry {
                        distance: region.distance_to(query),
                        pending: Pending::Region(child, seq),
                    });
                }
            }
        }
    }

    unreachable!("nearest {} search ran out of regions", T::KIND)
}

#[cfg(test)]
mod tests {
    use std::collections::BinaryHeap;

    use super::Entry;
    use super::Pending;

    #[test]
    fn heap_pops_closest_then_candidates_first() {
        let mut heap: BinaryHeap<Entry<'_, &str>> = BinaryHeap::new();

        heap.push(Entry {
            distance: 3.0,
            pending: Pending::Candidate("far"),
        });
        heap.push(Entry {
            distance: 1.0,
            pending: Pending::Candidate("b"),
        });
        heap.push(Entry {
            distance: 1.0,
            pending: Pending::Candidate("a"),
        });

        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|entry| match entry.pending {
                Pending::Candidate(name) => name,
                Pending::Region(..) => unreachable!(),
            })
            .collect();

        assert_eq!(order, ["a", "b", "far"]);
    }
}
