use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::rc::Rc;

use crate::geom::Segment;
use crate::model::City;

/// A straight road between two cities.
///
/// Roads are undirected: a road and its reversal are equal, hash alike and sort alike. Their key
/// is the pair of endpoint names in ascending order.
#[derive(Debug, Clone)]
pub struct Road {
    start: Rc<City>,
    end: Rc<City>,
    weight: Option<f64>,
}

impl Road {
    pub fn new(start: Rc<City>, end: Rc<City>) -> Self {
        Road {
            start,
            end,
            weight: None,
        }
    }

    /// Attach a weight for path searches. Plays no part in the spatial index.
    pub fn with_weight(self, weight: f64) -> Self {
        Road {
            weight: Some(weight),
            ..self
        }
    }

    pub fn start(&self) -> &Rc<City> {
        &self.start
    }

    pub fn end(&self) -> &Rc<City> {
        &self.end
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn reversed(&self) -> Self {
        Road {
            start: self.end.clone(),
            end: self.start.clone(),
            weight: self.weight,
        }
    }

    pub fn key(&self) -> (&str, &str) {
        let (a, b) = (self.start.name(), self.end.name());

        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.start.point(), self.end.point())
    }

    pub fn length(&self) -> f64 {
        self.start.point().distance(&self.end.point())
    }

    pub fn has_endpoint(&self, city: &City) -> bool {
        *self.start == *city || *self.end == *city
    }

    /// The endpoint across the road from `city`, if `city` is an endpoint.
    pub fn other_end(&self, city: &City) -> Option<&Rc<City>> {
        if *self.start == *city {
            Some(&self.end)
        } else if *self.end == *city {
            Some(&self.start)
        } else {
            None
        }
    }
}

impl PartialEq for Road {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Road {}

impl PartialOrd for Road {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Road {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for Road {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Road {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
