use thiserror::Error;

pub type MapResult<T> = Result<T, MapError>;

/// Everything a map mutation or query can reject. None of these leave a quadtree in a modified
/// state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("World size must be positive, got {width}x{height}")]
    InvalidWorldSize { width: i32, height: i32 },

    #[error("Unsupported PM quadtree order {0}, only order 3 is implemented")]
    UnsupportedOrder(u8),

    #[error("Range radius must be a non-negative number, got {radius}")]
    InvalidRadius { radius: f64 },

    #[error("Road {start}-{end} is already mapped")]
    RoadAlreadyMapped { start: String, end: String },

    #[error("Road {start}-{end} is not mapped")]
    RoadNotMapped { start: String, end: String },

    #[error("Road {start}-{end} starts and ends at the same city")]
    StartEqualsEnd { start: String, end: String },

    #[error("Road {start}-{end} does not lie on a single level")]
    RoadNotOnOneLevel { start: String, end: String },

    #[error("Road {start}-{end} is out of bounds")]
    RoadOutOfBounds { start: String, end: String },

    #[error("Road {start}-{end} intersects another road")]
    RoadIntersectsAnotherRoad { start: String, end: String },

    #[error("Road {start}-{end} violates the PM quadtree rules")]
    RoadViolatesRules { start: String, end: String },

    #[error("Portal {name} is already mapped")]
    PortalAlreadyMapped { name: String },

    #[error("Another portal is already mapped at the location of portal {name}")]
    DuplicatePortalLocation { name: String },

    #[error("Portal {name} is out of bounds")]
    PortalOutOfBounds { name: String },

    #[error("Portal {name} violates the PM quadtree rules")]
    PortalViolatesRules { name: String },

    #[error("No {kind} found")]
    NotFound { kind: &'static str },
}

impl MapError {
    /// Rejections caused by the structural rules of the tree rather than by bookkeeping.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            MapError::RoadIntersectsAnotherRoad { .. }
                | MapError::RoadViolatesRules { .. }
                | MapError::PortalViolatesRules { .. }
        )
    }
}
