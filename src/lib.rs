pub mod config;
pub mod geom;
pub mod levels;
pub mod model;
pub mod quadtree;

mod error;

pub use crate::config::MapConfig;
pub use crate::error::MapError;
pub use crate::error::MapResult;
pub use crate::levels::Levels;
pub use crate::quadtree::PmQuadtree;
