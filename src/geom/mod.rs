//! Integer plane geometry shared by the quadtree and its queries.

pub use crate::geom::aabb::Aabb;
pub use crate::geom::circle::Circle;
pub use crate::geom::point::Point;
pub use crate::geom::segment::Segment;

mod aabb;
mod circle;
mod point;
mod segment;
