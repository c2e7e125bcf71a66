use crate::MapError;
use crate::quadtree::Order;

/// Settings shared by every level of a map. Fixed once a quadtree is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    /// Width of the world, spanning `[0, width]`.
    pub width: i32,

    /// Height of the world, spanning `[0, height]`.
    pub height: i32,

    /// Raw PM quadtree order, see [`Order`].
    pub order: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            order: 3,
        }
    }
}

impl MapConfig {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_order(self, order: u8) -> Self {
        Self { order, ..self }
    }

    /// Check the settings, resolving the order.
    pub fn validate(&self) -> Result<Order, MapError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(MapError::InvalidWorldSize {
                width: self.width,
                height: self.height,
            });
        }

        Order::try_from(self.order)
    }
}
