//! Axis-aligned 2D rectangle

use crate::core::types::Vec2;

/// Axis-aligned rectangle defined by min and max corners.
///
/// Screen convention: `min.y` is the top edge, `max.y` the bottom edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Create rectangle from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle containing every point, or `None` for an empty slice
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut rect = Rect::new(*first, *first);
        for p in rest {
            rect.expand(*p);
        }
        Some(rect)
    }

    /// Width and height
    pub fn extent(&self) -> Vec2 {
        self.max - self.min
    }

    /// Expand rectangle to include point
    pub fn expand(&mut self, point: Vec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Return merged rectangle containing both
    pub fn merged(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
