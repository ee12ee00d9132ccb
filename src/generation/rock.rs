//! Rock descriptors produced by the stack builder.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::math::Rect;

/// Grayscale fill intensity shared by the R, G and B channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gray(pub u8);

impl Gray {
    /// CSS color, e.g. `rgb(180, 180, 180)`
    pub fn to_css(self) -> String {
        format!("rgb({0}, {0}, {0})", self.0)
    }
}

/// One rock of a cairn.
///
/// `y` is the top of the bounding box; visual elements are centered on
/// `y + height * 0.5`. `points` are absolute and unrotated, rotation is
/// applied when drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rock {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
    /// Degrees
    pub rotation: f32,
    pub fill: Gray,
    /// 0 = ground layer
    pub layer: usize,
    pub points: Vec<Vec2>,
    /// Index of the supporting rock in the owning cairn (None on layer 0)
    pub support: Option<usize>,
}

impl Rock {
    /// Bottom edge of the bounding box
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Pivot for rotation: horizontal anchor at vertical center
    pub fn pivot(&self) -> Vec2 {
        Vec2::new(self.x, self.y + self.height * 0.5)
    }

    /// Bounding box of the unrotated outline
    pub fn outline_bounds(&self) -> Option<Rect> {
        Rect::from_points(&self.points)
    }
}

/// Bookkeeping for one placed layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub index: usize,
    pub rock_count: usize,
    /// Highest point of the layer minus the ceiling gap
    pub ceiling: f32,
}

/// Result of one generation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cairn {
    /// Rocks in generation order, layer by layer from the ground up
    pub rocks: Vec<Rock>,
    pub layers: Vec<LayerSummary>,
}

impl Cairn {
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn rock_count(&self) -> usize {
        self.rocks.len()
    }

    /// Rocks of one layer, in generation order
    pub fn layer(&self, index: usize) -> impl Iterator<Item = &Rock> {
        self.rocks.iter().filter(move |r| r.layer == index)
    }

    /// Supporting rock of `rock`, if any
    pub fn support_of(&self, rock: &Rock) -> Option<&Rock> {
        rock.support.and_then(|i| self.rocks.get(i))
    }

    /// Union of every rock's outline bounds
    pub fn bounds(&self) -> Option<Rect> {
        self.rocks
            .iter()
            .filter_map(Rock::outline_bounds)
            .reduce(|a, b| a.merged(&b))
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> crate::core::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
