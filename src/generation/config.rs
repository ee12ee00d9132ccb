//! Generation configuration.
//!
//! The defaults reproduce the reference cairn exactly; a JSON file may
//! override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::generation::random::RandomSource;

/// Half-open float interval `[min, max)` sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw one value from the interval.
    pub fn sample(&self, rng: &mut impl RandomSource) -> f32 {
        rng.range(self.min, self.max)
    }
}

/// Inclusive integer interval `[min, max]` sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Draw one value: `min + floor(u * (max - min + 1))`.
    /// An inverted range always yields `min`.
    pub fn sample(&self, rng: &mut impl RandomSource) -> u32 {
        let width = self.max.saturating_sub(self.min).saturating_add(1);
        self.min.saturating_add(rng.below(width))
    }
}

/// Parameters of the irregular rock outline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Vertex count per outline (8-11)
    pub vertices: CountRange,
    /// Per-vertex radius multiplier on each axis (0.7-1.3)
    pub radius_variation: Span,
    /// Full width of the angular noise window in radians (0.3 = ±0.15)
    pub angle_noise: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            vertices: CountRange::new(8, 11),
            radius_variation: Span::new(0.7, 1.3),
            angle_noise: 0.3,
        }
    }
}

/// Configuration for the stack builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Horizontal center of the scene
    pub center_x: f32,
    /// Ground line that layer-0 rocks stand on
    pub ground_y: f32,
    /// Number of layers (3-5)
    pub layer_count: CountRange,
    /// Seed for the rocks-per-layer counter (3-5)
    pub base_rocks: CountRange,
    /// Per-layer shrink multiplied by the layer index (0.15-0.25)
    pub shrink_per_layer: Span,
    /// Width shared by all rocks of a layer before scaling (50-90)
    pub base_width: Span,
    /// Height shared by all rocks of a layer before scaling (20-45)
    pub base_height: Span,
    /// Individual scale of layer-0 rocks
    pub ground_variation: Span,
    /// Individual scale of rocks above layer 0 (tighter band)
    pub upper_variation: Span,
    /// Horizontal room reserved per layer-0 rock
    pub ground_spacing: f32,
    /// Jitter window for layer-0 rocks (20 = ±10)
    pub ground_jitter: f32,
    /// Jitter window for a lone rock over the layer mean (15 = ±7.5)
    pub single_jitter: f32,
    /// Jitter window for rocks spread over the layer below (20 = ±10)
    pub spread_jitter: f32,
    /// Span assumed when the layer below has a single rock
    pub fallback_span: f32,
    /// Vertical offset against the supporting rock's top (-3..3)
    pub contact_jitter: Span,
    /// Rotation window in degrees for layer 0 (25 = ±12.5)
    pub ground_rotation: f32,
    /// Rotation window in degrees above layer 0 (20 = ±10)
    pub upper_rotation: f32,
    /// Gray intensity, inclusive (140-239)
    pub gray: CountRange,
    /// Gap subtracted from a layer's highest point for the ceiling
    pub ceiling_gap: f32,
    /// Outline parameters
    pub shape: ShapeConfig,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            center_x: 250.0,
            ground_y: 320.0,
            layer_count: CountRange::new(3, 5),
            base_rocks: CountRange::new(3, 5),
            shrink_per_layer: Span::new(0.15, 0.25),
            base_width: Span::new(50.0, 90.0),
            base_height: Span::new(20.0, 45.0),
            ground_variation: Span::new(0.7, 1.3),
            upper_variation: Span::new(0.8, 1.2),
            ground_spacing: 70.0,
            ground_jitter: 20.0,
            single_jitter: 15.0,
            spread_jitter: 20.0,
            fallback_span: 100.0,
            contact_jitter: Span::new(-3.0, 3.0),
            ground_rotation: 25.0,
            upper_rotation: 20.0,
            gray: CountRange::new(140, 239),
            ceiling_gap: 2.0,
            shape: ShapeConfig::default(),
        }
    }
}

impl StackConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject configurations that could produce an empty layer,
    /// negative sizes, or an unsampleable range.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("layer_count", self.layer_count),
            ("base_rocks", self.base_rocks),
            ("gray", self.gray),
            ("shape.vertices", self.shape.vertices),
        ];
        for (name, range) in counts {
            if range.min > range.max {
                return Err(Error::Config(format!("{name}: min {} > max {}", range.min, range.max)));
            }
        }
        if self.layer_count.min == 0 || self.base_rocks.min == 0 {
            return Err(Error::Config("layer_count and base_rocks must start at 1 or more".into()));
        }
        if self.gray.max > 255 {
            return Err(Error::Config(format!("gray.max {} exceeds 255", self.gray.max)));
        }
        if self.shape.vertices.min < 3 {
            return Err(Error::Config("shape.vertices must start at 3 or more".into()));
        }

        let spans = [
            ("shrink_per_layer", self.shrink_per_layer),
            ("base_width", self.base_width),
            ("base_height", self.base_height),
            ("ground_variation", self.ground_variation),
            ("upper_variation", self.upper_variation),
            ("contact_jitter", self.contact_jitter),
            ("shape.radius_variation", self.shape.radius_variation),
        ];
        for (name, span) in spans {
            if !(span.min.is_finite() && span.max.is_finite()) || span.min > span.max {
                return Err(Error::Config(format!("{name}: invalid interval [{}, {})", span.min, span.max)));
            }
        }
        for (name, span) in [("base_width", self.base_width), ("base_height", self.base_height)] {
            if span.min <= 0.0 {
                return Err(Error::Config(format!("{name} must be positive")));
            }
        }
        let max_layer = self.layer_count.max.saturating_sub(1) as f32;
        if self.shrink_per_layer.min < 0.0 || max_layer * self.shrink_per_layer.max > 1.0 {
            return Err(Error::Config(format!(
                "shrink_per_layer up to {} over {} layers collapses rocks to nothing",
                self.shrink_per_layer.max, self.layer_count.max
            )));
        }
        Ok(())
    }
}
