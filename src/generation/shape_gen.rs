//! Irregular rock outline synthesis.
//!
//! Vertices sit at evenly spaced angles perturbed by a little angular noise.
//! Each vertex draws its own radius on both axes, so neighbouring vertices
//! bulge and indent independently instead of tracing a smooth ellipse.

use std::f32::consts::TAU;

use crate::core::types::Vec2;
use crate::generation::config::ShapeConfig;
use crate::generation::random::RandomSource;

/// Builds rock outlines from a [`ShapeConfig`].
#[derive(Clone, Debug, Default)]
pub struct ShapeSynthesizer {
    config: ShapeConfig,
}

impl ShapeSynthesizer {
    pub fn new(config: ShapeConfig) -> Self {
        Self { config }
    }

    /// Outline centered on `center` within a `width` x `height` box.
    ///
    /// `_rotation` is accepted so callers can pass the rock's full pose;
    /// rotation is applied at render time and never baked into the points.
    pub fn synthesize(
        &self,
        center: Vec2,
        width: f32,
        height: f32,
        _rotation: f32,
        rng: &mut impl RandomSource,
    ) -> Vec<Vec2> {
        let num_points = self.config.vertices.sample(rng) as usize;
        let base_radius = Vec2::new(width * 0.5, height * 0.5);

        let mut points = Vec::with_capacity(num_points);
        for i in 0..num_points {
            let angle = i as f32 / num_points as f32 * TAU;

            // Draw order: x radius, y radius, then angle noise
            let radius = Vec2::new(
                base_radius.x * self.config.radius_variation.sample(rng),
                base_radius.y * self.config.radius_variation.sample(rng),
            );
            let angle = angle + rng.centered(self.config.angle_noise);

            points.push(center + Vec2::new(angle.cos(), angle.sin()) * radius);
        }
        points
    }
}
