//! Stack builder: places rocks layer by layer from the ground up.
//!
//! Every rock above the ground layer is bound to one supporting rock in the
//! layer beneath and its vertical position is derived from that support, so
//! nothing floats. Horizontal placement spreads a layer across the span of
//! the one below it.

use crate::core::types::Vec2;
use crate::core::Result;
use crate::generation::config::StackConfig;
use crate::generation::layer_plan::LayerPlan;
use crate::generation::random::RandomSource;
use crate::generation::rock::{Cairn, Gray, LayerSummary, Rock};
use crate::generation::shape_gen::ShapeSynthesizer;

/// Dimensions shared by every rock of one layer.
#[derive(Clone, Copy, Debug)]
struct LayerSizing {
    factor: f32,
    width: f32,
    height: f32,
}

/// Builds complete cairns from a [`StackConfig`].
#[derive(Clone, Debug)]
pub struct StackBuilder {
    config: StackConfig,
    shapes: ShapeSynthesizer,
}

impl Default for StackBuilder {
    fn default() -> Self {
        Self::new(StackConfig::default())
    }
}

impl StackBuilder {
    /// Builder without validation. Out-of-range settings still generate, but
    /// may yield empty or oddly sized cairns.
    pub fn new(config: StackConfig) -> Self {
        let shapes = ShapeSynthesizer::new(config.shape.clone());
        Self { config, shapes }
    }

    /// Builder for a config that passed [`StackConfig::validate`].
    pub fn try_new(config: StackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Generate a fresh cairn. Never fails.
    pub fn build(&self, rng: &mut impl RandomSource) -> Cairn {
        let plan = LayerPlan::random(&self.config, rng);
        self.build_with_plan(&plan, rng)
    }

    /// Generate a cairn with a fixed layer structure.
    pub fn build_with_plan(&self, plan: &LayerPlan, rng: &mut impl RandomSource) -> Cairn {
        log::debug!("Building cairn with layer plan {:?}", plan.counts());

        let mut cairn = Cairn {
            rocks: Vec::with_capacity(plan.total_rocks()),
            layers: Vec::with_capacity(plan.layer_count()),
        };
        // Indices into `cairn.rocks` of the most recently placed layer
        let mut previous: Vec<usize> = Vec::new();

        for (layer, &count) in plan.counts().iter().enumerate() {
            let sizing = self.layer_sizing(layer, rng);

            if layer > 0 && previous.is_empty() {
                log::debug!("Layer {layer} has nothing to rest on, skipping");
                continue;
            }

            let first = cairn.rocks.len();
            for i in 0..count {
                let rock = if layer == 0 {
                    self.place_ground_rock(i, count, &sizing, rng)
                } else {
                    self.place_upper_rock(layer, i, count, &sizing, &cairn.rocks, &previous, rng)
                };
                cairn.rocks.push(rock);
            }

            let placed = &cairn.rocks[first..];
            if placed.is_empty() {
                previous.clear();
                continue;
            }
            let highest = placed.iter().map(|r| r.y).fold(f32::INFINITY, f32::min);
            cairn.layers.push(LayerSummary {
                index: layer,
                rock_count: placed.len(),
                ceiling: highest - self.config.ceiling_gap,
            });
            previous = (first..cairn.rocks.len()).collect();
        }

        log::debug!(
            "Built cairn: {} rocks over {} layers",
            cairn.rock_count(),
            cairn.layer_count()
        );
        cairn
    }

    /// Draw order: shrink, base width, base height. The shrink is scaled by
    /// the layer index and does not compound across layers.
    fn layer_sizing(&self, layer: usize, rng: &mut impl RandomSource) -> LayerSizing {
        let factor = 1.0 - layer as f32 * self.config.shrink_per_layer.sample(rng);
        let width = self.config.base_width.sample(rng);
        let height = self.config.base_height.sample(rng);
        LayerSizing { factor, width, height }
    }

    fn place_ground_rock(
        &self,
        i: usize,
        count: usize,
        sizing: &LayerSizing,
        rng: &mut impl RandomSource,
    ) -> Rock {
        let c = &self.config;
        let scale = sizing.factor * c.ground_variation.sample(rng);
        let width = sizing.width * scale;
        let height = sizing.height * scale;

        let total = count as f32 * c.ground_spacing;
        let start_x = c.center_x - total * 0.5;
        let spacing = total / count.saturating_sub(1).max(1) as f32;
        let x = if count == 1 {
            c.center_x
        } else {
            start_x + i as f32 * spacing + rng.centered(c.ground_jitter)
        };
        let y = c.ground_y - height;

        let rotation = rng.centered(c.ground_rotation);
        self.finish_rock(0, width, height, x, y, rotation, None, rng)
    }

    #[allow(clippy::too_many_arguments)]
    fn place_upper_rock(
        &self,
        layer: usize,
        i: usize,
        count: usize,
        sizing: &LayerSizing,
        rocks: &[Rock],
        previous: &[usize],
        rng: &mut impl RandomSource,
    ) -> Rock {
        let c = &self.config;
        let scale = sizing.factor * c.upper_variation.sample(rng);
        let width = sizing.width * scale;
        let height = sizing.height * scale;

        let (x, support) = if count == 1 {
            let mean = previous.iter().map(|&j| rocks[j].x).sum::<f32>() / previous.len() as f32;
            let x = mean + rng.centered(c.single_jitter);
            // Median index, not the nearest rock
            (x, previous[previous.len() / 2])
        } else {
            let min_x = previous.iter().map(|&j| rocks[j].x).fold(f32::INFINITY, f32::min);
            let max_x = previous.iter().map(|&j| rocks[j].x).fold(f32::NEG_INFINITY, f32::max);
            let span = if previous.len() > 1 { max_x - min_x } else { c.fallback_span };
            let t = i as f32 / count.saturating_sub(1).max(1) as f32;
            let x = min_x + t * span + rng.centered(c.spread_jitter);
            (x, nearest(rocks, previous, x))
        };

        let y = rocks[support].y - height + c.contact_jitter.sample(rng);
        let rotation = rng.centered(c.upper_rotation);
        self.finish_rock(layer, width, height, x, y, rotation, Some(support), rng)
    }

    /// Draw the gray and the outline, then assemble the rock.
    #[allow(clippy::too_many_arguments)]
    fn finish_rock(
        &self,
        layer: usize,
        width: f32,
        height: f32,
        x: f32,
        y: f32,
        rotation: f32,
        support: Option<usize>,
        rng: &mut impl RandomSource,
    ) -> Rock {
        let fill = Gray(self.config.gray.sample(rng).min(u8::MAX as u32) as u8);
        let center = Vec2::new(x, y + height * 0.5);
        let points = self.shapes.synthesize(center, width, height, rotation, rng);

        Rock { width, height, x, y, rotation, fill, layer, points, support }
    }
}

/// Rock in `candidates` closest to `x` horizontally. The first wins ties.
fn nearest(rocks: &[Rock], candidates: &[usize], x: f32) -> usize {
    let mut best = candidates[0];
    for &j in &candidates[1..] {
        if (rocks[j].x - x).abs() < (rocks[best].x - x).abs() {
            best = j;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::generation::config::CountRange;
    use crate::generation::random::{EntropySource, SequenceSource};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_midpoint_scenario() {
        let builder = StackBuilder::default();
        let plan = LayerPlan::new(vec![3, 2, 1]).unwrap();
        let cairn = builder.build_with_plan(&plan, &mut SequenceSource::constant(0.5));

        assert_eq!(cairn.rock_count(), 6);
        assert_eq!(cairn.layer_count(), 3);

        let xs: Vec<f32> = cairn.rocks.iter().map(|r| r.x).collect();
        // Ground layer: 210 wide centered on 250, no jitter at 0.5
        assert!(approx(xs[0], 145.0) && approx(xs[1], 250.0) && approx(xs[2], 355.0), "{xs:?}");
        // Layer 1 spans the ground layer exactly
        assert!(approx(xs[3], 145.0) && approx(xs[4], 355.0), "{xs:?}");
        // Layer 2 sits on the mean of layer 1
        assert!(approx(xs[5], (xs[3] + xs[4]) * 0.5));

        let ground = &cairn.rocks[0];
        assert!(approx(ground.width, 70.0));
        assert!(approx(ground.height, 32.5));
        assert!(approx(ground.y, 287.5));
        assert_eq!(ground.fill, Gray(190));
        assert_eq!(ground.rotation, 0.0);

        // Factor 0.8 on layer 1 and 0.6 on layer 2
        assert!(approx(cairn.rocks[3].width, 56.0));
        assert!(approx(cairn.rocks[5].width, 42.0));
        assert!(approx(cairn.rocks[3].y, 287.5 - 26.0));
        assert!(approx(cairn.rocks[5].y, 287.5 - 26.0 - 19.5));

        assert!(approx(cairn.layers[0].ceiling, 285.5));
    }

    #[test]
    fn test_single_rock_binds_to_median_index() {
        // All draws 0.0: ground x = 100, 193.3, 286.7, 380 and the lone rock
        // lands at 240 - 7.5, closer to index 1 than to the median index 2
        let builder = StackBuilder::default();
        let plan = LayerPlan::new(vec![4, 1]).unwrap();
        let cairn = builder.build_with_plan(&plan, &mut SequenceSource::constant(0.0));

        let top = &cairn.rocks[4];
        let support = top.support.unwrap();
        assert_eq!(support, 2);

        // Index 1 is strictly closer to the top rock than index 2
        let d1 = (cairn.rocks[1].x - top.x).abs();
        let d2 = (cairn.rocks[2].x - top.x).abs();
        assert!(d1 < d2, "d1 {d1} d2 {d2}");
    }

    #[test]
    fn test_spread_layer_picks_nearest_support() {
        let builder = StackBuilder::default();
        let plan = LayerPlan::new(vec![3, 3, 1]).unwrap();
        let mut rng = EntropySource::seeded(77);
        let cairn = builder.build_with_plan(&plan, &mut rng);

        for rock in cairn.layer(1) {
            let support = rock.support.unwrap();
            let best = cairn
                .layer(0)
                .map(|r| (r.x - rock.x).abs())
                .fold(f32::INFINITY, f32::min);
            assert_eq!((cairn.rocks[support].x - rock.x).abs(), best);
        }
    }

    #[test]
    fn test_single_ground_rock_is_centered_without_jitter() {
        let builder = StackBuilder::default();
        let plan = LayerPlan::new(vec![1]).unwrap();
        let mut rng = SequenceSource::constant(0.9);
        let cairn = builder.build_with_plan(&plan, &mut rng);

        assert_eq!(cairn.rocks[0].x, 250.0);
        // 3 sizing + variation + rotation + gray + shape (1 + 3 per vertex)
        let vertices = cairn.rocks[0].points.len();
        assert_eq!(rng.draws(), 3 + 1 + 1 + 1 + 1 + 3 * vertices);
    }

    #[test]
    fn test_lowest_draws_hit_band_minimums() {
        let builder = StackBuilder::default();
        let plan = LayerPlan::new(vec![1, 1]).unwrap();
        let cairn = builder.build_with_plan(&plan, &mut SequenceSource::constant(0.0));
        let (ground, top) = (&cairn.rocks[0], &cairn.rocks[1]);

        // Base 50 x 20, ground variation 0.7
        assert!(approx(ground.width, 35.0) && approx(ground.height, 14.0));
        assert!(approx(ground.rotation, -12.5));
        assert_eq!(ground.fill, Gray(140));

        // Shrink 0.15 on layer 1, upper variation 0.8
        assert!(approx(top.width, 50.0 * 0.85 * 0.8));
        assert!(approx(top.height, 20.0 * 0.85 * 0.8));
        assert!(approx(top.rotation, -10.0));
        assert!(approx(top.x, 242.5));
        assert!(approx(top.y, ground.y - top.height - 3.0));
    }

    #[test]
    fn test_highest_draws_approach_band_maximums() {
        let builder = StackBuilder::default();
        let plan = LayerPlan::new(vec![1, 1]).unwrap();
        let cairn = builder.build_with_plan(&plan, &mut SequenceSource::constant(1.0));
        let (ground, top) = (&cairn.rocks[0], &cairn.rocks[1]);

        // Base 90 x 45, ground variation 1.3
        assert!(approx(ground.width, 117.0) && approx(ground.height, 58.5));
        assert!(approx(ground.rotation, 12.5));
        assert_eq!(ground.fill, Gray(239));
        assert_eq!(ground.points.len(), 11);

        // Shrink 0.25 on layer 1, upper variation 1.2
        assert!(approx(top.width, 90.0 * 0.75 * 1.2));
        assert!(approx(top.height, 45.0 * 0.75 * 1.2));
        assert!(approx(top.rotation, 10.0));
        assert!(approx(top.x, 257.5));
        assert!(approx(top.y, ground.y - top.height + 3.0));
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let config = StackConfig {
            layer_count: CountRange::new(5, 3),
            ..Default::default()
        };
        assert!(matches!(StackBuilder::try_new(config), Err(Error::Config(_))));
        assert!(StackBuilder::try_new(StackConfig::default()).is_ok());
    }

    #[test]
    fn test_unvalidated_inverted_ranges_still_build() {
        let config = StackConfig {
            layer_count: CountRange::new(5, 3),
            base_rocks: CountRange::new(4, 2),
            gray: CountRange::new(200, 150),
            ..Default::default()
        };
        let cairn = StackBuilder::new(config).build(&mut EntropySource::seeded(1));

        // Inverted ranges collapse to their min
        assert_eq!(cairn.layer_count(), 5);
        assert_eq!(cairn.layers.last().map(|l| l.rock_count), Some(1));
        assert!(cairn.rocks.iter().all(|r| r.fill == Gray(200)));
    }

    #[test]
    fn test_same_seed_same_cairn() {
        let builder = StackBuilder::default();
        let a = builder.build(&mut EntropySource::seeded(2024));
        let b = builder.build(&mut EntropySource::seeded(2024));
        assert_eq!(a, b);
    }

    #[test]
    fn test_regenerate_differs() {
        let builder = StackBuilder::default();
        let mut rng = EntropySource::seeded(5);
        let a = builder.build(&mut rng);
        let b = builder.build(&mut rng);
        assert_ne!(a, b);
    }
}
