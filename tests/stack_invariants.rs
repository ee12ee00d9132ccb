//! Property-based tests for cairn generation using the `proptest` crate.

use proptest::prelude::*;

use cairn::core::types::Vec2;
use cairn::generation::{
    Cairn, EntropySource, LayerPlan, SequenceSource, ShapeSynthesizer, Span, StackBuilder,
    StackConfig,
};
use cairn::math::polygon;
use cairn::render::SvgRenderer;

const TOL: f32 = 1e-3;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Any seed for the production source.
fn arb_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Scripted draw sequences. Values stay clear of 1.0, where the top layer's
/// shrink can drive a rock to zero size.
fn arb_draws() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(0.0f32..0.95, 1..64)
}

/// Arbitrary outline center in a reasonable coordinate range.
fn arb_center() -> impl Strategy<Value = (f32, f32)> {
    (-1000.0f32..1000.0, -1000.0f32..1000.0)
}

/// Arbitrary positive box extent.
fn arb_extent() -> impl Strategy<Value = f32> {
    1.0f32..500.0
}

/// Width band of one layer: shared base size, shrink for the layer, then
/// the per-rock variation.
fn size_band(config: &StackConfig, base: Span, layer: usize) -> (f32, f32) {
    let variation = if layer == 0 { config.ground_variation } else { config.upper_variation };
    let l = layer as f32;
    let lo = base.min * (1.0 - l * config.shrink_per_layer.max) * variation.min;
    let hi = base.max * (1.0 - l * config.shrink_per_layer.min) * variation.max;
    (lo, hi)
}

fn check_cairn(config: &StackConfig, cairn: &Cairn) -> Result<(), TestCaseError> {
    // Layer structure
    prop_assert!((3..=5).contains(&cairn.layer_count()), "{} layers", cairn.layer_count());
    prop_assert_eq!(cairn.layers.last().map(|l| l.rock_count), Some(1));
    for (i, summary) in cairn.layers.iter().enumerate() {
        prop_assert_eq!(summary.index, i);
        prop_assert!(summary.rock_count >= 1);
        prop_assert_eq!(cairn.layer(i).count(), summary.rock_count);
        let highest = cairn.layer(i).map(|r| r.y).fold(f32::INFINITY, f32::min);
        prop_assert_eq!(summary.ceiling, highest - config.ceiling_gap);
    }
    // Plateaus are allowed, growth is not
    for pair in cairn.layers.windows(2) {
        prop_assert!(pair[1].rock_count <= pair[0].rock_count, "{:?}", cairn.layers);
    }
    for pair in cairn.rocks.windows(2) {
        prop_assert!(pair[0].layer <= pair[1].layer);
    }

    for (i, rock) in cairn.rocks.iter().enumerate() {
        prop_assert!(rock.width > 0.0 && rock.height > 0.0);
        prop_assert!((8..=11).contains(&rock.points.len()));
        prop_assert!(polygon::all_finite(&rock.points));
        prop_assert!(!polygon::is_degenerate(&rock.points));
        prop_assert!((140..240).contains(&rock.fill.0));

        let (w_lo, w_hi) = size_band(config, config.base_width, rock.layer);
        let (h_lo, h_hi) = size_band(config, config.base_height, rock.layer);
        prop_assert!(rock.width >= w_lo - TOL && rock.width <= w_hi + TOL, "width {} layer {}", rock.width, rock.layer);
        prop_assert!(rock.height >= h_lo - TOL && rock.height <= h_hi + TOL, "height {} layer {}", rock.height, rock.layer);

        if rock.layer == 0 {
            prop_assert!(rock.rotation.abs() <= config.ground_rotation * 0.5);
            prop_assert!(rock.support.is_none());
            prop_assert!((rock.bottom() - config.ground_y).abs() < TOL);
            continue;
        }
        prop_assert!(rock.rotation.abs() <= config.upper_rotation * 0.5);

        let support_index = rock.support.ok_or_else(|| TestCaseError::fail("upper rock without support"))?;
        prop_assert!(support_index < i, "support placed after rock {}", i);
        let support = &cairn.rocks[support_index];
        prop_assert_eq!(support.layer + 1, rock.layer);

        // Bottom edge within the contact jitter of the support's top edge
        let contact = rock.y - (support.y - rock.height);
        prop_assert!(contact.abs() <= 3.0 + TOL, "rock {} off its support by {}", i, contact);
    }

    // Rocks of one layer share a base size and differ only by their own variation
    for layer in 0..cairn.layer_count() {
        let variation = if layer == 0 { config.ground_variation } else { config.upper_variation };
        let rocks: Vec<_> = cairn.layer(layer).collect();
        let first = rocks[0];
        for rock in &rocks[1..] {
            let aspect = (rock.width / rock.height) / (first.width / first.height);
            prop_assert!((aspect - 1.0).abs() < 1e-3, "aspect drifts by {}", aspect);
            let ratio = rock.width / first.width;
            prop_assert!(
                ratio >= variation.min / variation.max - TOL && ratio <= variation.max / variation.min + TOL,
                "variation ratio {} on layer {}", ratio, layer
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// 1. Every seeded cairn is well formed
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn seeded_cairns_hold_invariants(seed in arb_seed()) {
        let config = StackConfig::default();
        let cairn = StackBuilder::new(config.clone()).build(&mut EntropySource::seeded(seed));
        check_cairn(&config, &cairn)?;
    }
}

// ---------------------------------------------------------------------------
// 2. Any scripted draw sequence still yields a well-formed cairn
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn scripted_draws_hold_invariants(draws in arb_draws()) {
        let config = StackConfig::default();
        let cairn = StackBuilder::new(config.clone()).build(&mut SequenceSource::new(draws));
        check_cairn(&config, &cairn)?;
    }
}

// ---------------------------------------------------------------------------
// 3. Same seed, same drawing
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn seeded_output_is_bit_exact(seed in arb_seed()) {
        let builder = StackBuilder::default();
        let renderer = SvgRenderer::default();
        let a = renderer.render(&builder.build(&mut EntropySource::seeded(seed)));
        let b = renderer.render(&builder.build(&mut EntropySource::seeded(seed)));
        prop_assert_eq!(a, b);
    }
}

// ---------------------------------------------------------------------------
// 4. Shrink is scaled by the layer index, not compounded
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn shrink_scales_with_layer_index(u in 0.0f32..0.95) {
        let config = StackConfig::default();
        let plan = LayerPlan::new(vec![2, 2, 1]).unwrap();
        let cairn = StackBuilder::new(config.clone()).build_with_plan(&plan, &mut SequenceSource::constant(u));

        // A constant source gives every layer the same base width and variation
        let lerp = |span: Span| span.min + u * (span.max - span.min);
        let unshrunk = lerp(config.base_width) * lerp(config.upper_variation);
        let layer_1 = cairn.layer(1).next().unwrap().width;
        let layer_2 = cairn.layer(2).next().unwrap().width;

        let shrink = 1.0 - layer_1 / unshrunk;
        prop_assert!(
            shrink >= config.shrink_per_layer.min - TOL && shrink <= config.shrink_per_layer.max + TOL,
            "shrink {}", shrink
        );
        prop_assert!((layer_2 - unshrunk * (1.0 - 2.0 * shrink)).abs() < 1e-2, "layer 2 width {}", layer_2);
    }
}

// ---------------------------------------------------------------------------
// 5. Outlines stay inside the variation box around their center
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn outline_stays_inside_variation_box(
        (cx, cy) in arb_center(),
        width in arb_extent(),
        height in arb_extent(),
        seed in arb_seed(),
    ) {
        let synth = ShapeSynthesizer::default();
        let center = Vec2::new(cx, cy);
        let points = synth.synthesize(center, width, height, 0.0, &mut EntropySource::seeded(seed));

        prop_assert!((8..=11).contains(&points.len()), "{} vertices", points.len());
        prop_assert!(polygon::all_finite(&points));
        prop_assert!(!polygon::is_degenerate(&points));

        let reach = Vec2::new(width, height) * 0.5 * 1.3;
        for p in &points {
            let offset = (*p - center).abs();
            prop_assert!(offset.x <= reach.x * (1.0 + 1e-4) + TOL, "{:?} outside {:?}", p, reach);
            prop_assert!(offset.y <= reach.y * (1.0 + 1e-4) + TOL, "{:?} outside {:?}", p, reach);
        }
    }
}

// ---------------------------------------------------------------------------
// 6. The rotation hint never moves the outline
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rotation_hint_is_ignored(
        (cx, cy) in arb_center(),
        width in arb_extent(),
        height in arb_extent(),
        rotation in -180.0f32..180.0,
        seed in arb_seed(),
    ) {
        let synth = ShapeSynthesizer::default();
        let center = Vec2::new(cx, cy);
        let a = synth.synthesize(center, width, height, 0.0, &mut EntropySource::seeded(seed));
        let b = synth.synthesize(center, width, height, rotation, &mut EntropySource::seeded(seed));
        prop_assert_eq!(a, b);
    }
}

// ---------------------------------------------------------------------------
// Scripted scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_consecutive_cairns_differ() {
    let builder = StackBuilder::default();
    let mut rng = EntropySource::from_entropy();
    let a = builder.build(&mut rng);
    let b = builder.build(&mut rng);
    assert_ne!(a, b);
}

#[test]
fn test_extreme_draws_stay_valid() {
    let config = StackConfig::default();
    let builder = StackBuilder::new(config.clone());
    for value in [0.0, 0.25, 0.5, 0.75, 0.9] {
        let cairn = builder.build(&mut SequenceSource::constant(value));
        check_cairn(&config, &cairn).unwrap();
    }
}

#[test]
fn test_midpoint_plan_positions() {
    let builder = StackBuilder::default();
    let plan = LayerPlan::new(vec![3, 2, 1]).unwrap();
    let cairn = builder.build_with_plan(&plan, &mut SequenceSource::constant(0.5));

    let ground: Vec<f32> = cairn.layer(0).map(|r| r.x).collect();
    let middle: Vec<f32> = cairn.layer(1).map(|r| r.x).collect();
    let top: Vec<f32> = cairn.layer(2).map(|r| r.x).collect();

    let (lo, hi) = (ground[0], ground[2]);
    for x in &middle {
        assert!(*x >= lo - TOL && *x <= hi + TOL);
    }
    let mean = middle.iter().sum::<f32>() / middle.len() as f32;
    assert!((top[0] - mean).abs() < TOL);
}

#[test]
fn test_custom_config_is_honored() {
    let config = StackConfig {
        center_x: 400.0,
        ground_y: 500.0,
        ..Default::default()
    };
    let builder = StackBuilder::try_new(config).unwrap();
    let plan = LayerPlan::new(vec![1, 1]).unwrap();
    let cairn = builder.build_with_plan(&plan, &mut EntropySource::seeded(6));

    assert_eq!(cairn.rocks[0].x, 400.0);
    assert!((cairn.rocks[0].bottom() - 500.0).abs() < TOL);
    assert_eq!(cairn.rocks[1].support, Some(0));
}
