//! Layer structure: how many layers, how many rocks in each.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::generation::config::StackConfig;
use crate::generation::random::RandomSource;

/// Rocks per layer, ground layer first. The last layer always holds one rock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerPlan {
    counts: Vec<usize>,
}

impl LayerPlan {
    /// Explicit plan. Must be non-empty, have no empty layer and end in a single rock.
    pub fn new(counts: impl Into<Vec<usize>>) -> Result<Self> {
        let counts = counts.into();
        match counts.last() {
            None => return Err(Error::InvalidPlan("plan has no layers".into())),
            Some(&top) if top != 1 => {
                return Err(Error::InvalidPlan(format!("top layer must hold 1 rock, got {top}")));
            }
            _ => {}
        }
        if let Some(layer) = counts.iter().position(|&c| c == 0) {
            return Err(Error::InvalidPlan(format!("layer {layer} is empty")));
        }
        Ok(Self { counts })
    }

    /// Random plan: the count of each layer is the running counter minus 0 or 1,
    /// and the counter then shrinks by 0 or 1 from that count. Plateaus are
    /// allowed, growth is not.
    pub fn random(config: &StackConfig, rng: &mut impl RandomSource) -> Self {
        let num_layers = config.layer_count.sample(rng) as usize;
        let mut max_rocks = config.base_rocks.sample(rng) as usize;

        let mut counts = Vec::with_capacity(num_layers);
        for i in 0..num_layers {
            if i == num_layers - 1 {
                counts.push(1);
            } else {
                let rocks = max_rocks.saturating_sub(rng.below(2) as usize).max(1);
                counts.push(rocks);
                max_rocks = rocks.saturating_sub(rng.below(2) as usize).max(1);
            }
        }
        Self { counts }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn layer_count(&self) -> usize {
        self.counts.len()
    }

    pub fn total_rocks(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::random::{EntropySource, SequenceSource};

    #[test]
    fn test_new_accepts_valid_plan() {
        let plan = LayerPlan::new(vec![3, 2, 1]).unwrap();
        assert_eq!(plan.counts(), &[3, 2, 1]);
        assert_eq!(plan.layer_count(), 3);
        assert_eq!(plan.total_rocks(), 6);
    }

    #[test]
    fn test_new_rejects_invalid_plans() {
        assert!(matches!(LayerPlan::new(Vec::new()), Err(Error::InvalidPlan(_))));
        assert!(matches!(LayerPlan::new(vec![3, 2]), Err(Error::InvalidPlan(_))));
        assert!(matches!(LayerPlan::new(vec![3, 0, 1]), Err(Error::InvalidPlan(_))));
    }

    #[test]
    fn test_random_at_midpoint() {
        // 0.5 -> 4 layers, counter 4, and floor(0.5 * 2) removes a rock at every step
        let plan = LayerPlan::random(&StackConfig::default(), &mut SequenceSource::constant(0.5));
        assert_eq!(plan.counts(), &[3, 1, 1, 1]);
    }

    #[test]
    fn test_random_at_low_end() {
        // 0.0 -> 3 layers, counter 3, never shrinks
        let plan = LayerPlan::random(&StackConfig::default(), &mut SequenceSource::constant(0.0));
        assert_eq!(plan.counts(), &[3, 3, 1]);
    }

    #[test]
    fn test_random_shrinks_with_high_draws() {
        // 0.9 -> 5 layers, counter 5; each step removes one rock twice
        let plan = LayerPlan::random(&StackConfig::default(), &mut SequenceSource::constant(0.9));
        assert_eq!(plan.counts(), &[4, 2, 1, 1, 1]);
    }

    #[test]
    fn test_random_invariants() {
        let config = StackConfig::default();
        let mut rng = EntropySource::seeded(2024);
        for _ in 0..500 {
            let plan = LayerPlan::random(&config, &mut rng);
            assert!((3..=5).contains(&plan.layer_count()));
            assert_eq!(plan.counts().last(), Some(&1));
            assert!(plan.counts().iter().all(|&c| c >= 1));
            assert!(plan.counts()[0] <= 5);
            // Never grows from one layer to the next
            for pair in plan.counts().windows(2) {
                assert!(pair[1] <= pair[0], "{:?}", plan.counts());
            }
        }
    }
}
