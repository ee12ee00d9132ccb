//! Pluggable uniform random source.
//!
//! Every draw made by the shape synthesizer and the stack builder goes
//! through [`RandomSource`], so a seeded or scripted source reproduces a
//! cairn bit for bit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform values in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform value in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }

    /// Symmetric jitter in `[-span/2, span/2)`.
    fn centered(&mut self, span: f32) -> f32 {
        (self.next_unit() - 0.5) * span
    }

    /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
    fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        ((self.next_unit() * n as f32) as u32).min(n - 1)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

/// Production source backed by `StdRng`.
#[derive(Clone, Debug)]
pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    /// Seed from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Deterministic source; equal seeds give equal sequences.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl RandomSource for EntropySource {
    fn next_unit(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }
}

/// Scripted source that cycles through a fixed list of values.
///
/// Values are clamped into `[0, 1)` on construction.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

/// Largest `f32` strictly below 1.0
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

impl SequenceSource {
    /// Cycle through `values`. An empty list behaves like `constant(0.0)`.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let mut values: Vec<f32> = values.into();
        if values.is_empty() {
            values.push(0.0);
        }
        for v in &mut values {
            *v = v.clamp(0.0, BELOW_ONE);
        }
        Self { values, cursor: 0 }
    }

    /// Always return `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f32 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
