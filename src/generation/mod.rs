//! Cairn generation pipeline.
//!
//! 1. Layer plan (layer count and rocks per layer)
//! 2. Stack builder (size, position, support per rock)
//! 3. Shape synthesizer (irregular outline per rock)
//!
//! All randomness flows through a [`RandomSource`].

pub mod config;
pub mod layer_plan;
pub mod random;
pub mod rock;
pub mod shape_gen;
pub mod stack_gen;

pub use config::{CountRange, ShapeConfig, Span, StackConfig};
pub use layer_plan::LayerPlan;
pub use random::{EntropySource, RandomSource, SequenceSource};
pub use rock::{Cairn, Gray, LayerSummary, Rock};
pub use shape_gen::ShapeSynthesizer;
pub use stack_gen::StackBuilder;
