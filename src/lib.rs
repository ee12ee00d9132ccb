//! Cairn - procedural stacked-rock drawings rendered as SVG

pub mod core;
pub mod math;
pub mod generation;
pub mod render;
pub mod app;
