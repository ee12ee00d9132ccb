//! Mathematical utilities for 2D layout

pub mod rect;
pub mod polygon;

pub use rect::Rect;
