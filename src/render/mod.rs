//! Output surfaces: SVG drawing and the HTML page around it

pub mod page;
pub mod svg;

pub use page::{render_page, Transition};
pub use svg::{GroundLine, RenderConfig, SvgRenderer};
