//! SVG output for a generated cairn.
//!
//! Rocks are drawn back layer first: the list is stable-sorted by layer,
//! descending, so the ground layer is painted last and sits on top.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::generation::rock::{Cairn, Rock};

/// Faint horizon line under the cairn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundLine {
    pub from: Vec2,
    pub to: Vec2,
    pub stroke: String,
    pub stroke_width: f32,
    pub opacity: f32,
}

impl Default for GroundLine {
    fn default() -> Self {
        Self {
            from: Vec2::new(100.0, 330.0),
            to: Vec2::new(400.0, 330.0),
            stroke: "#f0f0f0".to_string(),
            stroke_width: 1.0,
            opacity: 0.5,
        }
    }
}

/// Canvas and decoration settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Logical canvas width, also used for the viewBox
    pub width: u32,
    /// Logical canvas height, also used for the viewBox
    pub height: u32,
    /// `None` disables the ground line
    pub ground: Option<GroundLine>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 400,
            ground: Some(GroundLine::default()),
        }
    }
}

/// Outline stroke of ground-layer rocks
const GROUND_STROKE_WIDTH: f32 = 2.5;
/// Outline stroke of every other layer
const UPPER_STROKE_WIDTH: f32 = 1.8;

/// Turns rock lists into SVG markup.
#[derive(Clone, Debug, Default)]
pub struct SvgRenderer {
    config: RenderConfig,
}

impl SvgRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Full `<svg>` document for a cairn.
    pub fn render(&self, cairn: &Cairn) -> String {
        self.render_rocks(&cairn.rocks)
    }

    /// Full `<svg>` document for an arbitrary rock list.
    pub fn render_rocks(&self, rocks: &[Rock]) -> String {
        let (w, h) = (self.config.width, self.config.height);
        let mut out = String::with_capacity(512 + rocks.len() * 1024);
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="max-width: 100%; height: auto">"#
        ));
        out.push('\n');

        if let Some(ground) = &self.config.ground {
            out.push_str(&format!(
                r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
                ground.from.x, ground.from.y, ground.to.x, ground.to.y,
                ground.stroke, ground.stroke_width, ground.opacity,
            ));
            out.push('\n');
        }

        for rock in draw_order(rocks) {
            write_rock(&mut out, rock);
        }

        out.push_str("</svg>\n");
        out
    }
}

/// Rocks in paint order: layer descending, generation order within a layer.
pub fn draw_order(rocks: &[Rock]) -> Vec<&Rock> {
    let mut ordered: Vec<&Rock> = rocks.iter().collect();
    // sort_by is stable
    ordered.sort_by(|a, b| b.layer.cmp(&a.layer));
    ordered
}

fn write_rock(out: &mut String, rock: &Rock) {
    let Rock { x, y, width: w, height: h, rotation: rot, .. } = *rock;
    let pivot = rock.pivot();

    out.push_str("  <g>\n");

    // Shadow turns about its own center
    let shadow = Vec2::new(x + 3.0, y + h * 0.9 + 4.0);
    out.push_str(&format!(
        r#"    <ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="rgba(0, 0, 0, 0.2)" transform="rotate({} {} {})"/>"#,
        shadow.x, shadow.y, w * 0.35, h * 0.12, rot * 0.4, shadow.x, shadow.y,
    ));
    out.push('\n');

    let stroke_width = if rock.layer == 0 { GROUND_STROKE_WIDTH } else { UPPER_STROKE_WIDTH };
    out.push_str(&format!(
        r##"    <polygon points="{}" fill="{}" stroke="#000000" stroke-width="{}" stroke-linejoin="round" transform="rotate({} {} {})"/>"##,
        points_attr(&rock.points), rock.fill.to_css(), stroke_width, rot, pivot.x, pivot.y,
    ));
    out.push('\n');

    out.push_str(&format!(
        r#"    <ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="rgba(255, 255, 255, 0.4)" transform="rotate({} {} {})"/>"#,
        x - w * 0.15, y + h * 0.3, w * 0.15, h * 0.1, rot - 10.0, pivot.x, pivot.y,
    ));
    out.push('\n');

    out.push_str(&format!(
        r#"    <ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="rgba(255, 255, 255, 0.25)" transform="rotate({} {} {})"/>"#,
        x + w * 0.1, y + h * 0.7, w * 0.08, h * 0.05, rot + 20.0, pivot.x, pivot.y,
    ));
    out.push('\n');

    out.push_str("  </g>\n");
}

/// `x,y x,y ...` as used by the `points` attribute
fn points_attr(points: &[Vec2]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
