//! HTML page wrapping a rendered cairn with a regenerate button.
//!
//! Visibility and timing live entirely in the page script; the generator
//! never waits on them.

use serde::{Deserialize, Serialize};

/// Presentation timings in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transition {
    /// Delay before the first fade in after load
    pub reveal_delay_ms: u32,
    /// Hidden time between pressing regenerate and swapping the drawing
    pub regenerate_delay_ms: u32,
    /// Opacity transition length
    pub fade_ms: u32,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 100,
            regenerate_delay_ms: 200,
            fade_ms: 1000,
        }
    }
}

/// Path the page script fetches a fresh drawing from
pub const SVG_ENDPOINT: &str = "/cairn.svg";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Cairn</title>
<style>
  body { margin: 0; background: #ffffff; font-family: system-ui, sans-serif; }
  .stage { display: flex; align-items: center; justify-content: center; min-height: 100vh; }
  .cairn { opacity: 0; transition: opacity __FADE_MS__ms ease-in-out; }
  .cairn.visible { opacity: 1; }
  .cairn svg { max-width: 100%; height: auto; }
  .controls { text-align: center; margin-top: 2rem; }
  .controls button {
    padding: 0.5rem 1.5rem; font-size: 0.875rem; font-weight: 500; color: #4b5563;
    background: none; border: 1px solid #d1d5db; border-radius: 9999px; cursor: pointer;
    transition: color 200ms, border-color 200ms;
  }
  .controls button:hover { color: #1f2937; border-color: #9ca3af; }
</style>
</head>
<body>
<div class="stage">
  <div id="cairn" class="cairn">
    <div id="drawing">
__SVG__
    </div>
    <div class="controls">
      <button id="regenerate" type="button">Generate New Cairn</button>
    </div>
  </div>
</div>
<script>
  const container = document.getElementById('cairn');
  const drawing = document.getElementById('drawing');
  const button = document.getElementById('regenerate');

  setTimeout(() => container.classList.add('visible'), __REVEAL_MS__);

  button.addEventListener('click', () => {
    container.classList.remove('visible');
    setTimeout(async () => {
      try {
        const response = await fetch('__ENDPOINT__', { cache: 'no-store' });
        if (response.ok) {
          drawing.innerHTML = await response.text();
        }
      } finally {
        container.classList.add('visible');
      }
    }, __REGENERATE_MS__);
  });
</script>
</body>
</html>
"#;

/// Full HTML document embedding `svg` inline.
pub fn render_page(svg: &str, transition: &Transition) -> String {
    TEMPLATE
        .replace("__FADE_MS__", &transition.fade_ms.to_string())
        .replace("__REVEAL_MS__", &transition.reveal_delay_ms.to_string())
        .replace("__REGENERATE_MS__", &transition.regenerate_delay_ms.to_string())
        .replace("__ENDPOINT__", SVG_ENDPOINT)
        .replace("__SVG__", svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_embeds_svg_and_timings() {
        let html = render_page("<svg id=\"probe\"></svg>", &Transition::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<svg id=\"probe\"></svg>"));
        assert!(html.contains("Generate New Cairn"));
        assert!(html.contains("transition: opacity 1000ms"));
        assert!(html.contains("'visible'), 100);"));
        assert!(html.contains("}, 200);"));
        assert!(html.contains("fetch('/cairn.svg'"));
        assert!(!html.contains("__"));
    }

    #[test]
    fn test_custom_transition() {
        let transition = Transition { reveal_delay_ms: 0, regenerate_delay_ms: 50, fade_ms: 300 };
        let html = render_page("", &transition);
        assert!(html.contains("transition: opacity 300ms"));
        assert!(html.contains("}, 50);"));
    }
}
