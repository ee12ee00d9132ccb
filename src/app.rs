//! HTTP routes for the cairn page.
//!
//! Generated routes come first, then static assets, then the fallback
//! policy. Every generating request builds and discards its own cairn.

use cairn_serve::{AssetStore, FallbackPolicy, Request, RequestHandler, Response, ServeConfig, ServeError};

use crate::generation::{Cairn, EntropySource, StackBuilder};
use crate::render::{render_page, SvgRenderer, Transition};

const HTML: &str = "text/html; charset=utf-8";
const SVG: &str = "image/svg+xml";
const JSON: &str = "application/json";

/// Request handler serving the generator and an optional asset directory.
pub struct CairnApp {
    builder: StackBuilder,
    renderer: SvgRenderer,
    transition: Transition,
    rng: EntropySource,
    assets: Option<AssetStore>,
    fallback: FallbackPolicy,
}

impl CairnApp {
    pub fn new(builder: StackBuilder, renderer: SvgRenderer, transition: Transition) -> Self {
        Self {
            builder,
            renderer,
            transition,
            rng: EntropySource::from_entropy(),
            assets: None,
            fallback: FallbackPolicy::default(),
        }
    }

    /// Apply the asset directory and fallback from a server config.
    pub fn from_config(config: &ServeConfig) -> Result<Self, ServeError> {
        let mut app = Self::new(StackBuilder::default(), SvgRenderer::default(), Transition::default());
        app.fallback = config.fallback;
        if let Some(dir) = &config.assets {
            app.assets = Some(AssetStore::open(dir)?);
        }
        Ok(app)
    }

    pub fn with_builder(mut self, builder: StackBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_assets(mut self, assets: AssetStore) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Fresh cairn: seeded when `?seed=N` is given, from entropy otherwise.
    fn generate(&mut self, request: &Request) -> Result<Cairn, ServeError> {
        match request.query_param("seed") {
            Some(raw) => {
                let seed: u64 = raw
                    .parse()
                    .map_err(|_| ServeError::BadRequest(format!("invalid seed {raw:?}")))?;
                Ok(self.builder.build(&mut EntropySource::seeded(seed)))
            }
            None => Ok(self.builder.build(&mut self.rng)),
        }
    }

    fn page(&mut self, request: &Request) -> Result<Response, ServeError> {
        let cairn = self.generate(request)?;
        let svg = self.renderer.render(&cairn);
        Ok(Response::ok(HTML, render_page(&svg, &self.transition)))
    }

    fn asset_or_fallback(&mut self, request: &Request) -> Result<Response, ServeError> {
        let missing = match self.assets.as_mut().map(|store| store.get(&request.path)) {
            Some(Ok(asset)) => return Ok(Response::ok(asset.content_type, asset.body.to_vec())),
            Some(Err(ServeError::NotFound(detail))) => detail,
            Some(Err(e)) => return Err(e),
            None => request.path.clone(),
        };
        match self.fallback {
            FallbackPolicy::Index => self.page(request),
            FallbackPolicy::NotFound => Err(ServeError::NotFound(missing)),
        }
    }
}

impl Default for CairnApp {
    fn default() -> Self {
        Self::new(StackBuilder::default(), SvgRenderer::default(), Transition::default())
    }
}

impl RequestHandler for CairnApp {
    fn handle(&mut self, request: &Request) -> Result<Response, ServeError> {
        match request.path.as_str() {
            "/" | "/index.html" => self.page(request),
            "/cairn.svg" => {
                let cairn = self.generate(request)?;
                Ok(Response::ok(SVG, self.renderer.render(&cairn)).with_header("Cache-Control", "no-store"))
            }
            "/cairn.json" => {
                let cairn = self.generate(request)?;
                let json = cairn.to_json().map_err(|e| ServeError::Internal(e.to_string()))?;
                Ok(Response::ok(JSON, json).with_header("Cache-Control", "no-store"))
            }
            _ => self.asset_or_fallback(request),
        }
    }
}
