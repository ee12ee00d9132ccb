//! Static asset store with an in-memory cache
//!
//! Files are read from disk once per path and served from memory after
//! that. Paths that try to leave the asset root are treated as missing.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::ServeError;

/// Document served for `/` and directory paths
pub const INDEX_DOCUMENT: &str = "index.html";

/// Cached file contents with their content type.
#[derive(Clone, Debug)]
pub struct Asset {
    pub content_type: &'static str,
    pub body: Arc<[u8]>,
}

pub struct AssetStore {
    root: PathBuf,
    cache: HashMap<PathBuf, Asset>,
    disk_reads: usize,
}

impl AssetStore {
    /// Open an asset directory. Fails if it is missing or not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ServeError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ServeError::Config(format!(
                "asset directory {} does not exist or is not a directory",
                root.display()
            )));
        }
        log::info!("Serving assets from {}", root.display());
        Ok(Self { root, cache: HashMap::new(), disk_reads: 0 })
    }

    /// Look up a request path such as `/css/site.css`.
    pub fn get(&mut self, request_path: &str) -> Result<Asset, ServeError> {
        let relative = resolve(request_path)
            .ok_or_else(|| ServeError::NotFound(format!("rejected path {request_path}")))?;

        if let Some(asset) = self.cache.get(&relative) {
            return Ok(asset.clone());
        }

        let full = self.root.join(&relative);
        log::debug!("Asset cache miss: {}", full.display());
        if !full.is_file() {
            return Err(ServeError::NotFound(request_path.to_string()));
        }
        let bytes = std::fs::read(&full)?;
        self.disk_reads += 1;

        let asset = Asset {
            content_type: content_type_for(&relative),
            body: Arc::from(bytes),
        };
        log::debug!("Cached {} ({} files, {} disk reads)", relative.display(), self.cache.len() + 1, self.disk_reads);
        self.cache.insert(relative, asset.clone());
        Ok(asset)
    }
}

/// Map a request path to a path relative to the asset root.
/// Returns `None` for anything that could escape the root.
fn resolve(request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => {
                if part.to_str().is_some_and(|s| s.contains('\\')) {
                    return None;
                }
                relative.push(part);
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if relative.as_os_str().is_empty() || request_path.ends_with('/') {
        relative.push(INDEX_DOCUMENT);
    }
    Some(relative)
}

/// Content type by file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "txt" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
