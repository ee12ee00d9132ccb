//! Minimal HTTP/1.1 server for the cairn page and its static assets
//!
//! Start the server in your app:
//! ```ignore
//! let handler = Arc::new(Mutex::new(MyHandler::new()));
//! let server = HttpServer::start(handler, "127.0.0.1:8080".parse()?).await?;
//! server.wait().await;
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod http;
pub mod server;

pub use assets::{content_type_for, Asset, AssetStore};
pub use config::{FallbackPolicy, ServeConfig};
pub use error::ServeError;
pub use http::{Method, Request, Response, Status};
pub use server::{HttpServer, RequestHandler};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;
