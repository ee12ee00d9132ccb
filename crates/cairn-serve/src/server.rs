//! TCP accept loop and per-connection request handling

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::error::ServeError;
use crate::http::{Method, Request, Response, Status};

/// Upper bound on the request head
const MAX_HEAD_BYTES: usize = 16 * 1024;
/// Time a client gets to send its request head
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait that the application implements to answer GET and HEAD requests.
///
/// HEAD is answered with the GET response minus its body, so handlers never
/// see the difference. Other methods are rejected before reaching the handler.
pub trait RequestHandler: Send + Sync + 'static {
    fn handle(&mut self, request: &Request) -> Result<Response, ServeError>;
}

/// Server handle - keep this alive to keep the server running
pub struct HttpServer {
    local_addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl HttpServer {
    /// Bind `addr` and start accepting in the background.
    pub async fn start(
        handler: Arc<Mutex<dyn RequestHandler>>,
        addr: SocketAddr,
    ) -> Result<Self, ServeError> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            ServeError::Config(format!("failed to bind {addr}: {e}"))
        })?;
        let local_addr = listener.local_addr()?;
        log::info!("HTTP server listening on http://{}", local_addr);

        let handle = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        log::debug!("Client connected from {}", peer);
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, handler).await;
                        });
                    }
                    Err(e) => {
                        log::error!("HTTP server accept error: {}", e);
                    }
                }
            }
        });

        Ok(Self { local_addr, handle })
    }

    /// Actual bound address (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run until the accept loop ends.
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            log::error!("HTTP server task ended: {}", e);
        }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

async fn handle_connection(stream: TcpStream, handler: Arc<Mutex<dyn RequestHandler>>) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    let (response, include_body) = match tokio::time::timeout(READ_TIMEOUT, read_head(&mut reader)).await {
        Ok(Ok(head)) => respond(&head, &handler).await,
        Ok(Err(e)) => (e.to_response(), true),
        Err(_) => {
            log::debug!("Client timed out before sending a request");
            return;
        }
    };

    if let Err(e) = writer.write_all(&response.to_bytes(include_body)).await {
        log::error!("HTTP server write error: {}", e);
        return;
    }
    if let Err(e) = writer.flush().await {
        log::error!("HTTP server flush error: {}", e);
    }
}

/// Read lines up to and including the blank line ending the head.
///
/// Never buffers more than `MAX_HEAD_BYTES + 1`, even when no newline arrives.
async fn read_head<R>(reader: &mut R) -> Result<String, ServeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head = String::new();
    loop {
        let before = head.len();
        let budget = (MAX_HEAD_BYTES + 1 - before) as u64;
        let mut limited = (&mut *reader).take(budget);
        let n = limited.read_line(&mut head).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => ServeError::BadRequest("request head is not UTF-8".into()),
            _ => ServeError::Io(e),
        })?;
        if n == 0 {
            return Err(ServeError::BadRequest("connection closed mid-request".into()));
        }
        if head.len() > MAX_HEAD_BYTES {
            return Err(ServeError::BadRequest("request head too large".into()));
        }
        let line = &head[before..];
        if line == "\r\n" || line == "\n" {
            return Ok(head);
        }
    }
}

/// Parse, dispatch and pick whether the body goes on the wire.
async fn respond(head: &str, handler: &Arc<Mutex<dyn RequestHandler>>) -> (Response, bool) {
    let request = match Request::parse(head) {
        Ok(request) => request,
        Err(e) => return (e.to_response(), true),
    };
    log::info!(
        "{:?} {} ({})",
        request.method,
        request.path,
        request.header("user-agent").unwrap_or("-")
    );

    let include_body = match &request.method {
        Method::Get => true,
        Method::Head => false,
        Method::Other(method) => {
            log::debug!("Rejecting method {}", method);
            let response = Response::text(Status::MethodNotAllowed, Status::MethodNotAllowed.reason())
                .with_header("Allow", "GET, HEAD");
            return (response, true);
        }
    };

    let result = {
        let mut h = handler.lock().await;
        h.handle(&request)
    };
    let response = result.unwrap_or_else(|e| e.to_response());
    (response, include_body)
}
