//! Unix socket server implementation

use std::{path::PathBuf, sync::Arc};

use listenfd::ListenFd;
use serde_json::Value;
use tokio::{
    fs,
    net::{UnixListener, UnixStream},
};
use tracing::{debug, error, info, warn};

use crate::{
    core::{error::TransportResult, service::WlanService},
    driver::RadioDriver,
    protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId},
    transport::unix_socket::{
        handler::RequestHandler,
        session::{SessionReader, UnixSocketSession},
    },
};

/// Unix socket server
pub struct UnixSocketServer<D: RadioDriver> {
    socket_path: PathBuf,
    socket_mode: u32,
    handler: Arc<RequestHandler<D>>,
}

impl<D: RadioDriver> UnixSocketServer<D> {
    pub fn new(
        socket_path: impl Into<PathBuf>,
        socket_mode: u32,
        service: Arc<WlanService<D>>,
    ) -> Self {
        Self {
            socket_path: socket_path.into(),
            socket_mode,
            handler: Arc::new(RequestHandler::new(service)),
        }
    }

    /// Take the listener handed over by the service manager, or bind our own
    pub async fn bind(&self) -> std::io::Result<UnixListener> {
        let mut listenfd = ListenFd::from_env();
        if let Some(listener) = listenfd.take_unix_listener(0)? {
            info!("Using socket passed by service manager");
            listener.set_nonblocking(true)?;
            return UnixListener::from_std(listener);
        }

        // Remove stale socket file from a previous run
        if fs::try_exists(&self.socket_path).await? {
            fs::remove_file(&self.socket_path).await?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(self.socket_mode);
            fs::set_permissions(&self.socket_path, permissions).await?;
        }

        info!(
            "Unix socket server listening on {} (mode {:o})",
            self.socket_path.display(),
            self.socket_mode
        );
        Ok(listener)
    }

    /// Accept clients on `listener`, one task per connection
    pub async fn serve(&self, listener: UnixListener) -> std::io::Result<()> {
        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let handler = self.handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, handler).await {
                            error!("Error handling client: {}", e);
                        }
                    });
                }
                Err(e) => {
                    warn!("Error accepting connection: {}", e);
                }
            }
        }
    }

    async fn handle_client(
        stream: UnixStream,
        handler: Arc<RequestHandler<D>>,
    ) -> TransportResult<()> {
        let (read_half, write_half) = stream.into_split();
        let session = UnixSocketSession::new(write_half);
        let mut reader = SessionReader::new(read_half);

        info!("New client connected: {}", session.id());

        while let Some(line) = reader.read_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let response = match parse_request(&line) {
                Ok(request) => {
                    debug!(session = %session.id(), "Handling {:?}", request.request);
                    handler.handle_request(request).await
                }
                Err(response) => response,
            };
            session.send_response(&response).await?;
        }

        info!("Client disconnected: {}", session.id());
        Ok(())
    }
}

/// Decode one line, or build the error reply for it
fn parse_request(line: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        warn!("Malformed JSON from client: {}", e);
        JsonRpcResponse::error(JsonRpcError::parse_error(), RequestId::Null)
    })?;

    let id = value
        .get("id")
        .cloned()
        .and_then(|id| serde_json::from_value::<RequestId>(id).ok())
        .unwrap_or(RequestId::Null);

    serde_json::from_value(value).map_err(|e| {
        warn!("Invalid JSON-RPC request: {}", e);
        JsonRpcResponse::error(JsonRpcError::invalid_request(e.to_string()), id)
    })
}
