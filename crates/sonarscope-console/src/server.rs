//! [`ConsoleServer`] – minimal HTTP server for the radar console.
//!
//! Listens on `0.0.0.0:8080` (configurable via [`ConsoleServer::with_port`])
//! with a pending-connection backlog of 5 and serves clients strictly one at
//! a time: the station is a single-operator console and the serial accept
//! loop keeps the transport as small as the hardware it fronts.
//!
//! Every request is answered by the [`StatusService`] and the connection is
//! closed.  Clients that send nothing within the read timeout are dropped
//! without a response.

use std::net::SocketAddr;
use std::time::Duration;

use sonarscope_types::RadarError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::service::StatusService;

/// Default TCP port for the console HTTP server.
pub const DEFAULT_PORT: u16 = 8080;

/// Pending connections the OS queues while a client is being served.
const BACKLOG: u32 = 5;

/// How long a connected client gets to send its request.
const READ_TIMEOUT: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// ConsoleServer
// ---------------------------------------------------------------------------

/// One-connection-at-a-time HTTP server wrapping a [`StatusService`].
pub struct ConsoleServer {
    service: StatusService,
    port: u16,
}

impl ConsoleServer {
    /// Create a server backed by `service` on the [`DEFAULT_PORT`].
    pub fn new(service: StatusService) -> Self {
        Self {
            service,
            port: DEFAULT_PORT,
        }
    }

    /// Override the listening port (builder-style).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Bind the listening socket with the configured backlog.
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::Transport`] when the socket cannot be created,
    /// bound, or put into the listening state.
    pub fn bind(&self) -> Result<TcpListener, RadarError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let socket = TcpSocket::new_v4()
            .map_err(|e| RadarError::Transport(format!("socket create error: {e}")))?;
        socket
            .set_reuseaddr(true)
            .map_err(|e| RadarError::Transport(format!("socket option error: {e}")))?;
        socket
            .bind(addr)
            .map_err(|e| RadarError::Transport(format!("bind error on {addr}: {e}")))?;
        socket
            .listen(BACKLOG)
            .map_err(|e| RadarError::Transport(format!("listen error on {addr}: {e}")))
    }

    /// Bind and serve until the shutdown signal flips.
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::Transport`] when binding fails.  Per-connection
    /// failures (including read timeouts) are logged and never stop the
    /// server.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<(), RadarError> {
        let listener = self.bind()?;
        info!(port = self.port, "console listening");
        self.serve(listener, shutdown).await;
        Ok(())
    }

    /// Serve an already-bound listener until the shutdown signal flips.
    ///
    /// Split out from [`run`][Self::run] so tests can bind an ephemeral port
    /// and learn the actual address before serving.
    pub async fn serve(self, listener: TcpListener, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                info!("console task stopping");
                break;
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    // Sender gone means the station is tearing down.
                    if changed.is_err() {
                        break;
                    }
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            // One client at a time: serve to completion before
                            // the next accept, the backlog holds the rest.
                            if let Err(e) = self.handle_connection(stream, peer).await {
                                warn!(%peer, error = %e, "client connection failed");
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "accept error");
                        }
                    }
                }
            }
        }
    }

    async fn handle_connection(
        &self,
        mut stream: TcpStream,
        peer: SocketAddr,
    ) -> Result<(), RadarError> {
        let mut buf = [0u8; 1024];
        let n = match tokio::time::timeout(READ_TIMEOUT, stream.read(&mut buf)).await {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                return Err(RadarError::Transport(format!("read error from {peer}: {e}")));
            }
            Err(_) => {
                // Slow client: drop it and move on to the next in the backlog.
                debug!(%peer, "client read timed out");
                return Ok(());
            }
        };
        if n == 0 {
            debug!(%peer, "client closed without a request");
            return Ok(());
        }

        let request = String::from_utf8_lossy(&buf[..n]);
        debug!(%peer, line = request.lines().next().unwrap_or(""), "request");

        let response = self.service.respond(&request);
        stream
            .write_all(response.as_bytes())
            .await
            .map_err(|e| RadarError::Transport(format!("write error to {peer}: {e}")))?;
        stream
            .shutdown()
            .await
            .map_err(|e| RadarError::Transport(format!("close error to {peer}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
