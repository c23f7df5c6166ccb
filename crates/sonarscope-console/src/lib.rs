//! `sonarscope-console` – The Radar Status Web Console
//!
//! Boots a minimal HTTP server (default port `8080`) that:
//!
//! 1. **Reports** the live scan state: any request naming `/angle` receives a
//!    JSON [`AngleReport`] with the current sweep angle and the full obstacle
//!    map, read from the latest [`RadarSnapshot`] on the watch channel.
//!
//! 2. **Serves** the static radar viewer page (HTML/CSS/JS) at every other
//!    path.  The page polls `/angle` twice a second and renders the sweep
//!    beam and obstacle returns on a half-disc scope.
//!
//! The server is deliberately single-threaded in spirit: one connection is
//! served to completion before the next is accepted, with a 5-deep OS
//! backlog and a 3-second read timeout per client.
//!
//! # Usage
//!
//! ```rust,no_run
//! use sonarscope_console::{ConsoleServer, StatusService};
//! use tokio::sync::watch;
//!
//! # async fn start(
//! #     snapshots: watch::Receiver<std::sync::Arc<sonarscope_types::RadarSnapshot>>,
//! #     shutdown: watch::Receiver<bool>,
//! # ) {
//! ConsoleServer::new(StatusService::new(snapshots))
//!     .run(shutdown)
//!     .await
//!     .expect("console server failed");
//! # }
//! ```
//!
//! [`AngleReport`]: sonarscope_types::AngleReport
//! [`RadarSnapshot`]: sonarscope_types::RadarSnapshot

pub mod server;
pub mod service;

pub use server::{ConsoleServer, DEFAULT_PORT};
pub use service::StatusService;
