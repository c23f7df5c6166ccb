//! `sonarscope-sweep` – the concurrent sweep-and-publish core.
//!
//! Owns the back-and-forth scan state machine ([`SweepController`]), the
//! obstacle map it maintains ([`ObstacleMap`]), and the snapshot channel the
//! console task reads from.  The sweep task is the sole writer of all scan
//! state; everything it exposes goes out as immutable [`RadarSnapshot`]
//! values over a `tokio::sync::watch` channel, so readers never observe a
//! half-written entry and never block the sweep.
//!
//! [`RadarSnapshot`]: sonarscope_types::RadarSnapshot

pub mod clock;
pub mod controller;
pub mod map;

pub use clock::{Clock, SystemClock};
pub use controller::{SweepConfig, SweepController};
pub use map::ObstacleMap;
