//! [`SweepController`] – the scan state machine.
//!
//! Drives the sweep servo through a continuous back-and-forth arc.  Each
//! step:
//!
//! 1. **Advance** – move the current angle one step in the active direction.
//! 2. **Command** – point the sweep servo at the new angle.
//! 3. **Settle** – pause so the servo and sensor cone stabilize.
//! 4. **Sample** – take one rangefinder measurement.
//! 5. **Classify** – in-range readings become [`Detection`] entries in the
//!    [`ObstacleMap`]; faults and out-of-range readings clear the entry.
//!    Near-range readings additionally fire the three-servo alert sequence.
//! 6. **Publish** – emit an immutable [`RadarSnapshot`] on the watch channel.
//!
//! The direction flips after the bound angle itself has been sampled, so the
//! scan visits every angle of the sequence exactly once per pass with no
//! skipped or repeated bound.
//!
//! # Alert sequence
//!
//! A reading closer than the near-range threshold points the pointer servo at
//! `atan(distance / 7.5)` (degrees), mirrors the current sweep angle on the
//! mirror servo, then raises the alert servo to 65°, holds it for the
//! configured duration, and returns it to 0°.  The hold is a synchronous part
//! of the step: the sweep does not advance while the alert is raised.

use std::sync::Arc;

use std::time::Duration;

use chrono::Utc;
use sonarscope_hal::{Rangefinder, ServoBank, ServoRole};
use sonarscope_types::{Detection, RadarError, RadarSnapshot, SweepDirection};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::map::ObstacleMap;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Angle the alert servo is raised to while a near-range obstacle is present.
pub const ALERT_ANGLE_DEG: f32 = 65.0;

/// Baseline of the pointer deflection triangle, in centimeters.  The pointer
/// angle for a near-range obstacle is `atan(distance / baseline)`.
pub const POINTER_BASELINE_CM: f64 = 7.5;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration bundle for [`SweepController`].
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Lower bound of the scan arc, in degrees.
    pub min_angle_deg: u16,
    /// Upper bound of the scan arc, in degrees.
    pub max_angle_deg: u16,
    /// Angular step between samples, in degrees.  Must evenly divide the arc.
    pub step_deg: u16,
    /// Pause after commanding the sweep servo, before sampling.
    pub settle: Duration,
    /// How long the alert servo is held at [`ALERT_ANGLE_DEG`].
    pub alert_hold: Duration,
    /// Readings strictly below this distance fire the alert sequence.
    pub near_range_cm: f64,
    /// Readings above this distance (or non-positive) count as no detection.
    pub max_range_cm: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_angle_deg: 0,
            max_angle_deg: 180,
            step_deg: 10,
            settle: Duration::from_millis(300),
            alert_hold: Duration::from_secs(1),
            near_range_cm: 50.0,
            max_range_cm: 300.0,
        }
    }
}

impl SweepConfig {
    /// Validate the arc geometry.
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::Config`] when the step is zero, the bounds are
    /// inverted or outside [0, 180], or the step does not evenly divide the
    /// arc (the map's key set must be a fixed step sequence).
    pub fn validate(&self) -> Result<(), RadarError> {
        if self.step_deg == 0 {
            return Err(RadarError::Config("step_deg must be non-zero".to_string()));
        }
        if self.min_angle_deg >= self.max_angle_deg {
            return Err(RadarError::Config(format!(
                "scan arc is empty: min {}° >= max {}°",
                self.min_angle_deg, self.max_angle_deg
            )));
        }
        if self.max_angle_deg > 180 {
            return Err(RadarError::Config(format!(
                "max angle {}° exceeds the 180° arc",
                self.max_angle_deg
            )));
        }
        if (self.max_angle_deg - self.min_angle_deg) % self.step_deg != 0 {
            return Err(RadarError::Config(format!(
                "step {}° does not evenly divide the arc [{}, {}]",
                self.step_deg, self.min_angle_deg, self.max_angle_deg
            )));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SweepController
// ─────────────────────────────────────────────────────────────────────────────

/// The scan state machine.  Sole owner and writer of the obstacle map and
/// scan position; everything it exposes leaves as an immutable snapshot.
pub struct SweepController {
    config: SweepConfig,
    bank: ServoBank,
    rangefinder: Box<dyn Rangefinder>,
    clock: Arc<dyn Clock>,
    map: ObstacleMap,
    angle_deg: u16,
    direction: SweepDirection,
    snapshot_tx: watch::Sender<Arc<RadarSnapshot>>,
}

impl SweepController {
    /// Build a controller and the snapshot receiver the console task reads
    /// from.  The initial snapshot carries the empty map at the arc's lower
    /// bound.
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::Config`] when the sweep configuration is
    /// geometrically invalid.
    pub fn new(
        config: SweepConfig,
        bank: ServoBank,
        rangefinder: Box<dyn Rangefinder>,
        clock: Arc<dyn Clock>,
    ) -> Result<(Self, watch::Receiver<Arc<RadarSnapshot>>), RadarError> {
        config.validate()?;

        let map = ObstacleMap::new(config.min_angle_deg, config.max_angle_deg, config.step_deg);
        let angle_deg = config.min_angle_deg;
        let direction = SweepDirection::Up;

        let initial = Arc::new(RadarSnapshot {
            angle_deg,
            direction,
            obstacles: map.cells().clone(),
            taken_at: Utc::now(),
        });
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        Ok((
            Self {
                config,
                bank,
                rangefinder,
                clock,
                map,
                angle_deg,
                direction,
                snapshot_tx,
            },
            snapshot_rx,
        ))
    }

    /// Current angle of the sweep servo, in degrees.
    pub fn angle_deg(&self) -> u16 {
        self.angle_deg
    }

    /// Current sweep direction.
    pub fn direction(&self) -> SweepDirection {
        self.direction
    }

    /// Read-only view of the obstacle map.
    pub fn map(&self) -> &ObstacleMap {
        &self.map
    }

    /// Obtain an additional snapshot receiver.
    pub fn subscribe(&self) -> watch::Receiver<Arc<RadarSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    // -------------------------------------------------------------------------
    // Step
    // -------------------------------------------------------------------------

    /// Execute one full step of the state machine: advance, command, settle,
    /// sample, classify, publish.
    pub async fn step(&mut self) {
        // ── 1. Advance ────────────────────────────────────────────────────────
        match self.direction {
            SweepDirection::Up => self.angle_deg += self.config.step_deg,
            SweepDirection::Down => self.angle_deg -= self.config.step_deg,
        }

        // ── 2. Command the sweep servo ────────────────────────────────────────
        // Fire-and-forget: a failed command is logged and the step continues,
        // the next pass revisits the angle anyway.
        if let Err(e) = self.bank.command(ServoRole::Sweep, self.angle_deg as f32) {
            warn!(angle_deg = self.angle_deg, error = %e, "sweep servo command failed");
        }

        // ── 3. Settle ─────────────────────────────────────────────────────────
        self.clock.pause(self.config.settle).await;

        // ── 4. Sample ─────────────────────────────────────────────────────────
        let reading = self.rangefinder.measure();

        // ── 5. Classify ───────────────────────────────────────────────────────
        match reading {
            Ok(d) if d > 0.0 && d <= self.config.max_range_cm => {
                info!(angle_deg = self.angle_deg, distance_cm = d, "obstacle detected");
                self.map.record(self.angle_deg, Some(Detection::new(d)));
                if d < self.config.near_range_cm {
                    self.near_range_alert(d).await;
                }
            }
            Ok(d) => {
                // Non-positive and over-range readings both mean empty air.
                debug!(angle_deg = self.angle_deg, distance_cm = d, "no detection");
                self.map.record(self.angle_deg, None);
            }
            Err(e) => {
                // A sensor fault is handled like an over-range reading, but
                // logged distinctly so the two stay tell-apart in traces.
                debug!(angle_deg = self.angle_deg, error = %e, "sensor fault, clearing entry");
                self.map.record(self.angle_deg, None);
            }
        }

        // ── 6. Publish ────────────────────────────────────────────────────────
        self.publish();

        // ── Direction reversal ────────────────────────────────────────────────
        // The bound angle itself has just been sampled, so flipping here means
        // the next step moves away from the bound: each pass visits every
        // angle exactly once.
        if self.angle_deg >= self.config.max_angle_deg {
            self.direction = SweepDirection::Down;
        } else if self.angle_deg <= self.config.min_angle_deg {
            self.direction = SweepDirection::Up;
        }
    }

    /// Run the state machine until the shutdown signal flips.
    ///
    /// The signal is observed between steps, the task's natural suspension
    /// point; a step in flight (including an alert hold) completes first.
    pub async fn run(mut self, shutdown: watch::Receiver<bool>) {
        info!(
            min = self.config.min_angle_deg,
            max = self.config.max_angle_deg,
            step = self.config.step_deg,
            "sweep task started"
        );
        loop {
            if *shutdown.borrow() {
                info!("sweep task stopping");
                break;
            }
            self.step().await;
        }
    }

    // -------------------------------------------------------------------------
    // Private helpers
    // -------------------------------------------------------------------------

    /// Fire the three-servo near-range sequence for a reading of
    /// `distance_cm`.
    async fn near_range_alert(&mut self, distance_cm: f64) {
        let deflection_deg = (distance_cm / POINTER_BASELINE_CM).atan().to_degrees();
        info!(
            angle_deg = self.angle_deg,
            distance_cm,
            deflection_deg,
            "near-range obstacle, raising alert"
        );

        if let Err(e) = self.bank.command(ServoRole::Pointer, deflection_deg as f32) {
            warn!(error = %e, "pointer servo command failed");
        }
        if let Err(e) = self.bank.command(ServoRole::Mirror, self.angle_deg as f32) {
            warn!(error = %e, "mirror servo command failed");
        }
        if let Err(e) = self.bank.command(ServoRole::Alert, ALERT_ANGLE_DEG) {
            warn!(error = %e, "alert servo command failed");
        }
        // The hold blocks the sweep by design: the alert stays raised for its
        // full duration before the next angular step.
        self.clock.pause(self.config.alert_hold).await;
        if let Err(e) = self.bank.command(ServoRole::Alert, 0.0) {
            warn!(error = %e, "alert servo return command failed");
        }
    }

    /// Publish the current scan state as an immutable snapshot.
    fn publish(&self) {
        let snapshot = Arc::new(RadarSnapshot {
            angle_deg: self.angle_deg,
            direction: self.direction,
            obstacles: self.map.cells().clone(),
            taken_at: Utc::now(),
        });
        self.snapshot_tx.send_replace(snapshot);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
