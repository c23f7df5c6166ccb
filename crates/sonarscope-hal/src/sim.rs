//! In-process simulated drivers for CI testing without physical hardware.
//!
//! [`SimRig`] builds a [`ServoBank`] pre-populated with stub servos plus a
//! simulated rangefinder, so the full station runs in headless tests and CI
//! pipelines without an ultrasonic module or a single PWM pin.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use sonarscope_types::RadarError;

use crate::bank::{ServoBank, ServoRole};
use crate::rangefinder::Rangefinder;
use crate::servo::Servo;

// ────────────────────────────────────────────────────────────────────────────
// Stub servo
// ────────────────────────────────────────────────────────────────────────────

/// A simulated servo that records the most recent commanded angle.
/// Always succeeds.
pub struct SimServo {
    id: String,
    angle: f32,
}

impl SimServo {
    /// Create a new simulated servo with the given identifier.
    pub fn new(id: impl Into<String>) -> Box<Self> {
        Box::new(Self {
            id: id.into(),
            angle: 0.0,
        })
    }
}

impl Servo for SimServo {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_angle(&mut self, target_deg: f32) -> Result<(), RadarError> {
        self.angle = target_deg;
        Ok(())
    }

    fn angle(&self) -> f32 {
        self.angle
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tracking servo
// ────────────────────────────────────────────────────────────────────────────

/// A simulated servo that appends every commanded angle to a shared log.
/// Useful when a test needs to assert on the full command sequence (e.g. the
/// alert servo's raise-hold-return pattern) after the bank has been moved
/// into a controller.
pub struct TrackingServo {
    id: String,
    angle: f32,
    log: Arc<Mutex<Vec<f32>>>,
}

impl TrackingServo {
    /// Create a tracking servo together with a handle to its command log.
    pub fn new(id: impl Into<String>) -> (Box<Self>, Arc<Mutex<Vec<f32>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let servo = Box::new(Self {
            id: id.into(),
            angle: 0.0,
            log: Arc::clone(&log),
        });
        (servo, log)
    }
}

impl Servo for TrackingServo {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_angle(&mut self, target_deg: f32) -> Result<(), RadarError> {
        self.angle = target_deg;
        if let Ok(mut log) = self.log.lock() {
            log.push(target_deg);
        }
        Ok(())
    }

    fn angle(&self) -> f32 {
        self.angle
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated rangefinders
// ────────────────────────────────────────────────────────────────────────────

/// A free-running simulated rangefinder.
///
/// Cycles through a fixed pattern of plausible readings (a slow approach, a
/// near pass, an out-of-range gap) so the viewer page has something to render
/// when the station runs without hardware.
pub struct SimRangefinder {
    id: String,
    cursor: usize,
}

/// One synthetic pass: far, approaching, near, receding, then empty air.
const SIM_PATTERN: [f64; 8] = [280.0, 180.0, 110.0, 42.0, 35.0, 90.0, 220.0, 400.0];

impl SimRangefinder {
    /// Create a new simulated rangefinder with the given identifier.
    pub fn new(id: impl Into<String>) -> Box<Self> {
        Box::new(Self {
            id: id.into(),
            cursor: 0,
        })
    }
}

impl Rangefinder for SimRangefinder {
    fn id(&self) -> &str {
        &self.id
    }

    fn measure(&mut self) -> Result<f64, RadarError> {
        let reading = SIM_PATTERN[self.cursor % SIM_PATTERN.len()];
        self.cursor += 1;
        Ok(reading)
    }
}

/// A scripted rangefinder that replays a fixed queue of results.
///
/// Each call to [`Rangefinder::measure`] pops the next scripted outcome;
/// once the script runs dry every further call reports a hardware fault,
/// which callers treat as "no detection".
pub struct ScriptedRangefinder {
    id: String,
    script: VecDeque<Result<f64, RadarError>>,
}

impl ScriptedRangefinder {
    /// Create a scripted rangefinder that yields `readings` in order.
    pub fn new(id: impl Into<String>, readings: Vec<Result<f64, RadarError>>) -> Box<Self> {
        Box::new(Self {
            id: id.into(),
            script: readings.into_iter().collect(),
        })
    }
}

impl Rangefinder for ScriptedRangefinder {
    fn id(&self) -> &str {
        &self.id
    }

    fn measure(&mut self) -> Result<f64, RadarError> {
        self.script.pop_front().unwrap_or_else(|| {
            Err(RadarError::HardwareFault {
                component: self.id.clone(),
                details: "scripted readings exhausted".to_string(),
            })
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimRig builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder that constructs a fully simulated station rig: a [`ServoBank`]
/// with all four roles populated and a simulated rangefinder.
///
/// Call the `with_*` methods to customize individual drivers, then call
/// [`build`][Self::build] to obtain the rig.
pub struct SimRig {
    bank: ServoBank,
    rangefinder: Box<dyn Rangefinder>,
}

impl SimRig {
    /// Create a rig with stub servos on every role and the free-running
    /// [`SimRangefinder`].
    pub fn new() -> Self {
        let mut bank = ServoBank::new();
        bank.register(ServoRole::Sweep, SimServo::new("sweep_servo"));
        bank.register(ServoRole::Pointer, SimServo::new("pointer_servo"));
        bank.register(ServoRole::Mirror, SimServo::new("mirror_servo"));
        bank.register(ServoRole::Alert, SimServo::new("alert_servo"));
        Self {
            bank,
            rangefinder: SimRangefinder::new("sim_ultrasonic"),
        }
    }

    /// Replace the rangefinder (e.g. with a [`ScriptedRangefinder`]).
    pub fn with_rangefinder(mut self, rangefinder: Box<dyn Rangefinder>) -> Self {
        self.rangefinder = rangefinder;
        self
    }

    /// Replace the servo on `role` (e.g. with a [`TrackingServo`]).
    pub fn with_servo(mut self, role: ServoRole, servo: Box<dyn Servo>) -> Self {
        self.bank.register(role, servo);
        self
    }

    /// Consume the builder and return the bank and rangefinder.
    pub fn build(self) -> (ServoBank, Box<dyn Rangefinder>) {
        (self.bank, self.rangefinder)
    }
}

impl Default for SimRig {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_servo_records_angle() {
        let mut servo = SimServo::new("test");
        assert!((servo.angle() - 0.0).abs() < f32::EPSILON);
        servo.set_angle(65.0).unwrap();
        assert!((servo.angle() - 65.0).abs() < f32::EPSILON);
    }

    #[test]
    fn tracking_servo_logs_every_command() {
        let (mut servo, log) = TrackingServo::new("alert_servo");
        servo.set_angle(65.0).unwrap();
        servo.set_angle(0.0).unwrap();
        assert_eq!(*log.lock().unwrap(), vec![65.0, 0.0]);
    }

    #[test]
    fn sim_rangefinder_cycles_through_pattern() {
        let mut sensor = SimRangefinder::new("sim");
        let first = sensor.measure().unwrap();
        for _ in 1..SIM_PATTERN.len() {
            sensor.measure().unwrap();
        }
        // One full cycle later the pattern repeats.
        assert!((sensor.measure().unwrap() - first).abs() < f64::EPSILON);
    }

    #[test]
    fn scripted_rangefinder_replays_then_faults() {
        let mut sensor = ScriptedRangefinder::new("scripted", vec![Ok(120.0), Ok(30.0)]);
        assert!((sensor.measure().unwrap() - 120.0).abs() < f64::EPSILON);
        assert!((sensor.measure().unwrap() - 30.0).abs() < f64::EPSILON);
        assert!(matches!(
            sensor.measure(),
            Err(RadarError::HardwareFault { .. })
        ));
    }

    #[test]
    fn sim_rig_populates_all_roles() {
        let (bank, _sensor) = SimRig::new().build();
        for role in [
            ServoRole::Sweep,
            ServoRole::Pointer,
            ServoRole::Mirror,
            ServoRole::Alert,
        ] {
            assert!(bank.angle(role).is_some(), "role {role:?} must be populated");
        }
    }

    #[test]
    fn sim_rig_with_servo_overrides_role() {
        let (tracking, log) = TrackingServo::new("tracked_sweep");
        let (mut bank, _sensor) = SimRig::new().with_servo(ServoRole::Sweep, tracking).build();
        bank.command(ServoRole::Sweep, 10.0).unwrap();
        assert_eq!(*log.lock().unwrap(), vec![10.0]);
    }
}
