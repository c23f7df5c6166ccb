//! [`ServoBank`] – role-addressed servo registry and command dispatcher.
//!
//! The radar station drives four independently addressable servos.  The bank
//! stores one [`Servo`] driver per [`ServoRole`] and routes angle commands to
//! the right one, so the sweep controller is written against roles instead of
//! concrete drivers.

use std::collections::HashMap;

use sonarscope_types::RadarError;
use tracing::trace;

use crate::servo::Servo;

/// The four servo positions on the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServoRole {
    /// Carries the rangefinder through the horizontal arc.
    Sweep,
    /// Deflects towards a near-range obstacle by the computed angle.
    Pointer,
    /// Mirrors the current sweep angle during a near-range alert.
    Mirror,
    /// Raised to the alert angle, held, then returned to zero.
    Alert,
}

impl ServoRole {
    fn as_str(&self) -> &'static str {
        match self {
            ServoRole::Sweep => "sweep",
            ServoRole::Pointer => "pointer",
            ServoRole::Mirror => "mirror",
            ServoRole::Alert => "alert",
        }
    }
}

/// Role-addressed servo registry.
///
/// Construct with [`ServoBank::new`], register one driver per role, then call
/// [`ServoBank::command`] to route angle commands.
#[derive(Default)]
pub struct ServoBank {
    servos: HashMap<ServoRole, Box<dyn Servo>>,
}

impl ServoBank {
    /// Create an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a servo driver under `role`.  Any previously registered
    /// driver for the same role is replaced.
    pub fn register(&mut self, role: ServoRole, servo: Box<dyn Servo>) {
        self.servos.insert(role, servo);
    }

    /// Command the servo registered under `role` to `target_deg`.
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::HardwareFault`] when no driver is registered for
    /// the role or when the underlying driver call fails.
    pub fn command(&mut self, role: ServoRole, target_deg: f32) -> Result<(), RadarError> {
        match self.servos.get_mut(&role) {
            Some(servo) => {
                trace!(role = role.as_str(), id = servo.id(), target_deg, "servo command");
                servo.set_angle(target_deg)
            }
            None => Err(RadarError::HardwareFault {
                component: role.as_str().to_string(),
                details: format!("no servo registered for role '{}'", role.as_str()),
            }),
        }
    }

    /// Return the most recently commanded angle for `role`, if a driver is
    /// registered.
    pub fn angle(&self, role: ServoRole) -> Option<f32> {
        self.servos.get(&role).map(|s| s.angle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockServo {
        id: String,
        angle: f32,
    }
    impl MockServo {
        fn new(id: &str) -> Box<Self> {
            Box::new(Self {
                id: id.to_string(),
                angle: 0.0,
            })
        }
    }
    impl Servo for MockServo {
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

    #[test]
    fn command_routes_to_registered_servo() {
        let mut bank = ServoBank::new();
        bank.register(ServoRole::Sweep, MockServo::new("sweep_servo"));

        bank.command(ServoRole::Sweep, 40.0).unwrap();
        let angle = bank.angle(ServoRole::Sweep).unwrap();
        assert!((angle - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn command_missing_role_returns_error() {
        let mut bank = ServoBank::new();
        let result = bank.command(ServoRole::Alert, 65.0);
        assert!(matches!(result, Err(RadarError::HardwareFault { .. })));
    }

    #[test]
    fn angle_missing_role_returns_none() {
        let bank = ServoBank::new();
        assert!(bank.angle(ServoRole::Pointer).is_none());
    }

    #[test]
    fn re_registering_replaces_old_driver() {
        let mut bank = ServoBank::new();
        bank.register(ServoRole::Mirror, MockServo::new("mirror_a"));
        bank.command(ServoRole::Mirror, 120.0).unwrap();

        // Fresh driver for the same role starts back at zero.
        bank.register(ServoRole::Mirror, MockServo::new("mirror_b"));
        let angle = bank.angle(ServoRole::Mirror).unwrap();
        assert!((angle - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn roles_are_independent() {
        let mut bank = ServoBank::new();
        bank.register(ServoRole::Sweep, MockServo::new("sweep_servo"));
        bank.register(ServoRole::Alert, MockServo::new("alert_servo"));

        bank.command(ServoRole::Sweep, 90.0).unwrap();
        bank.command(ServoRole::Alert, 65.0).unwrap();

        assert!((bank.angle(ServoRole::Sweep).unwrap() - 90.0).abs() < f32::EPSILON);
        assert!((bank.angle(ServoRole::Alert).unwrap() - 65.0).abs() < f32::EPSILON);
    }
}
