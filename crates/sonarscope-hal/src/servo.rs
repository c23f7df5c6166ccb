//! Generic `Servo` trait for angle-positioned actuators.
//!
//! Drivers implement this trait and register themselves with a
//! [`ServoBank`][crate::bank::ServoBank] under one of the four station
//! roles.  The sweep controller only ever talks to the bank, so drivers can
//! be swapped without touching the scan logic.

use sonarscope_types::RadarError;

/// An angle-positioned hardware actuator (hobby servo, stepper with an
/// absolute encoder, …).
pub trait Servo: Send {
    /// Stable identifier for this servo, e.g. `"sweep_servo"`.
    fn id(&self) -> &str;

    /// Command the servo to move to `target_deg` (degrees from its zero
    /// position, nominally within [0, 180]).
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::HardwareFault`] if the command cannot be applied
    /// (e.g. the PWM channel is unavailable).
    fn set_angle(&mut self, target_deg: f32) -> Result<(), RadarError>;

    /// Return the most recently commanded angle in degrees.
    fn angle(&self) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-process servo used only for tests.
    struct MockServo {
        id: String,
        angle: f32,
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
    fn mock_servo_set_and_get_angle() {
        let mut servo = MockServo {
            id: "test_servo".to_string(),
            angle: 0.0,
        };
        assert_eq!(servo.id(), "test_servo");
        assert!((servo.angle() - 0.0).abs() < f32::EPSILON);

        servo.set_angle(90.0).unwrap();
        assert!((servo.angle() - 90.0).abs() < f32::EPSILON);
    }
}
