//! Generic `Rangefinder` trait for distance sensors (ultrasonic, IR,
//! time-of-flight).
//!
//! Drivers implement this trait and are handed to the sweep controller at
//! startup.  The rest of the system only ever talks to the trait, so sensor
//! hardware can be swapped without touching the sweep logic.

use sonarscope_types::RadarError;

/// A single-beam distance sensor.
///
/// One measurement is taken per angular step of the sweep.  A measurement is
/// a raw distance in centimeters; range policy (maximum range, near-range
/// threshold) is applied by the caller, not by the driver.
pub trait Rangefinder: Send {
    /// Stable identifier for this sensor, e.g. `"front_ultrasonic"`.
    fn id(&self) -> &str;

    /// Take one distance measurement, in centimeters.
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::HardwareFault`] when no echo is received within
    /// the sensor's own timeout or the device cannot be read.  Callers treat
    /// a fault the same as an out-of-range reading: no detection.
    fn measure(&mut self) -> Result<f64, RadarError>;
}
