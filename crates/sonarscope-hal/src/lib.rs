//! `sonarscope-hal` – hardware abstraction for the radar station.
//!
//! The sweep controller never talks to pins or PWM registers directly; it
//! only sees the [`Rangefinder`] and [`Servo`] traits plus the [`ServoBank`]
//! that routes role-addressed commands to the registered drivers.  Swapping
//! an ultrasonic module or a servo driver therefore never touches the sweep
//! logic, and the whole stack runs headless in CI against the simulated
//! drivers in [`sim`].

pub mod bank;
pub mod rangefinder;
pub mod servo;
pub mod sim;

pub use bank::{ServoBank, ServoRole};
pub use rangefinder::Rangefinder;
pub use servo::Servo;
