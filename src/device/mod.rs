//! Device layer boundary
//!
//! The runtime never talks to hardware directly. Everything it needs from the outside
//! world goes through [`DeviceLayer`]:
//!
//! 1. [`DeviceLayer::fetch_input_snapshot`] - latest raw state of both hands
//! 2. [`DeviceLayer::controller_identity`] - which controller is held in a hand
//! 3. [`DeviceLayer::trigger_haptic_pulse`] - fire-and-forget vibration
//!
//! # Architecture
//!
//! ```text
//! Hardware ──► DeviceLayer ──► InputSnapshot ──► FieldBinding ──► ActionState
//!                  ▲
//!                  └── haptic pulse
//! ```
//!
//! Two backends ship with the crate: [`simulated::SimulatedDevice`] for tests and
//! headless runs, and `gamepad::GamepadDevice` (feature `gamepad`) backed by gilrs.

pub mod field;
#[cfg(feature = "gamepad")]
pub mod gamepad;
pub mod simulated;

pub use field::{Axis, FieldBinding, FloatField, PoseKind, VectorField};
pub use simulated::SimulatedDevice;

use crate::path::Side;
use bitflags::bitflags;
use glam::Vec2;

bitflags! {
    /// Button (or touch sensor) bitmask of one hand
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u32 {
        const A = 1 << 0;
        const B = 1 << 1;
        const X = 1 << 2;
        const Y = 1 << 3;
        const THUMBSTICK = 1 << 4;
        const TOUCHPAD = 1 << 5;
        const SYSTEM = 1 << 6;
        const MENU = 1 << 7;
        const GRIP = 1 << 8;
        const TRIGGER = 1 << 9;
        const THUMBREST = 1 << 10;
    }
}

/// Runtime timestamp in nanoseconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(i64);

impl Time {
    pub const ZERO: Time = Time(0);

    pub const fn from_nanos(nanos: i64) -> Self {
        Time(nanos)
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Time((seconds * 1e9) as i64)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }
}

/// Raw state of one hand as reported by the device layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandInput {
    pub buttons: Buttons,
    pub touches: Buttons,
    pub trigger: f32,
    pub grip: f32,
    pub grip_force: f32,
    pub joystick: Vec2,
    pub touchpad: Vec2,
    pub touchpad_force: f32,
    /// Finger curls, carried in the snapshot but not bindable
    pub finger_index: f32,
    pub finger_middle: f32,
    pub finger_ring: f32,
    pub finger_pinky: f32,
}

impl HandInput {
    pub fn float(&self, field: FloatField) -> f32 {
        match field {
            FloatField::Trigger => self.trigger,
            FloatField::Grip => self.grip,
            FloatField::GripForce => self.grip_force,
            FloatField::TouchpadForce => self.touchpad_force,
        }
    }

    pub fn vector(&self, field: VectorField) -> Vec2 {
        match field {
            VectorField::Joystick => self.joystick,
            VectorField::Touchpad => self.touchpad,
        }
    }
}

/// Latest input state of both hands
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Device clock in seconds
    pub time_seconds: f64,
    pub hands: [HandInput; 2],
}

impl InputSnapshot {
    pub fn time(&self) -> Time {
        Time::from_seconds(self.time_seconds)
    }

    pub fn hand(&self, side: Side) -> &HandInput {
        &self.hands[side.index()]
    }
}

/// Errors reported by a device backend
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The device layer is gone (service stopped, headset unplugged)
    #[error("Device disconnected: {0}")]
    Disconnected(String),

    /// Backend specific failure while reading input
    #[error("Input read failed: {0}")]
    InputRead(String),

    /// Haptic pulse could not be delivered
    #[error("Haptic pulse failed: {0}")]
    Haptics(String),

    /// Backend could not be initialized
    #[error("Initialization error: {0}")]
    InitializationError(String),
}

/// External collaborator supplying controller input and haptics
///
/// Every call is blocking and happens on the caller's thread.
pub trait DeviceLayer: Send {
    /// Reads the latest hardware state of both hands
    fn fetch_input_snapshot(&mut self) -> Result<InputSnapshot, DeviceError>;

    /// Identity string of the controller held in `side`, empty when nothing is connected
    fn controller_identity(&mut self, side: Side) -> Result<String, DeviceError>;

    /// Fires a single vibration pulse, `amplitude` in (0, 1]
    fn trigger_haptic_pulse(&mut self, side: Side, amplitude: f32) -> Result<(), DeviceError>;
}

impl<D: DeviceLayer + ?Sized> DeviceLayer for Box<D> {
    fn fetch_input_snapshot(&mut self) -> Result<InputSnapshot, DeviceError> {
        (**self).fetch_input_snapshot()
    }

    fn controller_identity(&mut self, side: Side) -> Result<String, DeviceError> {
        (**self).controller_identity(side)
    }

    fn trigger_haptic_pulse(&mut self, side: Side, amplitude: f32) -> Result<(), DeviceError> {
        (**self).trigger_haptic_pulse(side, amplitude)
    }
}
