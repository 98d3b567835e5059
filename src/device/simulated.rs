//! Scriptable in-memory device
//!
//! Clones share one state, so a test (or the demo loop) keeps a clone to drive input
//! while the session owns another one.

use super::{DeviceError, DeviceLayer, HandInput, InputSnapshot};
use crate::path::Side;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};

/// A haptic pulse recorded by [`SimulatedDevice`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticPulse {
    pub side: Side,
    pub amplitude: f32,
}

#[derive(Debug, Default)]
struct SimulatedState {
    time_seconds: f64,
    hands: [HandInput; 2],
    identities: [String; 2],
    pulses: Vec<HapticPulse>,
    fetch_count: usize,
    failing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedDevice {
    state: Arc<Mutex<SimulatedState>>,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a controller with the given identity string in `side`
    pub fn connect(&self, side: Side, identity: impl Into<String>) {
        let identity = identity.into();
        debug!("Simulated {} controller connected: {}", side, identity);
        self.state.lock().identities[side.index()] = identity;
    }

    pub fn disconnect(&self, side: Side) {
        debug!("Simulated {} controller disconnected", side);
        let mut state = self.state.lock();
        state.identities[side.index()].clear();
        state.hands[side.index()] = HandInput::default();
    }

    /// Mutates the raw input of one hand
    pub fn update_hand(&self, side: Side, update: impl FnOnce(&mut HandInput)) {
        update(&mut self.state.lock().hands[side.index()]);
    }

    pub fn hand(&self, side: Side) -> HandInput {
        self.state.lock().hands[side.index()]
    }

    /// Moves the device clock forward
    pub fn advance(&self, seconds: f64) {
        self.state.lock().time_seconds += seconds;
    }

    pub fn set_time(&self, seconds: f64) {
        self.state.lock().time_seconds = seconds;
    }

    /// Makes every following device call fail until reset
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    pub fn pulses(&self) -> Vec<HapticPulse> {
        self.state.lock().pulses.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().fetch_count
    }
}

impl DeviceLayer for SimulatedDevice {
    fn fetch_input_snapshot(&mut self) -> Result<InputSnapshot, DeviceError> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(DeviceError::Disconnected("simulated device offline".to_string()));
        }

        state.fetch_count += 1;
        trace!("Simulated snapshot #{} at {:.3}s", state.fetch_count, state.time_seconds);
        Ok(InputSnapshot {
            time_seconds: state.time_seconds,
            hands: state.hands,
        })
    }

    fn controller_identity(&mut self, side: Side) -> Result<String, DeviceError> {
        let state = self.state.lock();
        if state.failing {
            return Err(DeviceError::Disconnected("simulated device offline".to_string()));
        }
        Ok(state.identities[side.index()].clone())
    }

    fn trigger_haptic_pulse(&mut self, side: Side, amplitude: f32) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(DeviceError::Haptics("simulated device offline".to_string()));
        }

        debug!("Simulated haptic pulse on {} hand: {:.2}", side, amplitude);
        state.pulses.push(HapticPulse { side, amplitude });
        Ok(())
    }
}
