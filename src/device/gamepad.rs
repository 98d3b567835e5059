//! gilrs-backed device layer
//!
//! Folds a single gamepad into two virtual hands: the left half of the pad (left stick,
//! left trigger and bumper, d-pad) drives the left hand, the face buttons and right stick
//! drive the right hand. Both hands report the gamepad name as controller identity, so
//! binding resolution treats the pad as a generic controller.

use super::{Buttons, DeviceError, DeviceLayer, HandInput, InputSnapshot};
use crate::path::Side;
use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Replay, Ticks};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use glam::Vec2;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Duration of one haptic pulse
const PULSE_MS: u32 = 60;

pub struct GamepadDevice {
    gilrs: Gilrs,
    active_gamepad: Option<GamepadId>,
    joystick_deadzone: f32,
    started: Instant,
    // Dropping an effect stops it, so the last pulse of each hand is kept alive here
    effects: [Option<Effect>; 2],
}

impl GamepadDevice {
    pub fn create(joystick_deadzone: f32) -> Result<Self, DeviceError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(DeviceError::InitializationError(e.to_string()));
            }
        };

        let mut device = Self {
            gilrs,
            active_gamepad: None,
            joystick_deadzone,
            started: Instant::now(),
            effects: [None, None],
        };
        device.select_gamepad();
        Ok(device)
    }

    fn select_gamepad(&mut self) {
        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = self.gilrs.gamepads().collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, both hands inactive");
            self.active_gamepad = None;
            return;
        }

        info!("Found {} gamepads:", gamepads.len());
        for (idx, (id, gamepad)) in gamepads.iter().enumerate() {
            info!("  [{}] ID: {}, Name: {}", idx, id, gamepad.name());
        }

        let (id, gamepad) = &gamepads[0];
        info!("Selected gamepad: {} ({})", gamepad.name(), id);
        self.active_gamepad = Some(*id);
    }

    /// Drains pending gilrs events so cached gamepad state is current
    fn pump_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!("Controller connected: {}", id);
                    if self.active_gamepad.is_none() {
                        self.active_gamepad = Some(id);
                    }
                }
                EventType::Disconnected => {
                    warn!("Controller disconnected: {}", id);
                    if self.active_gamepad == Some(id) {
                        self.effects = [None, None];
                        self.select_gamepad();
                    }
                }
                _ => {}
            }
        }
    }

    fn read_hand(&self, gamepad: &Gamepad<'_>, side: Side) -> HandInput {
        let deadzone = self.joystick_deadzone;
        let analog = |button: Button| gamepad.button_data(button).map_or(0.0, |data| data.value());
        let stick = |x: Axis, y: Axis| {
            Vec2::new(
                apply_deadzone(gamepad.value(x), deadzone),
                apply_deadzone(gamepad.value(y), deadzone),
            )
        };

        let mut buttons = Buttons::empty();
        for (button, mask) in button_layout(side) {
            if gamepad.is_pressed(*button) {
                buttons |= *mask;
            }
        }

        match side {
            Side::Left => HandInput {
                buttons,
                trigger: analog(Button::LeftTrigger2),
                grip: if gamepad.is_pressed(Button::LeftTrigger) { 1.0 } else { 0.0 },
                joystick: stick(Axis::LeftStickX, Axis::LeftStickY),
                ..Default::default()
            },
            Side::Right => HandInput {
                buttons,
                trigger: analog(Button::RightTrigger2),
                grip: if gamepad.is_pressed(Button::RightTrigger) { 1.0 } else { 0.0 },
                joystick: stick(Axis::RightStickX, Axis::RightStickY),
                ..Default::default()
            },
        }
    }
}

impl DeviceLayer for GamepadDevice {
    fn fetch_input_snapshot(&mut self) -> Result<InputSnapshot, DeviceError> {
        self.pump_events();

        let mut snapshot = InputSnapshot {
            time_seconds: self.started.elapsed().as_secs_f64(),
            ..Default::default()
        };

        if let Some(gamepad) = self
            .active_gamepad
            .and_then(|id| self.gilrs.connected_gamepad(id))
        {
            for side in Side::BOTH {
                snapshot.hands[side.index()] = self.read_hand(&gamepad, side);
            }
        }

        Ok(snapshot)
    }

    fn controller_identity(&mut self, _side: Side) -> Result<String, DeviceError> {
        Ok(self
            .active_gamepad
            .and_then(|id| self.gilrs.connected_gamepad(id))
            .map(|gamepad| gamepad.name().to_string())
            .unwrap_or_default())
    }

    fn trigger_haptic_pulse(&mut self, side: Side, amplitude: f32) -> Result<(), DeviceError> {
        let Some(id) = self.active_gamepad else {
            debug!("Haptic pulse dropped, no gamepad");
            return Ok(());
        };

        let supported = self
            .gilrs
            .connected_gamepad(id)
            .is_some_and(|gamepad| gamepad.is_ff_supported());
        if !supported {
            debug!("Gamepad {} has no force feedback, pulse dropped", id);
            return Ok(());
        }

        let magnitude = (amplitude.clamp(0.0, 1.0) * u16::MAX as f32) as u16;
        let kind = match side {
            Side::Left => BaseEffectType::Strong { magnitude },
            Side::Right => BaseEffectType::Weak { magnitude },
        };

        let effect = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind,
                scheduling: Replay {
                    play_for: Ticks::from_ms(PULSE_MS),
                    ..Default::default()
                },
                envelope: Default::default(),
            })
            .gamepads(&[id])
            .finish(&mut self.gilrs)
            .map_err(|e| DeviceError::Haptics(e.to_string()))?;

        effect
            .play()
            .map_err(|e| DeviceError::Haptics(e.to_string()))?;
        self.effects[side.index()] = Some(effect);
        Ok(())
    }
}

fn button_layout(side: Side) -> &'static [(Button, Buttons)] {
    match side {
        Side::Left => &[
            (Button::DPadLeft, Buttons::X),
            (Button::DPadUp, Buttons::Y),
            (Button::LeftThumb, Buttons::THUMBSTICK),
            (Button::Select, Buttons::MENU),
            (Button::Mode, Buttons::SYSTEM),
            (Button::LeftTrigger, Buttons::GRIP),
        ],
        Side::Right => &[
            (Button::South, Buttons::A),
            (Button::East, Buttons::B),
            (Button::RightThumb, Buttons::THUMBSTICK),
            (Button::Start, Buttons::MENU),
            (Button::RightTrigger, Buttons::GRIP),
        ],
    }
}

// Rescales the value to the range outside the deadzone
fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        let sign = if value < 0.0 { -1.0 } else { 1.0 };
        sign * (value.abs() - deadzone) / (1.0 - deadzone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_zeroes_small_values_and_rescales_the_rest() {
        assert_eq!(apply_deadzone(0.03, 0.05), 0.0);
        assert_eq!(apply_deadzone(1.0, 0.05), 1.0);
        assert_eq!(apply_deadzone(-1.0, 0.05), -1.0);
    }

    #[test]
    fn face_buttons_belong_to_the_right_hand() {
        assert!(button_layout(Side::Right)
            .iter()
            .any(|(button, mask)| *button == Button::South && *mask == Buttons::A));
        assert!(button_layout(Side::Left)
            .iter()
            .all(|(button, _)| *button != Button::South));
    }
}
