//! Bindings from an action to fields of the per-hand snapshot
//!
//! A [`FieldBinding`] is what binding resolution stores on an action. It is side
//! agnostic; the hand is picked at query time from the action's full path.

use super::{Buttons, HandInput};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Scalar analog fields of [`HandInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatField {
    Trigger,
    Grip,
    GripForce,
    TouchpadForce,
}

/// Two-axis fields of [`HandInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorField {
    Joystick,
    Touchpad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn component(self, value: Vec2) -> f32 {
        match self {
            Axis::X => value.x,
            Axis::Y => value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoseKind {
    Grip,
    Aim,
}

/// Where an action reads its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldBinding {
    /// Bit(s) of the pressed-buttons mask
    Button(Buttons),
    /// Bit(s) of the capacitive touch mask
    Touch(Buttons),
    Float(FloatField),
    /// Whole 2D value, or a single axis of it
    Vector {
        field: VectorField,
        axis: Option<Axis>,
    },
    Pose(PoseKind),
    Haptic,
}

impl FieldBinding {
    /// Boolean reading: mask bit set, or analog value above `threshold`
    pub fn read_bool(&self, hand: &HandInput, threshold: f32) -> Option<bool> {
        match self {
            FieldBinding::Button(mask) => Some(hand.buttons.intersects(*mask)),
            FieldBinding::Touch(mask) => Some(hand.touches.intersects(*mask)),
            FieldBinding::Float(field) => Some(hand.float(*field) > threshold),
            _ => None,
        }
    }

    /// Scalar reading: 1.0/0.0 for masks, the selected axis for 2D fields
    pub fn read_float(&self, hand: &HandInput) -> Option<f32> {
        match self {
            FieldBinding::Float(field) => Some(hand.float(*field)),
            FieldBinding::Button(mask) => Some(if hand.buttons.intersects(*mask) { 1.0 } else { 0.0 }),
            FieldBinding::Touch(mask) => Some(if hand.touches.intersects(*mask) { 1.0 } else { 0.0 }),
            FieldBinding::Vector {
                field,
                axis: Some(axis),
            } => Some(axis.component(hand.vector(*field))),
            _ => None,
        }
    }

    pub fn read_vector(&self, hand: &HandInput) -> Option<Vec2> {
        match self {
            FieldBinding::Vector { field, axis: None } => Some(hand.vector(*field)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand() -> HandInput {
        HandInput {
            buttons: Buttons::A | Buttons::MENU,
            touches: Buttons::THUMBSTICK,
            trigger: 0.995,
            grip: 0.5,
            joystick: Vec2::new(0.25, -0.75),
            ..Default::default()
        }
    }

    #[test]
    fn masks_read_as_bool_and_float() {
        let hand = hand();
        assert_eq!(FieldBinding::Button(Buttons::A).read_bool(&hand, 0.99), Some(true));
        assert_eq!(FieldBinding::Button(Buttons::B).read_bool(&hand, 0.99), Some(false));
        assert_eq!(FieldBinding::Touch(Buttons::THUMBSTICK).read_float(&hand), Some(1.0));
        assert_eq!(FieldBinding::Button(Buttons::X).read_float(&hand), Some(0.0));
    }

    #[test]
    fn analog_reads_as_bool_above_threshold() {
        let hand = hand();
        assert_eq!(FieldBinding::Float(FloatField::Trigger).read_bool(&hand, 0.99), Some(true));
        assert_eq!(FieldBinding::Float(FloatField::Grip).read_bool(&hand, 0.99), Some(false));
    }

    #[test]
    fn vector_axis_reads_as_float_only() {
        let hand = hand();
        let y = FieldBinding::Vector {
            field: VectorField::Joystick,
            axis: Some(Axis::Y),
        };
        assert_eq!(y.read_float(&hand), Some(-0.75));
        assert_eq!(y.read_vector(&hand), None);
        assert_eq!(y.read_bool(&hand, 0.99), None);

        let whole = FieldBinding::Vector {
            field: VectorField::Joystick,
            axis: None,
        };
        assert_eq!(whole.read_vector(&hand), Some(Vec2::new(0.25, -0.75)));
        assert_eq!(whole.read_float(&hand), None);
    }

    #[test]
    fn pose_and_haptic_carry_no_value() {
        let hand = hand();
        assert_eq!(FieldBinding::Pose(PoseKind::Aim).read_bool(&hand, 0.99), None);
        assert_eq!(FieldBinding::Haptic.read_float(&hand), None);
        assert_eq!(FieldBinding::Haptic.read_vector(&hand), None);
    }
}
