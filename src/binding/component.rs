//! Eingabe-Komponenten und Pfad-Layouts der Interaction-Profile
//!
//! Ein Binding-Pfad wie `/user/hand/left/input/trigger/value` wird in zwei Schritten
//! aufgelöst: Das Layout des Profils übersetzt das Suffix in eine abstrakte
//! [`Component`], die Komponente kennt das zugehörige Feld im Snapshot.

use super::profile::{ControllerKind, InteractionProfile};
use crate::device::{Axis, Buttons, FieldBinding, FloatField, PoseKind, VectorField};

/// Abstrakte Eingabe- oder Ausgabe-Komponente eines Controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Select,
    Menu,
    System,
    AClick,
    ATouch,
    BClick,
    BTouch,
    XClick,
    XTouch,
    YClick,
    YTouch,
    Trigger,
    TriggerClick,
    TriggerTouch,
    Squeeze,
    SqueezeClick,
    SqueezeForce,
    Thumbstick,
    ThumbstickClick,
    ThumbstickTouch,
    ThumbRest,
    Trackpad,
    TrackpadClick,
    TrackpadTouch,
    TrackpadForce,
    GripPose,
    AimPose,
    Haptic,
}

impl Component {
    /// Feld im Snapshot, aus dem die Komponente gelesen wird
    pub fn field(self, axis: Option<Axis>) -> FieldBinding {
        match self {
            Component::Select | Component::Trigger | Component::TriggerClick => {
                FieldBinding::Float(FloatField::Trigger)
            }
            Component::Menu => FieldBinding::Button(Buttons::MENU),
            Component::System => FieldBinding::Button(Buttons::SYSTEM),
            Component::AClick => FieldBinding::Button(Buttons::A),
            Component::ATouch => FieldBinding::Touch(Buttons::A),
            Component::BClick => FieldBinding::Button(Buttons::B),
            Component::BTouch => FieldBinding::Touch(Buttons::B),
            Component::XClick => FieldBinding::Button(Buttons::X),
            Component::XTouch => FieldBinding::Touch(Buttons::X),
            Component::YClick => FieldBinding::Button(Buttons::Y),
            Component::YTouch => FieldBinding::Touch(Buttons::Y),
            Component::TriggerTouch => FieldBinding::Touch(Buttons::TRIGGER),
            Component::Squeeze | Component::SqueezeClick => FieldBinding::Float(FloatField::Grip),
            Component::SqueezeForce => FieldBinding::Float(FloatField::GripForce),
            Component::Thumbstick => FieldBinding::Vector {
                field: VectorField::Joystick,
                axis,
            },
            Component::ThumbstickClick => FieldBinding::Button(Buttons::THUMBSTICK),
            Component::ThumbstickTouch => FieldBinding::Touch(Buttons::THUMBSTICK),
            Component::ThumbRest => FieldBinding::Touch(Buttons::THUMBREST),
            Component::Trackpad => FieldBinding::Vector {
                field: VectorField::Touchpad,
                axis,
            },
            Component::TrackpadClick => FieldBinding::Button(Buttons::TOUCHPAD),
            Component::TrackpadTouch => FieldBinding::Touch(Buttons::TOUCHPAD),
            Component::TrackpadForce => FieldBinding::Float(FloatField::TouchpadForce),
            Component::GripPose => FieldBinding::Pose(PoseKind::Grip),
            Component::AimPose => FieldBinding::Pose(PoseKind::Aim),
            Component::Haptic => FieldBinding::Haptic,
        }
    }

    pub fn is_two_axis(self) -> bool {
        matches!(self, Component::Thumbstick | Component::Trackpad)
    }

    /// Anzeigename für lokalisierte Quellnamen
    pub fn display_name(self) -> &'static str {
        match self {
            Component::Select => "Select",
            Component::Menu => "Menu Button",
            Component::System => "System Button",
            Component::AClick | Component::ATouch => "A Button",
            Component::BClick | Component::BTouch => "B Button",
            Component::XClick | Component::XTouch => "X Button",
            Component::YClick | Component::YTouch => "Y Button",
            Component::Trigger | Component::TriggerClick | Component::TriggerTouch => "Trigger",
            Component::Squeeze | Component::SqueezeClick | Component::SqueezeForce => "Grip",
            Component::Thumbstick | Component::ThumbstickClick | Component::ThumbstickTouch => {
                "Thumbstick"
            }
            Component::ThumbRest => "Thumb Rest",
            Component::Trackpad
            | Component::TrackpadClick
            | Component::TrackpadTouch
            | Component::TrackpadForce => "Trackpad",
            Component::GripPose => "Grip Pose",
            Component::AimPose => "Aim Pose",
            Component::Haptic => "Haptics",
        }
    }
}

const COMMON: &[(&str, Component)] = &[
    ("/input/grip/pose", Component::GripPose),
    ("/input/aim/pose", Component::AimPose),
    ("/output/haptic", Component::Haptic),
];

const SIMPLE_LAYOUT: &[(&str, Component)] = &[
    ("/input/select/click", Component::Select),
    ("/input/menu/click", Component::Menu),
];

const VIVE_LAYOUT: &[(&str, Component)] = &[
    ("/input/system/click", Component::System),
    ("/input/squeeze/click", Component::SqueezeClick),
    ("/input/menu/click", Component::Menu),
    ("/input/trigger/click", Component::TriggerClick),
    ("/input/trigger/value", Component::Trigger),
    ("/input/trackpad", Component::Trackpad),
    ("/input/trackpad/click", Component::TrackpadClick),
    ("/input/trackpad/touch", Component::TrackpadTouch),
];

const INDEX_LAYOUT: &[(&str, Component)] = &[
    ("/input/system/click", Component::System),
    ("/input/a/click", Component::AClick),
    ("/input/a/touch", Component::ATouch),
    ("/input/b/click", Component::BClick),
    ("/input/b/touch", Component::BTouch),
    ("/input/squeeze/value", Component::Squeeze),
    ("/input/squeeze/force", Component::SqueezeForce),
    ("/input/trigger/click", Component::TriggerClick),
    ("/input/trigger/value", Component::Trigger),
    ("/input/trigger/touch", Component::TriggerTouch),
    ("/input/thumbstick", Component::Thumbstick),
    ("/input/thumbstick/click", Component::ThumbstickClick),
    ("/input/thumbstick/touch", Component::ThumbstickTouch),
    ("/input/trackpad", Component::Trackpad),
    ("/input/trackpad/force", Component::TrackpadForce),
    ("/input/trackpad/touch", Component::TrackpadTouch),
];

const TOUCH_LAYOUT: &[(&str, Component)] = &[
    ("/input/x/click", Component::XClick),
    ("/input/x/touch", Component::XTouch),
    ("/input/y/click", Component::YClick),
    ("/input/y/touch", Component::YTouch),
    ("/input/a/click", Component::AClick),
    ("/input/a/touch", Component::ATouch),
    ("/input/b/click", Component::BClick),
    ("/input/b/touch", Component::BTouch),
    ("/input/menu/click", Component::Menu),
    ("/input/system/click", Component::System),
    ("/input/squeeze/value", Component::Squeeze),
    ("/input/trigger/value", Component::Trigger),
    ("/input/trigger/touch", Component::TriggerTouch),
    ("/input/thumbstick", Component::Thumbstick),
    ("/input/thumbstick/click", Component::ThumbstickClick),
    ("/input/thumbstick/touch", Component::ThumbstickTouch),
    ("/input/thumbrest/touch", Component::ThumbRest),
];

const MOTION_LAYOUT: &[(&str, Component)] = &[
    ("/input/menu/click", Component::Menu),
    ("/input/squeeze/click", Component::SqueezeClick),
    ("/input/trigger/value", Component::Trigger),
    ("/input/thumbstick", Component::Thumbstick),
    ("/input/thumbstick/click", Component::ThumbstickClick),
    ("/input/trackpad", Component::Trackpad),
    ("/input/trackpad/click", Component::TrackpadClick),
    ("/input/trackpad/touch", Component::TrackpadTouch),
];

fn layout(profile: InteractionProfile) -> &'static [(&'static str, Component)] {
    match profile {
        InteractionProfile::SimpleController => SIMPLE_LAYOUT,
        InteractionProfile::ViveController => VIVE_LAYOUT,
        InteractionProfile::IndexController => INDEX_LAYOUT,
        InteractionProfile::TouchController => TOUCH_LAYOUT,
        InteractionProfile::MotionController => MOTION_LAYOUT,
    }
}

fn exact(profile: InteractionProfile, suffix: &str) -> Option<Component> {
    layout(profile)
        .iter()
        .chain(COMMON)
        .find(|(path, _)| *path == suffix)
        .map(|(_, component)| *component)
}

/// Löst ein Komponenten-Suffix (z.B. `/input/thumbstick/x`) im Layout eines Profils auf
///
/// Neben exakten Pfaden werden `/x` und `/y` für einzelne Achsen sowie die Kurzform
/// ohne `/value` bzw. `/click` akzeptiert.
pub fn resolve_component(
    profile: InteractionProfile,
    suffix: &str,
) -> Option<(Component, Option<Axis>)> {
    if let Some(component) = exact(profile, suffix) {
        return Some((component, None));
    }

    for (ending, axis) in [("/x", Axis::X), ("/y", Axis::Y)] {
        if let Some(base) = suffix.strip_suffix(ending) {
            if let Some(component) = exact(profile, base).filter(|c| c.is_two_axis()) {
                return Some((component, Some(axis)));
            }
        }
    }

    ["/value", "/click"]
        .iter()
        .find_map(|ending| exact(profile, &format!("{}{}", suffix, ending)))
        .map(|component| (component, None))
}

/// Komponenten, die die jeweilige Hardware tatsächlich besitzt
pub fn supports(controller: ControllerKind, component: Component) -> bool {
    use Component::*;
    match controller {
        ControllerKind::Vive => matches!(
            component,
            System
                | Menu
                | Trigger
                | TriggerClick
                | Squeeze
                | SqueezeClick
                | Trackpad
                | TrackpadClick
                | TrackpadTouch
                | GripPose
                | AimPose
                | Haptic
        ),
        ControllerKind::Index => matches!(
            component,
            System
                | AClick
                | ATouch
                | BClick
                | BTouch
                | Trigger
                | TriggerClick
                | TriggerTouch
                | Squeeze
                | SqueezeClick
                | SqueezeForce
                | Thumbstick
                | ThumbstickClick
                | ThumbstickTouch
                | Trackpad
                | TrackpadTouch
                | TrackpadForce
                | GripPose
                | AimPose
                | Haptic
        ),
        // Unbekannte Hardware: alles, was der Snapshot liefern kann
        ControllerKind::Generic => true,
    }
}
