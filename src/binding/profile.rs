//! Interaction-Profile und Erkennung des physischen Controllers
//!
//! Der Geräte-Layer liefert pro Hand nur einen Identitäts-String. Daraus wird hier
//! abgeleitet, welches Profil bevorzugt wird, wie der Controller heißt und wie die
//! Aim-Pose gegenüber der Grip-Pose versetzt ist.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Bekannte Interaction-Profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionProfile {
    SimpleController,
    ViveController,
    IndexController,
    TouchController,
    MotionController,
}

impl InteractionProfile {
    pub const ALL: [InteractionProfile; 5] = [
        InteractionProfile::SimpleController,
        InteractionProfile::ViveController,
        InteractionProfile::IndexController,
        InteractionProfile::TouchController,
        InteractionProfile::MotionController,
    ];

    /// Ausweich-Profile in Prioritätsreihenfolge, falls für das bevorzugte Profil
    /// keine Bindings vorgeschlagen wurden
    pub const FALLBACK_ORDER: [InteractionProfile; 3] = [
        InteractionProfile::TouchController,
        InteractionProfile::MotionController,
        InteractionProfile::SimpleController,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            InteractionProfile::SimpleController => "/interaction_profiles/khr/simple_controller",
            InteractionProfile::ViveController => "/interaction_profiles/htc/vive_controller",
            InteractionProfile::IndexController => "/interaction_profiles/valve/index_controller",
            InteractionProfile::TouchController => "/interaction_profiles/oculus/touch_controller",
            InteractionProfile::MotionController => {
                "/interaction_profiles/microsoft/motion_controller"
            }
        }
    }

    /// Bevorzugtes Profil, gefolgt von den Ausweich-Profilen
    pub fn candidates(preferred: InteractionProfile) -> impl Iterator<Item = InteractionProfile> {
        std::iter::once(preferred).chain(Self::FALLBACK_ORDER)
    }
}

impl Display for InteractionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Versatz der Aim-Pose relativ zur Grip-Pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimPose {
    pub orientation: Quat,
    pub position: Vec3,
}

impl AimPose {
    pub const IDENTITY: AimPose = AimPose {
        orientation: Quat::IDENTITY,
        position: Vec3::ZERO,
    };

    /// Nach vorne geneigte Aim-Pose, 5 cm vor dem Griff
    fn pitched(degrees: f32) -> Self {
        Self {
            orientation: Quat::from_rotation_x(degrees.to_radians()),
            position: Vec3::new(0.0, 0.0, -0.05),
        }
    }
}

impl Default for AimPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Physische Controller-Familie, abgeleitet aus dem Identitäts-String
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControllerKind {
    Vive,
    Index,
    /// Alles Unbekannte (inkl. Gamepads) wird als einfacher Controller behandelt
    Generic,
}

impl ControllerKind {
    pub const ALL: [ControllerKind; 3] =
        [ControllerKind::Vive, ControllerKind::Index, ControllerKind::Generic];

    pub fn identify(identity: &str) -> Self {
        match identity {
            "vive_controller" => ControllerKind::Vive,
            "knuckles" => ControllerKind::Index,
            _ => ControllerKind::Generic,
        }
    }

    pub const fn preferred_profile(self) -> InteractionProfile {
        match self {
            ControllerKind::Vive => InteractionProfile::ViveController,
            ControllerKind::Index => InteractionProfile::IndexController,
            ControllerKind::Generic => InteractionProfile::SimpleController,
        }
    }

    pub const fn localized_name(self) -> &'static str {
        match self {
            ControllerKind::Vive => "Vive Controller",
            ControllerKind::Index => "Index Controller",
            ControllerKind::Generic => "Controller",
        }
    }

    pub fn aim_pose(self) -> AimPose {
        match self {
            ControllerKind::Vive => AimPose::pitched(-45.0),
            ControllerKind::Index => AimPose::pitched(-70.0),
            ControllerKind::Generic => AimPose::IDENTITY,
        }
    }
}

impl Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.localized_name())
    }
}
