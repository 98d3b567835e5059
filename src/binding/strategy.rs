//! Strategien zum Anwenden vorgeschlagener Bindings auf eine Hand
//!
//! Welche Strategie greift, hängt vom Paar (tatsächliches Profil, bevorzugtes Profil)
//! ab. Das bevorzugte Profil steht dabei für den erkannten Controller. Die
//! [`MappingTable`] hält für jedes Paar eine eigene Instanz, sodass die
//! profilspezifische Umsetzung isoliert testbar bleibt.

use super::component::{resolve_component, supports, Component};
use super::profile::{ControllerKind, InteractionProfile};
use crate::action::Action;
use crate::path::user::split_hand_path;
use crate::path::Side;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Trait für Binding-Strategien
///
/// Eine Strategie bekommt ein einzelnes vorgeschlagenes Binding und hängt die Action,
/// sofern der Controller die Komponente besitzt, an das passende Feld der Hand.
pub trait BindingStrategy: Send + Sync {
    /// Wendet ein Binding an; `false`, wenn es für diese Hand nicht umsetzbar ist
    fn apply(&self, action: &mut Action, side: Side, binding_path: &str) -> bool;

    /// Name der Strategie für Logs
    fn name(&self) -> &str;
}

/// Komponentenersetzungen, wenn ein Profil auf fremder Hardware läuft
type Remap = &'static [(Component, Component)];

const TOUCH_ON_VIVE: Remap = &[
    (Component::Thumbstick, Component::Trackpad),
    (Component::ThumbstickClick, Component::TrackpadClick),
    (Component::ThumbstickTouch, Component::TrackpadTouch),
    (Component::AClick, Component::TrackpadClick),
    (Component::XClick, Component::TrackpadClick),
    (Component::BClick, Component::Menu),
    (Component::YClick, Component::Menu),
];

const TOUCH_ON_INDEX: Remap = &[
    (Component::Menu, Component::BClick),
    (Component::ThumbRest, Component::ThumbstickTouch),
];

const MOTION_ON_VIVE: Remap = &[
    (Component::Thumbstick, Component::Trackpad),
    (Component::ThumbstickClick, Component::TrackpadClick),
];

const MOTION_ON_INDEX: Remap = &[(Component::Menu, Component::BClick)];

const SIMPLE_ON_INDEX: Remap = &[
    (Component::Select, Component::TriggerClick),
    (Component::Menu, Component::BClick),
];

const SIMPLE_ON_OTHERS: Remap = &[(Component::Select, Component::TriggerClick)];

/// Bindet die Pfade eines Profils über dessen Layout an die Felder eines Controllers
#[derive(Debug, Clone)]
pub struct ProfileMapping {
    source: InteractionProfile,
    controller: ControllerKind,
    remap: Remap,
    name: String,
}

impl ProfileMapping {
    pub fn new(source: InteractionProfile, controller: ControllerKind) -> Self {
        let remap = match (source, controller) {
            (InteractionProfile::TouchController, ControllerKind::Vive) => TOUCH_ON_VIVE,
            (InteractionProfile::TouchController, ControllerKind::Index) => TOUCH_ON_INDEX,
            (InteractionProfile::MotionController, ControllerKind::Vive) => MOTION_ON_VIVE,
            (InteractionProfile::MotionController, ControllerKind::Index) => MOTION_ON_INDEX,
            (InteractionProfile::SimpleController, ControllerKind::Index) => SIMPLE_ON_INDEX,
            (InteractionProfile::SimpleController, _) => SIMPLE_ON_OTHERS,
            _ => &[],
        };

        Self {
            source,
            controller,
            remap,
            name: format!("{:?} on {:?}", source, controller),
        }
    }

    fn translate(&self, component: Component) -> Component {
        self.remap
            .iter()
            .find(|(from, _)| *from == component)
            .map(|(_, to)| *to)
            .unwrap_or(component)
    }
}

impl BindingStrategy for ProfileMapping {
    fn apply(&self, action: &mut Action, side: Side, binding_path: &str) -> bool {
        let suffix = match split_hand_path(binding_path) {
            Some((path_side, suffix)) if path_side == side => suffix,
            _ => return false,
        };

        let Some((component, axis)) = resolve_component(self.source, suffix) else {
            debug!(
                "{}: '{}' is not part of the profile layout",
                self.name, binding_path
            );
            return false;
        };

        let component = self.translate(component);
        if !supports(self.controller, component) {
            debug!(
                "{}: controller has no {:?} for '{}'",
                self.name, component, binding_path
            );
            return false;
        }

        trace!("{}: '{}' -> {:?}", self.name, binding_path, component);
        action.bind(side, binding_path, component.field(axis));
        true
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Strategie-Tabelle, indiziert über (tatsächliches Profil, bevorzugtes Profil)
pub struct MappingTable {
    strategies: HashMap<(InteractionProfile, InteractionProfile), Box<dyn BindingStrategy>>,
}

impl MappingTable {
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Tabelle mit einer [`ProfileMapping`] für jedes Profil auf jedem bekannten Controller
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for actual in InteractionProfile::ALL {
            for controller in ControllerKind::ALL {
                table.register(
                    actual,
                    controller.preferred_profile(),
                    Box::new(ProfileMapping::new(actual, controller)),
                );
            }
        }
        table
    }

    /// Ersetzt die Strategie für ein Paar
    pub fn register(
        &mut self,
        actual: InteractionProfile,
        preferred: InteractionProfile,
        strategy: Box<dyn BindingStrategy>,
    ) {
        self.strategies.insert((actual, preferred), strategy);
    }

    pub fn get(
        &self,
        actual: InteractionProfile,
        preferred: InteractionProfile,
    ) -> Option<&dyn BindingStrategy> {
        self.strategies
            .get(&(actual, preferred))
            .map(|strategy| strategy.as_ref())
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for MappingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingTable")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}
