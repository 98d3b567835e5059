//! Actions and action sets
//!
//! Applications declare abstract actions ("grab", "teleport", "haptic") grouped in action
//! sets. Each action carries a fixed [`ActionType`], the path(s) it ended up bound to and
//! the last value handed out to the application, which is what change detection compares
//! against.
//!
//! Actions live in a generation-checked arena ([`registry::ActionRegistry`]); a destroyed
//! handle is rejected rather than dangling.

pub mod registry;
pub mod state;

pub use registry::ActionRegistry;
pub use state::{
    ActionState, ActionStateBoolean, ActionStateFloat, ActionStateGetInfo, ActionStatePose,
    ActionStateVector2f, Latch,
};

use crate::device::FieldBinding;
use crate::path::{Path, Side};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Handle of an action set
    pub struct ActionSetHandle;
    /// Handle of an action
    pub struct ActionHandle;
}

/// Declared value type of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    BooleanInput,
    FloatInput,
    Vector2fInput,
    PoseInput,
    VibrationOutput,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::BooleanInput => write!(f, "boolean-input"),
            ActionType::FloatInput => write!(f, "float-input"),
            ActionType::Vector2fInput => write!(f, "vector2f-input"),
            ActionType::PoseInput => write!(f, "pose-input"),
            ActionType::VibrationOutput => write!(f, "vibration-output"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionSetCreateInfo {
    pub name: String,
    pub localized_name: String,
    /// Accepted and ignored, sets never compete for the same input
    pub priority: u32,
}

impl ActionSetCreateInfo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            localized_name: name.clone(),
            name,
            priority: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionCreateInfo {
    pub name: String,
    pub localized_name: String,
    pub action_type: ActionType,
    pub subaction_paths: Vec<Path>,
}

impl ActionCreateInfo {
    pub fn new(name: impl Into<String>, action_type: ActionType) -> Self {
        let name = name.into();
        Self {
            localized_name: name.clone(),
            name,
            action_type,
            subaction_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionSet {
    pub name: String,
    pub localized_name: String,
}

/// Runtime record of an action
#[derive(Debug, Clone)]
pub struct Action {
    name: String,
    localized_name: String,
    action_set: ActionSetHandle,
    action_type: ActionType,
    subaction_paths: Vec<Path>,

    // One binding per hand; a later suggestion for the same hand replaces the earlier one
    bound_paths: [String; 2],
    bindings: [Option<FieldBinding>; 2],

    pub(crate) bool_state: Latch<bool>,
    pub(crate) float_state: Latch<f32>,
    pub(crate) vector_state: Latch<Vec2>,
}

impl Action {
    pub(crate) fn new(action_set: ActionSetHandle, info: ActionCreateInfo) -> Self {
        Self {
            name: info.name,
            localized_name: info.localized_name,
            action_set,
            action_type: info.action_type,
            subaction_paths: info.subaction_paths,
            bound_paths: Default::default(),
            bindings: [None, None],
            bool_state: Latch::default(),
            float_state: Latch::default(),
            vector_state: Latch::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn localized_name(&self) -> &str {
        &self.localized_name
    }

    pub fn action_set(&self) -> ActionSetHandle {
        self.action_set
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn subaction_paths(&self) -> &[Path] {
        &self.subaction_paths
    }

    /// Human readable path this action is bound to on `side`, empty when unbound
    pub fn bound_path(&self, side: Side) -> &str {
        &self.bound_paths[side.index()]
    }

    pub fn binding(&self, side: Side) -> Option<FieldBinding> {
        self.bindings[side.index()]
    }

    /// Bound paths of both hands, skipping unbound ones
    pub fn bound_paths(&self) -> impl Iterator<Item = &str> {
        self.bound_paths
            .iter()
            .map(String::as_str)
            .filter(|path| !path.is_empty())
    }

    /// Hand whose bound path a query should use
    ///
    /// An explicit hint wins (even if that hand is unbound); otherwise the first bound
    /// hand, left before right.
    pub fn select_side(&self, hint: Option<Side>) -> Option<Side> {
        hint.or_else(|| {
            Side::BOTH
                .into_iter()
                .find(|side| !self.bound_paths[side.index()].is_empty())
        })
    }

    pub(crate) fn bind(&mut self, side: Side, path: &str, binding: FieldBinding) {
        self.bound_paths[side.index()] = path.to_owned();
        self.bindings[side.index()] = Some(binding);
    }

    pub(crate) fn unbind(&mut self, side: Side) {
        self.bound_paths[side.index()].clear();
        self.bindings[side.index()] = None;
    }
}
