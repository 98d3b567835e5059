//! Session state: device, attachment gate, frame-latched sets and per-hand state

use crate::action::{ActionRegistry, ActionSetHandle};
use crate::binding::{AimPose, ControllerKind, InteractionProfile};
use crate::device::{DeviceLayer, InputSnapshot};
use crate::error::ActionError;
use crate::path::Path;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Handle of a live session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

impl SessionHandle {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        SessionHandle(raw)
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session({})", self.0)
    }
}

/// One-shot association of action sets with a session
#[derive(Debug, Default)]
pub struct AttachmentGate {
    attached: HashSet<ActionSetHandle>,
}

impl AttachmentGate {
    /// Attaches `sets` as a whole or not at all
    pub fn attach(
        &mut self,
        sets: &[ActionSetHandle],
        registry: &ActionRegistry,
    ) -> Result<(), ActionError> {
        if !self.attached.is_empty() {
            return Err(ActionError::AlreadyAttached);
        }
        if sets.is_empty() {
            return Err(ActionError::InvalidArgument(
                "no action sets to attach".to_string(),
            ));
        }
        if let Some(unknown) = sets.iter().find(|set| !registry.contains_action_set(**set)) {
            return Err(ActionError::InvalidHandle(format!("action set {:?}", unknown)));
        }

        self.attached.extend(sets.iter().copied());
        debug!("Attached {} action sets", self.attached.len());
        Ok(())
    }

    pub fn is_attached(&self, set: ActionSetHandle) -> bool {
        self.attached.contains(&set)
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}

/// What the device layer last reported for a hand
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Unknown,
    Identified(String),
}

impl ControllerState {
    fn from_identity(identity: &str) -> Self {
        if identity.is_empty() {
            ControllerState::Unknown
        } else {
            ControllerState::Identified(identity.to_owned())
        }
    }

    pub fn identity(&self) -> &str {
        match self {
            ControllerState::Unknown => "",
            ControllerState::Identified(identity) => identity,
        }
    }
}

/// Per-hand runtime state
#[derive(Debug, Clone, Default)]
pub struct HandState {
    pub controller: ControllerState,
    pub active: bool,
    pub kind: Option<ControllerKind>,
    pub profile: Option<InteractionProfile>,
    pub interaction_profile: Path,
    pub aim_pose: AimPose,
}

impl HandState {
    /// Records the identity read this cycle; `true` when it differs from the last one
    pub fn observe(&mut self, identity: &str) -> bool {
        let next = ControllerState::from_identity(identity);
        self.active = !identity.is_empty();

        if next == self.controller {
            return false;
        }

        info!(
            "Controller changed: '{}' -> '{}'",
            self.controller.identity(),
            identity
        );
        self.kind = match next {
            ControllerState::Unknown => None,
            ControllerState::Identified(ref identity) => Some(ControllerKind::identify(identity)),
        };
        self.controller = next;
        true
    }
}

pub(crate) struct Session {
    pub(crate) handle: SessionHandle,
    pub(crate) device: Box<dyn DeviceLayer>,
    pub(crate) gate: AttachmentGate,
    pub(crate) frame_latched: HashSet<ActionSetHandle>,
    pub(crate) snapshot: InputSnapshot,
    pub(crate) hands: [HandState; 2],
}

impl Session {
    pub(crate) fn new(handle: SessionHandle, device: Box<dyn DeviceLayer>) -> Self {
        Self {
            handle,
            device,
            gate: AttachmentGate::default(),
            frame_latched: HashSet::new(),
            snapshot: InputSnapshot::default(),
            hands: Default::default(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("handle", &self.handle)
            .field("gate", &self.gate)
            .field("frame_latched", &self.frame_latched)
            .field("hands", &self.hands)
            .finish_non_exhaustive()
    }
}

pub(crate) fn live_session(
    slot: &Option<Session>,
    handle: SessionHandle,
) -> Result<&Session, ActionError> {
    slot.as_ref()
        .filter(|session| session.handle == handle)
        .ok_or_else(|| ActionError::InvalidHandle(handle.to_string()))
}

pub(crate) fn live_session_mut(
    slot: &mut Option<Session>,
    handle: SessionHandle,
) -> Result<&mut Session, ActionError> {
    slot.as_mut()
        .filter(|session| session.handle == handle)
        .ok_or_else(|| ActionError::InvalidHandle(handle.to_string()))
}
