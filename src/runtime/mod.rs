//! The action runtime
//!
//! [`ActionRuntime`] is the single context object holding every piece of mutable state:
//! path table, action registry, binding suggestions and the live session. All entry
//! points take `&mut self` and run to completion on the caller's thread; concurrent use
//! goes through [`handle::RuntimeHandle`], which owns the runtime inside one tokio task.
//!
//! # Lifecycle
//!
//! ```text
//! string_to_path / create_action_set / create_action
//!         │
//!         ▼
//! suggest_interaction_profile_bindings (per profile, any number of times)
//!         │
//!         ▼
//! create_session ──► attach_session_action_sets (exactly once)
//!                            │
//!                            ▼
//!              ┌──► sync_actions ──► get_action_state_* / apply_haptic_feedback
//!              └──────────┘
//! ```

pub mod handle;
pub mod haptics;
pub mod query;
pub mod session;
pub mod sync;

pub use handle::{HandleError, RuntimeClient, RuntimeHandle};
pub use haptics::{HapticActionInfo, HapticFeedback, HapticVibration};
pub use query::LocalizedNameComponents;
pub use session::{AttachmentGate, ControllerState, HandState, SessionHandle};
pub use sync::ActiveActionSet;

use crate::action::{
    Action, ActionCreateInfo, ActionHandle, ActionRegistry, ActionSetCreateInfo, ActionSetHandle,
};
use crate::binding::{BindingSuggestionStore, MappingTable, SuggestedBinding};
use crate::config::InputConfig;
use crate::device::DeviceLayer;
use crate::error::ActionError;
use crate::path::{Path, PathTable, Side};
use session::Session;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Notifications queued by the runtime, drained with [`ActionRuntime::poll_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A hand was rebound; `profile` is the null path when nothing could be bound
    InteractionProfileChanged {
        session: SessionHandle,
        side: Side,
        profile: Path,
    },
}

#[derive(Debug)]
pub struct ActionRuntime {
    config: InputConfig,
    paths: PathTable,
    registry: ActionRegistry,
    suggestions: BindingSuggestionStore,
    mappings: MappingTable,
    session: Option<Session>,
    next_session: u64,
    events: VecDeque<RuntimeEvent>,
}

impl Default for ActionRuntime {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl ActionRuntime {
    pub fn new(config: InputConfig) -> Self {
        Self::with_mappings(config, MappingTable::standard())
    }

    /// Runtime with a custom binding strategy table
    pub fn with_mappings(config: InputConfig, mappings: MappingTable) -> Self {
        info!(
            "Creating action runtime (click threshold {}, haptics {})",
            config.click_threshold,
            if config.haptics_enabled { "on" } else { "off" }
        );
        Self {
            config,
            paths: PathTable::new(),
            registry: ActionRegistry::new(),
            suggestions: BindingSuggestionStore::new(),
            mappings,
            session: None,
            next_session: 1,
            events: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn string_to_path(&mut self, path: &str) -> Path {
        self.paths.intern(path)
    }

    /// Two-call string materialization, see [`PathTable::path_to_string`]
    pub fn path_to_string(&self, path: Path, buffer: &mut [u8]) -> Result<usize, ActionError> {
        self.paths.path_to_string(path, buffer)
    }

    /// Convenience lookup without the buffer protocol
    pub fn path_str(&self, path: Path) -> Result<&str, ActionError> {
        self.paths.resolve(path)
    }

    pub fn create_action_set(&mut self, info: ActionSetCreateInfo) -> ActionSetHandle {
        self.registry.create_action_set(info)
    }

    pub fn destroy_action_set(&mut self, handle: ActionSetHandle) -> Result<(), ActionError> {
        self.registry.destroy_action_set(handle)
    }

    pub fn create_action(
        &mut self,
        action_set: ActionSetHandle,
        info: ActionCreateInfo,
    ) -> Result<ActionHandle, ActionError> {
        if let Some(unknown) = info
            .subaction_paths
            .iter()
            .find(|path| self.paths.resolve(**path).is_err())
        {
            return Err(ActionError::PathInvalid(unknown.into_raw()));
        }
        self.registry.create_action(action_set, info)
    }

    pub fn destroy_action(&mut self, handle: ActionHandle) -> Result<(), ActionError> {
        self.registry.destroy_action(handle)
    }

    pub fn action(&self, handle: ActionHandle) -> Option<&Action> {
        self.registry.action(handle)
    }

    /// Replaces the suggested bindings for `profile`
    ///
    /// Neither the actions nor the binding paths are validated here; unknown actions are
    /// skipped and unmatched paths stay unbound when a controller is resolved.
    pub fn suggest_interaction_profile_bindings(
        &mut self,
        profile: Path,
        bindings: Vec<SuggestedBinding>,
    ) -> Result<(), ActionError> {
        if profile.is_null() {
            return Err(ActionError::PathInvalid(profile.into_raw()));
        }
        let name = self.paths.resolve(profile)?;
        debug!("Suggesting {} bindings for '{}'", bindings.len(), name);
        self.suggestions.suggest(profile, bindings)
    }

    /// Opens the session; only one may be live at a time
    pub fn create_session<D>(&mut self, device: D) -> Result<SessionHandle, ActionError>
    where
        D: DeviceLayer + 'static,
    {
        if let Some(live) = &self.session {
            warn!("Refusing second session while {} is live", live.handle);
            return Err(ActionError::InvalidArgument(format!(
                "{} is still live",
                live.handle
            )));
        }

        let handle = SessionHandle::from_raw(self.next_session);
        self.next_session += 1;
        self.session = Some(Session::new(handle, Box::new(device)));
        info!("Created {}", handle);
        Ok(handle)
    }

    /// Closes the session and drops its device
    pub fn destroy_session(&mut self, handle: SessionHandle) -> Result<(), ActionError> {
        session::live_session(&self.session, handle)?;
        self.session = None;
        self.events.retain(|event| match event {
            RuntimeEvent::InteractionProfileChanged { session, .. } => *session != handle,
        });
        info!("Destroyed {}", handle);
        Ok(())
    }

    pub fn poll_event(&mut self) -> Option<RuntimeEvent> {
        self.events.pop_front()
    }
}
