//! Action set and action lifecycle
//!
//! Both kinds of objects live in `slotmap` arenas. Destroying a handle bumps the slot
//! generation, so a stale handle never aliases a newer object.
//!
//! Destroying an action set leaves its actions alive. They keep pointing at the dead set
//! and can still be destroyed individually. If the set was attached before it was
//! destroyed, the session still counts it as attached and queries on its actions keep
//! working; otherwise they fail with not-attached.

use super::{Action, ActionCreateInfo, ActionHandle, ActionSet, ActionSetCreateInfo, ActionSetHandle};
use crate::error::ActionError;
use slotmap::SlotMap;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct ActionRegistry {
    sets: SlotMap<ActionSetHandle, ActionSet>,
    actions: SlotMap<ActionHandle, Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_action_set(&mut self, info: ActionSetCreateInfo) -> ActionSetHandle {
        let handle = self.sets.insert(ActionSet {
            name: info.name,
            localized_name: info.localized_name,
        });
        debug!("Created action set {:?} ({})", handle, self.sets[handle].name);
        handle
    }

    pub fn destroy_action_set(&mut self, handle: ActionSetHandle) -> Result<(), ActionError> {
        match self.sets.remove(handle) {
            Some(set) => {
                let orphans = self
                    .actions
                    .values()
                    .filter(|action| action.action_set() == handle)
                    .count();
                if orphans > 0 {
                    warn!(
                        "Action set '{}' destroyed with {} live actions",
                        set.name, orphans
                    );
                }
                debug!("Destroyed action set {:?}", handle);
                Ok(())
            }
            None => Err(ActionError::InvalidHandle(format!("action set {:?}", handle))),
        }
    }

    pub fn contains_action_set(&self, handle: ActionSetHandle) -> bool {
        self.sets.contains_key(handle)
    }

    pub fn action_set(&self, handle: ActionSetHandle) -> Option<&ActionSet> {
        self.sets.get(handle)
    }

    pub fn create_action(
        &mut self,
        action_set: ActionSetHandle,
        info: ActionCreateInfo,
    ) -> Result<ActionHandle, ActionError> {
        if !self.sets.contains_key(action_set) {
            return Err(ActionError::InvalidHandle(format!("action set {:?}", action_set)));
        }

        let action_type = info.action_type;
        let handle = self.actions.insert(Action::new(action_set, info));
        debug!(
            "Created action {:?} ({}, {}) in set {:?}",
            handle, self.actions[handle].name(), action_type, action_set
        );
        Ok(handle)
    }

    pub fn destroy_action(&mut self, handle: ActionHandle) -> Result<(), ActionError> {
        self.actions
            .remove(handle)
            .map(|action| debug!("Destroyed action {:?} ({})", handle, action.name()))
            .ok_or_else(|| ActionError::InvalidHandle(format!("action {:?}", handle)))
    }

    pub fn contains_action(&self, handle: ActionHandle) -> bool {
        self.actions.contains_key(handle)
    }

    pub fn action(&self, handle: ActionHandle) -> Option<&Action> {
        self.actions.get(handle)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut Action> {
        self.actions.get_mut(handle)
    }

    pub fn actions_mut(&mut self) -> impl Iterator<Item = &mut Action> {
        self.actions.values_mut()
    }
}
