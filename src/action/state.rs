//! Values handed out by state queries and the latch that produces them

use super::ActionHandle;
use crate::device::Time;
use crate::path::Path;
use glam::Vec2;

/// Which action to query, optionally narrowed to one top level user path
#[derive(Debug, Clone, Copy)]
pub struct ActionStateGetInfo {
    pub action: ActionHandle,
    pub subaction_path: Path,
}

impl ActionStateGetInfo {
    pub fn new(action: ActionHandle) -> Self {
        Self {
            action,
            subaction_path: Path::NULL,
        }
    }

    pub fn with_subaction_path(action: ActionHandle, subaction_path: Path) -> Self {
        Self {
            action,
            subaction_path,
        }
    }
}

/// Result of a value query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionState<T> {
    pub current_state: T,
    pub changed_since_last_sync: bool,
    pub last_change_time: Time,
    pub is_active: bool,
}

pub type ActionStateBoolean = ActionState<bool>;
pub type ActionStateFloat = ActionState<f32>;
pub type ActionStateVector2f = ActionState<Vec2>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionStatePose {
    pub is_active: bool,
}

/// Last value reported for one value type of an action
///
/// Every query goes through [`Latch::observe`], which records what it returns. Asking
/// twice against the same snapshot therefore reports a change only the first time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Latch<T> {
    value: T,
    last_change_time: Time,
}

impl<T: Copy + PartialEq> Latch<T> {
    pub fn value(&self) -> T {
        self.value
    }

    pub fn last_change_time(&self) -> Time {
        self.last_change_time
    }

    /// Folds a fresh reading (or `None` when the action may not advance) into the latch
    pub fn observe(&mut self, fresh: Option<T>, now: Time, is_active: bool) -> ActionState<T> {
        let current_state = fresh.unwrap_or(self.value);
        let changed_since_last_sync = current_state != self.value;
        let last_change_time = if changed_since_last_sync {
            now
        } else {
            self.last_change_time
        };

        self.value = current_state;
        self.last_change_time = last_change_time;

        ActionState {
            current_state,
            changed_since_last_sync,
            last_change_time,
            is_active,
        }
    }
}
