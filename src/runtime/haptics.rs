//! Haptic output actions

use super::query::{checked_action, Source};
use super::session::{live_session_mut, SessionHandle};
use super::ActionRuntime;
use crate::action::{ActionHandle, ActionType};
use crate::error::ActionError;
use crate::path::Path;
use tracing::{debug, trace};

const HAPTIC_SUFFIX: &str = "/output/haptic";

/// Which vibration action to drive, optionally narrowed to one hand
#[derive(Debug, Clone, Copy)]
pub struct HapticActionInfo {
    pub action: ActionHandle,
    pub subaction_path: Path,
}

impl HapticActionInfo {
    pub fn new(action: ActionHandle) -> Self {
        Self {
            action,
            subaction_path: Path::NULL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticVibration {
    /// Requested duration in nanoseconds, the device only knows single pulses
    pub duration: i64,
    pub frequency: f32,
    pub amplitude: f32,
}

/// Haptic payload; anything but a simple vibration is ignored
#[derive(Debug, Clone, PartialEq)]
pub enum HapticFeedback {
    Vibration(HapticVibration),
    Unsupported(String),
}

impl ActionRuntime {
    /// Fires the first vibration in `feedback` on the hand the action is bound to
    pub fn apply_haptic_feedback(
        &mut self,
        session: SessionHandle,
        info: &HapticActionInfo,
        feedback: &[HapticFeedback],
    ) -> Result<(), ActionError> {
        let Self {
            config,
            paths,
            registry,
            session: slot,
            ..
        } = self;

        let session = live_session_mut(slot, session)?;
        let action = checked_action(
            registry.action(info.action),
            info.action,
            session,
            ActionType::VibrationOutput,
        )?;
        let source = Source::resolve(paths, session, action, info.subaction_path)?;

        let Some(vibration) = feedback.iter().find_map(|payload| match payload {
            HapticFeedback::Vibration(vibration) => Some(vibration),
            HapticFeedback::Unsupported(_) => None,
        }) else {
            trace!("No vibration payload for '{}'", action.name());
            return Ok(());
        };

        // NaN counts as no amplitude
        if !(vibration.amplitude > 0.0) || !config.haptics_enabled {
            trace!("Skipping haptics for '{}'", action.name());
            return Ok(());
        }

        match source.side {
            Some(side) if source.full_path.ends_with(HAPTIC_SUFFIX) => {
                debug!(
                    "Haptic pulse {:.2} on {} hand for '{}'",
                    vibration.amplitude,
                    side,
                    action.name()
                );
                session
                    .device
                    .trigger_haptic_pulse(side, vibration.amplitude.min(1.0))?;
            }
            _ => trace!("'{}' is not bound to a haptic output", action.name()),
        }
        Ok(())
    }

    /// Validates the call; there is no sustained effect to stop
    pub fn stop_haptic_feedback(
        &mut self,
        session: SessionHandle,
        info: &HapticActionInfo,
    ) -> Result<(), ActionError> {
        let session = live_session_mut(&mut self.session, session)?;
        checked_action(
            self.registry.action(info.action),
            info.action,
            session,
            ActionType::VibrationOutput,
        )?;
        Ok(())
    }
}
