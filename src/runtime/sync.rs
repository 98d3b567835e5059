//! Attachment, synchronization and rebinding on controller changes

use super::session::{live_session_mut, HandState, SessionHandle};
use super::{ActionRuntime, RuntimeEvent};
use crate::action::{ActionRegistry, ActionSetHandle};
use crate::binding::{
    AimPose, BindingSuggestionStore, ControllerKind, InteractionProfile, MappingTable,
};
use crate::error::ActionError;
use crate::path::{Path, PathTable, Side};
use tracing::{debug, info, trace, warn};

/// Entry of the active list passed to [`ActionRuntime::sync_actions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveActionSet {
    pub action_set: ActionSetHandle,
    /// Accepted for API compatibility, a set is always latched for both hands
    pub subaction_path: Path,
}

impl ActiveActionSet {
    pub fn new(action_set: ActionSetHandle) -> Self {
        Self {
            action_set,
            subaction_path: Path::NULL,
        }
    }
}

impl ActionRuntime {
    /// Attaches the action sets to the session and freezes all binding suggestions
    pub fn attach_session_action_sets(
        &mut self,
        session: SessionHandle,
        action_sets: &[ActionSetHandle],
    ) -> Result<(), ActionError> {
        debug!("Attaching {} action sets to {}", action_sets.len(), session);
        let Self {
            registry,
            suggestions,
            session: slot,
            ..
        } = self;

        let session = live_session_mut(slot, session)?;
        session.gate.attach(action_sets, registry)?;
        suggestions.seal();
        Ok(())
    }

    /// Latches `active_sets` for this frame and refreshes the device state
    ///
    /// The snapshot is fetched even when `active_sets` is empty. Each hand's controller
    /// identity is re-read and a change rebinds that hand.
    pub fn sync_actions(
        &mut self,
        session: SessionHandle,
        active_sets: &[ActiveActionSet],
    ) -> Result<(), ActionError> {
        trace!("Syncing {} active sets on {}", active_sets.len(), session);
        let Self {
            paths,
            registry,
            suggestions,
            mappings,
            session: slot,
            events,
            ..
        } = self;

        let session = live_session_mut(slot, session)?;
        if let Some(entry) = active_sets
            .iter()
            .find(|entry| !session.gate.is_attached(entry.action_set))
        {
            debug!("Sync with unattached action set {:?}", entry.action_set);
            return Err(ActionError::NotAttached);
        }

        // Nothing is committed until the device has answered for both hands
        let snapshot = session.device.fetch_input_snapshot()?;
        let identities = [
            session.device.controller_identity(Side::Left)?,
            session.device.controller_identity(Side::Right)?,
        ];

        session.frame_latched = active_sets.iter().map(|entry| entry.action_set).collect();
        session.snapshot = snapshot;

        for (side, identity) in Side::BOTH.into_iter().zip(identities) {
            let hand = &mut session.hands[side.index()];
            if !hand.observe(&identity) {
                continue;
            }

            rebind(paths, registry, suggestions, mappings, hand, side);
            events.push_back(RuntimeEvent::InteractionProfileChanged {
                session: session.handle,
                side,
                profile: hand.interaction_profile,
            });
        }

        Ok(())
    }
}

/// Clears the hand's bindings and applies the suggestions of the best matching profile
fn rebind(
    paths: &PathTable,
    registry: &mut ActionRegistry,
    suggestions: &BindingSuggestionStore,
    mappings: &MappingTable,
    hand: &mut HandState,
    side: Side,
) {
    for action in registry.actions_mut() {
        action.unbind(side);
    }

    // A disconnected hand resolves like an unknown controller and stays inactive
    let kind = hand.kind.unwrap_or(ControllerKind::Generic);

    let preferred = kind.preferred_profile();
    let resolved = InteractionProfile::candidates(preferred).find_map(|candidate| {
        let path = paths.lookup(candidate.path())?;
        suggestions.get(path).map(|bindings| (candidate, path, bindings))
    });

    let Some((actual, profile_path, bindings)) = resolved else {
        warn!(
            "No suggested bindings usable for {} on {} hand",
            kind, side
        );
        clear_profile(hand);
        return;
    };

    let Some(strategy) = mappings.get(actual, preferred) else {
        warn!("No binding strategy for {} with {}", actual, preferred);
        clear_profile(hand);
        return;
    };

    let mut bound = 0;
    for suggestion in bindings {
        let Some(action) = registry.action_mut(suggestion.action) else {
            trace!("Skipping binding for unknown action {:?}", suggestion.action);
            continue;
        };
        let Ok(binding_path) = paths.resolve(suggestion.binding) else {
            trace!("Skipping binding with unknown path {}", suggestion.binding);
            continue;
        };
        if strategy.apply(action, side, binding_path) {
            bound += 1;
        }
    }

    hand.profile = Some(actual);
    hand.interaction_profile = profile_path;
    hand.aim_pose = kind.aim_pose();
    info!(
        "{} hand: {} resolved to {} via '{}', {} bindings applied",
        side,
        kind,
        actual,
        strategy.name(),
        bound
    );
}

fn clear_profile(hand: &mut HandState) {
    hand.profile = None;
    hand.interaction_profile = Path::NULL;
    hand.aim_pose = AimPose::IDENTITY;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionCreateInfo, ActionSetCreateInfo, ActionStateGetInfo, ActionType};
    use crate::binding::SuggestedBinding;
    use crate::device::SimulatedDevice;

    struct Fixture {
        runtime: ActionRuntime,
        device: SimulatedDevice,
        session: SessionHandle,
        set: ActionSetHandle,
    }

    fn fixture() -> Fixture {
        let mut runtime = ActionRuntime::default();
        let device = SimulatedDevice::new();
        let set = runtime.create_action_set(ActionSetCreateInfo::new("gameplay"));
        let session = runtime.create_session(device.clone()).unwrap();
        Fixture {
            runtime,
            device,
            session,
            set,
        }
    }

    #[test]
    fn sync_requires_attachment() {
        let Fixture {
            mut runtime,
            session,
            set,
            ..
        } = fixture();

        assert!(matches!(
            runtime.sync_actions(session, &[ActiveActionSet::new(set)]),
            Err(ActionError::NotAttached)
        ));
        runtime.attach_session_action_sets(session, &[set]).unwrap();
        runtime
            .sync_actions(session, &[ActiveActionSet::new(set)])
            .unwrap();
    }

    #[test]
    fn attach_seals_suggestions() {
        let Fixture {
            mut runtime,
            session,
            set,
            ..
        } = fixture();
        let profile = runtime.string_to_path(InteractionProfile::SimpleController.path());

        runtime.attach_session_action_sets(session, &[set]).unwrap();
        assert!(matches!(
            runtime.suggest_interaction_profile_bindings(profile, Vec::new()),
            Err(ActionError::AlreadyAttached)
        ));
        assert!(matches!(
            runtime.attach_session_action_sets(session, &[set]),
            Err(ActionError::AlreadyAttached)
        ));
    }

    #[test]
    fn identity_change_queues_profile_event() {
        let Fixture {
            mut runtime,
            device,
            session,
            set,
        } = fixture();
        let action = runtime
            .create_action(set, ActionCreateInfo::new("fire", ActionType::BooleanInput))
            .unwrap();
        let profile = runtime.string_to_path(InteractionProfile::IndexController.path());
        let binding = runtime.string_to_path("/user/hand/right/input/trigger/click");
        runtime
            .suggest_interaction_profile_bindings(profile, vec![SuggestedBinding { action, binding }])
            .unwrap();
        runtime.attach_session_action_sets(session, &[set]).unwrap();

        device.connect(Side::Right, "knuckles");
        runtime.sync_actions(session, &[]).unwrap();
        assert_eq!(
            runtime.poll_event(),
            Some(RuntimeEvent::InteractionProfileChanged {
                session,
                side: Side::Right,
                profile
            })
        );
        assert_eq!(runtime.poll_event(), None);
        assert_eq!(
            runtime.action(action).unwrap().bound_path(Side::Right),
            "/user/hand/right/input/trigger/click"
        );

        // Same identity again: nothing to rebind
        runtime.sync_actions(session, &[]).unwrap();
        assert_eq!(runtime.poll_event(), None);
    }

    #[test]
    fn fallback_profile_is_used_when_preferred_has_no_suggestions() {
        let Fixture {
            mut runtime,
            device,
            session,
            set,
        } = fixture();
        let action = runtime
            .create_action(set, ActionCreateInfo::new("menu", ActionType::BooleanInput))
            .unwrap();
        let simple = runtime.string_to_path(InteractionProfile::SimpleController.path());
        let binding = runtime.string_to_path("/user/hand/left/input/menu/click");
        runtime
            .suggest_interaction_profile_bindings(simple, vec![SuggestedBinding { action, binding }])
            .unwrap();
        runtime.attach_session_action_sets(session, &[set]).unwrap();

        device.connect(Side::Left, "vive_controller");
        runtime.sync_actions(session, &[]).unwrap();

        assert_eq!(
            runtime.get_current_interaction_profile(session, Path::NULL).unwrap(),
            simple
        );
        assert_eq!(
            runtime.action(action).unwrap().bound_path(Side::Left),
            "/user/hand/left/input/menu/click"
        );
    }

    #[test]
    fn no_suggestions_clears_profile_and_aim_pose() {
        let Fixture {
            mut runtime,
            device,
            session,
            set,
        } = fixture();
        runtime.attach_session_action_sets(session, &[set]).unwrap();

        device.connect(Side::Left, "knuckles");
        runtime.sync_actions(session, &[]).unwrap();

        assert_eq!(
            runtime.get_current_interaction_profile(session, Path::NULL).unwrap(),
            Path::NULL
        );
        assert_eq!(runtime.aim_pose(session, Side::Left).unwrap(), AimPose::IDENTITY);
        assert_eq!(
            runtime.poll_event(),
            Some(RuntimeEvent::InteractionProfileChanged {
                session,
                side: Side::Left,
                profile: Path::NULL
            })
        );
    }

    #[test]
    fn disconnected_hand_keeps_simple_profile_but_goes_inactive() {
        let Fixture {
            mut runtime,
            device,
            session,
            set,
        } = fixture();
        let action = runtime
            .create_action(set, ActionCreateInfo::new("select", ActionType::BooleanInput))
            .unwrap();
        let simple = runtime.string_to_path(InteractionProfile::SimpleController.path());
        let binding = runtime.string_to_path("/user/hand/left/input/select/click");
        runtime
            .suggest_interaction_profile_bindings(simple, vec![SuggestedBinding { action, binding }])
            .unwrap();
        runtime.attach_session_action_sets(session, &[set]).unwrap();
        let active = [ActiveActionSet::new(set)];

        device.connect(Side::Left, "knuckles");
        runtime.sync_actions(session, &active).unwrap();
        device.disconnect(Side::Left);
        runtime.sync_actions(session, &active).unwrap();

        assert_eq!(
            runtime.get_current_interaction_profile(session, Path::NULL).unwrap(),
            simple
        );
        assert_eq!(
            runtime.action(action).unwrap().bound_path(Side::Left),
            "/user/hand/left/input/select/click"
        );
        let state = runtime
            .get_action_state_boolean(session, &ActionStateGetInfo::new(action))
            .unwrap();
        assert!(!state.is_active);
        assert_eq!(runtime.aim_pose(session, Side::Left).unwrap(), AimPose::IDENTITY);
    }

    #[test]
    fn failed_sync_leaves_latched_sets_untouched() {
        let Fixture {
            mut runtime,
            device,
            session,
            set,
        } = fixture();
        let other = runtime.create_action_set(ActionSetCreateInfo::new("other"));
        let grab = runtime
            .create_action(other, ActionCreateInfo::new("grab", ActionType::FloatInput))
            .unwrap();
        let index = runtime.string_to_path(InteractionProfile::IndexController.path());
        let binding = runtime.string_to_path("/user/hand/left/input/squeeze/value");
        runtime
            .suggest_interaction_profile_bindings(
                index,
                vec![SuggestedBinding {
                    action: grab,
                    binding,
                }],
            )
            .unwrap();
        runtime
            .attach_session_action_sets(session, &[set, other])
            .unwrap();

        device.connect(Side::Left, "knuckles");
        device.update_hand(Side::Left, |hand| hand.grip = 0.5);
        runtime
            .sync_actions(session, &[ActiveActionSet::new(set)])
            .unwrap();

        device.set_failing(true);
        assert!(runtime
            .sync_actions(session, &[ActiveActionSet::new(other)])
            .is_err());

        let state = runtime
            .get_action_state_float(session, &ActionStateGetInfo::new(grab))
            .unwrap();
        assert!(state.is_active);
        assert_eq!(state.current_state, 0.0);
        assert!(!state.changed_since_last_sync);
    }

    #[test]
    fn device_failure_propagates() {
        let Fixture {
            mut runtime,
            device,
            session,
            set,
        } = fixture();
        runtime.attach_session_action_sets(session, &[set]).unwrap();

        device.set_failing(true);
        assert!(matches!(
            runtime.sync_actions(session, &[ActiveActionSet::new(set)]),
            Err(ActionError::Device(_))
        ));
    }
}
