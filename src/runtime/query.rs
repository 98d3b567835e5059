//! State queries and binding introspection
//!
//! Every value query follows the same steps:
//!
//! 1. validate session, action handle, declared type and attachment
//! 2. pick the hand (subaction path hint, else the first bound hand)
//! 3. join subaction path and bound path, derive the side from the result
//! 4. read the bound field if the action is active and its set was latched by the last sync
//! 5. fold the reading into the action's latch, which reports the change

use super::session::{live_session, Session, SessionHandle};
use super::ActionRuntime;
use crate::action::{
    Action, ActionHandle, ActionState, ActionStateBoolean, ActionStateFloat, ActionStateGetInfo,
    ActionStatePose, ActionStateVector2f, ActionType, Latch,
};
use crate::binding::{resolve_component, AimPose};
use crate::device::{FieldBinding, HandInput};
use crate::error::ActionError;
use crate::path::user::split_hand_path;
use crate::path::{fill_buffer, join_action_path, side_of, write_c_string, Path, PathTable, Side};
use bitflags::bitflags;
use std::ops::Deref;
use tracing::{debug, trace};

bitflags! {
    /// Parts included in a localized input source name
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LocalizedNameComponents: u32 {
        const USER_PATH = 1 << 0;
        const INTERACTION_PROFILE = 1 << 1;
        const COMPONENT = 1 << 2;
    }
}

/// Validates an action against the session and the accessor's expected type
pub(super) fn checked_action<A>(
    action: Option<A>,
    handle: ActionHandle,
    session: &Session,
    expected: ActionType,
) -> Result<A, ActionError>
where
    A: Deref<Target = Action>,
{
    let action = action.ok_or_else(|| ActionError::InvalidHandle(format!("action {:?}", handle)))?;
    if action.action_type() != expected {
        return Err(ActionError::TypeMismatch {
            expected,
            actual: action.action_type(),
        });
    }
    if !session.gate.is_attached(action.action_set()) {
        return Err(ActionError::NotAttached);
    }
    Ok(action)
}

/// Where a query on an action ends up
#[derive(Debug)]
pub(super) struct Source {
    pub full_path: String,
    pub side: Option<Side>,
    pub binding: Option<FieldBinding>,
    pub hand_active: bool,
}

impl Source {
    pub(super) fn resolve(
        paths: &PathTable,
        session: &Session,
        action: &Action,
        subaction_path: Path,
    ) -> Result<Self, ActionError> {
        let subaction = paths.resolve(subaction_path)?;
        let selected = action.select_side(side_of(subaction));
        let bound = selected.map(|side| action.bound_path(side)).unwrap_or("");
        let full_path = join_action_path(subaction, bound);

        let side = if bound.is_empty() {
            None
        } else {
            side_of(&full_path)
        };
        let hand_active = side.is_some_and(|side| session.hands[side.index()].active);

        Ok(Self {
            side,
            binding: selected.and_then(|side| action.binding(side)),
            hand_active,
            full_path,
        })
    }

    fn hand<'a>(&self, session: &'a Session) -> Option<&'a HandInput> {
        self.side.map(|side| session.snapshot.hand(side))
    }
}

impl ActionRuntime {
    pub fn get_action_state_boolean(
        &mut self,
        session: SessionHandle,
        info: &ActionStateGetInfo,
    ) -> Result<ActionStateBoolean, ActionError> {
        self.value_state(
            session,
            info,
            ActionType::BooleanInput,
            |binding, hand, threshold| binding.read_bool(hand, threshold),
            |action| &mut action.bool_state,
        )
    }

    pub fn get_action_state_float(
        &mut self,
        session: SessionHandle,
        info: &ActionStateGetInfo,
    ) -> Result<ActionStateFloat, ActionError> {
        self.value_state(
            session,
            info,
            ActionType::FloatInput,
            |binding, hand, _| binding.read_float(hand),
            |action| &mut action.float_state,
        )
    }

    pub fn get_action_state_vector2f(
        &mut self,
        session: SessionHandle,
        info: &ActionStateGetInfo,
    ) -> Result<ActionStateVector2f, ActionError> {
        self.value_state(
            session,
            info,
            ActionType::Vector2fInput,
            |binding, hand, _| binding.read_vector(hand),
            |action| &mut action.vector_state,
        )
    }

    /// Pose actions only report whether the hand behind the bound path is tracked
    pub fn get_action_state_pose(
        &self,
        session: SessionHandle,
        info: &ActionStateGetInfo,
    ) -> Result<ActionStatePose, ActionError> {
        let session = live_session(&self.session, session)?;
        let action = checked_action(
            self.registry.action(info.action),
            info.action,
            session,
            ActionType::PoseInput,
        )?;
        let source = Source::resolve(&self.paths, session, action, info.subaction_path)?;

        Ok(ActionStatePose {
            is_active: source.hand_active,
        })
    }

    fn value_state<T: Copy + PartialEq + std::fmt::Debug>(
        &mut self,
        session: SessionHandle,
        info: &ActionStateGetInfo,
        expected: ActionType,
        read: impl Fn(&FieldBinding, &HandInput, f32) -> Option<T>,
        latch: impl FnOnce(&mut Action) -> &mut Latch<T>,
    ) -> Result<ActionState<T>, ActionError> {
        let Self {
            config,
            paths,
            registry,
            session: slot,
            ..
        } = self;

        let session = live_session(slot, session)?;
        let action = checked_action(
            registry.action_mut(info.action),
            info.action,
            session,
            expected,
        )?;
        let source = Source::resolve(paths, session, action, info.subaction_path)?;

        let reading = match (source.binding, source.hand(session)) {
            (Some(binding), Some(hand)) => read(&binding, hand, config.click_threshold),
            _ => None,
        };
        let is_active = source.hand_active && reading.is_some();
        let latched = session.frame_latched.contains(&action.action_set());
        let fresh = if is_active && latched { reading } else { None };

        let state = latch(&mut *action).observe(fresh, session.snapshot.time(), is_active);
        trace!(
            "{} '{}' via '{}': {:?}",
            expected,
            action.name(),
            source.full_path,
            state
        );
        Ok(state)
    }

    /// Two-call enumeration of the paths an action is currently bound to
    pub fn enumerate_bound_sources_for_action(
        &mut self,
        session: SessionHandle,
        action: ActionHandle,
        buffer: &mut [Path],
    ) -> Result<usize, ActionError> {
        let live = live_session(&self.session, session)?;
        let record = self
            .registry
            .action(action)
            .ok_or_else(|| ActionError::InvalidHandle(format!("action {:?}", action)))?;
        if !live.gate.is_attached(record.action_set()) {
            return Err(ActionError::NotAttached);
        }

        let bound: Vec<String> = record.bound_paths().map(str::to_owned).collect();
        let sources: Vec<Path> = bound.iter().map(|path| self.paths.intern(path)).collect();
        debug!("Action '{:?}' has {} bound sources", action, sources.len());
        fill_buffer(&sources, buffer)
    }

    /// Two-call string like "Left Hand Index Controller Trigger"
    pub fn get_input_source_localized_name(
        &self,
        session: SessionHandle,
        source_path: Path,
        components: LocalizedNameComponents,
        buffer: &mut [u8],
    ) -> Result<usize, ActionError> {
        let session = live_session(&self.session, session)?;
        if session.gate.is_empty() {
            return Err(ActionError::NotAttached);
        }
        if components.is_empty() {
            return Err(ActionError::InvalidArgument(
                "no name components requested".to_string(),
            ));
        }
        if source_path.is_null() {
            return Err(ActionError::PathInvalid(source_path.into_raw()));
        }

        let path = self.paths.resolve(source_path)?;
        let mut parts: Vec<&str> = Vec::new();

        if let Some((side, suffix)) = split_hand_path(path) {
            let hand = &session.hands[side.index()];

            if components.contains(LocalizedNameComponents::USER_PATH) {
                parts.push(match side {
                    Side::Left => "Left Hand",
                    Side::Right => "Right Hand",
                });
            }
            if components.contains(LocalizedNameComponents::INTERACTION_PROFILE) {
                if let Some(kind) = hand.kind {
                    parts.push(kind.localized_name());
                }
            }
            if components.contains(LocalizedNameComponents::COMPONENT) {
                if let Some((component, _)) =
                    hand.profile.and_then(|profile| resolve_component(profile, suffix))
                {
                    parts.push(component.display_name());
                }
            }
        }

        let name = parts.join(" ");
        debug!("Localized name for '{}': '{}'", path, name);
        write_c_string(&name, buffer)
    }

    /// Profile bound to a top level user path; the null path means the left hand
    pub fn get_current_interaction_profile(
        &self,
        session: SessionHandle,
        top_level_path: Path,
    ) -> Result<Path, ActionError> {
        let session = live_session(&self.session, session)?;
        if session.gate.is_empty() {
            return Err(ActionError::NotAttached);
        }

        let path = self.paths.resolve(top_level_path)?;
        let side = if top_level_path.is_null() {
            Some(Side::Left)
        } else {
            side_of(path)
        };

        Ok(side
            .map(|side| session.hands[side.index()].interaction_profile)
            .unwrap_or(Path::NULL))
    }

    /// Aim-pose offset of the controller currently resolved for `side`
    pub fn aim_pose(&self, session: SessionHandle, side: Side) -> Result<AimPose, ActionError> {
        let session = live_session(&self.session, session)?;
        Ok(session.hands[side.index()].aim_pose)
    }
}
