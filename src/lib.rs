//! openactions - action binding and input state resolution
//!
//! Applications declare abstract actions ("grab", "teleport", "rumble") grouped into
//! action sets and suggest where each one should be bound for a number of interaction
//! profiles. At runtime the engine detects which controller is held in each hand, picks
//! the best matching profile, binds the actions onto the fields of the device snapshot and
//! answers per-frame state queries with change detection.
//!
//! # Architecture
//!
//! ```text
//! path     ─ interning of symbolic paths
//! action   ─ action sets, actions, latched state values
//! binding  ─ suggestions, interaction profiles, binding strategies
//! device   ─ DeviceLayer trait, simulated and gamepad backends
//! runtime  ─ ActionRuntime (sync, queries, haptics) and the async RuntimeHandle
//! config   ─ TOML configuration
//! ```
//!
//! # Example
//!
//! ```rust
//! use openactions::action::{ActionCreateInfo, ActionSetCreateInfo, ActionStateGetInfo, ActionType};
//! use openactions::binding::{InteractionProfile, SuggestedBinding};
//! use openactions::device::SimulatedDevice;
//! use openactions::path::Side;
//! use openactions::runtime::{ActionRuntime, ActiveActionSet};
//!
//! # fn main() -> Result<(), openactions::ActionError> {
//! let mut runtime = ActionRuntime::default();
//! let set = runtime.create_action_set(ActionSetCreateInfo::new("gameplay"));
//! let fire = runtime.create_action(set, ActionCreateInfo::new("fire", ActionType::BooleanInput))?;
//!
//! let profile = runtime.string_to_path(InteractionProfile::IndexController.path());
//! let binding = runtime.string_to_path("/user/hand/left/input/trigger/value");
//! runtime.suggest_interaction_profile_bindings(profile, vec![SuggestedBinding { action: fire, binding }])?;
//!
//! let device = SimulatedDevice::new();
//! let session = runtime.create_session(device.clone())?;
//! runtime.attach_session_action_sets(session, &[set])?;
//!
//! device.connect(Side::Left, "knuckles");
//! device.update_hand(Side::Left, |hand| hand.trigger = 1.0);
//! runtime.sync_actions(session, &[ActiveActionSet::new(set)])?;
//!
//! let state = runtime.get_action_state_boolean(session, &ActionStateGetInfo::new(fire))?;
//! assert!(state.is_active && state.current_state && state.changed_since_last_sync);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod binding;
pub mod config;
pub mod device;
pub mod error;
pub mod path;
pub mod runtime;

pub use error::ActionError;
pub use runtime::{ActionRuntime, RuntimeEvent};
