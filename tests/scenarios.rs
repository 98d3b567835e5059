use openactions::action::{
    ActionCreateInfo, ActionHandle, ActionSetCreateInfo, ActionSetHandle, ActionStateGetInfo,
    ActionType,
};
use openactions::binding::{InteractionProfile, SuggestedBinding};
use openactions::device::{Buttons, SimulatedDevice};
use openactions::path::{Path, Side};
use openactions::runtime::{
    ActiveActionSet, HapticActionInfo, HapticFeedback, HapticVibration, SessionHandle,
};
use openactions::{ActionError, ActionRuntime};
use proptest::prelude::*;

struct World {
    runtime: ActionRuntime,
    device: SimulatedDevice,
    session: SessionHandle,
}

impl World {
    fn new() -> Self {
        let mut runtime = ActionRuntime::default();
        let device = SimulatedDevice::new();
        let session = runtime.create_session(device.clone()).unwrap();
        Self {
            runtime,
            device,
            session,
        }
    }

    fn action(&mut self, set: ActionSetHandle, name: &str, action_type: ActionType) -> ActionHandle {
        self.runtime
            .create_action(set, ActionCreateInfo::new(name, action_type))
            .unwrap()
    }

    fn suggest(&mut self, profile: InteractionProfile, bindings: &[(ActionHandle, &str)]) {
        let profile = self.runtime.string_to_path(profile.path());
        let bindings = bindings
            .iter()
            .map(|(action, path)| SuggestedBinding {
                action: *action,
                binding: self.runtime.string_to_path(path),
            })
            .collect();
        self.runtime
            .suggest_interaction_profile_bindings(profile, bindings)
            .unwrap();
    }

    fn sync(&mut self, sets: &[ActionSetHandle]) {
        let active: Vec<_> = sets.iter().copied().map(ActiveActionSet::new).collect();
        self.runtime.sync_actions(self.session, &active).unwrap();
    }
}

#[test]
fn knuckles_trigger_reads_as_pressed() {
    let mut world = World::new();
    let set = world
        .runtime
        .create_action_set(ActionSetCreateInfo::new("gameplay"));
    let fire = world.action(set, "fire", ActionType::BooleanInput);
    world.suggest(
        InteractionProfile::IndexController,
        &[(fire, "/user/hand/left/input/trigger/value")],
    );
    world
        .runtime
        .attach_session_action_sets(world.session, &[set])
        .unwrap();

    world.device.connect(Side::Left, "knuckles");
    world.device.update_hand(Side::Left, |hand| hand.trigger = 1.0);
    world.sync(&[set]);

    let state = world
        .runtime
        .get_action_state_boolean(world.session, &ActionStateGetInfo::new(fire))
        .unwrap();
    assert!(state.is_active);
    assert!(state.current_state);
    assert!(state.changed_since_last_sync);
}

#[test]
fn unlisted_set_keeps_its_values() {
    let mut world = World::new();
    let menu = world.runtime.create_action_set(ActionSetCreateInfo::new("menu"));
    let gameplay = world
        .runtime
        .create_action_set(ActionSetCreateInfo::new("gameplay"));
    let grab = world.action(gameplay, "grab", ActionType::FloatInput);
    world.suggest(
        InteractionProfile::IndexController,
        &[(grab, "/user/hand/right/input/squeeze/value")],
    );
    world
        .runtime
        .attach_session_action_sets(world.session, &[menu, gameplay])
        .unwrap();
    world.device.connect(Side::Right, "knuckles");

    world.device.update_hand(Side::Right, |hand| hand.grip = 0.25);
    world.sync(&[gameplay]);
    let info = ActionStateGetInfo::new(grab);
    let before = world
        .runtime
        .get_action_state_float(world.session, &info)
        .unwrap();
    assert_eq!(before.current_state, 0.25);

    world.device.update_hand(Side::Right, |hand| hand.grip = 0.75);
    world.sync(&[menu]);
    let after = world
        .runtime
        .get_action_state_float(world.session, &info)
        .unwrap();
    assert!(after.is_active);
    assert_eq!(after.current_state, 0.25);
    assert!(!after.changed_since_last_sync);
    // The snapshot itself was still refreshed
    assert_eq!(world.device.fetch_count(), 2);
}

#[test]
fn controller_swap_drops_bindings_missing_from_new_profile() {
    let mut world = World::new();
    let set = world
        .runtime
        .create_action_set(ActionSetCreateInfo::new("gameplay"));
    let jump = world.action(set, "jump", ActionType::BooleanInput);
    let fire = world.action(set, "fire", ActionType::BooleanInput);
    world.suggest(
        InteractionProfile::IndexController,
        &[
            (jump, "/user/hand/right/input/a/click"),
            (fire, "/user/hand/right/input/trigger/click"),
        ],
    );
    world.suggest(
        InteractionProfile::ViveController,
        &[(fire, "/user/hand/right/input/trigger/click")],
    );
    world
        .runtime
        .attach_session_action_sets(world.session, &[set])
        .unwrap();

    world.device.connect(Side::Right, "knuckles");
    world.sync(&[set]);
    let jump_state = world.runtime.action(jump).unwrap();
    assert_eq!(jump_state.bound_path(Side::Right), "/user/hand/right/input/a/click");

    world.device.connect(Side::Right, "vive_controller");
    world.sync(&[set]);
    assert_eq!(world.runtime.action(jump).unwrap().bound_path(Side::Right), "");
    assert_eq!(
        world.runtime.action(fire).unwrap().bound_path(Side::Right),
        "/user/hand/right/input/trigger/click"
    );

    world.device.update_hand(Side::Right, |hand| hand.buttons.insert(Buttons::A));
    world.sync(&[set]);
    let state = world
        .runtime
        .get_action_state_boolean(world.session, &ActionStateGetInfo::new(jump))
        .unwrap();
    assert!(!state.is_active);
    assert!(!state.current_state);

    let vive = world
        .runtime
        .string_to_path(InteractionProfile::ViveController.path());
    let right = world.runtime.string_to_path("/user/hand/right");
    assert_eq!(
        world
            .runtime
            .get_current_interaction_profile(world.session, right)
            .unwrap(),
        vive
    );
}

#[test]
fn attachment_happens_once() {
    let mut world = World::new();
    let first = world.runtime.create_action_set(ActionSetCreateInfo::new("a"));
    let second = world.runtime.create_action_set(ActionSetCreateInfo::new("b"));
    world
        .runtime
        .attach_session_action_sets(world.session, &[first])
        .unwrap();

    assert!(matches!(
        world
            .runtime
            .attach_session_action_sets(world.session, &[second]),
        Err(ActionError::AlreadyAttached)
    ));
    for profile in InteractionProfile::ALL {
        let path = world.runtime.string_to_path(profile.path());
        assert!(matches!(
            world
                .runtime
                .suggest_interaction_profile_bindings(path, Vec::new()),
            Err(ActionError::AlreadyAttached)
        ));
    }
}

#[test]
fn path_to_string_reports_size_before_writing() {
    let mut runtime = ActionRuntime::default();
    let path = runtime.string_to_path("/user/hand/left");

    let required = runtime.path_to_string(path, &mut []).unwrap();
    assert_eq!(required, "/user/hand/left".len() + 1);

    let mut short = [0xffu8; 4];
    assert!(matches!(
        runtime.path_to_string(path, &mut short),
        Err(ActionError::SizeInsufficient { required: 16, capacity: 4 })
    ));
    assert_eq!(short, [0xff; 4]);

    let mut buffer = vec![0u8; required];
    runtime.path_to_string(path, &mut buffer).unwrap();
    assert_eq!(&buffer[..required - 1], b"/user/hand/left");
    assert_eq!(buffer[required - 1], 0);

    assert!(matches!(
        runtime.path_to_string(Path::from_raw(77), &mut []),
        Err(ActionError::PathInvalid(77))
    ));
    assert_eq!(runtime.path_to_string(Path::NULL, &mut []).unwrap(), 1);
}

#[test]
fn zero_amplitude_never_reaches_device() {
    let mut world = World::new();
    let set = world.runtime.create_action_set(ActionSetCreateInfo::new("fx"));
    let rumble = world.action(set, "rumble", ActionType::VibrationOutput);
    world.suggest(
        InteractionProfile::IndexController,
        &[(rumble, "/user/hand/left/output/haptic")],
    );
    world
        .runtime
        .attach_session_action_sets(world.session, &[set])
        .unwrap();
    world.device.connect(Side::Left, "knuckles");
    world.sync(&[set]);

    world
        .runtime
        .apply_haptic_feedback(
            world.session,
            &HapticActionInfo::new(rumble),
            &[HapticFeedback::Vibration(HapticVibration {
                duration: 1_000_000,
                frequency: 160.0,
                amplitude: 0.0,
            })],
        )
        .unwrap();
    assert!(world.device.pulses().is_empty());
}

#[test]
fn destroyed_action_is_skipped_on_rebind() {
    let mut world = World::new();
    let set = world.runtime.create_action_set(ActionSetCreateInfo::new("gameplay"));
    let gone = world.action(set, "gone", ActionType::BooleanInput);
    let kept = world.action(set, "kept", ActionType::BooleanInput);
    world.suggest(
        InteractionProfile::IndexController,
        &[
            (gone, "/user/hand/left/input/a/click"),
            (kept, "/user/hand/left/input/b/click"),
        ],
    );
    world.runtime.destroy_action(gone).unwrap();
    world
        .runtime
        .attach_session_action_sets(world.session, &[set])
        .unwrap();

    world.device.connect(Side::Left, "knuckles");
    world.sync(&[set]);

    assert_eq!(
        world.runtime.action(kept).unwrap().bound_path(Side::Left),
        "/user/hand/left/input/b/click"
    );
    assert!(matches!(
        world
            .runtime
            .get_action_state_boolean(world.session, &ActionStateGetInfo::new(gone)),
        Err(ActionError::InvalidHandle(_))
    ));
}

#[test]
fn actions_of_destroyed_attached_set_stay_queryable() {
    let mut world = World::new();
    let set = world.runtime.create_action_set(ActionSetCreateInfo::new("gameplay"));
    let grab = world.action(set, "grab", ActionType::FloatInput);
    world.suggest(
        InteractionProfile::IndexController,
        &[(grab, "/user/hand/left/input/squeeze/value")],
    );
    world
        .runtime
        .attach_session_action_sets(world.session, &[set])
        .unwrap();
    world.device.connect(Side::Left, "knuckles");
    world.device.update_hand(Side::Left, |hand| hand.grip = 0.5);

    world.runtime.destroy_action_set(set).unwrap();
    world.sync(&[set]);

    let state = world
        .runtime
        .get_action_state_float(world.session, &ActionStateGetInfo::new(grab))
        .unwrap();
    assert!(state.is_active);
    assert_eq!(state.current_state, 0.5);
}

proptest! {
    #[test]
    fn change_flag_follows_button_toggles(presses in proptest::collection::vec(any::<bool>(), 1..24)) {
        let mut world = World::new();
        let set = world.runtime.create_action_set(ActionSetCreateInfo::new("gameplay"));
        let jump = world.action(set, "jump", ActionType::BooleanInput);
        world.suggest(
            InteractionProfile::IndexController,
            &[(jump, "/user/hand/left/input/a/click")],
        );
        world.runtime.attach_session_action_sets(world.session, &[set]).unwrap();
        world.device.connect(Side::Left, "knuckles");

        let info = ActionStateGetInfo::new(jump);
        let mut previous = false;
        for pressed in presses {
            world.device.update_hand(Side::Left, |hand| hand.buttons.set(Buttons::A, pressed));
            world.device.advance(0.01);
            world.sync(&[set]);

            let state = world.runtime.get_action_state_boolean(world.session, &info).unwrap();
            prop_assert_eq!(state.current_state, pressed);
            prop_assert_eq!(state.changed_since_last_sync, pressed != previous);

            let repeat = world.runtime.get_action_state_boolean(world.session, &info).unwrap();
            prop_assert!(!repeat.changed_since_last_sync);
            previous = pressed;
        }
    }
}
