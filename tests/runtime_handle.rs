use openactions::action::{ActionCreateInfo, ActionSetCreateInfo, ActionStateGetInfo, ActionType};
use openactions::binding::{InteractionProfile, SuggestedBinding};
use openactions::device::SimulatedDevice;
use openactions::path::Side;
use openactions::runtime::{ActiveActionSet, HandleError, RuntimeHandle};
use openactions::{ActionError, ActionRuntime, RuntimeEvent};

#[tokio::test]
async fn session_driven_through_worker() {
    let device = SimulatedDevice::new();
    let mut runtime = ActionRuntime::default();

    let set = runtime.create_action_set(ActionSetCreateInfo::new("gameplay"));
    let grab = runtime
        .create_action(set, ActionCreateInfo::new("grab", ActionType::FloatInput))
        .unwrap();
    let profile = runtime.string_to_path(InteractionProfile::SimpleController.path());
    let binding = runtime.string_to_path("/user/hand/left/input/select/click");
    runtime
        .suggest_interaction_profile_bindings(profile, vec![SuggestedBinding { action: grab, binding }])
        .unwrap();
    let session = runtime.create_session(device.clone()).unwrap();
    runtime.attach_session_action_sets(session, &[set]).unwrap();

    let handle = RuntimeHandle::spawn(runtime);
    let client = handle.client();

    device.connect(Side::Left, "Xbox Wireless Controller");
    device.update_hand(Side::Left, |hand| hand.trigger = 0.4);

    let state = client
        .call(move |runtime| {
            runtime.sync_actions(session, &[ActiveActionSet::new(set)])?;
            runtime.get_action_state_float(session, &ActionStateGetInfo::new(grab))
        })
        .await
        .unwrap()
        .unwrap();
    assert!(state.is_active);
    assert_eq!(state.current_state, 0.4);

    let event = client.call(|runtime| runtime.poll_event()).await.unwrap();
    assert_eq!(
        event,
        Some(RuntimeEvent::InteractionProfileChanged {
            session,
            side: Side::Left,
            profile
        })
    );

    let mut runtime = handle.shutdown().await.unwrap();
    runtime.destroy_session(session).unwrap();
}

#[tokio::test]
async fn errors_cross_the_worker_unchanged() {
    let mut runtime = ActionRuntime::default();
    let stale = runtime.create_session(SimulatedDevice::new()).unwrap();
    runtime.destroy_session(stale).unwrap();

    let handle = RuntimeHandle::spawn(runtime);
    let client = handle.client();

    let result = client
        .call(move |runtime| runtime.sync_actions(stale, &[]))
        .await
        .unwrap();
    assert!(matches!(result, Err(ActionError::InvalidHandle(_))));

    handle.shutdown().await.unwrap();
    assert!(matches!(
        client.call(|_| ()).await,
        Err(HandleError::WorkerStopped)
    ));
}
