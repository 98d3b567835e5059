use color_eyre::{eyre::eyre, Result};
use openactions::action::{
    ActionCreateInfo, ActionHandle, ActionSetCreateInfo, ActionSetHandle, ActionStateBoolean,
    ActionStateFloat, ActionStateGetInfo, ActionStateVector2f, ActionType,
};
use openactions::binding::{InteractionProfile, SuggestedBinding};
use openactions::config::{Backend, RuntimeConfig};
use openactions::device::{DeviceLayer, SimulatedDevice};
use openactions::path::Side;
use openactions::runtime::{
    ActiveActionSet, HapticActionInfo, HapticFeedback, HapticVibration, RuntimeHandle,
    SessionHandle,
};
use openactions::{ActionError, ActionRuntime, RuntimeEvent};
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = RuntimeConfig::default_path();
    let config = RuntimeConfig::load_or_default(&config_path).await?;
    setup(&config)?;
    info!("Using config {}", config_path.display());

    let mut runtime = ActionRuntime::new(config.input);
    let actions = declare_actions(&mut runtime)?;

    let (device, driver) = open_device(&config)?;
    let session = runtime.create_session(device)?;
    runtime.attach_session_action_sets(session, &[actions.set])?;

    let handle = RuntimeHandle::spawn(runtime);
    let client = handle.client();

    let mut interval =
        tokio::time::interval(Duration::from_millis(config.device.poll_interval_ms.max(1)));
    let mut frame: u64 = 0;

    loop {
        if config.demo.frames > 0 && frame >= config.demo.frames {
            info!("Demo finished after {} frames", frame);
            break;
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
            _ = interval.tick() => {}
        }

        if let Some(driver) = &driver {
            drive_simulation(driver, frame, config.device.poll_interval_ms);
        }

        let report = client
            .call(move |runtime| run_frame(runtime, session, &actions))
            .await??;
        log_frame(frame, &report);
        frame += 1;
    }

    let mut runtime = handle.shutdown().await?;
    runtime.destroy_session(session)?;
    Ok(())
}

fn setup(config: &RuntimeConfig) -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &config.logging.level)
    }
    setup_logging_env(config);
    Ok(())
}

fn setup_logging_env(config: &RuntimeConfig) {
    FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_target(false)
        .with_thread_ids(config.logging.thread_ids)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

#[derive(Debug, Clone, Copy)]
struct DemoActions {
    set: ActionSetHandle,
    fire: ActionHandle,
    grab: ActionHandle,
    movement: ActionHandle,
    rumble: ActionHandle,
}

/// Declares the demo actions and suggests bindings for the simple and Index profiles
fn declare_actions(runtime: &mut ActionRuntime) -> Result<DemoActions, ActionError> {
    let set = runtime.create_action_set(ActionSetCreateInfo::new("gameplay"));
    let fire = runtime.create_action(set, ActionCreateInfo::new("fire", ActionType::BooleanInput))?;
    let grab = runtime.create_action(set, ActionCreateInfo::new("grab", ActionType::FloatInput))?;
    let movement = runtime.create_action(
        set,
        ActionCreateInfo::new("move", ActionType::Vector2fInput),
    )?;
    let rumble = runtime.create_action(
        set,
        ActionCreateInfo::new("rumble", ActionType::VibrationOutput),
    )?;

    let mut suggest = |profile: InteractionProfile, bindings: &[(ActionHandle, &str)]| {
        let profile = runtime.string_to_path(profile.path());
        let bindings = bindings
            .iter()
            .map(|(action, path)| SuggestedBinding {
                action: *action,
                binding: runtime.string_to_path(path),
            })
            .collect();
        runtime.suggest_interaction_profile_bindings(profile, bindings)
    };

    suggest(
        InteractionProfile::IndexController,
        &[
            (fire, "/user/hand/right/input/trigger/click"),
            (grab, "/user/hand/left/input/squeeze/value"),
            (movement, "/user/hand/left/input/thumbstick"),
            (rumble, "/user/hand/right/output/haptic"),
        ],
    )?;
    suggest(
        InteractionProfile::SimpleController,
        &[
            (fire, "/user/hand/right/input/select/click"),
            (grab, "/user/hand/left/input/select/click"),
            (rumble, "/user/hand/right/output/haptic"),
        ],
    )?;

    Ok(DemoActions {
        set,
        fire,
        grab,
        movement,
        rumble,
    })
}

fn open_device(config: &RuntimeConfig) -> Result<(Box<dyn DeviceLayer>, Option<SimulatedDevice>)> {
    match config.device.backend {
        Backend::Simulated => {
            let device = SimulatedDevice::new();
            Ok((Box::new(device.clone()), Some(device)))
        }
        #[cfg(feature = "gamepad")]
        Backend::Gamepad => {
            let device =
                openactions::device::gamepad::GamepadDevice::create(config.device.joystick_deadzone)
                    .map_err(|e| eyre!("Failed to open gamepad: {}", e))?;
            Ok((Box::new(device), None))
        }
        #[cfg(not(feature = "gamepad"))]
        Backend::Gamepad => Err(eyre!(
            "Gamepad backend requested but built without the `gamepad` feature"
        )),
    }
}

/// Scripted input: Index controllers, a trigger sweep and a controller swap halfway through
fn drive_simulation(driver: &SimulatedDevice, frame: u64, poll_interval_ms: u64) {
    driver.set_time(frame as f64 * poll_interval_ms as f64 / 1000.0);

    match frame {
        0 => {
            driver.connect(Side::Left, "knuckles");
            driver.connect(Side::Right, "knuckles");
        }
        300 => {
            info!("Swapping right controller");
            driver.connect(Side::Right, "vive_controller");
        }
        _ => {}
    }

    let phase = frame as f32 * 0.05;
    driver.update_hand(Side::Right, |hand| hand.trigger = (phase.sin() + 1.0) / 2.0);
    driver.update_hand(Side::Left, |hand| {
        hand.grip = (phase.cos() + 1.0) / 2.0;
        hand.joystick = glam::Vec2::new(phase.cos(), phase.sin()) * 0.8;
    });
}

#[derive(Debug)]
struct FrameReport {
    fire: ActionStateBoolean,
    grab: ActionStateFloat,
    movement: ActionStateVector2f,
    events: Vec<RuntimeEvent>,
}

fn run_frame(
    runtime: &mut ActionRuntime,
    session: SessionHandle,
    actions: &DemoActions,
) -> Result<FrameReport, ActionError> {
    runtime.sync_actions(session, &[ActiveActionSet::new(actions.set)])?;

    let fire = runtime.get_action_state_boolean(session, &ActionStateGetInfo::new(actions.fire))?;
    let grab = runtime.get_action_state_float(session, &ActionStateGetInfo::new(actions.grab))?;
    let movement =
        runtime.get_action_state_vector2f(session, &ActionStateGetInfo::new(actions.movement))?;

    if fire.current_state && fire.changed_since_last_sync {
        runtime.apply_haptic_feedback(
            session,
            &HapticActionInfo::new(actions.rumble),
            &[HapticFeedback::Vibration(HapticVibration {
                duration: 20_000_000,
                frequency: 0.0,
                amplitude: 0.8,
            })],
        )?;
    }

    let events = std::iter::from_fn(|| runtime.poll_event()).collect();
    Ok(FrameReport {
        fire,
        grab,
        movement,
        events,
    })
}

fn log_frame(frame: u64, report: &FrameReport) {
    for event in &report.events {
        match event {
            RuntimeEvent::InteractionProfileChanged { side, profile, .. } => {
                if profile.is_null() {
                    warn!("Frame {}: {} hand has no usable bindings", frame, side);
                } else {
                    info!("Frame {}: {} hand profile changed to {}", frame, side, profile);
                }
            }
        }
    }

    if report.fire.changed_since_last_sync {
        info!(
            "Frame {}: fire {}",
            frame,
            if report.fire.current_state { "pressed" } else { "released" }
        );
    }
    debug!(
        "Frame {}: grab {:.2} (active {}), move ({:.2}, {:.2}) (active {})",
        frame,
        report.grab.current_state,
        report.grab.is_active,
        report.movement.current_state.x,
        report.movement.current_state.y,
        report.movement.is_active
    );
}
