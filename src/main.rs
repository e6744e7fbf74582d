//! Meteor Madness headless runner
//!
//! Drives one session at a fixed frame rate and streams snapshots as JSON
//! lines on stdout. Logs go to stderr (`RUST_LOG=info`).
//!
//! ```text
//! meteor-madness explore [diameter_m] [velocity_km_s] [angle_deg] [material] [location]
//! meteor-madness arcade
//! ```

use meteor_madness::consts::SIM_DT;
use meteor_madness::sim::{
    ArcadeInput, ArcadePhase, ArcadeState, ExplorerInput, ExplorerState, GameEvent,
    ImpactParameters, Location, Material,
};
use meteor_madness::{FixedStepDriver, Settings, Simulation, Snapshot};

fn main() {
    env_logger::init();
    log::info!("Meteor Madness (headless) starting...");

    let settings = Settings::load();
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("arcade") => run_arcade(&settings),
        Some("explore") | None => {
            let params = parse_params(args.get(1..).unwrap_or(&[]));
            run_explorer(&settings, params);
        }
        Some(other) => {
            log::error!("Unknown mode '{}' (expected 'explore' or 'arcade')", other);
            std::process::exit(2);
        }
    }
}

/// Positional impact parameters; anything missing or unparsable keeps its default
fn parse_params(args: &[String]) -> ImpactParameters {
    let defaults = ImpactParameters::default();
    let number = |i: usize, fallback: f64| {
        args.get(i)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(fallback)
    };

    ImpactParameters {
        diameter: number(0, defaults.diameter),
        velocity: number(1, defaults.velocity),
        angle: number(2, defaults.angle),
        material: args.get(3).map_or(defaults.material, |s| Material::parse(s)),
        location: args.get(4).map_or(defaults.location, |s| Location::parse(s)),
    }
    .clamped()
}

fn run_explorer(settings: &Settings, params: ImpactParameters) {
    log::info!(
        "Explorer: {:.0} m {} at {:.1} km/s, {:.0} deg, {}",
        params.diameter,
        params.material.as_str(),
        params.velocity,
        params.angle,
        params.location.as_str()
    );

    let mut state = ExplorerState::new(settings);
    let mut input = ExplorerInput {
        apply: Some(params),
        ..Default::default()
    };

    run(&mut state, &mut input, settings, Snapshot::explorer, |state, input| {
        if state.events.contains(&GameEvent::EngagementOver) {
            input.quit = true;
        }
    });

    if let Some(result) = &state.result {
        let (label, value) = result.headline();
        log::info!("Energy: {}", result.energy_label());
        log::info!("{}: {}", label, value);
        for risk in &result.risks {
            log::info!("Risk: {}", risk.description());
        }
    }
}

fn run_arcade(settings: &Settings) {
    let seed = settings.seed.unwrap_or_else(rand::random::<u64>);
    log::info!("Arcade: seed {}", seed);

    let mut state = ArcadeState::new(seed, settings);
    let mut input = ArcadeInput {
        start: true,
        idle_mode: true,
        ..Default::default()
    };

    run(&mut state, &mut input, settings, Snapshot::arcade, |state, input| {
        if state.phase == ArcadePhase::GameOver {
            input.quit = true;
        }
    });

    log::info!("Final score {} ({} meteors destroyed)", state.score, state.kills);
}

/// Frame loop shared by both modes
///
/// `after_frame` may set quit on the input; the next frame delivers it.
fn run<S, F, A>(
    state: &mut S,
    input: &mut S::Input,
    settings: &Settings,
    snapshot: F,
    mut after_frame: A,
) where
    S: Simulation,
    F: Fn(&S) -> Snapshot,
    A: FnMut(&S, &mut S::Input),
{
    let mut driver = FixedStepDriver::new();
    let mut ticks = 0u64;
    let every = settings.snapshot_every.max(1) as u64;
    let max_frames = (settings.max_session_secs / SIM_DT).ceil() as u64;

    for frame in 0..max_frames {
        if !state.is_running() {
            break;
        }
        ticks += u64::from(driver.update(state, input, SIM_DT));

        let snap = snapshot(&*state);
        for event in &snap.events {
            log::debug!("tick {}: {:?}", snap.tick, event);
        }
        if frame % every == 0 || !snap.events.is_empty() {
            match snap.to_json_line() {
                Ok(line) => println!("{}", line),
                Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
            }
        }

        after_frame(&*state, input);
    }

    log::info!("Session ended after {} ticks ({:.1}s)", ticks, ticks as f32 * SIM_DT);
}
