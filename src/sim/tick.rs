//! Fixed timestep simulation tick
//!
//! Advances a session by one step. Motion is scaled by `dt / SIM_DT` ticks;
//! explosion and spawn timing use accumulated seconds.

use glam::Vec2;
use rand::Rng;

use super::impact::ImpactParameters;
use super::state::{
    ArcadePhase, ArcadeState, Engagement, EngagementPhase, ExplorerState, GameEvent,
};
use crate::consts::*;
use crate::planet_center;

/// Input commands for one explorer tick
#[derive(Debug, Clone, Default)]
pub struct ExplorerInput {
    /// Apply button pressed with these (pre-clamped) parameters
    pub apply: Option<ImpactParameters>,
    /// Quit button / window close
    pub quit: bool,
}

/// Input commands for one arcade tick
#[derive(Debug, Clone, Default)]
pub struct ArcadeInput {
    /// Play button on the start screen
    pub start: bool,
    /// Left clicks in play field coordinates, in order
    pub clicks: Vec<Vec2>,
    /// Retry button on the game over screen
    pub restart: bool,
    /// Quit button / window close
    pub quit: bool,
    /// Idle/demo mode - autopilot clicks meteors
    pub idle_mode: bool,
}

/// Advance the explorer by one fixed timestep
pub fn tick_explorer(state: &mut ExplorerState, input: &ExplorerInput, dt: f32) {
    state.events.clear();

    if input.quit {
        state.running = false;
        log::info!("Explorer quit after {} ticks", state.time_ticks);
        return;
    }
    if !state.running {
        return;
    }

    state.time_ticks += 1;
    state.clock += dt;
    let dt_ticks = dt / SIM_DT;
    state.turn_body(dt_ticks);

    if let Some(params) = input.apply {
        match state.apply(params) {
            Ok(()) => log::info!(
                "Launch: d={:.0}m v={:.1}km/s angle={:.0}° {} over {}",
                params.diameter,
                params.velocity,
                params.angle,
                params.material.as_str(),
                params.location.as_str()
            ),
            Err(e) => log::debug!("Apply ignored: {}", e),
        }
    }

    let before = state.phase();
    let engagement = std::mem::replace(&mut state.engagement, Engagement::Idle);
    state.engagement = engagement.advance(state.clock, dt_ticks, state.explosion_duration());
    let after = state.phase();

    match (before, after) {
        (EngagementPhase::InFlight, EngagementPhase::Impacted) => {
            if let Some(explosion) = state.engagement.explosion() {
                let pos = explosion.origin;
                state.events.push(GameEvent::Impact { pos });
                log::info!("Impact at ({:.0}, {:.0}) on tick {}", pos.x, pos.y, state.time_ticks);
            }
        }
        (EngagementPhase::Impacted, EngagementPhase::Idle) => {
            state.events.push(GameEvent::EngagementOver);
            log::debug!("Explosion finished, explorer idle");
        }
        _ => {}
    }
}

/// Advance the arcade game by one fixed timestep
pub fn tick_arcade<R: Rng>(state: &mut ArcadeState<R>, input: &ArcadeInput, dt: f32) {
    state.events.clear();

    if input.quit {
        state.running = false;
        log::info!("Arcade quit with score {}", state.score);
        return;
    }
    if !state.running {
        return;
    }

    match state.phase {
        ArcadePhase::Ready if input.start => state.begin(),
        ArcadePhase::GameOver if input.restart => state.begin(),
        ArcadePhase::Playing => {}
        // Start and game over screens don't tick
        _ => return,
    }

    state.time_ticks += 1;
    state.elapsed += dt;
    let dt_ticks = dt / SIM_DT;
    state.turn_body(dt_ticks);

    // Spawns due this tick
    for _ in 0..state.spawn_timer.poll(state.elapsed) {
        state.spawn_meteor();
    }

    // Clicks, then the autopilot's click if enabled
    for &click in &input.clicks {
        state.click(click);
    }
    if input.idle_mode {
        autopilot(state);
    }

    // Move meteors; any contact with the planet ends the game
    let center = planet_center();
    let mut landed = None;
    for meteor in &mut state.meteors {
        if meteor.projectile.touches(center, PLANET_RADIUS) {
            landed = Some(meteor.id);
            break;
        }
        meteor.projectile.advance(dt_ticks);
    }

    if let Some(id) = landed {
        state.phase = ArcadePhase::GameOver;
        state.events.push(GameEvent::PlanetHit { id });
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!(
            "Game over: meteor {} hit the planet after {:.1}s, score {}",
            id,
            state.elapsed,
            state.score
        );
        return;
    }

    let now = state.elapsed;
    state.explosions.retain(|e| !e.is_finished(now));
}

/// Click the meteor nearest the planet, at most once per cooldown
fn autopilot<R: Rng>(state: &mut ArcadeState<R>) {
    if state.autopilot_cooldown > 0 {
        state.autopilot_cooldown -= 1;
        return;
    }
    // Aim slightly off-center so clicks look less robotic
    let target = state.most_dangerous().map(|m| (m.projectile.pos, m.projectile.radius));
    if let Some((pos, radius)) = target {
        let jitter = Vec2::new(
            state.rng_mut().random_range(-0.5..0.5),
            state.rng_mut().random_range(-0.5..0.5),
        ) * radius;
        state.click(pos + jitter);
        state.autopilot_cooldown = state.autopilot_delay;
    }
}
