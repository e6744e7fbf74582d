//! Session state and core simulation types
//!
//! Each mode owns exactly one state value. The renderer reads it (through a
//! snapshot); only the tick functions and input handlers write it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::explosion::ExplosionEffect;
use super::impact::{ImpactParameters, ImpactResult};
use super::projectile::{Projectile, explorer_target, visual_speed};
use super::spawner::{SpawnPlan, SpawnTimer, Tier};
use crate::consts::*;
use crate::error::LaunchError;
use crate::settings::Settings;
use crate::{earth_center, explorer_launch_point, planet_center, wrap_degrees};

/// Explorer engagement phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementPhase {
    /// No projectile, no effect
    Idle,
    /// Asteroid advancing toward the strike point
    InFlight,
    /// Explosion flash playing
    Impacted,
}

/// One launch-to-resolution cycle.
///
/// Carrying the projectile and the explosion inside their phases keeps at
/// most one of them alive at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Engagement {
    Idle,
    InFlight {
        projectile: Projectile,
        target: Vec2,
        /// Mt, sizes the flash on arrival
        effective_energy: f64,
    },
    Impacted {
        explosion: ExplosionEffect,
    },
}

impl Engagement {
    pub fn phase(&self) -> EngagementPhase {
        match self {
            Engagement::Idle => EngagementPhase::Idle,
            Engagement::InFlight { .. } => EngagementPhase::InFlight,
            Engagement::Impacted { .. } => EngagementPhase::Impacted,
        }
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        match self {
            Engagement::InFlight { projectile, .. } => Some(projectile),
            _ => None,
        }
    }

    pub fn explosion(&self) -> Option<&ExplosionEffect> {
        match self {
            Engagement::Impacted { explosion } => Some(explosion),
            _ => None,
        }
    }

    /// Start an engagement from `layout.launch_point` toward the strike point
    /// for `params`. Only valid from `Idle`.
    pub fn launch(
        &self,
        params: &ImpactParameters,
        result: &ImpactResult,
        layout: &ExplorerLayout,
    ) -> Result<Engagement, LaunchError> {
        if !matches!(self, Engagement::Idle) {
            return Err(LaunchError::Busy(self.phase()));
        }

        let target = explorer_target(
            layout.body_center,
            layout.launch_point,
            params.angle,
            layout.body_radius,
            layout.projectile_radius,
        );
        let projectile = Projectile::aimed(
            layout.launch_point,
            target,
            visual_speed(params.velocity),
            layout.projectile_radius,
        )
        .ok_or(LaunchError::DegenerateTrajectory)?;

        Ok(Engagement::InFlight {
            projectile,
            target,
            effective_energy: result.effective_energy,
        })
    }

    /// Next engagement after one tick at session time `now`
    pub fn advance(self, now: f32, dt_ticks: f32, explosion_duration: f32) -> Engagement {
        match self {
            Engagement::Idle => Engagement::Idle,
            Engagement::InFlight {
                mut projectile,
                target,
                effective_energy,
            } => {
                if projectile.has_arrived(target, dt_ticks) {
                    Engagement::Impacted {
                        explosion: ExplosionEffect::impact(
                            target,
                            now,
                            effective_energy,
                            explosion_duration,
                        ),
                    }
                } else {
                    projectile.advance(dt_ticks);
                    Engagement::InFlight {
                        projectile,
                        target,
                        effective_energy,
                    }
                }
            }
            Engagement::Impacted { explosion } => {
                if explosion.is_finished(now) {
                    Engagement::Idle
                } else {
                    Engagement::Impacted { explosion }
                }
            }
        }
    }
}

/// Explorer scene geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorerLayout {
    pub launch_point: Vec2,
    pub body_center: Vec2,
    pub body_radius: f32,
    pub projectile_radius: f32,
}

impl Default for ExplorerLayout {
    fn default() -> Self {
        Self {
            launch_point: explorer_launch_point(),
            body_center: earth_center(),
            body_radius: EARTH_SIZE / 2.0,
            projectile_radius: ASTEROID_BASE_SIZE / 2.0,
        }
    }
}

/// Something that happened during a tick (for logging, sound, HUD pops)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched { target: Vec2 },
    Impact { pos: Vec2 },
    EngagementOver,
    MeteorSpawned { id: u32, tier: Tier },
    MeteorDamaged { id: u32, hp: u8 },
    MeteorDestroyed { id: u32, pos: Vec2 },
    PlanetHit { id: u32 },
    GameOver { score: u64 },
}

/// Explorer mode state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerState {
    pub engagement: Engagement,
    pub layout: ExplorerLayout,
    /// Parameters of the last accepted Apply
    pub params: Option<ImpactParameters>,
    /// Results of the last accepted Apply
    pub result: Option<ImpactResult>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Session time in seconds
    pub clock: f32,
    /// Target body rotation in degrees
    pub body_rotation: f32,
    pub running: bool,
    /// Events from the latest tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    explosion_duration: f32,
    rotation_per_tick: f32,
}

impl ExplorerState {
    pub fn new(settings: &Settings) -> Self {
        Self::with_layout(settings, ExplorerLayout::default())
    }

    pub fn with_layout(settings: &Settings, layout: ExplorerLayout) -> Self {
        Self {
            engagement: Engagement::Idle,
            layout,
            params: None,
            result: None,
            time_ticks: 0,
            clock: 0.0,
            body_rotation: 0.0,
            running: true,
            events: Vec::new(),
            explosion_duration: settings.explosion_duration,
            rotation_per_tick: settings.body_rotation_per_tick(),
        }
    }

    #[inline]
    pub fn phase(&self) -> EngagementPhase {
        self.engagement.phase()
    }

    /// Asteroid sprite spin (twice the body rotation)
    #[inline]
    pub fn projectile_rotation(&self) -> f32 {
        wrap_degrees(self.body_rotation * 2.0)
    }

    /// Handle an Apply: compute results and launch.
    ///
    /// Ignored unless idle. A degenerate trajectory keeps the new results but
    /// leaves the engagement idle. Callers outside the crate go through
    /// `ExplorerInput::apply` so the `Launched` event survives to the snapshot.
    pub(crate) fn apply(&mut self, params: ImpactParameters) -> Result<(), LaunchError> {
        if self.phase() != EngagementPhase::Idle {
            return Err(LaunchError::Busy(self.phase()));
        }

        let result = ImpactResult::compute(&params);
        let launched = self.engagement.launch(&params, &result, &self.layout);
        self.params = Some(params);
        self.result = Some(result);

        self.engagement = launched?;
        if let Engagement::InFlight { target, .. } = self.engagement {
            self.events.push(GameEvent::Launched { target });
        }
        Ok(())
    }

    pub(crate) fn turn_body(&mut self, dt_ticks: f32) {
        self.body_rotation = wrap_degrees(self.body_rotation + self.rotation_per_tick * dt_ticks);
    }

    pub(crate) fn explosion_duration(&self) -> f32 {
        self.explosion_duration
    }
}

/// Arcade session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcadePhase {
    /// Start screen, waiting for Play
    Ready,
    Playing,
    /// A meteor reached the planet
    GameOver,
}

/// A falling meteor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub id: u32,
    pub tier: Tier,
    pub hp: u8,
    pub projectile: Projectile,
}

impl Meteor {
    /// Take one click; true when that destroys it
    pub fn hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hp == 0
    }
}

/// Result of a click in the play field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    Miss,
    Damaged { id: u32, hp: u8 },
    Destroyed { id: u32 },
}

/// Arcade mode state, generic over its random source
#[derive(Debug, Clone)]
pub struct ArcadeState<R = Pcg32> {
    pub phase: ArcadePhase,
    /// Active meteors, oldest first
    pub meteors: Vec<Meteor>,
    pub explosions: Vec<ExplosionEffect>,
    pub score: u64,
    pub kills: u32,
    /// Simulation tick counter (never reset)
    pub time_ticks: u64,
    /// Seconds since the current game started
    pub elapsed: f32,
    pub body_rotation: f32,
    pub spawn_timer: SpawnTimer,
    pub running: bool,
    /// Events from the latest tick
    pub events: Vec<GameEvent>,
    pub(crate) autopilot_cooldown: u32,
    pub(crate) autopilot_delay: u32,
    rotation_per_tick: f32,
    next_id: u32,
    rng: R,
}

impl ArcadeState<Pcg32> {
    /// Seeded session
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed), settings)
    }
}

impl<R: Rng> ArcadeState<R> {
    /// Session drawing spawns from `rng`
    pub fn with_rng(rng: R, settings: &Settings) -> Self {
        Self {
            phase: ArcadePhase::Ready,
            meteors: Vec::new(),
            explosions: Vec::new(),
            score: 0,
            kills: 0,
            time_ticks: 0,
            elapsed: 0.0,
            body_rotation: 0.0,
            spawn_timer: SpawnTimer::new(settings.spawn_interval, 0.0),
            running: true,
            events: Vec::new(),
            autopilot_cooldown: 0,
            autopilot_delay: settings.autopilot_cooldown_ticks,
            rotation_per_tick: settings.body_rotation_per_tick(),
            next_id: 1,
            rng,
        }
    }

    /// Start (or restart) a game from a clean field
    pub fn begin(&mut self) {
        self.meteors.clear();
        self.explosions.clear();
        self.score = 0;
        self.kills = 0;
        self.elapsed = 0.0;
        self.spawn_timer = SpawnTimer::new(self.spawn_timer.interval, 0.0);
        self.autopilot_cooldown = 0;
        self.phase = ArcadePhase::Playing;
        log::info!("Arcade game started");
    }

    /// Allocate a new meteor ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Roll and add one meteor at the current session time
    pub fn spawn_meteor(&mut self) -> Option<u32> {
        let plan = SpawnPlan::roll(&mut self.rng, self.elapsed);
        self.insert_meteor(plan)
    }

    /// Add a meteor from an explicit plan
    pub fn insert_meteor(&mut self, plan: SpawnPlan) -> Option<u32> {
        let Some(projectile) = plan.projectile() else {
            log::warn!("Skipping meteor spawned on the planet center at {:?}", plan.pos);
            return None;
        };
        let id = self.next_entity_id();
        self.meteors.push(Meteor {
            id,
            tier: plan.tier,
            hp: plan.tier.hit_points(),
            projectile,
        });
        self.events.push(GameEvent::MeteorSpawned { id, tier: plan.tier });
        log::debug!(
            "Meteor {} spawned: {:?} at x={} speed={:.2}",
            id,
            plan.tier,
            plan.pos.x,
            plan.speed
        );
        Some(id)
    }

    /// Apply a click to the oldest meteor under `point`
    pub fn click(&mut self, point: Vec2) -> ClickOutcome {
        let Some(index) = self
            .meteors
            .iter()
            .position(|m| m.projectile.contains(point))
        else {
            return ClickOutcome::Miss;
        };

        let meteor = &mut self.meteors[index];
        if !meteor.hit() {
            let (id, hp) = (meteor.id, meteor.hp);
            self.events.push(GameEvent::MeteorDamaged { id, hp });
            return ClickOutcome::Damaged { id, hp };
        }

        let meteor = self.meteors.remove(index);
        let pos = meteor.projectile.pos;
        self.score += METEOR_SCORE;
        self.kills += 1;
        self.explosions.push(ExplosionEffect::burst(pos, self.elapsed));
        self.events.push(GameEvent::MeteorDestroyed { id: meteor.id, pos });
        ClickOutcome::Destroyed { id: meteor.id }
    }

    /// Meteor closest to hitting the planet
    pub fn most_dangerous(&self) -> Option<&Meteor> {
        let center = planet_center();
        self.meteors.iter().min_by(|a, b| {
            let da = a.projectile.pos.distance(center) - a.projectile.radius;
            let db = b.projectile.pos.distance(center) - b.projectile.radius;
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    pub(crate) fn turn_body(&mut self, dt_ticks: f32) {
        self.body_rotation = wrap_degrees(self.body_rotation + self.rotation_per_tick * dt_ticks);
    }

    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::impact::Material;

    #[test]
    fn test_engagement_launch_only_from_idle() {
        let params = ImpactParameters::default();
        let result = ImpactResult::compute(&params);
        let layout = ExplorerLayout::default();

        let flying = Engagement::Idle.launch(&params, &result, &layout).unwrap();
        assert_eq!(flying.phase(), EngagementPhase::InFlight);
        assert_eq!(
            flying.launch(&params, &result, &layout),
            Err(LaunchError::Busy(EngagementPhase::InFlight))
        );
    }

    #[test]
    fn test_engagement_degenerate_launch() {
        let params = ImpactParameters {
            angle: 90.0,
            ..Default::default()
        };
        let result = ImpactResult::compute(&params);
        // Launch from the body center: at 90° the strike point is the center
        let layout = ExplorerLayout {
            launch_point: earth_center(),
            ..Default::default()
        };
        assert_eq!(
            Engagement::Idle.launch(&params, &result, &layout),
            Err(LaunchError::DegenerateTrajectory)
        );
    }

    #[test]
    fn test_engagement_transitions() {
        let projectile = Projectile::new(Vec2::new(10.0, 0.0), Vec2::new(-4.0, 0.0), 1.0);
        let engagement = Engagement::InFlight {
            projectile,
            target: Vec2::ZERO,
            effective_energy: 0.0,
        };

        // 10 away at 4/tick: moves on ticks 1-2, arrives on tick 3
        let e = engagement.advance(0.0, 1.0, 0.5);
        assert_eq!(e.projectile().map(|p| p.pos.x), Some(6.0));
        let e = e.advance(0.1, 1.0, 0.5);
        assert_eq!(e.projectile().map(|p| p.pos.x), Some(2.0));
        let e = e.advance(0.2, 1.0, 0.5);
        assert_eq!(e.phase(), EngagementPhase::Impacted);
        assert!(e.projectile().is_none());
        assert_eq!(e.explosion().map(|x| x.started_at), Some(0.2));

        let e = e.advance(0.7, 1.0, 0.5);
        assert_eq!(e.phase(), EngagementPhase::Impacted);
        let e = e.advance(0.71, 1.0, 0.5);
        assert_eq!(e, Engagement::Idle);
    }

    #[test]
    fn test_apply_records_results() {
        let mut state = ExplorerState::new(&Settings::default());
        let params = ImpactParameters {
            material: Material::Iron,
            ..Default::default()
        };
        state.apply(params).unwrap();
        assert_eq!(state.phase(), EngagementPhase::InFlight);
        assert_eq!(state.params, Some(params));
        assert!(state.result.as_ref().is_some_and(|r| r.mass > 0.0));
        assert!(matches!(state.events[..], [GameEvent::Launched { .. }]));
    }

    #[test]
    fn test_meteor_hit_points() {
        let settings = Settings::default();
        let mut state = ArcadeState::new(1, &settings);
        state.begin();
        let plan = SpawnPlan {
            pos: Vec2::new(100.0, 100.0),
            tier: Tier::Big,
            speed: 1.0,
        };
        let id = state.insert_meteor(plan).unwrap();

        let at = Vec2::new(105.0, 100.0);
        assert_eq!(state.click(at), ClickOutcome::Damaged { id, hp: 2 });
        assert_eq!(state.click(at), ClickOutcome::Damaged { id, hp: 1 });
        assert_eq!(state.click(at), ClickOutcome::Destroyed { id });
        assert_eq!(state.click(at), ClickOutcome::Miss);
        assert_eq!(state.score, 10);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].origin, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_click_hits_only_oldest_overlap() {
        let mut state = ArcadeState::new(1, &Settings::default());
        state.begin();
        let plan = SpawnPlan {
            pos: Vec2::new(200.0, 50.0),
            tier: Tier::Small,
            speed: 1.0,
        };
        let first = state.insert_meteor(plan).unwrap();
        let second = state.insert_meteor(plan).unwrap();

        assert_eq!(
            state.click(Vec2::new(200.0, 50.0)),
            ClickOutcome::Destroyed { id: first }
        );
        assert_eq!(state.meteors.len(), 1);
        assert_eq!(state.meteors[0].id, second);
    }
}
