//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded (or injected) RNG only
//! - Stable iteration order (oldest entity first)
//! - No rendering or platform dependencies

pub mod explosion;
pub mod impact;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tick;

pub use explosion::{ExplosionEffect, ExplosionFrame, ExplosionFrames, Rgb};
pub use impact::{
    ImpactParameters, ImpactResult, Location, Material, Risk, crater, energy_megatons, mass,
    risks,
};
pub use projectile::{Projectile, explorer_target, launch_velocity, visual_speed};
pub use spawner::{SpawnPlan, SpawnTimer, Tier};
pub use state::{
    ArcadePhase, ArcadeState, ClickOutcome, Engagement, EngagementPhase, ExplorerLayout,
    ExplorerState, GameEvent, Meteor,
};
pub use tick::{ArcadeInput, ExplorerInput, tick_arcade, tick_explorer};
