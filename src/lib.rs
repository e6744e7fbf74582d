//! Meteor Madness - asteroid impact explorer and arcade minigame
//!
//! Core modules:
//! - `sim`: Deterministic simulation (impact physics, motion, explosions, game state)
//! - `snapshot`: Read-only per-tick view handed to a renderer
//! - `driver`: Fixed timestep accumulator for variable frame times
//! - `settings`: Data-driven tuning loaded from JSON

pub mod driver;
pub mod error;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use driver::{FixedStepDriver, Simulation};
pub use error::{LaunchError, SettingsError};
pub use settings::Settings;
pub use snapshot::Snapshot;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the driver will accumulate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Explorer view dimensions
    pub const EXPLORER_WIDTH: f32 = 1280.0;
    pub const EXPLORER_HEIGHT: f32 = 800.0;
    pub const EXPLORER_MARGIN: f32 = 20.0;
    /// Earth sits right of the input sidebar and results column
    pub const EARTH_CENTER_X: f32 = 975.0;
    pub const EARTH_CENTER_Y: f32 = 320.0;
    pub const EARTH_SIZE: f32 = 350.0;
    pub const ASTEROID_BASE_SIZE: f32 = 70.0;
    /// Base asteroid speed in pixels per tick
    pub const ASTEROID_SPEED: f32 = 8.0;
    /// Extra pixels per tick at the top of the velocity range
    pub const ASTEROID_SPEED_BOOST: f32 = 5.0;
    /// Explorer explosion flash length (seconds)
    pub const EXPLOSION_DURATION: f32 = 0.5;
    /// Degrees the target body turns per tick
    pub const BODY_ROTATION_PER_TICK: f32 = 0.2;

    /// Arcade play field
    pub const ARCADE_WIDTH: f32 = 900.0;
    pub const ARCADE_HEIGHT: f32 = 600.0;
    pub const PLANET_RADIUS: f32 = 300.0;
    pub const PLANET_CENTER_X: f32 = ARCADE_WIDTH / 2.0;
    pub const PLANET_CENTER_Y: f32 = ARCADE_HEIGHT + 80.0;
    /// Horizontal inset for meteor spawns
    pub const METEOR_SPAWN_INSET: i32 = 40;
    /// Seconds between meteor spawns
    pub const SPAWN_INTERVAL: f32 = 2.0;
    /// Points per destroyed meteor
    pub const METEOR_SCORE: u64 = 10;
    /// Arcade explosions run for eleven frames at 60 Hz
    pub const ARCADE_EXPLOSION_DURATION: f32 = 11.0 * SIM_DT;
}

/// Explorer launch point: right edge, level with the Earth
#[inline]
pub fn explorer_launch_point() -> Vec2 {
    Vec2::new(
        consts::EXPLORER_WIDTH - consts::EXPLORER_MARGIN,
        consts::EARTH_CENTER_Y,
    )
}

/// Earth center in the explorer view
#[inline]
pub fn earth_center() -> Vec2 {
    Vec2::new(consts::EARTH_CENTER_X, consts::EARTH_CENTER_Y)
}

/// Planet center in the arcade view
#[inline]
pub fn planet_center() -> Vec2 {
    Vec2::new(consts::PLANET_CENTER_X, consts::PLANET_CENTER_Y)
}

/// Wrap degrees into [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}
