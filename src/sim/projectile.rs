//! Projectile motion toward a fixed target
//!
//! Velocities are in pixels per tick. Motion is straight-line at constant
//! velocity; arrival is decided by whether the next step would reach the
//! target, since discrete stepping rarely lands on it exactly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A moving object (asteroid or meteor)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    /// Aim at `target` from `pos` at `speed` pixels per tick.
    ///
    /// Returns `None` when `pos` and `target` coincide.
    pub fn aimed(pos: Vec2, target: Vec2, speed: f32, radius: f32) -> Option<Self> {
        launch_velocity(pos, target, speed).map(|vel| Self::new(pos, vel, radius))
    }

    /// Move by one step scaled by elapsed ticks
    #[inline]
    pub fn advance(&mut self, dt_ticks: f32) {
        self.pos += self.vel * dt_ticks;
    }

    /// Length of one step
    #[inline]
    pub fn step_length(&self, dt_ticks: f32) -> f32 {
        self.vel.length() * dt_ticks
    }

    /// True when the next step would reach or pass `target`
    pub fn has_arrived(&self, target: Vec2, dt_ticks: f32) -> bool {
        self.pos.distance(target) <= self.step_length(dt_ticks)
    }

    /// Circle contact with a body (arcade planet)
    pub fn touches(&self, center: Vec2, body_radius: f32) -> bool {
        self.pos.distance(center) < body_radius + self.radius
    }

    /// Point inside the projectile's circle (click hit test)
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) < self.radius * self.radius
    }
}

/// Unit direction toward `to` scaled by `speed`, or `None` for zero distance
pub fn launch_velocity(from: Vec2, to: Vec2, speed: f32) -> Option<Vec2> {
    (to - from).try_normalize().map(|dir| dir * speed)
}

/// Explorer on-screen speed in pixels per tick for an entry velocity in km/s
pub fn visual_speed(velocity_km_s: f64) -> f32 {
    ASTEROID_SPEED + (velocity_km_s / 70.0) as f32 * ASTEROID_SPEED_BOOST
}

/// Strike point on the near hemisphere of a body.
///
/// Shallow angles land toward the limb facing `approach_from`, steep angles
/// toward the center.
pub fn explorer_target(
    center: Vec2,
    approach_from: Vec2,
    angle_deg: f64,
    body_radius: f32,
    projectile_radius: f32,
) -> Vec2 {
    let axis = (approach_from - center).try_normalize().unwrap_or(Vec2::X);
    let offset = (angle_deg.to_radians().cos() as f32) * (body_radius - projectile_radius);
    center + axis * offset
}

/// Ticks until `has_arrived` fires for a launch `distance` away at `speed`
pub fn ticks_to_arrival(distance: f32, speed: f32) -> u32 {
    if speed <= 0.0 {
        return u32::MAX;
    }
    (distance / speed).ceil().max(1.0) as u32
}
