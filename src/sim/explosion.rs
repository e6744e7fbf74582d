//! Timed explosion flash
//!
//! An effect is split into ten frames over its duration. Color steps from
//! yellow through orange to red, the radius grows linearly and alpha fades.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Number of frames an effect is divided into
pub const EXPLOSION_FRAMES: u32 = 10;

/// Flash palette, in order
pub const EXPLOSION_PALETTE: [Rgb; 3] = [
    Rgb(255, 220, 50), // yellow
    Rgb(255, 140, 0),  // orange
    Rgb(200, 40, 0),   // red
];

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// What to draw for an explosion at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplosionFrame {
    pub index: u32,
    pub center: Vec2,
    pub color: Rgb,
    pub radius: f32,
    pub alpha: u8,
}

/// An explosion started at `started_at` seconds of session time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplosionEffect {
    pub origin: Vec2,
    pub started_at: f32,
    pub duration: f32,
    /// Radius at frame 0
    pub base_radius: f32,
    /// Radius gained per frame
    pub radius_step: f32,
}

impl ExplosionEffect {
    /// Explorer flash, sized by effective impact energy (Mt)
    pub fn impact(origin: Vec2, started_at: f32, effective_energy: f64, duration: f32) -> Self {
        let max_radius = 50.0 + (effective_energy.max(0.0) / 100.0).min(200.0) as f32;
        Self {
            origin,
            started_at,
            duration,
            base_radius: 20.0,
            radius_step: max_radius / EXPLOSION_FRAMES as f32,
        }
    }

    /// Arcade burst for a destroyed meteor (fixed size)
    pub fn burst(origin: Vec2, started_at: f32) -> Self {
        Self {
            origin,
            started_at,
            duration: ARCADE_EXPLOSION_DURATION,
            base_radius: 15.0,
            radius_step: 3.0,
        }
    }

    /// Seconds since the effect began
    #[inline]
    pub fn elapsed(&self, now: f32) -> f32 {
        (now - self.started_at).max(0.0)
    }

    /// True once the full duration has passed
    #[inline]
    pub fn is_finished(&self, now: f32) -> bool {
        self.elapsed(now) > self.duration
    }

    /// Frame index for an elapsed time, clamped to the last frame
    pub fn frame_index(&self, elapsed: f32) -> u32 {
        if self.duration <= 0.0 {
            return EXPLOSION_FRAMES - 1;
        }
        let raw = (elapsed / self.duration * EXPLOSION_FRAMES as f32).floor();
        (raw.max(0.0) as u32).min(EXPLOSION_FRAMES - 1)
    }

    /// Frame to draw at `now`, or `None` once finished
    pub fn frame_at(&self, now: f32) -> Option<ExplosionFrame> {
        if self.is_finished(now) {
            return None;
        }
        Some(self.frame(self.frame_index(self.elapsed(now))))
    }

    fn frame(&self, index: u32) -> ExplosionFrame {
        let palette_index = (index / 2).min(2) as usize;
        ExplosionFrame {
            index,
            center: self.origin,
            color: EXPLOSION_PALETTE[palette_index],
            // Whole pixels
            radius: (self.base_radius + index as f32 * self.radius_step).floor(),
            alpha: 255u32.saturating_sub(index * 25) as u8,
        }
    }

    /// Consume the effect, yielding each of its frames once in order
    pub fn frames(self) -> ExplosionFrames {
        ExplosionFrames {
            effect: self,
            next: 0,
        }
    }
}

/// Lazy, finite frame sequence of a single effect
#[derive(Debug, Clone)]
pub struct ExplosionFrames {
    effect: ExplosionEffect,
    next: u32,
}

impl Iterator for ExplosionFrames {
    type Item = ExplosionFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= EXPLOSION_FRAMES {
            return None;
        }
        let frame = self.effect.frame(self.next);
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (EXPLOSION_FRAMES - self.next.min(EXPLOSION_FRAMES)) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ExplosionFrames {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_non_increasing_over_time() {
        let effect = ExplosionEffect::impact(Vec2::ZERO, 1.0, 1.0e6, EXPLOSION_DURATION);
        let mut last_alpha = u8::MAX;
        let mut t = 1.0;
        while let Some(frame) = effect.frame_at(t) {
            assert!(frame.alpha <= last_alpha);
            last_alpha = frame.alpha;
            t += 0.01;
        }
        assert!(t > 1.0 + EXPLOSION_DURATION);
    }

    #[test]
    fn test_frame_sequence() {
        let frames: Vec<_> = ExplosionEffect::burst(Vec2::new(3.0, 4.0), 0.0)
            .frames()
            .collect();
        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0].alpha, 255);
        assert_eq!(frames[9].alpha, 30);
        assert_eq!(frames[0].radius, 15.0);
        assert_eq!(frames[9].radius, 42.0);
        assert_eq!(frames[0].color, EXPLOSION_PALETTE[0]);
        assert_eq!(frames[2].color, EXPLOSION_PALETTE[1]);
        assert_eq!(frames[4].color, EXPLOSION_PALETTE[2]);
        assert_eq!(frames[9].color, EXPLOSION_PALETTE[2]);
        assert!(frames.iter().all(|f| f.center == Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_frame_index_clamped() {
        let effect = ExplosionEffect::impact(Vec2::ZERO, 0.0, 0.0, 0.5);
        assert_eq!(effect.frame_index(0.0), 0);
        assert_eq!(effect.frame_index(0.049), 0);
        assert_eq!(effect.frame_index(0.26), 5);
        assert_eq!(effect.frame_index(0.5), 9);
        assert_eq!(effect.frame_index(10.0), 9);
    }

    #[test]
    fn test_finishes_after_duration() {
        let effect = ExplosionEffect::impact(Vec2::ZERO, 2.0, 0.0, 0.5);
        assert!(effect.frame_at(2.5).is_some());
        assert!(effect.frame_at(2.51).is_none());
        assert!(!effect.is_finished(2.0));
    }

    #[test]
    fn test_impact_radius_scales_with_energy() {
        let small = ExplosionEffect::impact(Vec2::ZERO, 0.0, 0.0, 0.5);
        let huge = ExplosionEffect::impact(Vec2::ZERO, 0.0, 1.0e12, 0.5);
        // max radius 50 + min(E/100, 200)
        assert!((small.radius_step - 5.0).abs() < 1e-6);
        assert!((huge.radius_step - 25.0).abs() < 1e-6);
        assert_eq!(small.frames().next().map(|f| f.radius), Some(20.0));
    }

    #[test]
    fn test_impact_radius_truncated_to_pixels() {
        // max radius 62.34, step 6.234: frame 3 is 38.702
        let effect = ExplosionEffect::impact(Vec2::ZERO, 0.0, 1234.0, 0.5);
        let radii: Vec<f32> = effect.frames().map(|f| f.radius).collect();
        assert_eq!(radii[3], 38.0);
        assert!(radii.iter().all(|r| r.fract() == 0.0));
    }
}
