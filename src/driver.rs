//! Fixed-step frame driver
//!
//! Turns variable frame times into whole simulation ticks. Frame time is
//! clamped, then consumed in `SIM_DT` steps with a per-frame substep cap.

use rand::Rng;

use crate::consts::*;
use crate::sim::{
    ArcadeInput, ArcadeState, ExplorerInput, ExplorerState, tick_arcade, tick_explorer,
};

/// A session the driver can step
pub trait Simulation {
    type Input: Clone;

    /// Advance by one fixed timestep
    fn step(&mut self, input: &Self::Input, dt: f32);

    fn is_running(&self) -> bool;

    /// Reset button presses so they only act on one substep
    fn clear_one_shot(input: &mut Self::Input);
}

impl Simulation for ExplorerState {
    type Input = ExplorerInput;

    fn step(&mut self, input: &ExplorerInput, dt: f32) {
        tick_explorer(self, input, dt);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn clear_one_shot(input: &mut ExplorerInput) {
        input.apply = None;
    }
}

impl<R: Rng> Simulation for ArcadeState<R> {
    type Input = ArcadeInput;

    fn step(&mut self, input: &ArcadeInput, dt: f32) {
        tick_arcade(self, input, dt);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn clear_one_shot(input: &mut ArcadeInput) {
        input.start = false;
        input.restart = false;
        input.clicks.clear();
    }
}

/// Accumulates frame time and runs whole ticks
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    pub accumulator: f32,
    max_frame_dt: f32,
    max_substeps: u32,
}

impl Default for FixedStepDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedStepDriver {
    pub fn new() -> Self {
        Self::with_limits(MAX_FRAME_DT, MAX_SUBSTEPS)
    }

    pub fn with_limits(max_frame_dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            max_frame_dt,
            max_substeps,
        }
    }

    /// Feed one frame's elapsed time, returns the number of ticks run
    ///
    /// `input` is applied on the first substep; its one-shot presses are
    /// cleared afterwards so later substeps see only held state.
    pub fn update<S: Simulation>(&mut self, sim: &mut S, input: &mut S::Input, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, self.max_frame_dt);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < self.max_substeps {
            if !sim.is_running() {
                self.accumulator = 0.0;
                break;
            }
            let tick_input = input.clone();
            sim.step(&tick_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            S::clear_one_shot(input);
        }

        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{ArcadePhase, EngagementPhase, ImpactParameters};

    #[test]
    fn test_one_frame_one_tick() {
        let mut driver = FixedStepDriver::new();
        let mut state = ExplorerState::new(&Settings::default());
        let mut input = ExplorerInput::default();

        assert_eq!(driver.update(&mut state, &mut input, SIM_DT), 1);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_partial_frames_accumulate() {
        let mut driver = FixedStepDriver::new();
        let mut state = ExplorerState::new(&Settings::default());
        let mut input = ExplorerInput::default();

        assert_eq!(driver.update(&mut state, &mut input, SIM_DT * 0.6), 0);
        assert_eq!(driver.update(&mut state, &mut input, SIM_DT * 0.6), 1);
        assert!(driver.accumulator > 0.0 && driver.accumulator < SIM_DT);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut driver = FixedStepDriver::new();
        let mut state = ExplorerState::new(&Settings::default());
        let mut input = ExplorerInput::default();

        // A 5 second hitch only counts as MAX_FRAME_DT
        let ticks = driver.update(&mut state, &mut input, 5.0);
        assert!((5..=6).contains(&ticks), "ticks = {ticks}");
    }

    #[test]
    fn test_substep_cap() {
        let mut driver = FixedStepDriver::with_limits(1.0, MAX_SUBSTEPS);
        let mut state = ExplorerState::new(&Settings::default());
        let mut input = ExplorerInput::default();

        assert_eq!(driver.update(&mut state, &mut input, 0.5), MAX_SUBSTEPS);
        // Backlog carries into the next frame
        assert!(driver.accumulator > SIM_DT);
    }

    #[test]
    fn test_one_shot_input_applies_once() {
        let mut driver = FixedStepDriver::new();
        let mut state = ExplorerState::new(&Settings::default());
        let mut input = ExplorerInput {
            apply: Some(ImpactParameters::default()),
            ..Default::default()
        };

        let ticks = driver.update(&mut state, &mut input, 4.0 * SIM_DT + 0.001);
        assert_eq!(ticks, 4);
        assert!(input.apply.is_none());
        assert_eq!(state.phase(), EngagementPhase::InFlight);
    }

    #[test]
    fn test_arcade_clicks_cleared() {
        let mut driver = FixedStepDriver::new();
        let mut state = ArcadeState::new(3, &Settings::default());
        let mut input = ArcadeInput {
            start: true,
            clicks: vec![glam::Vec2::new(10.0, 10.0)],
            ..Default::default()
        };

        driver.update(&mut state, &mut input, 2.0 * SIM_DT + 0.001);
        assert_eq!(state.phase, ArcadePhase::Playing);
        assert!(!input.start);
        assert!(input.clicks.is_empty());
    }

    #[test]
    fn test_stopped_session_runs_no_ticks() {
        let mut driver = FixedStepDriver::new();
        let mut state = ExplorerState::new(&Settings::default());
        state.running = false;
        let mut input = ExplorerInput::default();

        assert_eq!(driver.update(&mut state, &mut input, 0.05), 0);
        assert_eq!(state.time_ticks, 0);
    }
}
