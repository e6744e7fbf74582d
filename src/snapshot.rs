//! Per-tick view of a session for the renderer
//!
//! Built from session state after each tick. Holds only what a renderer
//! needs to draw a frame and serializes to JSON for the headless runner.

use serde::{Deserialize, Serialize};

use crate::sim::{
    ArcadePhase, ArcadeState, EngagementPhase, ExplorerState, ExplosionFrame, GameEvent,
    ImpactResult, Tier,
};

/// A projectile to draw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Sprite rotation in degrees
    pub rotation: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hp: Option<u8>,
}

/// Mode-specific phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "phase")]
pub enum PhaseSnapshot {
    Explorer(EngagementPhase),
    Arcade(ArcadePhase),
}

/// Results box contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsSnapshot {
    pub energy_label: String,
    pub headline_label: String,
    pub headline_value: String,
    pub mass_kg: f64,
    pub risks: Vec<String>,
}

impl From<&ImpactResult> for ResultsSnapshot {
    fn from(result: &ImpactResult) -> Self {
        let (label, value) = result.headline();
        Self {
            energy_label: result.energy_label(),
            headline_label: label.to_string(),
            headline_value: value,
            mass_kg: result.mass,
            risks: result.risks.iter().map(|r| r.description().to_string()).collect(),
        }
    }
}

/// Everything drawn for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    /// Session seconds
    pub time: f32,
    pub phase: PhaseSnapshot,
    /// Target body rotation in degrees
    pub body_rotation: f32,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub explosions: Vec<ExplosionFrame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn explorer(state: &ExplorerState) -> Self {
        let projectiles = state
            .engagement
            .projectile()
            .map(|p| ProjectileSnapshot {
                id: 0,
                x: p.pos.x,
                y: p.pos.y,
                radius: p.radius,
                rotation: state.projectile_rotation(),
                tier: None,
                hp: None,
            })
            .into_iter()
            .collect();

        let explosions = state
            .engagement
            .explosion()
            .and_then(|e| e.frame_at(state.clock))
            .into_iter()
            .collect();

        Self {
            tick: state.time_ticks,
            time: state.clock,
            phase: PhaseSnapshot::Explorer(state.phase()),
            body_rotation: state.body_rotation,
            projectiles,
            explosions,
            score: None,
            results: state.result.as_ref().map(ResultsSnapshot::from),
            events: state.events.clone(),
        }
    }

    pub fn arcade<R>(state: &ArcadeState<R>) -> Self {
        let projectiles = state
            .meteors
            .iter()
            .map(|m| ProjectileSnapshot {
                id: m.id,
                x: m.projectile.pos.x,
                y: m.projectile.pos.y,
                radius: m.projectile.radius,
                rotation: 0.0,
                tier: Some(m.tier),
                hp: Some(m.hp),
            })
            .collect();

        let explosions = state
            .explosions
            .iter()
            .filter_map(|e| e.frame_at(state.elapsed))
            .collect();

        Self {
            tick: state.time_ticks,
            time: state.elapsed,
            phase: PhaseSnapshot::Arcade(state.phase),
            body_rotation: state.body_rotation,
            projectiles,
            explosions,
            score: Some(state.score),
            results: None,
            events: state.events.clone(),
        }
    }

    /// One-line JSON for streaming output
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::{ExplorerInput, ImpactParameters, tick_explorer};

    #[test]
    fn test_explorer_snapshot_follows_phase() {
        let mut state = ExplorerState::new(&Settings::default());
        let snap = Snapshot::explorer(&state);
        assert_eq!(snap.phase, PhaseSnapshot::Explorer(EngagementPhase::Idle));
        assert!(snap.projectiles.is_empty());
        assert!(snap.results.is_none());

        let input = ExplorerInput {
            apply: Some(ImpactParameters::default()),
            ..Default::default()
        };
        tick_explorer(&mut state, &input, SIM_DT);
        let snap = Snapshot::explorer(&state);
        assert!(matches!(snap.events[..], [GameEvent::Launched { .. }]));
        assert_eq!(snap.projectiles.len(), 1);
        assert!(snap.explosions.is_empty());
        let results = snap.results.as_ref().unwrap();
        assert_eq!(results.headline_label, "Crater Diameter");
        assert_eq!(results.risks.len(), 2);

        while state.phase() == EngagementPhase::InFlight {
            tick_explorer(&mut state, &ExplorerInput::default(), SIM_DT);
        }
        let snap = Snapshot::explorer(&state);
        assert!(snap.projectiles.is_empty());
        assert_eq!(snap.explosions.len(), 1);
        assert_eq!(snap.explosions[0].alpha, 255);
    }

    #[test]
    fn test_json_line_shape() {
        let mut state = ArcadeState::new(1, &Settings::default());
        state.begin();
        state.score = 30;
        let line = Snapshot::arcade(&state).to_json_line().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["score"], 30);
        assert_eq!(value["phase"]["mode"], "Arcade");
        assert_eq!(value["phase"]["phase"], "Playing");
        assert!(value.get("results").is_none());
        assert!(!line.contains('\n'));
    }
}
