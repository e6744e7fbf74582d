//! Error types
//!
//! The simulation itself assumes pre-clamped input, so the only failures are a
//! rejected launch and a bad settings file.

use crate::sim::EngagementPhase;

/// Why an explorer launch did not start an engagement
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum LaunchError {
    #[error("engagement already running ({0:?})")]
    Busy(EngagementPhase),

    #[error("launch point coincides with impact target")]
    DegenerateTrajectory,
}

/// Errors from loading a settings file
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
