//! Engine configuration.

use serde::{Deserialize, Serialize};

/// How the target team is chosen when several are equally popular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lowest team id, then lowest section id.
    #[default]
    LowestId,
    /// Uniformly at random among the tied teams.
    Random,
}

/// Configuration for the [`AssignmentEngine`](super::AssignmentEngine).
///
/// # Examples
///
/// ```
/// use u_teams::engine::{EngineConfig, TieBreak};
///
/// let config = EngineConfig::default()
///     .with_seed(42)
///     .with_tie_break(TieBreak::Random);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Random seed for reproducibility. `None` draws a fresh seed per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Target-team tie-breaking rule.
    pub tie_break: TieBreak,
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}
