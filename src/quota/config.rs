//! Quota planner configuration.

use serde::{Deserialize, Serialize};

/// How the people left over after forming `k` base-size teams are spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// One extra person on each of the first `r` teams. A remainder larger
    /// than the team count is infeasible.
    #[default]
    FrontLoaded,
    /// Extras dealt one at a time across the teams, wrapping around.
    RoundRobin,
}

/// Configuration for [`QuotaPlanner`](super::QuotaPlanner).
///
/// # Examples
///
/// ```
/// use u_teams::quota::{QuotaConfig, RemainderPolicy};
///
/// let config = QuotaConfig::default()
///     .with_min_team_size(3)
///     .with_remainder(RemainderPolicy::RoundRobin);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaConfig {
    /// Minimum (and base) team size.
    pub min_team_size: usize,
    /// Remainder distribution rule.
    pub remainder: RemainderPolicy,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            min_team_size: 4,
            remainder: RemainderPolicy::default(),
        }
    }
}

impl QuotaConfig {
    pub fn with_min_team_size(mut self, size: usize) -> Self {
        self.min_team_size = size;
        self
    }

    pub fn with_remainder(mut self, policy: RemainderPolicy) -> Self {
        self.remainder = policy;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_team_size == 0 {
            return Err("min_team_size must be a positive integer".into());
        }
        Ok(())
    }
}
