//! Normalizer configuration.

use serde::{Deserialize, Serialize};

/// How a rank list shorter than the team count is extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingPolicy {
    /// Repeat the first submitted token.
    #[default]
    RepeatFirst,
    /// Repeat the last submitted token.
    RepeatLast,
}

/// Configuration for [`RankingNormalizer`](super::RankingNormalizer).
///
/// # Examples
///
/// ```
/// use u_teams::normalize::{NormalizeConfig, PaddingPolicy};
///
/// let config = NormalizeConfig::default().with_padding(PaddingPolicy::RepeatLast);
/// assert_eq!(config.padding, PaddingPolicy::RepeatLast);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Padding rule for short lists.
    pub padding: PaddingPolicy,
}

impl NormalizeConfig {
    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }
}
