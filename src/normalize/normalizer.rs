//! Rank list repair.

use super::config::{NormalizeConfig, PaddingPolicy};
use crate::error::{Error, Result};
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// A single overwritten position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repair {
    /// Zero-based position in the (truncated/padded) list.
    pub position: usize,
    /// The value found there.
    pub original: i64,
    /// The value written in its place.
    pub replacement: u32,
}

/// Actions taken while normalizing one person's list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Original length when the list was longer than the team count.
    pub truncated_from: Option<usize>,
    /// Original length when the list was shorter than the team count.
    pub padded_from: Option<usize>,
    /// Positions overwritten during repair, in scan order.
    pub repairs: Vec<Repair>,
}

impl NormalizationReport {
    /// Returns true when the input was already a valid permutation.
    pub fn is_clean(&self) -> bool {
        self.truncated_from.is_none() && self.padded_from.is_none() && self.repairs.is_empty()
    }

    /// Human-readable lines describing each action.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(len) = self.truncated_from {
            lines.push(format!("truncated {len} tokens to the team count"));
        }
        if let Some(len) = self.padded_from {
            lines.push(format!("padded {len} token(s) up to the team count"));
        }
        for r in &self.repairs {
            lines.push(format!(
                "position {}: replaced {} with {}",
                r.position + 1,
                r.original,
                r.replacement
            ));
        }
        lines
    }
}

/// A repaired rank list and the report of what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Permutation of `1..=T`; index `i` is the rank given to team `i + 1`.
    pub ranks: Vec<u32>,
    pub report: NormalizationReport,
}

/// Splits a raw ranking source into integer tokens.
///
/// Tokens may be separated by commas, whitespace, or both.
pub fn parse_tokens(raw: &str) -> Result<Vec<i64>> {
    let tokens: Vec<&str> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(Error::Ingestion("ranking source is empty".into()));
    }

    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| {
            t.parse::<i64>().map_err(|_| {
                Error::Ingestion(format!("token {} ('{t}') is not an integer", i + 1))
            })
        })
        .collect()
}

/// Repairs raw rank lists into permutations.
#[derive(Debug, Clone, Default)]
pub struct RankingNormalizer {
    config: NormalizeConfig,
}

impl RankingNormalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Normalizes `tokens` against `team_count` teams.
    ///
    /// Valid first occurrences stay where they are. Every other position
    /// receives a rank drawn uniformly from those not kept anywhere in the
    /// list, so the output is always a permutation of `1..=team_count`.
    pub fn normalize<R: Rng>(
        &self,
        tokens: &[i64],
        team_count: usize,
        rng: &mut R,
    ) -> Result<Normalized> {
        if team_count == 0 {
            return Err(Error::Ingestion("no teams are configured".into()));
        }
        if tokens.is_empty() {
            return Err(Error::Ingestion("ranking list is empty".into()));
        }

        let mut report = NormalizationReport::default();
        let mut values: Vec<i64> = tokens.to_vec();

        if values.len() > team_count {
            report.truncated_from = Some(values.len());
            values.truncate(team_count);
        } else if values.len() < team_count {
            report.padded_from = Some(values.len());
            let fill = match self.config.padding {
                PaddingPolicy::RepeatFirst => values[0],
                PaddingPolicy::RepeatLast => values[values.len() - 1],
            };
            values.resize(team_count, fill);
        }

        let upper = team_count as i64;
        let mut seen: HashSet<i64> = HashSet::with_capacity(team_count);
        let keep: Vec<bool> = values
            .iter()
            .map(|&v| (1..=upper).contains(&v) && seen.insert(v))
            .collect();

        let mut missing: Vec<u32> = (1..=team_count as u32)
            .filter(|r| !seen.contains(&(*r as i64)))
            .collect();

        let mut ranks = Vec::with_capacity(team_count);
        for (position, (&value, kept)) in values.iter().zip(keep).enumerate() {
            if kept {
                ranks.push(value as u32);
                continue;
            }
            let replacement = missing.swap_remove(rng.random_range(0..missing.len()));
            report.repairs.push(Repair {
                position,
                original: value,
                replacement,
            });
            ranks.push(replacement);
        }

        if !report.is_clean() {
            debug!(
                team_count,
                truncated = report.truncated_from.is_some(),
                padded = report.padded_from.is_some(),
                repairs = report.repairs.len(),
                "normalized ranking list"
            );
        }

        Ok(Normalized { ranks, report })
    }
}
