//! Assignment statistics.

use crate::model::{Roster, SectionId, TeamId};
use std::collections::BTreeMap;

/// Size of one finalized team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSize {
    pub section: SectionId,
    pub team: TeamId,
    pub size: usize,
}

/// Aggregate view of a set of rosters.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentSummary {
    pub total_people: usize,
    pub team_count: usize,
    pub team_sizes: Vec<TeamSize>,
    /// Mean team size, rounded to two decimals.
    pub average_team_size: f64,
    /// Assigned rank -> number of people who got it.
    pub rank_histogram: BTreeMap<u32, usize>,
    /// People placed on their rank-1 team.
    pub first_choice_count: usize,
    /// Mean assigned rank, rounded to two decimals.
    pub mean_rank: f64,
}

impl AssignmentSummary {
    pub fn from_rosters(rosters: &[Roster]) -> Self {
        let team_sizes: Vec<TeamSize> = rosters
            .iter()
            .map(|r| TeamSize {
                section: r.section.clone(),
                team: r.team,
                size: r.len(),
            })
            .collect();
        let total_people: usize = team_sizes.iter().map(|t| t.size).sum();

        let mut rank_histogram = BTreeMap::new();
        let mut rank_sum = 0u64;
        for member in rosters.iter().flat_map(|r| &r.members) {
            *rank_histogram.entry(member.rank).or_insert(0) += 1;
            rank_sum += u64::from(member.rank);
        }

        Self {
            total_people,
            team_count: rosters.len(),
            average_team_size: round2(ratio(total_people as f64, rosters.len())),
            first_choice_count: rank_histogram.get(&1).copied().unwrap_or(0),
            mean_rank: round2(ratio(rank_sum as f64, total_people)),
            team_sizes,
            rank_histogram,
        }
    }
}

fn ratio(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
