//! Core trait for ranking storage.

use crate::exclusion::ExclusionIndex;
use crate::model::{Roster, SectionId, Team};
use crate::quota::RemainderPolicy;
use crate::validate::{validate_rankings, RankTable, ValidationReport};
use std::collections::BTreeMap;

/// Backing store read by the assignment pipeline.
///
/// Each call is a blocking read or write that must be visible to the
/// next call; runs are single-writer so no transaction spans calls.
///
/// # Examples
///
/// ```ignore
/// struct SqlStore { conn: Connection }
///
/// impl RankingStore for SqlStore {
///     fn team_count(&self) -> usize { /* SELECT COUNT(*) FROM teams */ }
///     fn rankings(&self) -> RankTable { /* SELECT name, team, rank ... */ }
///     // ...
/// }
/// ```
pub trait RankingStore {
    /// Team catalogue ordered by id.
    fn teams(&self) -> Vec<Team>;

    /// Number of teams every person must rank.
    fn team_count(&self) -> usize {
        self.teams().len()
    }

    /// Section id -> registered members.
    fn sections(&self) -> BTreeMap<SectionId, Vec<String>>;

    /// Section id -> member count.
    fn section_populations(&self) -> BTreeMap<SectionId, usize> {
        self.sections()
            .into_iter()
            .map(|(s, members)| (s, members.len()))
            .collect()
    }

    /// Minimum team size.
    fn min_team_size(&self) -> usize;

    /// Remainder distribution rule for quota planning.
    fn remainder_policy(&self) -> RemainderPolicy {
        RemainderPolicy::default()
    }

    /// Stored rankings by person.
    fn rankings(&self) -> RankTable;

    /// Configured exclusions.
    fn exclusions(&self) -> ExclusionIndex;

    /// Audits the stored rankings.
    fn run_validation(&self) -> ValidationReport {
        validate_rankings(&self.rankings(), self.team_count(), &self.sections())
    }

    /// Persists the rosters of a successful run.
    fn record_rosters(&mut self, rosters: &[Roster]);
}
