//! Assignment execution loop.
//!
//! # Algorithm
//!
//! 1. Stop when every section's quota queue is drained.
//! 2. Derive each active person's top choice among open teams.
//! 3. Target the (section, team) that is the top choice of the most
//!    people, among sections with quota left.
//! 4. Order its candidates ascending by rank, shuffling equal ranks.
//! 5. Walk the candidates, skipping anyone excluded with the growing
//!    roster. Once the roster reaches the section's next quota, finalize
//!    it and go back to 2. If every remaining candidate is blocked, stop
//!    with an exclusion deadlock.
//!
//! The engine commits to one target per pass and never backtracks.

use super::config::{EngineConfig, TieBreak};
use super::live::{Candidate, LiveView, TopChoice};
use crate::error::{Deadlock, Error, Result};
use crate::model::{Member, Roster, SectionId, TeamId};
use crate::quota::QuotaPlan;
use crate::random::rng_from_option;
use crate::summary::AssignmentSummary;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info, warn};

/// How a run that did not deadlock ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every quota was filled and every person placed.
    Complete,
    /// The run stopped with quotas or people left over.
    Incomplete {
        /// People never placed, sorted.
        unplaced: Vec<String>,
        /// Remaining quota sizes per section.
        open_quotas: BTreeMap<SectionId, Vec<usize>>,
    },
}

/// Result of an assignment run.
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Finalized rosters in formation order.
    pub rosters: Vec<Roster>,
    pub outcome: Outcome,
    /// Number of selection passes executed.
    pub passes: usize,
}

impl Assignment {
    pub fn is_complete(&self) -> bool {
        self.outcome == Outcome::Complete
    }

    /// Rosters grouped by section, each group in formation order.
    pub fn by_section(&self) -> BTreeMap<&str, Vec<&Roster>> {
        let mut grouped: BTreeMap<&str, Vec<&Roster>> = BTreeMap::new();
        for roster in &self.rosters {
            grouped.entry(roster.section.as_str()).or_default().push(roster);
        }
        grouped
    }

    /// The roster `person` was placed on.
    pub fn roster_of(&self, person: &str) -> Option<&Roster> {
        self.rosters.iter().find(|r| r.contains(person))
    }

    pub fn summary(&self) -> AssignmentSummary {
        AssignmentSummary::from_rosters(&self.rosters)
    }
}

/// Result of walking one target's candidate list.
enum Walk {
    Filled(Vec<Member>),
    Blocked {
        placed: Vec<Member>,
        blocked: Vec<String>,
    },
}

/// Runs the greedy, exclusion-aware assignment.
#[derive(Debug, Clone, Default)]
pub struct AssignmentEngine {
    config: EngineConfig,
}

impl AssignmentEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs with a generator seeded from the configuration.
    pub fn run(&self, view: LiveView, plan: &QuotaPlan) -> Result<Assignment> {
        let mut rng = rng_from_option(self.config.seed);
        self.run_with_rng(view, plan, &mut rng)
    }

    /// Runs with an injected random source.
    ///
    /// The view is consumed: working state never outlives the run.
    pub fn run_with_rng<R: Rng>(
        &self,
        mut view: LiveView,
        plan: &QuotaPlan,
        rng: &mut R,
    ) -> Result<Assignment> {
        let mut queues: BTreeMap<SectionId, VecDeque<usize>> = plan
            .iter()
            .map(|(s, sizes)| (s.clone(), sizes.iter().copied().collect()))
            .collect();
        let mut rosters: Vec<Roster> = Vec::new();
        let mut passes = 0usize;

        info!(
            people = view.active_count(),
            teams = plan.team_total(),
            "starting assignment"
        );

        while queues.values().any(|q| !q.is_empty()) {
            let choices = view.active_top_choices();
            let Some((section, team)) = self.select_target(&choices, &queues, rng) else {
                warn!("quota remains but no active person has an open team");
                break;
            };
            passes += 1;

            let target_size = queues
                .get(&section)
                .and_then(|q| q.front().copied())
                .unwrap_or(0);
            let candidates = order_candidates(
                view.target_team_candidates(&section, team),
                target_size,
                rng,
            );
            debug!(
                pass = passes,
                section = section.as_str(),
                %team,
                target_size,
                candidates = candidates.len(),
                "target selected"
            );

            match walk(&view, &candidates, target_size) {
                Walk::Filled(members) => {
                    if let Some(q) = queues.get_mut(&section) {
                        q.pop_front();
                    }
                    let names: Vec<String> = members.iter().map(|m| m.name.clone()).collect();
                    view.finalize_team(&section, team, &names);
                    debug!(section = section.as_str(), %team, members = ?names, "team finalized");
                    rosters.push(Roster {
                        section,
                        team,
                        members,
                    });
                }
                Walk::Blocked { placed, blocked } => {
                    warn!(
                        section = section.as_str(),
                        %team,
                        placed = placed.len(),
                        blocked = blocked.len(),
                        finalized = rosters.len(),
                        "exclusion deadlock"
                    );
                    return Err(Error::ExclusionDeadlock(Box::new(Deadlock {
                        section,
                        team,
                        target_size,
                        placed: placed.into_iter().map(|m| m.name).collect(),
                        blocked,
                        partial: rosters,
                    })));
                }
            }
        }

        let open_quotas: BTreeMap<SectionId, Vec<usize>> = queues
            .into_iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(s, q)| (s, q.into_iter().collect()))
            .collect();
        let outcome = if open_quotas.is_empty() && view.active_count() == 0 {
            Outcome::Complete
        } else {
            Outcome::Incomplete {
                unplaced: view.unplaced(),
                open_quotas,
            }
        };

        info!(
            teams = rosters.len(),
            passes,
            complete = outcome == Outcome::Complete,
            "assignment finished"
        );

        Ok(Assignment {
            rosters,
            outcome,
            passes,
        })
    }

    /// Picks the most popular pending (section, team).
    fn select_target<R: Rng>(
        &self,
        choices: &[TopChoice],
        queues: &BTreeMap<SectionId, VecDeque<usize>>,
        rng: &mut R,
    ) -> Option<(SectionId, TeamId)> {
        let mut popularity: BTreeMap<(TeamId, &str), usize> = BTreeMap::new();
        for c in choices {
            if queues.get(&c.section).is_some_and(|q| !q.is_empty()) {
                *popularity.entry((c.team, c.section.as_str())).or_default() += 1;
            }
        }

        let best = popularity.values().copied().max()?;
        let tied: Vec<(TeamId, &str)> = popularity
            .iter()
            .filter(|(_, n)| **n == best)
            .map(|(&key, _)| key)
            .collect();

        let (team, section) = match self.config.tie_break {
            TieBreak::LowestId => tied.first().copied(),
            TieBreak::Random => tied.choose(rng).copied(),
        }?;
        Some((section.to_string(), team))
    }
}

/// Keeps first-choice candidates; the rest of the section is appended only
/// when first choices alone cannot fill `target_size`. Runs of equal
/// (first choice, rank) are shuffled.
fn order_candidates<R: Rng>(
    mut candidates: Vec<Candidate>,
    target_size: usize,
    rng: &mut R,
) -> Vec<Candidate> {
    let first_choices = candidates.iter().filter(|c| c.first_choice).count();
    if first_choices >= target_size {
        candidates.truncate(first_choices);
    }

    let mut start = 0;
    while start < candidates.len() {
        let key = (candidates[start].first_choice, candidates[start].rank);
        let end = candidates[start..]
            .iter()
            .position(|c| (c.first_choice, c.rank) != key)
            .map_or(candidates.len(), |offset| start + offset);
        candidates[start..end].shuffle(rng);
        start = end;
    }
    candidates
}

/// Fills one roster from `candidates`, skipping blocked people.
fn walk(view: &LiveView, candidates: &[Candidate], target_size: usize) -> Walk {
    let mut placed: Vec<Member> = Vec::with_capacity(target_size);
    let mut names: Vec<String> = Vec::with_capacity(target_size);
    let mut blocked: Vec<String> = Vec::new();
    let mut skips = 0usize;
    let mut streak_start = 0usize;

    for (i, candidate) in candidates.iter().enumerate() {
        if view.is_excluded(&candidate.person, &names) {
            if skips == 0 {
                streak_start = i;
            }
            skips += 1;
            blocked.push(candidate.person.clone());
            if skips == candidates.len() - streak_start {
                break;
            }
            continue;
        }

        skips = 0;
        names.push(candidate.person.clone());
        placed.push(Member {
            name: candidate.person.clone(),
            rank: candidate.rank,
        });
        if placed.len() == target_size {
            return Walk::Filled(placed);
        }
    }

    Walk::Blocked { placed, blocked }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionIndex;
    use crate::quota::{QuotaConfig, QuotaPlanner};
    use crate::random::create_rng;
    use crate::validate::RankTable;

    struct Fixture {
        rankings: RankTable,
        sections: BTreeMap<SectionId, Vec<String>>,
        team_count: usize,
        min: usize,
    }

    impl Fixture {
        fn new(team_count: usize, min: usize) -> Self {
            Self {
                rankings: RankTable::new(),
                sections: BTreeMap::new(),
                team_count,
                min,
            }
        }

        fn person(mut self, section: &str, name: &str, ranks: &[i64]) -> Self {
            self.rankings.insert(name.to_string(), ranks.to_vec());
            self.sections
                .entry(section.to_string())
                .or_default()
                .push(name.to_string());
            self
        }

        fn plan(&self) -> QuotaPlan {
            let populations = self
                .sections
                .iter()
                .map(|(s, m)| (s.clone(), m.len()))
                .collect();
            QuotaPlanner::new(QuotaConfig::default().with_min_team_size(self.min))
                .plan_sections(&populations, self.team_count)
                .unwrap()
        }

        fn view(&self, exclusions: ExclusionIndex) -> LiveView {
            LiveView::materialize(&self.rankings, &self.sections, self.team_count, exclusions)
                .unwrap()
        }

        fn run(&self, exclusions: ExclusionIndex, seed: u64) -> Result<Assignment> {
            AssignmentEngine::default().run_with_rng(
                self.view(exclusions),
                &self.plan(),
                &mut create_rng(seed),
            )
        }
    }

    fn ranks_of(assignment: &Assignment, name: &str) -> u32 {
        assignment
            .roster_of(name)
            .and_then(|r| r.members.iter().find(|m| m.name == name))
            .map(|m| m.rank)
            .unwrap()
    }

    #[test]
    fn test_everyone_gets_first_choice() {
        let f = Fixture::new(2, 2)
            .person("s", "ann", &[1, 2])
            .person("s", "bo", &[1, 2])
            .person("s", "cy", &[2, 1])
            .person("s", "di", &[2, 1]);
        let result = f.run(ExclusionIndex::new(), 1).unwrap();

        assert!(result.is_complete());
        assert_eq!(result.rosters.len(), 2);
        assert_eq!(result.passes, 2);
        for name in ["ann", "bo", "cy", "di"] {
            assert_eq!(ranks_of(&result, name), 1, "{name}");
        }
        assert_eq!(result.roster_of("ann").unwrap().team, TeamId(1));
        assert_eq!(result.roster_of("cy").unwrap().team, TeamId(2));
    }

    #[test]
    fn test_mutually_excluded_trio_deadlocks() {
        let f = Fixture::new(2, 2)
            .person("s", "ann", &[1, 2])
            .person("s", "bo", &[1, 2])
            .person("s", "cy", &[1, 2])
            .person("s", "di", &[2, 1]);
        let exclusions = ExclusionIndex::from_groups([["ann", "bo", "cy"]]).unwrap();
        let err = f.run(exclusions, 3).unwrap_err();

        let Error::ExclusionDeadlock(deadlock) = err else {
            panic!("expected deadlock, got {err:?}");
        };
        assert_eq!(deadlock.team, TeamId(1));
        assert_eq!(deadlock.target_size, 2);
        assert_eq!(deadlock.placed.len(), 1);
        assert_eq!(deadlock.blocked.len(), 2);
        assert!(deadlock.partial.iter().all(|r| r.team != TeamId(1)));
    }

    #[test]
    fn test_deadlock_surfaces_finalized_rosters() {
        // Team 2 is most popular and fills first; the excluded pair then
        // cannot share team 1.
        let f = Fixture::new(2, 2)
            .person("s", "ann", &[1, 2])
            .person("s", "bo", &[1, 2])
            .person("s", "cy", &[2, 1])
            .person("s", "di", &[2, 1])
            .person("s", "ed", &[2, 1])
            .person("s", "fa", &[2, 1]);
        // 6 people, min 2 -> three teams, but only two exist.
        let populations = [("s".to_string(), 6usize)].into_iter().collect();
        assert!(QuotaPlanner::new(QuotaConfig::default().with_min_team_size(2))
            .plan_sections(&populations, 2)
            .is_err());

        let f = Fixture { min: 3, ..f };
        let exclusions = ExclusionIndex::from_pairs([("ann", "bo")]).unwrap();
        let err = f.run(exclusions, 5).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let partial = err.partial_rosters();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].team, TeamId(2));
        assert_eq!(partial[0].len(), 3);
    }

    #[test]
    fn test_exclusion_respected_when_alternatives_exist() {
        let f = Fixture::new(2, 2)
            .person("s", "ann", &[1, 2])
            .person("s", "bo", &[1, 2])
            .person("s", "cy", &[1, 2])
            .person("s", "di", &[2, 1]);
        let exclusions = ExclusionIndex::from_pairs([("ann", "bo")]).unwrap();
        for seed in 0..20 {
            let result = f.run(exclusions.clone(), seed).unwrap();
            assert!(result.is_complete());
            let ann = result.roster_of("ann").unwrap();
            assert!(!ann.contains("bo"), "seed {seed}: {ann:?}");
        }
    }

    #[test]
    fn test_short_first_choice_pool_is_topped_up() {
        let f = Fixture::new(2, 3)
            .person("s", "ann", &[1, 2])
            .person("s", "bo", &[1, 2])
            .person("s", "cy", &[2, 1]);
        let result = f.run(ExclusionIndex::new(), 0).unwrap();
        assert!(result.is_complete());
        assert_eq!(result.rosters.len(), 1);
        assert_eq!(result.rosters[0].team, TeamId(1));
        assert_eq!(ranks_of(&result, "cy"), 2);
    }

    #[test]
    fn test_sections_form_independently() {
        let f = Fixture::new(2, 2)
            .person("a", "ann", &[1, 2])
            .person("a", "bo", &[1, 2])
            .person("b", "cy", &[1, 2])
            .person("b", "di", &[1, 2]);
        let result = f.run(ExclusionIndex::new(), 0).unwrap();
        assert!(result.is_complete());
        let grouped = result.by_section();
        assert_eq!(grouped["a"].len(), 1);
        assert_eq!(grouped["b"].len(), 1);
        assert!(result.rosters.iter().all(|r| r.team == TeamId(1)));
    }

    #[test]
    fn test_popularity_picks_target() {
        // Team 2 has four first choices and must be formed first.
        let f = Fixture::new(2, 3)
            .person("s", "ann", &[2, 1])
            .person("s", "bo", &[2, 1])
            .person("s", "cy", &[2, 1])
            .person("s", "di", &[2, 1])
            .person("s", "ed", &[1, 2])
            .person("s", "fa", &[1, 2]);
        let result = f.run(ExclusionIndex::new(), 9).unwrap();
        assert!(result.is_complete());
        assert_eq!(result.rosters[0].team, TeamId(2));
        assert_eq!(result.rosters[1].team, TeamId(1));
        assert_eq!(result.summary().first_choice_count, 5);
    }

    #[test]
    fn test_same_seed_same_result() {
        let mut f = Fixture::new(3, 2);
        for (i, name) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
            let ranks: &[i64] = if i % 2 == 0 { &[1, 2, 3] } else { &[1, 3, 2] };
            f = f.person("s", name, ranks);
        }
        let x = f.run(ExclusionIndex::new(), 17).unwrap();
        let y = f.run(ExclusionIndex::new(), 17).unwrap();
        assert_eq!(x.rosters, y.rosters);
    }

    #[test]
    fn test_random_tie_break_varies_target() {
        let f = Fixture::new(2, 2)
            .person("s", "ann", &[1, 2])
            .person("s", "bo", &[1, 2])
            .person("s", "cy", &[2, 1])
            .person("s", "di", &[2, 1]);
        let engine =
            AssignmentEngine::new(EngineConfig::default().with_tie_break(TieBreak::Random));
        let mut first_teams = std::collections::BTreeSet::new();
        for seed in 0..32 {
            let result = engine
                .run_with_rng(
                    f.view(ExclusionIndex::new()),
                    &f.plan(),
                    &mut create_rng(seed),
                )
                .unwrap();
            assert!(result.is_complete());
            first_teams.insert(result.rosters[0].team);
        }
        assert_eq!(first_teams.len(), 2);
    }

    #[test]
    fn test_plan_without_people_is_incomplete() {
        let f = Fixture::new(2, 2)
            .person("s", "ann", &[1, 2])
            .person("s", "bo", &[2, 1]);
        let view = f.view(ExclusionIndex::new());
        let populations = [("s".to_string(), 2usize), ("ghost".to_string(), 2usize)]
            .into_iter()
            .collect();
        let plan = QuotaPlanner::new(QuotaConfig::default().with_min_team_size(2))
            .plan_sections(&populations, 2)
            .unwrap();
        let result = AssignmentEngine::default()
            .run_with_rng(view, &plan, &mut create_rng(0))
            .unwrap();
        match result.outcome {
            Outcome::Incomplete {
                unplaced,
                open_quotas,
            } => {
                assert!(unplaced.is_empty());
                assert_eq!(open_quotas["ghost"], vec![2]);
            }
            Outcome::Complete => panic!("expected incomplete outcome"),
        }
    }

    #[test]
    fn test_order_candidates_shuffles_only_within_rank() {
        let candidates: Vec<Candidate> = [("a", 1), ("b", 1), ("c", 1), ("d", 2)]
            .iter()
            .map(|&(p, rank)| Candidate {
                person: p.to_string(),
                rank,
                first_choice: true,
            })
            .collect();
        let mut seen_first = std::collections::BTreeSet::new();
        for seed in 0..40 {
            let ordered = order_candidates(candidates.clone(), 2, &mut create_rng(seed));
            assert_eq!(ordered.len(), 4);
            assert_eq!(ordered[3].person, "d");
            seen_first.insert(ordered[0].person.clone());
        }
        assert_eq!(seen_first.len(), 3);
    }
}
