//! Live candidate view for one run.
//!
//! Holds the people not yet finalized and, per section, the teams not yet
//! closed. Closing a team for a section removes it from the candidate set
//! of every remaining person in that section; finalizing a person removes
//! them from the view entirely.

use crate::error::{Error, Result};
use crate::exclusion::ExclusionIndex;
use crate::model::{SectionId, TeamId};
use crate::validate::{validate_rankings, RankTable};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// A person's current best remaining team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopChoice {
    pub person: String,
    pub section: SectionId,
    pub team: TeamId,
    pub rank: u32,
}

/// A person considered for a target team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub person: String,
    /// Rank the person gave the target team.
    pub rank: u32,
    /// Whether the target team is the person's current top choice.
    pub first_choice: bool,
}

#[derive(Debug, Clone)]
struct ActivePerson {
    section: SectionId,
    /// Rank by team position.
    ranks: Vec<u32>,
}

impl ActivePerson {
    fn rank_of(&self, team: TeamId) -> u32 {
        self.ranks[team.position()]
    }
}

/// Working state of one assignment run.
#[derive(Debug, Clone)]
pub struct LiveView {
    people: BTreeMap<String, ActivePerson>,
    open: BTreeMap<SectionId, BTreeSet<TeamId>>,
    exclusions: ExclusionIndex,
}

impl LiveView {
    /// Materializes a fresh view from stored data.
    ///
    /// Fails with [`Error::Validation`] unless the rankings pass every
    /// validation check.
    pub fn materialize(
        rankings: &RankTable,
        sections: &BTreeMap<SectionId, Vec<String>>,
        team_count: usize,
        exclusions: ExclusionIndex,
    ) -> Result<Self> {
        let report = validate_rankings(rankings, team_count, sections);
        if !report.is_valid() {
            return Err(Error::Validation(report));
        }
        if team_count == 0 {
            return Err(Error::Configuration("no teams are configured".into()));
        }

        let all_teams: BTreeSet<TeamId> = (0..team_count).map(TeamId::from_position).collect();
        let mut people = BTreeMap::new();
        let mut open = BTreeMap::new();
        for (section, members) in sections {
            open.insert(section.clone(), all_teams.clone());
            for person in members {
                let ranks = rankings[person].iter().map(|&r| r as u32).collect();
                people.insert(
                    person.clone(),
                    ActivePerson {
                        section: section.clone(),
                        ranks,
                    },
                );
            }
        }

        Ok(Self {
            people,
            open,
            exclusions,
        })
    }

    /// Each active person's lowest-ranked open team, ordered by person.
    ///
    /// People whose section has no open team are left out.
    pub fn active_top_choices(&self) -> Vec<TopChoice> {
        self.people
            .iter()
            .filter_map(|(name, p)| {
                let open = self.open.get(&p.section)?;
                open.iter()
                    .map(|&team| (p.rank_of(team), team))
                    .min()
                    .map(|(rank, team)| TopChoice {
                        person: name.clone(),
                        section: p.section.clone(),
                        team,
                        rank,
                    })
            })
            .collect()
    }

    /// Active people of `section` with their rank for `team`.
    ///
    /// People whose top choice is `team` come first, each group ascending
    /// by rank and then by name. Empty if the team is closed for the section.
    pub fn target_team_candidates(&self, section: &str, team: TeamId) -> Vec<Candidate> {
        if !self.is_open(section, team) {
            return Vec::new();
        }
        let top: BTreeMap<String, TeamId> = self
            .active_top_choices()
            .into_iter()
            .filter(|c| c.section == section)
            .map(|c| (c.person, c.team))
            .collect();

        let mut candidates: Vec<Candidate> = self
            .people
            .iter()
            .filter(|(_, p)| p.section == section)
            .map(|(name, p)| Candidate {
                person: name.clone(),
                rank: p.rank_of(team),
                first_choice: top.get(name) == Some(&team),
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.first_choice
                .cmp(&a.first_choice)
                .then(a.rank.cmp(&b.rank))
                .then_with(|| a.person.cmp(&b.person))
        });
        candidates
    }

    /// Returns true if `person` is excluded with any member of `roster`.
    pub fn is_excluded(&self, person: &str, roster: &[String]) -> bool {
        self.exclusions
            .is_excluded(person, roster.iter().map(String::as_str))
    }

    /// Closes `team` for `section` and finalizes every roster member.
    pub fn finalize_team(&mut self, section: &str, team: TeamId, roster: &[String]) {
        if let Some(open) = self.open.get_mut(section) {
            open.remove(&team);
        }
        for person in roster {
            self.finalize_person(person);
        }
        trace!(section, %team, members = roster.len(), "team closed");
    }

    /// Removes `person` from the view. Returns false if they were not active.
    pub fn finalize_person(&mut self, person: &str) -> bool {
        self.people.remove(person).is_some()
    }

    pub fn is_active(&self, person: &str) -> bool {
        self.people.contains_key(person)
    }

    pub fn is_open(&self, section: &str, team: TeamId) -> bool {
        self.open.get(section).is_some_and(|o| o.contains(&team))
    }

    /// Open teams of `section`, ascending by id.
    pub fn open_teams(&self, section: &str) -> Vec<TeamId> {
        self.open
            .get(section)
            .map(|o| o.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn active_count(&self) -> usize {
        self.people.len()
    }

    /// Names of people not yet finalized, sorted.
    pub fn unplaced(&self) -> Vec<String> {
        self.people.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four people in one section ranking two teams.
    fn view(exclusions: ExclusionIndex) -> LiveView {
        let rankings: RankTable = [
            ("ann", vec![1, 2]),
            ("bo", vec![1, 2]),
            ("cy", vec![2, 1]),
            ("di", vec![2, 1]),
        ]
        .into_iter()
        .map(|(p, r)| (p.to_string(), r))
        .collect();
        let sections: BTreeMap<SectionId, Vec<String>> = [(
            "s".to_string(),
            vec!["ann".into(), "bo".into(), "cy".into(), "di".into()],
        )]
        .into_iter()
        .collect();
        LiveView::materialize(&rankings, &sections, 2, exclusions).unwrap()
    }

    #[test]
    fn test_top_choices() {
        let v = view(ExclusionIndex::new());
        let top = v.active_top_choices();
        assert_eq!(top.len(), 4);
        assert_eq!(top[0].person, "ann");
        assert_eq!(top[0].team, TeamId(1));
        assert_eq!(top[2].team, TeamId(2));
        assert!(top.iter().all(|c| c.rank == 1));
    }

    #[test]
    fn test_candidates_first_choice_then_rank() {
        let v = view(ExclusionIndex::new());
        let c = v.target_team_candidates("s", TeamId(1));
        let names: Vec<&str> = c.iter().map(|c| c.person.as_str()).collect();
        assert_eq!(names, vec!["ann", "bo", "cy", "di"]);
        assert!(c[0].first_choice && c[1].first_choice);
        assert!(!c[2].first_choice);
        assert_eq!(c[2].rank, 2);
        assert!(v.target_team_candidates("other", TeamId(1)).is_empty());
    }

    #[test]
    fn test_finalize_team_purges_team_and_members() {
        let mut v = view(ExclusionIndex::new());
        v.finalize_team("s", TeamId(1), &["ann".to_string(), "bo".to_string()]);

        let top = v.active_top_choices();
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|c| c.team != TeamId(1)));
        assert!(top.iter().all(|c| c.person != "ann" && c.person != "bo"));
        assert!(!v.is_open("s", TeamId(1)));
        assert!(v.target_team_candidates("s", TeamId(1)).is_empty());
        assert_eq!(v.open_teams("s"), vec![TeamId(2)]);
        assert_eq!(v.unplaced(), vec!["cy".to_string(), "di".to_string()]);
    }

    #[test]
    fn test_closing_top_choice_promotes_next_rank() {
        let mut v = view(ExclusionIndex::new());
        v.finalize_team("s", TeamId(2), &["cy".to_string()]);
        let top = v.active_top_choices();
        let di = top.iter().find(|c| c.person == "di").unwrap();
        assert_eq!(di.team, TeamId(1));
        assert_eq!(di.rank, 2);
    }

    #[test]
    fn test_is_excluded_against_roster() {
        let v = view(ExclusionIndex::from_pairs([("ann", "cy")]).unwrap());
        assert!(v.is_excluded("cy", &["bo".to_string(), "ann".to_string()]));
        assert!(!v.is_excluded("di", &["ann".to_string()]));
    }

    #[test]
    fn test_finalize_person() {
        let mut v = view(ExclusionIndex::new());
        assert!(v.finalize_person("ann"));
        assert!(!v.finalize_person("ann"));
        assert!(!v.is_active("ann"));
        assert_eq!(v.active_count(), 3);
    }

    #[test]
    fn test_invalid_rankings_refused() {
        let rankings: RankTable = [("ann".to_string(), vec![1, 1])].into_iter().collect();
        let sections: BTreeMap<SectionId, Vec<String>> =
            [("s".to_string(), vec!["ann".to_string()])].into_iter().collect();
        let err = LiveView::materialize(&rankings, &sections, 2, ExclusionIndex::new()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
