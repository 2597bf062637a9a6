//! Stored-ranking audit.

use crate::model::SectionId;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// Stored rankings: person -> ranks by position (index `i` ranks team `i + 1`).
pub type RankTable = BTreeMap<String, Vec<i64>>;

/// A validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationCategory {
    /// Registered to a section but absent from the rankings.
    MissingPeople,
    /// Submitted rank count differs from the team count.
    IncompleteRankings,
    /// A rank outside `1..=T`.
    InvalidRanks,
    /// A rank value used more than once by one person.
    DuplicateRanks,
    /// A value in `1..=T` never used by a person.
    MissingRanks,
    /// Ranked but not registered to any section.
    UnregisteredPeople,
}

impl ValidationCategory {
    pub const ALL: [ValidationCategory; 6] = [
        ValidationCategory::MissingPeople,
        ValidationCategory::IncompleteRankings,
        ValidationCategory::InvalidRanks,
        ValidationCategory::DuplicateRanks,
        ValidationCategory::MissingRanks,
        ValidationCategory::UnregisteredPeople,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCategory::MissingPeople => "missing_people",
            ValidationCategory::IncompleteRankings => "incomplete_rankings",
            ValidationCategory::InvalidRanks => "invalid_ranks",
            ValidationCategory::DuplicateRanks => "duplicate_ranks",
            ValidationCategory::MissingRanks => "missing_ranks",
            ValidationCategory::UnregisteredPeople => "unregistered_people",
        }
    }
}

impl fmt::Display for ValidationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostics grouped by category. Every category is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    problems: BTreeMap<ValidationCategory, Vec<String>>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            problems: ValidationCategory::ALL
                .iter()
                .map(|&c| (c, Vec::new()))
                .collect(),
        }
    }
}

impl ValidationReport {
    /// Returns true when no category has a diagnostic.
    pub fn is_valid(&self) -> bool {
        self.problems.values().all(Vec::is_empty)
    }

    /// Total number of diagnostics across categories.
    pub fn problem_count(&self) -> usize {
        self.problems.values().map(Vec::len).sum()
    }

    /// Diagnostics for one category.
    pub fn get(&self, category: ValidationCategory) -> &[String] {
        self.problems
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates over `(category, messages)` in category order.
    pub fn iter(&self) -> impl Iterator<Item = (ValidationCategory, &[String])> {
        self.problems.iter().map(|(c, m)| (*c, m.as_slice()))
    }

    /// Category names mapped to their messages.
    pub fn to_map(&self) -> BTreeMap<&'static str, Vec<String>> {
        self.problems
            .iter()
            .map(|(c, m)| (c.as_str(), m.clone()))
            .collect()
    }

    fn push(&mut self, category: ValidationCategory, message: String) {
        self.problems.entry(category).or_default().push(message);
    }
}

/// Audits `rankings` against `team_count` teams and the section rosters.
///
/// With no teams configured only the membership checks run.
pub fn validate_rankings(
    rankings: &RankTable,
    team_count: usize,
    sections: &BTreeMap<SectionId, Vec<String>>,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut registered: HashSet<&str> = HashSet::new();
    for (section, members) in sections {
        for person in members {
            registered.insert(person.as_str());
            if !rankings.contains_key(person) {
                report.push(
                    ValidationCategory::MissingPeople,
                    format!("{person}: registered to section '{section}' but has no rankings"),
                );
            }
        }
    }

    for person in rankings.keys() {
        if !registered.contains(person.as_str()) {
            report.push(
                ValidationCategory::UnregisteredPeople,
                format!("{person}: has rankings but is not registered to any section"),
            );
        }
    }

    if team_count == 0 {
        return report;
    }
    let upper = team_count as i64;

    for (person, ranks) in rankings {
        if ranks.len() != team_count {
            report.push(
                ValidationCategory::IncompleteRankings,
                format!(
                    "{person}: has {} rankings, expected {team_count}",
                    ranks.len()
                ),
            );
        }

        let invalid: Vec<i64> = ranks
            .iter()
            .copied()
            .filter(|r| !(1..=upper).contains(r))
            .collect();
        if !invalid.is_empty() {
            report.push(
                ValidationCategory::InvalidRanks,
                format!("{person}: invalid ranks {invalid:?} (valid range: 1-{team_count})"),
            );
        }

        let mut seen = BTreeSet::new();
        let duplicates: BTreeSet<i64> = ranks.iter().copied().filter(|r| !seen.insert(*r)).collect();
        if !duplicates.is_empty() {
            let duplicates: Vec<i64> = duplicates.into_iter().collect();
            report.push(
                ValidationCategory::DuplicateRanks,
                format!("{person}: duplicate ranks {duplicates:?}"),
            );
        }

        let missing: Vec<i64> = (1..=upper).filter(|r| !seen.contains(r)).collect();
        if !missing.is_empty() {
            report.push(
                ValidationCategory::MissingRanks,
                format!("{person}: missing ranks {missing:?}"),
            );
        }
    }

    report
}
