//! In-process store.

use super::types::RankingStore;
use crate::config::FormationConfig;
use crate::error::{Error, Result};
use crate::exclusion::ExclusionIndex;
use crate::model::{Roster, SectionId, Team};
use crate::normalize::{parse_tokens, Normalized, RankingNormalizer};
use crate::quota::{QuotaConfig, RemainderPolicy};
use crate::validate::{validate_person_name, RankTable};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// What [`MemoryStore::ingest`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The normalized list was stored.
    Stored(Normalized),
    /// Existing rankings were kept because the overwrite was declined.
    Kept,
}

/// Store holding configuration, rankings and the last recorded rosters.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    teams: Vec<Team>,
    sections: BTreeMap<SectionId, Vec<String>>,
    min_team_size: usize,
    remainder: RemainderPolicy,
    exclusions: ExclusionIndex,
    rankings: RankTable,
    rosters: Vec<Roster>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            teams: Vec::new(),
            sections: BTreeMap::new(),
            min_team_size: QuotaConfig::default().min_team_size,
            remainder: RemainderPolicy::default(),
            exclusions: ExclusionIndex::new(),
            rankings: RankTable::new(),
            rosters: Vec::new(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store loaded with `config`.
    pub fn from_config(config: &FormationConfig) -> Result<Self> {
        let mut store = Self::new();
        store.load_config(config)?;
        Ok(store)
    }

    /// Replaces teams, sections, sizing and exclusions. Rankings are kept.
    pub fn load_config(&mut self, config: &FormationConfig) -> Result<()> {
        config.validate().map_err(Error::Configuration)?;
        self.exclusions = config.exclusion_index()?;
        self.teams = config.team_catalogue();
        self.sections = config.sections.clone();
        self.min_team_size = config.team.min;
        self.remainder = config.team.remainder;
        info!(
            teams = self.teams.len(),
            sections = self.sections.len(),
            exclusions = self.exclusions.len(),
            "configuration loaded"
        );
        Ok(())
    }

    /// Returns true if `person` has stored rankings.
    pub fn is_ranked(&self, person: &str) -> bool {
        self.rankings.contains_key(person)
    }

    /// Stores `ranks` for `person` as given, replacing any previous list.
    pub fn insert_rankings(&mut self, person: impl Into<String>, ranks: Vec<i64>) {
        self.rankings.insert(person.into(), ranks);
    }

    /// Removes `person`'s rankings. Returns false if there were none.
    pub fn delete_rankings(&mut self, person: &str) -> bool {
        self.rankings.remove(person).is_some()
    }

    /// Parses, normalizes and stores one person's raw rankings.
    ///
    /// When rankings already exist, `confirm` is asked whether to replace
    /// them; declining keeps the stored list untouched.
    pub fn ingest<R, F>(
        &mut self,
        person: &str,
        raw: &str,
        normalizer: &RankingNormalizer,
        rng: &mut R,
        confirm: F,
    ) -> Result<IngestOutcome>
    where
        R: Rng,
        F: FnOnce(&str) -> bool,
    {
        validate_person_name(person).map_err(Error::Ingestion)?;
        let tokens = parse_tokens(raw)?;
        let normalized = normalizer.normalize(&tokens, self.team_count(), rng)?;

        if self.is_ranked(person) && !confirm(person) {
            info!(person, "kept existing rankings");
            return Ok(IngestOutcome::Kept);
        }

        if !self.sections.values().any(|m| m.iter().any(|p| p == person)) {
            warn!(person, "ingesting rankings for a person not registered to any section");
        }
        for line in normalized.report.describe() {
            warn!(person, "{line}");
        }

        self.insert_rankings(
            person,
            normalized.ranks.iter().map(|&r| i64::from(r)).collect(),
        );
        Ok(IngestOutcome::Stored(normalized))
    }

    /// Rosters recorded by the last successful run.
    pub fn rosters(&self) -> &[Roster] {
        &self.rosters
    }
}

impl RankingStore for MemoryStore {
    fn teams(&self) -> Vec<Team> {
        self.teams.clone()
    }

    fn sections(&self) -> BTreeMap<SectionId, Vec<String>> {
        self.sections.clone()
    }

    fn min_team_size(&self) -> usize {
        self.min_team_size
    }

    fn remainder_policy(&self) -> RemainderPolicy {
        self.remainder
    }

    fn rankings(&self) -> RankTable {
        self.rankings.clone()
    }

    fn exclusions(&self) -> ExclusionIndex {
        self.exclusions.clone()
    }

    fn record_rosters(&mut self, rosters: &[Roster]) {
        self.rosters = rosters.to_vec();
    }
}
