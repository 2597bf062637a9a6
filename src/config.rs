//! Formation configuration.
//!
//! One YAML document describes the team catalogue, section rosters,
//! minimum team size, exclusions and the policy knobs of each stage:
//!
//! ```yaml
//! team:
//!   min: 2
//!   exclusions:
//!     - "alice, bob"
//!     - [carol, dave]
//! teams: [Robotics, Web]
//! sections:
//!   morning: [alice, bob, carol, dave]
//! engine:
//!   seed: 7
//! ```

use crate::engine::EngineConfig;
use crate::error::{Error, Result};
use crate::exclusion::ExclusionIndex;
use crate::model::{SectionId, Team, TeamId};
use crate::normalize::NormalizeConfig;
use crate::quota::{QuotaConfig, RemainderPolicy};
use crate::validate::validate_person_name;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// An exclusion group: a comma-separated string or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExclusionGroup {
    Csv(String),
    List(Vec<String>),
}

impl ExclusionGroup {
    /// Trimmed, non-empty names in the group.
    pub fn names(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ExclusionGroup::Csv(s) => s.split(',').collect(),
            ExclusionGroup::List(v) => v.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Team sizing and exclusion block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRules {
    /// Minimum team size.
    pub min: usize,
    /// Exclusion groups.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<ExclusionGroup>,
    /// Remainder distribution rule for the quota planner.
    pub remainder: RemainderPolicy,
}

impl Default for TeamRules {
    fn default() -> Self {
        Self {
            min: QuotaConfig::default().min_team_size,
            exclusions: Vec::new(),
            remainder: RemainderPolicy::default(),
        }
    }
}

/// Complete configuration for one formation.
///
/// # Examples
///
/// ```
/// use u_teams::config::FormationConfig;
///
/// let config = FormationConfig::default()
///     .with_teams(["Robotics", "Web"])
///     .with_section("morning", ["ann", "bo", "cy", "di"])
///     .with_min_team_size(2)
///     .with_exclusion(["ann", "bo"]);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.team_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub team: TeamRules,
    /// Team catalogue; position `i` is team id `i + 1`.
    pub teams: Vec<String>,
    /// Section id -> member names.
    pub sections: BTreeMap<SectionId, Vec<String>>,
    pub engine: EngineConfig,
    pub normalize: NormalizeConfig,
}

impl FormationConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: FormationConfig = serde_yaml::from_str(yaml)?;
        config.validate().map_err(Error::Configuration)?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Serializes back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn with_teams<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teams = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_section<I, S>(mut self, id: impl Into<SectionId>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections
            .insert(id.into(), members.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_min_team_size(mut self, min: usize) -> Self {
        self.team.min = min;
        self
    }

    pub fn with_remainder(mut self, policy: RemainderPolicy) -> Self {
        self.team.remainder = policy;
        self
    }

    pub fn with_exclusion<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.team
            .exclusions
            .push(ExclusionGroup::List(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_normalize(mut self, normalize: NormalizeConfig) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// The team catalogue with ids assigned by position.
    pub fn team_catalogue(&self) -> Vec<Team> {
        self.teams
            .iter()
            .enumerate()
            .map(|(i, name)| Team {
                id: TeamId::from_position(i),
                name: name.clone(),
            })
            .collect()
    }

    /// Quota planner settings derived from the team block.
    pub fn quota_config(&self) -> QuotaConfig {
        QuotaConfig::default()
            .with_min_team_size(self.team.min)
            .with_remainder(self.team.remainder)
    }

    /// Builds the exclusion index from the configured groups.
    pub fn exclusion_index(&self) -> Result<ExclusionIndex> {
        ExclusionIndex::from_groups(self.team.exclusions.iter().map(ExclusionGroup::names))
    }

    /// Person -> section lookup.
    pub fn section_of(&self) -> HashMap<&str, &str> {
        self.sections
            .iter()
            .flat_map(|(s, members)| members.iter().map(move |m| (m.as_str(), s.as_str())))
            .collect()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.quota_config().validate()?;

        if self.teams.is_empty() {
            return Err("at least one team must be configured".into());
        }
        let mut team_names = HashSet::new();
        for name in &self.teams {
            if name.trim().is_empty() {
                return Err("team names cannot be empty".into());
            }
            if !team_names.insert(name.as_str()) {
                return Err(format!("duplicate team name '{name}'"));
            }
        }

        if self.sections.is_empty() {
            return Err("at least one section must be configured".into());
        }
        let mut owner: HashMap<&str, &str> = HashMap::new();
        for (section, members) in &self.sections {
            if section.trim().is_empty() {
                return Err("section ids cannot be empty".into());
            }
            for person in members {
                validate_person_name(person)?;
                if let Some(previous) = owner.insert(person.as_str(), section.as_str()) {
                    return Err(format!(
                        "'{person}' is listed in both section '{previous}' and section '{section}'"
                    ));
                }
            }
        }

        let index = self.exclusion_index().map_err(|e| match e {
            Error::Configuration(msg) => msg,
            other => other.to_string(),
        })?;
        let unknown = index.unknown_people(|p| owner.contains_key(p));
        if !unknown.is_empty() {
            return Err(format!("exclusions contain unknown people: {unknown:?}"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TieBreak;
    use crate::normalize::PaddingPolicy;

    const SAMPLE: &str = r#"
team:
  min: 2
  exclusions:
    - "alice, bob"
    - [carol, dave, erin]
teams: [Robotics, Web, Data]
sections:
  morning: [alice, bob, carol]
  evening: [dave, erin, frank]
engine:
  seed: 7
  tie_break: random
normalize:
  padding: repeat_last
"#;

    #[test]
    fn test_parse_sample() {
        let config = FormationConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.team.min, 2);
        assert_eq!(config.team_count(), 3);
        assert_eq!(config.sections["evening"], vec!["dave", "erin", "frank"]);
        assert_eq!(config.engine.seed, Some(7));
        assert_eq!(config.engine.tie_break, TieBreak::Random);
        assert_eq!(config.normalize.padding, PaddingPolicy::RepeatLast);

        let index = config.exclusion_index().unwrap();
        assert!(index.are_excluded("bob", "alice"));
        assert!(index.are_excluded("erin", "carol"));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_defaults_when_blocks_omitted() {
        let config =
            FormationConfig::from_yaml_str("teams: [A]\nsections:\n  s: [x, y, z, w]\n").unwrap();
        assert_eq!(config.team.min, 4);
        assert!(config.team.exclusions.is_empty());
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.team.remainder, RemainderPolicy::FrontLoaded);
    }

    #[test]
    fn test_catalogue_ids_follow_position() {
        let config = FormationConfig::from_yaml_str(SAMPLE).unwrap();
        let catalogue = config.team_catalogue();
        assert_eq!(catalogue[0].id, TeamId(1));
        assert_eq!(catalogue[2].name, "Data");
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = FormationConfig::from_yaml_str(SAMPLE).unwrap();
        let again = FormationConfig::from_yaml_str(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_unknown_excluded_person_rejected() {
        let yaml = "team:\n  min: 1\n  exclusions: [\"alice, ghost\"]\nteams: [A]\nsections:\n  s: [alice]\n";
        let err = FormationConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("ghost")), "{err}");
    }

    #[test]
    fn test_person_in_two_sections_rejected() {
        let config = FormationConfig::default()
            .with_teams(["A"])
            .with_section("s1", ["ann"])
            .with_section("s2", ["ann"]);
        assert!(config.validate().unwrap_err().contains("both section"));
    }

    #[test]
    fn test_structural_errors() {
        assert!(FormationConfig::default().validate().is_err());
        let no_sections = FormationConfig::default().with_teams(["A"]);
        assert!(no_sections.validate().is_err());
        let dup_teams = FormationConfig::default()
            .with_teams(["A", "A"])
            .with_section("s", ["x"]);
        assert!(dup_teams.validate().unwrap_err().contains("duplicate team"));
        let zero_min = FormationConfig::default()
            .with_teams(["A"])
            .with_section("s", ["x"])
            .with_min_team_size(0);
        assert!(zero_min.validate().is_err());
        let blank = FormationConfig::default()
            .with_teams(["A"])
            .with_section("s", ["  "]);
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_malformed_yaml_is_configuration_error() {
        assert!(matches!(
            FormationConfig::from_yaml_str("teams: {not: [a list"),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            FormationConfig::from_yaml_str("team:\n  exclusions: [[solo]]\nteams: [A]\nsections:\n  s: [solo]\n"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_exclusion_group_names() {
        assert_eq!(
            ExclusionGroup::Csv(" a ,b,, c".into()).names(),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            ExclusionGroup::List(vec!["x".into(), " y".into()]).names(),
            vec!["x", "y"]
        );
    }
}
