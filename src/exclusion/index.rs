//! Exclusion index.

use crate::error::{Error, Result};
use std::collections::{BTreeSet, HashMap};

/// Symmetric, irreflexive set of forbidden person pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionIndex {
    partners: HashMap<String, BTreeSet<String>>,
}

impl ExclusionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from explicit pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut index = Self::new();
        for (a, b) in pairs {
            index.insert(a, b)?;
        }
        Ok(index)
    }

    /// Builds an index from groups; every two members of a group are excluded.
    ///
    /// Each group must name at least two distinct people.
    pub fn from_groups<G, S>(groups: G) -> Result<Self>
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for group in groups {
            index.insert_group(group)?;
        }
        Ok(index)
    }

    /// Adds one exclusion pair.
    pub fn insert(&mut self, a: impl Into<String>, b: impl Into<String>) -> Result<()> {
        let (a, b) = (a.into(), b.into());
        if a == b {
            return Err(Error::Configuration(format!(
                "'{a}' cannot be excluded from themselves"
            )));
        }
        self.partners.entry(a.clone()).or_default().insert(b.clone());
        self.partners.entry(b).or_default().insert(a);
        Ok(())
    }

    /// Adds every pair within `group`.
    pub fn insert_group<I, S>(&mut self, group: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members: BTreeSet<String> = group
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if members.len() < 2 {
            return Err(Error::Configuration(
                "each exclusion group must contain at least 2 people".into(),
            ));
        }
        let members: Vec<String> = members.into_iter().collect();
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                self.insert(a.as_str(), b.as_str())?;
            }
        }
        Ok(())
    }

    /// Returns true if `a` and `b` may not share a team.
    pub fn are_excluded(&self, a: &str, b: &str) -> bool {
        self.partners.get(a).is_some_and(|p| p.contains(b))
    }

    /// Returns true if `person` is excluded with any member of `roster`.
    pub fn is_excluded<'a, I>(&self, person: &str, roster: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self.partners.get(person) {
            Some(partners) => roster.into_iter().any(|m| partners.contains(m)),
            None => false,
        }
    }

    /// Members of `roster` that `person` is excluded with.
    pub fn conflicts<'a, I>(&self, person: &str, roster: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        roster
            .into_iter()
            .filter(|m| self.are_excluded(person, m))
            .collect()
    }

    /// Every pair once, each ordered `(smaller, larger)`, sorted.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .partners
            .iter()
            .flat_map(|(a, ps)| {
                ps.iter()
                    .filter(move |b| a < *b)
                    .map(move |b| (a.clone(), b.clone()))
            })
            .collect();
        pairs.sort();
        pairs
    }

    /// Names mentioned in an exclusion that are not in `known`, sorted.
    pub fn unknown_people<F>(&self, known: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut unknown: Vec<String> = self
            .partners
            .keys()
            .filter(|p| !known(p.as_str()))
            .cloned()
            .collect();
        unknown.sort();
        unknown
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.partners.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}
