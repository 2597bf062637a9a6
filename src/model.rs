//! Shared domain types.
//!
//! People and sections are identified by name. Teams are identified by a
//! dense 1-based [`TeamId`]; the position of a rank in a submitted list is
//! the team it refers to (position 0 ranks team 1).

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based team identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl TeamId {
    /// Team referenced by the rank at `position` of a submitted list.
    pub fn from_position(position: usize) -> Self {
        TeamId(position as u32 + 1)
    }

    /// Zero-based position of this team in a submitted list.
    pub fn position(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Section identifier.
pub type SectionId = String;

/// A destination team in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

/// A person placed on a roster together with the rank they gave the team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub rank: u32,
}

/// A finalized team for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub section: SectionId,
    pub team: TeamId,
    pub members: Vec<Member>,
}

impl Roster {
    /// Member names in roster order.
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }
}
