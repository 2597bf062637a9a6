//! Error taxonomy.
//!
//! Validation, configuration and quota failures are raised before any
//! assignment step runs. [`Error::ExclusionDeadlock`] is the only failure
//! that can happen mid-run, and it carries every roster finalized before
//! the engine stopped.

use crate::model::{Roster, SectionId, TeamId};
use crate::validate::ValidationReport;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// State captured when every remaining candidate for a target team is
/// blocked by an exclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadlock {
    /// Section whose team could not be filled.
    pub section: SectionId,
    /// The target team.
    pub team: TeamId,
    /// Quota the roster needed to reach.
    pub target_size: usize,
    /// Members tentatively placed before the walk stalled.
    pub placed: Vec<String>,
    /// Candidates skipped because of an exclusion.
    pub blocked: Vec<String>,
    /// Rosters finalized before the deadlock, in formation order.
    pub partial: Vec<Roster>,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or empty raw ranking source.
    #[error("ingestion failed: {0}")]
    Ingestion(String),

    /// Stored rankings failed one or more validation checks.
    #[error("rankings failed validation ({} problem(s))", .0.problem_count())]
    Validation(ValidationReport),

    /// Malformed or incomplete section, team or exclusion configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A section cannot be split into teams of the minimum size.
    #[error("infeasible quota for section '{section}' ({population} people, minimum team size {min_team_size}): {reason}")]
    InfeasibleQuota {
        section: SectionId,
        population: usize,
        min_team_size: usize,
        reason: String,
    },

    /// Every remaining candidate for the current target team is blocked.
    #[error(
        "exclusion deadlock filling team {} in section '{}' ({} of {} placed, {} blocked, {} team(s) finalized)",
        .0.team, .0.section, .0.placed.len(), .0.target_size, .0.blocked.len(), .0.partial.len()
    )]
    ExclusionDeadlock(Box<Deadlock>),
}

impl Error {
    /// Process exit status an operator front-end should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ExclusionDeadlock(_) => 2,
            _ => 1,
        }
    }

    /// Rosters finalized before the failure, if any were produced.
    pub fn partial_rosters(&self) -> &[Roster] {
        match self {
            Error::ExclusionDeadlock(d) => &d.partial,
            _ => &[],
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Configuration(err.to_string())
    }
}
