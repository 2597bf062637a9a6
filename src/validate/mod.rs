//! Ranking validation.
//!
//! Audits stored rankings against the team count and the section rosters.
//! Every category is computed independently so one run reports every
//! problem at once; the assignment engine refuses to run until the report
//! is empty.
//!
//! Also holds the person-name checks applied when configuration is loaded.

mod names;
mod validator;

pub use names::{validate_person_name, MAX_NAME_LEN};
pub use validator::{validate_rankings, RankTable, ValidationCategory, ValidationReport};
