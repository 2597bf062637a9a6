//! Preference-driven team formation.
//!
//! Allocates a fixed population into fixed-size teams per section,
//! honoring each person's ranked preferences over teams and hard pairwise
//! exclusions:
//!
//! - **Normalization**: repairs raw rank lists into permutations before
//!   they are stored.
//! - **Validation**: audits stored rankings for completeness; a failing
//!   report blocks every run.
//! - **Quota planning**: splits each section into teams of at least the
//!   minimum size, with sizes summing to the section population.
//! - **Exclusions**: symmetric lookup of people who may never share a team.
//! - **Assignment**: greedy, popularity-driven formation with seedable
//!   tie-breaking and deadlock detection.
//!
//! # Architecture
//!
//! Storage sits behind the [`store::RankingStore`] trait. Each run
//! materializes a fresh [`engine::LiveView`] from it, so working state is
//! owned by exactly one run. Command-line handling and output formatting
//! are left to consumers.

pub mod config;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod model;
pub mod normalize;
pub mod quota;
pub mod random;
pub mod store;
pub mod summary;
pub mod validate;

mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{assign, assign_with_rng};
