//! Exclusion-aware greedy assignment.
//!
//! Repeatedly targets the team that is currently the first choice of the
//! most unplaced people, fills it from those people in rank order while
//! honoring exclusions, and closes it. Each run owns a fresh [`LiveView`]
//! materialized from stored data; nothing carries over between runs.
//!
//! Randomness (equal-rank shuffles, optional target tie-breaking) comes
//! from an injected generator, so a fixed seed reproduces a run exactly.
//! A deadlocked run is not retried internally; re-running with a
//! different seed is the caller's remedy.

mod config;
mod live;
mod runner;

pub use config::{EngineConfig, TieBreak};
pub use live::{Candidate, LiveView, TopChoice};
pub use runner::{Assignment, AssignmentEngine, Outcome};
