//! Ranking storage.
//!
//! [`RankingStore`] is the seam between the assignment core and whatever
//! persists people, teams, sections, rankings and exclusions.
//! [`MemoryStore`] keeps everything in process and adds ingestion with
//! normalization and overwrite confirmation.

mod memory;
mod types;

pub use memory::{IngestOutcome, MemoryStore};
pub use types::RankingStore;
