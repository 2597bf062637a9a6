//! Ranking normalization.
//!
//! Turns a raw, possibly malformed rank list into an exact permutation of
//! `1..=T` before it is stored:
//!
//! - **Truncation**: lists longer than `T` keep their first `T` tokens.
//! - **Padding**: short lists are extended per [`PaddingPolicy`].
//! - **Repair**: out-of-range and repeated values are replaced, left to
//!   right, by values drawn uniformly from the ranks not yet used.
//!
//! Every action taken is recorded in a [`NormalizationReport`].

mod config;
mod normalizer;

pub use config::{NormalizeConfig, PaddingPolicy};
pub use normalizer::{parse_tokens, Normalized, NormalizationReport, RankingNormalizer, Repair};
