//! Symmetric exclusion lookup.
//!
//! Exclusions are configured as pairs or groups (every two people in a
//! group are excluded from each other). The index stores the symmetric
//! closure so `is_excluded(a, [b])` and `is_excluded(b, [a])` agree.

mod index;

pub use index::ExclusionIndex;
