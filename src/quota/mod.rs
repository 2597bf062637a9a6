//! Per-section quota planning.
//!
//! A section of `N` people with minimum team size `M` forms
//! `k = floor(N / M)` teams of base size `M`; the remainder `N - kM` is
//! spread according to [`RemainderPolicy`]. Target sizes always sum to `N`.

mod config;
mod planner;

pub use config::{QuotaConfig, RemainderPolicy};
pub use planner::{QuotaPlan, QuotaPlanner};
