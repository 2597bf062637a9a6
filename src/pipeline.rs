//! Validate, plan and assign in one call.

use crate::engine::{Assignment, AssignmentEngine, EngineConfig, LiveView};
use crate::error::{Error, Result};
use crate::quota::{QuotaConfig, QuotaPlanner};
use crate::random::rng_from_option;
use crate::store::RankingStore;
use rand::Rng;
use tracing::{info, warn};

/// Runs a full assignment against `store`.
///
/// Validation, configuration and quota problems abort before any team is
/// formed. A complete run's rosters are recorded in the store; deadlocked
/// or incomplete runs record nothing.
pub fn assign<S: RankingStore>(store: &mut S, config: &EngineConfig) -> Result<Assignment> {
    let mut rng = rng_from_option(config.seed);
    assign_with_rng(store, config, &mut rng)
}

/// [`assign`] with an injected random source.
pub fn assign_with_rng<S, R>(store: &mut S, config: &EngineConfig, rng: &mut R) -> Result<Assignment>
where
    S: RankingStore,
    R: Rng,
{
    let report = store.run_validation();
    if !report.is_valid() {
        for (category, messages) in report.iter() {
            for message in messages {
                warn!(%category, "{message}");
            }
        }
        return Err(Error::Validation(report));
    }

    let planner = QuotaPlanner::new(
        QuotaConfig::default()
            .with_min_team_size(store.min_team_size())
            .with_remainder(store.remainder_policy()),
    );
    let team_count = store.team_count();
    let plan = planner.plan_sections(&store.section_populations(), team_count)?;
    info!(sections = plan.iter().count(), teams = plan.team_total(), "quota plan ready");

    let view = LiveView::materialize(
        &store.rankings(),
        &store.sections(),
        team_count,
        store.exclusions(),
    )?;
    let assignment = AssignmentEngine::new(config.clone()).run_with_rng(view, &plan, rng)?;

    if assignment.is_complete() {
        store.record_rosters(&assignment.rosters);
    }
    Ok(assignment)
}
