//! Target-size computation.

use super::config::{QuotaConfig, RemainderPolicy};
use crate::error::{Error, Result};
use crate::model::SectionId;
use std::collections::BTreeMap;
use tracing::debug;

/// Ordered per-team target sizes for every section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaPlan {
    sections: BTreeMap<SectionId, Vec<usize>>,
}

impl QuotaPlan {
    /// Target sizes for `section` in formation order.
    pub fn sizes(&self, section: &str) -> Option<&[usize]> {
        self.sections.get(section).map(Vec::as_slice)
    }

    /// Iterates over `(section, sizes)` ordered by section id.
    pub fn iter(&self) -> impl Iterator<Item = (&SectionId, &[usize])> {
        self.sections.iter().map(|(s, v)| (s, v.as_slice()))
    }

    /// Number of teams planned across all sections.
    pub fn team_total(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Converts section populations into team target sizes.
#[derive(Debug, Clone, Default)]
pub struct QuotaPlanner {
    config: QuotaConfig,
}

impl QuotaPlanner {
    pub fn new(config: QuotaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuotaConfig {
        &self.config
    }

    /// Target sizes for one section of `population` people.
    pub fn plan(&self, section: &str, population: usize) -> Result<Vec<usize>> {
        self.config.validate().map_err(Error::Configuration)?;

        let min = self.config.min_team_size;
        let infeasible = |reason: String| Error::InfeasibleQuota {
            section: section.to_string(),
            population,
            min_team_size: min,
            reason,
        };

        let k = population / min;
        if k == 0 {
            return Err(infeasible("population is below the minimum team size".into()));
        }

        let remainder = population - k * min;
        let mut sizes = vec![min; k];
        match self.config.remainder {
            RemainderPolicy::FrontLoaded => {
                if remainder > k {
                    return Err(infeasible(format!(
                        "remainder {remainder} exceeds the {k} team(s) it must be spread over"
                    )));
                }
                for size in sizes.iter_mut().take(remainder) {
                    *size += 1;
                }
            }
            RemainderPolicy::RoundRobin => {
                for i in 0..remainder {
                    sizes[i % k] += 1;
                }
            }
        }

        debug!(section, population, teams = k, remainder, "planned quotas");
        Ok(sizes)
    }

    /// Plans every section, checking each fits within `team_count` teams.
    pub fn plan_sections(
        &self,
        populations: &BTreeMap<SectionId, usize>,
        team_count: usize,
    ) -> Result<QuotaPlan> {
        let mut sections = BTreeMap::new();
        for (section, &population) in populations {
            let sizes = self.plan(section, population)?;
            if sizes.len() > team_count {
                return Err(Error::InfeasibleQuota {
                    section: section.clone(),
                    population,
                    min_team_size: self.config.min_team_size,
                    reason: format!(
                        "needs {} teams but only {team_count} are configured",
                        sizes.len()
                    ),
                });
            }
            sections.insert(section.clone(), sizes);
        }
        Ok(QuotaPlan { sections })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn planner(min: usize) -> QuotaPlanner {
        QuotaPlanner::new(QuotaConfig::default().with_min_team_size(min))
    }

    #[test]
    fn test_ten_people_min_four() {
        assert_eq!(planner(4).plan("s", 10).unwrap(), vec![5, 5]);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(planner(3).plan("s", 9).unwrap(), vec![3, 3, 3]);
    }

    #[test]
    fn test_partial_remainder_front_loaded() {
        assert_eq!(planner(4).plan("s", 13).unwrap(), vec![5, 4, 4]);
    }

    #[test]
    fn test_below_minimum_is_infeasible() {
        let err = planner(4).plan("s", 3).unwrap_err();
        assert!(matches!(err, Error::InfeasibleQuota { population: 3, .. }));
    }

    #[test]
    fn test_remainder_exceeding_teams_is_infeasible() {
        // k = 1, r = 2
        let err = planner(3).plan("s", 5).unwrap_err();
        assert!(matches!(err, Error::InfeasibleQuota { .. }));
    }

    #[test]
    fn test_round_robin_absorbs_large_remainder() {
        let p = QuotaPlanner::new(
            QuotaConfig::default()
                .with_min_team_size(3)
                .with_remainder(RemainderPolicy::RoundRobin),
        );
        assert_eq!(p.plan("s", 5).unwrap(), vec![5]);
        assert_eq!(p.plan("s", 11).unwrap(), vec![4, 4, 3]);
    }

    #[test]
    fn test_zero_min_is_configuration_error() {
        assert!(matches!(
            planner(0).plan("s", 4),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_plan_sections() {
        let populations: BTreeMap<SectionId, usize> =
            [("a".to_string(), 4), ("b".to_string(), 6)].into_iter().collect();
        let plan = planner(2).plan_sections(&populations, 3).unwrap();
        assert_eq!(plan.sizes("a"), Some(&[2, 2][..]));
        assert_eq!(plan.sizes("b"), Some(&[2, 2, 2][..]));
        assert_eq!(plan.team_total(), 5);
    }

    #[test]
    fn test_plan_sections_needs_more_teams_than_catalogue() {
        let populations: BTreeMap<SectionId, usize> = [("a".to_string(), 6)].into_iter().collect();
        let err = planner(2).plan_sections(&populations, 2).unwrap_err();
        assert!(matches!(err, Error::InfeasibleQuota { ref section, .. } if section == "a"));
    }

    proptest! {
        #[test]
        fn prop_sizes_sum_to_population(min in 1usize..8, population in 1usize..200) {
            let p = QuotaPlanner::new(
                QuotaConfig::default()
                    .with_min_team_size(min)
                    .with_remainder(RemainderPolicy::RoundRobin),
            );
            if let Ok(sizes) = p.plan("s", population) {
                prop_assert_eq!(sizes.iter().sum::<usize>(), population);
                prop_assert!(sizes.iter().all(|&s| s >= min));
            } else {
                prop_assert!(population < min);
            }
        }

        #[test]
        fn prop_front_loaded_sizes_differ_by_at_most_one(min in 1usize..8, population in 1usize..200) {
            if let Ok(sizes) = planner(min).plan("s", population) {
                prop_assert_eq!(sizes.iter().sum::<usize>(), population);
                let max = *sizes.iter().max().unwrap();
                prop_assert!(max - min <= 1);
            }
        }
    }
}
