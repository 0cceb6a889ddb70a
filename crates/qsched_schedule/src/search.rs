//! Randomized restart search
//!
//! Gantree: L4_Scheduling → SearchDriver
//!
//! Trial `k` shuffles the tie-break order with `StdRng::seed_from_u64(base + k)`,
//! so results depend only on the base seed, never on thread scheduling.
//! Trials may run on the rayon pool; results are collected in trial order
//! and reduced sequentially.

use crate::config::SchedulerConfig;
use crate::list_scheduler::{ListScheduler, TieBreak};
use crate::schedule::Schedule;
use qsched_core::{SchedError, SchedResult, Time};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Best schedule found by a search
/// Gantree: SearchOutcome // 탐색 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Winning schedule
    pub schedule: Schedule,

    /// Index of the winning trial
    pub best_trial: usize,

    /// Number of trials run
    pub trials_run: usize,

    /// Makespan of every trial, in trial order
    pub makespans: Vec<Time>,

    /// Base seed of the shuffled trials
    pub base_seed: Option<u64>,
}

impl SearchOutcome {
    /// Makespan of the winning schedule
    pub fn makespan(&self) -> Time {
        self.schedule.makespan()
    }

    /// Worst makespan seen across trials
    pub fn worst_makespan(&self) -> Time {
        self.makespans.iter().copied().fold(0.0, f64::max)
    }

    /// How much the winner improves on the first trial
    pub fn improvement_over_first(&self) -> Time {
        self.makespans
            .first()
            .map_or(0.0, |first| first - self.makespan())
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchOutcome(makespan={}, best_trial={}/{})",
            self.makespan(),
            self.best_trial,
            self.trials_run
        )
    }
}

/// Runs a list scheduler repeatedly and keeps the shortest schedule
/// Gantree: SearchDriver // 무작위 재시작
#[derive(Debug, Clone)]
pub struct SearchDriver {
    config: SchedulerConfig,
}

impl SearchDriver {
    /// Create a driver for a configuration
    pub fn new(config: SchedulerConfig) -> SchedResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run all trials
    /// Gantree: run(ListScheduler) -> Result<SearchOutcome> // 탐색 실행
    ///
    /// The first error in trial order is returned as-is. On equal makespans
    /// the lower trial index wins.
    pub fn run(&self, scheduler: &ListScheduler<'_>) -> SchedResult<SearchOutcome> {
        let mode = self.config.mode;
        let n = scheduler.num_ops();

        if !self.config.is_randomized() {
            let schedule = scheduler.run(mode, &TieBreak::identity(n))?;
            return Ok(SearchOutcome {
                makespans: vec![schedule.makespan()],
                schedule,
                best_trial: 0,
                trials_run: 1,
                base_seed: None,
            });
        }

        let trials = self.config.effective_trials();
        let base_seed = self
            .config
            .seed
            .unwrap_or_else(|| StdRng::from_entropy().gen());

        let run_trial = |trial: usize| -> SchedResult<Schedule> {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(trial as u64));
            let tie_break = TieBreak::shuffled(n, &mut rng);
            let schedule = scheduler.run(mode, &tie_break)?;
            log::trace!("trial {}: makespan {}", trial, schedule.makespan());
            Ok(schedule)
        };

        let results: Vec<SchedResult<Schedule>> = if self.config.parallel {
            (0..trials).into_par_iter().map(run_trial).collect()
        } else {
            (0..trials).map(run_trial).collect()
        };

        let mut makespans = Vec::with_capacity(trials);
        let mut best: Option<(usize, Schedule)> = None;
        for (trial, result) in results.into_iter().enumerate() {
            let schedule = result?;
            makespans.push(schedule.makespan());
            let improves = best
                .as_ref()
                .map_or(true, |(_, b)| schedule.makespan() < b.makespan());
            if improves {
                best = Some((trial, schedule));
            }
        }

        let (best_trial, schedule) = best
            .ok_or_else(|| SchedError::InternalError("search ran no trials".to_string()))?;

        let outcome = SearchOutcome {
            schedule,
            best_trial,
            trials_run: trials,
            makespans,
            base_seed: Some(base_seed),
        };
        if outcome.improvement_over_first() > 0.0 {
            log::info!(
                "randomized search improved makespan {} -> {} (trial {} of {})",
                outcome.makespans[0],
                outcome.makespan(),
                best_trial,
                trials
            );
        }
        Ok(outcome)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulingMode;
    use crate::dag::DependencyGraph;
    use qsched_core::{CommutationTable, DurationTable, InstructionBuilder, Operation};

    fn fanout() -> Vec<Operation> {
        InstructionBuilder::new(3)
            .h(0)
            .cnot(1, 0)
            .cnot(2, 0)
            .h(2)
            .build()
            .resolve(&DurationTable::unit())
            .unwrap()
    }

    #[test]
    fn test_deterministic_single_trial() {
        let ops = fanout();
        let graph = DependencyGraph::build(&ops, &CommutationTable::standard());
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();

        let driver = SearchDriver::new(SchedulerConfig::latest().with_repeat_num(10)).unwrap();
        let outcome = driver.run(&scheduler).unwrap();

        assert_eq!(outcome.trials_run, 1);
        assert_eq!(outcome.best_trial, 0);
        assert_eq!(outcome.base_seed, None);
        assert_eq!(outcome.schedule.cycles(), Some(vec![0, 2, 1, 2]));
    }

    #[test]
    fn test_single_shuffled_trial_is_deterministic() {
        let ops = fanout();
        let graph = DependencyGraph::build(&ops, &CommutationTable::standard());
        let scheduler = ListScheduler::new(&ops, &graph)
            .unwrap()
            .with_critical_path_priority(false);

        let expected = SearchDriver::new(SchedulerConfig::earliest())
            .unwrap()
            .run(&scheduler)
            .unwrap();

        for seed in 0..20 {
            let config = SchedulerConfig::randomized(SchedulingMode::Earliest, 1, seed);
            let outcome = SearchDriver::new(config).unwrap().run(&scheduler).unwrap();
            assert_eq!(outcome.schedule, expected.schedule);
            assert_eq!(outcome.trials_run, 1);
            assert_eq!(outcome.base_seed, None);
        }
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let ops = fanout();
        let graph = DependencyGraph::build(&ops, &CommutationTable::standard());
        let scheduler = ListScheduler::new(&ops, &graph)
            .unwrap()
            .with_critical_path_priority(false);

        let config = SchedulerConfig::randomized(SchedulingMode::Earliest, 24, 11);
        let parallel = SearchDriver::new(config.clone()).unwrap().run(&scheduler).unwrap();
        let sequential = SearchDriver::new(config.with_parallel(false))
            .unwrap()
            .run(&scheduler)
            .unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.trials_run, 24);
        assert_eq!(parallel.makespans.len(), 24);
        assert_eq!(parallel.base_seed, Some(11));
    }

    #[test]
    fn test_search_never_worse_than_any_trial() {
        let ops = fanout();
        let graph = DependencyGraph::build(&ops, &CommutationTable::standard());
        let scheduler = ListScheduler::new(&ops, &graph)
            .unwrap()
            .with_critical_path_priority(false);

        let config = SchedulerConfig::randomized(SchedulingMode::Earliest, 32, 5);
        let outcome = SearchDriver::new(config).unwrap().run(&scheduler).unwrap();

        let min = outcome.makespans.iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(outcome.makespan(), min);
        // First trial reaching the minimum wins
        let first_min = outcome.makespans.iter().position(|&m| m == min).unwrap();
        assert_eq!(outcome.best_trial, first_min);
        // 32 shuffles of two tied CNOTs find the 3-cycle order
        assert_eq!(min, 3.0);
        assert!(outcome.worst_makespan() >= min);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SchedulerConfig::earliest().with_repeat_num(0);
        assert!(SearchDriver::new(config).is_err());
    }

    #[test]
    fn test_unseeded_search_reports_seed() {
        let ops = fanout();
        let graph = DependencyGraph::build(&ops, &CommutationTable::standard());
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();

        let mut config = SchedulerConfig::randomized(SchedulingMode::Latest, 4, 0);
        config.seed = None;
        let outcome = SearchDriver::new(config).unwrap().run(&scheduler).unwrap();
        assert!(outcome.base_seed.is_some());
        assert_eq!(outcome.makespan(), 3.0);
    }
}
