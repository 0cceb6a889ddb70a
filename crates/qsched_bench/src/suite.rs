//! Benchmark suite for QSCHED
//!
//! Gantree: L8_Benchmark → BenchSuite
//!
//! Runs the scheduler over generated workloads in both directions and with
//! randomized search, recording makespans and wall-clock time.

use crate::generators::InstructionGenerator;
use qsched_core::{CommutationTable, DurationTable, InstructionList, SchedResult, Time};
use qsched_schedule::{SchedulerConfig, Scheduler, SchedulingMode};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Single benchmark result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Benchmark name
    pub name: String,

    /// Number of operations
    pub ops: usize,

    /// Number of resources
    pub resources: usize,

    /// Edges in the dependency graph
    pub edges: usize,

    /// Scheduling direction
    pub mode: SchedulingMode,

    /// Best makespan
    pub makespan: Time,

    /// Makespan of the first trial
    pub first_makespan: Time,

    /// Trials run
    pub trials: usize,

    /// Winning trial
    pub best_trial: usize,

    /// Sequential duration over makespan
    pub parallelism: f64,

    /// Execution time (microseconds)
    pub time_us: u64,
}

impl BenchmarkResult {
    /// Makespan saved by the search relative to its first trial
    pub fn improvement(&self) -> Time {
        self.first_makespan - self.makespan
    }

    /// Improvement as a percentage of the first trial
    pub fn improvement_percent(&self) -> f64 {
        if self.first_makespan > 0.0 {
            self.improvement() / self.first_makespan * 100.0
        } else {
            0.0
        }
    }
}

/// Benchmark suite
/// Gantree: BenchSuite // 벤치마크 스위트
#[derive(Debug, Clone)]
pub struct BenchSuite {
    /// Base seed for generators and searches
    seed: u64,

    /// Duration table for every run
    durations: DurationTable,

    /// Commutation table for every run
    table: CommutationTable,

    /// Results
    results: Vec<BenchmarkResult>,

    /// Log each benchmark at info level
    verbose: bool,
}

impl BenchSuite {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new benchmark suite
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Create with seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            durations: DurationTable::unit(),
            table: CommutationTable::standard(),
            results: Vec::new(),
            verbose: false,
        }
    }

    /// Use a different duration table
    pub fn with_durations(mut self, durations: DurationTable) -> Self {
        self.durations = durations;
        self
    }

    /// Use a different commutation table
    pub fn with_table(mut self, table: CommutationTable) -> Self {
        self.table = table;
        self
    }

    /// Enable verbose logging
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    // ========================================================================
    // Individual Benchmarks
    // ========================================================================

    /// Schedule one list with one configuration
    pub fn bench_list(
        &mut self,
        name: &str,
        list: &InstructionList,
        config: SchedulerConfig,
    ) -> SchedResult<BenchmarkResult> {
        if self.verbose {
            log::info!(
                "Running benchmark: {} ({} ops, {}R, {})",
                name,
                list.len(),
                list.resource_count(),
                config
            );
        }

        let scheduler = Scheduler::new()
            .with_table(self.table.clone())
            .with_durations(self.durations.clone())
            .with_config(config.clone());

        let start = Instant::now();
        let outcome = scheduler.search(list.instructions(), list.resource_count())?;
        let time_us = start.elapsed().as_micros() as u64;

        let ops = scheduler.resolve(list.instructions(), list.resource_count())?;
        let edges = scheduler.build_graph(&ops).num_edges();

        let result = BenchmarkResult {
            name: name.to_string(),
            ops: list.len(),
            resources: list.resource_count(),
            edges,
            mode: config.mode,
            makespan: outcome.makespan(),
            first_makespan: outcome.makespans.first().copied().unwrap_or(0.0),
            trials: outcome.trials_run,
            best_trial: outcome.best_trial,
            parallelism: outcome.schedule.parallelism_factor(),
            time_us,
        };
        self.results.push(result.clone());

        Ok(result)
    }

    /// Schedule one list in both directions
    pub fn bench_modes(
        &mut self,
        name: &str,
        list: &InstructionList,
    ) -> SchedResult<Vec<BenchmarkResult>> {
        [SchedulingMode::Earliest, SchedulingMode::Latest]
            .into_iter()
            .map(|mode| {
                self.bench_list(
                    &format!("{}_{}", name, mode),
                    list,
                    SchedulerConfig::new(mode),
                )
            })
            .collect()
    }

    /// Deterministic pass followed by a seeded randomized search
    pub fn bench_search(
        &mut self,
        name: &str,
        list: &InstructionList,
        mode: SchedulingMode,
        trials: usize,
    ) -> SchedResult<(BenchmarkResult, BenchmarkResult)> {
        let deterministic =
            self.bench_list(&format!("{}_single", name), list, SchedulerConfig::new(mode))?;
        let randomized = self.bench_list(
            &format!("{}_search{}", name, trials),
            list,
            SchedulerConfig::randomized(mode, trials, self.seed),
        )?;
        Ok((deterministic, randomized))
    }

    // ========================================================================
    // Benchmark Suites
    // ========================================================================

    /// GHZ lists from 2 to `max_qubits` qubits, earliest-first
    pub fn run_qubit_scaling(&mut self, max_qubits: usize) -> SchedResult<Vec<BenchmarkResult>> {
        if self.verbose {
            log::info!("=== Qubit Scaling Benchmark ===");
        }

        let generator = InstructionGenerator::with_seed(self.seed);
        generator
            .qubit_scaling(max_qubits)
            .iter()
            .map(|list| {
                let name = format!("ghz_{}q", list.resource_count());
                self.bench_list(&name, list, SchedulerConfig::earliest())
            })
            .collect()
    }

    /// Random lists of growing depth, randomized search
    pub fn run_depth_scaling(
        &mut self,
        num_qubits: usize,
        max_depth: usize,
        trials: usize,
    ) -> SchedResult<Vec<BenchmarkResult>> {
        if self.verbose {
            log::info!("=== Depth Scaling Benchmark ===");
        }

        let generator = InstructionGenerator::with_seed(self.seed);
        let mut results = Vec::new();
        for (i, list) in generator.depth_scaling(num_qubits, max_depth).iter().enumerate() {
            let config = SchedulerConfig::randomized(SchedulingMode::Earliest, trials, self.seed);
            results.push(self.bench_list(&format!("random_d{}", i + 1), list, config)?);
        }
        Ok(results)
    }

    /// Quick benchmark (for testing)
    pub fn run_quick(&mut self) -> SchedResult<Vec<BenchmarkResult>> {
        if self.verbose {
            log::info!("=== Running Quick Benchmark ===");
        }

        let generator = InstructionGenerator::with_seed(self.seed);
        let mut results = Vec::new();
        results.extend(self.bench_modes("fanout_5q", &generator.commuting_fanout(5))?);
        results.push(self.bench_list(
            "qft_5q",
            &generator.qft_like(5),
            SchedulerConfig::randomized(SchedulingMode::Earliest, 8, self.seed),
        )?);
        Ok(results)
    }

    /// Full benchmark suite
    pub fn run_all(&mut self) -> SchedResult<Vec<BenchmarkResult>> {
        if self.verbose {
            log::info!("=== Running Full Benchmark Suite ===");
        }

        let generator = InstructionGenerator::with_seed(self.seed);
        let mut all_results = Vec::new();

        all_results.extend(self.run_qubit_scaling(12)?);
        all_results.extend(self.run_depth_scaling(8, 6, 16)?);

        for n in [4, 8, 12] {
            let (single, search) = self.bench_search(
                &format!("fanout_{}q", n),
                &generator.commuting_fanout(n),
                SchedulingMode::Earliest,
                32,
            )?;
            all_results.push(single);
            all_results.push(search);
        }

        let timed = generator.timed_random(8, 200, 4.0);
        all_results.extend(self.bench_modes("timed_8q", &timed)?);

        let layered = generator.layered(10, 8);
        all_results.extend(self.bench_modes("layered_10q", &layered)?);

        Ok(all_results)
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Get all results
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Clear results
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Get statistics
    pub fn statistics(&self) -> BenchmarkStatistics {
        BenchmarkStatistics::from_results(&self.results)
    }
}

impl Default for BenchSuite {
    fn default() -> Self {
        Self::new()
    }
}

/// Benchmark statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    /// Number of benchmarks
    pub count: usize,

    /// Average makespan
    pub avg_makespan: f64,

    /// Maximum makespan
    pub max_makespan: f64,

    /// Minimum makespan
    pub min_makespan: f64,

    /// Average parallelism factor
    pub avg_parallelism: f64,

    /// Average execution time (µs)
    pub avg_time_us: f64,

    /// Total execution time (µs)
    pub total_time_us: u64,

    /// Fraction of searches that beat their first trial
    pub search_win_rate: f64,
}

impl BenchmarkStatistics {
    /// Compute statistics from results
    pub fn from_results(results: &[BenchmarkResult]) -> Self {
        if results.is_empty() {
            return Self {
                count: 0,
                avg_makespan: 0.0,
                max_makespan: 0.0,
                min_makespan: 0.0,
                avg_parallelism: 0.0,
                avg_time_us: 0.0,
                total_time_us: 0,
                search_win_rate: 0.0,
            };
        }

        let count = results.len();
        let makespans: Vec<f64> = results.iter().map(|r| r.makespan).collect();
        let total_time_us: u64 = results.iter().map(|r| r.time_us).sum();

        let searches: Vec<&BenchmarkResult> = results.iter().filter(|r| r.trials > 1).collect();
        let wins = searches.iter().filter(|r| r.improvement() > 0.0).count();
        let search_win_rate = if searches.is_empty() {
            0.0
        } else {
            wins as f64 / searches.len() as f64
        };

        Self {
            count,
            avg_makespan: makespans.iter().sum::<f64>() / count as f64,
            max_makespan: makespans.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            min_makespan: makespans.iter().cloned().fold(f64::INFINITY, f64::min),
            avg_parallelism: results.iter().map(|r| r.parallelism).sum::<f64>() / count as f64,
            avg_time_us: total_time_us as f64 / count as f64,
            total_time_us,
            search_win_rate,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
