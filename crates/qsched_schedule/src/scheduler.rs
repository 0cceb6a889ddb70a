//! Scheduler facade for QSCHED
//!
//! Gantree: L4_Scheduling → Scheduler
//!
//! Wires the pipeline together: instructions are resolved against a
//! duration table, a dependency graph is built against a commutation
//! table, and the search driver runs the list scheduler.

use crate::config::{SchedulerConfig, SchedulingMode};
use crate::dag::DependencyGraph;
use crate::list_scheduler::ListScheduler;
use crate::schedule::Schedule;
use crate::search::{SearchDriver, SearchOutcome};
use qsched_core::{
    resolve_all, CommutationTable, DurationTable, Instruction, InstructionList, Operation,
    ResourceId, SchedResult,
};

/// Scheduling pipeline with its rule tables and configuration
/// Gantree: Scheduler // 스케줄러
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Commutation rules used to release edges
    /// Gantree: table: CommutationTable // 교환 규칙
    table: CommutationTable,

    /// Per-kind default durations
    /// Gantree: durations: DurationTable // 실행 시간
    durations: DurationTable,

    /// Mode and search knobs
    /// Gantree: config: SchedulerConfig // 설정
    config: SchedulerConfig,
}

impl Scheduler {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Standard commutation rules, unit durations, earliest-first
    pub fn new() -> Self {
        Self {
            table: CommutationTable::standard(),
            durations: DurationTable::unit(),
            config: SchedulerConfig::default(),
        }
    }

    /// Replace the commutation table
    pub fn with_table(mut self, table: CommutationTable) -> Self {
        self.table = table;
        self
    }

    /// Replace the duration table
    pub fn with_durations(mut self, durations: DurationTable) -> Self {
        self.durations = durations;
        self
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Commutation table in use
    pub fn table(&self) -> &CommutationTable {
        &self.table
    }

    /// Duration table in use
    pub fn durations(&self) -> &DurationTable {
        &self.durations
    }

    /// Configuration in use
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Validate instructions and attach concrete durations
    /// Gantree: resolve(instructions,n) -> Result<Vec<Operation>> // 검증
    pub fn resolve(
        &self,
        instructions: &[Instruction],
        resource_count: usize,
    ) -> SchedResult<Vec<Operation>> {
        resolve_all(instructions, resource_count, &self.durations)
    }

    /// Build the must-precede graph for resolved operations
    /// Gantree: build_graph(ops) -> DependencyGraph // 그래프
    pub fn build_graph(&self, ops: &[Operation]) -> DependencyGraph {
        DependencyGraph::build(ops, &self.table)
    }

    /// Run the configured search and return the full outcome
    /// Gantree: search(instructions,n) -> Result<SearchOutcome> // 탐색
    pub fn search(
        &self,
        instructions: &[Instruction],
        resource_count: usize,
    ) -> SchedResult<SearchOutcome> {
        let driver = SearchDriver::new(self.config.clone())?;
        let ops = self.resolve(instructions, resource_count)?;
        let graph = self.build_graph(&ops);
        let scheduler = ListScheduler::new(&ops, &graph)?
            .with_critical_path_priority(self.config.critical_path_priority);
        driver.run(&scheduler)
    }

    /// Run the configured search and return the best schedule
    /// Gantree: schedule(instructions,n) -> Result<Schedule> // 스케줄
    pub fn schedule(
        &self,
        instructions: &[Instruction],
        resource_count: usize,
    ) -> SchedResult<Schedule> {
        Ok(self.search(instructions, resource_count)?.schedule)
    }

    /// Schedule an instruction list
    pub fn schedule_list(&self, list: &InstructionList) -> SchedResult<Schedule> {
        self.schedule(list.instructions(), list.resource_count())
    }

    /// Earliest-first schedule with the standard tables
    /// Gantree: schedule_earliest(instructions,n) -> Result<Schedule> // ASAP
    pub fn schedule_earliest(
        instructions: &[Instruction],
        resource_count: usize,
    ) -> SchedResult<Schedule> {
        Self::new()
            .with_config(SchedulerConfig::new(SchedulingMode::Earliest))
            .schedule(instructions, resource_count)
    }

    /// Latest-first schedule with the standard tables
    /// Gantree: schedule_latest(instructions,n) -> Result<Schedule> // ALAP
    pub fn schedule_latest(
        instructions: &[Instruction],
        resource_count: usize,
    ) -> SchedResult<Schedule> {
        Self::new()
            .with_config(SchedulerConfig::new(SchedulingMode::Latest))
            .schedule(instructions, resource_count)
    }

    // ========================================================================
    // Analysis Utilities
    // ========================================================================

    /// Resource with the most idle time
    pub fn find_bottleneck_resource(
        schedule: &Schedule,
        ops: &[Operation],
        resource_count: usize,
    ) -> Option<ResourceId> {
        schedule
            .idle_times(ops, resource_count)
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(r, _)| r)
    }

    /// Busy time over `makespan × resource_count`; 1.0 means no idle slots
    pub fn scheduling_efficiency(
        schedule: &Schedule,
        ops: &[Operation],
        resource_count: usize,
    ) -> f64 {
        let busy: f64 = ops
            .iter()
            .zip(schedule.durations())
            .map(|(op, d)| d * op.resources().len() as f64)
            .sum();
        let capacity = schedule.makespan() * resource_count as f64;

        if capacity > 0.0 {
            busy / capacity
        } else {
            1.0
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qsched_core::{InstructionBuilder, OpKind, SchedError};

    #[test]
    fn test_default_pipeline() {
        let list = InstructionBuilder::new(2).h(0).h(1).cnot(0, 1).build();
        let schedule = Scheduler::new().schedule_list(&list).unwrap();
        assert_eq!(schedule.cycles(), Some(vec![0, 0, 1]));
        assert_eq!(schedule.mode(), SchedulingMode::Earliest);
    }

    #[test]
    fn test_invalid_operation_aborts() {
        let instructions = vec![
            Instruction::new(OpKind::X, vec![0]),
            Instruction::new(OpKind::X, vec![4]),
        ];
        let err = Scheduler::schedule_earliest(&instructions, 2).unwrap_err();
        assert!(matches!(err, SchedError::InvalidOperation { index: 1, .. }));
    }

    #[test]
    fn test_invalid_config_aborts() {
        let list = InstructionBuilder::new(1).x(0).build();
        let scheduler =
            Scheduler::new().with_config(SchedulerConfig::earliest().with_repeat_num(0));
        assert!(matches!(
            scheduler.schedule_list(&list),
            Err(SchedError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_custom_durations() {
        let list = InstructionBuilder::new(2).x(0).cnot(0, 1).build();
        let durations = DurationTable::unit().with_duration(OpKind::Cnot, 2.5).unwrap();
        let schedule = Scheduler::new()
            .with_durations(durations)
            .schedule_list(&list)
            .unwrap();
        assert_relative_eq!(schedule.makespan(), 3.5);
    }

    #[test]
    fn test_empty_table_loses_commutation() {
        let list = InstructionBuilder::new(3).h(0).cnot(1, 0).cnot(2, 0).h(2).build();
        let strict = Scheduler::new()
            .with_table(CommutationTable::empty())
            .schedule_list(&list)
            .unwrap();
        let relaxed = Scheduler::new().schedule_list(&list).unwrap();

        assert_relative_eq!(strict.makespan(), 4.0);
        assert_relative_eq!(relaxed.makespan(), 3.0);
    }

    #[test]
    fn test_bottleneck_and_efficiency() {
        // q1 waits three cycles for q0
        let list = InstructionBuilder::new(2).h(0).h(0).h(0).cnot(0, 1).build();
        let scheduler = Scheduler::new();
        let ops = scheduler.resolve(list.instructions(), 2).unwrap();
        let schedule = scheduler.schedule_list(&list).unwrap();

        assert_eq!(Scheduler::find_bottleneck_resource(&schedule, &ops, 2), Some(1));

        let sequential = Scheduler::scheduling_efficiency(&schedule, &ops, 2);
        let parallel_list = InstructionBuilder::new(2).h(0).h(1).build();
        let parallel_ops = scheduler.resolve(parallel_list.instructions(), 2).unwrap();
        let parallel = scheduler.schedule_list(&parallel_list).unwrap();
        let full = Scheduler::scheduling_efficiency(&parallel, &parallel_ops, 2);

        assert_relative_eq!(full, 1.0);
        assert!(full > sequential);
    }
}
