//! Schedule output for QSCHED
//!
//! Gantree: L4_Scheduling → Schedule
//!
//! Start times are index-aligned with the input operation list: entry `k`
//! always belongs to operation `k`. Analysis helpers mirror what the
//! pulse-compilation layer asks of a schedule (cycles, layers, idle time).

use crate::config::SchedulingMode;
use crate::dag::DependencyGraph;
use crate::scheduled_op::ScheduledOp;
use qsched_core::{timing, OpIndex, Operation, SchedError, SchedResult, Time};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Start-time assignment for an operation list
/// Gantree: Schedule // 스케줄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Start time per operation, index-aligned
    /// Gantree: start_times: Vec<Time> // 시작 시간
    start_times: Vec<Time>,

    /// Duration per operation, index-aligned
    durations: Vec<Time>,

    /// Largest finish time
    /// Gantree: makespan: Time // 총 시간
    makespan: Time,

    /// Direction that produced this schedule
    mode: SchedulingMode,

    /// Order in which the scheduler committed operations
    order: Vec<OpIndex>,
}

impl Schedule {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a schedule from its parts
    pub fn new(
        start_times: Vec<Time>,
        durations: Vec<Time>,
        makespan: Time,
        mode: SchedulingMode,
        order: Vec<OpIndex>,
    ) -> Self {
        Self {
            start_times,
            durations,
            makespan,
            mode,
            order,
        }
    }

    /// Create a schedule, deriving the makespan from the largest finish time
    pub fn from_start_times(
        start_times: Vec<Time>,
        durations: Vec<Time>,
        mode: SchedulingMode,
    ) -> Self {
        let makespan = start_times
            .iter()
            .zip(&durations)
            .map(|(s, d)| s + d)
            .fold(0.0, f64::max);
        let mut order: Vec<OpIndex> = (0..start_times.len()).collect();
        order.sort_by(|&a, &b| start_times[a].total_cmp(&start_times[b]).then(a.cmp(&b)));
        Self::new(start_times, durations, makespan, mode, order)
    }

    /// Empty schedule
    pub fn empty(mode: SchedulingMode) -> Self {
        Self::new(Vec::new(), Vec::new(), 0.0, mode, Vec::new())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Start time per operation
    pub fn start_times(&self) -> &[Time] {
        &self.start_times
    }

    /// Start time of one operation
    pub fn start_of(&self, op: OpIndex) -> Option<Time> {
        self.start_times.get(op).copied()
    }

    /// Duration per operation
    pub fn durations(&self) -> &[Time] {
        &self.durations
    }

    /// Finish time per operation
    pub fn finish_times(&self) -> Vec<Time> {
        self.start_times
            .iter()
            .zip(&self.durations)
            .map(|(s, d)| s + d)
            .collect()
    }

    /// Total completion time
    pub fn makespan(&self) -> Time {
        self.makespan
    }

    /// Scheduling direction
    pub fn mode(&self) -> SchedulingMode {
        self.mode
    }

    /// Commit order of the scheduler
    pub fn order(&self) -> &[OpIndex] {
        &self.order
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.start_times.len()
    }

    /// Check if schedule is empty
    pub fn is_empty(&self) -> bool {
        self.start_times.is_empty()
    }

    // ========================================================================
    // Discrete View
    // ========================================================================

    /// Integer start cycles, when every start time is integral
    /// Gantree: cycles(&self) -> Option<Vec<u64>> // 사이클
    pub fn cycles(&self) -> Option<Vec<u64>> {
        self.start_times
            .iter()
            .map(|&t| {
                let rounded = t.round();
                ((t - rounded).abs() < timing::TIME_EPSILON && rounded >= 0.0)
                    .then_some(rounded as u64)
            })
            .collect()
    }

    /// Number of cycles used, when the makespan is integral
    pub fn num_cycles(&self) -> Option<u64> {
        let rounded = self.makespan.round();
        ((self.makespan - rounded).abs() < timing::TIME_EPSILON).then_some(rounded as u64)
    }

    /// Operation indices grouped by start time, earliest group first
    /// Gantree: layers(&self) -> Vec<(Time,Vec<OpIndex>)> // 사이클 목록
    pub fn layers(&self) -> Vec<(Time, Vec<OpIndex>)> {
        let mut by_start: Vec<OpIndex> = (0..self.len()).collect();
        by_start.sort_by(|&a, &b| {
            self.start_times[a]
                .total_cmp(&self.start_times[b])
                .then(a.cmp(&b))
        });

        let mut layers: Vec<(Time, Vec<OpIndex>)> = Vec::new();
        for idx in by_start {
            let start = self.start_times[idx];
            match layers.last_mut() {
                Some((t, members)) if (start - *t).abs() < timing::TIME_EPSILON => {
                    members.push(idx)
                }
                _ => layers.push((start, vec![idx])),
            }
        }
        layers
    }

    /// Time-tagged operations, sorted by start time then index
    pub fn scheduled_ops(&self, ops: &[Operation]) -> SchedResult<Vec<ScheduledOp>> {
        self.check_alignment(ops.len())?;

        let mut tagged: Vec<ScheduledOp> = ops
            .iter()
            .zip(&self.start_times)
            .map(|(op, &start)| ScheduledOp::new(op, start))
            .collect();
        tagged.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.op_idx.cmp(&b.op_idx)));
        Ok(tagged)
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Re-check resource exclusivity and graph precedence
    /// Gantree: verify(ops,graph) -> Result<()> // 검증
    pub fn verify(&self, ops: &[Operation], graph: &DependencyGraph) -> SchedResult<()> {
        self.check_alignment(ops.len())?;
        if graph.num_nodes() != ops.len() {
            return Err(SchedError::InvalidSchedule(format!(
                "graph has {} nodes for {} operations",
                graph.num_nodes(),
                ops.len()
            )));
        }

        let finish = self.finish_times();

        for (idx, &start) in self.start_times.iter().enumerate() {
            if !start.is_finite() || start < -timing::TIME_EPSILON {
                return Err(SchedError::InvalidSchedule(format!(
                    "operation {} has start time {}",
                    idx, start
                )));
            }
        }

        for (from, to) in graph.edges() {
            if finish[from] > self.start_times[to] + timing::TIME_EPSILON {
                return Err(SchedError::InvalidSchedule(format!(
                    "operation {} finishes at {} after dependent {} starts at {}",
                    from, finish[from], to, self.start_times[to]
                )));
            }
        }

        let resource_count = ops
            .iter()
            .flat_map(|op| op.resources().ids().iter().copied())
            .max()
            .map_or(0, |r| r + 1);
        let mut per_resource: Vec<Vec<OpIndex>> = vec![Vec::new(); resource_count];
        for (idx, op) in ops.iter().enumerate() {
            for &r in op.resources().ids() {
                per_resource[r].push(idx);
            }
        }

        for (resource, mut users) in per_resource.into_iter().enumerate() {
            users.sort_by(|&a, &b| {
                self.start_times[a]
                    .total_cmp(&self.start_times[b])
                    .then(finish[a].total_cmp(&finish[b]))
            });
            let mut busy_until = f64::NEG_INFINITY;
            let mut holder = None;
            for idx in users {
                if self.start_times[idx] + timing::TIME_EPSILON < busy_until {
                    return Err(SchedError::InvalidSchedule(format!(
                        "operations {} and {} overlap on resource {}",
                        holder.unwrap_or(idx),
                        idx,
                        resource
                    )));
                }
                if finish[idx] >= busy_until {
                    busy_until = finish[idx];
                    holder = Some(idx);
                }
            }
        }

        Ok(())
    }

    fn check_alignment(&self, n: usize) -> SchedResult<()> {
        if self.len() != n {
            return Err(SchedError::InvalidSchedule(format!(
                "schedule has {} entries for {} operations",
                self.len(),
                n
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Idle Time Analysis
    // ========================================================================

    /// Time each resource becomes free for good
    pub fn resource_end_times(&self, ops: &[Operation], resource_count: usize) -> Vec<Time> {
        let mut end = vec![0.0; resource_count];
        for (op, finish) in ops.iter().zip(self.finish_times()) {
            for &r in op.resources().ids() {
                if r < resource_count {
                    end[r] = f64::max(end[r], finish);
                }
            }
        }
        end
    }

    /// Idle time per resource between time 0 and its last use
    /// Gantree: idle_times(ops,n) -> Vec<Time> // 자원별 idle
    pub fn idle_times(&self, ops: &[Operation], resource_count: usize) -> Vec<Time> {
        let mut active = vec![0.0; resource_count];
        for (op, &duration) in ops.iter().zip(&self.durations) {
            for &r in op.resources().ids() {
                if r < resource_count {
                    active[r] += duration;
                }
            }
        }

        self.resource_end_times(ops, resource_count)
            .iter()
            .zip(&active)
            .map(|(&end, &busy)| (end - busy).max(0.0))
            .collect()
    }

    /// Idle time summed over all resources
    pub fn total_idle_time(&self, ops: &[Operation], resource_count: usize) -> Time {
        self.idle_times(ops, resource_count).iter().sum()
    }

    // ========================================================================
    // Parallelism Analysis
    // ========================================================================

    /// Sequential duration divided by makespan
    /// Gantree: parallelism_factor(&self) -> f64 // 병렬화율
    pub fn parallelism_factor(&self) -> f64 {
        if self.makespan <= 0.0 || self.is_empty() {
            return 1.0;
        }
        let sequential: Time = self.durations.iter().sum();
        sequential / self.makespan
    }

    /// Count operations active at a given time
    pub fn concurrent_ops_at(&self, time: Time) -> usize {
        self.start_times
            .iter()
            .zip(&self.durations)
            .filter(|&(&s, &d)| s <= time && time < s + d)
            .count()
    }

    /// Maximum number of simultaneously active operations
    pub fn max_concurrent_ops(&self) -> usize {
        // Concurrency only rises at start times
        self.start_times
            .iter()
            .map(|&t| self.concurrent_ops_at(t))
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schedule ({})", self.mode)?;
        writeln!(f, "  Operations: {}", self.len())?;
        writeln!(f, "  Makespan: {}", self.makespan)?;
        writeln!(f, "  Parallelism: {:.2}x", self.parallelism_factor())?;
        for (time, members) in self.layers() {
            writeln!(f, "  t={}: {:?}", time, members)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qsched_core::{CommutationTable, DurationTable, InstructionBuilder};

    fn scenario_ops() -> Vec<Operation> {
        InstructionBuilder::new(3)
            .x(0)
            .iswap(1, 2)
            .x(2)
            .y(0)
            .x(0)
            .build()
            .resolve(&DurationTable::unit())
            .unwrap()
    }

    fn earliest(starts: Vec<Time>) -> Schedule {
        let n = starts.len();
        Schedule::from_start_times(starts, vec![1.0; n], SchedulingMode::Earliest)
    }

    #[test]
    fn test_from_start_times() {
        let schedule = earliest(vec![0.0, 0.0, 1.0, 1.0, 2.0]);
        assert_relative_eq!(schedule.makespan(), 3.0);
        assert_eq!(schedule.len(), 5);
        assert_eq!(schedule.order(), &[0, 1, 2, 3, 4]);
        assert_eq!(schedule.finish_times(), vec![1.0, 1.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cycles_and_layers() {
        let schedule = earliest(vec![0.0, 1.0, 2.0, 1.0, 2.0]);
        assert_eq!(schedule.cycles(), Some(vec![0, 1, 2, 1, 2]));
        assert_eq!(schedule.num_cycles(), Some(3));
        assert_eq!(
            schedule.layers(),
            vec![(0.0, vec![0]), (1.0, vec![1, 3]), (2.0, vec![2, 4])]
        );
    }

    #[test]
    fn test_fractional_has_no_cycles() {
        let schedule = Schedule::from_start_times(
            vec![0.0, 0.0, 3.5],
            vec![1.0, 3.5, 1.0],
            SchedulingMode::Earliest,
        );
        assert_eq!(schedule.cycles(), None);
        assert_eq!(schedule.num_cycles(), None);
        assert_relative_eq!(schedule.makespan(), 4.5);
    }

    #[test]
    fn test_verify_accepts_valid() {
        let ops = scenario_ops();
        let graph = DependencyGraph::build(&ops, &CommutationTable::empty());
        let schedule = earliest(vec![0.0, 0.0, 1.0, 1.0, 2.0]);
        assert!(schedule.verify(&ops, &graph).is_ok());
    }

    #[test]
    fn test_verify_rejects_overlap() {
        let ops = scenario_ops();
        let graph = DependencyGraph::empty(ops.len());
        // Y q0 and X q0 both at cycle 1
        let schedule = earliest(vec![0.0, 0.0, 1.0, 1.0, 1.0]);
        let err = schedule.verify(&ops, &graph).unwrap_err();
        assert!(matches!(err, SchedError::InvalidSchedule(_)));
    }

    #[test]
    fn test_verify_rejects_precedence() {
        let ops = scenario_ops();
        let graph = DependencyGraph::build(&ops, &CommutationTable::empty());
        // X q0 (op 4) before Y q0 (op 3) breaks edge 3 -> 4
        let schedule = earliest(vec![0.0, 0.0, 1.0, 2.0, 1.0]);
        assert!(schedule.verify(&ops, &graph).is_err());
    }

    #[test]
    fn test_verify_rejects_misaligned() {
        let ops = scenario_ops();
        let graph = DependencyGraph::build(&ops, &CommutationTable::empty());
        let schedule = earliest(vec![0.0, 0.0]);
        assert!(schedule.verify(&ops, &graph).is_err());
        assert!(schedule.scheduled_ops(&ops).is_err());
    }

    #[test]
    fn test_idle_times() {
        let ops = scenario_ops();
        let schedule = earliest(vec![0.0, 1.0, 2.0, 1.0, 2.0]);
        // q0 busy 3 of 3, q1 idle 1 before ISWAP, q2 idle 1 before ISWAP
        let idle = schedule.idle_times(&ops, 3);
        assert_relative_eq!(idle[0], 0.0);
        assert_relative_eq!(idle[1], 1.0);
        assert_relative_eq!(idle[2], 1.0);
        assert_relative_eq!(schedule.total_idle_time(&ops, 3), 2.0);
    }

    #[test]
    fn test_parallelism() {
        let schedule = earliest(vec![0.0; 4]);
        assert_relative_eq!(schedule.parallelism_factor(), 4.0);
        assert_eq!(schedule.max_concurrent_ops(), 4);
        assert_eq!(schedule.concurrent_ops_at(1.0), 0);
        assert_relative_eq!(Schedule::empty(SchedulingMode::Latest).parallelism_factor(), 1.0);
    }

    #[test]
    fn test_scheduled_ops_sorted() {
        let ops = scenario_ops();
        let schedule = earliest(vec![2.0, 0.0, 1.0, 1.0, 0.0]);
        let tagged = schedule.scheduled_ops(&ops).unwrap();
        let order: Vec<_> = tagged.iter().map(|s| s.op_idx).collect();
        assert_eq!(order, vec![1, 4, 2, 3, 0]);
    }
}
