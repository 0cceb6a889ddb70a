//! Priority-list scheduler
//!
//! Gantree: L4_Scheduling → ListScheduler
//!
//! One pass commits operations one at a time. Among ready operations the
//! next one is chosen by:
//!
//! 1. smallest feasible start time (all resources free, all predecessors done)
//! 2. longest remaining duration-weighted chain, when critical-path priority is on
//! 3. tie-break rank
//!
//! The latest-first direction runs the same pass over the reversed graph and
//! mirrors the result against the earliest-first makespan.

use crate::config::SchedulingMode;
use crate::dag::DependencyGraph;
use crate::schedule::Schedule;
use qsched_core::{timing, OpIndex, Operation, SchedError, SchedResult, Time};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Tie-break ordering
// ============================================================================

/// Rank of each operation among equally-ready candidates; lower goes first
/// Gantree: TieBreak // 동점 처리 순서
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieBreak {
    rank: Vec<usize>,
}

impl TieBreak {
    /// Original sequence order
    pub fn identity(n: usize) -> Self {
        Self {
            rank: (0..n).collect(),
        }
    }

    /// Uniformly shuffled order
    /// Gantree: shuffled(n,rng) -> TieBreak // 무작위 순서
    pub fn shuffled<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<OpIndex> = (0..n).collect();
        order.shuffle(rng);
        Self::ranked(&order)
    }

    /// Explicit preference order; must be a permutation of `0..n`
    pub fn from_order(order: &[OpIndex]) -> SchedResult<Self> {
        let mut seen = vec![false; order.len()];
        for &op in order {
            match seen.get_mut(op) {
                Some(flag) if !*flag => *flag = true,
                _ => {
                    return Err(SchedError::InvalidConfig(format!(
                        "tie-break order is not a permutation of 0..{}",
                        order.len()
                    )))
                }
            }
        }
        Ok(Self::ranked(order))
    }

    fn ranked(order: &[OpIndex]) -> Self {
        let mut rank = vec![0; order.len()];
        for (position, &op) in order.iter().enumerate() {
            rank[op] = position;
        }
        Self { rank }
    }

    /// Rank of an operation
    pub fn rank(&self, op: OpIndex) -> usize {
        self.rank.get(op).copied().unwrap_or(usize::MAX)
    }

    /// Number of ranked operations
    pub fn len(&self) -> usize {
        self.rank.len()
    }

    /// Check if nothing is ranked
    pub fn is_empty(&self) -> bool {
        self.rank.is_empty()
    }
}

// ============================================================================
// Per-operation state
// ============================================================================

/// Scheduling state of one operation during a pass
/// Gantree: OpState // Pending → Ready → Scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpState {
    /// Waiting on at least one predecessor
    Pending,
    /// All predecessors committed
    Ready,
    /// Start time assigned
    Scheduled,
}

impl OpState {
    /// Move `op` one step along Pending → Ready → Scheduled
    ///
    /// Fails if the current state is not `expected` or is already final.
    pub fn advance(&mut self, expected: OpState, op: OpIndex) -> SchedResult<()> {
        if *self != expected {
            return Err(SchedError::InternalError(format!(
                "operation {} is {}, expected {}",
                op, self, expected
            )));
        }
        *self = match expected {
            OpState::Pending => OpState::Ready,
            OpState::Ready => OpState::Scheduled,
            OpState::Scheduled => {
                return Err(SchedError::InternalError(format!(
                    "operation {} is already scheduled",
                    op
                )))
            }
        };
        Ok(())
    }
}

impl fmt::Display for OpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpState::Pending => write!(f, "pending"),
            OpState::Ready => write!(f, "ready"),
            OpState::Scheduled => write!(f, "scheduled"),
        }
    }
}

// ============================================================================
// List Scheduler
// ============================================================================

/// Result of one forward pass
#[derive(Debug, Clone)]
struct Pass {
    start: Vec<Time>,
    finish: Vec<Time>,
    order: Vec<OpIndex>,
    makespan: Time,
}

/// Greedy list scheduler over a dependency graph
/// Gantree: ListScheduler // 리스트 스케줄러
#[derive(Debug, Clone)]
pub struct ListScheduler<'a> {
    ops: &'a [Operation],
    graph: &'a DependencyGraph,
    durations: Vec<Time>,
    resource_count: usize,
    critical_path_priority: bool,
}

impl<'a> ListScheduler<'a> {
    /// Create a scheduler; the graph must have one node per operation
    pub fn new(ops: &'a [Operation], graph: &'a DependencyGraph) -> SchedResult<Self> {
        if graph.num_nodes() != ops.len() {
            return Err(SchedError::InternalError(format!(
                "graph has {} nodes for {} operations",
                graph.num_nodes(),
                ops.len()
            )));
        }

        let resource_count = ops
            .iter()
            .filter_map(|op| op.resources().ids().last().copied())
            .max()
            .map_or(0, |r| r + 1);

        Ok(Self {
            ops,
            graph,
            durations: ops.iter().map(Operation::duration).collect(),
            resource_count,
            critical_path_priority: true,
        })
    }

    /// Number of operations being scheduled
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Dependency graph being scheduled
    pub fn graph(&self) -> &DependencyGraph {
        self.graph
    }

    /// Enable or disable critical-path priority
    pub fn with_critical_path_priority(mut self, enabled: bool) -> Self {
        self.critical_path_priority = enabled;
        self
    }

    /// Schedule in the given direction
    /// Gantree: run(mode,TieBreak) -> Result<Schedule> // 스케줄 실행
    pub fn run(&self, mode: SchedulingMode, tie_break: &TieBreak) -> SchedResult<Schedule> {
        let schedule = match mode {
            SchedulingMode::Earliest => self.earliest(tie_break)?,
            SchedulingMode::Latest => self.latest(tie_break)?,
        };

        log::debug!(
            "{} schedule: {} ops, {} edges, makespan {}",
            mode,
            self.ops.len(),
            self.graph.num_edges(),
            schedule.makespan()
        );
        Ok(schedule)
    }

    /// As-soon-as-possible schedule
    /// Gantree: earliest(TieBreak) -> Result<Schedule> // ASAP
    pub fn earliest(&self, tie_break: &TieBreak) -> SchedResult<Schedule> {
        if self.ops.is_empty() {
            return Ok(Schedule::empty(SchedulingMode::Earliest));
        }

        let pass = self.forward_pass(self.graph, tie_break)?;
        Ok(Schedule::new(
            pass.start,
            self.durations.clone(),
            pass.makespan,
            SchedulingMode::Earliest,
            pass.order,
        ))
    }

    /// As-late-as-possible schedule anchored to the earliest-first makespan
    /// Gantree: latest(TieBreak) -> Result<Schedule> // ALAP
    pub fn latest(&self, tie_break: &TieBreak) -> SchedResult<Schedule> {
        if self.ops.is_empty() {
            return Ok(Schedule::empty(SchedulingMode::Latest));
        }

        let forward = self.forward_pass(self.graph, tie_break)?;
        let reversed = self.graph.reversed();
        let backward = self.forward_pass(&reversed, tie_break)?;
        let horizon = forward.makespan;

        let (start, order) = if backward.makespan <= horizon + timing::TIME_EPSILON {
            let start = backward
                .finish
                .iter()
                .map(|&f| (horizon - f).max(0.0))
                .collect();
            (start, backward.order)
        } else {
            log::trace!(
                "reverse pass makespan {} exceeds horizon {}, right-justifying forward pass",
                backward.makespan,
                horizon
            );
            let start = self.right_justify(&forward, horizon);
            (start, forward.order.into_iter().rev().collect())
        };

        Ok(Schedule::new(
            start,
            self.durations.clone(),
            horizon,
            SchedulingMode::Latest,
            order,
        ))
    }

    // ========================================================================
    // Passes
    // ========================================================================

    /// Commit every node of `graph` in priority order
    fn forward_pass(&self, graph: &DependencyGraph, tie_break: &TieBreak) -> SchedResult<Pass> {
        let n = self.ops.len();
        let priority = if self.critical_path_priority {
            graph.longest_path_to_sink(&self.durations)?
        } else {
            vec![0.0; n]
        };

        let mut waiting_on = graph.in_degrees();
        let mut state: Vec<OpState> = waiting_on
            .iter()
            .map(|&d| if d == 0 { OpState::Ready } else { OpState::Pending })
            .collect();
        let mut ready: Vec<OpIndex> = (0..n).filter(|&i| waiting_on[i] == 0).collect();

        let mut resource_free = vec![0.0; self.resource_count];
        let mut start = vec![0.0; n];
        let mut finish = vec![0.0; n];
        let mut order = Vec::with_capacity(n);

        while order.len() < n {
            let earliest_start = |op: OpIndex| -> Time {
                let resources = self.ops[op]
                    .resources()
                    .ids()
                    .iter()
                    .map(|&r| resource_free[r]);
                let predecessors = graph.predecessors(op).iter().map(|&p| finish[p]);
                resources.chain(predecessors).fold(0.0, f64::max)
            };

            let pick = ready
                .iter()
                .enumerate()
                .map(|(slot, &op)| (slot, op, earliest_start(op)))
                .min_by(|a, b| {
                    cmp_time(a.2, b.2)
                        .then_with(|| cmp_time(priority[b.1], priority[a.1]))
                        .then_with(|| tie_break.rank(a.1).cmp(&tie_break.rank(b.1)))
                });

            let Some((slot, op, at)) = pick else {
                return Err(SchedError::SchedulerStalled {
                    scheduled: order.len(),
                    total: n,
                });
            };
            ready.swap_remove(slot);
            state[op].advance(OpState::Ready, op)?;

            start[op] = at;
            finish[op] = at + self.durations[op];
            order.push(op);

            for &r in self.ops[op].resources().ids() {
                resource_free[r] = finish[op];
            }
            for &succ in graph.successors(op) {
                if state[succ] != OpState::Pending {
                    return Err(SchedError::InternalError(format!(
                        "edge {} -> {} reaches a {} operation",
                        op, succ, state[succ]
                    )));
                }
                waiting_on[succ] -= 1;
                if waiting_on[succ] == 0 {
                    state[succ].advance(OpState::Pending, succ)?;
                    ready.push(succ);
                }
            }
        }

        let makespan = finish.iter().copied().fold(0.0, f64::max);
        Ok(Pass {
            start,
            finish,
            order,
            makespan,
        })
    }

    /// Push every operation of a forward pass as late as its resources and
    /// successors allow, keeping the pass's commit order per resource
    fn right_justify(&self, pass: &Pass, horizon: Time) -> Vec<Time> {
        let mut next_start = vec![horizon; self.resource_count];
        let mut start = pass.start.clone();

        for &op in pass.order.iter().rev() {
            let resource_bound = self.ops[op]
                .resources()
                .ids()
                .iter()
                .map(|&r| next_start[r]);
            let successor_bound = self.graph.successors(op).iter().map(|&s| start[s]);
            let latest_finish = resource_bound
                .chain(successor_bound)
                .fold(horizon, f64::min);

            start[op] = (latest_finish - self.durations[op]).max(pass.start[op]);
            for &r in self.ops[op].resources().ids() {
                next_start[r] = start[op];
            }
        }
        start
    }
}

/// Compare times, treating values within `TIME_EPSILON` as equal
fn cmp_time(a: Time, b: Time) -> Ordering {
    if (a - b).abs() < timing::TIME_EPSILON {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qsched_core::{CommutationTable, DurationTable, InstructionBuilder, InstructionList};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn prepare(list: InstructionList, durations: &DurationTable) -> (Vec<Operation>, DependencyGraph) {
        let ops = list.resolve(durations).unwrap();
        let graph = DependencyGraph::build(&ops, &CommutationTable::standard());
        (ops, graph)
    }

    fn five_op_list() -> InstructionList {
        InstructionBuilder::new(3)
            .x(0)
            .iswap(1, 2)
            .x(2)
            .y(0)
            .x(0)
            .build()
    }

    fn fanout_list() -> InstructionList {
        InstructionBuilder::new(3)
            .h(0)
            .cnot(1, 0)
            .cnot(2, 0)
            .h(2)
            .build()
    }

    #[test]
    fn test_tie_break_identity_and_order() {
        let identity = TieBreak::identity(3);
        assert_eq!(identity.rank(2), 2);

        let custom = TieBreak::from_order(&[2, 0, 1]).unwrap();
        assert_eq!(custom.rank(2), 0);
        assert_eq!(custom.rank(0), 1);
        assert_eq!(custom.rank(7), usize::MAX);

        assert!(TieBreak::from_order(&[0, 0, 1]).is_err());
        assert!(TieBreak::from_order(&[0, 3]).is_err());
    }

    #[test]
    fn test_tie_break_shuffled_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let tb = TieBreak::shuffled(16, &mut rng);
        let mut ranks: Vec<_> = (0..16).map(|op| tb.rank(op)).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_op_state_transitions() {
        let mut state = OpState::Pending;
        state.advance(OpState::Pending, 3).unwrap();
        assert_eq!(state, OpState::Ready);
        state.advance(OpState::Ready, 3).unwrap();
        assert_eq!(state, OpState::Scheduled);

        // Picking a committed node again is rejected
        let err = state.advance(OpState::Ready, 3).unwrap_err();
        assert!(matches!(err, SchedError::InternalError(_)));
        assert!(state.advance(OpState::Scheduled, 3).is_err());
        assert_eq!(state, OpState::Scheduled);

        // Skipping Ready is rejected
        let mut pending = OpState::Pending;
        assert!(pending.advance(OpState::Ready, 0).is_err());
        assert_eq!(pending, OpState::Pending);
    }

    #[test]
    fn test_earliest_unit_durations() {
        let (ops, graph) = prepare(five_op_list(), &DurationTable::unit());
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();
        let schedule = scheduler.earliest(&TieBreak::identity(ops.len())).unwrap();

        assert_eq!(schedule.cycles(), Some(vec![0, 0, 1, 1, 2]));
        assert_eq!(schedule.num_cycles(), Some(3));
        assert!(schedule.verify(&ops, &graph).is_ok());
    }

    #[test]
    fn test_latest_unit_durations() {
        let (ops, graph) = prepare(five_op_list(), &DurationTable::unit());
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();
        let schedule = scheduler.latest(&TieBreak::identity(ops.len())).unwrap();

        assert_eq!(schedule.cycles(), Some(vec![0, 1, 2, 1, 2]));
        assert_relative_eq!(schedule.makespan(), 3.0);
        assert_eq!(schedule.mode(), SchedulingMode::Latest);
        assert!(schedule.verify(&ops, &graph).is_ok());
    }

    #[test]
    fn test_earliest_heterogeneous_durations() {
        let durations = DurationTable::unit()
            .with_duration(qsched_core::OpKind::ISwap, 3.5)
            .unwrap();
        let (ops, graph) = prepare(five_op_list(), &durations);
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();
        let schedule = scheduler.earliest(&TieBreak::identity(ops.len())).unwrap();

        let starts = schedule.start_times();
        let expected = [0.0, 0.0, 3.5, 1.0, 2.0];
        for (got, want) in starts.iter().zip(expected) {
            assert_relative_eq!(*got, want);
        }
        assert_relative_eq!(schedule.makespan(), 4.5);
    }

    #[test]
    fn test_latest_exploits_commuting_cnots() {
        let (ops, graph) = prepare(fanout_list(), &DurationTable::unit());
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();
        let schedule = scheduler.latest(&TieBreak::identity(ops.len())).unwrap();

        assert_eq!(schedule.cycles(), Some(vec![0, 2, 1, 2]));
        assert_eq!(schedule.num_cycles(), Some(3));
        assert!(schedule.verify(&ops, &graph).is_ok());
    }

    #[test]
    fn test_critical_path_priority_shortens_fanout() {
        let (ops, graph) = prepare(fanout_list(), &DurationTable::unit());
        let tb = TieBreak::identity(ops.len());

        let greedy = ListScheduler::new(&ops, &graph)
            .unwrap()
            .with_critical_path_priority(false)
            .earliest(&tb)
            .unwrap();
        let guided = ListScheduler::new(&ops, &graph).unwrap().earliest(&tb).unwrap();

        assert_relative_eq!(greedy.makespan(), 4.0);
        assert_relative_eq!(guided.makespan(), 3.0);
    }

    #[test]
    fn test_tie_break_orders_commuting_pair() {
        // Two X on the same qubit commute, so only the rank decides
        let (ops, graph) = prepare(InstructionBuilder::new(1).x(0).x(0).build(), &DurationTable::unit());
        assert_eq!(graph.num_edges(), 0);
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();

        let forward = scheduler.earliest(&TieBreak::identity(2)).unwrap();
        assert_eq!(forward.cycles(), Some(vec![0, 1]));

        let swapped = scheduler.earliest(&TieBreak::from_order(&[1, 0]).unwrap()).unwrap();
        assert_eq!(swapped.cycles(), Some(vec![1, 0]));
        assert_eq!(swapped.order(), &[1, 0]);
    }

    #[test]
    fn test_conflict_free_all_start_at_zero() {
        let (ops, graph) = prepare(InstructionBuilder::new(5).h_layer().build(), &DurationTable::unit());
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let schedule = scheduler.earliest(&TieBreak::shuffled(5, &mut rng)).unwrap();
        assert!(schedule.start_times().iter().all(|&t| t == 0.0));
    }

    #[test]
    fn test_external_graph_precedence_without_shared_resources() {
        let ops = InstructionBuilder::new(2)
            .x(0)
            .x(1)
            .build()
            .resolve(&DurationTable::unit())
            .unwrap();
        let graph = DependencyGraph::from_edges(2, &[(0, 1)]).unwrap();
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();
        let tb = TieBreak::identity(2);

        assert_eq!(scheduler.earliest(&tb).unwrap().cycles(), Some(vec![0, 1]));
        assert_eq!(scheduler.latest(&tb).unwrap().cycles(), Some(vec![0, 1]));
    }

    #[test]
    fn test_zero_duration_operations() {
        let (ops, graph) = prepare(
            InstructionBuilder::new(1).rz(0).x(0).build(),
            &DurationTable::unit().with_duration(qsched_core::OpKind::Rz, 0.0).unwrap(),
        );
        let scheduler = ListScheduler::new(&ops, &graph).unwrap();
        let schedule = scheduler.earliest(&TieBreak::identity(2)).unwrap();
        assert_relative_eq!(schedule.makespan(), 1.0);
        assert!(schedule.verify(&ops, &graph).is_ok());
    }

    #[test]
    fn test_empty() {
        let graph = DependencyGraph::empty(0);
        let scheduler = ListScheduler::new(&[], &graph).unwrap();
        let schedule = scheduler.run(SchedulingMode::Latest, &TieBreak::identity(0)).unwrap();
        assert!(schedule.is_empty());
        assert_relative_eq!(schedule.makespan(), 0.0);
    }

    #[test]
    fn test_mismatched_graph_rejected() {
        let (ops, _) = prepare(five_op_list(), &DurationTable::unit());
        let graph = DependencyGraph::empty(2);
        assert!(ListScheduler::new(&ops, &graph).is_err());
    }
}
