//! Dependency graph for QSCHED
//!
//! Gantree: L3_Graph → DependencyGraph
//!
//! Nodes are operation indices. An edge `i → j` means `i` must finish
//! before `j` starts. Graphs built from an operation list only ever add
//! edges from lower to higher index, so they are acyclic by construction.
//! Externally supplied edge lists are checked with Kahn's algorithm.

use qsched_core::{CommutationTable, OpIndex, Operation, SchedError, SchedResult, Time};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Must-precede graph over operation indices
/// Gantree: DependencyGraph // 의존성 그래프
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Sorted successor lists
    /// Gantree: successors: Vec<Vec<OpIndex>> // 후속
    successors: Vec<Vec<OpIndex>>,

    /// Sorted predecessor lists
    /// Gantree: predecessors: Vec<Vec<OpIndex>> // 선행
    predecessors: Vec<Vec<OpIndex>>,

    /// Total edge count
    num_edges: usize,
}

impl DependencyGraph {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Graph with `n` nodes and no edges
    pub fn empty(n: usize) -> Self {
        Self {
            successors: vec![Vec::new(); n],
            predecessors: vec![Vec::new(); n],
            num_edges: 0,
        }
    }

    /// Build from an ordered operation list and a commutation table
    /// Gantree: build(&[Operation],CommutationTable) -> DependencyGraph // 그래프 구성
    ///
    /// For every pair `i < j` with intersecting resource sets, an edge
    /// `i → j` is added unless the table declares the pair reorderable for
    /// that overlap. Operations are assumed to be indexed by position.
    pub fn build(ops: &[Operation], table: &CommutationTable) -> Self {
        let mut graph = Self::empty(ops.len());
        let mut commuting_pairs = 0usize;

        for i in 0..ops.len() {
            for j in (i + 1)..ops.len() {
                if !ops[i].conflicts_with(&ops[j]) {
                    continue;
                }
                if table.commutes(&ops[i], &ops[j]) {
                    commuting_pairs += 1;
                    continue;
                }
                graph.push_edge(i, j);
            }
        }

        log::trace!(
            "dependency graph: {} nodes, {} edges, {} commuting pairs released",
            graph.num_nodes(),
            graph.num_edges,
            commuting_pairs
        );

        graph
    }

    /// Build from an explicit edge list
    /// Gantree: from_edges(n,&[(i,j)]) -> Result<DependencyGraph> // 외부 그래프
    ///
    /// Duplicate edges are merged. Fails on out-of-range endpoints, self
    /// loops and cycles.
    pub fn from_edges(n: usize, edges: &[(OpIndex, OpIndex)]) -> SchedResult<Self> {
        let mut unique = BTreeSet::new();
        for &(from, to) in edges {
            for endpoint in [from, to] {
                if endpoint >= n {
                    return Err(SchedError::invalid_operation(
                        endpoint,
                        format!("edge endpoint out of range for {} nodes", n),
                    ));
                }
            }
            if from == to {
                return Err(SchedError::CyclicDependency { unresolved: 1 });
            }
            unique.insert((from, to));
        }

        let mut graph = Self::empty(n);
        for (from, to) in unique {
            graph.push_edge(from, to);
        }

        // Kahn's algorithm doubles as the cycle check
        graph.topological_order()?;
        Ok(graph)
    }

    /// Same nodes with every edge inverted
    /// Gantree: reversed(&self) -> DependencyGraph // 역방향
    pub fn reversed(&self) -> Self {
        Self {
            successors: self.predecessors.clone(),
            predecessors: self.successors.clone(),
            num_edges: self.num_edges,
        }
    }

    fn push_edge(&mut self, from: OpIndex, to: OpIndex) {
        self.successors[from].push(to);
        self.predecessors[to].push(from);
        self.num_edges += 1;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.successors.len()
    }

    /// Number of edges
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Check if graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// Successors of a node
    pub fn successors(&self, node: OpIndex) -> &[OpIndex] {
        self.successors.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Predecessors of a node
    pub fn predecessors(&self, node: OpIndex) -> &[OpIndex] {
        self.predecessors.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// In-degree of a node
    /// Gantree: in_degree(node) -> usize // 진입 차수
    pub fn in_degree(&self, node: OpIndex) -> usize {
        self.predecessors(node).len()
    }

    /// In-degree of every node
    pub fn in_degrees(&self) -> Vec<usize> {
        self.predecessors.iter().map(Vec::len).collect()
    }

    /// Nodes with no predecessors
    pub fn sources(&self) -> Vec<OpIndex> {
        (0..self.num_nodes())
            .filter(|&n| self.predecessors[n].is_empty())
            .collect()
    }

    /// Nodes with no successors
    pub fn sinks(&self) -> Vec<OpIndex> {
        (0..self.num_nodes())
            .filter(|&n| self.successors[n].is_empty())
            .collect()
    }

    /// Check for a direct edge
    pub fn has_edge(&self, from: OpIndex, to: OpIndex) -> bool {
        self.successors(from).contains(&to)
    }

    /// All edges, ordered by source then target
    pub fn edges(&self) -> Vec<(OpIndex, OpIndex)> {
        let mut edges: Vec<_> = self
            .successors
            .iter()
            .enumerate()
            .flat_map(|(from, succ)| succ.iter().map(move |&to| (from, to)))
            .collect();
        edges.sort_unstable();
        edges
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Topological order (Kahn), smallest ready index first
    /// Gantree: topological_order(&self) -> Result<Vec<OpIndex>> // 위상 정렬
    pub fn topological_order(&self) -> SchedResult<Vec<OpIndex>> {
        let n = self.num_nodes();
        let mut in_degree = self.in_degrees();
        let mut ready: BTreeSet<OpIndex> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(node) = ready.pop_first() {
            order.push(node);
            for &succ in &self.successors[node] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    ready.insert(succ);
                }
            }
        }

        if order.len() < n {
            return Err(SchedError::CyclicDependency {
                unresolved: n - order.len(),
            });
        }
        Ok(order)
    }

    /// Duration-weighted longest path from each node to any sink,
    /// including the node's own duration
    /// Gantree: longest_path_to_sink(durations) -> Vec<Time> // 임계 경로
    pub fn longest_path_to_sink(&self, durations: &[Time]) -> SchedResult<Vec<Time>> {
        if durations.len() != self.num_nodes() {
            return Err(SchedError::InternalError(format!(
                "{} durations for {} nodes",
                durations.len(),
                self.num_nodes()
            )));
        }

        let order = self.topological_order()?;
        let mut distance = durations.to_vec();
        for &node in order.iter().rev() {
            let tail = self.successors[node]
                .iter()
                .map(|&s| distance[s])
                .fold(0.0, f64::max);
            distance[node] = durations[node] + tail;
        }
        Ok(distance)
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "DependencyGraph({} nodes, {} edges)",
            self.num_nodes(),
            self.num_edges
        )?;
        for (from, succ) in self.successors.iter().enumerate() {
            if !succ.is_empty() {
                writeln!(f, "  {} -> {:?}", from, succ)?;
            }
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
    use qsched_core::{DurationTable, InstructionBuilder};

    fn ops_for(list: qsched_core::InstructionList) -> Vec<Operation> {
        list.resolve(&DurationTable::unit()).unwrap()
    }

    #[test]
    fn test_program_order_without_commutation() {
        // X q0, ISWAP q1 q2, X q2, Y q0, X q0
        let ops = ops_for(
            InstructionBuilder::new(3)
                .x(0)
                .iswap(1, 2)
                .x(2)
                .y(0)
                .x(0)
                .build(),
        );
        let graph = DependencyGraph::build(&ops, &CommutationTable::empty());

        assert_eq!(graph.edges(), vec![(0, 3), (0, 4), (1, 2), (3, 4)]);
        assert_eq!(graph.sources(), vec![0, 1]);
        assert_eq!(graph.sinks(), vec![2, 4]);
        assert_eq!(graph.in_degree(4), 2);
    }

    #[test]
    fn test_commuting_cnots_release_edge() {
        // H q0, CNOT(1->0), CNOT(2->0), H q2
        let ops = ops_for(
            InstructionBuilder::new(3)
                .h(0)
                .cnot(1, 0)
                .cnot(2, 0)
                .h(2)
                .build(),
        );

        let strict = DependencyGraph::build(&ops, &CommutationTable::empty());
        assert!(strict.has_edge(1, 2));

        let relaxed = DependencyGraph::build(&ops, &CommutationTable::standard());
        assert!(!relaxed.has_edge(1, 2));
        assert_eq!(relaxed.edges(), vec![(0, 1), (0, 2), (2, 3)]);
    }

    #[test]
    fn test_disjoint_operations_have_no_edges() {
        let ops = ops_for(InstructionBuilder::new(4).h_layer().build());
        let graph = DependencyGraph::build(&ops, &CommutationTable::empty());
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.sources().len(), 4);
    }

    #[test]
    fn test_topological_order_prefers_low_index() {
        let graph = DependencyGraph::from_edges(4, &[(2, 0), (3, 1)]).unwrap();
        assert_eq!(graph.topological_order().unwrap(), vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_from_edges_detects_cycle() {
        let result = DependencyGraph::from_edges(3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(result, Err(SchedError::CyclicDependency { unresolved: 3 }));

        let self_loop = DependencyGraph::from_edges(2, &[(1, 1)]);
        assert!(matches!(self_loop, Err(SchedError::CyclicDependency { .. })));
    }

    #[test]
    fn test_from_edges_bounds_and_duplicates() {
        assert!(matches!(
            DependencyGraph::from_edges(2, &[(0, 5)]),
            Err(SchedError::InvalidOperation { index: 5, .. })
        ));

        let graph = DependencyGraph::from_edges(2, &[(0, 1), (0, 1)]).unwrap();
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_reversed() {
        let graph = DependencyGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let rev = graph.reversed();
        assert_eq!(rev.edges(), vec![(1, 0), (2, 1)]);
        assert_eq!(rev.sources(), vec![2]);
        assert_eq!(rev.reversed(), graph);
    }

    #[test]
    fn test_longest_path_to_sink() {
        // 0 -> 1 -> 3, 0 -> 2
        let graph = DependencyGraph::from_edges(4, &[(0, 1), (0, 2), (1, 3)]).unwrap();
        let dist = graph.longest_path_to_sink(&[1.0, 2.0, 5.0, 0.5]).unwrap();

        assert_relative_eq!(dist[3], 0.5);
        assert_relative_eq!(dist[1], 2.5);
        assert_relative_eq!(dist[2], 5.0);
        assert_relative_eq!(dist[0], 6.0);

        assert!(graph.longest_path_to_sink(&[1.0]).is_err());
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::build(&[], &CommutationTable::standard());
        assert!(graph.is_empty());
        assert!(graph.topological_order().unwrap().is_empty());
    }
}
