//! Instruction list generators for benchmarking
//!
//! Gantree: L8_Benchmark → Generators
//!
//! Structured and random workloads for the scheduler. Random generators
//! are reproducible when a seed is given.

use qsched_core::{Instruction, InstructionBuilder, InstructionList, OpKind, QubitId};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Instruction list generator for benchmarks
/// Gantree: InstructionGenerator // 명령 생성기
#[derive(Debug, Clone, Default)]
pub struct InstructionGenerator {
    /// Random seed
    seed: Option<u64>,
}

impl InstructionGenerator {
    /// Create new generator
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Create generator with seed
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    // ========================================================================
    // Structured Workloads
    // ========================================================================

    /// GHZ preparation: H then a CNOT chain
    /// Fully sequential on the chain, so the makespan is `n`
    pub fn ghz(&self, num_qubits: usize) -> InstructionList {
        InstructionBuilder::new(num_qubits).h(0).cx_chain().build()
    }

    /// QFT-shaped workload: H plus controlled phases, then reversal swaps
    ///
    /// Controlled phases are diagonal and commute with each other, which
    /// leaves the scheduler room to pack them.
    pub fn qft_like(&self, num_qubits: usize) -> InstructionList {
        let mut builder = InstructionBuilder::new(num_qubits);

        for i in 0..num_qubits {
            builder = builder.h(i);
            for j in (i + 1)..num_qubits {
                builder = builder.cphase(j, i);
            }
        }

        for i in 0..num_qubits / 2 {
            builder = builder.swap(i, num_qubits - 1 - i);
        }

        builder.build()
    }

    /// CNOTs from every other qubit onto qubit 0, each control followed by H
    ///
    /// The CNOTs share only their target and commute; program order is the
    /// worst order for the trailing H gates.
    pub fn commuting_fanout(&self, num_qubits: usize) -> InstructionList {
        let mut builder = InstructionBuilder::new(num_qubits).h(0);
        for c in 1..num_qubits {
            builder = builder.cnot(c, 0);
        }
        for c in 1..num_qubits {
            builder = builder.h(c);
        }
        builder.build()
    }

    /// Alternating Hadamard and CZ brickwork layers
    pub fn layered(&self, num_qubits: usize, layers: usize) -> InstructionList {
        let mut builder = InstructionBuilder::new(num_qubits);

        for layer in 0..layers {
            builder = builder.h_layer();
            let offset = layer % 2;
            let mut q = offset;
            while q + 1 < num_qubits {
                builder = builder.cz(q, q + 1);
                q += 2;
            }
        }

        builder.build()
    }

    // ========================================================================
    // Random Workloads
    // ========================================================================

    /// Random single-qubit layer plus random nearest-neighbour CNOTs, `depth` times
    pub fn random(&self, num_qubits: usize, depth: usize) -> InstructionList {
        let mut builder = InstructionBuilder::new(num_qubits);
        let mut rng = self.get_rng();

        for _ in 0..depth {
            for q in 0..num_qubits {
                builder = match rng.gen_range(0..6) {
                    0 => builder.h(q),
                    1 => builder.x(q),
                    2 => builder.y(q),
                    3 => builder.z(q),
                    4 => builder.rz(q),
                    _ => builder.sx(q),
                };
            }

            for q in 0..num_qubits.saturating_sub(1) {
                if rng.gen::<f64>() < 0.5 {
                    builder = builder.cnot(q, q + 1);
                }
            }
        }

        builder.build()
    }

    /// Random instructions with explicit durations drawn from `[0.5, max_duration]`
    /// in steps of 0.5
    pub fn timed_random(
        &self,
        num_qubits: usize,
        num_ops: usize,
        max_duration: f64,
    ) -> InstructionList {
        let mut rng = self.get_rng();
        let steps = ((max_duration / 0.5).floor() as u32).max(1);
        let mut builder = InstructionBuilder::new(num_qubits);

        for _ in 0..num_ops {
            let duration = rng.gen_range(1..=steps) as f64 * 0.5;
            let (a, b) = Self::distinct_pair(&mut rng, num_qubits);
            let instruction = match (rng.gen_range(0..4), b) {
                (0, Some(b)) => Instruction::controlled(OpKind::Cnot, vec![a], vec![b]),
                (1, Some(b)) => Instruction::new(OpKind::ISwap, vec![a, b]),
                (2, _) => Instruction::new(OpKind::Rz, vec![a]),
                _ => Instruction::new(OpKind::X, vec![a]),
            };
            builder = builder.push(instruction.with_duration(duration));
        }

        builder.build()
    }

    // ========================================================================
    // Scaling Sets
    // ========================================================================

    /// GHZ lists from 2 to `max_qubits` qubits
    pub fn qubit_scaling(&self, max_qubits: usize) -> Vec<InstructionList> {
        (2..=max_qubits).map(|n| self.ghz(n)).collect()
    }

    /// Random lists of growing depth
    pub fn depth_scaling(&self, num_qubits: usize, max_depth: usize) -> Vec<InstructionList> {
        (1..=max_depth).map(|d| self.random(num_qubits, d)).collect()
    }

    // ========================================================================
    // Utility
    // ========================================================================

    /// Get RNG with optional seed
    fn get_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn distinct_pair(rng: &mut StdRng, num_qubits: usize) -> (QubitId, Option<QubitId>) {
        let a = rng.gen_range(0..num_qubits);
        if num_qubits < 2 {
            return (a, None);
        }
        let mut b = rng.gen_range(0..num_qubits - 1);
        if b >= a {
            b += 1;
        }
        (a, Some(b))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghz() {
        let list = InstructionGenerator::new().ghz(5);
        assert_eq!(list.resource_count(), 5);
        assert_eq!(list.len(), 5);
        assert_eq!(list.count_multi_resource(), 4);
    }

    #[test]
    fn test_qft_like() {
        let list = InstructionGenerator::new().qft_like(4);
        // 4 H + 6 controlled phases + 2 swaps
        assert_eq!(list.len(), 12);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_commuting_fanout() {
        let list = InstructionGenerator::new().commuting_fanout(4);
        assert_eq!(list.len(), 1 + 3 + 3);
        assert_eq!(list.count_multi_resource(), 3);
    }

    #[test]
    fn test_layered() {
        let list = InstructionGenerator::new().layered(5, 2);
        // 2 × 5 H, then 2 CZ on even offset and 2 CZ on odd offset
        assert_eq!(list.len(), 14);
    }

    #[test]
    fn test_random_reproducibility() {
        let l1 = InstructionGenerator::with_seed(42).random(5, 3);
        let l2 = InstructionGenerator::with_seed(42).random(5, 3);
        assert_eq!(l1, l2);
        assert!(l1.len() >= 15);
    }

    #[test]
    fn test_timed_random() {
        let list = InstructionGenerator::with_seed(7).timed_random(4, 50, 3.0);
        assert_eq!(list.len(), 50);
        assert!(list.validate().is_ok());
        for instruction in list.instructions() {
            let d = instruction.duration.unwrap();
            assert!((0.5..=3.0).contains(&d));
        }
    }

    #[test]
    fn test_timed_random_single_qubit() {
        let list = InstructionGenerator::with_seed(1).timed_random(1, 20, 1.0);
        assert!(list.instructions().iter().all(|i| i.targets == vec![0]));
    }

    #[test]
    fn test_scaling_sets() {
        let gen = InstructionGenerator::with_seed(3);
        let lists = gen.qubit_scaling(6);
        assert_eq!(lists.len(), 5);
        for (i, l) in lists.iter().enumerate() {
            assert_eq!(l.resource_count(), i + 2);
        }
        assert_eq!(gen.depth_scaling(4, 3).len(), 3);
    }
}
