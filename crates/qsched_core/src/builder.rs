//! Instruction builder for QSCHED
//!
//! Gantree: L1_Operation → InstructionBuilder
//!
//! Fluent builder for instruction lists. Rotation angles do not affect
//! scheduling, so rotation helpers only take the qubit.
//!
//! ```rust
//! use qsched_core::InstructionBuilder;
//!
//! let list = InstructionBuilder::new(3)
//!     .h(0)
//!     .cnot(0, 1)
//!     .cnot(1, 2)
//!     .build();
//!
//! assert_eq!(list.len(), 3);
//! ```

use crate::error::{SchedError, SchedResult};
use crate::kind::OpKind;
use crate::list::InstructionList;
use crate::operation::Instruction;
use crate::types::QubitId;

/// Fluent instruction builder (consuming self pattern)
/// Gantree: InstructionBuilder // 빌더 패턴
pub struct InstructionBuilder {
    /// Internal list being built
    list: InstructionList,

    /// First rejected instruction, reported by `build_validated`
    error: Option<SchedError>,
}

impl InstructionBuilder {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create a new builder over `num_qubits` resources
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            list: InstructionList::new(num_qubits),
            error: None,
        }
    }

    /// Append any instruction
    pub fn push(mut self, instruction: Instruction) -> Self {
        if let Err(e) = self.list.push(instruction) {
            self.error.get_or_insert(e);
        }
        self
    }

    fn single(self, kind: OpKind, qubit: QubitId) -> Self {
        self.push(Instruction::new(kind, vec![qubit]))
    }

    fn controlled(self, kind: OpKind, control: QubitId, target: QubitId) -> Self {
        self.push(Instruction::controlled(kind, vec![control], vec![target]))
    }

    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================

    /// Add Pauli-X gate
    pub fn x(self, qubit: QubitId) -> Self {
        self.single(OpKind::X, qubit)
    }

    /// Add Pauli-Y gate
    pub fn y(self, qubit: QubitId) -> Self {
        self.single(OpKind::Y, qubit)
    }

    /// Add Pauli-Z gate
    pub fn z(self, qubit: QubitId) -> Self {
        self.single(OpKind::Z, qubit)
    }

    /// Add Hadamard gate
    /// Gantree: h(self, q) -> Self // H 추가
    pub fn h(self, qubit: QubitId) -> Self {
        self.single(OpKind::H, qubit)
    }

    /// Add S gate
    pub fn s(self, qubit: QubitId) -> Self {
        self.single(OpKind::S, qubit)
    }

    /// Add T gate
    pub fn t(self, qubit: QubitId) -> Self {
        self.single(OpKind::T, qubit)
    }

    /// Add SX gate
    pub fn sx(self, qubit: QubitId) -> Self {
        self.single(OpKind::Sx, qubit)
    }

    /// Add Rx rotation
    pub fn rx(self, qubit: QubitId) -> Self {
        self.single(OpKind::Rx, qubit)
    }

    /// Add Ry rotation
    pub fn ry(self, qubit: QubitId) -> Self {
        self.single(OpKind::Ry, qubit)
    }

    /// Add Rz rotation
    pub fn rz(self, qubit: QubitId) -> Self {
        self.single(OpKind::Rz, qubit)
    }

    // ========================================================================
    // Multi-Qubit Gates
    // ========================================================================

    /// Add CNOT gate
    /// Gantree: cnot(self, c, t) -> Self // CNOT 추가
    pub fn cnot(self, control: QubitId, target: QubitId) -> Self {
        self.controlled(OpKind::Cnot, control, target)
    }

    /// Alias for cnot
    pub fn cx(self, control: QubitId, target: QubitId) -> Self {
        self.cnot(control, target)
    }

    /// Add CZ gate
    pub fn cz(self, control: QubitId, target: QubitId) -> Self {
        self.controlled(OpKind::Cz, control, target)
    }

    /// Add controlled phase gate
    pub fn cphase(self, control: QubitId, target: QubitId) -> Self {
        self.controlled(OpKind::CPhase, control, target)
    }

    /// Add SWAP gate
    pub fn swap(self, a: QubitId, b: QubitId) -> Self {
        self.push(Instruction::new(OpKind::Swap, vec![a, b]))
    }

    /// Add iSWAP gate
    pub fn iswap(self, a: QubitId, b: QubitId) -> Self {
        self.push(Instruction::new(OpKind::ISwap, vec![a, b]))
    }

    /// Add Toffoli gate
    pub fn toffoli(self, c1: QubitId, c2: QubitId, target: QubitId) -> Self {
        self.push(Instruction::controlled(
            OpKind::Toffoli,
            vec![c1, c2],
            vec![target],
        ))
    }

    // ========================================================================
    // Non-Unitary and Timed Instructions
    // ========================================================================

    /// Add measurement
    pub fn measure(self, qubit: QubitId) -> Self {
        self.single(OpKind::Measure, qubit)
    }

    /// Measure every qubit
    pub fn measure_all(mut self) -> Self {
        for q in 0..self.list.resource_count() {
            self = self.measure(q);
        }
        self
    }

    /// Idle `qubits` for `duration`
    pub fn delay(self, qubits: Vec<QubitId>, duration: f64) -> Self {
        self.push(Instruction::new(OpKind::Delay, qubits).with_duration(duration))
    }

    /// Add a timed instruction of an externally defined kind
    pub fn timed(
        self,
        id: u32,
        targets: Vec<QubitId>,
        controls: Vec<QubitId>,
        duration: f64,
    ) -> Self {
        self.push(
            Instruction::controlled(OpKind::Custom(id), controls, targets).with_duration(duration),
        )
    }

    // ========================================================================
    // Layers
    // ========================================================================

    /// Hadamard on every qubit
    pub fn h_layer(mut self) -> Self {
        for q in 0..self.list.resource_count() {
            self = self.h(q);
        }
        self
    }

    /// CNOT chain 0→1→…→n-1
    pub fn cx_chain(mut self) -> Self {
        for q in 1..self.list.resource_count() {
            self = self.cnot(q - 1, q);
        }
        self
    }

    /// CNOT fan-out from one control onto every other qubit
    pub fn cx_fanout(mut self, control: QubitId) -> Self {
        for q in 0..self.list.resource_count() {
            if q != control {
                self = self.cnot(control, q);
            }
        }
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build and return the list, silently skipping rejected instructions
    /// Gantree: build(self) -> InstructionList // 빌드
    pub fn build(self) -> InstructionList {
        self.list
    }

    /// Build, reporting the first rejected instruction
    pub fn build_validated(self) -> SchedResult<InstructionList> {
        match self.error {
            Some(e) => Err(e),
            None => {
                self.list.validate()?;
                Ok(self.list)
            }
        }
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.list.resource_count()
    }
}

// ============================================================================
// Tests
// ============================================================================
