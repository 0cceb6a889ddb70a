//! # QSCHED Core
//!
//! Operation kinds, resource model, durations and commutation rules for
//! the QSCHED quantum operation scheduler.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qsched_core // L0+L1+L2: Foundation + Operation + Commutation
//!     L0_Foundation // 기반 타입/상수/에러
//!         CoreTypes // 핵심 타입
//!         Constants // 시간/검색 상수
//!         Errors // 에러 타입
//!     L1_Operation // 연산 구조
//!         OpKind // 연산 종류 enum
//!         ResourceModel // 자원 모델
//!         DurationTable // 연산 시간
//!         InstructionList // 입력 목록
//!         InstructionBuilder // 빌더 패턴
//!     L2_Commutation // 교환 규칙
//!         CommutationTable // 규칙 표
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qsched_core::prelude::*;
//!
//! let list = InstructionBuilder::new(3)
//!     .h(0)
//!     .cnot(1, 0)
//!     .cnot(2, 0)
//!     .h(2)
//!     .build();
//!
//! let ops = list.resolve(&DurationTable::unit()).unwrap();
//! let table = CommutationTable::standard();
//!
//! // CNOTs sharing only their target commute
//! assert!(table.commutes(&ops[1], &ops[2]));
//! assert!(!table.commutes(&ops[0], &ops[1]));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Operation kinds (Gantree: L1_Operation → OpKind)
pub mod kind;

/// Instructions and resource model (Gantree: L1_Operation → ResourceModel)
pub mod operation;

/// Duration tables (Gantree: L1_Operation → DurationTable)
pub mod durations;

/// Instruction lists (Gantree: L1_Operation → InstructionList)
pub mod list;

/// Instruction builder (Gantree: L1_Operation → InstructionBuilder)
pub mod builder;

/// Commutation rules (Gantree: L2_Commutation → CommutationTable)
pub mod commutation;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::InstructionBuilder;
pub use commutation::{CommutationRule, CommutationTable, Overlap, RolePair, SharedResource};
pub use constants::{search, timing};
pub use durations::DurationTable;
pub use error::{SchedError, SchedResult};
pub use kind::{Axis, KindInfo, OpKind};
pub use list::InstructionList;
pub use operation::{resolve_all, Instruction, Operation, ResourceSet};
pub use types::{OpDuration, OpIndex, QubitId, ResourceId, Role, Time};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qsched_core::prelude::*;
    //! ```

    pub use crate::builder::InstructionBuilder;
    pub use crate::commutation::{CommutationRule, CommutationTable, Overlap};
    pub use crate::durations::DurationTable;
    pub use crate::error::{SchedError, SchedResult};
    pub use crate::kind::{Axis, OpKind};
    pub use crate::list::InstructionList;
    pub use crate::operation::{Instruction, Operation, ResourceSet};
    pub use crate::types::{OpDuration, OpIndex, QubitId, ResourceId, Role, Time};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_resolve_scenario_circuit() {
        let list = InstructionBuilder::new(3)
            .x(0)
            .iswap(1, 2)
            .x(2)
            .y(0)
            .x(0)
            .build();

        let ops = list.resolve(&DurationTable::unit()).unwrap();
        assert_eq!(ops.len(), 5);
        assert_eq!(ops[1].resources().ids(), &[1, 2]);
        assert!(ops.iter().all(|op| op.duration() == 1.0));
        assert!(ops.iter().enumerate().all(|(i, op)| op.id() == i));
    }

    #[test]
    fn test_resolve_with_duration_table() {
        let durations = DurationTable::unit()
            .with_duration(OpKind::ISwap, 3.5)
            .unwrap();
        let list = InstructionBuilder::new(3).x(0).iswap(1, 2).build();
        let ops = list.resolve(&durations).unwrap();
        assert_eq!(ops[0].duration(), 1.0);
        assert_eq!(ops[1].duration(), 3.5);
    }

    #[test]
    fn test_commutation_over_whole_list() {
        let list = InstructionBuilder::new(4).cx_fanout(0).build();
        let ops = list.resolve(&DurationTable::unit()).unwrap();
        let table = CommutationTable::standard();

        // Shared control only: every pair commutes
        for a in &ops {
            for b in &ops {
                assert!(table.commutes(a, b));
            }
        }
    }

    #[test]
    fn test_out_of_range_is_invalid_operation() {
        let list = InstructionList::from_instructions(
            2,
            vec![Instruction::controlled(OpKind::Cnot, vec![0], vec![2])],
        );
        assert!(matches!(
            list,
            Err(SchedError::InvalidOperation { index: 0, .. })
        ));
    }
}
