//! # QSCHED Schedule
//!
//! Dependency graphs, list scheduling and randomized search for quantum
//! operation lists.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qsched_schedule // L3+L4: Graph + Scheduling
//!     L3_Graph // 의존성 그래프
//!         DependencyGraph // must-precede DAG
//!     L4_Scheduling // 스케줄링
//!         SchedulerConfig // 모드/탐색 설정
//!         ListScheduler // earliest/latest 리스트 스케줄링
//!         SearchDriver // 무작위 재시작
//!         Schedule // 결과 + 분석
//!         Scheduler // 파이프라인
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qsched_schedule::prelude::*;
//! use qsched_core::InstructionBuilder;
//!
//! let list = InstructionBuilder::new(3)
//!     .x(0)
//!     .iswap(1, 2)
//!     .x(2)
//!     .y(0)
//!     .x(0)
//!     .build();
//!
//! let schedule = Scheduler::new().schedule_list(&list).unwrap();
//! assert_eq!(schedule.cycles(), Some(vec![0, 0, 1, 1, 2]));
//! println!("{}", schedule);
//! ```
//!
//! ## Randomized Search
//!
//! ```rust
//! use qsched_schedule::prelude::*;
//! use qsched_core::InstructionBuilder;
//!
//! let list = InstructionBuilder::new(3)
//!     .h(0)
//!     .cnot(1, 0)
//!     .cnot(2, 0)
//!     .h(2)
//!     .build();
//!
//! let config = SchedulerConfig::randomized(SchedulingMode::Latest, 16, 42);
//! let outcome = Scheduler::new()
//!     .with_config(config)
//!     .search(list.instructions(), list.resource_count())
//!     .unwrap();
//!
//! assert_eq!(outcome.trials_run, 16);
//! assert_eq!(outcome.makespan(), 3.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Scheduler configuration (Gantree: L4_Scheduling → SchedulerConfig)
pub mod config;

/// Dependency graph (Gantree: L3_Graph → DependencyGraph)
pub mod dag;

/// Time-tagged operations (Gantree: L4_Scheduling → ScheduledOp)
pub mod scheduled_op;

/// Schedule output (Gantree: L4_Scheduling → Schedule)
pub mod schedule;

/// List scheduler (Gantree: L4_Scheduling → ListScheduler)
pub mod list_scheduler;

/// Randomized search (Gantree: L4_Scheduling → SearchDriver)
pub mod search;

/// Pipeline facade (Gantree: L4_Scheduling → Scheduler)
pub mod scheduler;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{SchedulerConfig, SchedulingMode};
pub use dag::DependencyGraph;
pub use list_scheduler::{ListScheduler, OpState, TieBreak};
pub use schedule::Schedule;
pub use scheduled_op::{ScheduledOp, TimeSlot};
pub use scheduler::Scheduler;
pub use search::{SearchDriver, SearchOutcome};

// ============================================================================
// Prelude
// ============================================================================

// Convenient imports below
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qsched_schedule::prelude::*;
    //! ```

    pub use crate::config::{SchedulerConfig, SchedulingMode};
    pub use crate::dag::DependencyGraph;
    pub use crate::list_scheduler::{ListScheduler, TieBreak};
    pub use crate::schedule::Schedule;
    pub use crate::scheduled_op::{ScheduledOp, TimeSlot};
    pub use crate::scheduler::Scheduler;
    pub use crate::search::{SearchDriver, SearchOutcome};
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
