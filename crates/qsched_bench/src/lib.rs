//! # QSCHED Bench
//!
//! Workload generators and benchmarking for the scheduler.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qsched_bench // L8: Benchmark
//!     L8_Benchmark // 벤치마크
//!         InstructionGenerator // 워크로드 생성
//!         BenchSuite // 실행 + 통계
//!         Reporter // Markdown/JSON/CSV/Text
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qsched_bench::prelude::*;
//!
//! let mut suite = BenchSuite::with_seed(42);
//! let results = suite.run_quick().unwrap();
//!
//! let report = Reporter::to_markdown(&results);
//! println!("{}", report);
//! ```
//!
//! ## Workload Generation
//!
//! ```rust
//! use qsched_bench::prelude::*;
//!
//! let gen = InstructionGenerator::with_seed(42);
//!
//! let ghz = gen.ghz(5);
//! let qft = gen.qft_like(4);
//! let fanout = gen.commuting_fanout(6);
//! let timed = gen.timed_random(8, 100, 3.0);
//!
//! assert_eq!(ghz.len(), 5);
//! assert_eq!(timed.len(), 100);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Instruction generators (Gantree: L8_Benchmark → Generators)
pub mod generators;

/// Benchmark suite (Gantree: L8_Benchmark → BenchSuite)
pub mod suite;

/// Reporting (Gantree: L8_Benchmark → Reporter)
pub mod reporter;

// ============================================================================
// Re-exports
// ============================================================================

pub use generators::InstructionGenerator;
pub use reporter::{ReportFormat, Reporter};
pub use suite::{BenchSuite, BenchmarkResult, BenchmarkStatistics};

// ============================================================================
// Prelude
// ============================================================================

// Convenient imports below
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qsched_bench::prelude::*;
    //! ```

    pub use crate::generators::InstructionGenerator;
    pub use crate::reporter::{ReportFormat, Reporter};
    pub use crate::suite::{BenchSuite, BenchmarkResult, BenchmarkStatistics};
}

// ============================================================================
// Integration Tests
// ============================================================================
