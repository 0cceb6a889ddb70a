//! Constants for QSCHED
//!
//! Gantree: L0_Foundation → Constants
//!
//! Timing defaults, hardware timing presets and search defaults.

// ============================================================================
// Timing Constants
// Gantree: timing // 시간 상수
// ============================================================================

pub mod timing {
    //! Timing constants shared by duration tables and schedules

    /// Default duration of a plain gate (one cycle)
    /// Gantree: UNIT_DURATION: f64 = 1.0
    pub const UNIT_DURATION: f64 = 1.0;

    /// Tolerance used when checking produced schedules
    /// Gantree: TIME_EPSILON: f64 = 1e-9
    pub const TIME_EPSILON: f64 = 1e-9;

    /// Superconducting hardware presets in nanoseconds
    pub mod superconducting_ns {
        /// Physical single-qubit pulse (SX, X, H)
        pub const SINGLE_QUBIT: f64 = 35.0;
        /// Virtual Z rotation
        pub const VIRTUAL_Z: f64 = 0.0;
        /// Cross-resonance two-qubit gate
        pub const TWO_QUBIT: f64 = 300.0;
        /// SWAP (three CNOTs)
        pub const SWAP: f64 = 900.0;
        /// Readout
        pub const MEASURE: f64 = 5000.0;
        /// Active reset
        pub const RESET: f64 = 1000.0;
    }

    /// Trapped-ion hardware presets in nanoseconds
    pub mod trapped_ion_ns {
        /// Single-qubit Raman pulse
        pub const SINGLE_QUBIT: f64 = 10_000.0;
        /// Molmer-Sorensen gate
        pub const TWO_QUBIT: f64 = 200_000.0;
        /// Fluorescence readout
        pub const MEASURE: f64 = 100_000.0;
    }
}

// ============================================================================
// Search Constants
// Gantree: search // 검색 상수
// ============================================================================

pub mod search {
    //! Defaults for the randomized search driver

    /// Default number of scheduling trials
    pub const DEFAULT_REPEAT_NUM: usize = 1;

    /// Upper bound accepted for the repeat count
    pub const MAX_REPEAT_NUM: usize = 1_000_000;

    /// Check whether a repeat count is accepted
    pub fn is_valid_repeat_num(n: usize) -> bool {
        (1..=MAX_REPEAT_NUM).contains(&n)
    }
}

// ============================================================================
// Tests
// ============================================================================
