//! Error types for QSCHED
//!
//! Gantree: L0_Foundation → Errors
//!
//! Every error aborts the scheduling call that raised it. None of them is
//! retried, and the search driver never masks one behind another trial.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QSCHED
/// Gantree: SchedError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedError {
    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Operation with an empty or out-of-range resource set
    /// Gantree: InvalidOperation{{index,reason}} // 잘못된 연산
    #[error("Invalid operation at index {index}: {reason}")]
    InvalidOperation { index: usize, reason: String },

    /// Duration that is negative or not finite
    #[error("Invalid duration {0}: must be finite and >= 0")]
    InvalidDuration(f64),

    // ========================================================================
    // Graph / Scheduling Errors
    // ========================================================================
    /// Dependency graph contains a cycle
    /// Gantree: CyclicDependency{{unresolved}} // 순환 의존성
    #[error("Cyclic dependency: {unresolved} operations could not be ordered")]
    CyclicDependency { unresolved: usize },

    /// Ready set empty while operations remain unscheduled
    /// Gantree: SchedulerStalled{{scheduled,total}} // 스케줄러 정지
    #[error("Scheduler stalled after {scheduled} of {total} operations")]
    SchedulerStalled { scheduled: usize, total: usize },

    /// A produced schedule violates exclusivity or precedence
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Scheduler configuration error
    #[error("Scheduler configuration error: {0}")]
    InvalidConfig(String),

    /// Malformed commutation rule
    #[error("Invalid commutation rule: {0}")]
    InvalidRule(String),

    /// Unknown operation kind name
    #[error("Unknown operation kind '{0}'")]
    UnknownKind(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for QSCHED operations
/// Gantree: SchedResult<T> // type alias
pub type SchedResult<T> = Result<T, SchedError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for SchedError {
    fn from(err: serde_json::Error) -> Self {
        SchedError::JsonError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl SchedError {
    /// Shorthand for [`SchedError::InvalidOperation`]
    pub fn invalid_operation(index: usize, reason: impl Into<String>) -> Self {
        SchedError::InvalidOperation {
            index,
            reason: reason.into(),
        }
    }

    /// Check if error was caused by malformed input operations
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SchedError::InvalidOperation { .. } | SchedError::InvalidDuration(_)
        )
    }

    /// Check if error points at a bad configuration or rule table
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SchedError::CyclicDependency { .. }
                | SchedError::InvalidConfig(_)
                | SchedError::InvalidRule(_)
                | SchedError::UnknownKind(_)
                | SchedError::JsonError(_)
        )
    }

    /// Check if error is an internal invariant violation
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SchedError::SchedulerStalled { .. }
                | SchedError::InvalidSchedule(_)
                | SchedError::InternalError(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchedError::invalid_operation(3, "empty resource set");
        let msg = err.to_string();
        assert!(msg.contains("index 3"));
        assert!(msg.contains("empty resource set"));
    }

    #[test]
    fn test_cyclic_display() {
        let err = SchedError::CyclicDependency { unresolved: 4 };
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_classification() {
        assert!(SchedError::invalid_operation(0, "x").is_input_error());
        assert!(SchedError::InvalidDuration(-1.0).is_input_error());
        assert!(SchedError::CyclicDependency { unresolved: 2 }.is_configuration_error());
        assert!(SchedError::SchedulerStalled {
            scheduled: 1,
            total: 2
        }
        .is_internal());
        assert!(!SchedError::InvalidConfig("x".into()).is_input_error());
    }

    #[test]
    fn test_from_json_error() {
        let err: SchedError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SchedError::JsonError(_)));
    }
}
