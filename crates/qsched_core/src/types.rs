//! Core types for QSCHED
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Provides fundamental type aliases and validated wrapper types
//! used throughout the scheduler.

use crate::error::{SchedError, SchedResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Exclusively-lockable resource identifier (0-indexed)
/// Gantree: ResourceId // pub type ResourceId = usize
pub type ResourceId = usize;

/// Qubit identifier; qubits are the resources being scheduled
pub type QubitId = ResourceId;

/// Position of an operation in the original sequence
/// Gantree: OpIndex // pub type OpIndex = usize
pub type OpIndex = usize;

/// Point in time or time span (cycles for unit durations)
pub type Time = f64;

// ============================================================================
// OpDuration (Validated Wrapper)
// ============================================================================

/// Operation duration, finite and non-negative
/// Gantree: OpDuration // 범위 검증 구조체
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct OpDuration(pub(crate) f64);

impl OpDuration {
    /// Create a new duration with validation
    /// Gantree: new(f64) -> Result<Self> // 생성+검증
    pub fn new(value: f64) -> SchedResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(SchedError::InvalidDuration(value));
        }
        Ok(Self(value))
    }

    /// Get the duration value
    #[inline]
    pub fn value(&self) -> Time {
        self.0
    }

    /// Check whether the duration is a whole number of cycles
    pub fn is_integral(&self) -> bool {
        self.0.fract() == 0.0
    }

    /// Zero-length duration (virtual gates)
    pub const ZERO: Self = Self(0.0);

    /// Default duration of one cycle
    pub const UNIT: Self = Self(1.0);
}

impl TryFrom<f64> for OpDuration {
    type Error = SchedError;

    fn try_from(value: f64) -> SchedResult<Self> {
        Self::new(value)
    }
}

impl From<OpDuration> for f64 {
    fn from(d: OpDuration) -> Self {
        d.0
    }
}

impl Default for OpDuration {
    fn default() -> Self {
        Self::UNIT
    }
}

impl fmt::Display for OpDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Role
// ============================================================================

/// Role a resource plays inside an operation
/// Gantree: Role // 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Resource acted upon
    Target,
    /// Resource conditioning the action
    Control,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Target => write!(f, "target"),
            Role::Control => write!(f, "control"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_valid() {
        assert_eq!(OpDuration::new(3.5).unwrap().value(), 3.5);
        assert_eq!(OpDuration::new(0.0).unwrap(), OpDuration::ZERO);
    }

    #[test]
    fn test_duration_invalid() {
        assert!(OpDuration::new(-1.0).is_err());
        assert!(OpDuration::new(f64::NAN).is_err());
        assert!(OpDuration::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_duration_integral() {
        assert!(OpDuration::UNIT.is_integral());
        assert!(!OpDuration::new(3.5).unwrap().is_integral());
    }

    #[test]
    fn test_duration_serde_rejects_negative() {
        let ok: OpDuration = serde_json::from_str("2.0").unwrap();
        assert_eq!(ok.value(), 2.0);
        assert!(serde_json::from_str::<OpDuration>("-2.0").is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Target.to_string(), "target");
        assert_eq!(Role::Control.to_string(), "control");
    }
}
