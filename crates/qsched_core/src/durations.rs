//! Duration tables for QSCHED
//!
//! Gantree: L1_Operation → DurationTable
//!
//! Resolves the duration of operations that carry no explicit one. The
//! default table gives every kind one cycle; hardware presets assign
//! per-kind durations in nanoseconds.

use crate::constants::timing::{superconducting_ns, trapped_ion_ns};
use crate::error::SchedResult;
use crate::kind::OpKind;
use crate::types::OpDuration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Per-kind duration table
/// Gantree: DurationTable // 연산 시간
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DurationTableRepr", into = "DurationTableRepr")]
pub struct DurationTable {
    /// Duration for kinds without an override
    /// Gantree: default: OpDuration // 기본값
    default: OpDuration,

    /// Per-kind overrides
    overrides: HashMap<OpKind, OpDuration>,
}

impl DurationTable {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Every kind takes `default`
    pub fn new(default: OpDuration) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    /// Unit-cycle table: every kind takes one cycle
    /// Gantree: unit() -> Self // 단위 시간
    pub fn unit() -> Self {
        Self::new(OpDuration::UNIT)
    }

    /// Superconducting processor timings (nanoseconds)
    pub fn superconducting() -> Self {
        let mut table = Self::new(OpDuration(superconducting_ns::SINGLE_QUBIT));

        for kind in [
            OpKind::Id,
            OpKind::Z,
            OpKind::S,
            OpKind::Sdg,
            OpKind::T,
            OpKind::Tdg,
            OpKind::Rz,
            OpKind::Phase,
        ] {
            table.set(kind, OpDuration(superconducting_ns::VIRTUAL_Z));
        }
        for kind in [
            OpKind::Cnot,
            OpKind::Cy,
            OpKind::Cz,
            OpKind::CPhase,
            OpKind::ISwap,
            OpKind::SqrtSwap,
            OpKind::SqrtISwap,
        ] {
            table.set(kind, OpDuration(superconducting_ns::TWO_QUBIT));
        }
        for kind in [OpKind::Crx, OpKind::Cry, OpKind::Crz] {
            table.set(kind, OpDuration(superconducting_ns::TWO_QUBIT * 2.0));
        }
        table.set(OpKind::Swap, OpDuration(superconducting_ns::SWAP));
        // Toffoli decomposes into six CNOTs, Fredkin into eight
        table.set(OpKind::Toffoli, OpDuration(superconducting_ns::TWO_QUBIT * 6.0));
        table.set(OpKind::Fredkin, OpDuration(superconducting_ns::TWO_QUBIT * 8.0));
        table.set(OpKind::Measure, OpDuration(superconducting_ns::MEASURE));
        table.set(OpKind::Reset, OpDuration(superconducting_ns::RESET));
        table
    }

    /// Trapped-ion processor timings (nanoseconds)
    pub fn trapped_ion() -> Self {
        let mut table = Self::new(OpDuration(trapped_ion_ns::SINGLE_QUBIT));
        for kind in OpKind::BUILTIN {
            let info = kind.info();
            if let Some((t, c)) = info.arity {
                if t + c >= 2 {
                    table.set(kind, OpDuration(trapped_ion_ns::TWO_QUBIT * (t + c - 1) as f64));
                }
            }
        }
        table.set(OpKind::Measure, OpDuration(trapped_ion_ns::MEASURE));
        table
    }

    // ========================================================================
    // Overrides
    // ========================================================================

    /// Set custom duration for a kind (builder style)
    pub fn with_duration(mut self, kind: OpKind, duration: f64) -> SchedResult<Self> {
        self.set(kind, OpDuration::new(duration)?);
        Ok(self)
    }

    /// Set custom duration for a kind
    pub fn set(&mut self, kind: OpKind, duration: OpDuration) {
        self.overrides.insert(kind, duration);
    }

    /// Remove an override, falling back to the default
    pub fn clear(&mut self, kind: OpKind) -> Option<OpDuration> {
        self.overrides.remove(&kind)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Duration for a kind
    /// Gantree: duration_for(&self,OpKind) -> OpDuration // 종류별 시간
    pub fn duration_for(&self, kind: OpKind) -> OpDuration {
        self.overrides.get(&kind).copied().unwrap_or(self.default)
    }

    /// Default duration
    pub fn default_duration(&self) -> OpDuration {
        self.default
    }

    /// Check whether every resolvable duration is a whole number of cycles
    pub fn is_integral(&self) -> bool {
        self.default.is_integral() && self.overrides.values().all(|d| d.is_integral())
    }

    // ========================================================================
    // JSON
    // ========================================================================

    /// Load from JSON
    pub fn from_json(json: &str) -> SchedResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> SchedResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for DurationTable {
    fn default() -> Self {
        Self::unit()
    }
}

impl fmt::Display for DurationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DurationTable(default={}, overrides={})",
            self.default,
            self.overrides.len()
        )
    }
}

// ============================================================================
// Serialized form
// ============================================================================

/// JSON shape: `{"default": 1.0, "overrides": [{"kind": "cnot", "duration": 3.5}]}`
#[derive(Serialize, Deserialize)]
struct DurationTableRepr {
    default: OpDuration,
    #[serde(default)]
    overrides: Vec<DurationEntry>,
}

#[derive(Serialize, Deserialize)]
struct DurationEntry {
    kind: OpKind,
    duration: OpDuration,
}

impl From<DurationTableRepr> for DurationTable {
    fn from(repr: DurationTableRepr) -> Self {
        Self {
            default: repr.default,
            overrides: repr
                .overrides
                .into_iter()
                .map(|e| (e.kind, e.duration))
                .collect(),
        }
    }
}

impl From<DurationTable> for DurationTableRepr {
    fn from(table: DurationTable) -> Self {
        let mut overrides: Vec<DurationEntry> = table
            .overrides
            .into_iter()
            .map(|(kind, duration)| DurationEntry { kind, duration })
            .collect();
        overrides.sort_by_key(|e| e.kind);
        Self {
            default: table.default,
            overrides,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_table() {
        let table = DurationTable::default();
        assert_eq!(table.duration_for(OpKind::X).value(), 1.0);
        assert_eq!(table.duration_for(OpKind::ISwap).value(), 1.0);
        assert!(table.is_integral());
    }

    #[test]
    fn test_override() {
        let table = DurationTable::unit()
            .with_duration(OpKind::ISwap, 3.5)
            .unwrap();
        assert_relative_eq!(table.duration_for(OpKind::ISwap).value(), 3.5);
        assert_relative_eq!(table.duration_for(OpKind::X).value(), 1.0);
        assert!(!table.is_integral());
    }

    #[test]
    fn test_override_rejects_negative() {
        assert!(DurationTable::unit().with_duration(OpKind::X, -0.5).is_err());
    }

    #[test]
    fn test_clear_override() {
        let mut table = DurationTable::unit().with_duration(OpKind::H, 2.0).unwrap();
        assert!(table.clear(OpKind::H).is_some());
        assert_eq!(table.duration_for(OpKind::H), OpDuration::UNIT);
    }

    #[test]
    fn test_superconducting_preset() {
        let table = DurationTable::superconducting();
        assert_relative_eq!(table.duration_for(OpKind::H).value(), 35.0);
        assert_relative_eq!(table.duration_for(OpKind::Rz).value(), 0.0);
        assert_relative_eq!(table.duration_for(OpKind::Cnot).value(), 300.0);
        assert_relative_eq!(table.duration_for(OpKind::Toffoli).value(), 1800.0);
    }

    #[test]
    fn test_trapped_ion_slower() {
        let ion = DurationTable::trapped_ion();
        let sc = DurationTable::superconducting();
        assert!(ion.duration_for(OpKind::Cnot).value() > sc.duration_for(OpKind::Cnot).value() * 100.0);
        assert!(ion.duration_for(OpKind::Toffoli) > ion.duration_for(OpKind::Cnot));
    }

    #[test]
    fn test_json_roundtrip() {
        let table = DurationTable::unit()
            .with_duration(OpKind::Custom(4), 12.0)
            .unwrap();
        let json = table.to_json().unwrap();
        let back = DurationTable::from_json(&json).unwrap();
        assert_eq!(table, back);
    }
}
