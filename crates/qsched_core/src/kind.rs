//! Operation kinds for QSCHED
//!
//! Gantree: L1_Operation → OpKind
//!
//! Closed enumeration of the operation kinds the scheduler understands,
//! with a static metadata table (name, arity, commutation axis). Rule
//! tables and duration tables are keyed by these tags, so no string
//! matching happens while scheduling.

use crate::error::{SchedError, SchedResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation kind tag
/// Gantree: OpKind // 연산 종류 enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================
    /// Identity
    Id,
    /// Pauli-X
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z
    Z,
    /// Hadamard
    H,
    /// S gate (sqrt(Z))
    S,
    /// S-dagger
    Sdg,
    /// T gate (fourth root of Z)
    T,
    /// T-dagger
    Tdg,
    /// SX gate (sqrt(X))
    Sx,
    /// SX-dagger
    Sxdg,
    /// Rotation around X
    Rx,
    /// Rotation around Y
    Ry,
    /// Rotation around Z
    Rz,
    /// Phase gate diag(1, e^{iλ})
    Phase,

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Controlled-NOT
    Cnot,
    /// Controlled-Y
    Cy,
    /// Controlled-Z
    Cz,
    /// Controlled phase
    CPhase,
    /// Controlled Rx
    Crx,
    /// Controlled Ry
    Cry,
    /// Controlled Rz
    Crz,
    /// SWAP
    Swap,
    /// iSWAP
    ISwap,
    /// sqrt(SWAP)
    SqrtSwap,
    /// sqrt(iSWAP)
    SqrtISwap,

    // ========================================================================
    // Three-Qubit Gates
    // ========================================================================
    /// Toffoli (CCX)
    Toffoli,
    /// Controlled-SWAP
    Fredkin,

    // ========================================================================
    // Non-Unitary and Timed Instructions
    // ========================================================================
    /// Measurement
    Measure,
    /// Reset to |0⟩
    Reset,
    /// Idle for an explicit duration
    Delay,
    /// Externally defined timed instruction
    Custom(u32),
}

/// Commutation group of a kind: the Pauli axis it is a function of
/// Gantree: Axis // 교환 그룹
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Functions of Pauli-X
    X,
    /// Functions of Pauli-Y
    Y,
    /// Diagonal in the computational basis
    Z,
}

/// Static metadata for a kind
/// Gantree: KindInfo // 메타데이터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// Canonical lowercase name
    pub name: &'static str,
    /// Expected (targets, controls); `None` accepts any shape
    pub arity: Option<(usize, usize)>,
    /// Commutation group, if any
    pub axis: Option<Axis>,
}

impl KindInfo {
    const fn new(name: &'static str, targets: usize, controls: usize, axis: Option<Axis>) -> Self {
        Self {
            name,
            arity: Some((targets, controls)),
            axis,
        }
    }

    const fn free(name: &'static str) -> Self {
        Self {
            name,
            arity: None,
            axis: None,
        }
    }
}

impl OpKind {
    /// Every built-in kind (everything except [`OpKind::Custom`])
    pub const BUILTIN: [OpKind; 31] = [
        OpKind::Id,
        OpKind::X,
        OpKind::Y,
        OpKind::Z,
        OpKind::H,
        OpKind::S,
        OpKind::Sdg,
        OpKind::T,
        OpKind::Tdg,
        OpKind::Sx,
        OpKind::Sxdg,
        OpKind::Rx,
        OpKind::Ry,
        OpKind::Rz,
        OpKind::Phase,
        OpKind::Cnot,
        OpKind::Cy,
        OpKind::Cz,
        OpKind::CPhase,
        OpKind::Crx,
        OpKind::Cry,
        OpKind::Crz,
        OpKind::Swap,
        OpKind::ISwap,
        OpKind::SqrtSwap,
        OpKind::SqrtISwap,
        OpKind::Toffoli,
        OpKind::Fredkin,
        OpKind::Measure,
        OpKind::Reset,
        OpKind::Delay,
    ];

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Static metadata for this kind
    /// Gantree: info(&self) -> KindInfo // 메타데이터 조회
    pub fn info(&self) -> KindInfo {
        use Axis::{X as AX, Y as AY, Z as AZ};

        match self {
            OpKind::Id => KindInfo::new("id", 1, 0, None),
            OpKind::X => KindInfo::new("x", 1, 0, Some(AX)),
            OpKind::Y => KindInfo::new("y", 1, 0, Some(AY)),
            OpKind::Z => KindInfo::new("z", 1, 0, Some(AZ)),
            OpKind::H => KindInfo::new("h", 1, 0, None),
            OpKind::S => KindInfo::new("s", 1, 0, Some(AZ)),
            OpKind::Sdg => KindInfo::new("sdg", 1, 0, Some(AZ)),
            OpKind::T => KindInfo::new("t", 1, 0, Some(AZ)),
            OpKind::Tdg => KindInfo::new("tdg", 1, 0, Some(AZ)),
            OpKind::Sx => KindInfo::new("sx", 1, 0, Some(AX)),
            OpKind::Sxdg => KindInfo::new("sxdg", 1, 0, Some(AX)),
            OpKind::Rx => KindInfo::new("rx", 1, 0, Some(AX)),
            OpKind::Ry => KindInfo::new("ry", 1, 0, Some(AY)),
            OpKind::Rz => KindInfo::new("rz", 1, 0, Some(AZ)),
            OpKind::Phase => KindInfo::new("phase", 1, 0, Some(AZ)),
            OpKind::Cnot => KindInfo::new("cnot", 1, 1, None),
            OpKind::Cy => KindInfo::new("cy", 1, 1, None),
            OpKind::Cz => KindInfo::new("cz", 1, 1, Some(AZ)),
            OpKind::CPhase => KindInfo::new("cphase", 1, 1, Some(AZ)),
            OpKind::Crx => KindInfo::new("crx", 1, 1, None),
            OpKind::Cry => KindInfo::new("cry", 1, 1, None),
            OpKind::Crz => KindInfo::new("crz", 1, 1, Some(AZ)),
            OpKind::Swap => KindInfo::new("swap", 2, 0, None),
            OpKind::ISwap => KindInfo::new("iswap", 2, 0, None),
            OpKind::SqrtSwap => KindInfo::new("sqrtswap", 2, 0, None),
            OpKind::SqrtISwap => KindInfo::new("sqrtiswap", 2, 0, None),
            OpKind::Toffoli => KindInfo::new("toffoli", 1, 2, None),
            OpKind::Fredkin => KindInfo::new("fredkin", 2, 1, None),
            OpKind::Measure => KindInfo::new("measure", 1, 0, None),
            OpKind::Reset => KindInfo::new("reset", 1, 0, None),
            OpKind::Delay => KindInfo::free("delay"),
            OpKind::Custom(_) => KindInfo::free("custom"),
        }
    }

    /// Canonical name
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Commutation axis, if any
    pub fn axis(&self) -> Option<Axis> {
        self.info().axis
    }

    /// Check if kind is diagonal in the computational basis
    pub fn is_diagonal(&self) -> bool {
        self.axis() == Some(Axis::Z)
    }

    /// Check if kind carries control resources
    pub fn is_controlled(&self) -> bool {
        matches!(self.info().arity, Some((_, c)) if c > 0)
    }

    /// Check if kind acts on exactly one resource
    pub fn is_single_qubit(&self) -> bool {
        self.info().arity == Some((1, 0))
    }

    /// Check if kind is externally defined
    pub fn is_custom(&self) -> bool {
        matches!(self, OpKind::Custom(_))
    }

    // ========================================================================
    // Parsing (configuration boundary only)
    // ========================================================================

    /// Parse a kind from its canonical name or a common alias
    ///
    /// Accepts `custom:<n>` for externally defined kinds.
    pub fn parse(s: &str) -> SchedResult<Self> {
        let lower = s.trim().to_lowercase();

        if let Some(id) = lower.strip_prefix("custom:") {
            return id
                .parse::<u32>()
                .map(OpKind::Custom)
                .map_err(|_| SchedError::UnknownKind(s.to_string()));
        }

        let alias = match lower.as_str() {
            "i" => Some(OpKind::Id),
            "snot" | "hadamard" => Some(OpKind::H),
            "cx" => Some(OpKind::Cnot),
            "cp" | "csign" => Some(OpKind::CPhase),
            "p" => Some(OpKind::Phase),
            "ccx" => Some(OpKind::Toffoli),
            "cswap" => Some(OpKind::Fredkin),
            _ => None,
        };
        if let Some(kind) = alias {
            return Ok(kind);
        }

        OpKind::BUILTIN
            .iter()
            .copied()
            .find(|k| k.name() == lower)
            .ok_or_else(|| SchedError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Custom(id) => write!(f, "custom:{}", id),
            other => write!(f, "{}", other.name()),
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
    fn test_arity() {
        assert_eq!(OpKind::X.info().arity, Some((1, 0)));
        assert_eq!(OpKind::Cnot.info().arity, Some((1, 1)));
        assert_eq!(OpKind::ISwap.info().arity, Some((2, 0)));
        assert_eq!(OpKind::Toffoli.info().arity, Some((1, 2)));
        assert_eq!(OpKind::Custom(3).info().arity, None);
    }

    #[test]
    fn test_axis_groups() {
        assert_eq!(OpKind::Rx.axis(), Some(Axis::X));
        assert_eq!(OpKind::Y.axis(), Some(Axis::Y));
        assert!(OpKind::T.is_diagonal());
        assert!(OpKind::Cz.is_diagonal());
        assert!(!OpKind::H.is_diagonal());
        assert!(!OpKind::Cnot.is_diagonal());
    }

    #[test]
    fn test_classification() {
        assert!(OpKind::Cnot.is_controlled());
        assert!(!OpKind::Swap.is_controlled());
        assert!(OpKind::H.is_single_qubit());
        assert!(!OpKind::Delay.is_single_qubit());
        assert!(OpKind::Custom(1).is_custom());
    }

    #[test]
    fn test_parse_roundtrip_names() {
        for kind in OpKind::BUILTIN {
            assert_eq!(OpKind::parse(kind.name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(OpKind::parse("CX").unwrap(), OpKind::Cnot);
        assert_eq!(OpKind::parse("snot").unwrap(), OpKind::H);
        assert_eq!(OpKind::parse("custom:12").unwrap(), OpKind::Custom(12));
        assert!(OpKind::parse("custom:abc").is_err());
        assert!(OpKind::parse("warp").is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&OpKind::ISwap).unwrap(), "\"iswap\"");
        let kind: OpKind = serde_json::from_str("\"cnot\"").unwrap();
        assert_eq!(kind, OpKind::Cnot);
        let custom: OpKind = serde_json::from_str("{\"custom\":5}").unwrap();
        assert_eq!(custom, OpKind::Custom(5));
    }
}
