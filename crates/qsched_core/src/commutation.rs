//! Commutation rule table for QSCHED
//!
//! Gantree: L2_Commutation → CommutationTable
//!
//! Declares, per pair of operation kinds, when two operations sharing
//! resources may be reordered freely. The table is static data: it is
//! built once, consulted while the dependency graph is constructed and
//! never mutated during a scheduling call. Pairs without a rule never
//! commute.
//!
//! Commuting only frees the *order* of two operations. It never allows
//! them to run at the same time on a shared resource.

use crate::error::{SchedError, SchedResult};
use crate::kind::{Axis, OpKind};
use crate::operation::Operation;
use crate::types::{ResourceId, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Overlap
// ============================================================================

/// One resource shared by two operations, with the role it plays in each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedResource {
    /// Shared resource id
    pub resource: ResourceId,
    /// Role in the first operation
    pub first: Role,
    /// Role in the second operation
    pub second: Role,
}

/// Resource overlap pattern between two operations
/// Gantree: Overlap // 겹침 패턴
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Overlap {
    shared: Vec<SharedResource>,
}

impl Overlap {
    /// Compute the overlap of `first` and `second`
    pub fn between(first: &Operation, second: &Operation) -> Self {
        let shared = first
            .resources()
            .intersection(second.resources())
            .into_iter()
            .filter_map(|resource| {
                Some(SharedResource {
                    resource,
                    first: first.role_of(resource)?,
                    second: second.role_of(resource)?,
                })
            })
            .collect();
        Self { shared }
    }

    /// Build from explicit shared resources
    pub fn from_shared(shared: Vec<SharedResource>) -> Self {
        Self { shared }
    }

    /// Shared resources
    pub fn shared(&self) -> &[SharedResource] {
        &self.shared
    }

    /// Check if nothing is shared
    pub fn is_empty(&self) -> bool {
        self.shared.is_empty()
    }

    /// Same overlap seen from the other operation
    pub fn mirrored(&self) -> Self {
        Self {
            shared: self
                .shared
                .iter()
                .map(|s| SharedResource {
                    resource: s.resource,
                    first: s.second,
                    second: s.first,
                })
                .collect(),
        }
    }
}

// ============================================================================
// CommutationRule
// ============================================================================

/// Allowed role combination on a shared resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RolePair {
    /// Role in the first kind of the pair
    pub first: Role,
    /// Role in the second kind of the pair
    pub second: Role,
}

impl RolePair {
    /// Create a role pair
    pub const fn new(first: Role, second: Role) -> Self {
        Self { first, second }
    }

    /// Swap sides
    pub const fn mirrored(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }
}

/// Commutation predicate for a kind pair
/// Gantree: CommutationRule // 교환 규칙
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommutationRule {
    /// Commute on any overlap
    Always,
    /// Never commute
    Never,
    /// Commute iff every shared resource has one of these role pairs
    Roles(Vec<RolePair>),
}

impl CommutationRule {
    /// Role-based rule from `(first, second)` tuples
    pub fn roles(pairs: &[(Role, Role)]) -> Self {
        let mut v: Vec<RolePair> = pairs.iter().map(|&(a, b)| RolePair::new(a, b)).collect();
        v.sort();
        v.dedup();
        CommutationRule::Roles(v)
    }

    /// Rule as seen with the kind pair swapped
    pub fn mirrored(&self) -> Self {
        match self {
            CommutationRule::Roles(pairs) => {
                let mut v: Vec<RolePair> = pairs.iter().map(|p| p.mirrored()).collect();
                v.sort();
                CommutationRule::Roles(v)
            }
            other => other.clone(),
        }
    }

    /// Union with the mirrored rule, used for same-kind pairs
    fn symmetrized(&self) -> Self {
        match self {
            CommutationRule::Roles(pairs) => {
                let mut v: Vec<RolePair> = pairs
                    .iter()
                    .flat_map(|p| [*p, p.mirrored()])
                    .collect();
                v.sort();
                v.dedup();
                CommutationRule::Roles(v)
            }
            other => other.clone(),
        }
    }

    /// Reject rules that can never apply
    pub fn validate(&self) -> SchedResult<()> {
        match self {
            CommutationRule::Roles(pairs) if pairs.is_empty() => Err(SchedError::InvalidRule(
                "role-based rule must list at least one role pair".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Decide for an overlap oriented the same way as the rule
    /// Gantree: permits(&self,Overlap) -> bool // 규칙 판정
    pub fn permits(&self, overlap: &Overlap) -> bool {
        match self {
            CommutationRule::Always => true,
            CommutationRule::Never => overlap.is_empty(),
            CommutationRule::Roles(pairs) => overlap
                .shared()
                .iter()
                .all(|s| pairs.contains(&RolePair::new(s.first, s.second))),
        }
    }
}

impl fmt::Display for CommutationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommutationRule::Always => write!(f, "always"),
            CommutationRule::Never => write!(f, "never"),
            CommutationRule::Roles(pairs) => {
                let parts: Vec<String> = pairs
                    .iter()
                    .map(|p| format!("{}/{}", p.first, p.second))
                    .collect();
                write!(f, "roles[{}]", parts.join(","))
            }
        }
    }
}

// ============================================================================
// CommutationTable
// ============================================================================

/// Symmetric rule table keyed by kind pair
/// Gantree: CommutationTable // 교환 규칙 표
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "CommutationTableRepr", into = "CommutationTableRepr")]
pub struct CommutationTable {
    /// Keys are stored with `first <= second`
    rules: HashMap<(OpKind, OpKind), CommutationRule>,
}

impl CommutationTable {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Table where nothing commutes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard gate-level rules
    /// Gantree: standard() -> Self // 기본 규칙
    ///
    /// - identity commutes with every built-in kind
    /// - kinds sharing a commutation axis commute (all diagonal kinds,
    ///   including CZ, CPhase and CRz, commute pairwise)
    /// - Z-axis single-qubit kinds commute with controlled kinds on their controls
    /// - X-axis single-qubit kinds commute with CNOT/Toffoli on the target
    /// - CNOT/Toffoli commute with each other through shared controls or
    ///   shared targets, never across roles
    /// - CNOT/Toffoli commute with diagonal two-qubit kinds through their controls
    pub fn standard() -> Self {
        use Role::{Control as C, Target as T};

        let mut table = Self::empty();
        let builtin = OpKind::BUILTIN;

        for kind in builtin {
            table.set(OpKind::Id, kind, CommutationRule::Always);
        }

        for (i, &a) in builtin.iter().enumerate() {
            for &b in &builtin[i..] {
                if a.axis().is_some() && a.axis() == b.axis() {
                    table.set(a, b, CommutationRule::Always);
                }
            }
        }

        let controlled: Vec<OpKind> = builtin
            .iter()
            .copied()
            .filter(|k| k.is_controlled() && !k.is_diagonal())
            .collect();
        let single_z: Vec<OpKind> = builtin
            .iter()
            .copied()
            .filter(|k| k.is_single_qubit() && k.axis() == Some(Axis::Z))
            .collect();
        let single_x: Vec<OpKind> = builtin
            .iter()
            .copied()
            .filter(|k| k.is_single_qubit() && k.axis() == Some(Axis::X))
            .collect();
        let diagonal_2q = [OpKind::Cz, OpKind::CPhase, OpKind::Crz];
        let x_controlled = [OpKind::Cnot, OpKind::Toffoli];

        for &z in &single_z {
            for &c in &controlled {
                table.set(z, c, CommutationRule::roles(&[(T, C)]));
            }
        }

        for &x in &single_x {
            for &c in &x_controlled {
                table.set(x, c, CommutationRule::roles(&[(T, T)]));
            }
        }

        for (i, &a) in x_controlled.iter().enumerate() {
            for &b in &x_controlled[i..] {
                table.set(a, b, CommutationRule::roles(&[(C, C), (T, T)]));
            }
            for &d in &diagonal_2q {
                table.set(a, d, CommutationRule::roles(&[(C, C), (C, T)]));
            }
        }

        table
    }

    // ========================================================================
    // Mutation (configuration time only)
    // ========================================================================

    /// Add a rule (builder style)
    pub fn with_rule(mut self, a: OpKind, b: OpKind, rule: CommutationRule) -> SchedResult<Self> {
        self.insert(a, b, rule)?;
        Ok(self)
    }

    /// Add or replace the rule for a kind pair
    /// Gantree: insert(a,b,rule) -> Result<()> // 규칙 추가
    pub fn insert(&mut self, a: OpKind, b: OpKind, rule: CommutationRule) -> SchedResult<()> {
        rule.validate()?;
        self.set(a, b, rule);
        Ok(())
    }

    fn set(&mut self, a: OpKind, b: OpKind, rule: CommutationRule) {
        let (key, rule) = if a == b {
            ((a, b), rule.symmetrized())
        } else if a < b {
            ((a, b), rule)
        } else {
            ((b, a), rule.mirrored())
        };
        self.rules.insert(key, rule);
    }

    /// Remove the rule for a kind pair
    pub fn remove(&mut self, a: OpKind, b: OpKind) -> Option<CommutationRule> {
        let removed = self.rules.remove(&Self::key(a, b))?;
        Some(if a <= b { removed } else { removed.mirrored() })
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    fn key(a: OpKind, b: OpKind) -> (OpKind, OpKind) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Rule for `(a, b)` oriented with `a` first
    pub fn rule_for(&self, a: OpKind, b: OpKind) -> Option<CommutationRule> {
        let rule = self.rules.get(&Self::key(a, b))?;
        Some(if a <= b { rule.clone() } else { rule.mirrored() })
    }

    /// Check if a rule exists for a kind pair
    pub fn contains(&self, a: OpKind, b: OpKind) -> bool {
        self.rules.contains_key(&Self::key(a, b))
    }

    /// Raw lookup: may `a` and `b` be reordered given `overlap`?
    /// Gantree: commutes_kinds(a,b,Overlap) -> bool // 종류 판정
    ///
    /// `overlap` must be oriented with `a` first. An empty overlap always
    /// commutes; an unknown pair never does.
    pub fn commutes_kinds(&self, a: OpKind, b: OpKind, overlap: &Overlap) -> bool {
        if overlap.is_empty() {
            return true;
        }
        match self.rules.get(&Self::key(a, b)) {
            None => false,
            Some(rule) if a <= b => rule.permits(overlap),
            Some(rule) => rule.permits(&overlap.mirrored()),
        }
    }

    /// May two resolved operations be reordered?
    /// Gantree: commutes(&Operation,&Operation) -> bool // 교환 판정
    pub fn commutes(&self, a: &Operation, b: &Operation) -> bool {
        self.commutes_kinds(a.kind(), b.kind(), &Overlap::between(a, b))
    }

    /// Number of declared kind pairs
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no rule is declared
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Declared entries, sorted by kind pair
    pub fn entries(&self) -> Vec<(OpKind, OpKind, CommutationRule)> {
        let mut v: Vec<(OpKind, OpKind, CommutationRule)> = self
            .rules
            .iter()
            .map(|(&(a, b), rule)| (a, b, rule.clone()))
            .collect();
        v.sort_by_key(|(a, b, _)| (*a, *b));
        v
    }

    // ========================================================================
    // JSON
    // ========================================================================

    /// Load from JSON, validating every rule
    pub fn from_json(json: &str) -> SchedResult<Self> {
        let repr: CommutationTableRepr = serde_json::from_str(json)?;
        Self::try_from(repr)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> SchedResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for CommutationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CommutationTable ({} rules):", self.len())?;
        for (a, b, rule) in self.entries() {
            writeln!(f, "  {} x {}: {}", a, b, rule)?;
        }
        Ok(())
    }
}

// ============================================================================
// Serialized form
// ============================================================================

#[derive(Serialize, Deserialize)]
struct CommutationTableRepr {
    rules: Vec<RuleEntry>,
}

#[derive(Serialize, Deserialize)]
struct RuleEntry {
    first: OpKind,
    second: OpKind,
    rule: CommutationRule,
}

impl TryFrom<CommutationTableRepr> for CommutationTable {
    type Error = SchedError;

    fn try_from(repr: CommutationTableRepr) -> SchedResult<Self> {
        let mut table = Self::empty();
        for entry in repr.rules {
            table.insert(entry.first, entry.second, entry.rule)?;
        }
        Ok(table)
    }
}

impl From<CommutationTable> for CommutationTableRepr {
    fn from(table: CommutationTable) -> Self {
        Self {
            rules: table
                .entries()
                .into_iter()
                .map(|(first, second, rule)| RuleEntry {
                    first,
                    second,
                    rule,
                })
                .collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
