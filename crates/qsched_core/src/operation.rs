//! Instructions, resolved operations and the resource model
//!
//! Gantree: L1_Operation → ResourceModel
//!
//! An [`Instruction`] is the raw description handed over by the circuit
//! layer. Resolving it validates the resource ids and yields an
//! [`Operation`] carrying its resource set and concrete duration.

use crate::durations::DurationTable;
use crate::error::{SchedError, SchedResult};
use crate::kind::OpKind;
use crate::types::{OpDuration, OpIndex, ResourceId, Role, Time};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ResourceSet
// ============================================================================

/// Sorted, deduplicated set of resource ids
/// Gantree: ResourceSet // 자원 집합
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ResourceId>")]
pub struct ResourceSet(Vec<ResourceId>);

impl From<Vec<ResourceId>> for ResourceSet {
    fn from(ids: Vec<ResourceId>) -> Self {
        Self::from_ids(ids)
    }
}

impl ResourceSet {
    /// Build from any iterator of ids
    pub fn from_ids(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        let mut v: Vec<ResourceId> = ids.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        Self(v)
    }

    /// Ids in ascending order
    pub fn ids(&self) -> &[ResourceId] {
        &self.0
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check membership
    pub fn contains(&self, id: ResourceId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    /// Check if two sets share at least one resource
    /// Gantree: overlaps(&self,&Self) -> bool // 겹침 판별
    pub fn overlaps(&self, other: &ResourceSet) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }

    /// Shared resources in ascending order
    pub fn intersection(&self, other: &ResourceSet) -> Vec<ResourceId> {
        let mut shared = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared.push(self.0[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }
}

impl fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

// ============================================================================
// Instruction (raw input)
// ============================================================================

/// Raw operation description produced by the circuit layer
/// Gantree: Instruction // 입력 연산
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Operation kind
    pub kind: OpKind,

    /// Target resources
    pub targets: Vec<ResourceId>,

    /// Control resources
    #[serde(default)]
    pub controls: Vec<ResourceId>,

    /// Explicit duration; absent means the duration table decides
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Instruction {
    /// Create an instruction without controls
    pub fn new(kind: OpKind, targets: Vec<ResourceId>) -> Self {
        Self {
            kind,
            targets,
            controls: Vec::new(),
            duration: None,
        }
    }

    /// Create a controlled instruction
    pub fn controlled(kind: OpKind, controls: Vec<ResourceId>, targets: Vec<ResourceId>) -> Self {
        Self {
            kind,
            targets,
            controls,
            duration: None,
        }
    }

    /// Attach an explicit duration
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Resource set = targets ∪ controls, without validation
    pub fn resource_set(&self) -> ResourceSet {
        ResourceSet::from_ids(self.targets.iter().chain(self.controls.iter()).copied())
    }

    /// Validate against the resource count and resolve the duration
    /// Gantree: resolve(idx,n,DurationTable) -> Result<Operation> // 검증+해석
    ///
    /// Every kind needs a non-empty, in-range resource set. Built-in kinds
    /// are also checked for duplicate ids, target/control overlap and
    /// arity. `Custom` and `Delay` accept any shape; repeated ids collapse
    /// into the resource set.
    pub fn resolve(
        &self,
        index: OpIndex,
        resource_count: usize,
        durations: &DurationTable,
    ) -> SchedResult<Operation> {
        if self.targets.is_empty() && self.controls.is_empty() {
            return Err(SchedError::invalid_operation(index, "empty resource set"));
        }

        if let Some(&id) = self
            .targets
            .iter()
            .chain(self.controls.iter())
            .find(|&&id| id >= resource_count)
        {
            return Err(SchedError::invalid_operation(
                index,
                format!("resource {} out of range (resource count {})", id, resource_count),
            ));
        }

        let targets = ResourceSet::from_ids(self.targets.iter().copied());
        let controls = ResourceSet::from_ids(self.controls.iter().copied());

        // Built-in kinds have a fixed shape; free kinds only use the union
        if let Some((t, c)) = self.kind.info().arity {
            if targets.len() != self.targets.len() || controls.len() != self.controls.len() {
                return Err(SchedError::invalid_operation(index, "duplicate resource id"));
            }

            if targets.overlaps(&controls) {
                return Err(SchedError::invalid_operation(
                    index,
                    "resource used as both target and control",
                ));
            }

            if t != targets.len() || c != controls.len() {
                return Err(SchedError::invalid_operation(
                    index,
                    format!(
                        "{} expects {} target(s) and {} control(s), got {} and {}",
                        self.kind,
                        t,
                        c,
                        targets.len(),
                        controls.len()
                    ),
                ));
            }
        }

        let duration = match self.duration {
            Some(d) => OpDuration::new(d).map_err(|_| {
                SchedError::invalid_operation(index, format!("invalid duration {}", d))
            })?,
            None => durations.duration_for(self.kind),
        };

        Ok(Operation {
            id: index,
            kind: self.kind,
            resources: self.resource_set(),
            targets,
            controls,
            duration,
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} t={:?}", self.kind, self.targets)?;
        if !self.controls.is_empty() {
            write!(f, " c={:?}", self.controls)?;
        }
        if let Some(d) = self.duration {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

// ============================================================================
// Operation (resolved)
// ============================================================================

/// Validated scheduling unit
/// Gantree: Operation // 스케줄 단위
///
/// Only produced by [`Instruction::resolve`] or by deserializing a record
/// whose resource set equals targets ∪ controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OperationRecord")]
pub struct Operation {
    id: OpIndex,
    kind: OpKind,
    resources: ResourceSet,
    targets: ResourceSet,
    controls: ResourceSet,
    duration: OpDuration,
}

/// Unchecked serde form of [`Operation`]
#[derive(Deserialize)]
struct OperationRecord {
    id: OpIndex,
    kind: OpKind,
    resources: ResourceSet,
    targets: ResourceSet,
    #[serde(default)]
    controls: ResourceSet,
    duration: OpDuration,
}

impl TryFrom<OperationRecord> for Operation {
    type Error = SchedError;

    fn try_from(record: OperationRecord) -> SchedResult<Self> {
        let union = ResourceSet::from_ids(
            record
                .targets
                .ids()
                .iter()
                .chain(record.controls.ids())
                .copied(),
        );
        if union.is_empty() {
            return Err(SchedError::invalid_operation(record.id, "empty resource set"));
        }
        if union != record.resources {
            return Err(SchedError::invalid_operation(
                record.id,
                format!(
                    "resource set {} does not match targets ∪ controls {}",
                    record.resources, union
                ),
            ));
        }
        Ok(Self {
            id: record.id,
            kind: record.kind,
            resources: union,
            targets: record.targets,
            controls: record.controls,
            duration: record.duration,
        })
    }
}

impl Operation {
    /// Index into the original sequence
    #[inline]
    pub fn id(&self) -> OpIndex {
        self.id
    }

    /// Operation kind
    #[inline]
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Targets ∪ controls
    #[inline]
    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    /// Target resources
    pub fn targets(&self) -> &ResourceSet {
        &self.targets
    }

    /// Control resources
    pub fn controls(&self) -> &ResourceSet {
        &self.controls
    }

    /// Duration as a time value
    #[inline]
    pub fn duration(&self) -> Time {
        self.duration.value()
    }

    /// Role of a resource inside this operation
    pub fn role_of(&self, id: ResourceId) -> Option<Role> {
        if self.targets.contains(id) {
            Some(Role::Target)
        } else if self.controls.contains(id) {
            Some(Role::Control)
        } else {
            None
        }
    }

    /// Check if the resource sets of two operations intersect
    pub fn conflicts_with(&self, other: &Operation) -> bool {
        self.resources.overlaps(&other.resources)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} on {} ({})",
            self.id, self.kind, self.resources, self.duration
        )
    }
}

/// Resolve a whole instruction list, failing on the first malformed entry
/// Gantree: resolve_all(&[Instruction],n,DurationTable) -> Result<Vec<Operation>> // 일괄 검증
pub fn resolve_all(
    instructions: &[Instruction],
    resource_count: usize,
    durations: &DurationTable,
) -> SchedResult<Vec<Operation>> {
    instructions
        .iter()
        .enumerate()
        .map(|(i, inst)| inst.resolve(i, resource_count, durations))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
