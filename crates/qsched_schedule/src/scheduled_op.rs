//! Time-tagged operations
//!
//! Gantree: L4_Scheduling → ScheduledOp
//!
//! Joins a resolved operation with its assigned interval so consumers can
//! walk a schedule per resource.

use qsched_core::{OpIndex, OpKind, Operation, ResourceId, Time};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation with its assigned interval
/// Gantree: ScheduledOp // 스케줄된 연산
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledOp {
    /// Index in the original sequence
    /// Gantree: op_idx: OpIndex // 원본 인덱스
    pub op_idx: OpIndex,

    /// Operation kind
    pub kind: OpKind,

    /// Resources held for the whole interval
    pub resources: Vec<ResourceId>,

    /// Start time
    /// Gantree: start: Time // 시작 시간
    pub start: Time,

    /// Finish time
    /// Gantree: finish: Time // 종료 시간
    pub finish: Time,
}

impl ScheduledOp {
    /// Tag an operation with its start time
    pub fn new(op: &Operation, start: Time) -> Self {
        Self {
            op_idx: op.id(),
            kind: op.kind(),
            resources: op.resources().ids().to_vec(),
            start,
            finish: start + op.duration(),
        }
    }

    /// Interval length
    pub fn duration(&self) -> Time {
        self.finish - self.start
    }

    /// Check if this operation overlaps the half-open interval `[start, end)`
    pub fn overlaps(&self, start: Time, end: Time) -> bool {
        self.start < end && self.finish > start
    }

    /// Check if this operation holds a resource
    pub fn uses_resource(&self, resource: ResourceId) -> bool {
        self.resources.binary_search(&resource).is_ok()
    }

    /// Check if this operation is active at an instant
    pub fn is_active_at(&self, time: Time) -> bool {
        self.start <= time && time < self.finish
    }

    /// Per-resource slots held by this operation
    pub fn time_slots(&self) -> Vec<TimeSlot> {
        self.resources
            .iter()
            .map(|&r| TimeSlot::new(r, self.start, self.finish))
            .collect()
    }
}

impl fmt::Display for ScheduledOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}-{}] #{} {} on {:?}",
            self.start, self.finish, self.op_idx, self.kind, self.resources
        )
    }
}

// ============================================================================
// TimeSlot - For collision detection
// ============================================================================

/// Interval during which a single resource is held
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Resource ID
    pub resource: ResourceId,
    /// Start time
    pub start: Time,
    /// End time
    pub end: Time,
}

impl TimeSlot {
    /// Create a new time slot
    pub fn new(resource: ResourceId, start: Time, end: Time) -> Self {
        Self {
            resource,
            start,
            end,
        }
    }

    /// Check overlap with another slot; touching slots do not overlap
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.resource == other.resource && self.start < other.end && self.end > other.start
    }

    /// Duration
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

// ============================================================================
// Tests
// ============================================================================
