//! Instruction lists for QSCHED
//!
//! Gantree: L1_Operation → InstructionList
//!
//! The immutable input of a scheduling call: an ordered instruction
//! sequence plus the number of resources it may reference.

use crate::durations::DurationTable;
use crate::error::{SchedError, SchedResult};
use crate::operation::{resolve_all, Instruction, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered instruction sequence over a fixed resource range
/// Gantree: InstructionList // 입력 목록
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstructionList {
    /// Valid resource ids are `0..resource_count`
    resource_count: usize,

    /// Instructions in program order
    instructions: Vec<Instruction>,
}

impl InstructionList {
    /// Create an empty list
    pub fn new(resource_count: usize) -> Self {
        Self {
            resource_count,
            instructions: Vec::new(),
        }
    }

    /// Create from existing instructions, validating every resource id
    pub fn from_instructions(
        resource_count: usize,
        instructions: Vec<Instruction>,
    ) -> SchedResult<Self> {
        let list = Self {
            resource_count,
            instructions,
        };
        list.validate()?;
        Ok(list)
    }

    /// Append an instruction, rejecting out-of-range resources
    pub fn push(&mut self, instruction: Instruction) -> SchedResult<()> {
        let index = self.instructions.len();
        if let Some(&id) = instruction
            .targets
            .iter()
            .chain(instruction.controls.iter())
            .find(|&&id| id >= self.resource_count)
        {
            return Err(SchedError::invalid_operation(
                index,
                format!(
                    "resource {} out of range (resource count {})",
                    id, self.resource_count
                ),
            ));
        }
        self.instructions.push(instruction);
        Ok(())
    }

    /// Instructions in program order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of resources
    pub fn resource_count(&self) -> usize {
        self.resource_count
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of instructions touching more than one resource
    pub fn count_multi_resource(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.resource_set().len() > 1)
            .count()
    }

    /// Full validation: every instruction must resolve
    pub fn validate(&self) -> SchedResult<()> {
        self.resolve(&DurationTable::unit()).map(|_| ())
    }

    /// Resolve all instructions into operations
    /// Gantree: resolve(&self,DurationTable) -> Result<Vec<Operation>> // 해석
    pub fn resolve(&self, durations: &DurationTable) -> SchedResult<Vec<Operation>> {
        resolve_all(&self.instructions, self.resource_count, durations)
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> SchedResult<Self> {
        let list: Self = serde_json::from_str(json)?;
        list.validate()?;
        Ok(list)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> SchedResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for InstructionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "InstructionList({} resources, {} instructions):",
            self.resource_count,
            self.len()
        )?;
        for (i, inst) in self.instructions.iter().enumerate() {
            writeln!(f, "  {:>4}: {}", i, inst)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::OpKind;

    #[test]
    fn test_push_and_len() {
        let mut list = InstructionList::new(2);
        list.push(Instruction::new(OpKind::X, vec![0])).unwrap();
        list.push(Instruction::controlled(OpKind::Cnot, vec![0], vec![1]))
            .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.count_multi_resource(), 1);
    }

    #[test]
    fn test_push_out_of_range() {
        let mut list = InstructionList::new(2);
        let err = list.push(Instruction::new(OpKind::X, vec![2])).unwrap_err();
        assert!(err.is_input_error());
        assert!(list.is_empty());
    }

    #[test]
    fn test_from_instructions_validates() {
        let bad = vec![Instruction::new(OpKind::Cnot, vec![0])];
        assert!(InstructionList::from_instructions(2, bad).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut list = InstructionList::new(3);
        list.push(Instruction::new(OpKind::ISwap, vec![1, 2]).with_duration(3.5))
            .unwrap();
        let json = list.to_json().unwrap();
        let back = InstructionList::from_json(&json).unwrap();
        assert_eq!(list, back);
    }
}
