//! services/api/src/adapters/records.rs
//!
//! An in-memory implementation of the `AbsenceRecords` port. Real attendance
//! and justification history lives in the future document store; until then
//! the flags are seeded per student id so the eligibility checker has
//! something deterministic to look up.

use std::collections::HashSet;

use async_trait::async_trait;

use justificante_core::ports::{AbsenceRecords, PortResult};

/// Per-student history flags held in memory.
#[derive(Clone, Default)]
pub struct MemoryAbsenceRecords {
    excessive: HashSet<String>,
    pending: HashSet<String>,
}

impl MemoryAbsenceRecords {
    /// An empty history: every student passes the record-based predicates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history with the given flagged student ids.
    pub fn with_flags<I, J>(excessive: I, pending: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self {
            excessive: excessive.into_iter().collect(),
            pending: pending.into_iter().collect(),
        }
    }
}

#[async_trait]
impl AbsenceRecords for MemoryAbsenceRecords {
    async fn has_excessive_absences(&self, student_id: &str) -> PortResult<bool> {
        Ok(self.excessive.contains(student_id))
    }

    async fn has_pending_justification(&self, student_id: &str) -> PortResult<bool> {
        Ok(self.pending.contains(student_id))
    }
}
