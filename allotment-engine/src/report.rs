// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{AssignmentAction, AssignmentSource, SoftwareId, StaffId};
use tracing::warn;

use crate::EngineError;

/// Outcome of an engine operation touching many assignment edges.
///
/// A failed write for one item does not stop an operation from continuing with the remaining
/// ones. Every change which was applied is listed in `changes`, every write which failed in
/// `failures`.
#[derive(Debug)]
pub struct Report<E> {
    pub changes: Vec<Change>,
    pub failures: Vec<Failure<E>>,
}

impl<E> Report<E> {
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Returns `true` if no write failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns `true` if any write of the given stage failed.
    pub fn failed_at(&self, stage: Stage) -> bool {
        self.failures.iter().any(|failure| failure.stage == stage)
    }

    /// Returns `true` if nothing was changed and nothing failed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.failures.is_empty()
    }

    /// Number of created assignment edges.
    pub fn assigned(&self) -> usize {
        self.count(AssignmentAction::Assigned)
    }

    /// Number of removed assignment edges.
    pub fn unassigned(&self) -> usize {
        self.count(AssignmentAction::Unassigned)
    }

    fn count(&self, action: AssignmentAction) -> usize {
        self.changes
            .iter()
            .filter(|change| change.action == action)
            .count()
    }

    /// Appends the changes and failures of another report.
    pub fn merge(&mut self, other: Report<E>) {
        self.changes.extend(other.changes);
        self.failures.extend(other.failures);
    }

    pub(crate) fn change(
        &mut self,
        staff_id: StaffId,
        software_id: SoftwareId,
        action: AssignmentAction,
        source: AssignmentSource,
    ) {
        self.changes.push(Change {
            staff_id,
            software_id,
            action,
            source,
        });
    }

    pub(crate) fn fail(
        &mut self,
        staff_id: StaffId,
        software_id: SoftwareId,
        stage: Stage,
        error: E,
    ) where
        E: std::fmt::Display,
    {
        warn!(
            staff_id = %staff_id,
            software_id = %software_id,
            stage = ?stage,
            "assignment write failed: {}",
            error
        );
        self.failures.push(Failure {
            staff_id,
            software_id,
            stage,
            error,
        });
    }

    /// Reduces the report to the first failure, if any.
    ///
    /// This is useful for callers which only care about a single success or failure signal.
    pub fn into_result(self) -> Result<Vec<Change>, EngineError<E>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(EngineError::Write(failure.error)),
            None => Ok(self.changes),
        }
    }
}

impl<E> Default for Report<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Assignment edge which was created or removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Change {
    pub staff_id: StaffId,
    pub software_id: SoftwareId,
    pub action: AssignmentAction,
    pub source: AssignmentSource,
}

/// Write which failed for one staff member and software.
#[derive(Debug)]
pub struct Failure<E> {
    pub staff_id: StaffId,
    pub software_id: SoftwareId,
    pub stage: Stage,
    pub error: E,
}

/// Write a [`Failure`] occurred in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Creating the assignment edge failed, no log entry was written.
    Assign,

    /// Removing the assignment edge failed, no log entry was written.
    Revoke,

    /// The edge was changed but appending the audit log entry failed.
    Log,
}
