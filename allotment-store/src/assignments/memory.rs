// SPDX-License-Identifier: MIT OR Apache-2.0

use std::convert::Infallible;

use allotment_core::{
    AssignedSoftware, AssignmentId, AssignmentSource, NewAssignment, SoftwareId, StaffId,
    current_timestamp,
};

use crate::assignments::AssignmentStore;
use crate::memory::{MemoryStore, SharedTable};

#[derive(Clone, Debug, Default)]
pub struct AssignmentMemoryStore {
    assignments: SharedTable<AssignmentId, AssignedSoftware>,
}

impl AssignmentMemoryStore {
    fn filter<F>(&self, predicate: F) -> Vec<AssignedSoftware>
    where
        F: Fn(&AssignedSoftware) -> bool,
    {
        self.assignments
            .borrow()
            .rows
            .values()
            .filter(|assignment| predicate(assignment))
            .cloned()
            .collect()
    }
}

impl AssignmentStore for MemoryStore {
    type Error = Infallible;

    async fn insert_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<AssignedSoftware, Self::Error> {
        let mut table = self.assignments.assignments.borrow_mut();
        let timestamp = current_timestamp();
        let assignment = AssignedSoftware {
            id: table.next_id(),
            staff_id: assignment.staff_id,
            software_id: assignment.software_id,
            source: assignment.source,
            assigned_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn get_assignment(
        &self,
        id: AssignmentId,
    ) -> Result<Option<AssignedSoftware>, Self::Error> {
        Ok(self.assignments.assignments.borrow().rows.get(&id).cloned())
    }

    async fn assignments_for_staff(
        &self,
        staff_id: StaffId,
    ) -> Result<Vec<AssignedSoftware>, Self::Error> {
        Ok(self
            .assignments
            .filter(|assignment| assignment.staff_id == staff_id))
    }

    async fn assignments_for_software(
        &self,
        software_id: SoftwareId,
    ) -> Result<Vec<AssignedSoftware>, Self::Error> {
        Ok(self
            .assignments
            .filter(|assignment| assignment.software_id == software_id))
    }

    async fn assigned_software_ids(
        &self,
        staff_id: StaffId,
    ) -> Result<Vec<SoftwareId>, Self::Error> {
        Ok(self
            .assignments
            .filter(|assignment| assignment.staff_id == staff_id)
            .into_iter()
            .map(|assignment| assignment.software_id)
            .collect())
    }

    async fn find_assignment(
        &self,
        staff_id: StaffId,
        software_id: SoftwareId,
    ) -> Result<Option<AssignedSoftware>, Self::Error> {
        Ok(self
            .assignments
            .assignments
            .borrow()
            .rows
            .values()
            .find(|assignment| {
                assignment.staff_id == staff_id && assignment.software_id == software_id
            })
            .cloned())
    }

    async fn update_assignment(&self, assignment: &AssignedSoftware) -> Result<bool, Self::Error> {
        let mut table = self.assignments.assignments.borrow_mut();
        let Some(existing) = table.rows.get_mut(&assignment.id) else {
            return Ok(false);
        };
        existing.staff_id = assignment.staff_id;
        existing.software_id = assignment.software_id;
        existing.source = assignment.source;
        existing.updated_at = current_timestamp();
        Ok(true)
    }

    async fn delete_assignment(&self, id: AssignmentId) -> Result<bool, Self::Error> {
        Ok(self
            .assignments
            .assignments
            .borrow_mut()
            .rows
            .remove(&id)
            .is_some())
    }

    async fn delete_assignments(
        &self,
        staff_id: StaffId,
        software_id: SoftwareId,
        source: AssignmentSource,
    ) -> Result<u64, Self::Error> {
        let mut table = self.assignments.assignments.borrow_mut();
        let before = table.rows.len();
        table.rows.retain(|_, assignment| {
            !(assignment.staff_id == staff_id
                && assignment.software_id == software_id
                && assignment.source == source)
        });
        Ok((before - table.rows.len()) as u64)
    }
}
