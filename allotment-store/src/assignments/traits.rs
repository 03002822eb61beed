// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use allotment_core::{
    AssignedSoftware, AssignmentId, AssignmentSource, NewAssignment, SoftwareId, StaffId,
};

/// Interface for storing, deleting and querying assignment edges.
///
/// Stores do not prevent several edges for the same staff member and software, callers check
/// with [`find_assignment`](AssignmentStore::find_assignment) or
/// [`assigned_software_ids`](AssignmentStore::assigned_software_ids) before inserting.
pub trait AssignmentStore {
    type Error: Error;

    fn insert_assignment(
        &self,
        assignment: NewAssignment,
    ) -> impl Future<Output = Result<AssignedSoftware, Self::Error>>;

    fn get_assignment(
        &self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<Option<AssignedSoftware>, Self::Error>>;

    /// All edges of a staff member ordered by id, whatever their source.
    fn assignments_for_staff(
        &self,
        staff_id: StaffId,
    ) -> impl Future<Output = Result<Vec<AssignedSoftware>, Self::Error>>;

    /// All edges pointing at a software ordered by id, whatever their source.
    fn assignments_for_software(
        &self,
        software_id: SoftwareId,
    ) -> impl Future<Output = Result<Vec<AssignedSoftware>, Self::Error>>;

    /// Ids of all software currently assigned to a staff member.
    fn assigned_software_ids(
        &self,
        staff_id: StaffId,
    ) -> impl Future<Output = Result<Vec<SoftwareId>, Self::Error>>;

    /// First edge between a staff member and a software, if any.
    fn find_assignment(
        &self,
        staff_id: StaffId,
        software_id: SoftwareId,
    ) -> impl Future<Output = Result<Option<AssignedSoftware>, Self::Error>>;

    /// Update staff member, software and source of an edge.
    ///
    /// Returns `true` when an edge with this id existed.
    fn update_assignment(
        &self,
        assignment: &AssignedSoftware,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Delete a single edge.
    ///
    /// Returns `true` when the removal occurred and `false` when the edge was not found.
    fn delete_assignment(&self, id: AssignmentId)
    -> impl Future<Output = Result<bool, Self::Error>>;

    /// Delete all edges between a staff member and a software carrying the given source.
    ///
    /// Returns the number of removed edges.
    fn delete_assignments(
        &self,
        staff_id: StaffId,
        software_id: SoftwareId,
        source: AssignmentSource,
    ) -> impl Future<Output = Result<u64, Self::Error>>;
}
