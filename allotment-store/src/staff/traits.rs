// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use allotment_core::{DepartmentId, NewStaff, Staff, StaffId, TeamId};

/// Interface for storing and querying staff members.
pub trait StaffStore {
    type Error: Error;

    /// Insert a staff member.
    ///
    /// Returns `None` when a staff member with the same email address already exists.
    fn insert_staff(
        &self,
        staff: NewStaff,
    ) -> impl Future<Output = Result<Option<Staff>, Self::Error>>;

    fn get_staff(&self, id: StaffId) -> impl Future<Output = Result<Option<Staff>, Self::Error>>;

    /// Update all fields of a staff member apart from the creation time.
    ///
    /// Returns `true` when a staff member with this id existed.
    fn update_staff(&self, staff: &Staff) -> impl Future<Output = Result<bool, Self::Error>>;

    fn delete_staff(&self, id: StaffId) -> impl Future<Output = Result<bool, Self::Error>>;

    /// All staff members ordered by their id.
    fn all_staff(&self) -> impl Future<Output = Result<Vec<Staff>, Self::Error>>;

    /// All staff members of a department ordered by their id.
    fn staff_by_department(
        &self,
        department_id: DepartmentId,
    ) -> impl Future<Output = Result<Vec<Staff>, Self::Error>>;

    /// All staff members of a team ordered by their id.
    fn staff_by_team(
        &self,
        team_id: TeamId,
    ) -> impl Future<Output = Result<Vec<Staff>, Self::Error>>;

    fn staff_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Staff>, Self::Error>>;
}
