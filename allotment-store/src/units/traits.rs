// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use allotment_core::{Department, DepartmentId, NewDepartment, NewTeam, Team, TeamId};

/// Interface for storing and querying organizational units.
pub trait UnitStore {
    type Error: Error;

    /// Insert a department.
    ///
    /// Returns `None` when a department with the same name already exists.
    fn insert_department(
        &self,
        department: NewDepartment,
    ) -> impl Future<Output = Result<Option<Department>, Self::Error>>;

    fn get_department(
        &self,
        id: DepartmentId,
    ) -> impl Future<Output = Result<Option<Department>, Self::Error>>;

    /// All departments ordered by their id.
    fn all_departments(&self) -> impl Future<Output = Result<Vec<Department>, Self::Error>>;

    /// Update the name of a department.
    ///
    /// Returns `true` when a department with this id existed.
    fn update_department(
        &self,
        department: &Department,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    fn delete_department(&self, id: DepartmentId)
    -> impl Future<Output = Result<bool, Self::Error>>;

    fn insert_team(&self, team: NewTeam) -> impl Future<Output = Result<Team, Self::Error>>;

    fn get_team(&self, id: TeamId) -> impl Future<Output = Result<Option<Team>, Self::Error>>;

    /// All teams of a department ordered by their id.
    fn teams_by_department(
        &self,
        department_id: DepartmentId,
    ) -> impl Future<Output = Result<Vec<Team>, Self::Error>>;

    /// Update name and department of a team.
    ///
    /// Returns `true` when a team with this id existed.
    fn update_team(&self, team: &Team) -> impl Future<Output = Result<bool, Self::Error>>;

    fn delete_team(&self, id: TeamId) -> impl Future<Output = Result<bool, Self::Error>>;
}
