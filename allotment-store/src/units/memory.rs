// SPDX-License-Identifier: MIT OR Apache-2.0

use std::convert::Infallible;

use allotment_core::{
    Department, DepartmentId, NewDepartment, NewTeam, Team, TeamId, current_timestamp,
};

use crate::memory::{MemoryStore, SharedTable};
use crate::units::UnitStore;

#[derive(Clone, Debug, Default)]
pub struct UnitMemoryStore {
    departments: SharedTable<DepartmentId, Department>,
    teams: SharedTable<TeamId, Team>,
}

impl UnitStore for MemoryStore {
    type Error = Infallible;

    async fn insert_department(
        &self,
        department: NewDepartment,
    ) -> Result<Option<Department>, Self::Error> {
        let mut departments = self.units.departments.borrow_mut();
        if departments
            .rows
            .values()
            .any(|existing| existing.name == department.name)
        {
            return Ok(None);
        }

        let timestamp = current_timestamp();
        let department = Department {
            id: departments.next_id(),
            name: department.name,
            created_at: timestamp,
            updated_at: timestamp,
        };
        departments.rows.insert(department.id, department.clone());
        Ok(Some(department))
    }

    async fn get_department(&self, id: DepartmentId) -> Result<Option<Department>, Self::Error> {
        Ok(self.units.departments.borrow().rows.get(&id).cloned())
    }

    async fn all_departments(&self) -> Result<Vec<Department>, Self::Error> {
        Ok(self.units.departments.borrow().rows.values().cloned().collect())
    }

    async fn update_department(&self, department: &Department) -> Result<bool, Self::Error> {
        let mut departments = self.units.departments.borrow_mut();
        let Some(existing) = departments.rows.get_mut(&department.id) else {
            return Ok(false);
        };
        existing.name = department.name.clone();
        existing.updated_at = current_timestamp();
        Ok(true)
    }

    async fn delete_department(&self, id: DepartmentId) -> Result<bool, Self::Error> {
        Ok(self
            .units
            .departments
            .borrow_mut()
            .rows
            .remove(&id)
            .is_some())
    }

    async fn insert_team(&self, team: NewTeam) -> Result<Team, Self::Error> {
        let mut teams = self.units.teams.borrow_mut();
        let timestamp = current_timestamp();
        let team = Team {
            id: teams.next_id(),
            name: team.name,
            department_id: team.department_id,
            created_at: timestamp,
            updated_at: timestamp,
        };
        teams.rows.insert(team.id, team.clone());
        Ok(team)
    }

    async fn get_team(&self, id: TeamId) -> Result<Option<Team>, Self::Error> {
        Ok(self.units.teams.borrow().rows.get(&id).cloned())
    }

    async fn teams_by_department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Team>, Self::Error> {
        Ok(self
            .units
            .teams
            .borrow()
            .rows
            .values()
            .filter(|team| team.department_id == Some(department_id))
            .cloned()
            .collect())
    }

    async fn update_team(&self, team: &Team) -> Result<bool, Self::Error> {
        let mut teams = self.units.teams.borrow_mut();
        let Some(existing) = teams.rows.get_mut(&team.id) else {
            return Ok(false);
        };
        existing.name = team.name.clone();
        existing.department_id = team.department_id;
        existing.updated_at = current_timestamp();
        Ok(true)
    }

    async fn delete_team(&self, id: TeamId) -> Result<bool, Self::Error> {
        Ok(self.units.teams.borrow_mut().rows.remove(&id).is_some())
    }
}
