// SPDX-License-Identifier: MIT OR Apache-2.0

use std::convert::Infallible;

use allotment_core::{DepartmentId, NewStaff, Staff, StaffId, TeamId, current_timestamp};

use crate::memory::{MemoryStore, SharedTable};
use crate::staff::StaffStore;

#[derive(Clone, Debug, Default)]
pub struct StaffMemoryStore {
    staff: SharedTable<StaffId, Staff>,
}

impl StaffMemoryStore {
    fn filter<F>(&self, predicate: F) -> Vec<Staff>
    where
        F: Fn(&Staff) -> bool,
    {
        self.staff
            .borrow()
            .rows
            .values()
            .filter(|staff| predicate(staff))
            .cloned()
            .collect()
    }
}

impl StaffStore for MemoryStore {
    type Error = Infallible;

    async fn insert_staff(&self, staff: NewStaff) -> Result<Option<Staff>, Self::Error> {
        let mut table = self.staff.staff.borrow_mut();
        if table.rows.values().any(|existing| existing.email == staff.email) {
            return Ok(None);
        }

        let timestamp = current_timestamp();
        let staff = Staff {
            id: table.next_id(),
            first_name: staff.first_name,
            last_name: staff.last_name,
            email: staff.email,
            department_id: staff.department_id,
            team_id: staff.team_id,
            status: staff.status,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(staff.id, staff.clone());
        Ok(Some(staff))
    }

    async fn get_staff(&self, id: StaffId) -> Result<Option<Staff>, Self::Error> {
        Ok(self.staff.staff.borrow().rows.get(&id).cloned())
    }

    async fn update_staff(&self, staff: &Staff) -> Result<bool, Self::Error> {
        let mut table = self.staff.staff.borrow_mut();
        let Some(existing) = table.rows.get_mut(&staff.id) else {
            return Ok(false);
        };
        *existing = Staff {
            created_at: existing.created_at,
            updated_at: current_timestamp(),
            ..staff.clone()
        };
        Ok(true)
    }

    async fn delete_staff(&self, id: StaffId) -> Result<bool, Self::Error> {
        Ok(self.staff.staff.borrow_mut().rows.remove(&id).is_some())
    }

    async fn all_staff(&self) -> Result<Vec<Staff>, Self::Error> {
        Ok(self.staff.filter(|_| true))
    }

    async fn staff_by_department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Staff>, Self::Error> {
        Ok(self
            .staff
            .filter(|staff| staff.department_id == Some(department_id)))
    }

    async fn staff_by_team(&self, team_id: TeamId) -> Result<Vec<Staff>, Self::Error> {
        Ok(self.staff.filter(|staff| staff.team_id == Some(team_id)))
    }

    async fn staff_by_email(&self, email: &str) -> Result<Option<Staff>, Self::Error> {
        Ok(self
            .staff
            .staff
            .borrow()
            .rows
            .values()
            .find(|staff| staff.email == email)
            .cloned())
    }
}
