// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::collections::HashSet;
use std::convert::Infallible;
use std::rc::Rc;

use allotment_core::{
    AssignedSoftware, AssignmentId, AssignmentLog, AssignmentSource, DepartmentId, LogId,
    MatchId, MatchRule, MatchScope, NewAssignment, NewAssignmentLog, NewSoftware, NewStaff,
    Software, SoftwareId, Staff, StaffId, TeamId,
};
use allotment_store::{
    AssignmentStore, AuditLogStore, LogQuery, MatchStore, MemoryStore, SoftwareStore, StaffStore,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("injected failure")]
pub struct InjectedError;

fn never(err: Infallible) -> InjectedError {
    match err {}
}

/// Which store calls of a [`FaultyStore`] fail.
#[derive(Debug, Default)]
pub struct Faults {
    /// Assignment reads of staff members and software.
    pub assignment_reads: bool,
    /// Rule queries by scope.
    pub rule_reads: bool,
    /// Inserting edges for these staff members.
    pub inserts_for: HashSet<StaffId>,
    /// Deleting edges of these staff members.
    pub deletes_for: HashSet<StaffId>,
    /// Appending audit log entries.
    pub logs: bool,
    /// Deleting match rules.
    pub rule_deletes: bool,
}

/// In-memory store which fails selected calls.
#[derive(Clone, Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub faults: Rc<RefCell<Faults>>,
}

impl FaultyStore {
    fn check(&self, failing: impl Fn(&Faults) -> bool) -> Result<(), InjectedError> {
        if failing(&self.faults.borrow()) {
            return Err(InjectedError);
        }
        Ok(())
    }
}

impl StaffStore for FaultyStore {
    type Error = InjectedError;

    async fn insert_staff(&self, staff: NewStaff) -> Result<Option<Staff>, Self::Error> {
        self.inner.insert_staff(staff).await.map_err(never)
    }

    async fn get_staff(&self, id: StaffId) -> Result<Option<Staff>, Self::Error> {
        self.inner.get_staff(id).await.map_err(never)
    }

    async fn update_staff(&self, staff: &Staff) -> Result<bool, Self::Error> {
        self.inner.update_staff(staff).await.map_err(never)
    }

    async fn delete_staff(&self, id: StaffId) -> Result<bool, Self::Error> {
        self.inner.delete_staff(id).await.map_err(never)
    }

    async fn all_staff(&self) -> Result<Vec<Staff>, Self::Error> {
        self.inner.all_staff().await.map_err(never)
    }

    async fn staff_by_department(&self, id: DepartmentId) -> Result<Vec<Staff>, Self::Error> {
        self.inner.staff_by_department(id).await.map_err(never)
    }

    async fn staff_by_team(&self, id: TeamId) -> Result<Vec<Staff>, Self::Error> {
        self.inner.staff_by_team(id).await.map_err(never)
    }

    async fn staff_by_email(&self, email: &str) -> Result<Option<Staff>, Self::Error> {
        self.inner.staff_by_email(email).await.map_err(never)
    }
}

impl SoftwareStore for FaultyStore {
    type Error = InjectedError;

    async fn insert_software(
        &self,
        software: NewSoftware,
    ) -> Result<Option<Software>, Self::Error> {
        self.inner.insert_software(software).await.map_err(never)
    }

    async fn get_software(&self, id: SoftwareId) -> Result<Option<Software>, Self::Error> {
        self.inner.get_software(id).await.map_err(never)
    }

    async fn software_by_name(&self, name: &str) -> Result<Option<Software>, Self::Error> {
        self.inner.software_by_name(name).await.map_err(never)
    }

    async fn all_software(&self) -> Result<Vec<Software>, Self::Error> {
        self.inner.all_software().await.map_err(never)
    }

    async fn update_software(&self, software: &Software) -> Result<bool, Self::Error> {
        self.inner.update_software(software).await.map_err(never)
    }

    async fn delete_software(&self, id: SoftwareId) -> Result<bool, Self::Error> {
        self.inner.delete_software(id).await.map_err(never)
    }
}

impl AssignmentStore for FaultyStore {
    type Error = InjectedError;

    async fn insert_assignment(
        &self,
        assignment: NewAssignment,
    ) -> Result<AssignedSoftware, Self::Error> {
        self.check(|faults| faults.inserts_for.contains(&assignment.staff_id))?;
        self.inner.insert_assignment(assignment).await.map_err(never)
    }

    async fn get_assignment(
        &self,
        id: AssignmentId,
    ) -> Result<Option<AssignedSoftware>, Self::Error> {
        self.inner.get_assignment(id).await.map_err(never)
    }

    async fn assignments_for_staff(
        &self,
        staff_id: StaffId,
    ) -> Result<Vec<AssignedSoftware>, Self::Error> {
        self.check(|faults| faults.assignment_reads)?;
        self.inner.assignments_for_staff(staff_id).await.map_err(never)
    }

    async fn assignments_for_software(
        &self,
        software_id: SoftwareId,
    ) -> Result<Vec<AssignedSoftware>, Self::Error> {
        self.check(|faults| faults.assignment_reads)?;
        self.inner
            .assignments_for_software(software_id)
            .await
            .map_err(never)
    }

    async fn assigned_software_ids(
        &self,
        staff_id: StaffId,
    ) -> Result<Vec<SoftwareId>, Self::Error> {
        self.check(|faults| faults.assignment_reads)?;
        self.inner.assigned_software_ids(staff_id).await.map_err(never)
    }

    async fn find_assignment(
        &self,
        staff_id: StaffId,
        software_id: SoftwareId,
    ) -> Result<Option<AssignedSoftware>, Self::Error> {
        self.check(|faults| faults.assignment_reads)?;
        self.inner
            .find_assignment(staff_id, software_id)
            .await
            .map_err(never)
    }

    async fn update_assignment(&self, assignment: &AssignedSoftware) -> Result<bool, Self::Error> {
        self.inner.update_assignment(assignment).await.map_err(never)
    }

    async fn delete_assignment(&self, id: AssignmentId) -> Result<bool, Self::Error> {
        if let Some(assignment) = self.inner.get_assignment(id).await.map_err(never)? {
            self.check(|faults| faults.deletes_for.contains(&assignment.staff_id))?;
        }
        self.inner.delete_assignment(id).await.map_err(never)
    }

    async fn delete_assignments(
        &self,
        staff_id: StaffId,
        software_id: SoftwareId,
        source: AssignmentSource,
    ) -> Result<u64, Self::Error> {
        self.check(|faults| faults.deletes_for.contains(&staff_id))?;
        self.inner
            .delete_assignments(staff_id, software_id, source)
            .await
            .map_err(never)
    }
}

impl MatchStore for FaultyStore {
    type Error = InjectedError;

    async fn insert_match(
        &self,
        software_id: SoftwareId,
        scope: MatchScope,
    ) -> Result<Option<MatchRule>, Self::Error> {
        self.inner.insert_match(software_id, scope).await.map_err(never)
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<MatchRule>, Self::Error> {
        self.inner.get_match(id).await.map_err(never)
    }

    async fn find_match(
        &self,
        software_id: SoftwareId,
        scope: MatchScope,
    ) -> Result<Option<MatchRule>, Self::Error> {
        self.inner.find_match(software_id, scope).await.map_err(never)
    }

    async fn matches_for_scope(&self, scope: MatchScope) -> Result<Vec<MatchRule>, Self::Error> {
        self.check(|faults| faults.rule_reads)?;
        self.inner.matches_for_scope(scope).await.map_err(never)
    }

    async fn software_for_scope(&self, scope: MatchScope) -> Result<Vec<SoftwareId>, Self::Error> {
        self.check(|faults| faults.rule_reads)?;
        self.inner.software_for_scope(scope).await.map_err(never)
    }

    async fn all_matches(&self) -> Result<Vec<MatchRule>, Self::Error> {
        self.inner.all_matches().await.map_err(never)
    }

    async fn update_match(&self, rule: &MatchRule) -> Result<bool, Self::Error> {
        self.inner.update_match(rule).await.map_err(never)
    }

    async fn delete_match(&self, id: MatchId) -> Result<bool, Self::Error> {
        self.check(|faults| faults.rule_deletes)?;
        self.inner.delete_match(id).await.map_err(never)
    }
}

impl AuditLogStore for FaultyStore {
    type Error = InjectedError;

    async fn append_log(&self, entry: NewAssignmentLog) -> Result<AssignmentLog, Self::Error> {
        self.check(|faults| faults.logs)?;
        self.inner.append_log(entry).await.map_err(never)
    }

    async fn get_log(&self, id: LogId) -> Result<Option<AssignmentLog>, Self::Error> {
        self.inner.get_log(id).await.map_err(never)
    }

    async fn logs(&self, query: &LogQuery) -> Result<Vec<AssignmentLog>, Self::Error> {
        self.inner.logs(query).await.map_err(never)
    }

    async fn update_log(&self, entry: &AssignmentLog) -> Result<bool, Self::Error> {
        self.inner.update_log(entry).await.map_err(never)
    }

    async fn delete_log(&self, id: LogId) -> Result<bool, Self::Error> {
        self.inner.delete_log(id).await.map_err(never)
    }
}
