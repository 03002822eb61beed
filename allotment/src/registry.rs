// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{
    Actor, AssignedSoftware, AssignmentAction, AssignmentId, AssignmentLog, AssignmentSource,
    Department, DepartmentId, LogId, MatchId, MatchRule, MatchScope, Membership, NewAssignment,
    NewDepartment, NewSoftware, NewStaff, NewTeam, Software, SoftwareId, Staff, StaffId,
    StaffStatus, Team, TeamId,
};
use allotment_engine::{
    EngineError, EngineStore, Report, auto_assign, record_change, revoke_all, revoke_software,
    rule_created, rule_deleted, sync_staff,
};
use allotment_store::{LogQuery, SqliteError, SqliteStore, SqliteStoreBuilder, UnitStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::builder::RegistryBuilder;

/// Error type of the store backing a registry.
pub type StoreError<S> = <S as UnitStore>::Error;

type RegistryResult<T, S> = Result<T, RegistryError<StoreError<S>>>;

/// Tracks staff, software and match rules and keeps the assignments between them in sync.
///
/// Every mutation which affects assignments runs the matching engine operation right after the
/// record was written, for example moving a staff member to another department re-synchronises
/// their software. Mutations are not serialized, concurrent calls affecting the same staff member
/// may interleave.
pub struct Registry<S> {
    store: S,
    config: Config,
}

impl Registry<SqliteStore<'static>> {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Spawns a registry on an in-memory SQLite database with the default configuration.
    pub async fn spawn() -> Result<Self, SqliteError> {
        let store = SqliteStoreBuilder::default().build().await?;
        Ok(Registry::new(store, Config::default()))
    }
}

impl<S> Registry<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<S> Registry<S>
where
    S: UnitStore + EngineStore<StoreError<S>>,
{
    // Departments and teams.

    pub async fn create_department(&self, name: &str) -> RegistryResult<Department, S> {
        let department = self
            .store
            .insert_department(NewDepartment {
                name: name.to_string(),
            })
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(|| RegistryError::Duplicate(format!("department name '{}'", name)))?;

        debug!(department_id = %department.id, "created department");
        Ok(department)
    }

    pub async fn department(&self, id: DepartmentId) -> RegistryResult<Department, S> {
        self.store
            .get_department(id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or(RegistryError::NotFound("department", id.as_u64()))
    }

    pub async fn departments(&self) -> RegistryResult<Vec<Department>, S> {
        self.store
            .all_departments()
            .await
            .map_err(RegistryError::Store)
    }

    /// Renames a department.
    pub async fn update_department(
        &self,
        department: Department,
    ) -> RegistryResult<Department, S> {
        let taken = self
            .departments()
            .await?
            .iter()
            .any(|other| other.name == department.name && other.id != department.id);
        if taken {
            return Err(RegistryError::Duplicate(format!(
                "department name '{}'",
                department.name
            )));
        }

        if !self
            .store
            .update_department(&department)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(RegistryError::NotFound("department", department.id.as_u64()));
        }
        debug!(department_id = %department.id, "updated department");
        self.department(department.id).await
    }

    /// Removes a department record.
    ///
    /// Staff members and teams pointing at the department keep their reference, as do match
    /// rules of its scope.
    pub async fn delete_department(&self, id: DepartmentId) -> RegistryResult<(), S> {
        if !self
            .store
            .delete_department(id)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(RegistryError::NotFound("department", id.as_u64()));
        }
        debug!(department_id = %id, "deleted department");
        Ok(())
    }

    pub async fn create_team(&self, team: NewTeam) -> RegistryResult<Team, S> {
        if let Some(department_id) = team.department_id {
            self.department(department_id).await?;
        }

        let team = self
            .store
            .insert_team(team)
            .await
            .map_err(RegistryError::Store)?;

        debug!(team_id = %team.id, "created team");
        Ok(team)
    }

    pub async fn team(&self, id: TeamId) -> RegistryResult<Team, S> {
        self.store
            .get_team(id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or(RegistryError::NotFound("team", id.as_u64()))
    }

    pub async fn teams_in_department(&self, id: DepartmentId) -> RegistryResult<Vec<Team>, S> {
        self.department(id).await?;
        self.store
            .teams_by_department(id)
            .await
            .map_err(RegistryError::Store)
    }

    /// Renames a team or moves it to another department.
    ///
    /// Staff members of the team keep their own department, their assignments are not touched.
    pub async fn update_team(&self, team: Team) -> RegistryResult<Team, S> {
        if let Some(department_id) = team.department_id {
            self.department(department_id).await?;
        }

        if !self
            .store
            .update_team(&team)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(RegistryError::NotFound("team", team.id.as_u64()));
        }
        debug!(team_id = %team.id, "updated team");
        self.team(team.id).await
    }

    pub async fn delete_team(&self, id: TeamId) -> RegistryResult<(), S> {
        if !self
            .store
            .delete_team(id)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(RegistryError::NotFound("team", id.as_u64()));
        }
        debug!(team_id = %id, "deleted team");
        Ok(())
    }

    async fn check_membership(&self, membership: Membership) -> RegistryResult<(), S> {
        if let Some(department_id) = membership.department_id {
            self.department(department_id).await?;
        }
        if let Some(team_id) = membership.team_id {
            self.team(team_id).await?;
        }
        Ok(())
    }

    async fn check_scope(&self, scope: MatchScope) -> RegistryResult<(), S> {
        match scope {
            MatchScope::Organization => (),
            MatchScope::Department(id) => {
                self.department(id).await?;
            }
            MatchScope::Team(id) => {
                self.team(id).await?;
            }
        }
        Ok(())
    }

    // Staff.

    /// Adds a staff member and, if configured, assigns the software matched by the rules of
    /// their units.
    pub async fn create_staff(
        &self,
        staff: NewStaff,
    ) -> RegistryResult<Outcome<Staff, StoreError<S>>, S> {
        self.check_membership(staff.membership()).await?;

        let email = staff.email.clone();
        let staff = self
            .store
            .insert_staff(staff)
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(|| RegistryError::Duplicate(format!("staff email '{}'", email)))?;

        let report = if self.config.auto_assign_on_create && staff.is_active() {
            auto_assign(&self.store, staff.id, staff.membership()).await?
        } else {
            Report::new()
        };

        info!(
            staff_id = %staff.id,
            assigned = report.assigned(),
            "created staff member"
        );
        Ok(Outcome::new(staff, report))
    }

    pub async fn staff(&self, id: StaffId) -> RegistryResult<Staff, S> {
        self.store
            .get_staff(id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or(RegistryError::NotFound("staff", id.as_u64()))
    }

    pub async fn all_staff(&self) -> RegistryResult<Vec<Staff>, S> {
        self.store.all_staff().await.map_err(RegistryError::Store)
    }

    /// Updates a staff member and reconciles their software with the change.
    ///
    /// A transition from active to inactive revokes all automatically assigned software when
    /// `revoke_on_deactivate` is set. Otherwise, a changed department or team of an active staff
    /// member re-synchronises their software. Any other change leaves assignments alone.
    pub async fn update_staff(
        &self,
        staff: Staff,
    ) -> RegistryResult<Outcome<Staff, StoreError<S>>, S> {
        let existing = self.staff(staff.id).await?;

        if staff.email != existing.email
            && let Some(other) = self
                .store
                .staff_by_email(&staff.email)
                .await
                .map_err(RegistryError::Store)?
            && other.id != staff.id
        {
            return Err(RegistryError::Duplicate(format!(
                "staff email '{}'",
                staff.email
            )));
        }

        if staff.membership() != existing.membership() {
            self.check_membership(staff.membership()).await?;
        }

        if !self
            .store
            .update_staff(&staff)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(RegistryError::NotFound("staff", staff.id.as_u64()));
        }
        let updated = self.staff(staff.id).await?;

        let deactivated = existing.is_active() && !updated.is_active();
        let report = if deactivated {
            if self.config.revoke_on_deactivate {
                revoke_all(&self.store, updated.id).await?
            } else {
                Report::new()
            }
        } else if updated.is_active() && updated.membership() != existing.membership() {
            sync_staff(
                &self.store,
                updated.id,
                existing.membership(),
                updated.membership(),
            )
            .await?
        } else {
            Report::new()
        };

        info!(
            staff_id = %updated.id,
            deactivated,
            assigned = report.assigned(),
            unassigned = report.unassigned(),
            "updated staff member"
        );
        Ok(Outcome::new(updated, report))
    }

    /// Revokes all automatically assigned software of a staff member and marks them inactive.
    ///
    /// Manual grants are kept.
    pub async fn offboard_staff(
        &self,
        id: StaffId,
    ) -> RegistryResult<Outcome<Staff, StoreError<S>>, S> {
        let mut staff = self.staff(id).await?;
        let report = revoke_all(&self.store, id).await?;

        if staff.is_active() {
            staff.status = StaffStatus::Inactive;
            self.store
                .update_staff(&staff)
                .await
                .map_err(RegistryError::Store)?;
            staff = self.staff(id).await?;
        }

        info!(
            staff_id = %id,
            unassigned = report.unassigned(),
            failed = report.failures.len(),
            "offboarded staff member"
        );
        Ok(Outcome::new(staff, report))
    }

    /// Revokes all automatically assigned software of a staff member and removes the record.
    ///
    /// The record is kept when revoking any of the assignments failed.
    pub async fn delete_staff(&self, id: StaffId) -> RegistryResult<Report<StoreError<S>>, S> {
        self.staff(id).await?;
        let report = revoke_all(&self.store, id).await?;

        if report.is_complete() {
            self.store
                .delete_staff(id)
                .await
                .map_err(RegistryError::Store)?;
            info!(staff_id = %id, unassigned = report.unassigned(), "deleted staff member");
        }

        Ok(report)
    }

    /// Assignments of a staff member, whatever their source.
    pub async fn staff_software(&self, id: StaffId) -> RegistryResult<Vec<AssignedSoftware>, S> {
        self.staff(id).await?;
        self.store
            .assignments_for_staff(id)
            .await
            .map_err(RegistryError::Store)
    }

    // Software catalog.

    pub async fn create_software(&self, software: NewSoftware) -> RegistryResult<Software, S> {
        let name = software.name.clone();
        let software = self
            .store
            .insert_software(software)
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(|| RegistryError::Duplicate(format!("software name '{}'", name)))?;

        debug!(software_id = %software.id, "created software");
        Ok(software)
    }

    pub async fn software(&self, id: SoftwareId) -> RegistryResult<Software, S> {
        self.store
            .get_software(id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or(RegistryError::NotFound("software", id.as_u64()))
    }

    pub async fn all_software(&self) -> RegistryResult<Vec<Software>, S> {
        self.store.all_software().await.map_err(RegistryError::Store)
    }

    pub async fn update_software(&self, software: Software) -> RegistryResult<Software, S> {
        if let Some(other) = self
            .store
            .software_by_name(&software.name)
            .await
            .map_err(RegistryError::Store)?
            && other.id != software.id
        {
            return Err(RegistryError::Duplicate(format!(
                "software name '{}'",
                software.name
            )));
        }

        if !self
            .store
            .update_software(&software)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(RegistryError::NotFound("software", software.id.as_u64()));
        }
        self.software(software.id).await
    }

    /// Removes a software together with its match rules and revokes it from everyone holding it,
    /// including manual grants.
    ///
    /// The software record is kept when revoking any of the assignments failed, calling this
    /// again retries the deletion.
    pub async fn delete_software(
        &self,
        id: SoftwareId,
    ) -> RegistryResult<Report<StoreError<S>>, S> {
        self.software(id).await?;

        // Rules go first so no new edges to the software appear while revoking.
        let rules = self
            .store
            .all_matches()
            .await
            .map_err(RegistryError::Store)?;
        for rule in rules.iter().filter(|rule| rule.software_id == id) {
            self.store
                .delete_match(rule.id)
                .await
                .map_err(RegistryError::Store)?;
        }

        Ok(revoke_software(&self.store, id).await?)
    }

    /// Assignments of a software, whatever their source.
    pub async fn software_staff(&self, id: SoftwareId) -> RegistryResult<Vec<AssignedSoftware>, S> {
        self.software(id).await?;
        self.store
            .assignments_for_software(id)
            .await
            .map_err(RegistryError::Store)
    }

    // Match rules.

    /// Creates a match rule and, when `propagate` is set and rule propagation is enabled, assigns
    /// the software to every staff member in its scope who does not hold it yet.
    ///
    /// A rule for the same software and scope is rejected before anything is written.
    pub async fn create_match(
        &self,
        software_id: SoftwareId,
        scope: MatchScope,
        propagate: bool,
    ) -> RegistryResult<Outcome<MatchRule, StoreError<S>>, S> {
        self.software(software_id).await?;
        self.check_scope(scope).await?;

        let rule = self
            .store
            .insert_match(software_id, scope)
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(|| {
                RegistryError::Duplicate(format!(
                    "match rule of software {} for {}",
                    software_id, scope
                ))
            })?;

        let report = if propagate && self.config.propagate_rules {
            rule_created(&self.store, &rule).await?
        } else {
            Report::new()
        };

        info!(
            rule_id = %rule.id,
            scope = %rule.scope,
            software_id = %software_id,
            assigned = report.assigned(),
            "created match rule"
        );
        Ok(Outcome::new(rule, report))
    }

    pub async fn match_rule(&self, id: MatchId) -> RegistryResult<MatchRule, S> {
        self.store
            .get_match(id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or(RegistryError::NotFound("match rule", id.as_u64()))
    }

    /// Match rules of one scope.
    pub async fn matches(&self, scope: MatchScope) -> RegistryResult<Vec<MatchRule>, S> {
        self.store
            .matches_for_scope(scope)
            .await
            .map_err(RegistryError::Store)
    }

    /// Changes software or scope of a match rule.
    ///
    /// This is an ordinary record edit: staff members keep the software they received through
    /// the rule and nobody in the new scope receives it. Delete and create the rule to propagate
    /// the change instead.
    pub async fn update_match(&self, rule: MatchRule) -> RegistryResult<MatchRule, S> {
        self.match_rule(rule.id).await?;
        self.software(rule.software_id).await?;
        self.check_scope(rule.scope).await?;

        let duplicate = || {
            RegistryError::Duplicate(format!(
                "match rule of software {} for {}",
                rule.software_id, rule.scope
            ))
        };
        if let Some(other) = self
            .store
            .find_match(rule.software_id, rule.scope)
            .await
            .map_err(RegistryError::Store)?
            && other.id != rule.id
        {
            return Err(duplicate());
        }

        // A rule taking the same pair in the meantime makes the store refuse the update.
        if !self
            .store
            .update_match(&rule)
            .await
            .map_err(RegistryError::Store)?
        {
            self.match_rule(rule.id).await?;
            return Err(duplicate());
        }
        debug!(rule_id = %rule.id, scope = %rule.scope, "updated match rule");
        self.match_rule(rule.id).await
    }

    /// Deletes a match rule. When `revoke` is set and rule propagation is enabled, the software
    /// is revoked from every staff member in its scope who received it through rules of that
    /// scope.
    pub async fn delete_match(
        &self,
        id: MatchId,
        revoke: bool,
    ) -> RegistryResult<Report<StoreError<S>>, S> {
        let rule = self.match_rule(id).await?;

        if revoke && self.config.propagate_rules {
            return Ok(rule_deleted(&self.store, &rule).await?);
        }

        if !self
            .store
            .delete_match(id)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(RegistryError::NotFound("match rule", id.as_u64()));
        }
        debug!(rule_id = %id, "deleted match rule");
        Ok(Report::new())
    }

    // Manual assignments.

    /// Grants a software to a staff member by hand.
    ///
    /// Rejected when the staff member already holds the software, whatever the source.
    pub async fn assign_manual(
        &self,
        staff_id: StaffId,
        software_id: SoftwareId,
        actor: Actor,
    ) -> RegistryResult<AssignedSoftware, S> {
        self.staff(staff_id).await?;
        self.software(software_id).await?;

        if self
            .store
            .find_assignment(staff_id, software_id)
            .await
            .map_err(RegistryError::Store)?
            .is_some()
        {
            return Err(RegistryError::Duplicate(format!(
                "assignment of software {} to staff {}",
                software_id, staff_id
            )));
        }

        let assignment = self
            .store
            .insert_assignment(NewAssignment::new(
                staff_id,
                software_id,
                AssignmentSource::Manual,
            ))
            .await
            .map_err(RegistryError::Store)?;
        record_change(
            &self.store,
            staff_id,
            software_id,
            AssignmentAction::Assigned,
            actor,
        )
        .await
        .map_err(RegistryError::Store)?;

        info!(
            staff_id = %staff_id,
            software_id = %software_id,
            changed_by = %actor,
            "assigned software manually"
        );
        Ok(assignment)
    }

    /// Removes one assignment, whatever its source, and returns it.
    pub async fn unassign(
        &self,
        id: AssignmentId,
        actor: Actor,
    ) -> RegistryResult<AssignedSoftware, S> {
        let assignment = self
            .store
            .get_assignment(id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or(RegistryError::NotFound("assignment", id.as_u64()))?;

        if !self
            .store
            .delete_assignment(id)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(RegistryError::NotFound("assignment", id.as_u64()));
        }
        record_change(
            &self.store,
            assignment.staff_id,
            assignment.software_id,
            AssignmentAction::Unassigned,
            actor,
        )
        .await
        .map_err(RegistryError::Store)?;

        info!(
            staff_id = %assignment.staff_id,
            software_id = %assignment.software_id,
            source = %assignment.source,
            changed_by = %actor,
            "unassigned software manually"
        );
        Ok(assignment)
    }

    /// Changes staff member, software or source of an assignment.
    ///
    /// This is an ordinary record edit, no audit log entry is written. Rejected when the staff
    /// member already holds the software through another assignment.
    pub async fn update_assignment(
        &self,
        assignment: AssignedSoftware,
    ) -> RegistryResult<AssignedSoftware, S> {
        let not_found = || RegistryError::NotFound("assignment", assignment.id.as_u64());

        self.store
            .get_assignment(assignment.id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(not_found)?;
        self.staff(assignment.staff_id).await?;
        self.software(assignment.software_id).await?;

        if let Some(other) = self
            .store
            .find_assignment(assignment.staff_id, assignment.software_id)
            .await
            .map_err(RegistryError::Store)?
            && other.id != assignment.id
        {
            return Err(RegistryError::Duplicate(format!(
                "assignment of software {} to staff {}",
                assignment.software_id, assignment.staff_id
            )));
        }

        if !self
            .store
            .update_assignment(&assignment)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(not_found());
        }
        debug!(
            assignment_id = %assignment.id,
            source = %assignment.source,
            "updated assignment"
        );

        self.store
            .get_assignment(assignment.id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(not_found)
    }

    // Audit log.

    /// Audit log entries matching the query, newest first.
    pub async fn logs(&self, query: &LogQuery) -> RegistryResult<Vec<AssignmentLog>, S> {
        self.store.logs(query).await.map_err(RegistryError::Store)
    }

    /// Corrects the action and actor of an audit log entry.
    ///
    /// This is an ordinary record edit, it does not touch any assignment.
    pub async fn correct_log(
        &self,
        id: LogId,
        action: AssignmentAction,
        changed_by: Actor,
    ) -> RegistryResult<AssignmentLog, S> {
        let not_found = || RegistryError::NotFound("log entry", id.as_u64());

        let mut entry = self
            .store
            .get_log(id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(not_found)?;
        entry.action = action;
        entry.changed_by = changed_by;

        if !self
            .store
            .update_log(&entry)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(not_found());
        }

        self.store
            .get_log(id)
            .await
            .map_err(RegistryError::Store)?
            .ok_or_else(not_found)
    }

    /// Removes an audit log entry.
    pub async fn delete_log(&self, id: LogId) -> RegistryResult<(), S> {
        if !self
            .store
            .delete_log(id)
            .await
            .map_err(RegistryError::Store)?
        {
            return Err(RegistryError::NotFound("log entry", id.as_u64()));
        }
        debug!(log_id = %id, "deleted log entry");
        Ok(())
    }
}

/// Record written by a registry call together with the assignment changes it caused.
#[derive(Debug)]
pub struct Outcome<T, E> {
    pub record: T,
    pub report: Report<E>,
}

impl<T, E> Outcome<T, E> {
    fn new(record: T, report: Report<E>) -> Self {
        Self { record, report }
    }

    pub fn into_record(self) -> T {
        self.record
    }
}

/// Switches for the automatic reconciliation of assignments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Assign the software matched by their units to newly created staff members.
    pub auto_assign_on_create: bool,

    /// Revoke automatically assigned software of staff members who become inactive.
    pub revoke_on_deactivate: bool,

    /// Allow match rule changes to propagate to existing staff members.
    pub propagate_rules: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_assign_on_create: true,
            revoke_on_deactivate: true,
            propagate_rules: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError<E> {
    /// Record with the given kind and identifier does not exist.
    #[error("{0} {1} not found")]
    NotFound(&'static str, u64),

    /// Record conflicts with an existing one.
    #[error("duplicate {0}")]
    Duplicate(String),

    #[error(transparent)]
    Engine(#[from] EngineError<E>),

    #[error("store error: {0}")]
    Store(E),
}
