// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stored records and the inputs used to create them.
use serde::{Deserialize, Serialize};

use crate::{
    Actor, AssignmentAction, AssignmentId, AssignmentSource, DepartmentId, LogId, MatchId,
    MatchScope, Membership, SoftwareId, StaffId, StaffStatus, TeamId, Timestamp,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub department_id: Option<DepartmentId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub department_id: Option<DepartmentId>,
}

/// Staff member of the organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<DepartmentId>,
    pub team_id: Option<TeamId>,
    pub status: StaffStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Staff {
    pub fn membership(&self) -> Membership {
        Membership::new(self.department_id, self.team_id)
    }

    pub fn is_active(&self) -> bool {
        self.status == StaffStatus::Active
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStaff {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<DepartmentId>,
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub status: StaffStatus,
}

impl NewStaff {
    pub fn membership(&self) -> Membership {
        Membership::new(self.department_id, self.team_id)
    }
}

/// Software license or tool listed in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    pub id: SoftwareId,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSoftware {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: String,
}

/// Edge between a staff member and a software.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedSoftware {
    pub id: AssignmentId,
    pub staff_id: StaffId,
    pub software_id: SoftwareId,
    pub source: AssignmentSource,
    pub assigned_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub staff_id: StaffId,
    pub software_id: SoftwareId,
    pub source: AssignmentSource,
}

impl NewAssignment {
    pub fn new(staff_id: StaffId, software_id: SoftwareId, source: AssignmentSource) -> Self {
        Self {
            staff_id,
            software_id,
            source,
        }
    }
}

/// Rule stating that a software must be assigned to every staff member of a scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    pub id: MatchId,
    pub software_id: SoftwareId,
    #[serde(flatten)]
    pub scope: MatchScope,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Audit log entry of a single assignment change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentLog {
    pub id: LogId,
    pub staff_id: StaffId,
    pub software_id: SoftwareId,
    pub action: AssignmentAction,
    pub changed_by: Actor,
    pub changed_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignmentLog {
    pub staff_id: StaffId,
    pub software_id: SoftwareId,
    pub action: AssignmentAction,
    #[serde(default)]
    pub changed_by: Actor,
}
