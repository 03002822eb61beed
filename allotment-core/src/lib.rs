// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core data types for tracking which software is assigned to which staff member.
//!
//! Software reaches a staff member either through a _manual_ grant or through a declarative
//! match rule which covers a whole organization, a department or a team. Every assignment edge
//! carries an [`AssignmentSource`] recording which of these mechanisms created it, and every
//! change to an edge is mirrored by an [`AssignmentLog`] entry.
//!
//! This crate holds no logic beyond parsing and formatting, storage interfaces live in
//! `allotment-store` and the synchronisation logic in `allotment-engine`.
pub mod id;
pub mod records;
pub mod scope;
pub mod source;
mod time;

pub use id::{
    AssignmentId, DepartmentId, IdError, LogId, MatchId, SoftwareId, StaffId, TeamId,
};
pub use records::{
    AssignedSoftware, AssignmentLog, Department, MatchRule, NewAssignment, NewAssignmentLog,
    NewDepartment, NewSoftware, NewStaff, NewTeam, Software, Staff, Team,
};
pub use scope::{MatchScope, Membership};
pub use source::{
    Actor, AssignmentAction, AssignmentSource, ParseActionError, ParseSourceError,
    ParseStatusError, StaffStatus,
};
pub use time::{Timestamp, current_timestamp};
