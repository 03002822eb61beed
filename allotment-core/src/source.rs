// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mechanism which created an assignment edge between a staff member and a software.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentSource {
    /// Granted directly by an administrator.
    #[default]
    Manual,

    /// Created by a department match rule.
    Department,

    /// Created by a team match rule.
    Team,

    /// Created by an organization-wide match rule.
    Organization,
}

impl AssignmentSource {
    /// Returns `true` if the edge was created by a match rule and may be revoked automatically.
    ///
    /// Manual grants are never touched by offboarding or unit changes.
    pub fn is_auto_assigned(&self) -> bool {
        match self {
            AssignmentSource::Manual => false,
            AssignmentSource::Department
            | AssignmentSource::Team
            | AssignmentSource::Organization => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentSource::Manual => "manual",
            AssignmentSource::Department => "department",
            AssignmentSource::Team => "team",
            AssignmentSource::Organization => "organization",
        }
    }
}

impl Display for AssignmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssignmentSource {
    type Err = ParseSourceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manual" => Ok(Self::Manual),
            "department" => Ok(Self::Department),
            "team" => Ok(Self::Team),
            "organization" => Ok(Self::Organization),
            _ => Err(ParseSourceError(value.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown assignment source '{0}'")]
pub struct ParseSourceError(String);

/// Kind of change recorded in the audit log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentAction {
    Assigned,
    Unassigned,
}

impl AssignmentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentAction::Assigned => "Assigned",
            AssignmentAction::Unassigned => "Unassigned",
        }
    }
}

impl Display for AssignmentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssignmentAction {
    type Err = ParseActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Assigned" => Ok(Self::Assigned),
            "Unassigned" => Ok(Self::Unassigned),
            _ => Err(ParseActionError(value.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown assignment action '{0}'")]
pub struct ParseActionError(String);

/// Identity which performed a change.
///
/// Engine-initiated changes are always attributed to [`Actor::System`], which is stored as the
/// numeric sentinel `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum Actor {
    #[default]
    System,
    User(u64),
}

impl Actor {
    pub fn is_system(&self) -> bool {
        matches!(self, Actor::System)
    }
}

impl From<u64> for Actor {
    fn from(value: u64) -> Self {
        match value {
            0 => Actor::System,
            id => Actor::User(id),
        }
    }
}

impl From<Actor> for u64 {
    fn from(actor: Actor) -> Self {
        match actor {
            Actor::System => 0,
            // A user id of zero can not be told apart from the system sentinel.
            Actor::User(id) => id,
        }
    }
}

impl Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::System => write!(f, "system"),
            Actor::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// Lifecycle status of a staff member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
}

impl StaffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffStatus::Active => "active",
            StaffStatus::Inactive => "inactive",
        }
    }
}

impl Display for StaffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StaffStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("active") {
            Ok(Self::Active)
        } else if value.eq_ignore_ascii_case("inactive") {
            Ok(Self::Inactive)
        } else {
            Err(ParseStatusError(value.to_string()))
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown staff status '{0}'")]
pub struct ParseStatusError(String);
