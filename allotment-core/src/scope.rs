// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{AssignmentSource, DepartmentId, TeamId};

/// Set of staff members a match rule applies to.
///
/// Scopes are limited to exactly three fixed levels, rules can not be nested or combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "scope_id", rename_all = "lowercase")]
pub enum MatchScope {
    /// Every staff member of the organization.
    Organization,

    /// Every staff member of the given department.
    Department(DepartmentId),

    /// Every staff member of the given team.
    Team(TeamId),
}

impl MatchScope {
    /// Source tag of assignment edges created by rules of this scope.
    pub fn source(&self) -> AssignmentSource {
        match self {
            MatchScope::Organization => AssignmentSource::Organization,
            MatchScope::Department(_) => AssignmentSource::Department,
            MatchScope::Team(_) => AssignmentSource::Team,
        }
    }

    /// Raw id of the unit, `None` for the organization scope.
    pub fn unit_id(&self) -> Option<u64> {
        match self {
            MatchScope::Organization => None,
            MatchScope::Department(id) => Some(id.as_u64()),
            MatchScope::Team(id) => Some(id.as_u64()),
        }
    }
}

impl Display for MatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchScope::Organization => write!(f, "organization"),
            MatchScope::Department(id) => write!(f, "department:{}", id),
            MatchScope::Team(id) => write!(f, "team:{}", id),
        }
    }
}

/// Organizational units a staff member belongs to.
///
/// Both units are optional, a missing unit means the staff member is not covered by any rule of
/// that level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    pub department_id: Option<DepartmentId>,
    pub team_id: Option<TeamId>,
}

impl Membership {
    pub fn new(department_id: Option<DepartmentId>, team_id: Option<TeamId>) -> Self {
        Self {
            department_id,
            team_id,
        }
    }

    /// Scopes of all rules which apply to this membership, ordered by their precedence when
    /// assigning for the first time: department, team and lastly organization.
    pub fn scopes(&self) -> Vec<MatchScope> {
        let mut scopes = Vec::with_capacity(3);
        if let Some(id) = self.department_id {
            scopes.push(MatchScope::Department(id));
        }
        if let Some(id) = self.team_id {
            scopes.push(MatchScope::Team(id));
        }
        scopes.push(MatchScope::Organization);
        scopes
    }
}

#[cfg(test)]
mod tests {
    use crate::{AssignmentSource, DepartmentId, TeamId};

    use super::{MatchScope, Membership};

    #[test]
    fn scope_precedence() {
        let department = DepartmentId::new(3).unwrap();
        let team = TeamId::new(5).unwrap();

        assert_eq!(
            Membership::new(Some(department), Some(team)).scopes(),
            vec![
                MatchScope::Department(department),
                MatchScope::Team(team),
                MatchScope::Organization
            ]
        );

        // Organization rules apply even without any unit membership.
        assert_eq!(
            Membership::default().scopes(),
            vec![MatchScope::Organization]
        );
    }

    #[test]
    fn scope_sources() {
        let team = TeamId::new(1).unwrap();
        assert_eq!(MatchScope::Team(team).source(), AssignmentSource::Team);
        assert_eq!(
            MatchScope::Organization.source(),
            AssignmentSource::Organization
        );
        assert_eq!(MatchScope::Organization.unit_id(), None);
        assert_eq!(MatchScope::Team(team).unit_id(), Some(1));
    }
}
