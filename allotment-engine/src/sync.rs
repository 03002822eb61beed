// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{
    AssignmentAction, AssignmentSource, MatchRule, MatchScope, Membership, SoftwareId, Staff,
    StaffId,
};
use tracing::{debug, info};

use crate::assign::{assign, auto_assign};
use crate::audit::log_applied;
use crate::report::{Report, Stage};
use crate::{EngineError, EngineStore};

/// Re-synchronises the assignments of a staff member who moved to another department or team.
///
/// Software assigned through the rules of the former department and the former team is revoked
/// first, then [`auto_assign`] runs for the new membership. Both former units are revoked as soon
/// as either of them changed, so edges of the unit which stayed are re-created with the source the
/// new membership gives them. Manual grants and organization-wide assignments always stay.
///
/// An identical old and new membership writes nothing.
pub async fn sync_staff<S, E>(
    store: &S,
    staff_id: StaffId,
    old: Membership,
    new: Membership,
) -> Result<Report<E>, EngineError<E>>
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    let mut report = Report::new();

    if old == new {
        debug!(staff_id = %staff_id, "membership unchanged, nothing to synchronise");
        return Ok(report);
    }

    if let Some(department_id) = old.department_id {
        let revoked =
            revoke_from_source(store, staff_id, MatchScope::Department(department_id)).await?;
        report.merge(revoked);
    }

    if let Some(team_id) = old.team_id {
        let revoked = revoke_from_source(store, staff_id, MatchScope::Team(team_id)).await?;
        report.merge(revoked);
    }

    report.merge(auto_assign(store, staff_id, new).await?);

    info!(
        staff_id = %staff_id,
        assigned = report.assigned(),
        unassigned = report.unassigned(),
        failed = report.failures.len(),
        "synchronised software after unit change"
    );

    Ok(report)
}

/// Revokes all software a staff member received through the rules of one scope.
///
/// Only edges carrying the source of that scope are removed, a manual grant of the same software
/// is never touched.
pub async fn revoke_from_source<S, E>(
    store: &S,
    staff_id: StaffId,
    scope: MatchScope,
) -> Result<Report<E>, EngineError<E>>
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    let software = store
        .software_for_scope(scope)
        .await
        .map_err(EngineError::Read)?;

    let mut report = Report::new();
    for software_id in software {
        revoke_matching(store, &mut report, staff_id, software_id, scope.source()).await;
    }

    debug!(
        staff_id = %staff_id,
        scope = %scope,
        unassigned = report.unassigned(),
        "revoked software of former unit"
    );

    Ok(report)
}

/// Propagates a newly created match rule to every staff member in its scope.
///
/// Staff members who already hold the software, whatever its source, are skipped.
pub async fn rule_created<S, E>(store: &S, rule: &MatchRule) -> Result<Report<E>, EngineError<E>>
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    let staff = staff_in_scope(store, rule.scope).await?;
    let source = rule.scope.source();

    let mut report = Report::new();
    for member in staff {
        match store.find_assignment(member.id, rule.software_id).await {
            Ok(Some(_)) => continue,
            Ok(None) => assign(store, &mut report, member.id, rule.software_id, source).await,
            // Without knowing whether an edge exists we can't assign safely.
            Err(err) => report.fail(member.id, rule.software_id, Stage::Assign, err),
        }
    }

    info!(
        rule_id = %rule.id,
        scope = %rule.scope,
        software_id = %rule.software_id,
        assigned = report.assigned(),
        failed = report.failures.len(),
        "propagated new match rule"
    );

    Ok(report)
}

/// Removes a match rule and revokes the software from every staff member in its scope who
/// received it through rules of that scope.
///
/// The rule is deleted first. If that fails nothing is revoked.
pub async fn rule_deleted<S, E>(store: &S, rule: &MatchRule) -> Result<Report<E>, EngineError<E>>
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    store
        .delete_match(rule.id)
        .await
        .map_err(EngineError::Write)?;

    let staff = staff_in_scope(store, rule.scope).await?;
    let source = rule.scope.source();

    let mut report = Report::new();
    for member in staff {
        revoke_matching(store, &mut report, member.id, rule.software_id, source).await;
    }

    info!(
        rule_id = %rule.id,
        scope = %rule.scope,
        software_id = %rule.software_id,
        unassigned = report.unassigned(),
        failed = report.failures.len(),
        "revoked software of deleted match rule"
    );

    Ok(report)
}

/// Every staff member covered by a scope.
async fn staff_in_scope<S, E>(store: &S, scope: MatchScope) -> Result<Vec<Staff>, EngineError<E>>
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    let staff = match scope {
        MatchScope::Organization => store.all_staff().await,
        MatchScope::Department(id) => store.staff_by_department(id).await,
        MatchScope::Team(id) => store.staff_by_team(id).await,
    };
    staff.map_err(EngineError::Read)
}

/// Deletes the edges between a staff member and a software carrying the given source and logs
/// every removed one.
async fn revoke_matching<S, E>(
    store: &S,
    report: &mut Report<E>,
    staff_id: StaffId,
    software_id: SoftwareId,
    source: AssignmentSource,
) where
    S: EngineStore<E>,
    E: std::error::Error,
{
    match store
        .delete_assignments(staff_id, software_id, source)
        .await
    {
        Ok(removed) => {
            for _ in 0..removed {
                debug!(
                    staff_id = %staff_id,
                    software_id = %software_id,
                    source = %source,
                    "unassigned software"
                );
                log_applied(
                    store,
                    report,
                    staff_id,
                    software_id,
                    AssignmentAction::Unassigned,
                    source,
                )
                .await;
            }
        }
        Err(err) => report.fail(staff_id, software_id, Stage::Revoke, err),
    }
}
