// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use allotment_core::{
    AssignmentAction, AssignmentSource, Membership, NewAssignment, SoftwareId, StaffId,
};
use tracing::{debug, info};

use crate::audit::log_applied;
use crate::report::{Report, Stage};
use crate::{EngineError, EngineStore};

/// Assigns all software matched by the organization, department and team rules of a staff
/// member, skipping software the staff member already holds.
///
/// Rules are evaluated department first, then team and lastly organization. When several rules
/// match the same software only the first one creates an edge and decides its source. Existing
/// edges are never re-tagged, whatever their source.
///
/// Running this twice with the same membership creates nothing the second time.
pub async fn auto_assign<S, E>(
    store: &S,
    staff_id: StaffId,
    membership: Membership,
) -> Result<Report<E>, EngineError<E>>
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    let mut handled: HashSet<SoftwareId> = store
        .assigned_software_ids(staff_id)
        .await
        .map_err(EngineError::Read)?
        .into_iter()
        .collect();

    // Gather all candidates before writing anything, a failing rule query aborts without
    // changes.
    let mut candidates = Vec::new();
    for scope in membership.scopes() {
        let software = store
            .software_for_scope(scope)
            .await
            .map_err(EngineError::Read)?;
        candidates.extend(software.into_iter().map(|id| (id, scope.source())));
    }

    let mut report = Report::new();
    for (software_id, source) in candidates {
        // A failed attempt also counts as handled, a later rule must not take over the
        // software with a different source.
        if !handled.insert(software_id) {
            continue;
        }
        assign(store, &mut report, staff_id, software_id, source).await;
    }

    info!(
        staff_id = %staff_id,
        assigned = report.assigned(),
        failed = report.failures.len(),
        "auto-assigned software"
    );

    Ok(report)
}

/// Creates an edge and logs it, recording any failure in the report.
pub(crate) async fn assign<S, E>(
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
        .insert_assignment(NewAssignment::new(staff_id, software_id, source))
        .await
    {
        Ok(_) => {
            debug!(
                staff_id = %staff_id,
                software_id = %software_id,
                source = %source,
                "assigned software"
            );
            log_applied(
                store,
                report,
                staff_id,
                software_id,
                AssignmentAction::Assigned,
                source,
            )
            .await;
        }
        Err(err) => report.fail(staff_id, software_id, Stage::Assign, err),
    }
}
