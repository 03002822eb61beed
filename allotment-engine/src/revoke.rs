// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{AssignedSoftware, AssignmentAction, SoftwareId, StaffId};
use tracing::{debug, info};

use crate::audit::log_applied;
use crate::report::{Report, Stage};
use crate::{EngineError, EngineStore};

/// Revokes every automatically assigned software of a staff member, used when offboarding.
///
/// Manual grants are kept, only edges created by match rules are removed.
pub async fn revoke_all<S, E>(store: &S, staff_id: StaffId) -> Result<Report<E>, EngineError<E>>
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    let assignments = store
        .assignments_for_staff(staff_id)
        .await
        .map_err(EngineError::Read)?;

    let mut report = Report::new();
    for assignment in assignments {
        if assignment.source.is_auto_assigned() {
            revoke(store, &mut report, &assignment).await;
        }
    }

    info!(
        staff_id = %staff_id,
        unassigned = report.unassigned(),
        failed = report.failures.len(),
        "revoked auto-assigned software"
    );

    Ok(report)
}

/// Revokes a software from everyone holding it and removes the software record afterwards.
///
/// Unlike [`revoke_all`] this also removes manual grants, as the software they point at ceases to
/// exist. When removing any of the edges failed the software record is kept, so the deletion can
/// be retried without leaving edges behind.
pub async fn revoke_software<S, E>(
    store: &S,
    software_id: SoftwareId,
) -> Result<Report<E>, EngineError<E>>
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    let assignments = store
        .assignments_for_software(software_id)
        .await
        .map_err(EngineError::Read)?;

    let mut report = Report::new();
    for assignment in assignments {
        revoke(store, &mut report, &assignment).await;
    }

    if report.failed_at(Stage::Revoke) {
        info!(
            software_id = %software_id,
            unassigned = report.unassigned(),
            failed = report.failures.len(),
            "kept software record as not all assignments could be revoked"
        );
        return Ok(report);
    }

    store
        .delete_software(software_id)
        .await
        .map_err(EngineError::Write)?;

    info!(
        software_id = %software_id,
        unassigned = report.unassigned(),
        "revoked and removed software"
    );

    Ok(report)
}

/// Removes a single edge and logs it, recording any failure in the report.
pub(crate) async fn revoke<S, E>(store: &S, report: &mut Report<E>, assignment: &AssignedSoftware)
where
    S: EngineStore<E>,
    E: std::error::Error,
{
    match store.delete_assignment(assignment.id).await {
        Ok(true) => {
            debug!(
                staff_id = %assignment.staff_id,
                software_id = %assignment.software_id,
                source = %assignment.source,
                "unassigned software"
            );
            log_applied(
                store,
                report,
                assignment.staff_id,
                assignment.software_id,
                AssignmentAction::Unassigned,
                assignment.source,
            )
            .await;
        }
        // Removed in the meantime, nothing to log.
        Ok(false) => (),
        Err(err) => report.fail(
            assignment.staff_id,
            assignment.software_id,
            Stage::Revoke,
            err,
        ),
    }
}
