// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_core::{
    Actor, AssignmentAction, AssignmentLog, AssignmentSource, NewAssignmentLog, SoftwareId,
    StaffId,
};
use allotment_store::AuditLogStore;

use crate::report::{Report, Stage};

/// Appends an audit log entry for a change the engine made.
///
/// Engine changes are always attributed to [`Actor::System`].
pub async fn log_change<S>(
    store: &S,
    staff_id: StaffId,
    software_id: SoftwareId,
    action: AssignmentAction,
) -> Result<AssignmentLog, S::Error>
where
    S: AuditLogStore,
{
    record_change(store, staff_id, software_id, action, Actor::System).await
}

/// Appends an audit log entry attributed to the given actor.
pub async fn record_change<S>(
    store: &S,
    staff_id: StaffId,
    software_id: SoftwareId,
    action: AssignmentAction,
    changed_by: Actor,
) -> Result<AssignmentLog, S::Error>
where
    S: AuditLogStore,
{
    store
        .append_log(NewAssignmentLog {
            staff_id,
            software_id,
            action,
            changed_by,
        })
        .await
}

/// Logs a change which was already applied to the store and adds it to the report.
///
/// The change is reported even when logging it failed, the failure is reported next to it.
pub(crate) async fn log_applied<S, E>(
    store: &S,
    report: &mut Report<E>,
    staff_id: StaffId,
    software_id: SoftwareId,
    action: AssignmentAction,
    source: AssignmentSource,
) where
    S: AuditLogStore<Error = E>,
    E: std::error::Error,
{
    report.change(staff_id, software_id, action, source);
    if let Err(err) = log_change(store, staff_id, software_id, action).await {
        report.fail(staff_id, software_id, Stage::Log, err);
    }
}
