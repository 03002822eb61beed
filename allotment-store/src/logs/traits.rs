// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use allotment_core::{
    AssignmentAction, AssignmentLog, LogId, NewAssignmentLog, SoftwareId, StaffId,
};
use serde::{Deserialize, Serialize};

/// Interface for appending to and querying the assignment audit log.
///
/// Entries are never changed by the assignment engine. [`update_log`](AuditLogStore::update_log)
/// and [`delete_log`](AuditLogStore::delete_log) only exist for explicit corrections.
pub trait AuditLogStore {
    type Error: Error;

    fn append_log(
        &self,
        entry: NewAssignmentLog,
    ) -> impl Future<Output = Result<AssignmentLog, Self::Error>>;

    fn get_log(
        &self,
        id: LogId,
    ) -> impl Future<Output = Result<Option<AssignmentLog>, Self::Error>>;

    /// Entries matching the query, newest first.
    fn logs(&self, query: &LogQuery)
    -> impl Future<Output = Result<Vec<AssignmentLog>, Self::Error>>;

    /// Overwrite staff member, software, action and actor of an entry.
    ///
    /// Returns `true` when an entry with this id existed.
    fn update_log(&self, entry: &AssignmentLog) -> impl Future<Output = Result<bool, Self::Error>>;

    fn delete_log(&self, id: LogId) -> impl Future<Output = Result<bool, Self::Error>>;
}

/// Filter and pagination of audit log queries.
///
/// Unset filters match every entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    pub staff_id: Option<StaffId>,
    pub software_id: Option<SoftwareId>,
    pub action: Option<AssignmentAction>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: u32,
}

impl LogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staff(mut self, staff_id: StaffId) -> Self {
        self.staff_id = Some(staff_id);
        self
    }

    pub fn software(mut self, software_id: SoftwareId) -> Self {
        self.software_id = Some(software_id);
        self
    }

    pub fn action(mut self, action: AssignmentAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Returns `true` if the entry passes all filters, pagination is not considered.
    pub fn matches(&self, entry: &AssignmentLog) -> bool {
        self.staff_id.is_none_or(|id| entry.staff_id == id)
            && self.software_id.is_none_or(|id| entry.software_id == id)
            && self.action.is_none_or(|action| entry.action == action)
    }
}
