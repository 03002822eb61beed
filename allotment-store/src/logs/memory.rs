// SPDX-License-Identifier: MIT OR Apache-2.0

use std::convert::Infallible;

use allotment_core::{AssignmentLog, LogId, NewAssignmentLog, current_timestamp};

use crate::logs::{AuditLogStore, LogQuery};
use crate::memory::{MemoryStore, SharedTable};

#[derive(Clone, Debug, Default)]
pub struct AuditLogMemoryStore {
    entries: SharedTable<LogId, AssignmentLog>,
}

impl AuditLogStore for MemoryStore {
    type Error = Infallible;

    async fn append_log(&self, entry: NewAssignmentLog) -> Result<AssignmentLog, Self::Error> {
        let mut table = self.logs.entries.borrow_mut();
        let timestamp = current_timestamp();
        let entry = AssignmentLog {
            id: table.next_id(),
            staff_id: entry.staff_id,
            software_id: entry.software_id,
            action: entry.action,
            changed_by: entry.changed_by,
            changed_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn get_log(&self, id: LogId) -> Result<Option<AssignmentLog>, Self::Error> {
        Ok(self.logs.entries.borrow().rows.get(&id).cloned())
    }

    async fn logs(&self, query: &LogQuery) -> Result<Vec<AssignmentLog>, Self::Error> {
        let table = self.logs.entries.borrow();
        let mut entries: Vec<AssignmentLog> = table
            .rows
            .values()
            .filter(|entry| query.matches(entry))
            .cloned()
            .collect();

        // Newest first, entries of the same second are ordered by insertion.
        entries.sort_by(|a, b| (b.changed_at, b.id).cmp(&(a.changed_at, a.id)));

        Ok(entries
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit.map_or(usize::MAX, |limit| limit as usize))
            .collect())
    }

    async fn update_log(&self, entry: &AssignmentLog) -> Result<bool, Self::Error> {
        let mut table = self.logs.entries.borrow_mut();
        let Some(existing) = table.rows.get_mut(&entry.id) else {
            return Ok(false);
        };
        existing.staff_id = entry.staff_id;
        existing.software_id = entry.software_id;
        existing.action = entry.action;
        existing.changed_by = entry.changed_by;
        existing.updated_at = current_timestamp();
        Ok(true)
    }

    async fn delete_log(&self, id: LogId) -> Result<bool, Self::Error> {
        Ok(self.logs.entries.borrow_mut().rows.remove(&id).is_some())
    }
}
