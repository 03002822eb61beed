// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::num::NonZeroU64;
use std::rc::Rc;

use crate::assignments::AssignmentMemoryStore;
use crate::logs::AuditLogMemoryStore;
use crate::matches::MatchMemoryStore;
use crate::software::SoftwareMemoryStore;
use crate::staff::StaffMemoryStore;
use crate::units::UnitMemoryStore;

/// In-memory store.
///
/// This does not persist data permamently, all changes are lost when the process ends. Use this
/// only in development or test contexts.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub units: UnitMemoryStore,
    pub staff: StaffMemoryStore,
    pub software: SoftwareMemoryStore,
    pub assignments: AssignmentMemoryStore,
    pub matches: MatchMemoryStore,
    pub logs: AuditLogMemoryStore,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Trait implementations are in the regarding modules, see for example `staff` or `assignments`.

/// Rows of one record family ordered by their identifier.
#[derive(Debug)]
pub(crate) struct Table<K, V> {
    pub(crate) rows: BTreeMap<K, V>,
    last_id: u64,
}

impl<K, V> Table<K, V> {
    /// Hands out the next identifier, starting at `1`. Identifiers are never re-used, even after
    /// their row was removed.
    pub(crate) fn next_id<I>(&mut self) -> I
    where
        I: From<NonZeroU64>,
    {
        self.last_id += 1;
        I::from(NonZeroU64::MIN.saturating_add(self.last_id - 1))
    }
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

pub(crate) type SharedTable<K, V> = Rc<RefCell<Table<K, V>>>;
