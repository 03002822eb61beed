// SPDX-License-Identifier: MIT OR Apache-2.0

use std::convert::Infallible;

use allotment_core::{NewSoftware, Software, SoftwareId, current_timestamp};

use crate::memory::{MemoryStore, SharedTable};
use crate::software::SoftwareStore;

#[derive(Clone, Debug, Default)]
pub struct SoftwareMemoryStore {
    software: SharedTable<SoftwareId, Software>,
}

impl SoftwareStore for MemoryStore {
    type Error = Infallible;

    async fn insert_software(
        &self,
        software: NewSoftware,
    ) -> Result<Option<Software>, Self::Error> {
        let mut table = self.software.software.borrow_mut();
        if table
            .rows
            .values()
            .any(|existing| existing.name == software.name)
        {
            return Ok(None);
        }

        let timestamp = current_timestamp();
        let software = Software {
            id: table.next_id(),
            name: software.name,
            description: software.description,
            kind: software.kind,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(software.id, software.clone());
        Ok(Some(software))
    }

    async fn get_software(&self, id: SoftwareId) -> Result<Option<Software>, Self::Error> {
        Ok(self.software.software.borrow().rows.get(&id).cloned())
    }

    async fn software_by_name(&self, name: &str) -> Result<Option<Software>, Self::Error> {
        Ok(self
            .software
            .software
            .borrow()
            .rows
            .values()
            .find(|software| software.name == name)
            .cloned())
    }

    async fn all_software(&self) -> Result<Vec<Software>, Self::Error> {
        Ok(self.software.software.borrow().rows.values().cloned().collect())
    }

    async fn update_software(&self, software: &Software) -> Result<bool, Self::Error> {
        let mut table = self.software.software.borrow_mut();
        let Some(existing) = table.rows.get_mut(&software.id) else {
            return Ok(false);
        };
        existing.name = software.name.clone();
        existing.description = software.description.clone();
        existing.kind = software.kind.clone();
        existing.updated_at = current_timestamp();
        Ok(true)
    }

    async fn delete_software(&self, id: SoftwareId) -> Result<bool, Self::Error> {
        Ok(self.software.software.borrow_mut().rows.remove(&id).is_some())
    }
}
