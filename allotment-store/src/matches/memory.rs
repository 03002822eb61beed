// SPDX-License-Identifier: MIT OR Apache-2.0

use std::convert::Infallible;

use allotment_core::{MatchId, MatchRule, MatchScope, SoftwareId, current_timestamp};

use crate::matches::MatchStore;
use crate::memory::{MemoryStore, SharedTable};

#[derive(Clone, Debug, Default)]
pub struct MatchMemoryStore {
    rules: SharedTable<MatchId, MatchRule>,
}

impl MatchMemoryStore {
    fn for_scope(&self, scope: MatchScope) -> Vec<MatchRule> {
        self.rules
            .borrow()
            .rows
            .values()
            .filter(|rule| rule.scope == scope)
            .cloned()
            .collect()
    }
}

impl MatchStore for MemoryStore {
    type Error = Infallible;

    async fn insert_match(
        &self,
        software_id: SoftwareId,
        scope: MatchScope,
    ) -> Result<Option<MatchRule>, Self::Error> {
        let mut table = self.matches.rules.borrow_mut();
        if table
            .rows
            .values()
            .any(|rule| rule.software_id == software_id && rule.scope == scope)
        {
            return Ok(None);
        }

        let timestamp = current_timestamp();
        let rule = MatchRule {
            id: table.next_id(),
            software_id,
            scope,
            created_at: timestamp,
            updated_at: timestamp,
        };
        table.rows.insert(rule.id, rule.clone());
        Ok(Some(rule))
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<MatchRule>, Self::Error> {
        Ok(self.matches.rules.borrow().rows.get(&id).cloned())
    }

    async fn find_match(
        &self,
        software_id: SoftwareId,
        scope: MatchScope,
    ) -> Result<Option<MatchRule>, Self::Error> {
        Ok(self
            .matches
            .for_scope(scope)
            .into_iter()
            .find(|rule| rule.software_id == software_id))
    }

    async fn matches_for_scope(&self, scope: MatchScope) -> Result<Vec<MatchRule>, Self::Error> {
        Ok(self.matches.for_scope(scope))
    }

    async fn software_for_scope(&self, scope: MatchScope) -> Result<Vec<SoftwareId>, Self::Error> {
        Ok(self
            .matches
            .for_scope(scope)
            .into_iter()
            .map(|rule| rule.software_id)
            .collect())
    }

    async fn all_matches(&self) -> Result<Vec<MatchRule>, Self::Error> {
        Ok(self.matches.rules.borrow().rows.values().cloned().collect())
    }

    async fn update_match(&self, rule: &MatchRule) -> Result<bool, Self::Error> {
        let mut table = self.matches.rules.borrow_mut();
        if table.rows.values().any(|other| {
            other.id != rule.id
                && other.software_id == rule.software_id
                && other.scope == rule.scope
        }) {
            return Ok(false);
        }

        let Some(existing) = table.rows.get_mut(&rule.id) else {
            return Ok(false);
        };
        existing.software_id = rule.software_id;
        existing.scope = rule.scope;
        existing.updated_at = current_timestamp();
        Ok(true)
    }

    async fn delete_match(&self, id: MatchId) -> Result<bool, Self::Error> {
        Ok(self.matches.rules.borrow_mut().rows.remove(&id).is_some())
    }
}
