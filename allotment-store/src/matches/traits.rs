// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use allotment_core::{MatchId, MatchRule, MatchScope, SoftwareId};

/// Interface for storing and querying match rules.
///
/// Every pair of software and scope exists at most once.
pub trait MatchStore {
    type Error: Error;

    /// Insert a match rule.
    ///
    /// Returns `None` when a rule for the same software and scope already exists.
    fn insert_match(
        &self,
        software_id: SoftwareId,
        scope: MatchScope,
    ) -> impl Future<Output = Result<Option<MatchRule>, Self::Error>>;

    fn get_match(&self, id: MatchId)
    -> impl Future<Output = Result<Option<MatchRule>, Self::Error>>;

    fn find_match(
        &self,
        software_id: SoftwareId,
        scope: MatchScope,
    ) -> impl Future<Output = Result<Option<MatchRule>, Self::Error>>;

    /// All rules of exactly this scope ordered by id.
    ///
    /// For [`MatchScope::Organization`] these are all organization-wide rules.
    fn matches_for_scope(
        &self,
        scope: MatchScope,
    ) -> impl Future<Output = Result<Vec<MatchRule>, Self::Error>>;

    /// Ids of all software matched by rules of this scope, ordered by rule id.
    fn software_for_scope(
        &self,
        scope: MatchScope,
    ) -> impl Future<Output = Result<Vec<SoftwareId>, Self::Error>>;

    /// All rules of every scope ordered by id.
    fn all_matches(&self) -> impl Future<Output = Result<Vec<MatchRule>, Self::Error>>;

    /// Update software and scope of a rule.
    ///
    /// Returns `true` when a rule with this id existed and no other rule already covers the same
    /// software and scope. The stored rule is left untouched otherwise.
    fn update_match(&self, rule: &MatchRule) -> impl Future<Output = Result<bool, Self::Error>>;

    fn delete_match(&self, id: MatchId) -> impl Future<Output = Result<bool, Self::Error>>;
}
