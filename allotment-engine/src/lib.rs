// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keeps the software assigned to every staff member consistent with the match rules of their
//! organization, department and team.
//!
//! All operations are free functions taking the store as their first argument. They run as a
//! sequence of independent store calls without any locking or transaction, concurrent calls
//! affecting the same staff member may interleave. Callers needing exactly-once semantics
//! serialize them, for example with [`Transaction`](allotment_store::Transaction).
//!
//! Read failures abort an operation before it writes anything for the current step. Failed writes
//! inside a loop over many items do not stop the loop, they are collected in the returned
//! [`Report`] next to every change which succeeded.
//!
//! Every created or removed assignment edge is mirrored by exactly one audit log entry attributed
//! to [`Actor::System`](allotment_core::Actor::System).
mod assign;
mod audit;
mod error;
mod report;
mod revoke;
mod sync;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

use allotment_store::{AssignmentStore, AuditLogStore, MatchStore, SoftwareStore, StaffStore};

pub use assign::auto_assign;
pub use audit::{log_change, record_change};
pub use error::EngineError;
pub use report::{Change, Failure, Report, Stage};
pub use revoke::{revoke_all, revoke_software};
pub use sync::{revoke_from_source, rule_created, rule_deleted, sync_staff};

/// Store interfaces the engine reads from and writes to, all sharing one error type.
pub trait EngineStore<E>:
    StaffStore<Error = E>
    + SoftwareStore<Error = E>
    + AssignmentStore<Error = E>
    + MatchStore<Error = E>
    + AuditLogStore<Error = E>
{
}

impl<S, E> EngineStore<E> for S where
    S: StaffStore<Error = E>
        + SoftwareStore<Error = E>
        + AssignmentStore<Error = E>
        + MatchStore<Error = E>
        + AuditLogStore<Error = E>
{
}
