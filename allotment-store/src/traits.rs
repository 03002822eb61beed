// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

/// Traits to implement database transaction provider.
///
/// None of the assignment operations run inside a transaction on their own. Callers which need to
/// serialize several mutations of the same staff member can wrap them between `begin` and
/// `commit`.
///
/// To guard against sharing transactions unknowingly across unrelated database queries, a
/// "permit" makes holding a transaction explicit. It does not protect from misuse.
pub trait Transaction {
    type Error: Error;

    type Permit;

    /// Begins a transaction.
    fn begin(&self) -> impl Future<Output = Result<Self::Permit, Self::Error>>;

    /// Rolls back the transaction and with that all uncommitted changes.
    fn rollback(&self, permit: Self::Permit) -> impl Future<Output = Result<(), Self::Error>>;

    /// Commits the transaction.
    fn commit(&self, permit: Self::Permit) -> impl Future<Output = Result<(), Self::Error>>;
}
