// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracks which software is assigned to which staff member of an organization.
//!
//! A [`Registry`] holds departments, teams, staff members, the software catalog and match rules
//! stating that a software belongs to everyone in the organization, a department or a team. It
//! keeps the assignments of every staff member consistent with these rules as staff members join,
//! move between units or leave, and as rules are created or deleted. Every change to an
//! assignment is recorded in an audit log.
//!
//! ```rust
//! # use allotment::{MatchScope, NewSoftware, NewStaff};
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = allotment::builder().max_connections(1).spawn().await?;
//!
//! let department = registry.create_department("Engineering").await?;
//! let editor = registry
//!     .create_software(NewSoftware {
//!         name: "Editor".into(),
//!         description: String::new(),
//!         kind: "license".into(),
//!     })
//!     .await?;
//! registry
//!     .create_match(editor.id, MatchScope::Department(department.id), true)
//!     .await?;
//!
//! // New staff members of the department receive the editor right away.
//! let staff = registry
//!     .create_staff(NewStaff {
//!         first_name: "Ada".into(),
//!         last_name: "Lovelace".into(),
//!         email: "ada@example.org".into(),
//!         department_id: Some(department.id),
//!         team_id: None,
//!         status: Default::default(),
//!     })
//!     .await?
//!     .into_record();
//! assert_eq!(registry.staff_software(staff.id).await?.len(), 1);
//! # Ok(())
//! # }
//! ```
mod builder;
mod registry;
#[cfg(feature = "test_utils")]
pub mod test_utils;

pub use allotment_core::*;
pub use allotment_engine::{Change, EngineError, Failure, Report, Stage};
pub use allotment_store::{LogQuery, MemoryStore, SqliteError, SqliteStore};
pub use builder::RegistryBuilder;
pub use registry::{Config, Outcome, Registry, RegistryError, StoreError};

/// Returns a builder for a registry backed by a SQLite database.
pub fn builder() -> RegistryBuilder {
    Registry::builder()
}

/// Spawns a registry on an in-memory SQLite database with the default configuration.
pub async fn spawn() -> Result<Registry<SqliteStore<'static>>, SqliteError> {
    Registry::spawn().await
}
