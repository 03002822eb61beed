// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use allotment_core::{NewSoftware, Software, SoftwareId};

/// Interface for storing and querying the software catalog.
pub trait SoftwareStore {
    type Error: Error;

    /// Insert a software.
    ///
    /// Returns `None` when a software with the same name already exists.
    fn insert_software(
        &self,
        software: NewSoftware,
    ) -> impl Future<Output = Result<Option<Software>, Self::Error>>;

    fn get_software(
        &self,
        id: SoftwareId,
    ) -> impl Future<Output = Result<Option<Software>, Self::Error>>;

    fn software_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Software>, Self::Error>>;

    /// The whole catalog ordered by id.
    fn all_software(&self) -> impl Future<Output = Result<Vec<Software>, Self::Error>>;

    /// Update name, description and kind of a software.
    ///
    /// Returns `true` when a software with this id existed.
    fn update_software(
        &self,
        software: &Software,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Delete a software record.
    ///
    /// Assignment edges and match rules referring to it are left untouched.
    fn delete_software(&self, id: SoftwareId) -> impl Future<Output = Result<bool, Self::Error>>;
}
