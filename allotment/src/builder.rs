// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_store::{SqliteError, SqliteStore, SqliteStoreBuilder};

use crate::registry::{Config, Registry};

/// Configures and spawns a [`Registry`] backed by a SQLite database.
#[derive(Default)]
pub struct RegistryBuilder {
    config: Config,
    store: SqliteStoreBuilder,
}

impl RegistryBuilder {
    pub(crate) fn new() -> Self {
        RegistryBuilder {
            config: Config::default(),
            store: SqliteStoreBuilder::default(),
        }
    }

    pub fn database_url(mut self, url: &str) -> Self {
        self.store = self.store.database_url(url);
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.store = self.store.max_connections(max_connections);
        self
    }

    pub fn default_migrations(mut self, value: bool) -> Self {
        self.store = self.store.run_default_migrations(value);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn auto_assign_on_create(mut self, value: bool) -> Self {
        self.config.auto_assign_on_create = value;
        self
    }

    pub fn revoke_on_deactivate(mut self, value: bool) -> Self {
        self.config.revoke_on_deactivate = value;
        self
    }

    pub fn propagate_rules(mut self, value: bool) -> Self {
        self.config.propagate_rules = value;
        self
    }

    pub async fn spawn(self) -> Result<Registry<SqliteStore<'static>>, SqliteError> {
        let store = self.store.build().await?;
        Ok(Registry::new(store, self.config))
    }
}
