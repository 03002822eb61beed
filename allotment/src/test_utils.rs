// SPDX-License-Identifier: MIT OR Apache-2.0

use allotment_store::MemoryStore;

use crate::{Config, Registry};

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Registry on top of an empty in-memory store.
pub fn memory_registry(config: Config) -> Registry<MemoryStore> {
    setup_logging();
    Registry::new(MemoryStore::new(), config)
}
