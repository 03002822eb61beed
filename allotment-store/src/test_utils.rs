// SPDX-License-Identifier: MIT OR Apache-2.0

/// Macro to run the same test logic against all store backend implementations.
///
/// This macro takes a closure that will be executed against each store type:
/// - In-memory store (`MemoryStore`)
/// - SQLite store (`SqliteStore`), with all queries running inside one transaction
///
/// ## Example
///
/// ```rust
/// # use allotment_core::NewSoftware;
/// # use allotment_store::SoftwareStore;
/// # use allotment_store::assert_all_stores;
/// # async fn run() {
/// assert_all_stores!(|store| async {
///     let software = NewSoftware {
///         name: "Editor".into(),
///         description: String::new(),
///         kind: String::new(),
///     };
///     assert!(store.insert_software(software).await.unwrap().is_some());
///     assert_eq!(store.all_software().await.unwrap().len(), 1);
/// });
/// # }
/// ```
#[macro_export]
macro_rules! assert_all_stores {
    (|$store:ident| $test_body:expr) => {
        // Test with MemoryStore.
        {
            let $store = $crate::memory::MemoryStore::default();
            $test_body.await;
        }

        // Test with SqliteStore.
        {
            let sqlite_store = $crate::sqlite::SqliteStoreBuilder::new()
                .random_memory_url()
                // We're running in a single test thread and can't have more parallel connections.
                .max_connections(1)
                .build()
                .await
                .unwrap();
            let permit = $crate::Transaction::begin(&sqlite_store).await.unwrap();
            let $store = sqlite_store.clone();
            $test_body.await;
            $crate::Transaction::commit(&sqlite_store, permit)
                .await
                .unwrap();
        }
    };
}
