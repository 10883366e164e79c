use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use catalog_kv::asset::{AssetResolver, MemoryBlobStore};
use catalog_kv::catalog::{CatalogError, CatalogService};
use catalog_kv::clients::ProductClient;
use catalog_kv::keygen::KeyGenerator;
use catalog_kv::model::{Product, ProductDraft};
use partition_actor::{PartitionActor, PartitionClient};

/// A service with its own key generator over a shared store, standing in for a
/// separate process.
fn service(store: &PartitionClient<Product>, key_retries: u32) -> CatalogService {
    let blobs = Arc::new(MemoryBlobStore::new("memory://product-images"));
    CatalogService::new(
        ProductClient::new(store.clone(), "Product"),
        KeyGenerator::new(store.clone()),
        AssetResolver::new(blobs, Duration::from_secs(60)),
        key_retries,
    )
}

#[tokio::test]
async fn test_concurrent_creates_in_one_process_get_distinct_keys() {
    let (actor, store) = PartitionActor::new(64);
    tokio::spawn(actor.run());
    let catalog = service(&store, 1);

    let mut handles = vec![];
    for n in 0..20 {
        let catalog = catalog.clone();
        handles.push(tokio::spawn(async move {
            catalog
                .create(ProductDraft::new(format!("Item {n}"), 1.0, 1))
                .await
        }));
    }

    let mut keys = HashSet::new();
    for handle in handles {
        let product = handle.await.unwrap().expect("create failed");
        assert!(keys.insert(product.row_key));
    }
    assert_eq!(keys.len(), 20);
    assert_eq!(catalog.list_all().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_independent_generators_never_store_duplicates() {
    let (actor, store) = PartitionActor::new(64);
    tokio::spawn(actor.run());
    let first = service(&store, 1);
    let second = service(&store, 1);

    let mut handles = vec![];
    for n in 0..10 {
        for catalog in [first.clone(), second.clone()] {
            handles.push(tokio::spawn(async move {
                catalog
                    .create(ProductDraft::new(format!("Item {n}"), 1.0, 1))
                    .await
            }));
        }
    }

    let mut created = HashSet::new();
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(product) => assert!(created.insert(product.row_key), "duplicate key"),
            Err(CatalogError::Conflict { .. }) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let stored = first.list_all().await.unwrap();
    assert_eq!(stored.len(), created.len());
    assert_eq!(created.len() + conflicts, 20);
    let stored_keys: HashSet<String> = stored.into_iter().map(|p| p.row_key).collect();
    assert_eq!(stored_keys, created);
}

#[tokio::test]
async fn test_generator_skips_keys_written_by_other_writer() {
    let (actor, store) = PartitionActor::new(16);
    tokio::spawn(actor.run());
    let first = service(&store, 1);
    let second = service(&store, 1);

    // The second generator has issued "0" and "1"; the first has issued nothing.
    let a = second.create(ProductDraft::new("A", 1.0, 1)).await.unwrap();
    let b = second.create(ProductDraft::new("B", 1.0, 1)).await.unwrap();
    assert_eq!((a.row_key.as_str(), b.row_key.as_str()), ("0", "1"));

    // The first generator scans, sees "1" and moves on to "2".
    let c = first.create(ProductDraft::new("C", 1.0, 1)).await.unwrap();
    assert_eq!(c.row_key, "2");
}
