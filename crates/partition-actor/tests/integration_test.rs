use partition_actor::{EntityKey, PartitionActor, PartitionedEntity, StoreError};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Book {
    shelf: String,
    id: String,
    title: String,
}

impl Book {
    fn new(shelf: &str, id: &str, title: &str) -> Self {
        Self {
            shelf: shelf.to_string(),
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}

impl PartitionedEntity for Book {
    fn partition_key(&self) -> &str {
        &self.shelf
    }

    fn row_key(&self) -> &str {
        &self.id
    }
}

// --- Tests ---

#[tokio::test]
async fn test_store_full_lifecycle() {
    let (actor, client) = PartitionActor::new(10);
    let handle = tokio::spawn(actor.run());

    // 1. Insert
    client.insert(Book::new("fiction", "1", "Dune")).await.unwrap();

    // 2. Duplicate insert is refused and leaves the row alone
    let duplicate = client.insert(Book::new("fiction", "1", "Emma")).await;
    assert_eq!(
        duplicate,
        Err(StoreError::AlreadyExists(EntityKey::new("fiction", "1")))
    );
    let stored = client.get(EntityKey::new("fiction", "1")).await.unwrap();
    assert_eq!(stored.unwrap().title, "Dune");

    // 3. Replace overwrites every field
    client
        .replace(Book::new("fiction", "1", "Dune Messiah"))
        .await
        .unwrap();
    let replaced = client.get(EntityKey::new("fiction", "1")).await.unwrap();
    assert_eq!(replaced.unwrap().title, "Dune Messiah");

    // 4. Delete, then the row is gone
    client.delete(EntityKey::new("fiction", "1")).await.unwrap();
    let gone = client.get(EntityKey::new("fiction", "1")).await.unwrap();
    assert!(gone.is_none());

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_missing_rows_report_not_found() {
    let (actor, client) = PartitionActor::new(10);
    tokio::spawn(actor.run());

    let replace = client.replace(Book::new("fiction", "9", "Ghost")).await;
    assert_eq!(
        replace,
        Err(StoreError::NotFound(EntityKey::new("fiction", "9")))
    );

    let delete = client.delete(EntityKey::new("fiction", "9")).await;
    assert_eq!(
        delete,
        Err(StoreError::NotFound(EntityKey::new("fiction", "9")))
    );

    // Replace must not have created the row.
    let rows = client.scan_partition("fiction").collect().await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_same_row_key_in_different_partitions() {
    let (actor, client) = PartitionActor::new(10);
    tokio::spawn(actor.run());

    client.insert(Book::new("fiction", "1", "Dune")).await.unwrap();
    client.insert(Book::new("poetry", "1", "Odes")).await.unwrap();

    let fiction = client.scan_partition("fiction").collect().await.unwrap();
    let poetry = client.scan_partition("poetry").collect().await.unwrap();
    assert_eq!(fiction, vec![Book::new("fiction", "1", "Dune")]);
    assert_eq!(poetry, vec![Book::new("poetry", "1", "Odes")]);

    let unknown = client.scan_partition("history").collect().await.unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn test_scan_is_paged_and_restartable() {
    let (actor, client) = PartitionActor::new(10);
    tokio::spawn(actor.run());
    let client = client.with_page_size(2);

    for id in ["c", "a", "e", "b", "d"] {
        client.insert(Book::new("shelf", id, id)).await.unwrap();
    }

    let mut scan = client.scan_partition("shelf");
    let first = scan.next_page().await.unwrap().unwrap();
    let second = scan.next_page().await.unwrap().unwrap();
    let third = scan.next_page().await.unwrap().unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(third.len(), 1);
    assert!(scan.next_page().await.unwrap().is_none());
    assert!(scan.next_page().await.unwrap().is_none());

    let ids: Vec<String> = first
        .iter()
        .chain(&second)
        .chain(&third)
        .map(|book| book.id.clone())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);

    // A fresh scan sees the same sequence.
    let again: Vec<String> = client
        .scan_partition("shelf")
        .collect()
        .await
        .unwrap()
        .into_iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(again, ids);
}

#[tokio::test]
async fn test_exact_page_boundary_ends_cleanly() {
    let (actor, client) = PartitionActor::new(10);
    tokio::spawn(actor.run());
    let client = client.with_page_size(2);

    client.insert(Book::new("shelf", "1", "one")).await.unwrap();
    client.insert(Book::new("shelf", "2", "two")).await.unwrap();

    let mut scan = client.scan_partition("shelf");
    assert_eq!(scan.next_page().await.unwrap().unwrap().len(), 2);
    assert!(scan.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_inserts_of_one_key_admit_exactly_one() {
    let (actor, client) = PartitionActor::new(32);
    tokio::spawn(actor.run());

    let mut handles = vec![];
    for n in 0..10 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .insert(Book::new("shelf", "same", &format!("writer {n}")))
                .await
        }));
    }

    let mut inserted = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => inserted += 1,
            Err(StoreError::AlreadyExists(_)) => refused += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(inserted, 1);
    assert_eq!(refused, 9);
}

#[tokio::test]
async fn test_closed_store_reports_transport_error() {
    let (actor, client) = PartitionActor::<Book>::new(1);
    drop(actor);

    let result = client.get(EntityKey::new("shelf", "1")).await;
    assert_eq!(result, Err(StoreError::Closed));
    assert!(result.unwrap_err().is_transport());
}
