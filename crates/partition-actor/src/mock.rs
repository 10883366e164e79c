//! # Mock Store & Testing Guide
//!
//! `MockClient<T>` hands out a real [`PartitionClient<T>`] whose requests are answered
//! from a queue of expectations instead of a running actor. It lets tests inject the
//! failures that are hard to provoke against the real store: a lost actor, a row that
//! vanished between a read and a write, or an insert that collides because another
//! writer got there first.
//!
//! ## When to use Mocks vs the Real Actor
//!
//! | Feature | MockClient | PartitionActor |
//! |---------|------------|----------------|
//! | **State** | None, answers are scripted | Real rows |
//! | **Determinism** | Fully scripted order | Subject to scheduler |
//! | **Error Injection** | Easy (`return_err`) | Only data errors |
//! | **Use Case** | Logic *around* the client | The store itself, full flows |
//!
//! ## Scripting a Race
//!
//! ```rust
//! use partition_actor::mock::MockClient;
//! use partition_actor::{EntityKey, Page, PartitionedEntity, StoreError};
//!
//! #[derive(Clone, Debug)]
//! struct Note { shelf: String, id: String }
//!
//! impl PartitionedEntity for Note {
//!     fn partition_key(&self) -> &str { &self.shelf }
//!     fn row_key(&self) -> &str { &self.id }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Note>::new();
//!     mock.expect_scan().return_ok(Page { items: vec![], continuation: None });
//!     mock.expect_insert()
//!         .return_err(StoreError::AlreadyExists(EntityKey::new("a", "0")));
//!
//!     let client = mock.client();
//!     let rows = client.scan_partition("a").collect().await.unwrap();
//!     assert!(rows.is_empty());
//!
//!     let note = Note { shelf: "a".into(), id: "0".into() };
//!     let result = client.insert(note).await;
//!     assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
//!
//!     assert_eq!(mock.written().len(), 1);
//!     mock.verify();
//! }
//! ```
//!
//! ## Mocking Utilities
//!
//! Use the fluent [`MockClient`] API, or [`create_mock_client`] with the
//! `expect_*` free functions when a test needs to inspect the raw request and
//! answer it by hand.

use crate::client::PartitionClient;
use crate::entity::{EntityKey, PartitionedEntity};
use crate::error::StoreError;
use crate::message::{Page, Response, StoreRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A scripted answer to the next request of the matching kind.
enum Expectation<T: PartitionedEntity> {
    Get { response: Result<Option<T>, StoreError> },
    Scan { response: Result<Page<T>, StoreError> },
    Insert { response: Result<(), StoreError> },
    Replace { response: Result<(), StoreError> },
    Delete { response: Result<(), StoreError> },
}

/// A mock store with expectation tracking for fluent testing.
///
/// Requests are matched against expectations strictly in order. A request that does
/// not match the next expectation panics the mock task, which the caller observes as
/// [`StoreError::Dropped`]; [`MockClient::verify`] then reports the leftovers.
pub struct MockClient<T: PartitionedEntity> {
    client: PartitionClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    written: Arc<Mutex<Vec<T>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: PartitionedEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartitionedEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<T>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let written = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let written_clone = written.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        StoreRequest::Get { respond_to, .. },
                        Some(Expectation::Get { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Scan { respond_to, .. },
                        Some(Expectation::Scan { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Insert { entity, respond_to },
                        Some(Expectation::Insert { response }),
                    ) => {
                        written_clone.lock().unwrap().push(entity);
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Replace { entity, respond_to },
                        Some(Expectation::Replace { response }),
                    ) => {
                        written_clone.lock().unwrap().push(entity);
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Delete { respond_to, .. },
                        Some(Expectation::Delete { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {:?}", request);
                    }
                }
            }
        });

        Self {
            client: PartitionClient::new(sender),
            expectations,
            written,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> PartitionClient<T> {
        self.client.clone()
    }

    /// Every entity sent through `insert` or `replace`, in arrival order.
    pub fn written(&self) -> Vec<T> {
        self.written.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

macro_rules! expectation_builder {
    ($variant:ident, $response:ty) => {
        paste::paste! {
            /// Builder returned by the matching `MockClient::expect_*` method.
            pub struct [<$variant Expectation>]<T: PartitionedEntity> {
                expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
            }

            impl<T: PartitionedEntity> [<$variant Expectation>]<T> {
                /// Answers the request with a successful result.
                pub fn return_ok(self, value: $response) {
                    self.push(Ok(value));
                }

                /// Answers the request with an error.
                pub fn return_err(self, error: StoreError) {
                    self.push(Err(error));
                }

                fn push(self, response: Result<$response, StoreError>) {
                    self.expectations
                        .lock()
                        .unwrap()
                        .push_back(Expectation::$variant { response });
                }
            }

            impl<T: PartitionedEntity> MockClient<T> {
                /// Queues an answer for the next request of this kind.
                pub fn [<expect_ $variant:lower>](&mut self) -> [<$variant Expectation>]<T> {
                    [<$variant Expectation>] {
                        expectations: self.expectations.clone(),
                    }
                }
            }
        }
    };
}

expectation_builder!(Get, Option<T>);
expectation_builder!(Scan, Page<T>);
expectation_builder!(Insert, ());
expectation_builder!(Replace, ());
expectation_builder!(Delete, ());

// =============================================================================
// RAW REQUEST HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// The test plays the actor: it pulls requests with the `expect_*` helpers below and
/// answers them through the returned responder, which makes it possible to pause a
/// caller mid-operation.
pub fn create_mock_client<T: PartitionedEntity>(
    buffer_size: usize,
) -> (PartitionClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (PartitionClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Scan request.
pub async fn expect_scan<T: PartitionedEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(String, Option<String>, Response<Page<T>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Scan {
            partition,
            after,
            respond_to,
            ..
        }) => Some((partition, after, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Insert request.
pub async fn expect_insert<T: PartitionedEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T, Response<()>)> {
    match receiver.recv().await {
        Some(StoreRequest::Insert { entity, respond_to }) => Some((entity, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request.
pub async fn expect_get<T: PartitionedEntity>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(EntityKey, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Get { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}
