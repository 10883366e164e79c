//! # Store Client
//!
//! This module defines the client half of the store: a cheap, cloneable handle that
//! turns method calls into [`StoreRequest`] messages.

use crate::entity::{EntityKey, PartitionedEntity};
use crate::error::StoreError;
use crate::message::{Page, StoreRequest};
use tokio::sync::{mpsc, oneshot};

/// Default number of rows fetched per scan page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A type-safe client for interacting with a `PartitionActor`.
///
/// * **Cloneable**: holds only a sender, so cloning is inexpensive.
/// * **Async API**: every method resolves to `Result<…, StoreError>`.
/// * **Lock-free**: nothing is held while a request is in flight, so dropping the
///   future at any point is safe: the actor either applied the request or never saw it.
#[derive(Clone)]
pub struct PartitionClient<T: PartitionedEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
    page_size: usize,
}

impl<T: PartitionedEntity> PartitionClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self {
            sender,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Returns a client whose scans fetch `page_size` rows per round trip.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> StoreRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    pub async fn get(&self, key: EntityKey) -> Result<Option<T>, StoreError> {
        self.request(|respond_to| StoreRequest::Get { key, respond_to })
            .await
    }

    pub async fn insert(&self, entity: T) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::Insert { entity, respond_to })
            .await
    }

    pub async fn replace(&self, entity: T) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::Replace { entity, respond_to })
            .await
    }

    pub async fn delete(&self, key: EntityKey) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::Delete { key, respond_to })
            .await
    }

    /// Fetches a single page of `partition`, resuming after `after`.
    pub async fn scan_page(
        &self,
        partition: &str,
        after: Option<String>,
        limit: usize,
    ) -> Result<Page<T>, StoreError> {
        let partition = partition.to_string();
        self.request(|respond_to| StoreRequest::Scan {
            partition,
            after,
            limit,
            respond_to,
        })
        .await
    }

    /// Starts a fresh, lazy scan over `partition`.
    ///
    /// Nothing is fetched until [`PartitionScan::next_page`] is awaited.
    pub fn scan_partition(&self, partition: impl Into<String>) -> PartitionScan<T> {
        PartitionScan {
            client: self.clone(),
            partition: partition.into(),
            cursor: None,
            done: false,
        }
    }
}

/// Lazy cursor over one partition.
///
/// Each page is fetched on demand. The cursor is finite: once the store reports no
/// continuation, `next_page` keeps returning `Ok(None)`.
pub struct PartitionScan<T: PartitionedEntity> {
    client: PartitionClient<T>,
    partition: String,
    cursor: Option<String>,
    done: bool,
}

impl<T: PartitionedEntity> PartitionScan<T> {
    /// Fetches the next page, or `None` when the partition is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>, StoreError> {
        if self.done {
            return Ok(None);
        }
        let page = self
            .client
            .scan_page(&self.partition, self.cursor.clone(), self.client.page_size)
            .await?;
        match page.continuation {
            Some(last) => self.cursor = Some(last),
            None => self.done = true,
        }
        if page.items.is_empty() && self.done {
            return Ok(None);
        }
        Ok(Some(page.items))
    }

    /// Drains every remaining page into one vector.
    pub async fn collect(mut self) -> Result<Vec<T>, StoreError> {
        let mut rows = Vec::new();
        while let Some(page) = self.next_page().await? {
            rows.extend(page);
        }
        Ok(rows)
    }
}
