//! Data store gateway.
//!
//! Abstraction over a remote document collection. The core never talks to a
//! concrete database; it goes through [`DataStore`], which any hosted
//! document store can implement.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_stream::Stream;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use campuscare_common::AppResult;

/// The field map of a single document, keyed by field name.
pub type Fields = serde_json::Map<String, Value>;

/// A document as returned by queries: the store-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned document id.
    pub id: String,
    /// Document fields (the id is not a field).
    pub fields: Fields,
}

/// A single change notification delivered to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// The subscribed collection changed; refetch full state.
    Changed,
    /// The subscriber fell behind and missed this many notifications.
    ///
    /// Consumers recompute from full state on every notification, so a lag
    /// marker is handled exactly like [`StoreChange::Changed`].
    Lagged(u64),
}

/// Interface to a remote document store.
///
/// Collections are addressed by name. All operations suspend at the store
/// round trip and surface connectivity failures as store errors; none of
/// them panic.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Insert a document and return its store-assigned id.
    async fn insert(&self, collection: &str, fields: Fields) -> AppResult<String>;

    /// Fetch every document in a collection.
    async fn list(&self, collection: &str) -> AppResult<Vec<Document>>;

    /// Fetch the documents whose `field` equals `value` exactly.
    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Document>>;

    /// Fetch a document's fields by id, or `None` if absent.
    async fn get_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Fields>>;

    /// Merge `partial` into an existing document's fields.
    ///
    /// Fails if the document does not exist.
    async fn update_by_id(&self, collection: &str, id: &str, partial: Fields) -> AppResult<()>;

    /// Delete a document by id. Deleting an absent document is not an error.
    async fn delete_by_id(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Subscribe to change notifications for a collection.
    ///
    /// The stream is unordered relative to in-flight local mutations and
    /// carries no payload: on each item the consumer refetches full state.
    /// Dropping the stream unsubscribes.
    fn subscribe(&self, collection: &str) -> ChangeStream;
}

/// Internal change event carried on the store's broadcast channel.
#[derive(Debug, Clone)]
pub(crate) struct ChangeEvent {
    pub(crate) collection: String,
}

/// Stream of [`StoreChange`] notifications for one collection.
///
/// Backed by a broadcast receiver; dropping the stream unsubscribes.
pub struct ChangeStream {
    inner: BroadcastStream<ChangeEvent>,
    collection: String,
}

impl ChangeStream {
    pub(crate) fn new(rx: broadcast::Receiver<ChangeEvent>, collection: String) -> Self {
        Self {
            inner: BroadcastStream::new(rx),
            collection,
        }
    }

    /// Wait for the next change on the subscribed collection.
    ///
    /// Returns `None` once the store side of the channel is gone.
    pub async fn recv(&mut self) -> Option<StoreChange> {
        use tokio_stream::StreamExt;
        self.next().await
    }
}

impl Stream for ChangeStream {
    type Item = StoreChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    // Events for other collections are filtered out here so
                    // subscribers only wake for their own collection.
                    if event.collection == self.collection {
                        return Poll::Ready(Some(StoreChange::Changed));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(n)))) => {
                    return Poll::Ready(Some(StoreChange::Lagged(n)));
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl std::fmt::Debug for ChangeStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeStream")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}
