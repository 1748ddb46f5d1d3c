use async_trait::async_trait;
use bytes::Bytes;

use crate::error::RetrievalError;

/// Trait for fetching original images from a backing object store.
///
/// This abstraction keeps the handler independent of S3 so tests can
/// substitute an in-memory store. Implementations must be thread-safe.
/// One call means one fetch attempt; retry policy belongs to the storage
/// client configuration, not to this layer.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the complete payload of the object at `key`.
    ///
    /// Returns an error if the object does not exist, the store is
    /// unreachable, or the payload is empty.
    async fn get_object(&self, key: &str) -> Result<Bytes, RetrievalError>;
}
