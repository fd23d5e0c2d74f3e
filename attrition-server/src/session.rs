//! Single analyst session
//!
//! Holds at most one uploaded table. A successful upload swaps the whole
//! table in one step; readers take a cheap snapshot and never hold the lock
//! while computing. There is one session per process: the last upload wins
//! for every client.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::dataset::Dataset;
use crate::error::{ApiError, ApiResult};

/// Shared handle to the current session table
#[derive(Clone, Default)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Arc<Dataset>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session table, returning the stored snapshot
    pub async fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        *self.current.write().await = Some(Arc::clone(&dataset));
        dataset
    }

    /// Current table, if any
    pub async fn snapshot(&self) -> Option<Arc<Dataset>> {
        self.current.read().await.clone()
    }

    /// Current table, or [`ApiError::NoData`]
    pub async fn require(&self) -> ApiResult<Arc<Dataset>> {
        self.snapshot().await.ok_or(ApiError::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use polars::prelude::NamedFrom;

    fn table(age: i64) -> Dataset {
        Dataset::new(df!("Age" => &[age]).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_session_requires_upload() {
        let store = SessionStore::new();
        assert!(store.snapshot().await.is_none());
        assert!(matches!(store.require().await, Err(ApiError::NoData)));
    }

    #[tokio::test]
    async fn test_replace_overwrites_previous_upload() {
        let store = SessionStore::new();
        store.replace(table(30)).await;
        let first = store.require().await.unwrap();

        store.replace(table(45)).await;
        let second = store.require().await.unwrap();

        // Earlier snapshots stay valid after a swap
        assert_eq!(first.row(0).unwrap().number("Age"), Some(30.0));
        assert_eq!(second.row(0).unwrap().number("Age"), Some(45.0));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = SessionStore::new();
        let handle = store.clone();
        handle.replace(table(30)).await;
        assert!(store.snapshot().await.is_some());
    }
}
