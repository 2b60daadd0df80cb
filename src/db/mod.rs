pub(crate) mod models;
pub(crate) mod types;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::db::models::{ProgressRecord, User};

/// Keyed document store with document-level atomicity. Progress records keep
/// their insertion order, which is the creation order the analytics layer
/// relies on. There is no optimistic concurrency: concurrent writers to the
/// same record race and the later write wins in full.
#[derive(Clone, Default)]
pub(crate) struct DocumentStore {
    inner: Arc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    users: RwLock<HashMap<String, User>>,
    progress: RwLock<Vec<ProgressRecord>>,
}

impl DocumentStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn users(&self) -> RwLockReadGuard<'_, HashMap<String, User>> {
        self.inner.users.read().await
    }

    pub(crate) async fn users_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, User>> {
        self.inner.users.write().await
    }

    pub(crate) async fn progress(&self) -> RwLockReadGuard<'_, Vec<ProgressRecord>> {
        self.inner.progress.read().await
    }

    pub(crate) async fn progress_mut(&self) -> RwLockWriteGuard<'_, Vec<ProgressRecord>> {
        self.inner.progress.write().await
    }
}
