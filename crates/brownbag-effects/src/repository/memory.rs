//! In-memory repositories

use async_trait::async_trait;
use brownbag_core::effects::Repository;
use brownbag_core::ContentId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keyed in-memory repository.
///
/// `lookup(Some(id))` returns a clone of the stored value; `lookup(None)`
/// is always absent.
#[derive(Debug)]
pub struct MemoryRepository<T> {
    data: Arc<RwLock<BTreeMap<ContentId, T>>>,
}

impl<T> MemoryRepository<T> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a repository pre-populated with entries
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<ContentId>,
    {
        let data = entries
            .into_iter()
            .map(|(id, value)| (id.into(), value))
            .collect();
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Insert or replace a value, returning the previous one
    pub async fn insert(&self, id: impl Into<ContentId>, value: T) -> Option<T> {
        self.data.write().await.insert(id.into(), value)
    }

    /// Remove a value
    pub async fn remove(&self, id: &ContentId) -> Option<T> {
        self.data.write().await.remove(id)
    }

    /// Number of stored values
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether the repository is empty
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

#[async_trait]
impl<T> Repository<T> for MemoryRepository<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn lookup(&self, id: Option<&ContentId>) -> Option<T> {
        let id = id?;
        let data = self.data.read().await;
        data.get(id).cloned()
    }
}

/// Whole-collection repository.
///
/// `lookup(None)` returns a snapshot of every item in insertion order;
/// keyed lookups are always absent.
#[derive(Debug)]
pub struct CollectionRepository<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T> CollectionRepository<T> {
    /// Create a repository over `items`
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Append an item
    pub async fn push(&self, item: T) {
        self.items.write().await.push(item);
    }

    /// Replace the whole collection, returning the previous one
    pub async fn replace(&self, items: Vec<T>) -> Vec<T> {
        std::mem::replace(&mut *self.items.write().await, items)
    }
}

impl<T> Default for CollectionRepository<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Clone for CollectionRepository<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

#[async_trait]
impl<T> Repository<Vec<T>> for CollectionRepository<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn lookup(&self, id: Option<&ContentId>) -> Option<Vec<T>> {
        if id.is_some() {
            return None;
        }
        Some(self.items.read().await.clone())
    }
}
