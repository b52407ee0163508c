//! Repository effect trait.
//!
//! The loader distinguishes only "value found" from "value absent". How the
//! repository stores or fetches its values is not its concern.

use crate::identifiers::ContentId;
use async_trait::async_trait;
use std::sync::Arc;

/// Abstract data source: `lookup(id?) -> T | NotFound`.
///
/// A `None` identifier requests the whole collection.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Fetch the value for `id`, or the whole collection for `None`.
    async fn lookup(&self, id: Option<&ContentId>) -> Option<T>;
}

/// Blanket implementation for Arc<R> where R: Repository<T>
#[async_trait]
impl<T, R> Repository<T> for Arc<R>
where
    T: Send + 'static,
    R: Repository<T> + ?Sized,
{
    async fn lookup(&self, id: Option<&ContentId>) -> Option<T> {
        (**self).lookup(id).await
    }
}

/// Repository backed by a synchronous lookup closure.
pub struct FnRepository<F> {
    lookup: F,
}

impl<F> FnRepository<F> {
    /// Wrap a lookup closure
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

/// Bind a plain lookup function as a repository.
pub fn repository_fn<T, F>(lookup: F) -> FnRepository<F>
where
    F: Fn(Option<&ContentId>) -> Option<T> + Send + Sync,
{
    FnRepository::new(lookup)
}

#[async_trait]
impl<T, F> Repository<T> for FnRepository<F>
where
    T: Send + 'static,
    F: Fn(Option<&ContentId>) -> Option<T> + Send + Sync,
{
    async fn lookup(&self, id: Option<&ContentId>) -> Option<T> {
        (self.lookup)(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_repository() {
        let repo = repository_fn(|id: Option<&ContentId>| match id {
            Some(id) if id.as_str() == "p1" => Some("A"),
            _ => None,
        });
        assert_eq!(repo.lookup(Some(&ContentId::new("p1"))).await, Some("A"));
        assert_eq!(repo.lookup(Some(&ContentId::new("p2"))).await, None);
        assert_eq!(repo.lookup(None).await, None);
    }

    #[tokio::test]
    async fn test_arc_repository_delegates() {
        let repo: Arc<dyn Repository<u32>> = Arc::new(repository_fn(|_: Option<&ContentId>| Some(9)));
        let shared = Arc::clone(&repo);
        assert_eq!(shared.lookup(None).await, Some(9));
    }
}
