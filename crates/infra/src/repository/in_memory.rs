use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use catalog_core::ProductId;
use catalog_products::{Product, ProductPatch};

use super::{ListQuery, ProductRepository, RepoResult, RepositoryError};

/// In-memory product store for tests/dev.
///
/// Cloning yields another handle onto the same map. Locks are never held
/// across an `.await`, so none of the operations actually suspend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    inner: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn add(&mut self, product: &Product) -> RepoResult<()> {
        let mut map = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        map.insert(product.id(), product.clone());
        Ok(())
    }

    async fn get(&mut self, id: ProductId) -> RepoResult<Option<Product>> {
        let map = self.inner.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn list(&mut self, query: &ListQuery) -> RepoResult<Vec<Product>> {
        let map = self.inner.read().map_err(|_| RepositoryError::Poisoned)?;

        let needle = query.q.as_deref().map(str::to_lowercase);
        let mut items: Vec<Product> = map
            .values()
            .filter(|p| match &needle {
                Some(n) => p.name().to_lowercase().contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        drop(map);

        // Name ascending; id breaks ties so paging is stable.
        items.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));

        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(items
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
            .take(limit)
            .collect())
    }

    async fn update_partial(
        &mut self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> RepoResult<Option<Product>> {
        let mut map = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        let Some(current) = map.get(&id) else {
            return Ok(None);
        };

        let updated = patch.apply(current)?;
        map.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&mut self, id: ProductId) -> RepoResult<bool> {
        let mut map = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.remove(&id).is_some())
    }
}
