use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::models::{CartItem, RepositoryResult};

/// Trait defining the interface for the shop cart
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// All cart lines in the order they were added
    async fn find_all(&self) -> RepositoryResult<Vec<CartItem>>;

    /// Append a line
    async fn append(&self, item: CartItem) -> RepositoryResult<()>;

    /// Drop every line
    async fn clear(&self) -> RepositoryResult<()>;
}

/// Single global cart held in memory
#[derive(Default)]
pub struct InMemoryCartRepository {
    items: RwLock<Vec<CartItem>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<CartItem>> {
        Ok(self.items.read().await.clone())
    }

    #[instrument(skip(self, item), fields(name = %item.name, price = %item.price))]
    async fn append(&self, item: CartItem) -> RepositoryResult<()> {
        self.items.write().await.push(item);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> RepositoryResult<()> {
        let mut items = self.items.write().await;
        info!(removed = items.len(), "Clearing cart");
        items.clear();
        Ok(())
    }
}
