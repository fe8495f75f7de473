use async_trait::async_trait;

use crate::models::{Product, RepositoryResult};

/// Read-only product catalogue
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self) -> RepositoryResult<Vec<Product>>;
}

/// Catalogue fixed at construction
pub struct StaticProductRepository {
    products: Vec<Product>,
}

impl StaticProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn seeded() -> Self {
        Self::new(Product::catalogue())
    }
}

#[async_trait]
impl ProductRepository for StaticProductRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Product>> {
        Ok(self.products.clone())
    }
}
