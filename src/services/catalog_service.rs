//! Catalog service - product queries and CRUD.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewProduct, Product, ProductFilter, ProductUpdate};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Persist a new product
    async fn create_product(&self, fields: NewProduct) -> AppResult<Product>;

    /// List products matching the filter, paginated. The total count and
    /// page count describe the filtered set before pagination.
    async fn list_products(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Product>>;

    /// Get a product by id
    async fn get_product(&self, id: Uuid) -> AppResult<Product>;

    /// Apply a partial update to a product
    async fn update_product(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product>;

    /// Delete a product. Existing order line-item snapshots are untouched.
    async fn delete_product(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalog<U> {
    /// Create new catalog service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for Catalog<U> {
    async fn create_product(&self, fields: NewProduct) -> AppResult<Product> {
        self.uow.products().create(fields).await
    }

    async fn list_products(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<Paginated<Product>> {
        let (items, total) = self.uow.products().list(filter, pagination).await?;
        Ok(Paginated::new(items, &pagination, total))
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.uow.products().find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_product(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product> {
        self.uow.products().update(id, update).await
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        self.uow.products().delete(id).await
    }
}
