//! Product repository implementation.
//!
//! Holds the catalog query builder: free-text name search, category and
//! price-range filters, restricted sort keys, and pagination with the total
//! counted before paging.

use async_trait::async_trait;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{NewProduct, Product, ProductFilter, ProductSort, ProductUpdate};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product
    async fn create(&self, fields: NewProduct) -> AppResult<Product>;

    /// Find product by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// List products matching the filter, with the total count of the
    /// filtered set (taken before pagination)
    async fn list(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    /// Apply a partial update; absent fields keep their stored value
    async fn update(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product>;

    /// Delete product by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Build the filtered, sorted catalog query.
///
/// An absent or unrecognized sort key adds no ORDER BY, leaving ordering to
/// the provider default.
fn filtered_query(filter: &ProductFilter) -> Select<ProductEntity> {
    let mut query = ProductEntity::find();

    if let Some(search) = &filter.search {
        query = query.filter(Expr::col(product::Column::Name).ilike(format!("%{}%", search)));
    }
    if let Some(category) = &filter.category {
        query = query.filter(product::Column::Category.eq(category.clone()));
    }
    if let Some(min) = filter.min_price {
        query = query.filter(product::Column::Price.gte(min));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(product::Column::Price.lte(max));
    }

    match filter.sort {
        Some(ProductSort::PriceAsc) => query = query.order_by_asc(product::Column::Price),
        Some(ProductSort::PriceDesc) => query = query.order_by_desc(product::Column::Price),
        Some(ProductSort::Latest) => query = query.order_by_desc(product::Column::CreatedAt),
        None => {}
    }

    query
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn create(&self, fields: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(fields.name),
            description: Set(fields.description),
            price: Set(fields.price),
            image: Set(fields.image),
            category: Set(fields.category),
            stock: Set(fields.stock),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn list(
        &self,
        filter: ProductFilter,
        pagination: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let paginator = filtered_query(&filter).paginate(&self.db, pagination.limit());

        // Count the full filtered set before fetching the page
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn update(&self, id: Uuid, update: ProductUpdate) -> AppResult<Product> {
        let model = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(price) = update.price {
            active.price = Set(price);
        }
        if let Some(image) = update.image {
            active.image = Set(image);
        }
        if let Some(category) = update.category {
            active.category = Set(category);
        }
        if let Some(stock) = update.stock {
            active.stock = Set(stock);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(filter: &ProductFilter) -> String {
        filtered_query(filter).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn search_uses_case_insensitive_substring_match() {
        let query = sql(&ProductFilter {
            search: Some("keyboard".to_string()),
            ..Default::default()
        });
        assert!(query.contains("ILIKE"), "query was: {}", query);
        assert!(query.contains("%keyboard%"), "query was: {}", query);
    }

    #[test]
    fn price_bounds_are_inclusive_and_independent() {
        let query = sql(&ProductFilter {
            min_price: Some(15.0),
            max_price: Some(25.0),
            ..Default::default()
        });
        assert!(query.contains(">= 15"), "query was: {}", query);
        assert!(query.contains("<= 25"), "query was: {}", query);

        let min_only = sql(&ProductFilter {
            min_price: Some(15.0),
            ..Default::default()
        });
        assert!(min_only.contains(">= 15"));
        assert!(!min_only.contains("<="));
    }

    #[test]
    fn category_is_an_exact_match() {
        let query = sql(&ProductFilter {
            category: Some("electronics".to_string()),
            ..Default::default()
        });
        assert!(query.contains(r#""category" = 'electronics'"#), "query was: {}", query);
    }

    #[test]
    fn sort_keys_map_to_order_by() {
        let asc = sql(&ProductFilter {
            sort: Some(ProductSort::PriceAsc),
            ..Default::default()
        });
        assert!(asc.contains(r#"ORDER BY "products"."price" ASC"#), "query was: {}", asc);

        let desc = sql(&ProductFilter {
            sort: Some(ProductSort::PriceDesc),
            ..Default::default()
        });
        assert!(desc.contains(r#"ORDER BY "products"."price" DESC"#), "query was: {}", desc);

        let latest = sql(&ProductFilter {
            sort: Some(ProductSort::Latest),
            ..Default::default()
        });
        assert!(
            latest.contains(r#"ORDER BY "products"."created_at" DESC"#),
            "query was: {}",
            latest
        );
    }

    #[test]
    fn absent_sort_leaves_provider_default_order() {
        let query = sql(&ProductFilter::default());
        assert!(!query.contains("ORDER BY"), "query was: {}", query);
    }
}
