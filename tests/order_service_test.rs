//! Order service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use retail_api::domain::{Order, OrderItem, OrderOwner};
use retail_api::errors::AppError;
use retail_api::infra::repositories::{
    MockOrderRepository, MockProductRepository, MockUserRepository,
};
use retail_api::infra::{OrderRepository, ProductRepository, UnitOfWork, UserRepository};
use retail_api::services::{OrderDesk, OrderService};

fn make_item() -> OrderItem {
    OrderItem {
        product_id: Uuid::new_v4(),
        name: "Mechanical Keyboard".to_string(),
        price: 79.99,
        quantity: 2,
        image: "/images/keyboard.jpg".to_string(),
    }
}

fn make_order(id: Uuid, user_id: Uuid, status: &str) -> Order {
    Order {
        id,
        user_id,
        items: vec![make_item()],
        total_price: 159.98,
        payment_status: "Pending".to_string(),
        order_status: status.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Test mock for UnitOfWork that wraps mock repositories
struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    products: Arc<MockProductRepository>,
    orders: Arc<MockOrderRepository>,
}

impl TestUnitOfWork {
    fn with_orders(orders: MockOrderRepository) -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            products: Arc::new(MockProductRepository::new()),
            orders: Arc::new(orders),
        }
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }
}

fn service(orders: MockOrderRepository) -> OrderDesk<TestUnitOfWork> {
    OrderDesk::new(Arc::new(TestUnitOfWork::with_orders(orders)))
}

#[tokio::test]
async fn create_order_rejects_empty_items() {
    // No expectation set: touching the repository would fail the test
    let service = service(MockOrderRepository::new());

    let result = service.create_order(Uuid::new_v4(), vec![], 0.0).await;

    assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
}

#[tokio::test]
async fn create_order_persists_submitted_items() {
    let user_id = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_create()
        .with(eq(user_id), eq(vec![make_item_fixed()]), eq(159.98))
        .returning(|user_id, items, total| {
            let mut order = make_order(Uuid::new_v4(), user_id, "Processing");
            order.items = items;
            order.total_price = total;
            Ok(order)
        });

    let service = service(repo);
    let result = service
        .create_order(user_id, vec![make_item_fixed()], 159.98)
        .await
        .unwrap();

    assert_eq!(result.user_id, user_id);
    assert_eq!(result.order_status, "Processing");
    assert_eq!(result.payment_status, "Pending");
    assert_eq!(result.items.len(), 1);
}

/// Deterministic item so the argument predicate can match
fn make_item_fixed() -> OrderItem {
    OrderItem {
        product_id: Uuid::from_u128(7),
        name: "Mechanical Keyboard".to_string(),
        price: 79.99,
        quantity: 2,
        image: "/images/keyboard.jpg".to_string(),
    }
}

#[tokio::test]
async fn get_order_not_found() {
    let mut repo = MockOrderRepository::new();
    repo.expect_find_with_owner().returning(|_| Ok(None));

    let service = service(repo);
    let result = service.get_order(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn get_order_joins_owner_details() {
    let order_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_find_with_owner()
        .with(eq(order_id))
        .returning(move |id| {
            let owner = OrderOwner {
                id: user_id,
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
            };
            Ok(Some((make_order(id, user_id, "Processing"), Some(owner))))
        });

    let service = service(repo);
    let result = service.get_order(order_id).await.unwrap();

    assert_eq!(result.id, order_id);
    let owner = result.user.expect("owner should be joined in");
    assert_eq!(owner.email, "test@example.com");
}

#[tokio::test]
async fn get_order_tolerates_missing_owner() {
    let order_id = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_find_with_owner()
        .returning(|id| Ok(Some((make_order(id, Uuid::new_v4(), "Processing"), None))));

    let service = service(repo);
    let result = service.get_order(order_id).await.unwrap();

    assert!(result.user.is_none());
}

#[tokio::test]
async fn list_my_orders_scopes_to_user() {
    let user_id = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_list_by_user()
        .with(eq(user_id))
        .returning(|user_id| {
            Ok(vec![
                make_order(Uuid::new_v4(), user_id, "Processing"),
                make_order(Uuid::new_v4(), user_id, "Shipped"),
            ])
        });

    let service = service(repo);
    let result = service.list_my_orders(user_id).await.unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|o| o.user_id == user_id));
}

#[tokio::test]
async fn update_status_stores_value_verbatim() {
    let order_id = Uuid::new_v4();

    let mut repo = MockOrderRepository::new();
    repo.expect_update_status()
        .with(eq(order_id), eq("On a boat".to_string()))
        .returning(|id, status| Ok(make_order(id, Uuid::new_v4(), &status)));

    let service = service(repo);
    let result = service
        .update_status(order_id, "On a boat".to_string())
        .await
        .unwrap();

    assert_eq!(result.order_status, "On a boat");
}

#[tokio::test]
async fn update_status_not_found() {
    let mut repo = MockOrderRepository::new();
    repo.expect_update_status()
        .returning(|_, _| Err(AppError::NotFound));

    let service = service(repo);
    let result = service
        .update_status(Uuid::new_v4(), "Shipped".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}
