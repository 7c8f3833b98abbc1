//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency. Each test
//! truncates the tables on entry and asserts on table-wide counts, so every
//! test is `#[serial]`.

use std::collections::HashSet;
use std::sync::Arc;

use order_store::{
    MenuItem, MenuItemId, Order, OrderId, OrderRepository, OrderStoreError,
    PostgresOrderRepository,
};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresOrderRepository::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh repository with its own pool and cleared tables
async fn get_test_repository() -> PostgresOrderRepository {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query(r#"TRUNCATE TABLE order_item, "order""#)
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderRepository::new(pool)
}

async fn count(repo: &PostgresOrderRepository, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(repo.pool()).await.unwrap()
}

fn item(quantity: i32) -> MenuItem {
    MenuItem::new(MenuItemId::from_uuid(Uuid::new_v4()), quantity)
}

fn item_set(items: &[MenuItem]) -> HashSet<MenuItem> {
    items.iter().copied().collect()
}

#[tokio::test]
#[serial]
async fn add_and_get_round_trips_item_set() {
    let repo = get_test_repository().await;
    let (a, b) = (item(2), item(3));
    let order = Order::new(OrderId::new(), 77, vec![a, b]);

    repo.add_order(&order).await.unwrap();

    let stored = repo.get_order(order.id).await.unwrap();
    assert_eq!(stored.id, order.id);
    assert_eq!(stored.cost, 77);
    assert_eq!(item_set(&stored.items), HashSet::from([a, b]));
}

#[tokio::test]
#[serial]
async fn identifiers_are_stored_as_sixteen_bytes() {
    let repo = get_test_repository().await;
    let order = Order::new(OrderId::new(), 0, vec![item(1)]);
    repo.add_order(&order).await.unwrap();

    let stored: Vec<u8> = sqlx::query_scalar(r#"SELECT id FROM "order""#)
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(stored, order.id.to_bytes().to_vec());

    let lengths: Vec<i32> = sqlx::query_scalar("SELECT octet_length(menu_item_id) FROM order_item")
        .fetch_all(repo.pool())
        .await
        .unwrap();
    assert_eq!(lengths, vec![16]);
}

#[tokio::test]
#[serial]
async fn order_without_items_reads_back_empty() {
    let repo = get_test_repository().await;
    let order = Order::new(OrderId::new(), 5, vec![]);

    repo.add_order(&order).await.unwrap();

    let stored = repo.get_order(order.id).await.unwrap();
    assert!(stored.items.is_empty());
}

#[tokio::test]
#[serial]
async fn get_unknown_order_is_not_found() {
    let repo = get_test_repository().await;
    let id = OrderId::new();

    let err = repo.get_order(id).await.unwrap_err();
    assert!(matches!(err, OrderStoreError::NotFound(missing) if missing == id));
}

#[tokio::test]
#[serial]
async fn update_replaces_full_item_set() {
    let repo = get_test_repository().await;
    let mut order = Order::new(OrderId::new(), 0, vec![item(2), item(3)]);
    repo.add_order(&order).await.unwrap();

    let c = item(1);
    order.items = vec![c];
    repo.update_order(&order).await.unwrap();

    let stored = repo.get_order(order.id).await.unwrap();
    assert_eq!(stored.items, vec![c]);
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM order_item").await, 1);

    let updated = count(
        &repo,
        r#"SELECT COUNT(*) FROM "order" WHERE updated_at IS NOT NULL"#,
    )
    .await;
    assert_eq!(updated, 1);
}

#[tokio::test]
#[serial]
async fn update_to_empty_item_set() {
    let repo = get_test_repository().await;
    let mut order = Order::new(OrderId::new(), 0, vec![item(2)]);
    repo.add_order(&order).await.unwrap();

    order.items.clear();
    repo.update_order(&order).await.unwrap();

    assert!(repo.get_order(order.id).await.unwrap().items.is_empty());
}

#[tokio::test]
#[serial]
async fn update_unknown_order_is_not_found_and_writes_nothing() {
    let repo = get_test_repository().await;
    let order = Order::new(OrderId::new(), 0, vec![item(1)]);

    let err = repo.update_order(&order).await.unwrap_err();
    assert!(matches!(err, OrderStoreError::NotFound(_)));
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM order_item").await, 0);
}

#[tokio::test]
#[serial]
async fn failing_third_item_rolls_back_entire_add() {
    let repo = get_test_repository().await;
    let order = Order::new(OrderId::new(), 0, vec![item(1), item(2), item(-1), item(4)]);

    let err = repo.add_order(&order).await.unwrap_err();
    assert!(matches!(
        err,
        OrderStoreError::Constraint { ref constraint, .. } if constraint == "order_item_quantity_positive"
    ));

    assert!(matches!(
        repo.get_order(order.id).await,
        Err(OrderStoreError::NotFound(_))
    ));
    assert_eq!(count(&repo, r#"SELECT COUNT(*) FROM "order""#).await, 0);
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM order_item").await, 0);
}

#[tokio::test]
#[serial]
async fn failing_update_keeps_previous_items() {
    let repo = get_test_repository().await;
    let mut order = Order::new(OrderId::new(), 0, vec![item(2), item(3)]);
    repo.add_order(&order).await.unwrap();
    let before = item_set(&order.items);

    order.items = vec![item(1), item(1), item(0)];
    assert!(repo.update_order(&order).await.is_err());

    let stored = repo.get_order(order.id).await.unwrap();
    assert_eq!(item_set(&stored.items), before);
}

#[tokio::test]
#[serial]
async fn duplicate_header_is_a_constraint_violation() {
    let repo = get_test_repository().await;
    let order = Order::new(OrderId::new(), 0, vec![item(1)]);
    repo.add_order(&order).await.unwrap();

    let err = repo.add_order(&order).await.unwrap_err();
    assert!(matches!(err, OrderStoreError::Constraint { .. }));
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM order_item").await, 1);
}

#[tokio::test]
#[serial]
async fn delete_removes_header_and_items() {
    let repo = get_test_repository().await;
    let kept = Order::new(OrderId::new(), 0, vec![item(1)]);
    let removed = Order::new(OrderId::new(), 0, vec![item(1), item(2)]);
    repo.add_order(&kept).await.unwrap();
    repo.add_order(&removed).await.unwrap();

    repo.delete_order(removed.id).await.unwrap();

    assert!(matches!(
        repo.get_order(removed.id).await,
        Err(OrderStoreError::NotFound(_))
    ));
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM order_item").await, 1);

    let err = repo.delete_order(removed.id).await.unwrap_err();
    assert!(matches!(err, OrderStoreError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn get_orders_returns_every_aggregate() {
    let repo = get_test_repository().await;
    let item_a = item(1);
    let first = Order::new(OrderId::new(), 0, vec![item_a]);
    repo.add_order(&first).await.unwrap();
    let second = Order::new(OrderId::new(), 0, vec![item(2), item(3)]);
    repo.add_order(&second).await.unwrap();

    let orders = repo.get_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, first.id);
    assert_eq!(orders[0].items, vec![item_a]);
    assert_eq!(item_set(&orders[1].items), item_set(&second.items));
}

#[tokio::test]
#[serial]
async fn many_items_with_large_quantities_survive_aggregation() {
    let repo = get_test_repository().await;
    let items: Vec<MenuItem> = (1..=20).map(|q| item(q * 1000)).collect();
    let order = Order::new(OrderId::new(), 0, items.clone());
    repo.add_order(&order).await.unwrap();

    let stored = repo.get_order(order.id).await.unwrap();
    assert_eq!(item_set(&stored.items), item_set(&items));
}

#[tokio::test]
#[serial]
async fn soft_deleted_order_is_absent_for_every_operation() {
    let repo = get_test_repository().await;
    let mut order = Order::new(OrderId::new(), 0, vec![item(1)]);
    repo.add_order(&order).await.unwrap();

    sqlx::query(r#"UPDATE "order" SET deleted_at = now() WHERE id = $1"#)
        .bind(&order.id.to_bytes()[..])
        .execute(repo.pool())
        .await
        .unwrap();

    assert!(matches!(
        repo.get_order(order.id).await,
        Err(OrderStoreError::NotFound(_))
    ));
    assert!(repo.get_orders().await.unwrap().is_empty());

    order.items = vec![item(2)];
    assert!(matches!(
        repo.update_order(&order).await,
        Err(OrderStoreError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete_order(order.id).await,
        Err(OrderStoreError::NotFound(_))
    ));

    assert_eq!(count(&repo, r#"SELECT COUNT(*) FROM "order""#).await, 1);
    assert_eq!(count(&repo, "SELECT COUNT(*) FROM order_item").await, 1);
}
