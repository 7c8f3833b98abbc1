use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    MenuItem, Order, OrderId, OrderRepository, OrderStoreError, Result, RowDecodeError,
    decode_menu_items,
};

/// Header columns plus the `string_agg` item field decoded by [`decode_menu_items`].
const SELECT_ORDERS: &str = r#"
    SELECT
        o.id,
        o.created_at,
        o.cost,
        COALESCE(
            string_agg(
                encode(oi.menu_item_id, 'hex')::uuid::text || '=' || oi.quantity::text,
                ','
            ),
            ''
        ) AS menu_items
    FROM "order" o
    LEFT JOIN order_item oi ON oi.order_id = o.id
"#;

/// PostgreSQL-backed order repository.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let id: Vec<u8> = row.try_get("id")?;
        let menu_items: String = row.try_get("menu_items")?;

        Ok(Order {
            id: OrderId::from_bytes(&id).map_err(RowDecodeError::InvalidOrderId)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            cost: row.try_get("cost")?,
            items: decode_menu_items(&menu_items)?,
        })
    }

    async fn insert_header(conn: &mut PgConnection, order: &Order) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO "order" (id, cost, created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, NULL, NULL)
            "#,
        )
        .bind(&order.id.to_bytes()[..])
        .bind(order.cost)
        .bind(order.created_at)
        .execute(conn)
        .await
        .map_err(OrderStoreError::from_database)?;

        Ok(())
    }

    async fn insert_items(conn: &mut PgConnection, id: OrderId, items: &[MenuItem]) -> Result<()> {
        let order_id = id.to_bytes();

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_item (order_id, menu_item_id, quantity)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(&order_id[..])
            .bind(&item.id.to_bytes()[..])
            .bind(item.quantity)
            .execute(&mut *conn)
            .await
            .map_err(OrderStoreError::from_database)?;
        }

        Ok(())
    }

    async fn replace_items(conn: &mut PgConnection, order: &Order) -> Result<()> {
        let order_id = order.id.to_bytes();

        let touched = sqlx::query(
            r#"
            UPDATE "order" SET updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(&order_id[..])
        .bind(Utc::now())
        .execute(&mut *conn)
        .await
        .map_err(OrderStoreError::from_database)?;

        if touched.rows_affected() == 0 {
            return Err(OrderStoreError::NotFound(order.id));
        }

        sqlx::query("DELETE FROM order_item WHERE order_id = $1")
            .bind(&order_id[..])
            .execute(&mut *conn)
            .await
            .map_err(OrderStoreError::from_database)?;

        Self::insert_items(conn, order.id, &order.items).await
    }

    async fn delete_header(conn: &mut PgConnection, id: OrderId) -> Result<()> {
        let deleted = sqlx::query(r#"DELETE FROM "order" WHERE id = $1 AND deleted_at IS NULL"#)
            .bind(&id.to_bytes()[..])
            .execute(conn)
            .await
            .map_err(OrderStoreError::from_database)?;

        if deleted.rows_affected() == 0 {
            return Err(OrderStoreError::NotFound(id));
        }
        Ok(())
    }
}

/// Commits on success; otherwise rolls back explicitly and returns the original error.
async fn finish(tx: Transaction<'_, Postgres>, outcome: Result<()>) -> Result<()> {
    match outcome {
        Ok(()) => {
            tx.commit().await?;
            Ok(())
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id, items = order.items.len()))]
    async fn add_order(&self, order: &Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let outcome = async {
            Self::insert_header(&mut *tx, order).await?;
            Self::insert_items(&mut *tx, order.id, &order.items).await
        }
        .await;

        finish(tx, outcome).await
    }

    #[tracing::instrument(skip(self, order), fields(order_id = %order.id, items = order.items.len()))]
    async fn update_order(&self, order: &Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let outcome = Self::replace_items(&mut *tx, order).await;
        finish(tx, outcome).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_order(&self, id: OrderId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let outcome = Self::delete_header(&mut *tx, id).await;
        finish(tx, outcome).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_order(&self, id: OrderId) -> Result<Order> {
        let sql = format!("{SELECT_ORDERS} WHERE o.id = $1 AND o.deleted_at IS NULL GROUP BY o.id");

        let row: Option<PgRow> = sqlx::query(&sql)
            .bind(&id.to_bytes()[..])
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::row_to_order(row),
            None => Err(OrderStoreError::NotFound(id)),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_orders(&self) -> Result<Vec<Order>> {
        let sql = format!(
            "{SELECT_ORDERS} WHERE o.deleted_at IS NULL GROUP BY o.id ORDER BY o.created_at ASC, o.id ASC"
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_order).collect()
    }
}
