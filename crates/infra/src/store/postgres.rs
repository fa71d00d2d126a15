//! Postgres-backed subscription store.
//!
//! Expected table (created out of band):
//!
//! ```sql
//! CREATE TABLE subscriptions (
//!     id           BIGSERIAL PRIMARY KEY,
//!     service_name TEXT   NOT NULL,
//!     price        BIGINT NOT NULL,
//!     user_id      TEXT   NOT NULL,
//!     start_date   DATE   NOT NULL,
//!     end_date     DATE   NULL
//! );
//! ```
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | `RowNotFound` | `NotFound` | `fetch_one` found nothing |
//! | `Database` | `Backend` | constraint / SQL failures (message includes the SQLSTATE) |
//! | `PoolClosed` | `Backend` | pool shut down |
//! | Other | `Backend` | network errors, decode failures, etc. |
//!
//! "No rows affected" is never an sqlx error; it is derived from
//! `rows_affected()` after `UPDATE`/`DELETE`.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, info, instrument};

use subtrack_core::{MonthYear, SubscriptionId};
use subtrack_subscriptions::{StoreError, Subscription, SubscriptionStore, TotalFilter};

/// Postgres-backed subscription store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync`; every operation is a
/// single statement, so isolation is whatever Postgres gives a single statement.
#[derive(Debug, Clone)]
pub struct PostgresSubscriptionStore {
    pool: Arc<PgPool>,
}

impl PostgresSubscriptionStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool for `dsn` and ping it once before handing it out.
    pub async fn connect(dsn: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(dsn)
            .await
            .context("failed to connect to Postgres")?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .context("Postgres ping failed")?;

        info!("connected to Postgres");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    #[instrument(skip(self, subscription), fields(operation = tracing::field::Empty), err)]
    async fn create(&self, subscription: &Subscription) -> Result<SubscriptionId, StoreError> {
        Span::current().record("operation", "create_subscription");

        let row = sqlx::query(
            r#"
            INSERT INTO subscriptions (service_name, price, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(&subscription.user_id)
        .bind(subscription.start_date.as_date())
        .bind(subscription.end_date.map(|d| d.as_date()))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("create", e))?;
        if id == 0 {
            return Err(StoreError::NoRowsAffected);
        }

        Ok(SubscriptionId::new(id))
    }

    #[instrument(skip(self), fields(operation = tracing::field::Empty), err)]
    async fn read(&self, id: SubscriptionId) -> Result<Subscription, StoreError> {
        Span::current().record("operation", "read_subscription");

        let row = sqlx::query(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("read", e))?
        .ok_or(StoreError::NotFound)?;

        let row = SubscriptionRow::from_row(&row).map_err(|e| map_sqlx_error("read", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self, subscription), fields(operation = tracing::field::Empty, id = %subscription.id), err)]
    async fn update(&self, subscription: &Subscription) -> Result<(), StoreError> {
        Span::current().record("operation", "update_subscription");

        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET service_name = $2, price = $3, user_id = $4, start_date = $5, end_date = $6
            WHERE id = $1
            "#,
        )
        .bind(subscription.id.get())
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(&subscription.user_id)
        .bind(subscription.start_date.as_date())
        .bind(subscription.end_date.map(|d| d.as_date()))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NoRowsAffected);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(operation = tracing::field::Empty), err)]
    async fn delete(&self, id: SubscriptionId) -> Result<(), StoreError> {
        Span::current().record("operation", "delete_subscription");

        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NoRowsAffected);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(operation = tracing::field::Empty, row_count = tracing::field::Empty), err)]
    async fn list(&self) -> Result<Vec<Subscription>, StoreError> {
        let span = Span::current();
        span.record("operation", "list_subscriptions");

        let rows = sqlx::query(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date
            FROM subscriptions
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        let mut subscriptions = Vec::with_capacity(rows.len());
        for row in rows {
            let row = SubscriptionRow::from_row(&row).map_err(|e| map_sqlx_error("list", e))?;
            subscriptions.push(row.into());
        }

        span.record("row_count", subscriptions.len());
        Ok(subscriptions)
    }

    #[instrument(
        skip(self, filter),
        fields(
            operation = tracing::field::Empty,
            user_id = %filter.user_id,
            service_name = %filter.service_name,
            start = %filter.start,
            end = %filter.end
        )
    )]
    async fn aggregate(&self, filter: &TotalFilter) -> Result<i64, StoreError> {
        Span::current().record("operation", "aggregate_subscriptions");

        // SUM(bigint) is NUMERIC in Postgres; cast back so it decodes as i64.
        let row = sqlx::query(
            r#"
            SELECT SUM(price)::BIGINT AS total
            FROM subscriptions
            WHERE user_id = $1
              AND service_name = $2
              AND start_date BETWEEN $3 AND $4
            "#,
        )
        .bind(&filter.user_id)
        .bind(&filter.service_name)
        .bind(filter.start.as_date())
        .bind(filter.end.as_date())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("aggregate", e))?;

        let total: Option<i64> = row
            .try_get("total")
            .map_err(|e| map_sqlx_error("aggregate", e))?;

        total.ok_or(StoreError::NotFound)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SubscriptionRow {
    id: i64,
    service_name: String,
    price: i64,
    user_id: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl<'r> FromRow<'r, PgRow> for SubscriptionRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(SubscriptionRow {
            id: row.try_get("id")?,
            service_name: row.try_get("service_name")?,
            price: row.try_get("price")?,
            user_id: row.try_get("user_id")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
        })
    }
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: SubscriptionId::new(row.id),
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id,
            start_date: MonthYear::from_date(row.start_date),
            end_date: row.end_date.map(MonthYear::from_date),
        }
    }
}

/// Map SQLx errors to store errors.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            StoreError::Backend(format!(
                "database error in {operation} [{code}]: {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}
