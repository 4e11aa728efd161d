use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::store::{Collection, DocumentStore, Filter};

/// PostgreSQL-backed store: one JSONB table per collection
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create collection tables if missing
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for collection in Collection::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id UUID PRIMARY KEY,
                    body JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )",
                Self::table(collection)
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }

        // One profile per user, one account per email
        sqlx::query(r#"CREATE UNIQUE INDEX IF NOT EXISTS profiles_user_key ON "profiles" ((body ->> 'user'))"#)
            .execute(&self.pool)
            .await?;
        sqlx::query(r#"CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON "users" ((body ->> 'email'))"#)
            .execute(&self.pool)
            .await?;
        info!("Document tables ready");
        Ok(())
    }

    /// Collection names are a closed set, quoting keeps them identifiers
    fn table(collection: Collection) -> String {
        format!("\"{}\"", collection.name())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, DatabaseError> {
        let sql = format!("SELECT body FROM {} WHERE id = $1", Self::table(collection));
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| r.get::<Json<Value>, _>("body").0))
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, DatabaseError> {
        let rows = match filter {
            Filter::All => {
                let sql = format!("SELECT body FROM {} ORDER BY created_at", Self::table(collection));
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
            Filter::Eq { field, value } => {
                let sql = format!(
                    "SELECT body FROM {} WHERE body -> $1 = $2 ORDER BY created_at",
                    Self::table(collection)
                );
                sqlx::query(&sql)
                    .bind(*field)
                    .bind(Json(value))
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows
            .into_iter()
            .map(|r| r.get::<Json<Value>, _>("body").0)
            .collect())
    }

    async fn save(&self, collection: Collection, id: Uuid, doc: Value) -> Result<(), DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (id, body) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET body = EXCLUDED.body, updated_at = now()",
            Self::table(collection)
        );
        sqlx::query(&sql).bind(id).bind(Json(doc)).execute(&self.pool).await?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", Self::table(collection));
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError> {
        let result = match filter {
            Filter::All => {
                let sql = format!("DELETE FROM {}", Self::table(collection));
                sqlx::query(&sql).execute(&self.pool).await?
            }
            Filter::Eq { field, value } => {
                let sql = format!("DELETE FROM {} WHERE body -> $1 = $2", Self::table(collection));
                sqlx::query(&sql)
                    .bind(*field)
                    .bind(Json(value))
                    .execute(&self.pool)
                    .await?
            }
        };
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
