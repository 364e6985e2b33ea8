use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::Storage;
use crate::account::{Account, NewAccount};
use crate::error::DatabaseError;

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, number, encrypted_password, balance, created_at";

/// Postgres-backed account store
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `account` table if it does not exist yet
    pub async fn init(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account (
                id SERIAL PRIMARY KEY,
                first_name VARCHAR(50) NOT NULL,
                last_name VARCHAR(50) NOT NULL,
                number BIGINT NOT NULL UNIQUE,
                encrypted_password TEXT NOT NULL,
                balance BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        number: row.try_get("number")?,
        encrypted_password: row.try_get("encrypted_password")?,
        balance: row.try_get("balance")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl Storage for PostgresStore {
    async fn get_accounts(&self) -> Result<Vec<Account>, DatabaseError> {
        let rows = sqlx::query(&format!("SELECT {} FROM account ORDER BY id", ACCOUNT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row_to_account(row).map_err(DatabaseError::from))
            .collect()
    }

    async fn get_account_by_id(&self, id: i32) -> Result<Account, DatabaseError> {
        let row = sqlx::query(&format!("SELECT {} FROM account WHERE id = $1", ACCOUNT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("account {}", id)))?;

        Ok(row_to_account(&row)?)
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, DatabaseError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM account WHERE number = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("account number {}", number)))?;

        Ok(row_to_account(&row)?)
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO account (first_name, last_name, number, encrypted_password, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(&account.encrypted_password)
        .bind(account.balance)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(account.into_account(id))
    }

    async fn delete_account(&self, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("account {}", id)));
        }

        Ok(())
    }
}
