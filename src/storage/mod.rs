/// Storage module
///
/// The account persistence contract consumed by handlers and the access
/// guard, with a Postgres and an in-memory implementation.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;

use crate::account::{Account, NewAccount};
use crate::error::DatabaseError;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_accounts(&self) -> Result<Vec<Account>, DatabaseError>;

    /// `DatabaseError::NotFound` when no account has this id
    async fn get_account_by_id(&self, id: i32) -> Result<Account, DatabaseError>;

    /// `DatabaseError::NotFound` when no account has this number
    async fn get_account_by_number(&self, number: i64) -> Result<Account, DatabaseError>;

    /// Persist the account and return it with its assigned id
    async fn create_account(&self, account: NewAccount) -> Result<Account, DatabaseError>;

    async fn delete_account(&self, id: i32) -> Result<(), DatabaseError>;
}
