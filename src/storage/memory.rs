use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::Storage;
use crate::account::{Account, NewAccount};
use crate::error::DatabaseError;

/// Process-local account store
///
/// Ids are assigned sequentially from 1, like a SERIAL column. Account
/// numbers are kept unique the same way the Postgres schema does.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    last_id: i32,
    accounts: BTreeMap<i32, Account>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DatabaseError> {
        self.state
            .lock()
            .map_err(|_| DatabaseError::UnexpectedError("account store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Storage for InMemoryStore {
    async fn get_accounts(&self) -> Result<Vec<Account>, DatabaseError> {
        Ok(self.lock()?.accounts.values().cloned().collect())
    }

    async fn get_account_by_id(&self, id: i32) -> Result<Account, DatabaseError> {
        self.lock()?
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("account {}", id)))
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, DatabaseError> {
        self.lock()?
            .accounts
            .values()
            .find(|account| account.number == number)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("account number {}", number)))
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let mut state = self.lock()?;

        if state.accounts.values().any(|a| a.number == account.number) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "Account number already in use".to_string(),
            ));
        }

        state.last_id += 1;
        let account = account.into_account(state.last_id);
        state.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn delete_account(&self, id: i32) -> Result<(), DatabaseError> {
        self.lock()?
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("account {}", id)))
    }
}
