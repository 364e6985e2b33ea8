/// Account Model
///
/// The account record owned by storage, and the unsaved form handed to it.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

/// Upper bound (exclusive) for generated account numbers
pub const ACCOUNT_NUMBER_RANGE: i64 = 100_000;

/// A stored bank account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// An account that has not been persisted yet; storage assigns the id
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub encrypted_password: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Build an account with a freshly generated number and zero balance.
    ///
    /// `encrypted_password` must already be hashed.
    pub fn new(first_name: String, last_name: String, encrypted_password: String) -> Self {
        Self {
            first_name,
            last_name,
            number: generate_account_number(),
            encrypted_password,
            balance: 0,
            created_at: Utc::now(),
        }
    }

    pub fn into_account(self, id: i32) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            encrypted_password: self.encrypted_password,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

/// Pick a pseudo-random account number.
///
/// Uniqueness is not checked here; collisions surface as a storage conflict.
pub fn generate_account_number() -> i64 {
    rand::thread_rng().gen_range(0..ACCOUNT_NUMBER_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults() {
        let account = NewAccount::new("Amine".into(), "El".into(), "$2b$hash".into());

        assert_eq!(account.balance, 0);
        assert!((0..ACCOUNT_NUMBER_RANGE).contains(&account.number));
        assert!(account.created_at <= Utc::now());
    }

    #[test]
    fn test_serialization_hides_password_hash() {
        let account = NewAccount::new("Amine".into(), "El".into(), "$2b$secret-hash".into())
            .into_account(7);

        let json = serde_json::to_value(&account).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["firstName"], "Amine");
        assert_eq!(json["lastName"], "El");
        assert!(json.get("encryptedPassword").is_none());
        assert!(!json.to_string().contains("secret-hash"));
    }
}
