/// Token claims
///
/// The payload of an account token. Decoded into this struct on
/// verification, so a missing or mistyped field rejects the token.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Fixed expiry hint. Never compared against the clock.
    pub expires_at: i64,
    /// Account number the bearer owns
    pub account_number: i64,
}

impl Claims {
    pub fn new(account_number: i64, expires_at: i64) -> Self {
        Self {
            expires_at,
            account_number,
        }
    }
}
