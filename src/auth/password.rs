/// Password Hashing and Verification
///
/// Handles password hashing and verification with bcrypt.

use bcrypt::{hash, verify, BcryptError};

use crate::configuration::CredentialSettings;
use crate::error::{ConfigError, CredentialError};

/// bcrypt only reads the first 72 bytes; longer input is refused instead of truncated
pub const MAX_PASSWORD_BYTES: usize = 72;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Hashes and verifies account passwords with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct CredentialManager {
    cost: u32,
}

impl CredentialManager {
    /// Build from settings, rejecting a work factor bcrypt would refuse
    pub fn new(settings: &CredentialSettings) -> Result<Self, ConfigError> {
        if !(MIN_COST..=MAX_COST).contains(&settings.bcrypt_cost) {
            return Err(ConfigError::InvalidValue(format!(
                "credentials.bcrypt_cost must be between {} and {}",
                MIN_COST, MAX_COST
            )));
        }
        Ok(Self {
            cost: settings.bcrypt_cost,
        })
    }

    /// Hash a plaintext password with a fresh random salt
    ///
    /// # Errors
    /// - `CredentialError::TooLong` if the password exceeds 72 bytes
    /// - `CredentialError::InvalidCost` if the work factor is out of range
    pub fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(CredentialError::TooLong(MAX_PASSWORD_BYTES));
        }

        hash(password, self.cost).map_err(|e| match e {
            BcryptError::CostNotAllowed(cost) => CredentialError::InvalidCost(cost),
            other => CredentialError::Hashing(other.to_string()),
        })
    }

    /// Verify a password against its stored hash
    ///
    /// Returns `Ok(false)` on mismatch, including for input longer than
    /// anything `hash_password` accepts. Errors only when `hash` is not a
    /// bcrypt hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        verify(password, hash).map_err(|_| CredentialError::MalformedHash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the suite fast
    fn manager() -> CredentialManager {
        CredentialManager::new(&CredentialSettings { bcrypt_cost: 4 }).unwrap()
    }

    #[test]
    fn test_hash_password() {
        let password = "s3cret";
        let hash = manager().hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hash);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let manager = manager();
        let first = manager.hash_password("s3cret").unwrap();
        let second = manager.hash_password("s3cret").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password() {
        let manager = manager();
        let longest = "x".repeat(MAX_PASSWORD_BYTES);
        for password in ["s3cret", "", "pässwörd with spaces", longest.as_str()] {
            let hash = manager.hash_password(password).expect("Failed to hash password");
            assert!(manager.verify_password(password, &hash).unwrap(), "{}", password);
        }
    }

    #[test]
    fn test_verify_wrong_password() {
        let manager = manager();
        let hash = manager.hash_password("s3cret").unwrap();

        for wrong in ["S3cret", "s3cret ", "", "s3cre"] {
            assert!(!manager.verify_password(wrong, &hash).unwrap(), "{}", wrong);
        }
    }

    #[test]
    fn test_too_long_password() {
        let result = manager().hash_password(&"a".repeat(MAX_PASSWORD_BYTES + 1));
        assert!(matches!(result, Err(CredentialError::TooLong(72))));
    }

    #[test]
    fn test_oversized_password_never_verifies() {
        let manager = manager();
        let stored = "y".repeat(MAX_PASSWORD_BYTES);
        let hash = manager.hash_password(&stored).unwrap();

        // bcrypt alone would ignore everything past byte 72
        let extended = format!("{}z", stored);
        assert!(!manager.verify_password(&extended, &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        let result = manager().verify_password("s3cret", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(CredentialError::MalformedHash)));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        assert!(CredentialManager::new(&CredentialSettings { bcrypt_cost: 3 }).is_err());
        assert!(CredentialManager::new(&CredentialSettings { bcrypt_cost: 32 }).is_err());
    }

    #[test]
    fn test_invalid_cost_on_hash() {
        let manager = CredentialManager { cost: 99 };
        assert!(matches!(
            manager.hash_password("s3cret"),
            Err(CredentialError::InvalidCost(99))
        ));
    }
}
