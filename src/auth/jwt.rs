/// Token issuance and verification
///
/// Signs account tokens with a shared HMAC secret and verifies presented
/// tokens back into typed claims.

use std::collections::HashSet;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ConfigError};

/// Algorithm used when signing
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Header algorithms accepted on verification. Anything outside the HMAC
/// family (`none`, RS*, ES*, ...) is refused.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Issues and verifies account tokens
///
/// Constructed once at startup from `JwtSettings` and shared read-only.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: i64,
}

impl TokenService {
    /// # Errors
    /// Returns `ConfigError::MissingRequired` if no signing secret is configured
    pub fn new(config: &JwtSettings) -> Result<Self, ConfigError> {
        if config.secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt.secret".to_string()));
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // `expiresAt` is informational only; no registered claim is required
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            token_expiry: config.token_expiry,
        })
    }

    /// The `expiresAt` value written into tokens issued at login
    pub fn token_expiry(&self) -> i64 {
        self.token_expiry
    }

    /// Sign a token asserting ownership of `account_number`
    ///
    /// # Errors
    /// Returns error if token encoding fails
    pub fn issue_token(&self, account_number: i64, expires_at: i64) -> Result<String, AppError> {
        let claims = Claims::new(account_number, expires_at);

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Verify signature and algorithm, then decode the claims
    ///
    /// # Errors
    /// Returns `AuthError::TokenInvalid` for a foreign algorithm, a bad
    /// signature, or a malformed token or payload
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token verification error: {}", e);
                AuthError::TokenInvalid
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            token_expiry: 15000,
        }
    }

    fn service() -> TokenService {
        TokenService::new(&get_test_config()).expect("Failed to build token service")
    }

    #[test]
    fn test_issue_and_verify_token() {
        let service = service();

        for number in [0, 1, 4242, 99_999] {
            let token = service.issue_token(number, 15000).expect("Failed to issue token");
            let claims = service.verify_token(&token).expect("Failed to verify token");

            assert_eq!(claims.account_number, number);
            assert_eq!(claims.expires_at, 15000);
        }
    }

    #[test]
    fn test_missing_secret() {
        let config = JwtSettings {
            secret: "  ".to_string(),
            token_expiry: 15000,
        };
        assert!(matches!(
            TokenService::new(&config),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_invalid_token() {
        let result = service().verify_token("invalid.token.here");
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_tampered_token() {
        let service = service();
        let token = service.issue_token(4242, 15000).unwrap();

        let tampered = format!("{}X", token);
        assert!(service.verify_token(&tampered).is_err());
    }

    #[test]
    fn test_wrong_key() {
        let token = service().issue_token(4242, 15000).unwrap();

        let other = TokenService::new(&JwtSettings {
            secret: "a-completely-different-signing-secret".to_string(),
            token_expiry: 15000,
        })
        .unwrap();

        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_other_hmac_variant_accepted() {
        let config = get_test_config();
        let token = encode(
            &Header::new(Algorithm::HS512),
            &Claims::new(4242, 15000),
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let claims = service().verify_token(&token).unwrap();
        assert_eq!(claims.account_number, 4242);
    }

    #[test]
    fn test_non_hmac_algorithm_rejected() {
        let token = service().issue_token(4242, 15000).unwrap();
        let signature = token.rsplit('.').next().unwrap();
        // {"typ":"JWT","alg":"RS256"} over the issued payload and signature
        let header = "eyJ0eXAiOiJKV1QiLCJhbGciOiJSUzI1NiJ9";
        let payload = token.split('.').nth(1).unwrap();
        let forged = format!("{}.{}.{}", header, payload, signature);

        assert!(service().verify_token(&forged).is_err());
    }

    #[test]
    fn test_none_algorithm_rejected() {
        // {"alg":"none","typ":"JWT"} . {"expiresAt":15000,"accountNumber":4242} . (empty)
        let forged = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                      eyJleHBpcmVzQXQiOjE1MDAwLCJhY2NvdW50TnVtYmVyIjo0MjQyfQ.";

        assert!(service().verify_token(forged).is_err());
    }

    #[test]
    fn test_expiry_is_not_enforced() {
        let service = service();
        let token = service.issue_token(4242, 1).unwrap();

        assert!(service.verify_token(&token).is_ok());
    }

    #[test]
    fn test_payload_without_account_number_rejected() {
        let config = get_test_config();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({"expiresAt": 15000}),
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service().verify_token(&token),
            Err(AuthError::TokenInvalid)
        ));
    }
}
