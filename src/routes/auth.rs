/// Authentication Routes
///
/// Exchanges an account number and password for an account token.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{CredentialManager, TokenService};
use crate::error::{AppError, AuthError, CredentialError, DatabaseError, ErrorContext};
use crate::storage::Storage;

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}

/// Login response
#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub number: i64,
}

/// POST /login
///
/// Authenticate with account number and password.
///
/// # Errors
/// - 400: Malformed request body
/// - 401: Unknown account number or wrong password
/// - 500: Internal server error
///
/// # Security Notes
/// - Same error for "not found" and "wrong password"
/// - An unknown number still pays for one bcrypt round so response time
///   does not reveal whether the account exists
pub async fn login(
    form: web::Json<LoginRequest>,
    store: web::Data<dyn Storage>,
    credentials: web::Data<CredentialManager>,
    tokens: web::Data<TokenService>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("account_login");
    let LoginRequest { number, password } = form.into_inner();
    let credentials = *credentials.get_ref();

    let stored_hash = match store.get_account_by_number(number).await {
        Ok(account) => Some(account.encrypted_password),
        Err(DatabaseError::NotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    let password_valid = web::block(move || match stored_hash {
        Some(hash) => credentials.verify_password(&password, &hash),
        None => credentials.hash_password(&password).map(|_| false),
    })
    .await
    .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?;

    // An oversized password cannot match any stored hash
    let password_valid = match password_valid {
        Ok(valid) => valid,
        Err(CredentialError::TooLong(_)) => false,
        Err(e) => return Err(e.into()),
    };

    if !password_valid {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = tokens.issue_token(number, tokens.token_expiry())?;

    tracing::info!(
        request_id = %context.request_id,
        account_number = number,
        "Account logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse { token, number }))
}
