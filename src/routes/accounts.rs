/// Account Routes
///
/// Create, list, fetch and delete accounts. Fetch and delete are mounted
/// behind the access guard.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::account::NewAccount;
use crate::auth::CredentialManager;
use crate::error::{AppError, ErrorContext};
use crate::storage::Storage;
use crate::validators::{is_valid_name, is_valid_password, parse_account_id};

/// Account creation request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteAccountResponse {
    pub deleted: i32,
}

/// POST /account
///
/// Create an account with a generated account number and a bcrypt-hashed
/// password. The response never includes the hash.
///
/// # Errors
/// - 400: Validation errors (names, empty or oversized password)
/// - 409: Generated account number already taken
/// - 500: Hashing or storage failure
pub async fn create_account(
    form: web::Json<CreateAccountRequest>,
    store: web::Data<dyn Storage>,
    credentials: web::Data<CredentialManager>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("account_creation");
    let form = form.into_inner();

    let first_name = is_valid_name("firstName", &form.first_name)?;
    let last_name = is_valid_name("lastName", &form.last_name)?;
    is_valid_password(&form.password)?;

    let credentials = *credentials.get_ref();
    let password = form.password;
    let encrypted_password = web::block(move || credentials.hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

    let account = store
        .create_account(NewAccount::new(first_name, last_name, encrypted_password))
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            context.log_error(&err);
            err
        })?;

    tracing::info!(
        request_id = %context.request_id,
        account_id = account.id,
        account_number = account.number,
        "Account created"
    );

    Ok(HttpResponse::Ok().json(account))
}

/// GET /account
pub async fn list_accounts(store: web::Data<dyn Storage>) -> Result<HttpResponse, AppError> {
    let accounts = store.get_accounts().await?;
    Ok(HttpResponse::Ok().json(accounts))
}

/// GET /account/{id}
///
/// **Requires** an `x-jwt-token` for the addressed account (access guard).
pub async fn get_account(
    path: web::Path<String>,
    store: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let id = parse_account_id(&path)?;
    let account = store.get_account_by_id(id).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// DELETE /account/{id}
///
/// **Requires** an `x-jwt-token` for the addressed account (access guard).
pub async fn delete_account(
    path: web::Path<String>,
    store: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("account_deletion");
    let id = parse_account_id(&path)?;

    store.delete_account(id).await?;

    tracing::info!(request_id = %context.request_id, account_id = id, "Account deleted");

    Ok(HttpResponse::Ok().json(DeleteAccountResponse { deleted: id }))
}
