use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

/// Transfer request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: String,
    pub amount: i64,
}

/// POST /transfer
///
/// Accepts a transfer and echoes it back. No balance is moved.
pub async fn transfer(form: web::Json<TransferRequest>) -> HttpResponse {
    tracing::info!(amount = form.amount, "Transfer request received (not executed)");
    HttpResponse::Ok().json(form.into_inner())
}
