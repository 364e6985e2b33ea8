use actix_web::dev::Server;
use actix_web::{error::JsonPayloadError, middleware::Logger, web, App, HttpRequest, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{CredentialManager, TokenService};
use crate::error::{AppError, ValidationError};
use crate::middleware::{AccessGuard, RequestLogger};
use crate::routes::{
    create_account, delete_account, get_account, health_check, list_accounts, login, transfer,
};
use crate::storage::Storage;

/// Undecodable JSON bodies get the same `{"error": ...}` shape as every other failure
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationError::InvalidFormat(format!("request body ({})", err))).into()
}

pub fn run(
    listener: TcpListener,
    store: Arc<dyn Storage>,
    tokens: TokenService,
    credentials: CredentialManager,
) -> Result<Server, std::io::Error> {
    let store_data: web::Data<dyn Storage> = web::Data::from(store.clone());
    let tokens_data = web::Data::new(tokens.clone());
    let credentials_data = web::Data::new(credentials);

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(RequestLogger)

            // Shared state
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(store_data.clone())
            .app_data(tokens_data.clone())
            .app_data(credentials_data.clone())

            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/login", web::post().to(login))
            .route("/transfer", web::post().to(transfer))
            .service(
                web::resource("/account")
                    .route(web::get().to(list_accounts))
                    .route(web::post().to(create_account)),
            )

            // Routes scoped to one account (token must own it)
            .service(
                web::resource("/account/{id}")
                    .wrap(AccessGuard::new(tokens.clone(), store.clone()))
                    .route(web::get().to(get_account))
                    .route(web::delete().to(delete_account)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
