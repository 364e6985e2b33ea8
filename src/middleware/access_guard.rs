/// Access Guard Middleware
///
/// Lets a request through to `/account/{id}` handlers only when the
/// `x-jwt-token` header carries a valid token whose `accountNumber` claim
/// matches the number of the account the path addresses.
///
/// Every denial produces the same 403 `{"error": "permission denied"}`;
/// the actual reason is only logged.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::error::{ApiError, AuthError};
use crate::storage::Storage;

/// Header carrying the bearer token
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Guard for routes scoped to a single account
///
/// Must wrap a resource whose path has an `{id}` segment.
pub struct AccessGuard {
    tokens: TokenService,
    store: Arc<dyn Storage>,
}

impl AccessGuard {
    pub fn new(tokens: TokenService, store: Arc<dyn Storage>) -> Self {
        Self { tokens, store }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGuardService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AccessGuardService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
            store: self.store.clone(),
        }))
    }
}

pub struct AccessGuardService<S> {
    service: Rc<S>,
    tokens: TokenService,
    store: Arc<dyn Storage>,
}

/// Why a request was refused. Logged, never sent to the client.
#[derive(Debug)]
enum Denial {
    Token(AuthError),
    BadPathId,
    AccountLookup(String),
    ClaimMismatch,
}

fn permission_denied(reason: Denial, path: &str) -> Error {
    tracing::warn!(path = %path, reason = ?reason, "Access denied");
    let response = HttpResponse::Forbidden().json(ApiError::permission_denied());
    actix_web::error::InternalError::from_response("permission denied", response).into()
}

impl<S, B> Service<ServiceRequest> for AccessGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();

        let token = req
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let claims = match token {
            None => {
                let err = permission_denied(Denial::Token(AuthError::MissingToken), &path);
                return Box::pin(async move { Err(err) });
            }
            Some(token) => match self.tokens.verify_token(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    let err = permission_denied(Denial::Token(e), &path);
                    return Box::pin(async move { Err(err) });
                }
            },
        };

        let account_id = match req.match_info().get("id").map(str::parse::<i32>) {
            Some(Ok(id)) => id,
            _ => {
                let err = permission_denied(Denial::BadPathId, &path);
                return Box::pin(async move { Err(err) });
            }
        };

        let store = self.store.clone();
        let service = self.service.clone();

        Box::pin(async move {
            let account = store
                .get_account_by_id(account_id)
                .await
                .map_err(|e| permission_denied(Denial::AccountLookup(e.to_string()), &path))?;

            if account.number != claims.account_number {
                return Err(permission_denied(Denial::ClaimMismatch, &path));
            }

            tracing::debug!(
                account_id = account_id,
                account_number = claims.account_number,
                "Access granted"
            );

            service.call(req).await
        })
    }
}
