mod accounts;
mod auth;
mod health_check;
mod transfer;

pub use accounts::{
    create_account, delete_account, get_account, list_accounts, CreateAccountRequest,
    DeleteAccountResponse,
};
pub use auth::{login, LoginRequest, LoginResponse};
pub use health_check::health_check;
pub use transfer::{transfer, TransferRequest};
