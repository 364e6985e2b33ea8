/// Authentication module
///
/// Handles account token issuance/verification and password hashing.

mod claims;
mod jwt;
mod password;

pub use claims::Claims;
pub use jwt::TokenService;
pub use password::CredentialManager;
pub use password::MAX_PASSWORD_BYTES;
