/// Middleware module
///
/// Custom middleware for authorization and request logging.

mod access_guard;
mod request_logger;

pub use access_guard::{AccessGuard, TOKEN_HEADER};
pub use request_logger::RequestLogger;
