pub mod client;
pub mod error;
pub mod gate;
pub mod retry;

// Re-export commonly used types
pub use client::{HttpGetter, HttpResponse, ReqwestGetter, RetryingGetter};
pub use error::{AuthorizationError, TransportError};
pub use gate::{Authorizer, DEFAULT_APPROVAL_MESSAGE, HttpAuthorizer};
pub use retry::{Backoff, RetryPolicy};
