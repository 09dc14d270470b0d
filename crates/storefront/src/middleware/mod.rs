//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. Request ID (assign correlation ID)
//! 3. `TraceLayer` (request span carrying the request ID)
//! 4. Security headers (CSP, frame options)
//! 5. Session layer (tower-sessions, in-memory store)
//! 6. Rate limiting on `/auth/login` (governor)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, OptionalAuth, RequireAuth, clear_current_user, hx_redirect, is_htmx,
    set_current_user,
};
pub use rate_limit::auth_rate_limiter;
pub use request_id::{make_request_span, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
