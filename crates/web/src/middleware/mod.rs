//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers (CSP, frame and sniffing protection)
//! 4. Session layer (tower-sessions with `PostgreSQL` store, signed cookie)
//!
//! Authentication is enforced per handler through the extractors in [`auth`].

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAuth, RequireLogist, clear_current_user, is_safe_next, login_redirect,
    set_current_user,
};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
