//! Staff pages under `/admin`.
//!
//! Every handler requires a logged-in user. Analytics and driver management
//! additionally require the logist role.

pub mod analytics;
pub mod dashboard;
pub mod drivers;
pub mod orders;
