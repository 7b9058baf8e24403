//! Domain models for the order desk.
//!
//! Row types that map one-to-one onto tables derive `sqlx::FromRow`
//! directly; users go through a private row type in `db::users` because the
//! stored email is re-validated on the way out.

pub mod driver;
pub mod order;
pub mod report;
pub mod session;
pub mod user;

pub use driver::{Driver, NewDriver};
pub use order::{NewOrder, Order, OrderChanges, OrderFilter, OrderUpdate};
pub use report::{
    AnalyticsData, AnalyticsReport, DailyStat, DashboardSummary, DriverStat, RevenueSummary,
    ShippingStat, StatusCount,
};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
