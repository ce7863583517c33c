//! Usage analytics: an append-only activity log in the admin database.

pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use store::ActivityLog;
pub use types::{Activity, ActivityDashboard, ActivityKind, DailyCount, TypeCount};
