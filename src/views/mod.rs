//! Role-scoped projections over the entity store.
//!
//! Every function here is pure: it takes the current user's `Capabilities`,
//! borrowed slices from a store `Snapshot` and, where time matters, the date
//! to treat as today. Results are recomputed on every call and borrow from
//! the store, so nothing here can go stale or mutate shared state.

pub mod approvals;
pub mod attendance;
pub mod clock;
pub mod dashboard;
pub mod employees;
pub mod holidays;
pub mod leaves;
pub mod navigation;
