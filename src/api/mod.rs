//! Remote access gateway.
//!
//! One call per (entity, verb) pair. A call either returns the decoded answer
//! or fails with the transport error or the server's non-2xx body. Nothing
//! here retries, times out, or touches local state.

#[cfg(test)]
pub(crate) mod fake;
mod http;

use async_trait::async_trait;

use crate::error::HrmResult;
use crate::model::attendance::{AttendanceRecord, AttendanceUpsert};
use crate::model::employee::{Employee, NewEmployee};
use crate::model::holiday::{Holiday, HolidayDraft};
use crate::model::id::RecordId;
use crate::model::leave_request::{LeaveDraft, LeavePatch, LeaveRequest};

pub use http::HttpGateway;

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Returns the authenticated profile
    async fn login(&self, email: &str, password: &str) -> HrmResult<Employee>;

    /// Creates an employee; returns the new id when the server reports one
    async fn register(&self, profile: &NewEmployee, password: &str)
    -> HrmResult<Option<RecordId>>;

    async fn list_employees(&self) -> HrmResult<Vec<Employee>>;

    async fn list_leaves(&self) -> HrmResult<Vec<LeaveRequest>>;

    async fn create_leave(&self, draft: &LeaveDraft) -> HrmResult<RecordId>;

    async fn update_leave(&self, id: &RecordId, patch: &LeavePatch) -> HrmResult<()>;

    async fn list_attendance(&self) -> HrmResult<Vec<AttendanceRecord>>;

    /// Insert-or-replace; returns the server id when the server reports one
    async fn upsert_attendance(&self, record: &AttendanceUpsert<'_>)
    -> HrmResult<Option<RecordId>>;

    async fn list_holidays(&self) -> HrmResult<Vec<Holiday>>;

    async fn create_holiday(&self, draft: &HolidayDraft) -> HrmResult<RecordId>;

    async fn remove_holiday(&self, id: &RecordId) -> HrmResult<()>;
}
