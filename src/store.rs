//! Shared entity store.
//!
//! Owns the client-side copies of the four collections. Every mutation is
//! write-through-then-merge: the gateway call goes first and the local
//! collection changes only after it succeeds. A failed call leaves local
//! state untouched and hands the error back to the caller.
//!
//! Collections are only ever handed out as shared slices, and mutators take
//! `&mut self`, so two mutations against the same store cannot interleave.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::api::Gateway;
use crate::error::{HrmError, HrmResult};
use crate::model::attendance::{AttendanceDraft, AttendancePatch, AttendanceRecord};
use crate::model::employee::Employee;
use crate::model::holiday::{Holiday, HolidayDraft};
use crate::model::id::RecordId;
use crate::model::leave_request::{LeaveDraft, LeavePatch, LeaveRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
    /// The initial load failed; collections are empty, which is not the same as "no data"
    Failed(String),
}

/// Read-only view over all four collections at one instant
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub employees: &'a [Employee],
    pub leave_requests: &'a [LeaveRequest],
    pub attendance: &'a [AttendanceRecord],
    pub holidays: &'a [Holiday],
}

pub struct EntityStore {
    gateway: Arc<dyn Gateway>,
    state: LoadState,
    employees: Vec<Employee>,
    leave_requests: Vec<LeaveRequest>,
    attendance: Vec<AttendanceRecord>,
    holidays: Vec<Holiday>,
}

impl EntityStore {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            state: LoadState::NotLoaded,
            employees: Vec::new(),
            leave_requests: Vec::new(),
            attendance: Vec::new(),
            holidays: Vec::new(),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Fetches all four collections concurrently. On any failure every
    /// collection is left empty and the store reports `Failed`.
    #[instrument(name = "store_load", skip(self))]
    pub async fn load(&mut self) -> HrmResult<()> {
        let gw = &self.gateway;
        let fetched = futures::try_join!(
            gw.list_employees(),
            gw.list_leaves(),
            gw.list_attendance(),
            gw.list_holidays(),
        );

        match fetched {
            Ok((employees, leave_requests, attendance, holidays)) => {
                info!(
                    employees = employees.len(),
                    leave_requests = leave_requests.len(),
                    attendance = attendance.len(),
                    holidays = holidays.len(),
                    "store loaded"
                );
                self.employees = employees;
                self.leave_requests = leave_requests;
                self.attendance = attendance;
                self.holidays = holidays;
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "store load failed");
                self.employees.clear();
                self.leave_requests.clear();
                self.attendance.clear();
                self.holidays.clear();
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-fetches everything, replacing whatever is held now
    pub async fn reload(&mut self) -> HrmResult<()> {
        self.load().await
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn leave_requests(&self) -> &[LeaveRequest] {
        &self.leave_requests
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            employees: &self.employees,
            leave_requests: &self.leave_requests,
            attendance: &self.attendance,
            holidays: &self.holidays,
        }
    }

    pub fn find_employee(&self, id: &RecordId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }

    pub fn find_leave(&self, id: &RecordId) -> Option<&LeaveRequest> {
        self.leave_requests.iter().find(|l| &l.id == id)
    }

    pub fn find_attendance(&self, id: &RecordId) -> Option<&AttendanceRecord> {
        self.attendance.iter().find(|r| &r.id == id)
    }

    /// Files a request; the local copy is prepended as pending under the server's id
    #[instrument(skip(self, draft), fields(employee_id = %draft.employee_id))]
    pub async fn add_leave_request(&mut self, draft: LeaveDraft) -> HrmResult<&LeaveRequest> {
        draft.validate()?;
        let id = self.gateway.create_leave(&draft).await?;
        debug!(%id, "leave request created");

        self.leave_requests.insert(0, draft.into_request(id));
        Ok(&self.leave_requests[0])
    }

    /// Shallow-merges `patch` into the request once the server accepted it
    #[instrument(skip(self, patch))]
    pub async fn update_leave_request(&mut self, id: &RecordId, patch: LeavePatch) -> HrmResult<()> {
        let index = self
            .leave_requests
            .iter()
            .position(|l| &l.id == id)
            .ok_or_else(|| HrmError::NotFound(format!("leave request {id}")))?;
        patch.validate_against(&self.leave_requests[index])?;

        self.gateway.update_leave(id, &patch).await?;
        patch.apply(&mut self.leave_requests[index]);
        debug!(status = ?patch.status, "leave request updated");
        Ok(())
    }

    /// Upserts a record for (employee, date). A local record for the same
    /// slot is replaced; otherwise the new one is prepended. The server's id
    /// is adopted when it reports one, else the record keeps a provisional id.
    #[instrument(skip(self, draft), fields(employee_id = %draft.employee_id, date = %draft.date))]
    pub async fn add_attendance_record(&mut self, draft: AttendanceDraft) -> HrmResult<&AttendanceRecord> {
        draft.validate()?;
        let existing = self
            .attendance
            .iter()
            .position(|r| r.same_slot(&draft.employee_id, draft.date));

        let mut record = draft.into_record(RecordId::provisional());
        let server_id = self.gateway.upsert_attendance(&record.upsert_payload()).await?;

        let known_id = existing
            .map(|i| self.attendance[i].id.clone())
            .filter(|id| !id.is_provisional());
        if let Some(id) = server_id.or(known_id) {
            record.id = id;
        }
        debug!(id = %record.id, provisional = record.id.is_provisional(), "attendance upserted");

        let index = match existing {
            Some(i) => {
                self.attendance[i] = record;
                i
            }
            None => {
                self.attendance.insert(0, record);
                0
            }
        };
        Ok(&self.attendance[index])
    }

    /// Re-sends the full merged record, then applies the patch locally
    #[instrument(skip(self, patch))]
    pub async fn update_attendance_record(
        &mut self,
        id: &RecordId,
        patch: AttendancePatch,
    ) -> HrmResult<&AttendanceRecord> {
        let index = self
            .attendance
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| HrmError::NotFound(format!("attendance record {id}")))?;
        let mut merged = patch.merged(&self.attendance[index])?;

        let server_id = self.gateway.upsert_attendance(&merged.upsert_payload()).await?;
        if let Some(server_id) = server_id.filter(|_| merged.id.is_provisional()) {
            debug!(from = %merged.id, to = %server_id, "adopting server id");
            merged.id = server_id;
        }

        self.attendance[index] = merged;
        Ok(&self.attendance[index])
    }

    #[instrument(skip(self, draft), fields(name = %draft.name, date = %draft.date))]
    pub async fn add_holiday(&mut self, draft: HolidayDraft) -> HrmResult<&Holiday> {
        draft.validate()?;
        let id = self.gateway.create_holiday(&draft).await?;
        self.holidays.push(draft.into_holiday(id));
        Ok(&self.holidays[self.holidays.len() - 1])
    }

    #[instrument(skip(self))]
    pub async fn remove_holiday(&mut self, id: &RecordId) -> HrmResult<()> {
        self.gateway.remove_holiday(id).await?;
        self.holidays.retain(|h| &h.id != id);
        Ok(())
    }

    /// Replaces the employee collection wholesale
    #[instrument(skip(self))]
    pub async fn refresh_employees(&mut self) -> HrmResult<()> {
        let employees = self.gateway.list_employees().await?;
        debug!(count = employees.len(), "employees refreshed");
        self.employees = employees;
        Ok(())
    }
}
