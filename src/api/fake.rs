//! In-memory `Gateway` used by unit tests

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;

use super::Gateway;
use crate::error::{HrmError, HrmResult};
use crate::model::attendance::{AttendanceRecord, AttendanceUpsert};
use crate::model::employee::{Employee, NewEmployee};
use crate::model::holiday::{Holiday, HolidayDraft};
use crate::model::id::RecordId;
use crate::model::leave_request::{LeaveDraft, LeavePatch, LeaveRequest};

#[derive(Default)]
pub struct FakeState {
    pub employees: Vec<Employee>,
    pub leaves: Vec<LeaveRequest>,
    pub attendance: Vec<AttendanceRecord>,
    pub holidays: Vec<Holiday>,
    /// (email, password) pairs accepted by `login`
    pub credentials: Vec<(String, String)>,
    /// Every call fails with this status while set
    pub reject_with: Option<StatusCode>,
    /// Calls that fail with 503 while the rest succeed
    pub broken: Vec<&'static str>,
    /// Whether attendance upserts answer with the stored id
    pub upsert_returns_id: bool,
    pub calls: Vec<&'static str>,
    pub id_seq: u64,
}

impl FakeState {
    fn next_id(&mut self) -> RecordId {
        self.id_seq += 1;
        RecordId::from(100 + self.id_seq)
    }
}

#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

impl FakeGateway {
    pub fn with_state(state: FakeState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn enter(&self, call: &'static str) -> HrmResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(call);
        let rejected = state.reject_with.or_else(|| {
            state
                .broken
                .contains(&call)
                .then_some(StatusCode::SERVICE_UNAVAILABLE)
        });
        match rejected {
            Some(status) => Err(HrmError::RequestFailed {
                status,
                body: format!("{call} refused"),
            }),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn login(&self, email: &str, password: &str) -> HrmResult<Employee> {
        let state = self.enter("login")?;
        let known = state
            .credentials
            .iter()
            .any(|(e, p)| e == email && p == password);
        state
            .employees
            .iter()
            .find(|e| known && e.email == email)
            .cloned()
            .ok_or(HrmError::RequestFailed {
                status: StatusCode::UNAUTHORIZED,
                body: "Invalid credentials".into(),
            })
    }

    async fn register(&self, profile: &NewEmployee, password: &str) -> HrmResult<Option<RecordId>> {
        let mut state = self.enter("register")?;
        if state.employees.iter().any(|e| e.email == profile.email) {
            return Err(HrmError::RequestFailed {
                status: StatusCode::CONFLICT,
                body: "Email already exists".into(),
            });
        }
        let id = state.next_id();
        state.employees.push(Employee {
            id: id.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
            department: profile.department.clone(),
            position: profile.position.clone(),
            joining_date: profile.joining_date,
            manager_id: profile.manager_id.clone(),
        });
        state
            .credentials
            .push((profile.email.clone(), password.to_string()));
        Ok(Some(id))
    }

    async fn list_employees(&self) -> HrmResult<Vec<Employee>> {
        Ok(self.enter("list_employees")?.employees.clone())
    }

    async fn list_leaves(&self) -> HrmResult<Vec<LeaveRequest>> {
        Ok(self.enter("list_leaves")?.leaves.clone())
    }

    async fn create_leave(&self, draft: &LeaveDraft) -> HrmResult<RecordId> {
        let mut state = self.enter("create_leave")?;
        let id = state.next_id();
        state.leaves.push(draft.clone().into_request(id.clone()));
        Ok(id)
    }

    async fn update_leave(&self, id: &RecordId, patch: &LeavePatch) -> HrmResult<()> {
        let mut state = self.enter("update_leave")?;
        let leave = state
            .leaves
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| HrmError::RequestFailed {
                status: StatusCode::NOT_FOUND,
                body: "Leave request not found".into(),
            })?;
        patch.apply(leave);
        Ok(())
    }

    async fn list_attendance(&self) -> HrmResult<Vec<AttendanceRecord>> {
        Ok(self.enter("list_attendance")?.attendance.clone())
    }

    async fn upsert_attendance(&self, record: &AttendanceUpsert<'_>) -> HrmResult<Option<RecordId>> {
        let mut state = self.enter("upsert_attendance")?;
        let slot = state.attendance.iter().position(|r| match record.id {
            Some(id) => &r.id == id,
            None => r.same_slot(record.employee_id, record.date),
        });
        let id = match slot {
            Some(i) => state.attendance[i].id.clone(),
            None => state.next_id(),
        };
        let stored = AttendanceRecord {
            id: id.clone(),
            employee_id: record.employee_id.clone(),
            date: record.date,
            clock_in: record.clock_in,
            clock_out: record.clock_out,
            status: record.status,
            working_hours: record.working_hours,
        };
        match slot {
            Some(i) => state.attendance[i] = stored,
            None => state.attendance.push(stored),
        }
        Ok(state.upsert_returns_id.then_some(id))
    }

    async fn list_holidays(&self) -> HrmResult<Vec<Holiday>> {
        Ok(self.enter("list_holidays")?.holidays.clone())
    }

    async fn create_holiday(&self, draft: &HolidayDraft) -> HrmResult<RecordId> {
        let mut state = self.enter("create_holiday")?;
        let id = state.next_id();
        state.holidays.push(draft.clone().into_holiday(id.clone()));
        Ok(id)
    }

    async fn remove_holiday(&self, id: &RecordId) -> HrmResult<()> {
        let mut state = self.enter("remove_holiday")?;
        state.holidays.retain(|h| &h.id != id);
        Ok(())
    }
}
