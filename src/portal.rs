//! The per-user portal.
//!
//! A `Portal` owns the session and, while someone is signed in, the entity
//! store for that user. The store is built and loaded on login (or when a
//! persisted session is activated) and dropped on logout, so no data
//! outlives the identity it was loaded for.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, instrument, warn};

use crate::api::{Gateway, HttpGateway};
use crate::auth::capability::{Action, Capabilities};
use crate::auth::session::Session;
use crate::auth::storage::SessionStorage;
use crate::config::Config;
use crate::error::{HrmError, HrmResult};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::{Employee, NewEmployee, find_manager_cycle};
use crate::model::holiday::{Holiday, HolidayDraft};
use crate::model::id::RecordId;
use crate::model::leave_request::{LeaveDraft, LeaveRequest, LeaveType};
use crate::model::role::Role;
use crate::store::EntityStore;
use crate::utils::dates;
use crate::views::approvals::{self, ApprovalQueue, Decision, StatusFilter};
use crate::views::dashboard::{self, Dashboard};
use crate::views::holidays::{self as holiday_view, HolidayFilter};
use crate::views::navigation::{self, MenuItem};
use crate::views::{attendance, clock, employees, leaves};

/// Source of the current local date and time
pub type Clock = fn() -> NaiveDateTime;

pub struct Portal {
    session: Session,
    store: Option<EntityStore>,
    clock: Clock,
}

impl Portal {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            store: None,
            clock: dates::now,
        }
    }

    pub fn from_config(config: &Config) -> HrmResult<Self> {
        let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(config.api_base.as_str())?);
        let storage = SessionStorage::new(&config.session_file);
        let session = Session::restore(gateway, storage, config.default_password.as_str());
        Ok(Self::new(session))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)().date()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&Employee> {
        self.session.user()
    }

    pub fn store(&self) -> HrmResult<&EntityStore> {
        self.store.as_ref().ok_or(HrmError::StoreNotLoaded)
    }

    /// Loads the store for a restored session. A no-op once loaded.
    #[instrument(skip(self))]
    pub async fn activate(&mut self) -> HrmResult<()> {
        if !self.session.is_authenticated() {
            return Err(HrmError::NotAuthenticated);
        }
        let store = self
            .store
            .get_or_insert_with(|| EntityStore::new(self.session.gateway()));
        if store.is_loaded() {
            return Ok(());
        }
        store.load().await
    }

    pub async fn reload(&mut self) -> HrmResult<()> {
        match self.store.as_mut() {
            Some(store) => store.reload().await,
            None => self.activate().await,
        }
    }

    /// Signs in and loads a fresh store for the new identity.
    ///
    /// A rejected login keeps the previous user and store untouched. Once the
    /// login succeeds it stays successful: a failed initial load is logged
    /// and left on the store as `LoadState::Failed` for `reload` to retry.
    pub async fn login(&mut self, email: &str, password: &str) -> HrmResult<&Employee> {
        self.session.login(email, password).await?;
        self.store = None;
        if let Err(e) = self.activate().await {
            warn!(error = %e, "signed in without data");
        }
        self.session.user().ok_or(HrmError::NotAuthenticated)
    }

    pub fn logout(&mut self) -> HrmResult<()> {
        self.store = None;
        self.session.logout()
    }

    fn context(&self) -> HrmResult<(Capabilities<'_>, &EntityStore)> {
        let user = self.session.user().ok_or(HrmError::NotAuthenticated)?;
        Ok((Capabilities::new(user), self.store()?))
    }

    fn context_mut(&mut self) -> HrmResult<(Capabilities<'_>, &mut EntityStore)> {
        let user = self.session.user().ok_or(HrmError::NotAuthenticated)?;
        let store = self.store.as_mut().ok_or(HrmError::StoreNotLoaded)?;
        Ok((Capabilities::new(user), store))
    }

    #[instrument(skip(self, reason))]
    pub async fn apply_for_leave(
        &mut self,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
    ) -> HrmResult<&LeaveRequest> {
        let today = self.today();
        let (caps, store) = self.context_mut()?;
        caps.require(Action::ApplyForLeave)?;

        let user = caps.user();
        let draft = LeaveDraft {
            employee_id: user.id.clone(),
            employee_name: user.name.clone(),
            leave_type,
            start_date,
            end_date,
            reason: reason.trim().to_string(),
            applied_date: today,
        };
        store.add_leave_request(draft).await
    }

    pub async fn approve_leave(&mut self, id: &RecordId, comments: Option<&str>) -> HrmResult<&LeaveRequest> {
        self.decide(id, Decision::Approve, comments).await
    }

    pub async fn reject_leave(&mut self, id: &RecordId, comments: Option<&str>) -> HrmResult<&LeaveRequest> {
        self.decide(id, Decision::Reject, comments).await
    }

    #[instrument(skip(self, comments))]
    async fn decide(
        &mut self,
        id: &RecordId,
        decision: Decision,
        comments: Option<&str>,
    ) -> HrmResult<&LeaveRequest> {
        let today = self.today();
        let (caps, store) = self.context_mut()?;
        let request = store
            .find_leave(id)
            .ok_or_else(|| HrmError::NotFound(format!("leave request {id}")))?;
        let patch = approvals::decide(&caps, store.employees(), request, decision, comments, today)?;

        store.update_leave_request(id, patch).await?;
        info!(%id, %decision, approver = %caps.user().id, "leave request decided");
        store
            .find_leave(id)
            .ok_or_else(|| HrmError::NotFound(format!("leave request {id}")))
    }

    /// `None` when the user already clocked in today
    #[instrument(skip(self))]
    pub async fn clock_in(&mut self) -> HrmResult<Option<&AttendanceRecord>> {
        let now = (self.clock)();
        let (caps, store) = self.context_mut()?;
        match clock::clock_in_draft(&caps, store.attendance(), now.date(), now.time())? {
            Some(draft) => store.add_attendance_record(draft).await.map(Some),
            None => {
                info!("already clocked in today");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn clock_out(&mut self) -> HrmResult<&AttendanceRecord> {
        let now = (self.clock)();
        let (caps, store) = self.context_mut()?;
        let (record, patch) = clock::clock_out_patch(&caps, store.attendance(), now.date(), now.time())?;
        let id = record.id.clone();
        store.update_attendance_record(&id, patch).await
    }

    pub async fn add_holiday(&mut self, draft: HolidayDraft) -> HrmResult<&Holiday> {
        let (caps, store) = self.context_mut()?;
        caps.require(Action::ManageHolidays)?;
        store.add_holiday(draft).await
    }

    pub async fn remove_holiday(&mut self, id: &RecordId) -> HrmResult<()> {
        let (caps, store) = self.context_mut()?;
        caps.require(Action::ManageHolidays)?;
        store.remove_holiday(id).await
    }

    /// Admin only. The new employee gets the default password; the employee
    /// list is refreshed afterwards so the directory picks them up.
    #[instrument(skip(self, profile), fields(email = %profile.email))]
    pub async fn register_employee(&mut self, profile: NewEmployee) -> HrmResult<Option<RecordId>> {
        let (caps, store) = self.context_mut()?;
        caps.require(Action::RegisterEmployee)?;

        if let Some(manager_id) = &profile.manager_id {
            match store.find_employee(manager_id) {
                Some(m) if m.role == Role::Manager => {}
                Some(_) => {
                    return Err(HrmError::validation(format!("{manager_id} is not a manager")));
                }
                None => return Err(HrmError::NotFound(format!("manager {manager_id}"))),
            }
        }

        let id = self.session.register(&profile).await?;
        let store = self.store.as_mut().ok_or(HrmError::StoreNotLoaded)?;
        store.refresh_employees().await?;
        if let Some(on_cycle) = find_manager_cycle(store.employees()) {
            warn!(employee_id = %on_cycle, "reporting lines contain a cycle");
        }
        Ok(id)
    }

    pub fn dashboard(&self) -> HrmResult<Dashboard<'_>> {
        let (caps, store) = self.context()?;
        Ok(dashboard::dashboard(&caps, &store.snapshot(), self.today()))
    }

    pub fn employees(&self) -> HrmResult<Vec<&Employee>> {
        let (caps, store) = self.context()?;
        caps.require(Action::ViewEmployees)?;
        Ok(employees::directory(&caps, store.employees()))
    }

    pub fn managers(&self) -> HrmResult<Vec<&Employee>> {
        let (_, store) = self.context()?;
        Ok(employees::managers(store.employees()))
    }

    pub fn manager_name_of(&self, employee: &Employee) -> HrmResult<Option<&str>> {
        let (_, store) = self.context()?;
        Ok(employees::manager_name_of(employee, store.employees()))
    }

    pub fn attendance_history(&self) -> HrmResult<Vec<&AttendanceRecord>> {
        let (caps, store) = self.context()?;
        Ok(attendance::history(&caps, store.employees(), store.attendance()))
    }

    pub fn today_record(&self) -> HrmResult<Option<&AttendanceRecord>> {
        let (caps, store) = self.context()?;
        Ok(attendance::today_record(&caps.user().id, store.attendance(), self.today()))
    }

    pub fn is_working(&self) -> HrmResult<bool> {
        Ok(clock::is_working(self.today_record()?))
    }

    pub fn leave_requests(&self) -> HrmResult<Vec<&LeaveRequest>> {
        let (caps, store) = self.context()?;
        Ok(leaves::visible(&caps, store.employees(), store.leave_requests()))
    }

    pub fn approvals(&self, filter: StatusFilter) -> HrmResult<ApprovalQueue<'_>> {
        let (caps, store) = self.context()?;
        approvals::queue(&caps, store.employees(), store.leave_requests(), filter)
    }

    pub fn holidays(&self, filter: HolidayFilter) -> HrmResult<Vec<&Holiday>> {
        let (_, store) = self.context()?;
        Ok(holiday_view::list(store.holidays(), filter, self.today()))
    }

    pub fn can_manage_holidays(&self) -> bool {
        self.user()
            .is_some_and(|u| holiday_view::can_manage_holidays(&Capabilities::new(u)))
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        self.user()
            .map(|u| navigation::menu(&Capabilities::new(u)))
            .unwrap_or_default()
    }
}
