use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{HrmError, HrmResult};
use crate::model::id::RecordId;
use crate::utils::{dates, loose};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Maternity,
    Emergency,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    /// Only pending requests move, and only to a terminal state
    pub fn can_transition_to(self, to: LeaveStatus) -> bool {
        self == LeaveStatus::Pending && to.is_terminal()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: RecordId,
    pub employee_id: RecordId,
    /// Snapshot taken when the request was filed; never re-synced
    #[serde(default)]
    pub employee_name: String,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[serde(deserialize_with = "loose::date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "loose::date")]
    pub end_date: NaiveDate,
    #[serde(deserialize_with = "loose::count")]
    pub days: i64,
    #[serde(default)]
    pub reason: String,
    pub status: LeaveStatus,
    #[serde(deserialize_with = "loose::date")]
    pub applied_date: NaiveDate,
    #[serde(
        default,
        deserialize_with = "loose::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub approved_by: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose::opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub approved_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "loose::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub comments: Option<String>,
}

/// A leave request as filed by an employee, before the server names it
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveDraft {
    pub employee_id: RecordId,
    pub employee_name: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub applied_date: NaiveDate,
}

/// Wire body for `POST /leaves.php`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest<'a> {
    pub employee_id: &'a RecordId,
    pub employee_name: &'a str,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub reason: &'a str,
    pub applied_date: NaiveDate,
}

impl LeaveDraft {
    pub fn days(&self) -> i64 {
        dates::inclusive_days(self.start_date, self.end_date)
    }

    pub fn validate(&self) -> HrmResult<()> {
        if self.days() <= 0 {
            return Err(HrmError::validation(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.reason.trim().is_empty() {
            return Err(HrmError::validation("a reason is required"));
        }
        Ok(())
    }

    pub fn payload(&self) -> NewLeaveRequest<'_> {
        NewLeaveRequest {
            employee_id: &self.employee_id,
            employee_name: &self.employee_name,
            leave_type: self.leave_type,
            start_date: self.start_date,
            end_date: self.end_date,
            days: self.days(),
            reason: &self.reason,
            applied_date: self.applied_date,
        }
    }

    /// The local copy of a freshly created request
    pub fn into_request(self, id: RecordId) -> LeaveRequest {
        let days = self.days();
        LeaveRequest {
            id,
            employee_id: self.employee_id,
            employee_name: self.employee_name,
            leave_type: self.leave_type,
            start_date: self.start_date,
            end_date: self.end_date,
            days,
            reason: self.reason,
            status: LeaveStatus::Pending,
            applied_date: self.applied_date,
            approved_by: None,
            approved_date: None,
            comments: None,
        }
    }
}

/// Partial update for a leave request; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeavePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeaveStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl LeavePatch {
    /// Approve/reject patch. Blank comments are dropped.
    pub fn decision(
        status: LeaveStatus,
        approver: impl Into<String>,
        on: NaiveDate,
        comments: Option<&str>,
    ) -> Self {
        LeavePatch {
            status: Some(status),
            approved_by: Some(approver.into()),
            approved_date: Some(on),
            comments: comments
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &LeavePatch::default()
    }

    fn touches_approval(&self) -> bool {
        self.approved_by.is_some() || self.approved_date.is_some() || self.comments.is_some()
    }

    /// Checks the patch against the current record before it is sent anywhere
    pub fn validate_against(&self, current: &LeaveRequest) -> HrmResult<()> {
        if self.is_empty() {
            return Err(HrmError::validation("nothing to update"));
        }
        match self.status {
            Some(to) => {
                if !current.status.can_transition_to(to) {
                    return Err(HrmError::InvalidTransition {
                        from: current.status,
                        to,
                    });
                }
                if self.approved_by.is_none() || self.approved_date.is_none() {
                    return Err(HrmError::validation(
                        "a decision needs the approver and the decision date",
                    ));
                }
            }
            None if self.touches_approval() => {
                return Err(HrmError::validation(
                    "approval details can only be set together with a decision",
                ));
            }
            None => {}
        }
        Ok(())
    }

    /// Shallow merge into `record`
    pub fn apply(&self, record: &mut LeaveRequest) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(by) = &self.approved_by {
            record.approved_by = Some(by.clone());
        }
        if let Some(on) = self.approved_date {
            record.approved_date = Some(on);
        }
        if let Some(comments) = &self.comments {
            record.comments = Some(comments.clone());
        }
    }
}
