//! Leave approval queue and the approve/reject decision.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::auth::capability::{Action, Capabilities};
use crate::error::{HrmError, HrmResult};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeavePatch, LeaveRequest, LeaveStatus};

#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusFilter {
    All,
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub fn admits(self, status: LeaveStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == LeaveStatus::Pending,
            StatusFilter::Approved => status == LeaveStatus::Approved,
            StatusFilter::Rejected => status == LeaveStatus::Rejected,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalQueue<'a> {
    pub filter: StatusFilter,
    pub requests: Vec<&'a LeaveRequest>,
    /// Counts over the whole reviewable set, independent of `filter`
    pub counts: StatusCounts,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn status(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

/// Requests the user may review, newest application first.
/// Employees are refused outright.
pub fn queue<'a>(
    caps: &Capabilities<'_>,
    employees: &[Employee],
    requests: &'a [LeaveRequest],
    filter: StatusFilter,
) -> HrmResult<ApprovalQueue<'a>> {
    caps.require(Action::ReviewLeaves)?;
    let audience = caps.audience(Action::ReviewLeaves, employees);

    let mut counts = StatusCounts::default();
    let mut matching = Vec::new();
    for request in requests.iter().filter(|r| audience.includes(&r.employee_id)) {
        counts.all += 1;
        match request.status {
            LeaveStatus::Pending => counts.pending += 1,
            LeaveStatus::Approved => counts.approved += 1,
            LeaveStatus::Rejected => counts.rejected += 1,
        }
        if filter.admits(request.status) {
            matching.push(request);
        }
    }
    matching.sort_by_key(|r| Reverse(r.applied_date));

    Ok(ApprovalQueue {
        filter,
        requests: matching,
        counts,
    })
}

/// Builds the patch for an approve/reject by the current user. The approver
/// is recorded by name; a blank comment is left out.
pub fn decide(
    caps: &Capabilities<'_>,
    employees: &[Employee],
    request: &LeaveRequest,
    decision: Decision,
    comments: Option<&str>,
    today: NaiveDate,
) -> HrmResult<LeavePatch> {
    caps.require(Action::ReviewLeaves)?;
    if !caps
        .audience(Action::ReviewLeaves, employees)
        .includes(&request.employee_id)
    {
        return Err(HrmError::AccessDenied(
            "managers can only review their own team's requests",
        ));
    }
    let status = decision.status();
    if !request.status.can_transition_to(status) {
        return Err(HrmError::InvalidTransition {
            from: request.status,
            to: status,
        });
    }
    Ok(LeavePatch::decision(status, &caps.user().name, today, comments))
}
