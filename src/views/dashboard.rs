//! Role-shaped dashboard.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::Serialize;

use crate::auth::capability::{Action, Capabilities, Scope};
use crate::model::attendance::AttendanceStatus;
use crate::model::holiday::Holiday;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::store::Snapshot;
use crate::views::{attendance, holidays, leaves};

pub const UPCOMING_HOLIDAYS: usize = 3;
pub const RECENT_LEAVES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view")]
pub enum DashboardStats {
    #[serde(rename = "admin", rename_all = "camelCase")]
    Organisation {
        total_employees: usize,
        pending_leaves: usize,
        present_today: usize,
        upcoming_holidays: usize,
    },
    #[serde(rename = "manager", rename_all = "camelCase")]
    Team {
        team_size: usize,
        pending_approvals: usize,
        team_present_today: usize,
        upcoming_holidays: usize,
    },
    #[serde(rename = "employee", rename_all = "camelCase")]
    Personal {
        total_leaves: usize,
        pending_leaves: usize,
        monthly_attendance: usize,
        upcoming_holidays: usize,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub stats: DashboardStats,
    pub recent_leaves: Vec<&'a LeaveRequest>,
    pub upcoming_holidays: Vec<&'a Holiday>,
}

pub fn stats(caps: &Capabilities<'_>, data: &Snapshot<'_>, today: NaiveDate) -> DashboardStats {
    let audience = caps.audience(Action::ViewDashboard, data.employees);
    let upcoming_holidays = holidays::upcoming(data.holidays, today, UPCOMING_HOLIDAYS).len();

    let reached_leaves = data
        .leave_requests
        .iter()
        .filter(|r| audience.includes(&r.employee_id));
    let pending = leaves::count_with_status(reached_leaves.clone(), LeaveStatus::Pending);
    let present_today = data
        .attendance
        .iter()
        .filter(|r| {
            r.date == today
                && r.status == AttendanceStatus::Present
                && audience.includes(&r.employee_id)
        })
        .count();

    match audience.scope() {
        Scope::SelfOnly => DashboardStats::Personal {
            total_leaves: reached_leaves.count(),
            pending_leaves: pending,
            monthly_attendance: attendance::in_month(&caps.user().id, data.attendance, today)
                .count(),
            upcoming_holidays,
        },
        Scope::Team | Scope::TeamAndSelf => DashboardStats::Team {
            team_size: audience.team_size(),
            pending_approvals: pending,
            team_present_today: present_today,
            upcoming_holidays,
        },
        Scope::Everyone | Scope::Nobody => DashboardStats::Organisation {
            total_employees: data.employees.len(),
            pending_leaves: pending,
            present_today,
            upcoming_holidays,
        },
    }
}

pub fn recent_leaves<'a>(caps: &Capabilities<'_>, data: &Snapshot<'a>) -> Vec<&'a LeaveRequest> {
    let audience = caps.audience(Action::ViewDashboard, data.employees);
    let mut list: Vec<&LeaveRequest> = data
        .leave_requests
        .iter()
        .filter(|r| audience.includes(&r.employee_id))
        .collect();
    list.sort_by_key(|r| Reverse(r.applied_date));
    list.truncate(RECENT_LEAVES);
    list
}

pub fn dashboard<'a>(caps: &Capabilities<'_>, data: &Snapshot<'a>, today: NaiveDate) -> Dashboard<'a> {
    Dashboard {
        stats: stats(caps, data, today),
        recent_leaves: recent_leaves(caps, data),
        upcoming_holidays: holidays::upcoming(data.holidays, today, UPCOMING_HOLIDAYS),
    }
}
