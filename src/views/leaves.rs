use std::cmp::Reverse;

use crate::auth::capability::{Action, Capabilities};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};

/// Requests the user may see, newest application first
pub fn visible<'a>(
    caps: &Capabilities<'_>,
    employees: &[Employee],
    requests: &'a [LeaveRequest],
) -> Vec<&'a LeaveRequest> {
    let audience = caps.audience(Action::ViewLeaves, employees);
    let mut list: Vec<&LeaveRequest> = requests
        .iter()
        .filter(|r| audience.includes(&r.employee_id))
        .collect();
    list.sort_by_key(|r| Reverse(r.applied_date));
    list
}

pub fn count_with_status<'a>(
    requests: impl IntoIterator<Item = &'a LeaveRequest>,
    status: LeaveStatus,
) -> usize {
    requests.into_iter().filter(|r| r.status == status).count()
}
