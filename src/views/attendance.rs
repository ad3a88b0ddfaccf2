use std::cmp::Reverse;

use chrono::NaiveDate;

use crate::auth::capability::{Action, Capabilities, Scope};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::model::id::RecordId;
use crate::utils::dates;

const OWN_HISTORY: usize = 7;
const TEAM_HISTORY: usize = 10;

/// Most recent visible records, newest date first. Employees get their last
/// week; managers and admins the last ten records across their reach.
pub fn history<'a>(
    caps: &Capabilities<'_>,
    employees: &[Employee],
    records: &'a [AttendanceRecord],
) -> Vec<&'a AttendanceRecord> {
    let audience = caps.audience(Action::ViewAttendance, employees);
    let limit = match audience.scope() {
        Scope::SelfOnly => OWN_HISTORY,
        _ => TEAM_HISTORY,
    };

    let mut list: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| audience.includes(&r.employee_id))
        .collect();
    list.sort_by_key(|r| Reverse(r.date));
    list.truncate(limit);
    list
}

pub fn today_record<'a>(
    employee_id: &RecordId,
    records: &'a [AttendanceRecord],
    today: NaiveDate,
) -> Option<&'a AttendanceRecord> {
    records.iter().find(|r| r.same_slot(employee_id, today))
}

pub fn in_month<'a>(
    employee_id: &'a RecordId,
    records: &'a [AttendanceRecord],
    month_of: NaiveDate,
) -> impl Iterator<Item = &'a AttendanceRecord> {
    records
        .iter()
        .filter(move |r| &r.employee_id == employee_id && dates::same_month(r.date, month_of))
}
