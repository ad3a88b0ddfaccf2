//! Clock-in/clock-out for the current user.

use chrono::{NaiveDate, NaiveTime};

use crate::auth::capability::{Action, Capabilities};
use crate::error::{HrmError, HrmResult};
use crate::model::attendance::{AttendanceDraft, AttendancePatch, AttendanceRecord};
use crate::views::attendance::today_record;

/// Clocked in today and not yet out
pub fn is_working(today: Option<&AttendanceRecord>) -> bool {
    today.is_some_and(AttendanceRecord::is_open)
}

pub fn can_clock_in(today: Option<&AttendanceRecord>) -> bool {
    today.is_none_or(|r| r.clock_in.is_none())
}

pub fn can_clock_out(today: Option<&AttendanceRecord>) -> bool {
    is_working(today)
}

/// The record a clock-in would create, or `None` when the user already
/// clocked in today.
pub fn clock_in_draft(
    caps: &Capabilities<'_>,
    records: &[AttendanceRecord],
    today: NaiveDate,
    at: NaiveTime,
) -> HrmResult<Option<AttendanceDraft>> {
    caps.require(Action::RecordAttendance)?;
    let me = &caps.user().id;
    if !can_clock_in(today_record(me, records, today)) {
        return Ok(None);
    }
    Ok(Some(AttendanceDraft::clock_in(me.clone(), today, at)))
}

/// Today's open record and the patch that closes it
pub fn clock_out_patch<'a>(
    caps: &Capabilities<'_>,
    records: &'a [AttendanceRecord],
    today: NaiveDate,
    at: NaiveTime,
) -> HrmResult<(&'a AttendanceRecord, AttendancePatch)> {
    caps.require(Action::RecordAttendance)?;
    let record = today_record(&caps.user().id, records, today)
        .ok_or_else(|| HrmError::validation("not clocked in today"))?;
    let patch = AttendancePatch::clock_out(record, at)?;
    Ok((record, patch))
}

pub fn working_hours(record: &AttendanceRecord) -> Option<f64> {
    record.working_hours
}
