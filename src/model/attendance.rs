use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{HrmError, HrmResult};
use crate::model::id::RecordId;
use crate::utils::{dates, loose};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Late,
}

/// One record per employee per calendar date.
/// Created on clock-in, completed once on clock-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub employee_id: RecordId,
    #[serde(deserialize_with = "loose::date")]
    pub date: NaiveDate,
    #[serde(
        default,
        deserialize_with = "loose::opt_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub clock_in: Option<NaiveTime>,
    #[serde(
        default,
        deserialize_with = "loose::opt_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub clock_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    #[serde(
        default,
        deserialize_with = "loose::opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub working_hours: Option<f64>,
}

impl AttendanceRecord {
    /// Clocked in and not yet clocked out
    pub fn is_open(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_none()
    }

    pub fn same_slot(&self, employee_id: &RecordId, date: NaiveDate) -> bool {
        &self.employee_id == employee_id && self.date == date
    }

    /// Full-record body for `POST /attendance.php`. A provisional id is not
    /// sent; the server keys those records by employee and date.
    pub fn upsert_payload(&self) -> AttendanceUpsert<'_> {
        AttendanceUpsert {
            id: Some(&self.id).filter(|id| !id.is_provisional()),
            employee_id: &self.employee_id,
            date: self.date,
            clock_in: self.clock_in,
            clock_out: self.clock_out,
            status: self.status,
            working_hours: self.working_hours,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpsert<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a RecordId>,
    pub employee_id: &'a RecordId,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_in: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceDraft {
    pub employee_id: RecordId,
    pub date: NaiveDate,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    pub working_hours: Option<f64>,
}

impl AttendanceDraft {
    /// The record opened by a clock-in
    pub fn clock_in(employee_id: RecordId, date: NaiveDate, at: NaiveTime) -> Self {
        AttendanceDraft {
            employee_id,
            date,
            clock_in: Some(at),
            clock_out: None,
            status: AttendanceStatus::Present,
            working_hours: None,
        }
    }

    pub fn validate(&self) -> HrmResult<()> {
        check_hours_invariant(self.clock_out, self.working_hours)
    }

    pub fn into_record(self, id: RecordId) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id: self.employee_id,
            date: self.date,
            clock_in: self.clock_in,
            clock_out: self.clock_out,
            status: self.status,
            working_hours: self.working_hours,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendancePatch {
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
    pub status: Option<AttendanceStatus>,
    pub working_hours: Option<f64>,
}

impl AttendancePatch {
    /// Clock-out patch for an open record; hours come from the wall-clock difference
    pub fn clock_out(record: &AttendanceRecord, at: NaiveTime) -> HrmResult<Self> {
        let clock_in = record
            .clock_in
            .ok_or_else(|| HrmError::validation("cannot clock out without a clock-in"))?;
        if record.clock_out.is_some() {
            return Err(HrmError::validation("already clocked out for this date"));
        }
        if at < clock_in {
            return Err(HrmError::validation(format!(
                "clock-out {at} precedes clock-in {clock_in}"
            )));
        }
        Ok(AttendancePatch {
            clock_out: Some(at),
            working_hours: Some(dates::working_hours(clock_in, at)),
            ..Default::default()
        })
    }

    /// The record as it would look after the patch
    pub fn merged(&self, current: &AttendanceRecord) -> HrmResult<AttendanceRecord> {
        let mut next = current.clone();
        if let Some(t) = self.clock_in {
            next.clock_in = Some(t);
        }
        if let Some(t) = self.clock_out {
            next.clock_out = Some(t);
        }
        if let Some(s) = self.status {
            next.status = s;
        }
        if let Some(h) = self.working_hours {
            next.working_hours = Some(h);
        }
        check_hours_invariant(next.clock_out, next.working_hours)?;
        Ok(next)
    }
}

/// workingHours is present exactly when clockOut is
fn check_hours_invariant(clock_out: Option<NaiveTime>, hours: Option<f64>) -> HrmResult<()> {
    match (clock_out, hours) {
        (Some(_), None) => Err(HrmError::validation("clock-out recorded without working hours")),
        (None, Some(_)) => Err(HrmError::validation("working hours recorded without clock-out")),
        _ => Ok(()),
    }
}
