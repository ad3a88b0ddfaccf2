use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::auth::capability::{Action, Capabilities};
use crate::model::holiday::Holiday;

#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HolidayFilter {
    #[default]
    All,
    /// On or after today
    Upcoming,
    /// Strictly before today
    Past,
}

impl HolidayFilter {
    pub fn admits(self, holiday: &Holiday, today: NaiveDate) -> bool {
        match self {
            HolidayFilter::All => true,
            HolidayFilter::Upcoming => holiday.date >= today,
            HolidayFilter::Past => holiday.date < today,
        }
    }
}

/// Matching holidays, ascending by date
pub fn list(holidays: &[Holiday], filter: HolidayFilter, today: NaiveDate) -> Vec<&Holiday> {
    let mut matching: Vec<&Holiday> = holidays.iter().filter(|h| filter.admits(h, today)).collect();
    matching.sort_by_key(|h| h.date);
    matching
}

pub fn upcoming(holidays: &[Holiday], today: NaiveDate, limit: usize) -> Vec<&Holiday> {
    let mut next = list(holidays, HolidayFilter::Upcoming, today);
    next.truncate(limit);
    next
}

pub fn can_manage_holidays(caps: &Capabilities<'_>) -> bool {
    caps.allows(Action::ManageHolidays)
}
