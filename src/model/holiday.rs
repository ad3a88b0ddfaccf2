use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{HrmError, HrmResult};
use crate::model::id::RecordId;
use crate::utils::loose;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HolidayType {
    Public,
    Company,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: RecordId,
    pub name: String,
    #[serde(deserialize_with = "loose::date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
    #[serde(
        default,
        deserialize_with = "loose::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// Body for `POST /holidays.php`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolidayDraft {
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub holiday_type: HolidayType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl HolidayDraft {
    pub fn validate(&self) -> HrmResult<()> {
        if self.name.trim().is_empty() {
            return Err(HrmError::validation("holiday name is required"));
        }
        Ok(())
    }

    pub fn into_holiday(self, id: RecordId) -> Holiday {
        Holiday {
            id,
            name: self.name,
            date: self.date,
            holiday_type: self.holiday_type,
            description: self.description.filter(|d| !d.trim().is_empty()),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn holiday(id: &str, date: NaiveDate) -> Holiday {
        Holiday {
            id: RecordId::from(id),
            name: format!("holiday-{id}"),
            date,
            holiday_type: HolidayType::Public,
            description: None,
        }
    }
}
