use reqwest::Method;

use crate::model::id::RecordId;

/// Every remote endpoint the client talks to. Paths are relative to the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    ListEmployees,
    ListLeaves,
    CreateLeave,
    UpdateLeave,
    ListAttendance,
    UpsertAttendance,
    ListHolidays,
    CreateHoliday,
    RemoveHoliday(RecordId),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::ListEmployees
            | Endpoint::ListLeaves
            | Endpoint::ListAttendance
            | Endpoint::ListHolidays => Method::GET,
            Endpoint::Login
            | Endpoint::Register
            | Endpoint::CreateLeave
            | Endpoint::UpsertAttendance
            | Endpoint::CreateHoliday => Method::POST,
            Endpoint::UpdateLeave => Method::PATCH,
            Endpoint::RemoveHoliday(_) => Method::DELETE,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/auth.php?action=login".to_string(),
            Endpoint::Register => "/auth.php?action=register".to_string(),
            Endpoint::ListEmployees => "/employees.php".to_string(),
            Endpoint::ListLeaves | Endpoint::CreateLeave | Endpoint::UpdateLeave => {
                "/leaves.php".to_string()
            }
            Endpoint::ListAttendance | Endpoint::UpsertAttendance => "/attendance.php".to_string(),
            Endpoint::ListHolidays | Endpoint::CreateHoliday => "/holidays.php".to_string(),
            Endpoint::RemoveHoliday(id) => format!("/holidays.php?id={id}"),
        }
    }

    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_cleanly() {
        assert_eq!(
            Endpoint::Login.url("https://hr.example.com/api/"),
            "https://hr.example.com/api/auth.php?action=login"
        );
        assert_eq!(
            Endpoint::RemoveHoliday(RecordId::from("12")).url("http://h/api"),
            "http://h/api/holidays.php?id=12"
        );
    }

    #[test]
    fn verbs() {
        assert_eq!(Endpoint::UpdateLeave.method(), Method::PATCH);
        assert_eq!(Endpoint::UpsertAttendance.method(), Method::POST);
        assert_eq!(Endpoint::ListHolidays.method(), Method::GET);
        assert_eq!(Endpoint::RemoveHoliday("1".into()).method(), Method::DELETE);
    }
}
