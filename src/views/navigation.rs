use serde::Serialize;

use crate::auth::capability::{Action, Capabilities};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub path: &'static str,
    pub label: &'static str,
    #[serde(skip)]
    pub action: Action,
}

const MENU: [MenuItem; 8] = [
    item("/dashboard", "Dashboard", Action::ViewDashboard),
    item("/employees", "Employees", Action::ViewEmployees),
    item("/add-employee", "Add Employee", Action::RegisterEmployee),
    item("/attendance", "Attendance", Action::ViewAttendance),
    item("/leaves", "Leave Requests", Action::ViewLeaves),
    item("/leave-approvals", "Leave Approvals", Action::ReviewLeaves),
    item("/holidays", "Holidays", Action::ViewHolidays),
    item("/settings", "Settings", Action::ViewSettings),
];

const fn item(path: &'static str, label: &'static str, action: Action) -> MenuItem {
    MenuItem {
        path,
        label,
        action,
    }
}

/// Menu entries the user may open, in display order
pub fn menu(caps: &Capabilities<'_>) -> Vec<MenuItem> {
    MENU.into_iter().filter(|i| caps.allows(i.action)).collect()
}
