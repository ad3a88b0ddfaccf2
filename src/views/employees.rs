use crate::auth::capability::{Action, Capabilities};
use crate::model::employee::Employee;
use crate::model::role::Role;

/// Admins see everyone; anyone else sees themselves and their direct reports
pub fn directory<'a>(caps: &Capabilities<'_>, employees: &'a [Employee]) -> Vec<&'a Employee> {
    let audience = caps.audience(Action::ViewEmployees, employees);
    employees.iter().filter(|e| audience.includes(&e.id)).collect()
}

/// Name of `employee`'s manager, if the reference resolves
pub fn manager_name_of<'a>(employee: &Employee, employees: &'a [Employee]) -> Option<&'a str> {
    let manager_id = employee.manager_id.as_ref()?;
    employees
        .iter()
        .find(|e| &e.id == manager_id)
        .map(|e| e.name.as_str())
}

/// Candidates for a new employee's reporting manager
pub fn managers(employees: &[Employee]) -> Vec<&Employee> {
    employees.iter().filter(|e| e.role == Role::Manager).collect()
}
