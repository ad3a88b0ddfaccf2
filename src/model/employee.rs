use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::id::RecordId;
use crate::model::role::Role;
use crate::utils::loose;

/// Employee profile; also the session identity once signed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: RecordId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(deserialize_with = "loose::date")]
    pub joining_date: NaiveDate,
    /// Direct manager, if any
    #[serde(
        default,
        deserialize_with = "loose::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_id: Option<RecordId>,
}

impl Employee {
    pub fn reports_to(&self, manager: &RecordId) -> bool {
        self.manager_id.as_ref() == Some(manager)
    }

    pub fn is_manager_of(&self, other: &Employee) -> bool {
        other.reports_to(&self.id)
    }
}

/// Profile submitted on registration; the id is assigned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub department: String,
    pub position: String,
    pub joining_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<RecordId>,
}

/// Returns an employee that sits on a `managerId` cycle, if one exists.
/// Dangling manager references end a chain and are not cycles.
pub fn find_manager_cycle(employees: &[Employee]) -> Option<RecordId> {
    let managers: HashMap<&RecordId, &RecordId> = employees
        .iter()
        .filter_map(|e| e.manager_id.as_ref().map(|m| (&e.id, m)))
        .collect();

    let mut cleared: HashSet<&RecordId> = HashSet::new();
    for start in employees.iter().map(|e| &e.id) {
        let mut path: HashSet<&RecordId> = HashSet::new();
        let mut current = start;
        loop {
            if cleared.contains(current) {
                break;
            }
            if !path.insert(current) {
                return Some(current.clone());
            }
            match managers.get(current) {
                Some(&next) => current = next,
                None => break,
            }
        }
        cleared.extend(path);
    }
    None
}
