//! The one place role rules live.
//!
//! Views and portal actions ask `Capabilities` two kinds of question: may the
//! current user perform an action at all (`allows` / `require`), and which
//! employees' data does that action reach (`audience`). Nothing else in the
//! crate branches on `Role`.

use std::collections::HashSet;

use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::error::{HrmError, HrmResult};
use crate::model::employee::Employee;
use crate::model::id::RecordId;
use crate::model::role::Role;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Action {
    ViewDashboard,
    ViewEmployees,
    RegisterEmployee,
    ViewAttendance,
    RecordAttendance,
    ViewLeaves,
    ApplyForLeave,
    ReviewLeaves,
    ViewHolidays,
    ManageHolidays,
    ViewSettings,
}

/// How the subject of a record relates to the current user
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Relation {
    Own,
    DirectReport,
    Other,
}

/// Whose records an action reaches
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Scope {
    Everyone,
    TeamAndSelf,
    Team,
    SelfOnly,
    Nobody,
}

impl Scope {
    pub fn admits(self, relation: Relation) -> bool {
        match self {
            Scope::Everyone => true,
            Scope::TeamAndSelf => matches!(relation, Relation::Own | Relation::DirectReport),
            Scope::Team => relation == Relation::DirectReport,
            Scope::SelfOnly => relation == Relation::Own,
            Scope::Nobody => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Capabilities<'a> {
    user: &'a Employee,
}

impl<'a> Capabilities<'a> {
    pub fn new(user: &'a Employee) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &'a Employee {
        self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Action-level gate (what the navigation offers)
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::ViewEmployees | Action::ReviewLeaves | Action::ManageHolidays => {
                self.role().is_supervisor()
            }
            Action::RegisterEmployee => self.role().is_admin(),
            Action::ViewDashboard
            | Action::ViewAttendance
            | Action::RecordAttendance
            | Action::ViewLeaves
            | Action::ApplyForLeave
            | Action::ViewHolidays
            | Action::ViewSettings => true,
        }
    }

    pub fn require(&self, action: Action) -> HrmResult<()> {
        if self.allows(action) {
            Ok(())
        } else {
            Err(HrmError::AccessDenied(denial(action)))
        }
    }

    /// Whether `action` reaches a subject standing in `relation` to the user
    pub fn can(&self, action: Action, relation: Relation) -> bool {
        self.allows(action) && self.scope(action).admits(relation)
    }

    pub fn scope(&self, action: Action) -> Scope {
        match (action, self.role()) {
            // the directory always includes yourself and your reports
            (Action::ViewEmployees, Role::Admin) => Scope::Everyone,
            (Action::ViewEmployees, _) => Scope::TeamAndSelf,

            (Action::ViewDashboard | Action::ViewAttendance | Action::ViewLeaves, Role::Admin) => {
                Scope::Everyone
            }
            (Action::ViewDashboard, Role::Manager) => Scope::Team,
            // managers record their own time and leave, so their lists keep them
            (Action::ViewAttendance | Action::ViewLeaves, Role::Manager) => Scope::TeamAndSelf,
            (Action::ViewDashboard | Action::ViewAttendance | Action::ViewLeaves, Role::Employee) => {
                Scope::SelfOnly
            }

            (Action::ReviewLeaves, Role::Admin) => Scope::Everyone,
            (Action::ReviewLeaves, Role::Manager) => Scope::Team,
            (Action::ReviewLeaves, Role::Employee) => Scope::Nobody,

            (Action::RecordAttendance | Action::ApplyForLeave | Action::ViewSettings, _) => {
                Scope::SelfOnly
            }
            (Action::RegisterEmployee | Action::ViewHolidays | Action::ManageHolidays, _) => {
                if self.allows(action) {
                    Scope::Everyone
                } else {
                    Scope::Nobody
                }
            }
        }
    }

    pub fn relation_to(&self, subject: &Employee) -> Relation {
        if subject.id == self.user.id {
            Relation::Own
        } else if self.user.is_manager_of(subject) {
            Relation::DirectReport
        } else {
            Relation::Other
        }
    }

    /// Resolves the set of employee ids `action` reaches, for repeated membership tests
    pub fn audience(&self, action: Action, employees: &[Employee]) -> Audience {
        let scope = self.scope(action);
        let team = match scope {
            Scope::Team | Scope::TeamAndSelf => employees
                .iter()
                .filter(|e| e.id != self.user.id && self.user.is_manager_of(e))
                .map(|e| e.id.clone())
                .collect(),
            _ => HashSet::new(),
        };
        Audience {
            scope,
            me: self.user.id.clone(),
            team,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Audience {
    scope: Scope,
    me: RecordId,
    team: HashSet<RecordId>,
}

impl Audience {
    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn relation(&self, employee_id: &RecordId) -> Relation {
        if employee_id == &self.me {
            Relation::Own
        } else if self.team.contains(employee_id) {
            Relation::DirectReport
        } else {
            Relation::Other
        }
    }

    pub fn includes(&self, employee_id: &RecordId) -> bool {
        self.scope.admits(self.relation(employee_id))
    }

    /// Number of direct reports (only resolved for team scopes)
    pub fn team_size(&self) -> usize {
        self.team.len()
    }
}

fn denial(action: Action) -> &'static str {
    match action {
        Action::ViewEmployees => "only admins and managers can browse employees",
        Action::RegisterEmployee => "only admins can register employees",
        Action::ReviewLeaves => "only admins and managers can review leave requests",
        Action::ManageHolidays => "only admins and managers can manage holidays",
        _ => "not permitted",
    }
}
