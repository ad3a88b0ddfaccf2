//! `hrm` command-line arguments and dispatch

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::error::HrmResult;
use crate::model::employee::{Employee, NewEmployee};
use crate::model::holiday::{HolidayDraft, HolidayType};
use crate::model::id::RecordId;
use crate::model::leave_request::LeaveType;
use crate::model::role::Role;
use crate::portal::Portal;
use crate::views::approvals::StatusFilter;
use crate::views::holidays::HolidayFilter;

#[derive(Parser)]
#[command(name = "hrm")]
#[command(author, version, about = "HR portal client")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the HR API (overrides HRM_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        email: String,
        #[arg(long, env = "HRM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the current session
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// Role-shaped summary
    Dashboard,

    /// Employee directory
    Employees,

    /// Managers new employees can report to
    Managers,

    /// Attendance history
    Attendance,

    /// Clock in for today
    ClockIn,

    /// Clock out for today
    ClockOut,

    /// Visible leave requests
    Leaves,

    /// File a leave request
    ApplyLeave {
        #[arg(long = "type", default_value = "annual")]
        leave_type: LeaveType,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        reason: String,
    },

    /// Leave requests awaiting review
    Approvals {
        #[arg(long, default_value = "pending")]
        status: StatusFilter,
    },

    /// Approve a leave request
    Approve {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Reject a leave request
    Reject {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Company holidays
    Holidays {
        #[arg(long, default_value = "all")]
        filter: HolidayFilter,
    },

    /// Add a holiday
    AddHoliday {
        name: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long = "type", default_value = "public")]
        holiday_type: HolidayType,
        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a holiday
    RemoveHoliday { id: String },

    /// Register a new employee with the default password
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "employee")]
        role: Role,
        #[arg(long, default_value = "")]
        department: String,
        #[arg(long, default_value = "")]
        position: String,
        /// Defaults to today
        #[arg(long)]
        joining_date: Option<NaiveDate>,
        /// Id of the reporting manager
        #[arg(long)]
        manager: Option<String>,
    },

    /// Pages available to the signed-in user
    Menu,
}

/// Directory row: the employee plus the resolved manager name
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryEntry<'a> {
    #[serde(flatten)]
    employee: &'a Employee,
    manager_name: Option<&'a str>,
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(command: Commands, portal: &mut Portal) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let user = portal
                .login(&email, &password)
                .await
                .context("login failed")?;
            print(user)
        }
        Commands::Logout => {
            portal.logout()?;
            println!("logged out");
            Ok(())
        }
        Commands::Whoami => match portal.user() {
            Some(user) => print(user),
            None => anyhow::bail!("not signed in"),
        },
        Commands::Menu => print(&portal.menu()),
        command => {
            portal
                .activate()
                .await
                .context("not signed in; run `hrm login` first")?;
            run_signed_in(command, portal).await
        }
    }
}

async fn run_signed_in(command: Commands, portal: &mut Portal) -> Result<()> {
    match command {
        Commands::Dashboard => print(&portal.dashboard()?),
        Commands::Employees => {
            let portal: &Portal = portal;
            let rows = portal
                .employees()?
                .into_iter()
                .map(|employee| {
                    Ok(DirectoryEntry {
                        manager_name: portal.manager_name_of(employee)?,
                        employee,
                    })
                })
                .collect::<HrmResult<Vec<_>>>()?;
            print(&rows)
        }
        Commands::Managers => print(&portal.managers()?),
        Commands::Attendance => print(&portal.attendance_history()?),
        Commands::ClockIn => match portal.clock_in().await? {
            Some(record) => print(record),
            None => {
                println!("already clocked in today");
                Ok(())
            }
        },
        Commands::ClockOut => print(portal.clock_out().await?),
        Commands::Leaves => print(&portal.leave_requests()?),
        Commands::ApplyLeave {
            leave_type,
            start,
            end,
            reason,
        } => print(portal.apply_for_leave(leave_type, start, end, &reason).await?),
        Commands::Approvals { status } => print(&portal.approvals(status)?),
        Commands::Approve { id, comment } => {
            print(portal.approve_leave(&RecordId::from(id), comment.as_deref()).await?)
        }
        Commands::Reject { id, comment } => {
            print(portal.reject_leave(&RecordId::from(id), comment.as_deref()).await?)
        }
        Commands::Holidays { filter } => print(&portal.holidays(filter)?),
        Commands::AddHoliday {
            name,
            date,
            holiday_type,
            description,
        } => {
            let draft = HolidayDraft {
                name,
                date,
                holiday_type,
                description,
            };
            print(portal.add_holiday(draft).await?)
        }
        Commands::RemoveHoliday { id } => {
            portal.remove_holiday(&RecordId::from(id)).await?;
            println!("removed");
            Ok(())
        }
        Commands::Register {
            email,
            name,
            role,
            department,
            position,
            joining_date,
            manager,
        } => {
            let profile = NewEmployee {
                email,
                name,
                role,
                department,
                position,
                joining_date: joining_date.unwrap_or_else(|| portal.today()),
                manager_id: manager.map(RecordId::from),
            };
            let id = portal.register_employee(profile).await?;
            print(&serde_json::json!({ "success": true, "id": id }))
        }
        Commands::Login { .. } | Commands::Logout | Commands::Whoami | Commands::Menu => {
            unreachable!("handled before activation")
        }
    }
}
