pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod id;
pub mod leave_request;
pub mod role;

pub use attendance::{AttendanceDraft, AttendancePatch, AttendanceRecord, AttendanceStatus};
pub use employee::{Employee, NewEmployee};
pub use holiday::{Holiday, HolidayDraft, HolidayType};
pub use id::RecordId;
pub use leave_request::{LeaveDraft, LeavePatch, LeaveRequest, LeaveStatus, LeaveType};
pub use role::Role;
