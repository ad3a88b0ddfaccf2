use serde::{Deserialize, Serialize};

use crate::model::employee::{Employee, NewEmployee};
use crate::model::id::RecordId;
use crate::utils::loose;

#[derive(Serialize)]
pub struct LoginReqDto<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub user: Employee,
}

/// Registration body: the full profile plus its initial credential
#[derive(Serialize)]
pub struct RegisterReqDto<'a> {
    #[serde(flatten)]
    pub profile: &'a NewEmployee,
    pub password: &'a str,
}

/// `{ id }` answer to a create call
#[derive(Debug, Deserialize)]
pub struct Created {
    pub id: RecordId,
}

/// `{ success, id? }` answer to register / update / upsert / delete calls
#[derive(Debug, Deserialize)]
pub struct Ack {
    #[serde(default = "assume_success")]
    pub success: bool,
    #[serde(default, deserialize_with = "loose::opt_id")]
    pub id: Option<RecordId>,
}

fn assume_success() -> bool {
    true
}

/// Body for `PATCH /leaves.php`: the id travels next to the patched fields
#[derive(Serialize)]
pub struct IdentifiedPatch<'a, P: Serialize> {
    pub id: &'a RecordId,
    #[serde(flatten)]
    pub patch: &'a P,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::{LeavePatch, LeaveStatus};

    #[test]
    fn ack_tolerates_missing_fields() {
        let ack: Ack = serde_json::from_str("{}").unwrap();
        assert!(ack.success);
        assert!(ack.id.is_none());

        let ack: Ack = serde_json::from_str(r#"{"success": true, "id": 31}"#).unwrap();
        assert_eq!(ack.id, Some(RecordId::from("31")));
    }

    #[test]
    fn patch_body_is_flat() {
        let patch = LeavePatch {
            status: Some(LeaveStatus::Approved),
            ..Default::default()
        };
        let id = RecordId::from("4");
        let v = serde_json::to_value(IdentifiedPatch { id: &id, patch: &patch }).unwrap();
        assert_eq!(v, serde_json::json!({"id": "4", "status": "approved"}));
    }
}
