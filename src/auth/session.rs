use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::api::Gateway;
use crate::auth::storage::SessionStorage;
use crate::error::{HrmError, HrmResult};
use crate::model::employee::{Employee, NewEmployee};
use crate::model::id::RecordId;

/// Anonymous (`user == None`) or Authenticated.
/// Rehydrated from durable storage on construction.
pub struct Session {
    gateway: Arc<dyn Gateway>,
    storage: SessionStorage,
    default_password: String,
    user: Option<Employee>,
}

impl Session {
    pub fn restore(
        gateway: Arc<dyn Gateway>,
        storage: SessionStorage,
        default_password: impl Into<String>,
    ) -> Self {
        let user = storage.load();
        if let Some(user) = &user {
            info!(user_id = %user.id, role = %user.role, "session restored");
        }
        Self {
            gateway,
            storage,
            default_password: default_password.into(),
            user,
        }
    }

    pub fn user(&self) -> Option<&Employee> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    /// On failure the session is left exactly as it was
    #[instrument(name = "session_login", skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> HrmResult<&Employee> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(HrmError::validation("email and password are required"));
        }

        let user = match self.gateway.login(email.trim(), password).await {
            Ok(user) => user,
            Err(e) => {
                info!(error = %e, "login rejected");
                return Err(e);
            }
        };

        // a session that fails to persist still works for this process
        if let Err(e) = self.storage.save(&user) {
            warn!(error = %e, "failed to persist session");
        }
        info!(user_id = %user.id, role = %user.role, "login successful");
        Ok(&*self.user.insert(user))
    }

    /// Always ends Anonymous; only a failure to delete the session file is reported
    pub fn logout(&mut self) -> HrmResult<()> {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "logged out");
        }
        self.storage.clear()
    }

    /// Creates an employee with the default credential. The caller's own session is untouched.
    #[instrument(name = "session_register", skip(self, profile), fields(email = %profile.email))]
    pub async fn register(&self, profile: &NewEmployee) -> HrmResult<Option<RecordId>> {
        if profile.name.trim().is_empty() || profile.email.trim().is_empty() {
            return Err(HrmError::validation("name and email are required"));
        }
        if !profile.email.contains('@') {
            return Err(HrmError::validation(format!(
                "{:?} is not an email address",
                profile.email
            )));
        }

        match self.gateway.register(profile, &self.default_password).await {
            Ok(id) => {
                info!(id = ?id, "employee registered");
                Ok(id)
            }
            Err(e) => {
                // duplicate email is the usual cause
                warn!(error = %e, "registration rejected");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeGateway, FakeState};
    use crate::model::employee::fixtures::employee;
    use crate::model::role::Role;
    use chrono::NaiveDate;
    use reqwest::StatusCode;
    use tempfile::TempDir;

    fn gateway() -> Arc<FakeGateway> {
        let alice = employee("1", Role::Employee, Some("2"));
        Arc::new(FakeGateway::with_state(FakeState {
            credentials: vec![(alice.email.clone(), "pw".into())],
            employees: vec![alice, employee("2", Role::Manager, None)],
            ..Default::default()
        }))
    }

    fn session(dir: &TempDir, gateway: Arc<FakeGateway>) -> Session {
        Session::restore(gateway, SessionStorage::new(dir.path().join("s.json")), "123456")
    }

    #[tokio::test]
    async fn login_persists_and_restores() {
        let dir = TempDir::new().unwrap();
        let gw = gateway();
        let mut s = session(&dir, gw.clone());
        assert!(!s.is_authenticated());

        let user = s.login("1@example.com", "pw").await.unwrap();
        assert_eq!(user.id, RecordId::from("1"));

        let again = session(&dir, gw);
        assert_eq!(again.user().map(|u| u.id.as_str()), Some("1"));
    }

    #[tokio::test]
    async fn failed_login_stays_anonymous() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, gateway());
        let err = s.login("1@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, HrmError::RequestFailed { status, .. } if status == StatusCode::UNAUTHORIZED));
        assert!(!s.is_authenticated());
        assert!(!dir.path().join("s.json").exists());

        assert!(matches!(s.login("", "pw").await, Err(HrmError::Validation(_))));
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir, gateway());
        s.login("1@example.com", "pw").await.unwrap();
        s.logout().unwrap();
        assert!(!s.is_authenticated());
        assert!(!dir.path().join("s.json").exists());
        s.logout().unwrap();
    }

    #[tokio::test]
    async fn register_uses_default_password_and_keeps_session() {
        let dir = TempDir::new().unwrap();
        let gw = gateway();
        let mut s = session(&dir, gw.clone());
        s.login("1@example.com", "pw").await.unwrap();

        let profile = NewEmployee {
            email: "new@example.com".into(),
            name: "Newbie".into(),
            role: Role::Employee,
            department: "Ops".into(),
            position: "Clerk".into(),
            joining_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            manager_id: Some("2".into()),
        };
        assert!(s.register(&profile).await.unwrap().is_some());
        assert_eq!(s.user().unwrap().id, RecordId::from("1"));
        assert!(
            gw.state()
                .credentials
                .contains(&("new@example.com".to_string(), "123456".to_string()))
        );

        // duplicate email
        assert!(s.register(&profile).await.is_err());
    }
}
