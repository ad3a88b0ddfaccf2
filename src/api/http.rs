use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::Gateway;
use crate::error::{HrmError, HrmResult};
use crate::model::attendance::{AttendanceRecord, AttendanceUpsert};
use crate::model::employee::{Employee, NewEmployee};
use crate::model::holiday::{Holiday, HolidayDraft};
use crate::model::id::RecordId;
use crate::model::leave_request::{LeaveDraft, LeavePatch, LeaveRequest};
use crate::models::{Ack, Created, IdentifiedPatch, LoginReqDto, LoginResponse, RegisterReqDto};
use crate::routes::Endpoint;

/// `Gateway` over the PHP JSON API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> HrmResult<Self> {
        let client = Client::builder().build().map_err(HrmError::ClientSetup)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Sends the request; any non-2xx status becomes `RequestFailed` with the body text
    #[instrument(name = "gateway", skip_all, fields(method = %endpoint.method(), path = %endpoint.path()))]
    async fn execute(&self, endpoint: &Endpoint, body: Option<Value>) -> HrmResult<(StatusCode, String)> {
        let mut request = self
            .client
            .request(endpoint.method(), endpoint.url(&self.base_url))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "transport failure");
            HrmError::Transport(e)
        })?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(%status, body = %text, "remote rejected request");
            return Err(HrmError::RequestFailed { status, body: text });
        }
        debug!(%status, "remote accepted request");
        Ok((status, text))
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> HrmResult<T> {
        let (_, text) = self.execute(&endpoint, None).await?;
        decode(&text)
    }

    async fn submit<T, B>(&self, endpoint: Endpoint, body: &B) -> HrmResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        let (_, text) = self.execute(&endpoint, Some(body)).await?;
        decode(&text)
    }

    /// For `{success}` answers: a 2xx carrying `success: false` is still a rejection
    async fn acknowledge(&self, endpoint: Endpoint, body: Option<Value>) -> HrmResult<Ack> {
        let (status, text) = self.execute(&endpoint, body).await?;
        let ack: Ack = decode(&text)?;
        if !ack.success {
            warn!(%status, body = %text, "remote reported failure");
            return Err(HrmError::RequestFailed { status, body: text });
        }
        Ok(ack)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> HrmResult<T> {
    serde_json::from_str(text).map_err(|e| HrmError::Decode(format!("{e}: {text}")))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn login(&self, email: &str, password: &str) -> HrmResult<Employee> {
        let body = LoginReqDto { email, password };
        let response: LoginResponse = self.submit(Endpoint::Login, &body).await?;
        Ok(response.user)
    }

    async fn register(&self, profile: &NewEmployee, password: &str) -> HrmResult<Option<RecordId>> {
        let body = serde_json::to_value(RegisterReqDto { profile, password })?;
        let ack = self.acknowledge(Endpoint::Register, Some(body)).await?;
        Ok(ack.id)
    }

    async fn list_employees(&self) -> HrmResult<Vec<Employee>> {
        self.fetch(Endpoint::ListEmployees).await
    }

    async fn list_leaves(&self) -> HrmResult<Vec<LeaveRequest>> {
        self.fetch(Endpoint::ListLeaves).await
    }

    async fn create_leave(&self, draft: &LeaveDraft) -> HrmResult<RecordId> {
        let created: Created = self.submit(Endpoint::CreateLeave, &draft.payload()).await?;
        Ok(created.id)
    }

    async fn update_leave(&self, id: &RecordId, patch: &LeavePatch) -> HrmResult<()> {
        let body = serde_json::to_value(IdentifiedPatch { id, patch })?;
        self.acknowledge(Endpoint::UpdateLeave, Some(body)).await?;
        Ok(())
    }

    async fn list_attendance(&self) -> HrmResult<Vec<AttendanceRecord>> {
        self.fetch(Endpoint::ListAttendance).await
    }

    async fn upsert_attendance(&self, record: &AttendanceUpsert<'_>) -> HrmResult<Option<RecordId>> {
        let body = serde_json::to_value(record)?;
        let ack = self.acknowledge(Endpoint::UpsertAttendance, Some(body)).await?;
        Ok(ack.id)
    }

    async fn list_holidays(&self) -> HrmResult<Vec<Holiday>> {
        self.fetch(Endpoint::ListHolidays).await
    }

    async fn create_holiday(&self, draft: &HolidayDraft) -> HrmResult<RecordId> {
        let created: Created = self.submit(Endpoint::CreateHoliday, draft).await?;
        Ok(created.id)
    }

    async fn remove_holiday(&self, id: &RecordId) -> HrmResult<()> {
        self.acknowledge(Endpoint::RemoveHoliday(id.clone()), None).await?;
        Ok(())
    }
}
