//! HTTP calls to the clinic endpoints. Every call resolves to an
//! [`ActionResult`]; transport errors never escape as `Err`.

use anyhow::{Context, Result};
use reqwest::{header::COOKIE, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{routes, DeletionKind, RecordId},
    error::{ActionResult, FailureReason},
    protocol::{
        decode_json_ack, decode_response, decode_unit, AdminCredentials, AdminGrant,
        AppointmentRequest, Credentials, DeletionRequest, LoginGrant, McuMetadata, QueueTicket,
        RegistrationForm, RegistrationReceipt,
    },
};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct McuClient {
    http: Client,
    base_url: Url,
}

impl McuClient {
    pub fn new(server_url: &str) -> Result<Self> {
        let base_url = Url::parse(server_url)
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub async fn login(
        &self,
        credentials: &Credentials,
        cookie: Option<String>,
    ) -> ActionResult<LoginGrant> {
        let request = self.post(routes::LOGIN, cookie).map(|req| req.form(credentials));
        self.send(routes::LOGIN, request).await
    }

    pub async fn register(
        &self,
        form: &RegistrationForm,
        cookie: Option<String>,
    ) -> ActionResult<RegistrationReceipt> {
        let request = self.post(routes::REGISTER, cookie).map(|req| req.form(form));
        self.send(routes::REGISTER, request).await
    }

    pub async fn book_appointment(
        &self,
        appointment: &AppointmentRequest,
        cookie: Option<String>,
    ) -> ActionResult<QueueTicket> {
        let request = self
            .post(routes::BOOKING, cookie)
            .map(|req| req.form(appointment));
        self.send(routes::BOOKING, request).await
    }

    pub async fn admin_login(
        &self,
        credentials: &AdminCredentials,
        cookie: Option<String>,
    ) -> ActionResult<AdminGrant> {
        let request = self
            .post(routes::ADMIN_LOGIN, cookie)
            .map(|req| req.form(credentials));
        self.send(routes::ADMIN_LOGIN, request).await
    }

    pub async fn delete_record(
        &self,
        kind: DeletionKind,
        id: RecordId,
        cookie: Option<String>,
    ) -> ActionResult<()> {
        let body = match kind {
            DeletionKind::User => DeletionRequest::mirrored(id),
            DeletionKind::Mcu | DeletionKind::Queue => DeletionRequest::single(id),
        };
        let request = self.post(kind.endpoint(), cookie).map(|req| req.json(&body));
        match self.exchange(kind.endpoint(), request).await {
            Ok((status, _)) => decode_unit(status),
            Err(reason) => ActionResult::Failure(reason),
        }
    }

    pub async fn save_mcu_metadata(
        &self,
        metadata: &McuMetadata,
        cookie: Option<String>,
    ) -> ActionResult<()> {
        let request = self
            .post(routes::SAVE_MCU, cookie)
            .map(|req| req.form(metadata));
        match self.exchange(routes::SAVE_MCU, request).await {
            Ok((status, body)) => decode_json_ack(status, &body),
            Err(reason) => ActionResult::Failure(reason),
        }
    }

    fn post(&self, path: &str, cookie: Option<String>) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("cannot join '{path}' onto {}", self.base_url))?;
        let mut request = self.http.post(url);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        Ok(request)
    }

    async fn exchange(
        &self,
        path: &str,
        request: Result<RequestBuilder>,
    ) -> std::result::Result<(u16, Vec<u8>), FailureReason> {
        let response = request
            .map_err(transport_failure)?
            .send()
            .await
            .map_err(transport_failure)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_failure)?.to_vec();
        debug!(path, status, bytes = body.len(), "clinic endpoint responded");
        Ok((status, body))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: Result<RequestBuilder>,
    ) -> ActionResult<T> {
        match self.exchange(path, request).await {
            Ok((status, body)) => decode_response(status, &body),
            Err(reason) => ActionResult::Failure(reason),
        }
    }
}

fn transport_failure(err: impl std::fmt::Display) -> FailureReason {
    FailureReason::Transport {
        detail: err.to_string(),
    }
}
