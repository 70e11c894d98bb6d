use crate::config::AppConfig;
use crate::form::FormPart;
use actix_web::{HttpResponse, ResponseError, http::StatusCode as ActixStatus};
use bytes::Bytes;
use http::{HeaderValue, header::CONTENT_TYPE};
use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("API_URL is not configured")]
    MissingUpstream,
    #[error("invalid multipart field {0}: {1}")]
    InvalidPart(String, reqwest::Error),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("upstream returned a non-JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl ResponseError for RelayError {
    fn status_code(&self) -> ActixStatus {
        match self {
            RelayError::MissingUpstream => ActixStatus::INTERNAL_SERVER_ERROR,
            RelayError::InvalidPart(..) => ActixStatus::BAD_REQUEST,
            RelayError::Upstream(_) | RelayError::InvalidJson(_) => ActixStatus::BAD_GATEWAY,
        }
    }
}

pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ProxyResponse {
    pub fn to_json(&self) -> Result<serde_json::Value, RelayError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Re-emits the upstream JSON body unchanged with a 200 status.
    pub fn into_json_response(self) -> Result<HttpResponse, RelayError> {
        if !self.status.is_success() {
            log::warn!("Upstream responded with status {}", self.status);
        }
        let json = self.to_json()?;
        Ok(HttpResponse::Ok().json(json))
    }
}

#[derive(Debug, Clone)]
pub struct RelayState {
    pub client: reqwest::Client,
    pub api_url: Option<String>,
}

impl RelayState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let client = config.build_client()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    fn upstream(&self) -> Result<&str, RelayError> {
        self.api_url.as_deref().ok_or(RelayError::MissingUpstream)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ProxyResponse, RelayError> {
        let resp = request.send().await.map_err(|e| {
            log::error!("Failed to reach upstream: {}", e);
            RelayError::Upstream(e)
        })?;
        let status = resp.status();
        let body = resp.bytes().await?;
        log::debug!("Upstream replied {} with {} bytes", status, body.len());
        Ok(ProxyResponse { status, body })
    }

    /// Rebuilds the inbound multipart form and posts it upstream.
    pub async fn forward_form(&self, parts: Vec<FormPart>) -> Result<ProxyResponse, RelayError> {
        let url = self.upstream()?;
        log::info!("Relaying {} form field(s) to {}", parts.len(), url);
        let form = build_form(parts)?;
        self.send(self.client.post(url).multipart(form)).await
    }

    /// Posts the inbound body upstream byte for byte. Only the content type is
    /// carried over; length, host and hop-by-hop headers are left to the client.
    pub async fn forward_raw(
        &self,
        content_type: Option<&[u8]>,
        body: Bytes,
    ) -> Result<ProxyResponse, RelayError> {
        let url = self.upstream()?;
        log::info!("Relaying {} raw byte(s) to {}", body.len(), url);
        let mut request = self.client.post(url).body(body);
        if let Some(value) = content_type.and_then(|v| HeaderValue::from_bytes(v).ok()) {
            request = request.header(CONTENT_TYPE, value);
        }
        self.send(request).await
    }
}

pub fn build_form(parts: Vec<FormPart>) -> Result<Form, RelayError> {
    let mut form = Form::new();
    for part in parts {
        if let Some(file_name) = part.file_name {
            let mut file = Part::bytes(part.data.to_vec()).file_name(file_name);
            if let Some(mime) = part.content_type {
                file = file
                    .mime_str(&mime)
                    .map_err(|e| RelayError::InvalidPart(part.name.clone(), e))?;
            }
            form = form.part(part.name, file);
        } else {
            let text = String::from_utf8_lossy(&part.data).into_owned();
            form = form.text(part.name, text);
        }
    }
    Ok(form)
}
