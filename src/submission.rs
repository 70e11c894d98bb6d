use crate::form::FormPart;
use crate::io_struct::{AnalysisResponse, display_field, value_text};
use crate::transcript::{Message, Transcript};
use anyhow::Context;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::path::Path;

pub const ANALYZE_PROMPT: &str =
    "Please analyze this company report and provide key metrics and actionable insights.";
pub const FETCH_FAILED: &str = "Failed to fetch results.";

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub async fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());
        Ok(Self {
            file_name,
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from(bytes),
        })
    }

    fn from_part(part: FormPart) -> Option<Self> {
        let file_name = part.file_name?;
        Some(Self {
            file_name,
            content_type: part
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            bytes: part.data,
        })
    }

    fn to_part(&self) -> anyhow::Result<Part> {
        Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name.clone())
            .mime_str(&self.content_type)
            .with_context(|| format!("invalid content type for {}", self.file_name))
    }
}

/// What the user handed over for one analysis. Every field is optional and
/// nothing is validated before sending.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub report_file: Option<UploadFile>,
    pub guidelines_file: Option<UploadFile>,
    pub text: String,
    pub guidelines_text: String,
}

impl Submission {
    pub fn from_parts(parts: Vec<FormPart>) -> Self {
        let mut submission = Submission::default();
        for part in parts {
            let name = part.name.clone();
            match name.as_str() {
                "report_file" if part.is_file() => {
                    submission.report_file = UploadFile::from_part(part)
                }
                "guidelines_file" if part.is_file() => {
                    submission.guidelines_file = UploadFile::from_part(part)
                }
                "text" => submission.text = part.text(),
                "guidelines_text" => submission.guidelines_text = part.text(),
                other => log::debug!("Ignoring unknown form field {}", other),
            }
        }
        submission
    }

    pub fn to_form(&self) -> anyhow::Result<Form> {
        let mut form = Form::new();
        if let Some(file) = &self.report_file {
            form = form.part("report_file", file.to_part()?);
        }
        if let Some(file) = &self.guidelines_file {
            form = form.part("guidelines_file", file.to_part()?);
        }
        if !self.text.is_empty() {
            form = form.text("text", self.text.clone());
        }
        if !self.guidelines_text.is_empty() {
            form = form.text("guidelines_text", self.guidelines_text.clone());
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    pub client: reqwest::Client,
    pub endpoint: String,
}

impl AnalysisClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Posts the submission and parses the reply, whatever its status code.
    pub async fn analyze(&self, submission: &Submission) -> anyhow::Result<AnalysisResponse> {
        let form = submission.to_form()?;
        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.endpoint))?;
        let status = resp.status();
        let result = resp
            .json::<AnalysisResponse>()
            .await
            .with_context(|| format!("invalid response body (status {})", status))?;
        log::debug!("Analysis response: success={}", result.is_success());
        Ok(result)
    }
}

/// Assistant messages derived from a backend response, in display order.
pub fn messages_for(result: &AnalysisResponse) -> Vec<Message> {
    let Some(data) = result.report_data() else {
        return vec![Message::assistant(format!("Error: {}", result.error_text()))];
    };

    let mut messages = Vec::new();
    if let Some(metrics) = data.metrics() {
        messages.push(Message::assistant(format!(
            "Here are the extracted metrics from your {} report for {} ({}):",
            display_field(data.report_type.as_ref()),
            display_field(data.company_name.as_ref()),
            display_field(data.year.as_ref()),
        )));
        let pretty = serde_json::to_string_pretty(metrics).unwrap_or_else(|_| metrics.to_string());
        messages.push(Message::assistant_preformatted(pretty));
    }
    if let Some(summary) = data.summary() {
        messages.push(Message::assistant("Here’s a quick summary for you:"));
        messages.push(Message::assistant(value_text(summary)));
    }
    if let Some(review) = data.review() {
        messages.push(Message::assistant(
            "Here’s an analyst review based on the report:",
        ));
        messages.push(Message::assistant(value_text(review)));
    }
    if let Some(meta) = result.analysis_meta() {
        if let Some(secs) = meta.processing_time() {
            messages.push(Message::assistant(format!(
                "⏱️ Analysis completed in {} seconds.",
                fixed_2(secs)
            )));
        }
        if meta.has_guidelines() {
            messages.push(Message::assistant(
                "📘 Guidelines were included in the analysis.",
            ));
        }
    }
    messages
}

/// Two decimals, with exact ties rounded away from zero (`{:.2}` alone
/// rounds them to even).
fn fixed_2(value: f64) -> String {
    let scaled = value * 100.0;
    let exact = value.mul_add(100.0, -scaled) == 0.0;
    if exact && scaled.fract().abs() == 0.5 {
        format!("{:.2}", (scaled.trunc() + scaled.signum()) / 100.0)
    } else {
        format!("{:.2}", value)
    }
}

/// UI state of one page: the transcript, the loading flag and the pasted text
/// kept between renders.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub transcript: Transcript,
    pub loading: bool,
    pub text: String,
    pub guidelines_text: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_submission(&mut self) {
        self.loading = true;
        self.transcript.push(Message::user(ANALYZE_PROMPT));
    }

    pub fn finish_submission(&mut self, result: anyhow::Result<AnalysisResponse>) {
        match result {
            Ok(result) => self.transcript.extend(messages_for(&result)),
            Err(e) => {
                log::error!("Analysis request failed: {:#}", e);
                self.transcript.push(Message::assistant(FETCH_FAILED));
            }
        }
        self.loading = false;
    }

    pub async fn submit(&mut self, client: &AnalysisClient, submission: &Submission) {
        self.begin_submission();
        let result = client.analyze(submission).await;
        self.finish_submission(result);
    }
}
