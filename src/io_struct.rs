use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by the analysis backend and relayed unchanged to the client.
/// Fields are kept loose: only their presence is checked before rendering.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct AnalysisResponse {
    pub success: Option<Value>,
    pub data: Option<Value>,
    pub meta: Option<Value>,
    pub error: Option<Value>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ReportData {
    pub important_metrics: Option<Value>,
    pub summary: Option<Value>,
    pub review: Option<Value>,
    #[serde(default, deserialize_with = "keep_null")]
    pub company_name: Option<Value>,
    #[serde(default, deserialize_with = "keep_null")]
    pub report_type: Option<Value>,
    #[serde(default, deserialize_with = "keep_null")]
    pub year: Option<Value>,
}

// interpolated fields print `null` and `undefined` differently
fn keep_null<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct AnalysisMeta {
    pub processing_time_seconds: Option<Value>,
    pub has_guidelines: Option<Value>,
}

impl AnalysisResponse {
    pub fn is_success(&self) -> bool {
        present(self.success.as_ref()).is_some()
    }

    /// Report fields of a successful response. A `data` value that is not an
    /// object counts as present but carries no fields.
    pub fn report_data(&self) -> Option<ReportData> {
        if !self.is_success() {
            return None;
        }
        present(self.data.as_ref()).map(fields_of)
    }

    pub fn analysis_meta(&self) -> Option<AnalysisMeta> {
        present(self.meta.as_ref()).map(fields_of)
    }

    /// The error text shown to the user, falling back when the backend sent none.
    pub fn error_text(&self) -> String {
        match present(self.error.as_ref()) {
            Some(error) => value_text(error),
            None => "Unknown error occurred.".to_string(),
        }
    }
}

fn fields_of<T: serde::de::DeserializeOwned + Default>(value: &Value) -> T {
    match value {
        Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
        _ => T::default(),
    }
}

impl ReportData {
    /// Metrics count as present when they hold at least one entry.
    pub fn metrics(&self) -> Option<&Value> {
        let metrics = self.important_metrics.as_ref()?;
        let non_empty = match metrics {
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::String(s) => !s.is_empty(),
            _ => false,
        };
        non_empty.then_some(metrics)
    }

    pub fn summary(&self) -> Option<&Value> {
        present(self.summary.as_ref())
    }

    pub fn review(&self) -> Option<&Value> {
        present(self.review.as_ref())
    }
}

impl AnalysisMeta {
    pub fn processing_time(&self) -> Option<f64> {
        present(self.processing_time_seconds.as_ref()).and_then(Value::as_f64)
    }

    pub fn has_guidelines(&self) -> bool {
        present(self.has_guidelines.as_ref()).is_some()
    }
}

/// Returns the value unless it is one the page treats as missing:
/// `null`, `false`, zero, or an empty string.
pub fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Strings verbatim, anything else as JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text for a field interpolated into a message. Strings are used verbatim,
/// missing fields read `undefined` and everything else is written as JSON.
pub fn display_field(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => value_text(value),
    }
}
