// src/grading/vision.rs
//
// Client for the external AI vision-grading service. This path trusts the
// remote judgment as authoritative: it returns both the per-question
// corrections and the aggregate counts in one call, bypassing the local
// scorer entirely. Results stored from here carry the `vision` judgment so
// the provenance stays visible in data.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

/// A validated `data:<mime>;base64,<payload>` image. Both grading images
/// must arrive in this self-describing embedded form.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct DataUri(String);

impl DataUri {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let rest = raw
            .strip_prefix("data:")
            .ok_or_else(|| "image must be a data URI (data:<mime>;base64,...)".to_string())?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| "data URI must declare a base64 payload".to_string())?;
        if mime.is_empty() {
            return Err("data URI is missing its MIME type".to_string());
        }
        BASE64
            .decode(payload)
            .map_err(|e| format!("data URI payload is not valid base64: {}", e))?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One per-question verdict from the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrectionEntry {
    #[serde(alias = "questionId")]
    pub question_id: String,
    pub correct: bool,
}

/// Aggregate counts as judged remotely. `accuracy` is a 0-100 percentage.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VisionResults {
    #[serde(alias = "correctCount")]
    pub correct_count: i64,
    #[serde(alias = "incorrectCount")]
    pub incorrect_count: i64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VisionGradingOutput {
    pub corrections: Vec<CorrectionEntry>,
    pub results: VisionResults,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VisionGradingInput<'a> {
    photo_data_uri: &'a DataUri,
    answer_key_data_uri: &'a DataUri,
    test_id: String,
    student_id: String,
}

#[derive(Debug)]
pub enum VisionError {
    NotConfigured,
    Transport(String),
    Status(u16, String),
    Malformed(String),
}

impl fmt::Display for VisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisionError::NotConfigured => {
                write!(f, "vision grading service is not configured (GRADER_URL unset)")
            }
            VisionError::Transport(msg) => write!(f, "vision grading request failed: {}", msg),
            VisionError::Status(code, body) => {
                write!(f, "vision grading service returned {}: {}", code, body)
            }
            VisionError::Malformed(msg) => {
                write!(f, "vision grading service returned unparseable output: {}", msg)
            }
        }
    }
}

impl std::error::Error for VisionError {}

/// Every vision failure is terminal for the grading operation and surfaced
/// verbatim; nothing is fabricated locally and nothing is persisted.
impl From<VisionError> for AppError {
    fn from(err: VisionError) -> Self {
        AppError::RemoteFailure(err.to_string())
    }
}

#[derive(Clone)]
pub struct VisionGrader {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl VisionGrader {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.grader_url.clone(),
            api_key: config.grader_api_key.clone(),
        }
    }

    /// Sends both images and the grading context, expecting the corrections
    /// array plus the aggregate results object back in one response.
    pub async fn grade(
        &self,
        photo: &DataUri,
        answer_key: &DataUri,
        test_id: i64,
        student_id: i64,
    ) -> Result<VisionGradingOutput, VisionError> {
        let base_url = self.base_url.as_deref().ok_or(VisionError::NotConfigured)?;

        let input = VisionGradingInput {
            photo_data_uri: photo,
            answer_key_data_uri: answer_key,
            test_id: test_id.to_string(),
            student_id: student_id.to_string(),
        };

        let mut request = self
            .client
            .post(format!("{}/grade", base_url.trim_end_matches('/')))
            .json(&input);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VisionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Status(status.as_u16(), body));
        }

        response
            .json::<VisionGradingOutput>()
            .await
            .map_err(|e| VisionError::Malformed(e.to_string()))
    }
}
