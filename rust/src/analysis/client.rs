//! Analysis service client and its error type.

use std::time::Duration;
use thiserror::Error;

use crate::config::AnalysisConfig;
use crate::log_changes;
use crate::models::Task;

use super::prompt::{build_request_body, parse_analysis_response};
use super::types::AnalysisResult;

/// Longest slice of an error body kept in `Status` errors.
const MAX_ERROR_BODY: usize = 512;

/// Errors from calling or parsing the analysis service.
///
/// Display output is detailed and meant for logs; show users
/// [`AnalysisServiceError::user_message`] instead.
#[derive(Error, Debug)]
pub enum AnalysisServiceError {
    #[error("No API key configured for the analysis service")]
    MissingCredential,
    #[error("Request to the analysis service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Analysis service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Analysis service returned no content")]
    EmptyResponse,
    #[error("Malformed analysis response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Analysis response does not match the expected shape: {0}")]
    SchemaMismatch(String),
}

impl AnalysisServiceError {
    /// Message safe to show to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential => {
                "Project analysis is unavailable: no API key is configured.".to_string()
            }
            _ => "Failed to get analysis from AI. Please check the API key and project data."
                .to_string(),
        }
    }
}

/// Anything that can analyze a task list.
///
/// Implemented by [`GeminiClient`] for the real service; tests inject fakes.
pub trait AnalysisClient: Send + Sync {
    fn analyze(&self, tasks: &[Task]) -> Result<AnalysisResult, AnalysisServiceError>;
}

/// Blocking HTTP client for a `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    url: String,
}

impl GeminiClient {
    /// Build a client from explicit configuration.
    ///
    /// Fails with `MissingCredential` when no non-empty key is configured.
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisServiceError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AnalysisServiceError::MissingCredential)?
            .to_string();

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let url = format!(
            "{}/models/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            config.model
        );

        Ok(Self { http, api_key, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AnalysisClient for GeminiClient {
    fn analyze(&self, tasks: &[Task]) -> Result<AnalysisResult, AnalysisServiceError> {
        let body = build_request_body(tasks)?;

        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            let body = text.chars().take(MAX_ERROR_BODY).collect();
            return Err(AnalysisServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_analysis_response(&text, tasks)
    }
}

/// Run an analysis, turning any failure into a user-facing message.
///
/// The detailed error is logged at CHANGES verbosity. Callers keep their
/// current schedule and display the message; nothing is retried.
pub fn analyze_or_message(
    client: &dyn AnalysisClient,
    tasks: &[Task],
    verbosity: u8,
) -> Result<AnalysisResult, String> {
    client.analyze(tasks).map_err(|err| {
        log_changes!(verbosity, "Project analysis failed: {}", err);
        err.user_message()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::plan_layout;
    use crate::sample::initial_tasks;
    use crate::scheduler::compute_schedule;

    struct FakeClient {
        outcome: fn() -> Result<AnalysisResult, AnalysisServiceError>,
    }

    impl AnalysisClient for FakeClient {
        fn analyze(&self, _tasks: &[Task]) -> Result<AnalysisResult, AnalysisServiceError> {
            (self.outcome)()
        }
    }

    fn healthy() -> Result<AnalysisResult, AnalysisServiceError> {
        Ok(AnalysisResult {
            critical_path: vec!["T1".into(), "T3".into()],
            health_score: 88.0,
            score_reasoning: "Balanced load".into(),
            risk_analysis: vec![],
        })
    }

    fn failing() -> Result<AnalysisResult, AnalysisServiceError> {
        Err(AnalysisServiceError::Status {
            status: 503,
            body: "upstream stack trace".into(),
        })
    }

    #[test]
    fn test_success_passes_through() {
        let client = FakeClient { outcome: healthy };
        let result = analyze_or_message(&client, &initial_tasks(), 0).unwrap();
        assert_eq!(result.critical_path, vec!["T1", "T3"]);
    }

    #[test]
    fn test_failure_becomes_generic_message_and_schedule_survives() {
        let tasks = initial_tasks();
        let layout_before = plan_layout(&compute_schedule(&tasks).unwrap());

        let client = FakeClient { outcome: failing };
        let message = analyze_or_message(&client, &tasks, 0).unwrap_err();

        assert!(message.starts_with("Failed to get analysis"));
        assert!(!message.contains("stack trace"));
        assert_eq!(plan_layout(&compute_schedule(&tasks).unwrap()), layout_before);
    }

    #[test]
    fn test_missing_credential_rejected_at_construction() {
        let config = AnalysisConfig::default();
        assert!(matches!(
            GeminiClient::new(&config),
            Err(AnalysisServiceError::MissingCredential)
        ));

        let blank = AnalysisConfig {
            api_key: Some("   ".into()),
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            GeminiClient::new(&blank),
            Err(AnalysisServiceError::MissingCredential)
        ));
    }

    #[test]
    fn test_url_built_from_endpoint_and_model() {
        let config = AnalysisConfig {
            api_key: Some("key".into()),
            endpoint: "http://localhost:9999/v1beta/".into(),
            ..AnalysisConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let config = AnalysisConfig {
            api_key: Some("key".into()),
            endpoint: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..AnalysisConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        let err = client.analyze(&initial_tasks()).unwrap_err();
        assert!(matches!(err, AnalysisServiceError::Transport(_)));
        assert!(err.user_message().starts_with("Failed to get analysis"));
    }
}
