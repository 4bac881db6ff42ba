//! Boundary to the external project-analysis service.
//!
//! The service reads the raw task list and answers with an advisory critical
//! path, a health score, and risk findings. Nothing here feeds back into
//! scheduling; failures are converted to a single user-facing message at
//! `analyze_or_message`.

mod client;
mod prompt;
mod types;

pub use client::{analyze_or_message, AnalysisClient, AnalysisServiceError, GeminiClient};
pub use prompt::{build_prompt, build_request_body, parse_analysis_response, response_schema};
pub use types::{AnalysisResult, Risk};
