//! Request construction and response parsing for the analysis service.
//!
//! The wire format follows the `generateContent` API: the prompt goes in as a
//! single user text part, JSON output is forced through a response schema,
//! and the answer comes back as the text of the first candidate.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::Task;

use super::client::AnalysisServiceError;
use super::types::AnalysisResult;

/// Instructions sent ahead of the task data.
const INSTRUCTIONS: &str = "\
You are an expert project management AI assistant. Your task is to analyze the provided project plan and identify potential risks and the critical path.

Please perform the following analysis:
1. Identify the Critical Path: Determine the sequence of tasks that represents the longest path through the project, which determines the shortest possible project duration.
2. Identify Risks & Weak Links: Analyze the task distribution, dependencies, and assignees. Look for potential issues such as:
   - A single person being a bottleneck (e.g., assigned to multiple concurrent critical tasks).
   - An assignee being overloaded with too many tasks, even if they are not on the critical path.
   - Complex dependency chains that are fragile to any single delay.
3. Calculate Health Score: Based on the severity and number of risks, provide a \"Critical Path Health Score\" from 0 (extremely high risk) to 100 (perfectly healthy).
4. Provide Recommendations: For each identified risk, suggest a concrete recommendation for a project manager to mitigate it.

Return your complete analysis in a single, valid JSON object that strictly adheres to the provided schema. Ensure all task IDs and names in your response match the input data exactly.";

/// Full prompt with the task list embedded as pretty-printed JSON.
pub fn build_prompt(tasks: &[Task]) -> Result<String, serde_json::Error> {
    let task_data = serde_json::to_string_pretty(tasks)?;
    Ok(format!(
        "{INSTRUCTIONS}\n\nProject Data (JSON format):\n{task_data}\n"
    ))
}

/// Fixed response shape the service must answer with.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "criticalPath": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "An array of task IDs representing the critical path of the project."
            },
            "healthScore": {
                "type": "NUMBER",
                "description": "A score from 0 to 100 representing the project's health, where 100 is excellent."
            },
            "scoreReasoning": {
                "type": "STRING",
                "description": "A brief explanation for the calculated health score."
            },
            "riskAnalysis": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "taskId": { "type": "STRING", "description": "The ID of the high-risk task." },
                        "taskName": { "type": "STRING", "description": "The name of the high-risk task." },
                        "risk": { "type": "STRING", "description": "A description of the identified risk." },
                        "recommendation": { "type": "STRING", "description": "A suggested action to mitigate the risk." }
                    },
                    "required": ["taskId", "taskName", "risk", "recommendation"]
                },
                "description": "An array of objects, each detailing a specific risk in the project plan."
            }
        },
        "required": ["criticalPath", "healthScore", "scoreReasoning", "riskAnalysis"]
    })
}

/// JSON body for a `generateContent` call.
pub fn build_request_body(tasks: &[Task]) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_prompt(tasks)? }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    }))
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Parse a `generateContent` response body into an analysis.
///
/// Rejects empty answers and health scores outside 0..=100, and fills any
/// missing risk `task_name` from `tasks`.
pub fn parse_analysis_response(
    body: &str,
    tasks: &[Task],
) -> Result<AnalysisResult, AnalysisServiceError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(AnalysisServiceError::EmptyResponse);
    }

    let mut result: AnalysisResult = serde_json::from_str(text)?;

    if !result.health_score.is_finite() || !(0.0..=100.0).contains(&result.health_score) {
        return Err(AnalysisServiceError::SchemaMismatch(format!(
            "healthScore {} is outside 0..=100",
            result.health_score
        )));
    }

    let names: FxHashMap<&str, &str> = tasks
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str()))
        .collect();
    for risk in &mut result.risk_analysis {
        let missing = risk.task_name.as_deref().map_or(true, |n| n.trim().is_empty());
        if missing {
            if let Some(name) = names.get(risk.task_id.as_str()) {
                risk.task_name = Some(name.to_string());
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::initial_tasks;

    fn wrap(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[test]
    fn test_prompt_embeds_task_json() {
        let prompt = build_prompt(&initial_tasks()).unwrap();
        assert!(prompt.contains("Project Data (JSON format):"));
        assert!(prompt.contains("\"id\": \"T10\""));
        assert!(prompt.contains("\"assignee\": \"Charlie\""));
    }

    #[test]
    fn test_request_body_forces_json_schema() {
        let body = build_request_body(&initial_tasks()).unwrap();
        let config = &body["generationConfig"];

        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(
            config["responseSchema"]["required"],
            json!(["criticalPath", "healthScore", "scoreReasoning", "riskAnalysis"])
        );
        assert!(body["contents"][0]["parts"][0]["text"].is_string());
    }

    #[test]
    fn test_parse_fills_missing_task_names() {
        let analysis = json!({
            "criticalPath": ["T1", "T3", "T4"],
            "healthScore": 64,
            "scoreReasoning": "Alice owns two long critical tasks.",
            "riskAnalysis": [
                { "taskId": "T5", "taskName": "", "risk": "Long task", "recommendation": "Split it" },
                { "taskId": "T7", "taskName": "Integration", "risk": "Merge point", "recommendation": "Buffer" }
            ]
        });
        let result = parse_analysis_response(&wrap(&analysis.to_string()), &initial_tasks()).unwrap();

        assert_eq!(result.critical_path, vec!["T1", "T3", "T4"]);
        assert_eq!(
            result.risk_analysis[0].task_name.as_deref(),
            Some("Develop Core Feature A")
        );
        // Names supplied by the service are kept
        assert_eq!(result.risk_analysis[1].task_name.as_deref(), Some("Integration"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_score() {
        let analysis = r#"{"criticalPath":[],"healthScore":140,"scoreReasoning":"","riskAnalysis":[]}"#;
        let err = parse_analysis_response(&wrap(analysis), &[]).unwrap_err();
        assert!(matches!(err, AnalysisServiceError::SchemaMismatch(_)));
    }

    #[test]
    fn test_parse_empty_candidates() {
        let err = parse_analysis_response(r#"{"candidates": []}"#, &[]).unwrap_err();
        assert!(matches!(err, AnalysisServiceError::EmptyResponse));
    }

    #[test]
    fn test_parse_malformed_analysis_text() {
        let err = parse_analysis_response(&wrap("not json at all"), &[]).unwrap_err();
        assert!(matches!(err, AnalysisServiceError::Malformed(_)));

        let err = parse_analysis_response(&wrap(r#"{"criticalPath": "T1"}"#), &[]).unwrap_err();
        assert!(matches!(err, AnalysisServiceError::Malformed(_)));
    }
}
