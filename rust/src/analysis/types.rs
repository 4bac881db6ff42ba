//! Response types of the analysis service.

use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// One risk finding attached to a task.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    #[pyo3(get)]
    pub task_id: String,
    /// Filled from the task list when the service leaves it out.
    #[pyo3(get)]
    #[serde(default)]
    pub task_name: Option<String>,
    #[pyo3(get)]
    pub risk: String,
    #[pyo3(get)]
    pub recommendation: String,
}

#[pymethods]
impl Risk {
    fn __repr__(&self) -> String {
        format!("Risk(task_id={:?}, risk={:?})", self.task_id, self.risk)
    }
}

/// Advisory analysis of a task list.
///
/// Owned by the caller alongside a schedule; its critical path is a hint for
/// highlighting and is not checked against the computed one unless the
/// caller asks for a reconciliation.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[pyo3(get)]
    pub critical_path: Vec<String>,
    /// 0 (extremely high risk) to 100 (healthy).
    #[pyo3(get)]
    pub health_score: f64,
    #[pyo3(get)]
    pub score_reasoning: String,
    #[pyo3(get)]
    pub risk_analysis: Vec<Risk>,
}

#[pymethods]
impl AnalysisResult {
    fn __repr__(&self) -> String {
        format!(
            "AnalysisResult(health_score={}, critical_path={:?}, risks={})",
            self.health_score,
            self.critical_path,
            self.risk_analysis.len()
        )
    }
}
