//! Project schedule, timeline layout and critical path computation.
//!
//! Tasks linked by finish-to-start dependencies are resolved into earliest
//! start/end days and dependency levels, ordered for display, and analysed
//! for slack. A client for the external analysis service lives alongside;
//! its results are advisory and never feed back into scheduling.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

pub mod analysis;
mod config;
pub mod critical_path;
mod graph;
pub mod layout;
pub mod logging;
mod models;
pub mod sample;
pub mod scheduler;

pub use analysis::{
    analyze_or_message, AnalysisClient, AnalysisResult, AnalysisServiceError, GeminiClient, Risk,
};
pub use config::{AnalysisConfig, SchedulerConfig};
pub use critical_path::{
    compute_critical_path, reconcile_critical_path, CriticalPath, CriticalPathReport, TaskTiming,
};
pub use layout::{plan_layout, Connector, Layout};
pub use models::{ProcessedTask, Schedule, Task};
pub use scheduler::{compute_schedule, compute_schedule_with_config, ValidationError};

/// Compute earliest start/end days and levels for every task.
///
/// # Raises
/// * ValueError on unknown dependencies, dependency cycles, duplicate ids,
///   or zero-length tasks
#[pyfunction(name = "compute_schedule")]
#[pyo3(signature = (tasks, config=None))]
fn py_compute_schedule(tasks: Vec<Task>, config: Option<SchedulerConfig>) -> PyResult<Schedule> {
    let config = config.unwrap_or_default();
    compute_schedule_with_config(&tasks, &config)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Order a schedule's tasks by start day, then level.
#[pyfunction(name = "plan_layout")]
fn py_plan_layout(schedule: PyRef<'_, Schedule>) -> Layout {
    plan_layout(&schedule)
}

/// Slack per task and the graph-exact critical path.
#[pyfunction(name = "compute_critical_path")]
fn py_compute_critical_path(schedule: PyRef<'_, Schedule>) -> CriticalPath {
    compute_critical_path(&schedule)
}

/// Compare an advisory critical path (e.g. from the analysis service) with
/// the computed one.
#[pyfunction(name = "reconcile_critical_path")]
fn py_reconcile_critical_path(
    computed: PyRef<'_, CriticalPath>,
    advisory: Vec<String>,
) -> CriticalPathReport {
    reconcile_critical_path(&computed, &advisory)
}

/// Ask the external analysis service for risks and a health score.
///
/// Uses `config` when given, otherwise reads `API_KEY` from the environment.
/// The GIL is released for the duration of the request.
///
/// # Raises
/// * RuntimeError with a user-facing message on any failure
#[pyfunction(name = "analyze_project")]
#[pyo3(signature = (tasks, config=None))]
fn py_analyze_project(
    py: Python<'_>,
    tasks: Vec<Task>,
    config: Option<AnalysisConfig>,
) -> PyResult<AnalysisResult> {
    let config = config.unwrap_or_else(AnalysisConfig::from_env);
    let client =
        GeminiClient::new(&config).map_err(|e| PyRuntimeError::new_err(e.user_message()))?;
    let verbosity = config.verbosity;

    py.allow_threads(|| analyze_or_message(&client, &tasks, verbosity))
        .map_err(PyRuntimeError::new_err)
}

/// The built-in demo project.
#[pyfunction(name = "sample_tasks")]
fn py_sample_tasks() -> Vec<Task> {
    sample::initial_tasks()
}

/// Id for the next task appended to `tasks`.
#[pyfunction(name = "next_task_id")]
fn py_next_task_id(tasks: Vec<Task>) -> String {
    sample::next_task_id(&tasks)
}

/// The critpath.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Task>()?;
    m.add_class::<ProcessedTask>()?;
    m.add_class::<Schedule>()?;
    m.add_class::<Layout>()?;
    m.add_class::<Connector>()?;
    m.add_class::<TaskTiming>()?;
    m.add_class::<CriticalPath>()?;
    m.add_class::<CriticalPathReport>()?;

    // Analysis service types
    m.add_class::<Risk>()?;
    m.add_class::<AnalysisResult>()?;

    // Config types
    m.add_class::<SchedulerConfig>()?;
    m.add_class::<AnalysisConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_compute_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_plan_layout, m)?)?;
    m.add_function(wrap_pyfunction!(py_compute_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(py_reconcile_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(py_analyze_project, m)?)?;
    m.add_function(wrap_pyfunction!(py_sample_tasks, m)?)?;
    m.add_function(wrap_pyfunction!(py_next_task_id, m)?)?;

    Ok(())
}
