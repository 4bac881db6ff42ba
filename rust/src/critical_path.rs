//! Critical path of a computed schedule using a backward pass.
//!
//! The forward pass is the schedule itself (earliest start/finish). The
//! backward pass pushes the project end back through dependents to get
//! latest start/finish; tasks with zero slack are critical.

use pyo3::prelude::*;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::cmp::Reverse;

use crate::models::Schedule;

/// Per-task timing from the forward and backward passes.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTiming {
    #[pyo3(get)]
    pub task_id: String,
    #[pyo3(get)]
    pub earliest_start: u32,
    #[pyo3(get)]
    pub earliest_finish: u32,
    #[pyo3(get)]
    pub latest_start: u32,
    #[pyo3(get)]
    pub latest_finish: u32,
    /// `latest_start - earliest_start`.
    #[pyo3(get)]
    pub slack: u32,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.slack == 0
    }
}

/// Graph-exact critical path of a schedule.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CriticalPath {
    /// Project length; equals the schedule's total days.
    #[pyo3(get)]
    pub length: u32,
    /// Timing for every task, in schedule input order.
    #[pyo3(get)]
    pub timings: Vec<TaskTiming>,
    /// Ids of all zero-slack tasks, in schedule input order.
    #[pyo3(get)]
    pub tasks: Vec<String>,
    /// One root-to-end sequence of critical tasks spanning `length`.
    #[pyo3(get)]
    pub chain: Vec<String>,
}

impl CriticalPath {
    pub fn contains(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t == id)
    }

    pub fn timing(&self, id: &str) -> Option<&TaskTiming> {
        self.timings.iter().find(|t| t.task_id == id)
    }
}

#[pymethods]
impl CriticalPath {
    fn __contains__(&self, id: &str) -> bool {
        self.contains(id)
    }

    fn __repr__(&self) -> String {
        format!(
            "CriticalPath(length={}, chain={:?})",
            self.length, self.chain
        )
    }
}

/// Comparison of an advisory critical path against the computed one.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPathReport {
    /// Advisory ids that are also critical.
    #[pyo3(get)]
    pub confirmed: Vec<String>,
    /// Advisory ids that exist but have slack.
    #[pyo3(get)]
    pub advisory_only: Vec<String>,
    /// Critical ids the advisory path missed.
    #[pyo3(get)]
    pub computed_only: Vec<String>,
    /// Advisory ids not present in the schedule at all.
    #[pyo3(get)]
    pub unknown_ids: Vec<String>,
    #[pyo3(get)]
    pub is_consistent: bool,
}

/// Compute slack for every task and extract the critical path.
pub fn compute_critical_path(schedule: &Schedule) -> CriticalPath {
    let tasks = &schedule.tasks;
    let n = tasks.len();
    if n == 0 {
        return CriticalPath::default();
    }
    let length = schedule.total_days;

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (pos, task) in tasks.iter().enumerate() {
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        for dep_id in &task.task.dependencies {
            if let Some(dep_pos) = schedule.position(dep_id) {
                if seen.insert(dep_pos) {
                    dependents[dep_pos].push(pos);
                }
            }
        }
    }

    // Durations are positive, so a dependency always starts strictly before
    // its dependents: descending start day is a reverse topological order.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| Reverse(tasks[i].start_date));

    let mut latest_start = vec![0u32; n];
    let mut latest_finish = vec![0u32; n];
    for &i in &order {
        let finish = dependents[i]
            .iter()
            .map(|&d| latest_start[d])
            .min()
            .unwrap_or(length);
        latest_finish[i] = finish;
        latest_start[i] = finish.saturating_sub(tasks[i].duration());
    }

    let timings: Vec<TaskTiming> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| TaskTiming {
            task_id: t.task.id.clone(),
            earliest_start: t.start_date,
            earliest_finish: t.end_date,
            latest_start: latest_start[i],
            latest_finish: latest_finish[i],
            slack: latest_start[i].saturating_sub(t.start_date),
        })
        .collect();

    let critical_ids: Vec<String> = timings
        .iter()
        .filter(|t| t.is_critical())
        .map(|t| t.task_id.clone())
        .collect();

    // Walk one chain: a zero-slack root, then always the first zero-slack
    // dependent that starts exactly when the current task ends.
    let mut chain = Vec::new();
    let mut current = (0..n).find(|&i| timings[i].is_critical() && tasks[i].level == 0);
    while let Some(i) = current {
        chain.push(tasks[i].task.id.clone());
        if tasks[i].end_date >= length {
            break;
        }
        current = dependents[i]
            .iter()
            .copied()
            .find(|&d| timings[d].is_critical() && tasks[d].start_date == tasks[i].end_date);
    }

    CriticalPath {
        length,
        timings,
        tasks: critical_ids,
        chain,
    }
}

/// Compare an externally supplied critical path with the computed one.
///
/// Advisory ids are deduplicated keeping their first occurrence; list order
/// follows the advisory input, except `computed_only` which follows the
/// schedule.
pub fn reconcile_critical_path<S: AsRef<str>>(
    computed: &CriticalPath,
    advisory: &[S],
) -> CriticalPathReport {
    let known: FxHashSet<&str> = computed.timings.iter().map(|t| t.task_id.as_str()).collect();
    let critical: FxHashSet<&str> = computed.tasks.iter().map(|s| s.as_str()).collect();

    let mut report = CriticalPathReport::default();
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for id in advisory.iter().map(|s| s.as_ref()) {
        if !seen.insert(id) {
            continue;
        }
        if !known.contains(id) {
            report.unknown_ids.push(id.to_string());
        } else if critical.contains(id) {
            report.confirmed.push(id.to_string());
        } else {
            report.advisory_only.push(id.to_string());
        }
    }

    report.computed_only = computed
        .tasks
        .iter()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();

    report.is_consistent = report.advisory_only.is_empty()
        && report.computed_only.is_empty()
        && report.unknown_ids.is_empty();
    report
}
