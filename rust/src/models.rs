//! Core data types for project scheduling.

use pyo3::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A unit of work with finish-to-start dependencies.
///
/// Tasks are created by the caller and never mutated by the scheduler.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    /// Duration in whole days.
    #[pyo3(get, set)]
    pub duration: u32,
    #[pyo3(get, set)]
    pub assignee: String,
    /// Ids of tasks that must finish before this one can start.
    #[pyo3(get, set)]
    pub dependencies: Vec<String>,
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (id, name, duration, assignee, dependencies=Vec::new()))]
    pub fn new(
        id: String,
        name: String,
        duration: u32,
        assignee: String,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            id,
            name,
            duration,
            assignee,
            dependencies,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, duration={}, deps={:?})",
            self.id, self.duration, self.dependencies
        )
    }
}

/// A task with its computed position on the day-indexed timeline.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedTask {
    #[pyo3(get)]
    #[serde(flatten)]
    pub task: Task,
    /// Earliest day the task can begin (0-based).
    #[pyo3(get)]
    pub start_date: u32,
    /// `start_date + duration`.
    #[pyo3(get)]
    pub end_date: u32,
    /// Longest dependency chain leading to this task; 0 for roots.
    #[pyo3(get)]
    pub level: u32,
}

impl ProcessedTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn duration(&self) -> u32 {
        self.task.duration
    }
}

#[pymethods]
impl ProcessedTask {
    #[getter(id)]
    fn py_id(&self) -> String {
        self.task.id.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "ProcessedTask(id={:?}, start={}, end={}, level={})",
            self.task.id, self.start_date, self.end_date, self.level
        )
    }
}

/// Result of one scheduling run.
///
/// Holds one processed task per input task, in input order, plus the overall
/// project span.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    #[pyo3(get)]
    pub tasks: Vec<ProcessedTask>,
    /// Maximum end day over all tasks (0 when empty).
    #[pyo3(get)]
    pub total_days: u32,
    positions: FxHashMap<String, usize>,
}

impl Schedule {
    pub(crate) fn from_processed(tasks: Vec<ProcessedTask>) -> Self {
        let total_days = tasks.iter().map(|t| t.end_date).max().unwrap_or(0);
        let positions = tasks
            .iter()
            .enumerate()
            .map(|(pos, t)| (t.task.id.clone(), pos))
            .collect();
        Self {
            tasks,
            total_days,
            positions,
        }
    }

    /// Look up a processed task by id.
    pub fn get(&self, id: &str) -> Option<&ProcessedTask> {
        self.position(id).map(|pos| &self.tasks[pos])
    }

    /// Input position of a task id.
    #[inline]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[pymethods]
impl Schedule {
    #[pyo3(name = "get")]
    fn py_get(&self, id: &str) -> Option<ProcessedTask> {
        self.get(id).cloned()
    }

    fn __len__(&self) -> usize {
        self.len()
    }

    fn __contains__(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    fn __repr__(&self) -> String {
        format!(
            "Schedule(tasks={}, total_days={})",
            self.tasks.len(),
            self.total_days
        )
    }
}
