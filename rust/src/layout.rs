//! Row ordering of a computed schedule for timeline presentation.

use pyo3::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::models::{ProcessedTask, Schedule};

/// Tasks in display order plus the overall span.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Sorted by start day, then level; ties keep input order.
    #[pyo3(get)]
    pub ordered_tasks: Vec<ProcessedTask>,
    #[pyo3(get)]
    pub total_days: u32,
    #[serde(skip)]
    rows: FxHashMap<String, usize>,
}

/// A directed edge from a dependency's end to its dependent's start.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    #[pyo3(get)]
    pub from_id: String,
    #[pyo3(get)]
    pub to_id: String,
    #[pyo3(get)]
    pub from_row: usize,
    #[pyo3(get)]
    pub to_row: usize,
    /// Day the dependency ends.
    #[pyo3(get)]
    pub from_day: u32,
    /// Day the dependent starts.
    #[pyo3(get)]
    pub to_day: u32,
    /// Both endpoints are in the highlighted critical set.
    #[pyo3(get)]
    pub critical: bool,
}

/// Order a schedule's tasks for display.
///
/// The sort is stable, so tasks sharing a start day and level appear in
/// their original input order. An empty schedule yields an empty layout.
pub fn plan_layout(schedule: &Schedule) -> Layout {
    let mut ordered_tasks = schedule.tasks.clone();
    ordered_tasks.sort_by_key(|t| (t.start_date, t.level));

    let total_days = ordered_tasks.iter().map(|t| t.end_date).max().unwrap_or(0);
    let rows = ordered_tasks
        .iter()
        .enumerate()
        .map(|(row, t)| (t.task.id.clone(), row))
        .collect();

    Layout {
        ordered_tasks,
        total_days,
        rows,
    }
}

impl Layout {
    /// Display row of a task.
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.rows.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.ordered_tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_tasks.is_empty()
    }

    /// One connector per distinct dependency edge, grouped by dependent row.
    ///
    /// `critical_ids` is any externally chosen highlight set, typically the
    /// computed or advisory critical path.
    pub fn connectors<S: AsRef<str>>(&self, critical_ids: &[S]) -> Vec<Connector> {
        let critical: FxHashSet<&str> = critical_ids.iter().map(|s| s.as_ref()).collect();
        let mut connectors = Vec::new();

        for (to_row, task) in self.ordered_tasks.iter().enumerate() {
            let mut seen: FxHashSet<&str> = FxHashSet::default();
            for dep_id in &task.task.dependencies {
                if !seen.insert(dep_id.as_str()) {
                    continue;
                }
                let Some(from_row) = self.row_of(dep_id) else {
                    continue;
                };
                let dep = &self.ordered_tasks[from_row];
                connectors.push(Connector {
                    from_id: dep_id.clone(),
                    to_id: task.task.id.clone(),
                    from_row,
                    to_row,
                    from_day: dep.end_date,
                    to_day: task.start_date,
                    critical: critical.contains(dep_id.as_str())
                        && critical.contains(task.task.id.as_str()),
                });
            }
        }

        connectors
    }
}

#[pymethods]
impl Layout {
    #[pyo3(name = "row_of")]
    fn py_row_of(&self, id: &str) -> Option<usize> {
        self.row_of(id)
    }

    #[pyo3(name = "connectors", signature = (critical_ids=Vec::new()))]
    fn py_connectors(&self, critical_ids: Vec<String>) -> Vec<Connector> {
        self.connectors(&critical_ids)
    }

    fn __len__(&self) -> usize {
        self.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Layout(rows={}, total_days={})",
            self.ordered_tasks.len(),
            self.total_days
        )
    }
}

#[pymethods]
impl Connector {
    fn __repr__(&self) -> String {
        format!(
            "Connector({} -> {}, rows {}->{}, critical={})",
            self.from_id, self.to_id, self.from_row, self.to_row, self.critical
        )
    }
}
