//! Earliest-start scheduling over the task dependency graph.
//!
//! Each task starts as soon as its latest-finishing dependency ends, and its
//! level is one more than its deepest dependency. Resolution is an explicit
//! topological pass (Kahn's algorithm) rather than recursion, so arbitrarily
//! deep dependency chains cannot exhaust the stack and cycles surface as
//! tasks the pass never reaches.

use std::collections::VecDeque;
use thiserror::Error;

use crate::config::SchedulerConfig;
use crate::graph::{TaskGraph, TaskIdx};
use crate::models::{ProcessedTask, Schedule, Task};
use crate::{log_changes, log_checks, log_debug};

/// Errors that make a task set unschedulable.
///
/// No partial schedule is produced when any of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: String, dependency: String },
    #[error("Dependency cycle involves task {} ({})", .task, .cycle.join(" -> "))]
    DependencyCycle { task: String, cycle: Vec<String> },
    #[error("Duplicate task id: {0}")]
    DuplicateTask(String),
    #[error("Task {0} has a duration of zero days")]
    ZeroDuration(String),
    #[error("Task {0} ends past the last representable day")]
    DayOverflow(String),
}

/// Computed position of one task.
#[derive(Clone, Copy, Debug)]
struct Slot {
    start: u32,
    end: u32,
    level: u32,
}

/// Compute the schedule for a task set with default settings.
pub fn compute_schedule(tasks: &[Task]) -> Result<Schedule, ValidationError> {
    compute_schedule_with_config(tasks, &SchedulerConfig::default())
}

/// Compute earliest start/end days and levels for every task.
///
/// # Arguments
/// * `tasks` - Task set with unique ids; dependency order is irrelevant
/// * `config` - Scheduler settings (logging verbosity)
///
/// # Returns
/// * `Ok(Schedule)` with one entry per task in input order
/// * `Err(ValidationError)` for unknown dependencies, cycles, duplicate ids,
///   or zero-length tasks
pub fn compute_schedule_with_config(
    tasks: &[Task],
    config: &SchedulerConfig,
) -> Result<Schedule, ValidationError> {
    let verbosity = config.verbosity;

    if let Some(task) = tasks.iter().find(|t| t.duration == 0) {
        log_checks!(verbosity, "Rejecting {}: zero duration", task.id);
        return Err(ValidationError::ZeroDuration(task.id.clone()));
    }

    let graph = TaskGraph::build(tasks)?;
    let n = graph.len();

    // Remaining unresolved dependency edges per task
    let mut remaining: Vec<usize> = (0..n as TaskIdx).map(|i| graph.deps(i).len()).collect();
    let mut slots: Vec<Option<Slot>> = vec![None; n];
    let mut queue: VecDeque<TaskIdx> = (0..n as TaskIdx)
        .filter(|&i| remaining[i as usize] == 0)
        .collect();
    let mut resolved = 0usize;

    while let Some(idx) = queue.pop_front() {
        let task = graph.task(idx);

        let mut start = 0u32;
        let mut level = 0u32;
        for &dep in graph.deps(idx) {
            if let Some(dep_slot) = slots[dep as usize] {
                start = start.max(dep_slot.end);
                level = level.max(dep_slot.level + 1);
            }
        }
        let end = start
            .checked_add(task.duration)
            .ok_or_else(|| ValidationError::DayOverflow(task.id.clone()))?;

        slots[idx as usize] = Some(Slot { start, end, level });
        resolved += 1;
        log_changes!(
            verbosity,
            "Resolved {} days {}..{} (level {})",
            task.id,
            start,
            end,
            level
        );

        for &dependent in graph.dependents(idx) {
            let count = &mut remaining[dependent as usize];
            *count -= 1;
            if *count == 0 {
                log_debug!(verbosity, "  {} is ready", graph.task(dependent).id);
                queue.push_back(dependent);
            }
        }
    }

    if resolved < n {
        let unresolved: Vec<bool> = slots.iter().map(Option::is_none).collect();
        let cycle: Vec<String> = graph
            .find_cycle(&unresolved)
            .unwrap_or_default()
            .into_iter()
            .map(|i| graph.task(i).id.clone())
            .collect();
        let task = cycle.first().cloned().unwrap_or_default();
        log_checks!(verbosity, "Cycle detected through {}", task);
        return Err(ValidationError::DependencyCycle { task, cycle });
    }

    let processed = tasks
        .iter()
        .zip(slots)
        .filter_map(|(task, slot)| {
            slot.map(|s| ProcessedTask {
                task: task.clone(),
                start_date: s.start,
                end_date: s.end,
                level: s.level,
            })
        })
        .collect();

    Ok(Schedule::from_processed(processed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, duration: u32, deps: &[&str]) -> Task {
        Task {
            id: id.to_string(),
            name: format!("Task {id}"),
            duration,
            assignee: "Alice".to_string(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn diamond() -> Vec<Task> {
        vec![
            make_task("T1", 3, &[]),
            make_task("T2", 2, &["T1"]),
            make_task("T3", 5, &["T1"]),
            make_task("T4", 7, &["T2", "T3"]),
        ]
    }

    fn span(schedule: &Schedule, id: &str) -> (u32, u32, u32) {
        let t = schedule.get(id).unwrap();
        (t.start_date, t.end_date, t.level)
    }

    #[test]
    fn test_diamond_example() {
        let schedule = compute_schedule(&diamond()).unwrap();

        assert_eq!(span(&schedule, "T1"), (0, 3, 0));
        assert_eq!(span(&schedule, "T2"), (3, 5, 1));
        assert_eq!(span(&schedule, "T3"), (3, 8, 1));
        assert_eq!(span(&schedule, "T4"), (8, 15, 2));
        assert_eq!(schedule.total_days, 15);
    }

    #[test]
    fn test_input_order_preserved_and_irrelevant() {
        let mut tasks = diamond();
        tasks.reverse();
        let schedule = compute_schedule(&tasks).unwrap();

        let ids: Vec<&str> = schedule.tasks.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["T4", "T3", "T2", "T1"]);
        assert_eq!(span(&schedule, "T4"), (8, 15, 2));
    }

    #[test]
    fn test_empty_input() {
        let schedule = compute_schedule(&[]).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.total_days, 0);
    }

    #[test]
    fn test_idempotent() {
        let tasks = diamond();
        assert_eq!(
            compute_schedule(&tasks).unwrap(),
            compute_schedule(&tasks).unwrap()
        );
    }

    #[test]
    fn test_level_follows_longest_chain_not_latest_end() {
        // c waits on the long root b, but its deepest chain runs through a1 -> a2
        let tasks = vec![
            make_task("a1", 1, &[]),
            make_task("a2", 1, &["a1"]),
            make_task("b", 10, &[]),
            make_task("c", 1, &["a2", "b"]),
        ];
        let schedule = compute_schedule(&tasks).unwrap();
        assert_eq!(span(&schedule, "c"), (10, 11, 2));
    }

    #[test]
    fn test_repeated_dependency_counts_once() {
        let tasks = vec![make_task("a", 2, &[]), make_task("b", 1, &["a", "a"])];
        let schedule = compute_schedule(&tasks).unwrap();
        assert_eq!(span(&schedule, "b"), (2, 3, 1));
    }

    #[test]
    fn test_two_task_cycle() {
        let tasks = vec![make_task("A", 1, &["B"]), make_task("B", 1, &["A"])];
        let err = compute_schedule(&tasks).unwrap_err();

        assert_eq!(
            err,
            ValidationError::DependencyCycle {
                task: "A".to_string(),
                cycle: vec!["A".to_string(), "B".to_string(), "A".to_string()],
            }
        );
        assert_eq!(
            err.to_string(),
            "Dependency cycle involves task A (A -> B -> A)"
        );
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let tasks = vec![make_task("solo", 1, &["solo"])];
        match compute_schedule(&tasks) {
            Err(ValidationError::DependencyCycle { task, cycle }) => {
                assert_eq!(task, "solo");
                assert_eq!(cycle, vec!["solo", "solo"]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_reported_not_downstream_task() {
        let tasks = vec![
            make_task("root", 1, &[]),
            make_task("tail", 1, &["x"]),
            make_task("x", 1, &["root", "y"]),
            make_task("y", 1, &["x"]),
        ];
        match compute_schedule(&tasks) {
            Err(ValidationError::DependencyCycle { task, .. }) => assert_eq!(task, "x"),
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_dependency() {
        let tasks = vec![make_task("T1", 1, &[]), make_task("T2", 1, &["T9"])];
        let err = compute_schedule(&tasks).unwrap_err();
        assert!(err.to_string().contains("T9"));
        assert!(err.to_string().contains("T2"));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let tasks = vec![make_task("T1", 0, &[])];
        assert_eq!(
            compute_schedule(&tasks),
            Err(ValidationError::ZeroDuration("T1".to_string()))
        );
    }

    #[test]
    fn test_day_overflow_rejected() {
        let tasks = vec![make_task("a", u32::MAX, &[]), make_task("b", 1, &["a"])];
        assert_eq!(
            compute_schedule(&tasks),
            Err(ValidationError::DayOverflow("b".to_string()))
        );
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let n = 100_000;
        let tasks: Vec<Task> = (0..n)
            .map(|i| {
                let id = format!("t{i}");
                if i == 0 {
                    make_task(&id, 1, &[])
                } else {
                    let prev = format!("t{}", i - 1);
                    make_task(&id, 1, &[prev.as_str()])
                }
            })
            .collect();
        let schedule = compute_schedule(&tasks).unwrap();
        assert_eq!(schedule.total_days, n as u32);
        assert_eq!(schedule.get("t99999").map(|t| t.level), Some(99_999));
    }
}
