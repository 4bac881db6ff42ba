//! Built-in demo project and task id allocation.

use rustc_hash::FxHashSet;

use crate::models::Task;

/// The ten-task plan a fresh session starts with.
pub fn initial_tasks() -> Vec<Task> {
    let plan: [(&str, &str, u32, &str, &[&str]); 10] = [
        ("T1", "Project Kickoff & Planning", 3, "Alice", &[]),
        ("T2", "Setup Development Environment", 2, "Bob", &["T1"]),
        ("T3", "Design UI/UX Mockups", 5, "Charlie", &["T1"]),
        ("T4", "Develop Authentication Module", 7, "Bob", &["T2", "T3"]),
        ("T5", "Develop Core Feature A", 10, "Alice", &["T4"]),
        ("T6", "Develop Core Feature B", 8, "David", &["T4"]),
        ("T7", "Integrate Features A & B", 4, "Alice", &["T5", "T6"]),
        ("T8", "Quality Assurance Testing", 6, "Eve", &["T7"]),
        ("T9", "User Acceptance Testing", 3, "Charlie", &["T8"]),
        ("T10", "Deploy to Production", 2, "Bob", &["T9"]),
    ];

    plan.iter()
        .map(|&(id, name, duration, assignee, deps)| {
            Task::new(
                id.to_string(),
                name.to_string(),
                duration,
                assignee.to_string(),
                deps.iter().map(|d| d.to_string()).collect(),
            )
        })
        .collect()
}

/// Id for a task appended to `tasks`: `T{n+1}`, skipping ids already taken.
pub fn next_task_id(tasks: &[Task]) -> String {
    let taken: FxHashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    (tasks.len() + 1..)
        .map(|n| format!("T{n}"))
        .find(|id| !taken.contains(id.as_str()))
        .unwrap_or_default()
}
