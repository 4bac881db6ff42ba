//! Integer-indexed dependency graph for a task set.
//!
//! Task ids are mapped to dense `u32` indices in input order so the
//! scheduling pass runs over plain vectors; strings only appear at the
//! boundaries.

use rustc_hash::FxHashMap;

use crate::models::Task;
use crate::scheduler::ValidationError;

/// Dense index of a task within its input slice.
pub type TaskIdx = u32;

/// Validated view of a task slice: unique ids, every dependency resolved.
#[derive(Debug)]
pub struct TaskGraph<'a> {
    tasks: &'a [Task],
    /// Dependency indices per task, in declaration order.
    deps: Vec<Vec<TaskIdx>>,
    /// Reverse edges: tasks that list this task as a dependency.
    dependents: Vec<Vec<TaskIdx>>,
}

impl<'a> TaskGraph<'a> {
    /// Index the tasks, rejecting duplicate ids and unknown dependencies.
    ///
    /// Errors are reported for the first offending task in input order.
    pub fn build(tasks: &'a [Task]) -> Result<Self, ValidationError> {
        let mut index: FxHashMap<&str, TaskIdx> =
            FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.id.as_str(), i as TaskIdx).is_some() {
                return Err(ValidationError::DuplicateTask(task.id.clone()));
            }
        }

        let n = tasks.len();
        let mut deps: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];

        for (i, task) in tasks.iter().enumerate() {
            for dep_id in &task.dependencies {
                let Some(&dep) = index.get(dep_id.as_str()) else {
                    return Err(ValidationError::UnknownDependency {
                        task: task.id.clone(),
                        dependency: dep_id.clone(),
                    });
                };
                deps[i].push(dep);
                dependents[dep as usize].push(i as TaskIdx);
            }
        }

        Ok(Self {
            tasks,
            deps,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn task(&self, idx: TaskIdx) -> &'a Task {
        &self.tasks[idx as usize]
    }

    #[inline]
    pub fn deps(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.deps[idx as usize]
    }

    #[inline]
    pub fn dependents(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.dependents[idx as usize]
    }

    /// Find one dependency cycle among the `unresolved` tasks.
    ///
    /// Every unresolved task left over by a topological pass has at least one
    /// unresolved dependency, so following those edges from any of them must
    /// revisit a task. The returned path starts and ends on the same task,
    /// e.g. `[a, b, a]` for "a depends on b depends on a".
    pub fn find_cycle(&self, unresolved: &[bool]) -> Option<Vec<TaskIdx>> {
        let start = unresolved.iter().position(|&u| u)? as TaskIdx;

        let mut path: Vec<TaskIdx> = Vec::new();
        let mut seen_at: Vec<Option<usize>> = vec![None; self.len()];
        let mut current = start;

        loop {
            if let Some(pos) = seen_at[current as usize] {
                let mut cycle = path.split_off(pos);
                cycle.push(current);
                return Some(cycle);
            }
            seen_at[current as usize] = Some(path.len());
            path.push(current);

            current = *self
                .deps(current)
                .iter()
                .find(|&&dep| unresolved[dep as usize])?;
        }
    }
}
