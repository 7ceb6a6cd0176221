use crate::task::TaskRecord;

/// Ordered, immutable collection of executed task records.
///
/// Iteration order is stable for the life of the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskGraph {
  tasks: Vec<TaskRecord>,
}

impl TaskGraph {
  /// Build a graph from records in traversal order.
  pub fn new(tasks: Vec<TaskRecord>) -> Self {
    Self { tasks }
  }

  /// All records in traversal order.
  pub fn tasks(&self) -> impl Iterator<Item = &TaskRecord> {
    self.tasks.iter()
  }

  /// Records whose task name equals `task_name` exactly.
  pub fn tasks_named<'a>(
    &'a self,
    task_name: &'a str,
  ) -> impl Iterator<Item = &'a TaskRecord> + 'a {
    self
      .tasks
      .iter()
      .filter(move |task| task.task_name == task_name)
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }
}

impl FromIterator<TaskRecord> for TaskGraph {
  fn from_iter<I: IntoIterator<Item = TaskRecord>>(iter: I) -> Self {
    Self::new(iter.into_iter().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ScatterIndex;

  fn record(name: &str, shard: i64) -> TaskRecord {
    TaskRecord::new(name, ScatterIndex::new(vec![shard]).unwrap(), vec![])
  }

  #[test]
  fn test_tasks_named_is_exact_and_ordered() {
    let graph: TaskGraph = vec![
      record("wf.align", 0),
      record("wf.align_qc", 0),
      record("wf.align", 1),
    ]
    .into_iter()
    .collect();

    let shards: Vec<i64> = graph
      .tasks_named("wf.align")
      .map(|t| t.scatter_index.levels()[0])
      .collect();
    assert_eq!(shards, vec![0, 1]);
    assert_eq!(graph.tasks_named("align").count(), 0);
    assert_eq!(graph.len(), 3);
  }
}
