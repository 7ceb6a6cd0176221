use corral_config::{OutputDefinition, OutputSpec};
use corral_workflow::{TaskGraph, TaskRecord};

/// An output definition entry paired with one task output it names.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
  pub task_name: &'a str,
  pub output_name: &'a str,
  pub spec: &'a OutputSpec,
  pub task: &'a TaskRecord,
  pub file_location: &'a str,
}

/// Every match of one definition entry, in task graph order and then task
/// output order. Repeated output names yield one match each.
pub fn matches_for<'a>(
  graph: &'a TaskGraph,
  task_name: &'a str,
  output_name: &'a str,
  spec: &'a OutputSpec,
) -> impl Iterator<Item = Match<'a>> + 'a {
  graph.tasks_named(task_name).flat_map(move |task| {
    task
      .outputs_named(output_name)
      .map(move |file_location| Match {
        task_name,
        output_name,
        spec,
        task,
        file_location,
      })
  })
}

/// Every match of the whole definition, in declaration order.
pub fn matches<'a>(
  definition: &'a OutputDefinition,
  graph: &'a TaskGraph,
) -> impl Iterator<Item = Match<'a>> + 'a {
  definition
    .entries()
    .flat_map(move |(task_name, output_name, spec)| {
      matches_for(graph, task_name, output_name, spec)
    })
}
