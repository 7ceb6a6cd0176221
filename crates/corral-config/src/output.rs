use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::ordered::OrderedMap;

/// Templates for one output variable of one task.
///
/// Each field is resolved independently against the same matched file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputSpec {
  /// Destination path relative to the output directory.
  /// If absent, the file stays where it is.
  #[serde(default)]
  pub path: Option<String>,

  /// Report table entry text. `/` separates category from name.
  #[serde(default)]
  pub table: Option<String>,

  /// UCSC browser track line, only used when the placed file has a URL.
  #[serde(default, rename = "ucsc_track")]
  pub track: Option<String>,
}

/// All output entries declared for one task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutputs {
  pub task_name: String,
  pub outputs: Vec<(String, OutputSpec)>,
}

/// A loaded output definition document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "OrderedMap<OrderedMap<OutputSpec>>")]
pub struct OutputDefinition {
  tasks: Vec<TaskOutputs>,
}

impl From<OrderedMap<OrderedMap<OutputSpec>>> for OutputDefinition {
  fn from(document: OrderedMap<OrderedMap<OutputSpec>>) -> Self {
    let tasks = document
      .0
      .into_iter()
      .map(|(task_name, outputs)| TaskOutputs {
        task_name,
        outputs: outputs.0,
      })
      .collect();
    Self { tasks }
  }
}

impl OutputDefinition {
  /// Parse an output definition from JSON text.
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    let definition: Self = serde_json::from_str(json)?;
    if definition.tasks.is_empty() {
      return Err(ConfigError::Empty);
    }
    Ok(definition)
  }

  /// Read and parse an output definition file.
  pub async fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = tokio::fs::read_to_string(path)
      .await
      .map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
      })?;
    Self::from_json(&content)
  }

  /// Tasks in declaration order.
  pub fn tasks(&self) -> &[TaskOutputs] {
    &self.tasks
  }

  /// Every `(task name, output name, spec)` entry in declaration order.
  pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &OutputSpec)> {
    self.tasks.iter().flat_map(|task| {
      task
        .outputs
        .iter()
        .map(move |(output_name, spec)| (task.task_name.as_str(), output_name.as_str(), spec))
    })
  }
}
