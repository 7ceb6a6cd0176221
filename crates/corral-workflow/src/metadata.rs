//! Cromwell metadata parsing.
//!
//! A metadata document looks like:
//!
//! ```json
//! {
//!   "id": "6a3b...",
//!   "workflowName": "atac",
//!   "submittedFiles": { "workflow": "...WDL source..." },
//!   "calls": {
//!     "atac.align": [
//!       { "shardIndex": 0, "executionStatus": "Done", "outputs": { "bam": "/work/a.bam" } }
//!     ],
//!     "atac.sub": [
//!       { "shardIndex": -1, "subWorkflowMetadata": { "calls": { ... } } }
//!     ]
//!   }
//! }
//! ```
//!
//! Each nesting level of `subWorkflowMetadata` adds one level to the
//! [`ScatterIndex`] of the calls below it.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::MetadataError;
use crate::graph::TaskGraph;
use crate::task::{ScatterIndex, TaskRecord};

/// Marker for an output definition location embedded in the WDL source.
const OUT_DEF_MARKER: [&str; 2] = ["CROO", "out_def"];

/// URI schemes recognized as file locations in call outputs.
const FILE_SCHEMES: [&str; 5] = ["gs", "s3", "http", "https", "file"];

/// A single workflow run's metadata document.
#[derive(Debug, Clone)]
pub struct WorkflowMetadata {
  document: Map<String, Value>,
}

impl WorkflowMetadata {
  /// Parse a metadata document from JSON text.
  pub fn from_json(json: &str) -> Result<Self, MetadataError> {
    let value: Value = serde_json::from_str(json)?;
    Self::from_value(value)
  }

  /// Build from an already parsed document.
  ///
  /// A list of documents is accepted: the first one is used and the rest is
  /// discarded with a warning.
  pub fn from_value(value: Value) -> Result<Self, MetadataError> {
    match value {
      Value::Object(document) => Ok(Self { document }),
      Value::Array(documents) => {
        let total = documents.len();
        match documents.into_iter().next() {
          None => Err(MetadataError::Empty),
          Some(Value::Object(document)) => {
            if total > 1 {
              warn!(
                discarded = total - 1,
                "metadata contains multiple workflow documents, using the first"
              );
            }
            Ok(Self { document })
          }
          Some(_) => Err(MetadataError::InvalidDocument(
            "first element of metadata list is not an object".to_string(),
          )),
        }
      }
      _ => Err(MetadataError::InvalidDocument(
        "expected an object or a list of objects".to_string(),
      )),
    }
  }

  /// Workflow run ID, or `"unknown"` when the document has none.
  pub fn workflow_id(&self) -> &str {
    self
      .document
      .get("id")
      .and_then(Value::as_str)
      .unwrap_or("unknown")
  }

  pub fn workflow_name(&self) -> Option<&str> {
    self.document.get("workflowName").and_then(Value::as_str)
  }

  /// Output definition location declared in the submitted WDL with a
  /// `#CROO out_def <location>` comment line.
  pub fn out_def_hint(&self) -> Option<&str> {
    let source = self
      .document
      .get("submittedFiles")?
      .get("workflow")?
      .as_str()?;

    source.lines().find_map(|line| {
      let comment = line.trim_start().strip_prefix('#')?;
      let mut words = comment.split_whitespace();
      if words.next()? != OUT_DEF_MARKER[0] || words.next()? != OUT_DEF_MARKER[1] {
        return None;
      }
      words.next()
    })
  }

  /// Build the task graph from the document's calls, in document order.
  pub fn task_graph(&self) -> TaskGraph {
    let mut tasks = Vec::new();
    if let Some(calls) = self.document.get("calls").and_then(Value::as_object) {
      collect_calls(calls, None, &mut tasks);
    }
    TaskGraph::new(tasks)
  }
}

fn collect_calls(
  calls: &Map<String, Value>,
  parent: Option<&ScatterIndex>,
  tasks: &mut Vec<TaskRecord>,
) {
  for (task_name, entries) in calls {
    let Some(entries) = entries.as_array() else {
      continue;
    };

    for entry in entries {
      if let Some(status) = entry.get("executionStatus").and_then(Value::as_str)
        && status != "Done"
      {
        continue;
      }

      let shard = entry.get("shardIndex").and_then(Value::as_i64).unwrap_or(-1);
      let scatter_index = match parent {
        Some(parent) => parent.nested(shard),
        None => ScatterIndex::top_level(shard),
      };

      let mut outputs = Vec::new();
      if let Some(values) = entry.get("outputs").and_then(Value::as_object) {
        for (name, value) in values {
          flatten_files(name, value, &mut outputs);
        }
      }
      tasks.push(TaskRecord::new(task_name.clone(), scatter_index.clone(), outputs));

      if let Some(sub_calls) = entry
        .get("subWorkflowMetadata")
        .and_then(|sub| sub.get("calls"))
        .and_then(Value::as_object)
      {
        collect_calls(sub_calls, Some(&scatter_index), tasks);
      }
    }
  }
}

/// Push every file location in `value` under `name`, descending into arrays.
fn flatten_files(name: &str, value: &Value, outputs: &mut Vec<(String, String)>) {
  match value {
    Value::String(location) if is_file_location(location) => {
      outputs.push((name.to_string(), location.clone()));
    }
    Value::Array(items) => {
      for item in items {
        flatten_files(name, item, outputs);
      }
    }
    _ => {}
  }
}

fn is_file_location(s: &str) -> bool {
  if s.starts_with('/') {
    return true;
  }
  match s.split_once("://") {
    Some((scheme, rest)) => !rest.is_empty() && FILE_SCHEMES.contains(&scheme),
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_is_file_location() {
    assert!(is_file_location("/work/a.bam"));
    assert!(is_file_location("gs://bucket/a.bam"));
    assert!(is_file_location("s3://bucket/a.bam"));
    assert!(!is_file_location("relative/a.bam"));
    assert!(!is_file_location("ftp://host/a.bam"));
    assert!(!is_file_location("gs://"));
    assert!(!is_file_location("42"));
  }

  #[test]
  fn test_non_object_document_rejected() {
    let result = WorkflowMetadata::from_value(json!("nope"));
    assert!(matches!(result, Err(MetadataError::InvalidDocument(_))));
  }

  #[test]
  fn test_out_def_hint() {
    let metadata = WorkflowMetadata::from_value(json!({
      "submittedFiles": {
        "workflow": "version 1.0\n  #CROO out_def https://example.org/out_def.json\nworkflow atac {}\n"
      }
    }))
    .unwrap();

    assert_eq!(
      metadata.out_def_hint(),
      Some("https://example.org/out_def.json")
    );
  }

  #[test]
  fn test_out_def_hint_absent() {
    let metadata = WorkflowMetadata::from_value(json!({
      "submittedFiles": { "workflow": "# CROO something_else x\nworkflow atac {}" }
    }))
    .unwrap();
    assert_eq!(metadata.out_def_hint(), None);

    let metadata = WorkflowMetadata::from_value(json!({})).unwrap();
    assert_eq!(metadata.out_def_hint(), None);
    assert_eq!(metadata.workflow_id(), "unknown");
  }

  #[test]
  fn test_non_file_outputs_ignored() {
    let metadata = WorkflowMetadata::from_value(json!({
      "calls": {
        "wf.count": [{
          "shardIndex": -1,
          "outputs": { "n": 3, "flag": true, "label": "rep1", "txt": "/work/n.txt" }
        }]
      }
    }))
    .unwrap();

    let graph = metadata.task_graph();
    let task = graph.tasks().next().unwrap();
    assert_eq!(task.outputs, vec![("txt".to_string(), "/work/n.txt".to_string())]);
  }
}
