//! Task graph construction from Cromwell metadata documents.

use corral_workflow::{MetadataError, WorkflowMetadata};
use serde_json::json;

fn scattered_metadata() -> serde_json::Value {
  json!({
    "id": "wf-1234",
    "workflowName": "atac",
    "calls": {
      "atac.align": [
        {
          "shardIndex": 0,
          "executionStatus": "Done",
          "outputs": { "bam": "/work/align/shard-0/rep1.bam", "read_len": 76 }
        },
        {
          "shardIndex": 1,
          "executionStatus": "Done",
          "outputs": { "bam": "/work/align/shard-1/rep2.bam", "read_len": 76 }
        },
        {
          "shardIndex": 2,
          "executionStatus": "Failed",
          "outputs": {}
        }
      ],
      "atac.call_peak": [
        {
          "shardIndex": -1,
          "executionStatus": "Done",
          "subWorkflowMetadata": {
            "calls": {
              "call_peak.macs2": [
                {
                  "shardIndex": 0,
                  "executionStatus": "Done",
                  "outputs": {
                    "peaks": ["gs://bucket/macs2/a.narrowPeak.gz", "gs://bucket/macs2/b.narrowPeak.gz"]
                  }
                }
              ]
            }
          }
        }
      ]
    }
  })
}

#[test]
fn test_scattered_calls_become_records() {
  let metadata = WorkflowMetadata::from_value(scattered_metadata()).unwrap();
  let graph = metadata.task_graph();

  assert_eq!(metadata.workflow_id(), "wf-1234");
  assert_eq!(metadata.workflow_name(), Some("atac"));

  let aligns: Vec<_> = graph.tasks_named("atac.align").collect();
  assert_eq!(aligns.len(), 2, "failed shard should be skipped");
  assert_eq!(aligns[0].scatter_index.levels(), &[0]);
  assert_eq!(aligns[1].scatter_index.levels(), &[1]);
  assert_eq!(
    aligns[1].outputs,
    vec![("bam".to_string(), "/work/align/shard-1/rep2.bam".to_string())]
  );
}

#[test]
fn test_subworkflow_calls_nest_scatter_index() {
  let metadata = WorkflowMetadata::from_value(scattered_metadata()).unwrap();
  let graph = metadata.task_graph();

  let names: Vec<&str> = graph.tasks().map(|t| t.task_name.as_str()).collect();
  assert_eq!(
    names,
    vec!["atac.align", "atac.align", "atac.call_peak", "call_peak.macs2"]
  );

  let macs2 = graph.tasks_named("call_peak.macs2").next().unwrap();
  assert_eq!(macs2.scatter_index.levels(), &[-1, 0]);

  let peaks: Vec<&str> = macs2.outputs_named("peaks").collect();
  assert_eq!(
    peaks,
    vec![
      "gs://bucket/macs2/a.narrowPeak.gz",
      "gs://bucket/macs2/b.narrowPeak.gz"
    ]
  );
}

#[test]
fn test_metadata_list_uses_first_document() {
  let json = json!([
    { "id": "first", "calls": {} },
    { "id": "second", "calls": {} }
  ])
  .to_string();

  let metadata = WorkflowMetadata::from_json(&json).unwrap();
  assert_eq!(metadata.workflow_id(), "first");
}

#[test]
fn test_empty_metadata_list_is_an_error() {
  let result = WorkflowMetadata::from_json("[]");
  assert!(matches!(result, Err(MetadataError::Empty)));
}

#[test]
fn test_malformed_metadata_is_an_error() {
  let result = WorkflowMetadata::from_json("{ not json");
  assert!(matches!(result, Err(MetadataError::Parse(_))));
}
