use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
  #[error("failed to parse metadata JSON: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("metadata document list is empty")]
  Empty,

  #[error("invalid metadata document: {0}")]
  InvalidDocument(String),

  #[error("scatter index must have at least one level")]
  EmptyScatterIndex,
}
