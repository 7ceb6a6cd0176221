use thiserror::Error;

/// Errors raised while resolving a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
  /// `i`, `j` or `k` referenced for a level that was not scattered.
  #[error("'{name}' is not bound: the task was not scattered at that level")]
  Unbound { name: String },

  /// Identifier outside the supported vocabulary.
  #[error("unknown identifier '{name}'")]
  UnknownIdentifier { name: String },

  /// Placeholder content that is not a plain lookup.
  #[error("invalid expression '{expr}'")]
  InvalidExpression { expr: String },

  /// `shard_idx[n]` past the last scatter level.
  #[error("shard_idx[{index}] is out of range for {len} scatter levels")]
  ShardOutOfRange { index: usize, len: usize },

  /// Substituted values kept producing placeholders.
  #[error("'{template}' still has placeholders after {passes} substitution passes")]
  Unresolvable { template: String, passes: usize },
}
