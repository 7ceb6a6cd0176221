use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// Position of a task instance within nested scatter loops.
///
/// Level 0 is the outermost scatter, level 1 the first nested scatter and so
/// on. `-1` at a level means the task was not scattered at that level. An
/// index always has at least one level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct ScatterIndex(Vec<i64>);

impl ScatterIndex {
  /// Create a scatter index from its levels, outermost first.
  pub fn new(levels: Vec<i64>) -> Result<Self, MetadataError> {
    if levels.is_empty() {
      return Err(MetadataError::EmptyScatterIndex);
    }
    Ok(Self(levels))
  }

  /// Index of a task that is not scattered at all.
  pub fn unscattered() -> Self {
    Self(vec![-1])
  }

  /// Raw levels, `-1` included.
  pub fn levels(&self) -> &[i64] {
    &self.0
  }

  /// Number of nesting levels.
  pub fn depth(&self) -> usize {
    self.0.len()
  }

  /// Shard number at `level`, if the level exists and was scattered.
  pub fn shard(&self, level: usize) -> Option<u64> {
    self
      .0
      .get(level)
      .and_then(|&shard| u64::try_from(shard).ok())
  }

  /// Index of a top-level call at `shard`.
  pub(crate) fn top_level(shard: i64) -> Self {
    Self(vec![shard])
  }

  /// Index of a call nested one level deeper at `shard`.
  pub(crate) fn nested(&self, shard: i64) -> Self {
    let mut levels = self.0.clone();
    levels.push(shard);
    Self(levels)
  }
}

impl TryFrom<Vec<i64>> for ScatterIndex {
  type Error = MetadataError;

  fn try_from(levels: Vec<i64>) -> Result<Self, Self::Error> {
    Self::new(levels)
  }
}

impl From<ScatterIndex> for Vec<i64> {
  fn from(index: ScatterIndex) -> Self {
    index.0
  }
}

impl fmt::Display for ScatterIndex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "(")?;
    for (pos, shard) in self.0.iter().enumerate() {
      if pos > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{}", shard)?;
    }
    // One-element tuples keep their comma: `(-1,)`.
    if self.0.len() == 1 {
      write!(f, ",")?;
    }
    write!(f, ")")
  }
}

/// One executed task instance and the files it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
  pub task_name: String,
  pub scatter_index: ScatterIndex,
  /// `(output variable name, file location)` pairs in output order.
  /// A name repeats when an array-of-files output was flattened.
  pub outputs: Vec<(String, String)>,
}

impl TaskRecord {
  pub fn new(
    task_name: impl Into<String>,
    scatter_index: ScatterIndex,
    outputs: Vec<(String, String)>,
  ) -> Self {
    Self {
      task_name: task_name.into(),
      scatter_index,
      outputs,
    }
  }

  /// File locations of every output named `output_name`, in output order.
  pub fn outputs_named<'a>(
    &'a self,
    output_name: &'a str,
  ) -> impl Iterator<Item = &'a str> + 'a {
    self
      .outputs
      .iter()
      .filter(move |(name, _)| name == output_name)
      .map(|(_, location)| location.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_scatter_index_rejected() {
    assert!(matches!(
      ScatterIndex::new(vec![]),
      Err(MetadataError::EmptyScatterIndex)
    ));
  }

  #[test]
  fn test_shard_lookup() {
    let index = ScatterIndex::new(vec![2, -1, 0]).unwrap();
    assert_eq!(index.shard(0), Some(2));
    assert_eq!(index.shard(1), None);
    assert_eq!(index.shard(2), Some(0));
    assert_eq!(index.shard(3), None);
    assert_eq!(index.depth(), 3);
  }

  #[test]
  fn test_display() {
    let index = ScatterIndex::new(vec![0, -1, -1]).unwrap();
    assert_eq!(index.to_string(), "(0, -1, -1)");
    assert_eq!(ScatterIndex::unscattered().to_string(), "(-1,)");
    assert_eq!(ScatterIndex::new(vec![3]).unwrap().to_string(), "(3,)");
  }

  #[test]
  fn test_deserialize_rejects_empty() {
    let result: Result<ScatterIndex, _> = serde_json::from_str("[]");
    assert!(result.is_err());

    let index: ScatterIndex = serde_json::from_str("[1, 2]").unwrap();
    assert_eq!(index.levels(), &[1, 2]);
  }

  #[test]
  fn test_outputs_named_keeps_duplicates() {
    let record = TaskRecord::new(
      "align",
      ScatterIndex::unscattered(),
      vec![
        ("bam".to_string(), "/a.bam".to_string()),
        ("log".to_string(), "/a.log".to_string()),
        ("bam".to_string(), "/b.bam".to_string()),
      ],
    );

    let bams: Vec<&str> = record.outputs_named("bam").collect();
    assert_eq!(bams, vec!["/a.bam", "/b.bam"]);
    assert_eq!(record.outputs_named("bai").count(), 0);
  }
}
