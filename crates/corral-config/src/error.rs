use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading an output definition.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The document could not be read.
  #[error("failed to read output definition {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The document is not valid JSON or has the wrong shape.
  #[error("failed to parse output definition: {0}")]
  Parse(#[from] serde_json::Error),

  /// The document defines no tasks.
  #[error("output definition is empty")]
  Empty,

  /// No output definition was given and none could be found.
  #[error(
    "output definition is not defined: pass --out-def-json or add \"#CROO out_def <location>\" to the WDL"
  )]
  Missing,
}
