//! Corral Storage
//!
//! This crate places workflow output files at their organized destination and
//! resolves locations to URLs a browser can open.
//!
//! The [`Storage`] trait is the backend layer. [`LocalStorage`] implements it
//! for the local filesystem: files are copied or symlinked into the output
//! directory. Remote sources (`gs://`, `s3://`, `http(s)://`) can be linked,
//! which leaves them where they are, but not copied.
//!
//! URL resolution is driven by [`StorageConfig`], built explicitly for each
//! run and handed to the backend.

mod config;
mod fs;
mod location;

pub use config::StorageConfig;
pub use fs::LocalStorage;
pub use location::Location;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

/// How a file is realized at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
  /// Write an independent copy.
  Copy,
  /// Create a symbolic link back to the source.
  #[default]
  Link,
}

impl fmt::Display for PlacementMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PlacementMode::Copy => f.write_str("copy"),
      PlacementMode::Link => f.write_str("link"),
    }
  }
}

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  /// The source file does not exist.
  #[error("file not found: {0}")]
  NotFound(String),

  /// The location uses a storage this backend cannot write to or copy from.
  #[error("unsupported storage for {mode}: {location}")]
  UnsupportedScheme {
    location: String,
    mode: PlacementMode,
  },

  /// A path-to-URL mapping file line is not `<path prefix>\t<url prefix>`.
  #[error("invalid path-to-URL mapping at {path}:{line}")]
  InvalidMapping { path: PathBuf, line: usize },

  /// An I/O error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Storage backend trait.
///
/// Implementations realize a file at a destination and know how to turn a
/// location into a URL.
#[async_trait]
pub trait Storage: Send + Sync {
  /// Place `source` at `destination` and return the final location.
  ///
  /// Placing a file onto itself is a no-op. Repeating the same call must
  /// succeed and leave the same result.
  async fn place(
    &self,
    source: &str,
    destination: &str,
    mode: PlacementMode,
  ) -> Result<String, StorageError>;

  /// URL for a location, if one can be resolved.
  fn url(&self, location: &str) -> Option<String>;
}
