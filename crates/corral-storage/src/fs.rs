use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::location::Location;
use crate::{PlacementMode, Storage, StorageConfig, StorageError};

/// Filesystem-based storage.
///
/// Destinations must be local paths. Parent directories are created
/// automatically and anything already at the destination is replaced.
pub struct LocalStorage {
  config: StorageConfig,
}

impl LocalStorage {
  /// Create a local storage backend with the given run configuration.
  pub fn new(config: StorageConfig) -> Self {
    Self { config }
  }
}

#[async_trait]
impl Storage for LocalStorage {
  async fn place(
    &self,
    source: &str,
    destination: &str,
    mode: PlacementMode,
  ) -> Result<String, StorageError> {
    if source == destination {
      return Ok(source.to_string());
    }

    let Location::Local(target) = Location::parse(destination) else {
      return Err(StorageError::UnsupportedScheme {
        location: destination.to_string(),
        mode,
      });
    };

    let source_path = match Location::parse(source) {
      Location::Local(path) => path,
      // Remote files cannot be linked into a local tree; they stay put.
      Location::Remote(_) if mode == PlacementMode::Link => {
        debug!(source, "remote source left in place");
        return Ok(source.to_string());
      }
      Location::Remote(_) => {
        return Err(StorageError::UnsupportedScheme {
          location: source.to_string(),
          mode,
        });
      }
    };

    fs::metadata(&source_path).await.map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(source.to_string())
      } else {
        StorageError::Io(e)
      }
    })?;

    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent).await?;
    }
    remove_existing(&target).await?;

    match mode {
      PlacementMode::Copy => copy_file(&source_path, &target).await?,
      PlacementMode::Link => link_file(&source_path, &target).await?,
    }

    debug!(source, destination, %mode, "placed file");
    Ok(target.to_string_lossy().into_owned())
  }

  fn url(&self, location: &str) -> Option<String> {
    self.config.url_for(location)
  }
}

/// Remove a file or link at `target` so placement starts clean. Writing
/// through a link left by an earlier run would clobber its source.
async fn remove_existing(target: &Path) -> Result<(), StorageError> {
  match fs::symlink_metadata(target).await {
    Ok(meta) if !meta.is_dir() => Ok(fs::remove_file(target).await?),
    _ => Ok(()),
  }
}

async fn copy_file(source: &Path, target: &Path) -> Result<(), StorageError> {
  let mut stream = ReaderStream::new(File::open(source).await?);
  let mut file = File::create(target).await?;

  while let Some(chunk) = stream.next().await {
    file.write_all(&chunk?).await?;
  }

  file.flush().await?;
  Ok(())
}

#[cfg(unix)]
async fn link_file(source: &Path, target: &Path) -> Result<(), StorageError> {
  fs::symlink(source, target).await?;
  Ok(())
}

#[cfg(not(unix))]
async fn link_file(source: &Path, target: &Path) -> Result<(), StorageError> {
  copy_file(source, target).await
}
