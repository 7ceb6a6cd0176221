use std::path::PathBuf;

use url::Url;

/// A file location: a local path or a URI on some remote storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
  Local(PathBuf),
  Remote(Url),
}

impl Location {
  pub fn parse(location: &str) -> Self {
    if location.contains("://")
      && let Ok(url) = Url::parse(location)
    {
      if url.scheme() == "file"
        && let Ok(path) = url.to_file_path()
      {
        return Location::Local(path);
      }
      return Location::Remote(url);
    }
    Location::Local(PathBuf::from(location))
  }
}
