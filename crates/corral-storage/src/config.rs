use std::path::Path;

use crate::StorageError;
use crate::location::Location;

const GCS_PUBLIC_HOST: &str = "https://storage.googleapis.com";

/// Per-run storage settings.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
  /// `(local path prefix, URL prefix)` pairs for serving local files over
  /// HTTP. The longest matching prefix wins.
  pub path_to_url: Vec<(String, String)>,

  /// Whether `gs://` objects are publicly readable through the GCS HTTP
  /// endpoint.
  pub public_gcs: bool,
}

impl StorageConfig {
  /// Read a path-to-URL mapping file.
  ///
  /// Each non-blank line is `<path prefix>\t<url prefix>`.
  pub async fn load_url_mapping(path: &Path) -> Result<Vec<(String, String)>, StorageError> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_url_mapping(&content).map_err(|line| StorageError::InvalidMapping {
      path: path.to_path_buf(),
      line,
    })
  }

  /// URL for `location`, if one can be resolved.
  pub fn url_for(&self, location: &str) -> Option<String> {
    match Location::parse(location) {
      Location::Remote(url) if matches!(url.scheme(), "http" | "https") => Some(url.to_string()),
      Location::Remote(url) if url.scheme() == "gs" && self.public_gcs => {
        let bucket = url.host_str()?;
        Some(format!("{}/{}{}", GCS_PUBLIC_HOST, bucket, url.path()))
      }
      Location::Remote(_) => None,
      Location::Local(_) => self
        .path_to_url
        .iter()
        .filter(|(prefix, _)| location.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(prefix, url_prefix)| format!("{}{}", url_prefix, &location[prefix.len()..])),
    }
  }
}

/// Parse mapping lines. On failure returns the 1-based line number.
fn parse_url_mapping(content: &str) -> Result<Vec<(String, String)>, usize> {
  content
    .lines()
    .enumerate()
    .filter(|(_, line)| !line.trim().is_empty())
    .map(|(n, line)| match line.split('\t').collect::<Vec<_>>().as_slice() {
      [prefix, url] if !prefix.is_empty() && !url.is_empty() => {
        Ok((prefix.to_string(), url.trim_end().to_string()))
      }
      _ => Err(n + 1),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_url_mapping() {
    let mapping = parse_url_mapping(
      "/srv/data\thttps://data.example.org\n\n/srv\thttps://example.org/files\n",
    )
    .unwrap();
    assert_eq!(
      mapping,
      vec![
        (
          "/srv/data".to_string(),
          "https://data.example.org".to_string()
        ),
        ("/srv".to_string(), "https://example.org/files".to_string()),
      ]
    );

    assert_eq!(parse_url_mapping("/srv\n"), Err(1));
    assert_eq!(parse_url_mapping("/a\thttp://a\n/b\tx\ty\n"), Err(2));
  }

  #[test]
  fn test_local_url_longest_prefix() {
    let config = StorageConfig {
      path_to_url: vec![
        ("/srv".to_string(), "https://example.org/files".to_string()),
        ("/srv/data".to_string(), "https://data.example.org".to_string()),
      ],
      public_gcs: false,
    };

    assert_eq!(
      config.url_for("/srv/data/rep1.bam").as_deref(),
      Some("https://data.example.org/rep1.bam")
    );
    assert_eq!(
      config.url_for("/srv/other/rep1.bam").as_deref(),
      Some("https://example.org/files/other/rep1.bam")
    );
    assert_eq!(config.url_for("/home/me/rep1.bam"), None);
  }

  #[test]
  fn test_remote_urls() {
    let private = StorageConfig::default();
    assert_eq!(
      private.url_for("https://host/a.bw").as_deref(),
      Some("https://host/a.bw")
    );
    assert_eq!(private.url_for("gs://bucket/a.bw"), None);
    assert_eq!(private.url_for("s3://bucket/a.bw"), None);

    let public = StorageConfig {
      public_gcs: true,
      ..Default::default()
    };
    assert_eq!(
      public.url_for("gs://bucket/dir/a.bw").as_deref(),
      Some("https://storage.googleapis.com/bucket/dir/a.bw")
    );
  }
}
