//! Run inputs resolved from command-line flags and workflow metadata.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use corral_config::{ConfigError, OutputDefinition};
use corral_storage::{Location, StorageConfig};
use corral_workflow::WorkflowMetadata;

/// Where the output definition is read from.
#[derive(Debug, PartialEq)]
pub(crate) enum DefinitionSource {
  Local(PathBuf),
  /// An `http(s)` URL. `gs://` hints are turned into their public URL.
  Remote(String),
}

/// Absolute output directory for `out_dir`, or the current directory.
pub(crate) fn resolve_out_dir(out_dir: Option<&str>) -> Result<PathBuf> {
  match out_dir {
    Some(dir) => match Location::parse(dir) {
      Location::Local(path) => std::path::absolute(expand_home(&path))
        .with_context(|| format!("failed to resolve output directory: {}", dir)),
      Location::Remote(_) => bail!("output directory must be local: {}", dir),
    },
    None => std::env::current_dir().context("failed to determine current directory"),
  }
}

/// Resolve the output directory and create it if missing.
pub(crate) async fn prepare_out_dir(out_dir: Option<&str>) -> Result<PathBuf> {
  let out_dir = resolve_out_dir(out_dir)?;
  tokio::fs::create_dir_all(&out_dir)
    .await
    .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;
  Ok(out_dir)
}

/// Pick the output definition: the explicit flag, else the WDL hint.
pub(crate) fn definition_source(
  out_def_json: Option<&Path>,
  metadata: &WorkflowMetadata,
) -> Result<DefinitionSource> {
  if let Some(path) = out_def_json {
    return Ok(DefinitionSource::Local(expand_home(path)));
  }

  let hint = metadata.out_def_hint().ok_or(ConfigError::Missing)?;
  info!(location = hint, "using output definition from WDL");

  match Location::parse(hint) {
    Location::Local(path) => Ok(DefinitionSource::Local(expand_home(&path))),
    Location::Remote(_) => {
      let gcs = StorageConfig {
        public_gcs: true,
        ..Default::default()
      };
      match gcs.url_for(hint) {
        Some(url) => Ok(DefinitionSource::Remote(url)),
        None => bail!("cannot fetch output definition from {}", hint),
      }
    }
  }
}

pub(crate) async fn load_definition(source: &DefinitionSource) -> Result<OutputDefinition> {
  match source {
    DefinitionSource::Local(path) => OutputDefinition::load(path)
      .await
      .with_context(|| format!("failed to load output definition: {}", path.display())),
    DefinitionSource::Remote(url) => {
      let body = reqwest::get(url)
        .await
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("failed to fetch output definition: {}", url))?
        .text()
        .await
        .with_context(|| format!("failed to read output definition: {}", url))?;
      OutputDefinition::from_json(&body)
        .with_context(|| format!("failed to parse output definition: {}", url))
    }
  }
}

/// Expand a leading `~` to the home directory.
pub(crate) fn expand_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), dirs::home_dir()) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn metadata_with_wdl(wdl: &str) -> WorkflowMetadata {
    WorkflowMetadata::from_value(json!({
      "id": "f00d",
      "submittedFiles": { "workflow": wdl }
    }))
    .unwrap()
  }

  #[test]
  fn test_no_flag_and_no_hint_is_missing() {
    let metadata = metadata_with_wdl("version 1.0\nworkflow atac {}\n");
    let err = definition_source(None, &metadata).unwrap_err();
    assert!(matches!(
      err.downcast_ref::<ConfigError>(),
      Some(ConfigError::Missing)
    ));

    let metadata = WorkflowMetadata::from_value(json!({})).unwrap();
    assert!(definition_source(None, &metadata).is_err());
  }

  #[test]
  fn test_flag_wins_over_hint() {
    let metadata = metadata_with_wdl("#CROO out_def /defs/hinted.json\n");
    let source = definition_source(Some(Path::new("/defs/flag.json")), &metadata).unwrap();
    assert_eq!(source, DefinitionSource::Local(PathBuf::from("/defs/flag.json")));
  }

  #[tokio::test]
  async fn test_local_hint_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out_def.json");
    std::fs::write(&path, r#"{"atac.align": {"bam": {"path": "${basename}"}}}"#).unwrap();

    let metadata = metadata_with_wdl(&format!(
      "version 1.0\n#CROO out_def {}\nworkflow atac {{}}\n",
      path.display()
    ));
    let source = definition_source(None, &metadata).unwrap();
    assert_eq!(source, DefinitionSource::Local(path.clone()));

    let definition = load_definition(&source).await.unwrap();
    assert_eq!(definition.tasks().len(), 1);
    assert_eq!(definition.tasks()[0].task_name, "atac.align");
  }

  #[test]
  fn test_remote_hints_resolve_to_urls() {
    let metadata = metadata_with_wdl("#CROO out_def gs://pipelines/atac/out_def.json\n");
    assert_eq!(
      definition_source(None, &metadata).unwrap(),
      DefinitionSource::Remote(
        "https://storage.googleapis.com/pipelines/atac/out_def.json".to_string()
      )
    );

    let metadata = metadata_with_wdl("#CROO out_def https://example.org/out_def.json\n");
    assert_eq!(
      definition_source(None, &metadata).unwrap(),
      DefinitionSource::Remote("https://example.org/out_def.json".to_string())
    );

    let metadata = metadata_with_wdl("#CROO out_def s3://bucket/out_def.json\n");
    assert!(definition_source(None, &metadata).is_err());
  }

  #[test]
  fn test_relative_out_dir_becomes_absolute() {
    let resolved = resolve_out_dir(Some("organized/run1")).unwrap();
    assert!(resolved.is_absolute());
    assert_eq!(
      resolved,
      std::env::current_dir().unwrap().join("organized/run1")
    );

    assert_eq!(
      resolve_out_dir(None).unwrap(),
      std::env::current_dir().unwrap()
    );
  }

  #[test]
  fn test_remote_out_dir_rejected() {
    assert!(resolve_out_dir(Some("gs://bucket/out")).is_err());
    assert!(resolve_out_dir(Some("https://host/out")).is_err());
  }
}
