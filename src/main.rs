mod setup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use corral_engine::{Organizer, OrganizerConfig, ReportSink, Sink};
use corral_report::{Report, UcscOptions};
use corral_storage::{LocalStorage, PlacementMode, StorageConfig};
use corral_workflow::WorkflowMetadata;

use setup::{definition_source, expand_home, load_definition, prepare_out_dir};

/// Corral - organize workflow outputs into a curated directory tree
#[derive(Parser)]
#[command(name = "corral")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the workflow metadata JSON
  metadata_json: PathBuf,

  /// Output definition JSON (default: the `#CROO out_def` hint in the WDL)
  #[arg(long)]
  out_def_json: Option<PathBuf>,

  /// Output directory (default: current directory)
  #[arg(long)]
  out_dir: Option<String>,

  /// How files are placed in the output directory
  #[arg(long, value_enum, default_value_t = Method::Link)]
  method: Method,

  /// TSV file of `<path prefix>\t<url prefix>` lines for serving local files
  #[arg(long)]
  tsv_mapping_path_to_url: Option<PathBuf>,

  /// Treat gs:// objects as publicly readable
  #[arg(long)]
  public_gcs: bool,

  /// UCSC genome assembly for the browser link, e.g. hg38
  #[arg(long)]
  ucsc_genome_db: Option<String>,

  /// Initial UCSC browser position, e.g. chr1:1-100000
  #[arg(long)]
  ucsc_genome_pos: Option<String>,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
  Copy,
  Link,
}

impl From<Method> for PlacementMode {
  fn from(method: Method) -> Self {
    match method {
      Method::Copy => PlacementMode::Copy,
      Method::Link => PlacementMode::Link,
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_filter = if cli.verbose { "corral=debug" } else { "corral=info" };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
    )
    .with_writer(std::io::stderr)
    .init();

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run(cli).await })
}

async fn run(cli: Cli) -> Result<()> {
  let out_dir = prepare_out_dir(cli.out_dir.as_deref()).await?;

  let metadata_content = tokio::fs::read_to_string(&cli.metadata_json)
    .await
    .with_context(|| {
      format!("failed to read metadata file: {}", cli.metadata_json.display())
    })?;
  let metadata = WorkflowMetadata::from_json(&metadata_content)
    .with_context(|| {
      format!("failed to parse metadata file: {}", cli.metadata_json.display())
    })?;

  let workflow_id = metadata.workflow_id().to_string();
  info!(
    workflow_id = %workflow_id,
    workflow_name = metadata.workflow_name().unwrap_or("unknown"),
    "loaded workflow metadata"
  );

  let source = definition_source(cli.out_def_json.as_deref(), &metadata)?;
  let definition = load_definition(&source).await?;

  let graph = metadata.task_graph();
  if graph.is_empty() {
    warn!("metadata has no completed calls");
  }

  let mut storage_config = StorageConfig {
    public_gcs: cli.public_gcs,
    ..Default::default()
  };
  if let Some(path) = &cli.tsv_mapping_path_to_url {
    storage_config.path_to_url = StorageConfig::load_url_mapping(&expand_home(path))
      .await
      .with_context(|| format!("failed to load URL mapping: {}", path.display()))?;
  }

  let report = Report::new(
    out_dir.clone(),
    workflow_id.clone(),
    UcscOptions {
      genome_db: cli.ucsc_genome_db,
      genome_pos: cli.ucsc_genome_pos,
    },
  );
  let mut sink = ReportSink::new(LocalStorage::new(storage_config), report);

  let organizer = Organizer::new(OrganizerConfig {
    out_dir,
    mode: cli.method.into(),
  });
  let summary = organizer
    .organize(&workflow_id, &definition, &graph, &mut sink)
    .await
    .context("failed to organize outputs")?;

  if summary.empty_entries > 0 {
    warn!(
      count = summary.empty_entries,
      "some output definition entries matched nothing"
    );
  }

  info!(
    rows = sink.report().table().len(),
    tracks = sink.report().tracks().len(),
    "writing report"
  );
  let files = sink.finalize().await.context("failed to write report")?;

  println!("{}", files.file_table.display());
  if let Some(tracks) = &files.tracks {
    println!("{}", tracks.display());
  }
  if let Some(browser_url) = &files.browser_url {
    println!("{}", browser_url.display());
  }
  println!("{}", files.html.display());

  Ok(())
}
