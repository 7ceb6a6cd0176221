//! Output organization.
//!
//! The `Organizer` walks an output definition in declaration order and, for
//! every task output it names, resolves the entry's templates and hands the
//! result to a [`Sink`]. Matches are processed one at a time: a placement
//! finishes before its report entries are emitted and before the next match
//! starts.

use std::path::{Component, Path, PathBuf};

use corral_config::OutputDefinition;
use corral_storage::PlacementMode;
use corral_template::Scope;
use corral_workflow::TaskGraph;
use tracing::{debug, info, instrument, warn};

use crate::error::OrganizeError;
use crate::events::{NoopNotifier, Notifier, OrganizeEvent, PlacementResult};
use crate::matcher::{Match, matches_for};
use crate::sink::Sink;

/// Configuration for an organization run.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
  /// Root that resolved `path` templates are placed under.
  pub out_dir: PathBuf,
  pub mode: PlacementMode,
}

/// Counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizeSummary {
  pub placed: usize,
  /// Definition entries that matched no task output.
  pub empty_entries: usize,
}

/// The output organizer.
///
/// Generic over `N: Notifier` to allow different notification strategies.
/// Use `Organizer::new()` for no-op notifications, or
/// `Organizer::with_notifier()` to provide a custom notifier.
pub struct Organizer<N: Notifier = NoopNotifier> {
  config: OrganizerConfig,
  notifier: N,
}

impl Organizer<NoopNotifier> {
  pub fn new(config: OrganizerConfig) -> Self {
    Self::with_notifier(config, NoopNotifier)
  }
}

impl<N: Notifier> Organizer<N> {
  pub fn with_notifier(config: OrganizerConfig, notifier: N) -> Self {
    Self { config, notifier }
  }

  /// Place every output named by `definition` and emit its report entries.
  ///
  /// The first failure aborts the run. Files placed before it stay placed.
  #[instrument(skip_all, fields(workflow_id = %workflow_id, mode = %self.config.mode))]
  pub async fn organize<K: Sink>(
    &self,
    workflow_id: &str,
    definition: &OutputDefinition,
    graph: &TaskGraph,
    sink: &mut K,
  ) -> Result<OrganizeSummary, OrganizeError> {
    self.notifier.notify(OrganizeEvent::RunStarted {
      workflow_id: workflow_id.to_string(),
    });
    info!(tasks = graph.len(), "organizing outputs");

    let result = self.run_entries(definition, graph, sink).await;

    match &result {
      Ok(summary) => {
        info!(
          placed = summary.placed,
          empty_entries = summary.empty_entries,
          "outputs organized"
        );
        self.notifier.notify(OrganizeEvent::RunCompleted {
          workflow_id: workflow_id.to_string(),
          placed: summary.placed,
        });
      }
      Err(e) => {
        self.notifier.notify(OrganizeEvent::RunFailed {
          workflow_id: workflow_id.to_string(),
          error: e.to_string(),
        });
      }
    }

    result
  }

  async fn run_entries<K: Sink>(
    &self,
    definition: &OutputDefinition,
    graph: &TaskGraph,
    sink: &mut K,
  ) -> Result<OrganizeSummary, OrganizeError> {
    let mut summary = OrganizeSummary::default();

    for (task_name, output_name, spec) in definition.entries() {
      let mut matched = 0;

      for m in matches_for(graph, task_name, output_name, spec) {
        let result = self.place_match(&m, sink).await?;
        self.notifier.notify(OrganizeEvent::Placed(result));
        matched += 1;
      }

      if matched == 0 {
        warn!(task_name, output_name, "output definition entry matched no task output");
        self.notifier.notify(OrganizeEvent::EmptyMatch {
          task_name: task_name.to_string(),
          output_name: output_name.to_string(),
        });
        summary.empty_entries += 1;
      }
      summary.placed += matched;
    }

    Ok(summary)
  }

  /// Place one matched file, then emit its table and track entries.
  async fn place_match<K: Sink>(
    &self,
    m: &Match<'_>,
    sink: &mut K,
  ) -> Result<PlacementResult, OrganizeError> {
    let scope = Scope::new(m.file_location, &m.task.scatter_index);
    let resolve = |field: &'static str, template: &str| {
      scope
        .render(template)
        .map_err(|source| OrganizeError::Resolution {
          task_name: m.task_name.to_string(),
          output_name: m.output_name.to_string(),
          field,
          source,
        })
    };

    let destination = match &m.spec.path {
      Some(template) => self.destination(&resolve("path", template)?)?,
      None => m.file_location.to_string(),
    };

    let placement = sink
      .place(m.file_location, &destination, self.config.mode)
      .await?;
    debug!(
      source = m.file_location,
      target = %placement.location,
      url = ?placement.url,
      "placed output"
    );

    let table_entry = match &m.spec.table {
      Some(template) => {
        let text = resolve("table", template)?;
        sink.add_table_entry(&placement.location, placement.url.as_deref(), &text);
        Some(text)
      }
      None => None,
    };

    // Tracks need a URL the browser can fetch.
    let track_entry = match (&m.spec.track, &placement.url) {
      (Some(template), Some(url)) => {
        let text = resolve("track", template)?;
        sink.add_track_entry(url, &text);
        Some(text)
      }
      _ => None,
    };

    Ok(PlacementResult {
      task_name: m.task_name.to_string(),
      output_name: m.output_name.to_string(),
      scatter_index: m.task.scatter_index.clone(),
      source_location: m.file_location.to_string(),
      target_location: placement.location,
      target_url: placement.url,
      table_entry,
      track_entry,
    })
  }

  /// Join a resolved `path` under the output directory.
  fn destination(&self, resolved: &str) -> Result<String, OrganizeError> {
    let relative = Path::new(resolved.trim_start_matches('/'));
    if relative
      .components()
      .any(|c| matches!(c, Component::ParentDir))
    {
      return Err(OrganizeError::DestinationOutsideRoot {
        path: resolved.to_string(),
      });
    }
    Ok(
      self
        .config
        .out_dir
        .join(relative)
        .to_string_lossy()
        .into_owned(),
    )
  }
}
