//! Organization events and notifiers for observability.
//!
//! Events are emitted while organizing so consumers can observe progress,
//! collect placement results, stream them to a UI, etc.

use corral_workflow::ScatterIndex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Outcome of placing one matched file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
  pub task_name: String,
  pub output_name: String,
  pub scatter_index: ScatterIndex,
  pub source_location: String,
  /// Final location reported by the sink. Equals the source when the output
  /// has no `path` template.
  pub target_location: String,
  pub target_url: Option<String>,
  pub table_entry: Option<String>,
  pub track_entry: Option<String>,
}

/// Events emitted during an organization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrganizeEvent {
  /// The run has started.
  RunStarted { workflow_id: String },

  /// A matched file has been placed and its report entries emitted.
  Placed(PlacementResult),

  /// An output definition entry matched no task output.
  EmptyMatch {
    task_name: String,
    output_name: String,
  },

  /// The run completed successfully.
  RunCompleted { workflow_id: String, placed: usize },

  /// The run was aborted.
  RunFailed { workflow_id: String, error: String },
}

/// Trait for receiving organization events.
///
/// The organizer calls `notify` for each event; implementations decide what
/// to do with them.
pub trait Notifier: Send + Sync {
  fn notify(&self, event: OrganizeEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
  fn notify(&self, _event: OrganizeEvent) {}
}

/// A notifier that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<OrganizeEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<OrganizeEvent>) -> Self {
    Self { sender }
  }
}

impl Notifier for ChannelNotifier {
  fn notify(&self, event: OrganizeEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
