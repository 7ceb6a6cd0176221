use async_trait::async_trait;
use corral_report::{Report, ReportFiles};
use corral_storage::{PlacementMode, Storage};

use crate::error::OrganizeError;

/// Where a file ended up after placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
  pub location: String,
  pub url: Option<String>,
}

/// Realizes placements and collects report entries.
///
/// The organizer awaits every `place` before emitting the report entries that
/// depend on its result.
#[async_trait]
pub trait Sink: Send {
  /// Place `source` at `destination`. Must tolerate repeated identical calls.
  async fn place(
    &mut self,
    source: &str,
    destination: &str,
    mode: PlacementMode,
  ) -> Result<Placement, OrganizeError>;

  fn add_table_entry(&mut self, location: &str, url: Option<&str>, text: &str);

  fn add_track_entry(&mut self, url: &str, text: &str);

  /// Persist everything collected so far.
  async fn finalize(&mut self) -> Result<ReportFiles, OrganizeError>;
}

/// Sink backed by a storage backend and a [`Report`].
pub struct ReportSink<S: Storage> {
  storage: S,
  report: Report,
}

impl<S: Storage> ReportSink<S> {
  pub fn new(storage: S, report: Report) -> Self {
    Self { storage, report }
  }

  pub fn report(&self) -> &Report {
    &self.report
  }
}

#[async_trait]
impl<S: Storage> Sink for ReportSink<S> {
  async fn place(
    &mut self,
    source: &str,
    destination: &str,
    mode: PlacementMode,
  ) -> Result<Placement, OrganizeError> {
    let location = self.storage.place(source, destination, mode).await?;
    let url = self.storage.url(&location);
    Ok(Placement { location, url })
  }

  fn add_table_entry(&mut self, location: &str, url: Option<&str>, text: &str) {
    self.report.add_table_entry(location, url, text);
  }

  fn add_track_entry(&mut self, url: &str, text: &str) {
    self.report.add_track_entry(url, text);
  }

  async fn finalize(&mut self) -> Result<ReportFiles, OrganizeError> {
    Ok(self.report.finalize().await?)
  }
}
