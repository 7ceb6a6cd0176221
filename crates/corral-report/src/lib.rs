//! Corral Report
//!
//! This crate accumulates what output organization wants the user to see and
//! writes it next to the organized files:
//! - a file table (TSV) of every placed output that has a table entry
//! - a UCSC custom track list for outputs reachable by URL
//! - a UCSC genome browser link, when a genome assembly is configured
//! - an HTML page combining the above
//!
//! Entries keep the order they were added in.

mod render;
mod types;

pub use types::{ReportFiles, TableEntry, TrackEntry, UcscOptions};

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

/// Error type for report persistence.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
  /// Failed to write a report file.
  #[error("failed to write report file {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Report for one workflow run.
#[derive(Debug)]
pub struct Report {
  out_dir: PathBuf,
  workflow_id: String,
  ucsc: UcscOptions,
  table: Vec<TableEntry>,
  tracks: Vec<TrackEntry>,
}

impl Report {
  pub fn new(
    out_dir: impl Into<PathBuf>,
    workflow_id: impl Into<String>,
    ucsc: UcscOptions,
  ) -> Self {
    Self {
      out_dir: out_dir.into(),
      workflow_id: workflow_id.into(),
      ucsc,
      table: Vec::new(),
      tracks: Vec::new(),
    }
  }

  pub fn add_table_entry(&mut self, location: &str, url: Option<&str>, text: &str) {
    self.table.push(TableEntry {
      location: location.to_string(),
      url: url.map(str::to_string),
      text: text.to_string(),
    });
  }

  pub fn add_track_entry(&mut self, url: &str, text: &str) {
    self.tracks.push(TrackEntry {
      url: url.to_string(),
      text: text.to_string(),
    });
  }

  pub fn table(&self) -> &[TableEntry] {
    &self.table
  }

  pub fn tracks(&self) -> &[TrackEntry] {
    &self.tracks
  }

  /// Write all report files into the output directory.
  pub async fn finalize(&self) -> Result<ReportFiles, ReportError> {
    let file_table = self.report_path("file_table.tsv");
    write_file(&file_table, &render::file_table_tsv(&self.table)).await?;

    let mut tracks = None;
    let mut browser_url = None;
    if !self.tracks.is_empty() {
      let track_text = render::track_list(&self.tracks);
      let path = self.report_path("ucsc_tracks.txt");
      write_file(&path, &track_text).await?;
      tracks = Some(path);

      if let Some(url) = render::browser_url(&self.ucsc, &track_text) {
        let path = self.report_path("ucsc_browser.url");
        write_file(&path, &format!("{}\n", url)).await?;
        browser_url = Some(path);
      }
    }

    let html = self.report_path("report.html");
    let page = render::html_page(
      &self.workflow_id,
      Utc::now(),
      &self.table,
      &self.tracks,
      &self.ucsc,
    );
    write_file(&html, &page).await?;

    info!(
      workflow_id = %self.workflow_id,
      rows = self.table.len(),
      tracks = self.tracks.len(),
      path = %html.display(),
      "report written"
    );

    Ok(ReportFiles {
      file_table,
      html,
      tracks,
      browser_url,
    })
  }

  fn report_path(&self, kind: &str) -> PathBuf {
    self
      .out_dir
      .join(format!("corral.{}.{}", self.workflow_id, kind))
  }
}

async fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
  tokio::fs::write(path, contents)
    .await
    .map_err(|source| ReportError::Write {
      path: path.to_path_buf(),
      source,
    })
}
