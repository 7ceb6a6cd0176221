use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One row of the file table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
  pub location: String,
  pub url: Option<String>,
  /// Resolved table text. The part after the last `/` is the row name, the
  /// part before it the category.
  pub text: String,
}

impl TableEntry {
  pub fn category(&self) -> &str {
    self.text.rsplit_once('/').map_or("", |(category, _)| category)
  }

  pub fn name(&self) -> &str {
    self.text.rsplit_once('/').map_or(&self.text, |(_, name)| name)
  }
}

/// One UCSC custom track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
  pub url: String,
  /// Resolved track line, e.g. `track type=bigWig name="rep1"`.
  pub text: String,
}

impl TrackEntry {
  /// Track line with the data URL attached.
  pub fn line(&self) -> String {
    format!("{} bigDataUrl=\"{}\"", self.text.trim_end(), self.url)
  }
}

/// Genome browser settings for the track list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UcscOptions {
  /// Genome assembly, e.g. `hg38`. Without it no browser link is written.
  pub genome_db: Option<String>,
  /// Initial browser position, e.g. `chr1:1-100000`.
  pub genome_pos: Option<String>,
}

/// Files written by [`Report::finalize`](crate::Report::finalize).
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFiles {
  pub file_table: PathBuf,
  pub html: PathBuf,
  pub tracks: Option<PathBuf>,
  pub browser_url: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(text: &str) -> TableEntry {
    TableEntry {
      location: "/out/a.bam".to_string(),
      url: None,
      text: text.to_string(),
    }
  }

  #[test]
  fn test_category_and_name() {
    let nested = entry("Alignment/Replicate 1/BAM");
    assert_eq!(nested.category(), "Alignment/Replicate 1");
    assert_eq!(nested.name(), "BAM");

    let flat = entry("BAM rep0");
    assert_eq!(flat.category(), "");
    assert_eq!(flat.name(), "BAM rep0");
  }

  #[test]
  fn test_track_line() {
    let track = TrackEntry {
      url: "https://example.org/a.bw".to_string(),
      text: "track type=bigWig name=\"rep1\" ".to_string(),
    };
    assert_eq!(
      track.line(),
      "track type=bigWig name=\"rep1\" bigDataUrl=\"https://example.org/a.bw\""
    );
  }
}
