//! Text renderings of the report.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::types::{TableEntry, TrackEntry, UcscOptions};

const UCSC_BROWSER: &str = "https://genome.ucsc.edu/cgi-bin/hgTracks";

pub(crate) fn file_table_tsv(table: &[TableEntry]) -> String {
  let mut tsv = String::from("category\tname\tlocation\turl\n");
  for entry in table {
    let _ = writeln!(
      tsv,
      "{}\t{}\t{}\t{}",
      tsv_field(entry.category()),
      tsv_field(entry.name()),
      tsv_field(&entry.location),
      tsv_field(entry.url.as_deref().unwrap_or(""))
    );
  }
  tsv
}

pub(crate) fn track_list(tracks: &[TrackEntry]) -> String {
  tracks.iter().map(|t| t.line() + "\n").collect()
}

/// Genome browser link loading `track_text` as custom tracks.
pub(crate) fn browser_url(ucsc: &UcscOptions, track_text: &str) -> Option<String> {
  let db = ucsc.genome_db.as_deref()?;
  let mut url = format!(
    "{}?db={}&ignoreCookie=1&hgct_customText={}",
    UCSC_BROWSER,
    urlencoding::encode(db),
    urlencoding::encode(track_text)
  );
  if let Some(pos) = &ucsc.genome_pos {
    let _ = write!(url, "&position={}", urlencoding::encode(pos));
  }
  Some(url)
}

pub(crate) fn html_page(
  workflow_id: &str,
  generated_at: DateTime<Utc>,
  table: &[TableEntry],
  tracks: &[TrackEntry],
  ucsc: &UcscOptions,
) -> String {
  let mut html = String::new();
  let _ = writeln!(html, "<!DOCTYPE html>");
  let _ = writeln!(html, "<html><head><meta charset=\"utf-8\">");
  let _ = writeln!(html, "<title>{}</title></head><body>", escape_html(workflow_id));
  let _ = writeln!(html, "<h1>Workflow {}</h1>", escape_html(workflow_id));
  let _ = writeln!(
    html,
    "<p>Generated {}</p>",
    generated_at.format("%Y-%m-%d %H:%M:%S UTC")
  );

  let _ = writeln!(html, "<h2>Files</h2>");
  let _ = writeln!(
    html,
    "<table><tr><th>Category</th><th>Name</th><th>Location</th></tr>"
  );
  for entry in table {
    let location = match &entry.url {
      Some(url) => format!(
        "<a href=\"{}\">{}</a>",
        escape_html(url),
        escape_html(&entry.location)
      ),
      None => escape_html(&entry.location),
    };
    let _ = writeln!(
      html,
      "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
      escape_html(entry.category()),
      escape_html(entry.name()),
      location
    );
  }
  let _ = writeln!(html, "</table>");

  if !tracks.is_empty() {
    let track_text = track_list(tracks);
    let _ = writeln!(html, "<h2>UCSC browser tracks</h2>");
    if let Some(url) = browser_url(ucsc, &track_text) {
      let _ = writeln!(
        html,
        "<p><a href=\"{}\">Open in genome browser</a></p>",
        escape_html(&url)
      );
    }
    let _ = writeln!(html, "<pre>{}</pre>", escape_html(&track_text));
  }

  let _ = writeln!(html, "</body></html>");
  html
}

fn escape_html(s: &str) -> String {
  let mut escaped = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      _ => escaped.push(c),
    }
  }
  escaped
}

fn tsv_field(s: &str) -> String {
  s.replace(['\t', '\n', '\r'], " ")
}
