//! Error types for output organization.

use corral_report::ReportError;
use corral_storage::StorageError;
use corral_template::TemplateError;
use thiserror::Error;

/// Errors that abort an organization run.
#[derive(Debug, Error)]
pub enum OrganizeError {
  /// A template in the output definition could not be resolved.
  #[error("failed to resolve {field} of '{task_name}.{output_name}': {source}")]
  Resolution {
    task_name: String,
    output_name: String,
    field: &'static str,
    #[source]
    source: TemplateError,
  },

  /// A resolved destination path leaves the output directory.
  #[error("destination '{path}' escapes the output directory")]
  DestinationOutsideRoot { path: String },

  /// Placing a file failed.
  #[error("placement failed: {0}")]
  Storage(#[from] StorageError),

  /// Writing the report failed.
  #[error("report failed: {0}")]
  Report(#[from] ReportError),
}
