//! Inline expression interpreter.
//!
//! Output definition fields may embed `${...}` placeholders that are resolved
//! per matched file:
//!
//! ```text
//! "path":  "align/rep${i}/${basename}"
//! "table": "Peak/Replicate ${i}, pseudo-replicate ${j}"
//! ```
//!
//! The vocabulary is closed. A placeholder holds a single identifier, or
//! `shard_idx[n]` for nesting levels without a named binding:
//!
//! | identifier  | value                                              |
//! |-------------|----------------------------------------------------|
//! | `i`         | shard at scatter level 0, unbound if not scattered |
//! | `j`         | shard at scatter level 1, unbound if not scattered |
//! | `k`         | shard at scatter level 2, unbound if not scattered |
//! | `basename`  | final path segment of the file                     |
//! | `dirname`   | everything before the final path segment           |
//! | `full_path` | the file location verbatim                         |
//! | `shard_idx` | the raw scatter index, e.g. `(0, -1, -1)`          |
//!
//! Nothing else is evaluated. Referencing an unbound or unknown identifier is
//! an error.

mod error;
mod scope;

pub use error::TemplateError;
pub use scope::{Scope, ScopeValue, basename, dirname};

use corral_workflow::ScatterIndex;

/// Resolve every placeholder in `template` for one file.
///
/// Shorthand for building a [`Scope`] and calling [`Scope::render`]. Build the
/// scope once when several templates are resolved for the same file.
pub fn interpret(
  template: &str,
  file_location: &str,
  scatter_index: &ScatterIndex,
) -> Result<String, TemplateError> {
  Scope::new(file_location, scatter_index).render(template)
}
