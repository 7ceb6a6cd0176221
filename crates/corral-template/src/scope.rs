//! Identifier bindings and placeholder substitution.

use std::fmt;
use std::sync::LazyLock;

use corral_workflow::ScatterIndex;
use regex::Regex;

use crate::error::TemplateError;

/// A `${...}` placeholder. The first `}` closes it.
static PLACEHOLDER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\$\{(.*?)\}").expect("placeholder pattern is valid"));

/// Named scatter levels, outermost first.
const SHARD_NAMES: [&str; 3] = ["i", "j", "k"];

/// Upper bound on substitution passes. A value that keeps producing
/// placeholders, e.g. a file literally named `${basename}`, fails instead of
/// looping.
const MAX_PASSES: usize = 8;

/// Value of a resolved identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeValue<'a> {
  Int(i64),
  Str(&'a str),
  Index(&'a ScatterIndex),
}

impl fmt::Display for ScopeValue<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ScopeValue::Int(n) => write!(f, "{}", n),
      ScopeValue::Str(s) => f.write_str(s),
      ScopeValue::Index(index) => write!(f, "{}", index),
    }
  }
}

/// Bindings for one matched file.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
  file_location: &'a str,
  scatter_index: &'a ScatterIndex,
}

impl<'a> Scope<'a> {
  pub fn new(file_location: &'a str, scatter_index: &'a ScatterIndex) -> Self {
    Self {
      file_location,
      scatter_index,
    }
  }

  /// Evaluate the content of a single placeholder.
  pub fn lookup(&self, expr: &str) -> Result<ScopeValue<'a>, TemplateError> {
    let expr = expr.trim();

    if let Some(position) = parse_shard_subscript(expr)? {
      let levels = self.scatter_index.levels();
      return levels
        .get(position)
        .map(|&shard| ScopeValue::Int(shard))
        .ok_or(TemplateError::ShardOutOfRange {
          index: position,
          len: levels.len(),
        });
    }

    if !is_identifier(expr) {
      return Err(TemplateError::InvalidExpression {
        expr: expr.to_string(),
      });
    }

    if let Some(level) = SHARD_NAMES.iter().position(|name| *name == expr) {
      return self
        .scatter_index
        .shard(level)
        .map(|shard| ScopeValue::Int(shard as i64))
        .ok_or_else(|| TemplateError::Unbound {
          name: expr.to_string(),
        });
    }

    match expr {
      "basename" => Ok(ScopeValue::Str(basename(self.file_location))),
      "dirname" => Ok(ScopeValue::Str(dirname(self.file_location))),
      "full_path" => Ok(ScopeValue::Str(self.file_location)),
      "shard_idx" => Ok(ScopeValue::Index(self.scatter_index)),
      _ => Err(TemplateError::UnknownIdentifier {
        name: expr.to_string(),
      }),
    }
  }

  /// Replace every placeholder in `template`, left to right, and scan the
  /// result again until no placeholder remains.
  ///
  /// Text that is not a complete placeholder is copied through.
  pub fn render(&self, template: &str) -> Result<String, TemplateError> {
    let mut rendered = template.to_string();
    for _ in 0..MAX_PASSES {
      if !PLACEHOLDER.is_match(&rendered) {
        return Ok(rendered);
      }
      rendered = self.render_pass(&rendered)?;
    }

    if PLACEHOLDER.is_match(&rendered) {
      return Err(TemplateError::Unresolvable {
        template: template.to_string(),
        passes: MAX_PASSES,
      });
    }
    Ok(rendered)
  }

  /// One substitution pass. Values are inserted as-is.
  fn render_pass(&self, template: &str) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for captures in PLACEHOLDER.captures_iter(template) {
      let (Some(whole), Some(expr)) = (captures.get(0), captures.get(1)) else {
        continue;
      };
      rendered.push_str(&template[last..whole.start()]);
      rendered.push_str(&self.lookup(expr.as_str())?.to_string());
      last = whole.end();
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
  }
}

/// Parse `shard_idx[n]`. Returns `None` for anything not shaped like a
/// subscript of `shard_idx`.
fn parse_shard_subscript(expr: &str) -> Result<Option<usize>, TemplateError> {
  let Some(subscript) = expr
    .strip_prefix("shard_idx")
    .map(str::trim_start)
    .and_then(|rest| rest.strip_prefix('['))
  else {
    return Ok(None);
  };

  subscript
    .strip_suffix(']')
    .and_then(|n| n.trim().parse::<usize>().ok())
    .map(Some)
    .ok_or_else(|| TemplateError::InvalidExpression {
      expr: expr.to_string(),
    })
}

fn is_identifier(s: &str) -> bool {
  let mut chars = s.chars();
  matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Final `/`-separated segment of a path or URI.
pub fn basename(location: &str) -> &str {
  match location.rfind('/') {
    Some(pos) => &location[pos + 1..],
    None => location,
  }
}

/// Everything before the final `/`-separated segment, without trailing
/// slashes unless the prefix is made only of slashes.
pub fn dirname(location: &str) -> &str {
  match location.rfind('/') {
    Some(pos) => {
      let head = &location[..=pos];
      let trimmed = head.trim_end_matches('/');
      if trimmed.is_empty() { head } else { trimmed }
    }
    None => "",
  }
}
