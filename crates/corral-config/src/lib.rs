//! Corral Config
//!
//! This crate contains the output definition types for corral. An output
//! definition is a JSON document describing, per task and per output
//! variable, where the produced files should be placed and what should be
//! entered into the report:
//!
//! ```json
//! {
//!   "atac.align": {
//!     "bam": {
//!       "path": "align/rep${i}/${basename}",
//!       "table": "Alignment/Replicate ${i}/BAM",
//!       "ucsc_track": "track type=bam name=\"rep${i}\""
//!     }
//!   }
//! }
//! ```
//!
//! Every field of an output entry is optional and holds a template that is
//! resolved per matched file by `corral-template`. Declaration order is kept:
//! it determines the order of placements and report rows.

mod error;
mod ordered;
mod output;

pub use error::ConfigError;
pub use output::{OutputDefinition, OutputSpec, TaskOutputs};
