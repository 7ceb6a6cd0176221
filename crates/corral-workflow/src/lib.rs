//! Corral Workflow
//!
//! This crate provides the read-only model of an executed workflow: the task
//! graph that output organization runs against.
//!
//! A task graph is a flat, ordered list of [`TaskRecord`]s. Each record is one
//! executed task instance and carries:
//! - the task name (shared by every scatter instance of the task)
//! - its [`ScatterIndex`], one entry per nesting level of scatter loops
//! - the files it produced, keyed by output variable name
//!
//! The graph is built once from Cromwell's metadata document via
//! [`WorkflowMetadata`] and never mutated afterwards. Traversal order is the
//! order of calls in the metadata document.

mod error;
mod graph;
mod metadata;
mod task;

pub use error::MetadataError;
pub use graph::TaskGraph;
pub use metadata::WorkflowMetadata;
pub use task::{ScatterIndex, TaskRecord};
