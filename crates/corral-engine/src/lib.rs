//! Corral Engine
//!
//! This crate matches an output definition against the task graph of an
//! executed workflow and drives placement and reporting of every match.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Organizer                            │
//! │  - organize(id, definition, graph, sink) → OrganizeSummary  │
//! │  - walks definition entries in declaration order            │
//! │  - resolves path/table/track templates per matched file     │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Sink                               │
//! │  - place(source, destination, mode) → Placement             │
//! │  - add_table_entry / add_track_entry                        │
//! │  - finalize() → ReportFiles                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Storage (copy/link, URLs) + Report               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use corral_engine::{Organizer, OrganizerConfig, ReportSink};
//! use corral_storage::{LocalStorage, PlacementMode, StorageConfig};
//!
//! let config = OrganizerConfig {
//!     out_dir: PathBuf::from("/data/organized"),
//!     mode: PlacementMode::Link,
//! };
//! let organizer = Organizer::new(config);
//!
//! let storage = LocalStorage::new(StorageConfig::default());
//! let mut sink = ReportSink::new(storage, report);
//!
//! organizer.organize("wf-1234", &definition, &graph, &mut sink).await?;
//! sink.finalize().await?;
//! ```

mod error;
mod events;
mod matcher;
mod organizer;
mod sink;

pub use error::OrganizeError;
pub use events::{ChannelNotifier, NoopNotifier, Notifier, OrganizeEvent, PlacementResult};
pub use matcher::{Match, matches, matches_for};
pub use organizer::{OrganizeSummary, Organizer, OrganizerConfig};
pub use sink::{Placement, ReportSink, Sink};
