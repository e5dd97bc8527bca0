//! Reduces the event stream of a remote agent execution into a single report.
//!
//! The aggregator walks the ordered event sequence exactly once, folds text
//! chunks, inline file artifacts, and telemetry records into an accumulator,
//! and renders one final string: the concatenated answer followed by appended
//! token-usage, file-listing, and machine-readable sections.
//!
//! # Usage
//!
//! ```no_run
//! use agentrun_report::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let aggregator = StreamAggregator::new(AggregatorConfig::new("./artifacts"));
//!
//! let response = InvocationResponse::from_events(
//!     200,
//!     vec![Ok(serde_json::json!({"chunk": {"bytes": "SGVsbG8u"}}))],
//! );
//!
//! let report = aggregator.process(response).await;
//! println!("{report}");
//! # }
//! ```

/// Stream aggregator, configuration, and the invocation response handle.
pub mod aggregator;
/// Public error types used across the aggregation pipeline.
pub mod errors;
/// Boundary decode of one raw stream record.
pub mod event;
/// Artifact registry, provenance rules, and content-type classification.
pub mod files;
/// Process-wide tracing initialization.
pub mod observability;
/// Common imports for typical usage.
pub mod prelude;
/// Report synthesis appended to the aggregated answer.
pub mod report;
/// Telemetry tree walkers for usage samples and file mentions.
pub mod trace;
/// Token accounting across model invocations.
pub mod usage;

pub use aggregator::{AggregatorConfig, EventStream, InvocationResponse, StreamAggregator};
pub use errors::{AggregateError, TransportError};
pub use event::{AgentEvent, FileBody, InlineFile};
pub use files::{FileRecord, FileRegistry, FileSource, content_type_for};
pub use observability::init_observability;
pub use report::GENERATED_FILES_SENTINEL;
pub use trace::{UsageSample, code_interpreter_mentions, usage_samples};
pub use usage::UsageTotals;
