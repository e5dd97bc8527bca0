//! Common imports for typical aggregator usage.
//!
//! This module intentionally exports the most frequently used configuration
//! and runtime types so application code needs fewer import lines.
pub use crate::{
    AggregateError, AggregatorConfig, EventStream, FileRecord, FileRegistry, FileSource,
    InvocationResponse, StreamAggregator, TransportError, UsageTotals,
};
