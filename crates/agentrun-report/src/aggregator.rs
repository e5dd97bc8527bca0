use std::path::{Path, PathBuf};
use std::pin::Pin;

use futures::{Stream, StreamExt as _};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{AggregateError, TransportError};
use crate::event::{AgentEvent, FileBody, InlineFile};
use crate::files::{FileRecord, FileRegistry, FileSource, content_type_for};
use crate::report;
use crate::trace;
use crate::usage::UsageTotals;

/// Ordered, one-shot sequence of raw events from the agent transport.
///
/// The sequence is lazy and non-restartable; the aggregator consumes it
/// exactly once, in delivery order.
pub type EventStream =
    Pin<Box<dyn Stream<Item = Result<serde_json::Value, TransportError>> + Send>>;

/// Configuration for one aggregator instance.
#[derive(Clone, Debug)]
pub struct AggregatorConfig {
    /// Directory artifacts are persisted under; created on demand.
    pub output_dir: PathBuf,
    /// Dumps each telemetry payload to the diagnostic log when set.
    ///
    /// Never affects the returned report.
    pub trace_enabled: bool,
}

impl AggregatorConfig {
    /// Creates a config with tracing disabled.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            trace_enabled: false,
        }
    }

    /// Toggles telemetry dumping to the diagnostic log.
    pub fn trace_enabled(mut self, enabled: bool) -> Self {
        self.trace_enabled = enabled;
        self
    }
}

/// Transport-level response handle for one agent invocation.
pub struct InvocationResponse {
    /// HTTP-equivalent status code; anything outside 2xx fails the
    /// precondition gate.
    pub status_code: u16,
    /// Event sequence, when the transport produced one.
    pub events: Option<EventStream>,
}

impl InvocationResponse {
    /// Creates a response over a transport-provided event sequence.
    pub fn new(status_code: u16, events: EventStream) -> Self {
        Self {
            status_code,
            events: Some(events),
        }
    }

    /// Creates a response with no event sequence attached.
    pub fn without_events(status_code: u16) -> Self {
        Self {
            status_code,
            events: None,
        }
    }

    /// Builds a response over an in-memory event sequence.
    pub fn from_events(
        status_code: u16,
        events: Vec<Result<serde_json::Value, TransportError>>,
    ) -> Self {
        Self {
            status_code,
            events: Some(Box::pin(futures::stream::iter(events))),
        }
    }
}

/// Reducer state for one `process` call.
///
/// Created fresh per call and consumed by the report synthesis; nothing
/// survives across calls.
#[derive(Default)]
struct AggregationState {
    answer: String,
    files: FileRegistry,
    usage: UsageTotals,
}

/// Reduces one agent invocation's event stream into the final report string.
pub struct StreamAggregator {
    config: AggregatorConfig,
}

impl StreamAggregator {
    /// Creates an aggregator with the given configuration.
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Outermost boundary: always returns a string.
    ///
    /// Either the full report, or `Error: <description>` for the failure
    /// modes of [`AggregateError`]. Callers never need error handling to use
    /// the result.
    pub async fn process(&self, response: InvocationResponse) -> String {
        match self.aggregate(response).await {
            Ok(rendered) => rendered,
            Err(err) => format!("Error: {err}"),
        }
    }

    /// Structured layer behind [`StreamAggregator::process`].
    ///
    /// Validates the response, folds the event sequence into a fresh
    /// accumulator, and synthesizes the report. Local decode or write
    /// failures are skipped with a diagnostic; a transport failure from the
    /// sequence itself discards the partial answer and returns
    /// [`AggregateError::Stream`].
    pub async fn aggregate(
        &self,
        response: InvocationResponse,
    ) -> Result<String, AggregateError> {
        let invocation_id = Uuid::new_v4();
        if !(200..300).contains(&response.status_code) {
            return Err(AggregateError::InvocationFailed {
                status_code: response.status_code,
            });
        }
        let Some(mut events) = response.events else {
            return Err(AggregateError::MissingEventStream);
        };

        let mut state = AggregationState::default();
        while let Some(next) = events.next().await {
            let raw = next?;
            self.handle_event(invocation_id, &mut state, &raw).await;
        }
        debug!(
            %invocation_id,
            files = state.files.len(),
            invocations = state.usage.invocation_count,
            "event stream exhausted"
        );
        Ok(report::synthesize(state.answer, &state.files, &state.usage))
    }

    async fn handle_event(
        &self,
        invocation_id: Uuid,
        state: &mut AggregationState,
        raw: &serde_json::Value,
    ) {
        let event = AgentEvent::from_value(raw);
        if event.is_empty() {
            debug!(%invocation_id, "ignoring unrecognized event shape");
            return;
        }
        if let Some(bytes) = &event.chunk {
            match std::str::from_utf8(bytes) {
                Ok(text) => state.answer.push_str(text),
                Err(e) => warn!(%invocation_id, "skipping chunk with invalid UTF-8 payload: {e}"),
            }
        }
        for file in &event.files {
            self.persist_inline_file(invocation_id, state, file).await;
        }
        if let Some(payload) = &event.trace {
            self.handle_trace(invocation_id, state, payload);
        }
    }

    async fn persist_inline_file(
        &self,
        invocation_id: Uuid,
        state: &mut AggregationState,
        file: &InlineFile,
    ) {
        let path = self.config.output_dir.join(&file.name);
        if let Err(e) = self.write_artifact(&path, &file.body).await {
            warn!(%invocation_id, file = %file.name, "skipping artifact after write failure: {e}");
            return;
        }
        debug!(%invocation_id, file = %file.name, path = %path.display(), "persisted inline artifact");
        state.files.register(FileRecord {
            name: file.name.clone(),
            media_type: file.media_type.clone(),
            path,
            source: FileSource::Direct,
        });
    }

    async fn write_artifact(&self, path: &Path, body: &FileBody) -> std::io::Result<()> {
        // The output root may vanish between events; recreate it per write.
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        match body {
            FileBody::Binary(bytes) => tokio::fs::write(path, bytes).await,
            FileBody::Text(text) => tokio::fs::write(path, text.as_bytes()).await,
        }
    }

    fn handle_trace(
        &self,
        invocation_id: Uuid,
        state: &mut AggregationState,
        payload: &serde_json::Value,
    ) {
        if self.config.trace_enabled {
            debug!(%invocation_id, trace = %payload, "trace record");
        }
        for sample in trace::usage_samples(payload) {
            state.usage.record(sample.input_tokens, sample.output_tokens);
        }
        for name in trace::code_interpreter_mentions(payload) {
            let path = self.config.output_dir.join(&name);
            if !path.is_file() {
                debug!(%invocation_id, file = %name, "dropping code-interpreter mention with no file on disk");
                continue;
            }
            state.files.register(FileRecord {
                media_type: content_type_for(&name),
                name,
                path,
                source: FileSource::CodeInterpreter,
            });
        }
    }
}
