use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use tracing::warn;

/// One raw stream record decoded at the boundary.
///
/// Records carry no discriminant tag; the recognized members are detected by
/// presence, and a single record may populate more than one of them. Every
/// populated member is handled for that record. Unrecognized members are
/// ignored so unknown event shapes never fail the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentEvent {
    /// Raw answer fragment, appended in arrival order after UTF-8 validation.
    pub chunk: Option<Bytes>,
    /// Inline file artifacts delivered with their content.
    pub files: Vec<InlineFile>,
    /// Telemetry tree for one orchestration step, kept as-is for the walkers.
    pub trace: Option<serde_json::Value>,
}

/// Content of an inline artifact, typed by the member the record declared.
#[derive(Debug, Clone, PartialEq)]
pub enum FileBody {
    /// Raw bytes, written to storage as-is.
    Binary(Bytes),
    /// Text content, written as UTF-8.
    Text(String),
}

/// One artifact delivered inline on a `files` record.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineFile {
    /// File name, unique key in the registry.
    pub name: String,
    /// Content type declared by the record itself.
    pub media_type: String,
    /// Payload to persist.
    pub body: FileBody,
}

impl AgentEvent {
    /// Decodes one raw record.
    ///
    /// Malformed entries inside a recognized member (bad base64, missing
    /// payload) are local failures: dropped with a `warn!`, never escalated.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let chunk = value.get("chunk").and_then(decode_chunk);
        let files = value
            .get("files")
            .and_then(|v| v.get("files"))
            .and_then(|v| v.as_array())
            .map(|entries| entries.iter().filter_map(decode_inline_file).collect())
            .unwrap_or_default();
        let trace = value.get("trace").cloned();
        Self {
            chunk,
            files,
            trace,
        }
    }

    /// True when no recognized member was populated.
    pub fn is_empty(&self) -> bool {
        self.chunk.is_none() && self.files.is_empty() && self.trace.is_none()
    }
}

fn decode_chunk(chunk: &serde_json::Value) -> Option<Bytes> {
    let Some(encoded) = chunk.get("bytes").and_then(|v| v.as_str()) else {
        warn!("skipping chunk with no bytes member");
        return None;
    };
    match BASE64.decode(encoded) {
        Ok(bytes) => Some(Bytes::from(bytes)),
        Err(e) => {
            warn!("skipping chunk with invalid base64 payload: {e}");
            None
        }
    }
}

fn decode_inline_file(entry: &serde_json::Value) -> Option<InlineFile> {
    let name = entry.get("name").and_then(|v| v.as_str())?.to_string();
    let media_type = entry
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or("application/octet-stream")
        .to_string();
    let body = if let Some(text) = entry.get("text").and_then(|v| v.as_str()) {
        FileBody::Text(text.to_string())
    } else if let Some(encoded) = entry.get("bytes").and_then(|v| v.as_str()) {
        match BASE64.decode(encoded) {
            Ok(bytes) => FileBody::Binary(Bytes::from(bytes)),
            Err(e) => {
                warn!(file = %name, "skipping inline file with invalid base64 payload: {e}");
                return None;
            }
        }
    } else {
        warn!(file = %name, "skipping inline file with no payload member");
        return None;
    };
    Some(InlineFile {
        name,
        media_type,
        body,
    })
}
