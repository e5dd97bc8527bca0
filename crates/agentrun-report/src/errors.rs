/// Errors raised by the event source while the stream is being consumed.
///
/// These originate outside the aggregator; the transport adapter converts its
/// own failure shapes into one of these variants before yielding them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Reading the next event from the transport failed.
    #[error("event stream read failed: {message}")]
    Read { message: String },
    /// The transport aborted the stream before it was exhausted.
    #[error("event stream aborted: {message}")]
    Aborted { message: String },
}

impl TransportError {
    /// Creates a read-failure error.
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Creates an abort error.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted {
            message: message.into(),
        }
    }

    /// Returns the human-readable message for this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Read { message } | Self::Aborted { message } => message,
        }
    }
}

/// Terminal failures of one aggregation run.
///
/// Local problems (one chunk failing to decode, one artifact failing to
/// write) never surface here; they are skipped with a diagnostic. Only
/// conditions that invalidate the whole run become an `AggregateError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// The transport-level status indicated a failed invocation.
    #[error("agent invocation failed with status {status_code}")]
    InvocationFailed { status_code: u16 },
    /// The response carried no event sequence to consume.
    #[error("agent response carried no event stream")]
    MissingEventStream,
    /// The event source broke mid-iteration; partial output is discarded.
    #[error(transparent)]
    Stream(TransportError),
}

impl From<TransportError> for AggregateError {
    fn from(value: TransportError) -> Self {
        Self::Stream(value)
    }
}
