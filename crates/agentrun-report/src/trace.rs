use serde_json::Value;

/// Token usage reported by one model invocation inside a telemetry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSample {
    /// Input tokens consumed by the invocation.
    pub input_tokens: u64,
    /// Output tokens produced by the invocation.
    pub output_tokens: u64,
}

/// Stage keys a telemetry tree may carry a model-invocation output under.
const STAGE_KEYS: [&str; 3] = [
    "orchestrationTrace",
    "preProcessingTrace",
    "postProcessingTrace",
];

/// Collects every usage sample present in one telemetry tree.
///
/// Each stage record with a `modelInvocationOutput.metadata.usage` sub-record
/// contributes one sample. Samples are returned in stage-key order; callers
/// count every one, with no dedup.
pub fn usage_samples(trace: &Value) -> Vec<UsageSample> {
    let mut samples = Vec::new();
    for stage in STAGE_KEYS {
        let Some(usage) = trace
            .get(stage)
            .and_then(|v| v.get("modelInvocationOutput"))
            .and_then(|v| v.get("metadata"))
            .and_then(|v| v.get("usage"))
        else {
            continue;
        };
        let input_tokens = usage.get("inputTokens").and_then(Value::as_u64);
        let output_tokens = usage.get("outputTokens").and_then(Value::as_u64);
        if input_tokens.is_none() && output_tokens.is_none() {
            continue;
        }
        samples.push(UsageSample {
            input_tokens: input_tokens.unwrap_or(0),
            output_tokens: output_tokens.unwrap_or(0),
        });
    }
    samples
}

/// Collects the bare file names mentioned by a code-interpreter observation.
///
/// The mention carries no bytes; the caller decides whether a matching file
/// already exists on local storage before registering it.
pub fn code_interpreter_mentions(trace: &Value) -> Vec<String> {
    trace
        .get("orchestrationTrace")
        .and_then(|v| v.get("observation"))
        .and_then(|v| v.get("codeInterpreterInvocationOutput"))
        .and_then(|v| v.get("files"))
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(|n| n.as_str().map(ToOwned::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
