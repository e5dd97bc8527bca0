/// Running token totals across every model invocation seen in the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct UsageTotals {
    /// Sum of input tokens across all recorded samples.
    pub input_tokens: u64,
    /// Sum of output tokens across all recorded samples.
    pub output_tokens: u64,
    /// Number of samples recorded.
    pub invocation_count: u64,
}

impl UsageTotals {
    /// Adds one usage sample.
    ///
    /// Samples are never merged or deduplicated; every sample found in the
    /// telemetry counts as one invocation.
    pub fn record(&mut self, input_tokens: u64, output_tokens: u64) {
        self.input_tokens += input_tokens;
        self.output_tokens += output_tokens;
        self.invocation_count += 1;
    }

    /// Combined input and output token count.
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
