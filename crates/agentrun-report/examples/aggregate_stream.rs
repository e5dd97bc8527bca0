use agentrun_report::init_observability;
use agentrun_report::prelude::*;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_observability();

    let events = vec![
        Ok(json!({"chunk": {"bytes": BASE64.encode("The dataset has 42 rows. ")}})),
        Ok(json!({"chunk": {"bytes": BASE64.encode("See the attached summary.")}})),
        Ok(json!({"files": {"files": [
            {"name": "summary.csv", "type": "text/csv", "text": "rows,cols\n42,7"}
        ]}})),
        Ok(json!({"trace": {"orchestrationTrace": {"modelInvocationOutput": {
            "metadata": {"usage": {"inputTokens": 412, "outputTokens": 96}}
        }}}})),
    ];

    let aggregator = StreamAggregator::new(
        AggregatorConfig::new("./artifacts").trace_enabled(true),
    );
    let report = aggregator
        .process(InvocationResponse::from_events(200, events))
        .await;

    println!("{report}");
}
