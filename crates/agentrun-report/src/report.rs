use std::fmt::Write as _;

use crate::files::FileRegistry;
use crate::usage::UsageTotals;

/// Sentinel comment on the first line of the machine-readable JSON block.
///
/// Downstream parsers locate this line to find the generated-files listing
/// without parsing the rest of the report.
pub const GENERATED_FILES_SENTINEL: &str = "// generated-files";

const SECTION_RULE: &str = "\n\n---\n";

/// Appends the token-usage, file-listing, and machine-readable sections onto
/// the aggregated answer, in that fixed order.
///
/// Sections with nothing to report are omitted entirely: the token block when
/// total tokens are zero, both file sections when the registry is empty.
pub fn synthesize(mut answer: String, files: &FileRegistry, usage: &UsageTotals) -> String {
    if usage.total_tokens() > 0 {
        append_usage_block(&mut answer, usage);
    }
    if !files.is_empty() {
        append_file_listing(&mut answer, files);
        append_json_block(&mut answer, files);
    }
    answer
}

fn append_usage_block(out: &mut String, usage: &UsageTotals) {
    out.push_str(SECTION_RULE);
    out.push_str("## Token Usage\n");
    let _ = writeln!(out, "- Input tokens: {}", usage.input_tokens);
    let _ = writeln!(out, "- Output tokens: {}", usage.output_tokens);
    let _ = writeln!(out, "- Total tokens: {}", usage.total_tokens());
    let _ = writeln!(out, "- Model invocations: {}", usage.invocation_count);
}

fn append_file_listing(out: &mut String, files: &FileRegistry) {
    out.push_str(SECTION_RULE);
    out.push_str("## Generated Files\n");
    for record in files.iter() {
        let path = record.path.display();
        if record.media_type.starts_with("image/") {
            let _ = write!(out, "\n![{}]({})\n", record.name, path);
        } else if record.media_type == "text/csv" {
            let _ = write!(out, "\n[{} (CSV)]({})\n", record.name, path);
        } else {
            let _ = write!(out, "\n[{}]({})\n", record.name, path);
        }
        // Repeated verbatim so path scrapers need no markdown parsing.
        let _ = writeln!(out, "Path: {path}");
    }
}

fn append_json_block(out: &mut String, files: &FileRegistry) {
    let listing =
        serde_json::to_string_pretty(files.snapshot()).unwrap_or_else(|_| "[]".to_string());
    out.push_str(SECTION_RULE);
    out.push_str("```json\n");
    out.push_str(GENERATED_FILES_SENTINEL);
    out.push('\n');
    out.push_str(&listing);
    out.push_str("\n```\n");
}
