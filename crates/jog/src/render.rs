//! Per-mode rendering of classified lines.
//!
//! Raw lines bypass structured formatting entirely: every mode emits them
//! verbatim plus one terminator. Records are rendered per the active
//! output mode; every rendered block ends with `\n`.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use thiserror::Error;

use crate::record::{level_of, str_field, ClassifiedLine, Fields, Level};

/// Fixed prefix applied to every line of a pretty-mode details block.
const DETAIL_INDENT: &str = "    ";
/// Separator line between adjacent details blocks (indented like them).
const DETAIL_SEPARATOR: &str = "--";
/// 3-character placeholder for an absent/unrecognized level in simple mode.
const SIMPLE_UNKNOWN_LEVEL: &str = "???";

/// Closed set of rendering strategies, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-oriented header + details blocks ("paul" on the CLI).
    Pretty,
    /// Structured re-encode with a configurable indent width.
    Json,
    /// Recursive typed dump of the full field tree.
    Inspect,
    /// One-line `LEVEL - msg`.
    Simple,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Pretty => "paul",
            OutputMode::Json => "json",
            OutputMode::Inspect => "inspect",
            OutputMode::Simple => "simple",
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("re-encoding record failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Render one classified line under the given mode.
pub fn render(
    line: &ClassifiedLine,
    mode: OutputMode,
    json_indent: usize,
) -> Result<String, RenderError> {
    match line {
        ClassifiedLine::Raw(text) => Ok(format!("{text}\n")),
        ClassifiedLine::Record(fields) => match mode {
            OutputMode::Pretty => Ok(render_pretty(fields)),
            OutputMode::Json => render_json(fields, json_indent),
            OutputMode::Inspect => Ok(render_inspect(fields)),
            OutputMode::Simple => Ok(render_simple(fields)),
        },
    }
}

/// `[time] LEVEL: service[/component] on hostname: msg (extras)` plus an
/// indented details section for multi-line messages, request/response
/// context, and stack traces.
fn render_pretty(fields: &Fields) -> String {
    let time = str_field(fields, "time").unwrap_or("");
    let level = pretty_level(fields);
    let hostname = str_field(fields, "hostname").unwrap_or("<no-hostname>");

    let mut name = str_field(fields, "service").unwrap_or("").to_string();
    if let Some(component) = str_field(fields, "component") {
        name.push('/');
        name.push_str(component);
    }

    let msg = str_field(fields, "msg").unwrap_or("");
    let multiline_msg = msg.contains('\n');

    let mut header = format!("[{time}] {level}: {name} on {hostname}:");
    if !msg.is_empty() && !multiline_msg {
        header.push(' ');
        header.push_str(msg);
    }

    let mut extras: Vec<String> = Vec::new();
    if let Some(request_id) = fields.get("request_id") {
        extras.push(scalar(request_id));
    }
    if let Some(latency) = fields.get("latency") {
        extras.push(format!("{}ms", scalar(latency)));
    }
    if !extras.is_empty() {
        header.push_str(" (");
        header.push_str(&extras.join(", "));
        header.push(')');
    }

    let mut details: Vec<String> = Vec::new();
    if multiline_msg {
        details.push(msg.trim_end().to_string());
    }
    if let Some(req) = fields.get("req").and_then(Value::as_object) {
        details.push(render_request(req));
    }
    if let Some(res) = fields.get("res").and_then(Value::as_object) {
        details.push(render_response(res));
    }
    if let Some(stack) = fields
        .get("err")
        .and_then(Value::as_object)
        .and_then(|err| err.get("stack"))
        .and_then(Value::as_str)
    {
        details.push(stack.trim_end().to_string());
    }

    if details.is_empty() {
        format!("{header}\n")
    } else {
        let joined = details.join(&format!("\n{DETAIL_SEPARATOR}\n"));
        format!("{header}\n{}\n", indent(&joined))
    }
}

fn pretty_level(fields: &Fields) -> String {
    match fields.get("level") {
        None => "<unknown-level>".to_string(),
        Some(value) => match value.as_u64().and_then(Level::from_number) {
            Some(level) => level.as_upper_str().to_string(),
            None => format!("<unknown-level {}>", scalar(value)),
        },
    }
}

/// `METHOD URL` followed by one `Name: Value` line per header.
///
/// Partial shapes degrade: absent sub-fields contribute nothing instead of
/// falling back to raw passthrough.
fn render_request(req: &Fields) -> String {
    let method = req.get("method").map(scalar).unwrap_or_default();
    let url = req.get("url").map(scalar).unwrap_or_default();
    let mut block = format!("{method} {url}").trim_end().to_string();
    if let Some(headers) = req.get("headers").and_then(Value::as_object) {
        for (name, value) in headers {
            push_line(&mut block, &format!("{name}: {}", scalar(value)));
        }
    }
    block
}

/// `_header` (right-trimmed), a `(body)` marker when `_hasBody`, then
/// `_trailer`; the whole block is right-trimmed.
fn render_response(res: &Fields) -> String {
    let mut block = res
        .get("_header")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim_end()
        .to_string();
    if res.get("_hasBody").and_then(Value::as_bool) == Some(true) {
        push_line(&mut block, "(body)");
    }
    if let Some(trailer) = res.get("_trailer").and_then(Value::as_str) {
        push_line(&mut block, trailer);
    }
    block.trim_end().to_string()
}

fn push_line(block: &mut String, line: &str) {
    if !block.is_empty() {
        block.push('\n');
    }
    block.push_str(line);
}

fn render_json(fields: &Fields, indent_width: usize) -> Result<String, RenderError> {
    // Width 0 matches a compact re-encode, not a pretty print with no
    // indentation.
    let text = if indent_width == 0 {
        serde_json::to_string(fields)?
    } else {
        let indent = vec![b' '; indent_width];
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(&indent);
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        fields.serialize(&mut serializer)?;
        String::from_utf8_lossy(&buf).into_owned()
    };
    Ok(format!("{text}\n"))
}

fn render_inspect(fields: &Fields) -> String {
    format!("{:#?}\n", Value::Object(fields.clone()))
}

fn render_simple(fields: &Fields) -> String {
    let level = level_of(fields)
        .map(|level| level.as_upper_str())
        .unwrap_or(SIMPLE_UNKNOWN_LEVEL);
    let msg = str_field(fields, "msg").unwrap_or("");
    format!("{level} - {msg}\n")
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn indent(block: &str) -> String {
    block
        .lines()
        .map(|line| format!("{DETAIL_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::classify;
    use serde_json::json;

    fn record(line: &str) -> ClassifiedLine {
        let classified = classify(line.as_bytes());
        assert!(matches!(classified, ClassifiedLine::Record(_)));
        classified
    }

    fn render_ok(line: &ClassifiedLine, mode: OutputMode) -> String {
        render(line, mode, 2).unwrap()
    }

    // ── raw passthrough ─────────────────────────────────────────

    #[test]
    fn test_raw_identical_in_every_mode() {
        let raw = ClassifiedLine::Raw("not json at all".to_string());
        for mode in [
            OutputMode::Pretty,
            OutputMode::Json,
            OutputMode::Inspect,
            OutputMode::Simple,
        ] {
            assert_eq!(render_ok(&raw, mode), "not json at all\n");
        }
    }

    #[test]
    fn test_empty_raw_renders_single_terminator() {
        let raw = ClassifiedLine::Raw(String::new());
        for mode in [
            OutputMode::Pretty,
            OutputMode::Json,
            OutputMode::Inspect,
            OutputMode::Simple,
        ] {
            assert_eq!(render_ok(&raw, mode), "\n");
        }
    }

    // ── pretty mode ─────────────────────────────────────────────

    #[test]
    fn test_pretty_header_basic() {
        let line = record(
            r#"{"level":3,"msg":"hello","time":"2024-01-01T00:00:00Z","hostname":"h","service":"s"}"#,
        );
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[2024-01-01T00:00:00Z] INFO: s on h: hello\n"
        );
    }

    #[test]
    fn test_pretty_component_and_extras() {
        let line = record(
            r#"{"level":4,"msg":"slow","time":"t","hostname":"h","service":"api","component":"db","request_id":"req-1","latency":12}"#,
        );
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[t] WARN: api/db on h: slow (req-1, 12ms)\n"
        );
    }

    #[test]
    fn test_pretty_missing_hostname_placeholder() {
        let line = record(r#"{"level":3,"msg":"hi","time":"t","service":"s"}"#);
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[t] INFO: s on <no-hostname>: hi\n"
        );
    }

    #[test]
    fn test_pretty_unknown_level_placeholder() {
        let line = record(r#"{"level":99,"msg":"hi","time":"t","hostname":"h","service":"s"}"#);
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[t] <unknown-level 99>: s on h: hi\n"
        );
    }

    #[test]
    fn test_pretty_absent_level_placeholder() {
        let line = record(r#"{"msg":"hi","time":"t","hostname":"h","service":"s"}"#);
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[t] <unknown-level>: s on h: hi\n"
        );
    }

    #[test]
    fn test_pretty_multiline_message_moves_to_details() {
        let line = record(
            r#"{"level":3,"msg":"line1\nline2","time":"t","hostname":"h","service":"s"}"#,
        );
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[t] INFO: s on h:\n    line1\n    line2\n"
        );
    }

    #[test]
    fn test_pretty_request_block() {
        let line = record(
            r#"{"level":3,"msg":"served","time":"t","hostname":"h","service":"s","req":{"method":"GET","url":"/api","headers":{"host":"example","accept":"*/*"}}}"#,
        );
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[t] INFO: s on h: served\n    GET /api\n    host: example\n    accept: */*\n"
        );
    }

    #[test]
    fn test_pretty_response_block_with_body_marker() {
        let line = record(
            r#"{"level":3,"msg":"done","time":"t","hostname":"h","service":"s","res":{"_header":"HTTP/1.1 200 OK\r\n","_hasBody":true,"_trailer":"X-Done: yes"}}"#,
        );
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[t] INFO: s on h: done\n    HTTP/1.1 200 OK\n    (body)\n    X-Done: yes\n"
        );
    }

    #[test]
    fn test_pretty_multiple_blocks_joined_by_separator() {
        let line = record(
            r#"{"level":5,"msg":"boom","time":"t","hostname":"h","service":"s","req":{"method":"GET","url":"/x"},"err":{"stack":"Error: boom\n    at main"}}"#,
        );
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[t] ERROR: s on h: boom\n    GET /x\n    --\n    Error: boom\n        at main\n"
        );
    }

    #[test]
    fn test_pretty_partial_nested_shapes_degrade() {
        // req without method/url, res without _header: render what exists
        let line = record(
            r#"{"level":3,"time":"t","hostname":"h","service":"s","req":{"headers":{"host":"x"}},"res":{"_hasBody":true}}"#,
        );
        assert_eq!(
            render_ok(&line, OutputMode::Pretty),
            "[t] INFO: s on h:\n    host: x\n    --\n    (body)\n"
        );
    }

    // ── json mode ───────────────────────────────────────────────

    #[test]
    fn test_json_roundtrip_with_indent() {
        let source =
            r#"{"level":3,"msg":"hello","time":"2024-01-01T00:00:00Z","hostname":"h","service":"s"}"#;
        let line = record(source);
        let out = render(&line, OutputMode::Json, 4).unwrap();

        assert!(out.starts_with("{\n    \"level\": 3"));
        assert!(out.ends_with("}\n"));

        let reparsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let original: serde_json::Value = serde_json::from_str(source).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_json_zero_indent_is_compact() {
        let line = record(r#"{"a":1,"b":[1,2]}"#);
        assert_eq!(
            render(&line, OutputMode::Json, 0).unwrap(),
            "{\"a\":1,\"b\":[1,2]}\n"
        );
    }

    #[test]
    fn test_json_preserves_field_order() {
        let line = record(r#"{"zebra":1,"alpha":2}"#);
        let out = render(&line, OutputMode::Json, 0).unwrap();
        assert_eq!(out, "{\"zebra\":1,\"alpha\":2}\n");
    }

    // ── inspect mode ────────────────────────────────────────────

    #[test]
    fn test_inspect_shows_nesting_and_types() {
        let line = record(r#"{"msg":"hi","nested":{"flag":true,"items":[1,2]}}"#);
        let out = render_ok(&line, OutputMode::Inspect);
        assert!(out.starts_with("Object"));
        assert!(out.contains("String(\"hi\")"));
        assert!(out.contains("Bool(true)"));
        assert!(out.contains("Array"));
        assert!(out.ends_with("\n"));
    }

    // ── simple mode ─────────────────────────────────────────────

    #[test]
    fn test_simple_known_level() {
        let line = record(r#"{"level":6,"msg":"down"}"#);
        assert_eq!(render_ok(&line, OutputMode::Simple), "FATAL - down\n");
    }

    #[test]
    fn test_simple_unknown_level_placeholder() {
        let line = record(r#"{"level":99,"msg":"hello"}"#);
        assert_eq!(render_ok(&line, OutputMode::Simple), "??? - hello\n");

        let line = record(r#"{"msg":"hello"}"#);
        assert_eq!(render_ok(&line, OutputMode::Simple), "??? - hello\n");
    }

    // ── helpers ─────────────────────────────────────────────────

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(scalar(&json!("text")), "text");
        assert_eq!(scalar(&json!(12)), "12");
        assert_eq!(scalar(&json!(true)), "true");
        assert_eq!(scalar(&json!(null)), "null");
        assert_eq!(scalar(&json!({"a":1})), "{\"a\":1}");
    }
}
