//! Line classification and the structured-record data model.
//!
//! A record is an open mapping: any field may be absent, and anything
//! beyond the recognized fields is carried along untouched. Accessors
//! return `Option` so rendering can apply placeholder defaults uniformly.

use serde_json::{Map, Value};

/// Decoded field mapping of one structured record.
///
/// `serde_json` is built with `preserve_order`, so iteration and
/// re-encoding keep the original field order of the input line.
pub type Fields = Map<String, Value>;

/// One classified input line. Transient: lives only while the line is
/// being rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedLine {
    /// Opaque text, passed through verbatim in every output mode.
    Raw(String),
    /// A decoded structured record.
    Record(Fields),
}

/// Classify one logical line as raw text or a structured record.
///
/// Decode failures are absorbed here: a line that looks like JSON but is
/// not valid degrades to raw passthrough, never to an error.
pub fn classify(line: &[u8]) -> ClassifiedLine {
    if line.is_empty() {
        return ClassifiedLine::Raw(String::new());
    }
    // Fast reject: a structured record always starts with '{'
    if line[0] != b'{' {
        return ClassifiedLine::Raw(lossy(line));
    }
    match serde_json::from_slice::<Fields>(line) {
        Ok(fields) => ClassifiedLine::Record(fields),
        Err(_) => ClassifiedLine::Raw(lossy(line)),
    }
}

fn lossy(line: &[u8]) -> String {
    String::from_utf8_lossy(line).into_owned()
}

/// Canonical severity levels, integer-encoded 1..=6 in records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Trace = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    Error = 5,
    Fatal = 6,
}

impl Level {
    pub fn from_number(n: u64) -> Option<Self> {
        match n {
            1 => Some(Level::Trace),
            2 => Some(Level::Debug),
            3 => Some(Level::Info),
            4 => Some(Level::Warn),
            5 => Some(Level::Error),
            6 => Some(Level::Fatal),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Uppercase display form used by the pretty and simple renderers.
    pub fn as_upper_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

/// Look up a string field, returning `None` for absent or non-string
/// values.
pub fn str_field<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Resolve the record's severity level, if it carries a recognized one.
pub fn level_of(fields: &Fields) -> Option<Level> {
    fields
        .get("level")
        .and_then(Value::as_u64)
        .and_then(Level::from_number)
}
