//! Output formatting for CLI tools.
//!
//! Each binding is written on its own line as soon as it is available, so
//! the same writer serves collected and streamed walks.

use crate::cli::args::OutputFormat;
use crate::util::encode_hex;
use crate::{Error, Value, VarBind};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;

/// One binding, ready for output.
#[derive(Debug, Serialize)]
pub struct VarBindRecord {
    pub oid: String,
    #[serde(rename = "type")]
    pub value_type: &'static str,
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

impl VarBindRecord {
    /// Build a record for `vb`.
    pub fn new(vb: &VarBind, force_hex: bool) -> Self {
        let (value_type, value, formatted) = format_value(&vb.value, force_hex);
        Self {
            oid: vb.oid.to_string(),
            value_type,
            value,
            formatted,
        }
    }
}

/// Summary line written after the results when timing is requested.
#[derive(Debug, Serialize)]
struct Summary {
    target: String,
    results: usize,
    timing_ms: f64,
}

/// Output context for formatting.
#[derive(Debug, Clone, Copy)]
pub struct OutputContext {
    pub format: OutputFormat,
    pub force_hex: bool,
}

impl OutputContext {
    /// Create a new output context with default settings.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            force_hex: false,
        }
    }

    /// Write one binding.
    pub fn write_varbind<W: Write>(&self, w: &mut W, vb: &VarBind) -> io::Result<()> {
        let record = VarBindRecord::new(vb, self.force_hex);
        match self.format {
            OutputFormat::Human => {
                write!(w, "{} = {}: ", record.oid, record.value_type)?;
                if let Some(formatted) = &record.formatted {
                    writeln!(w, "{}", formatted)
                } else {
                    match &record.value {
                        serde_json::Value::String(s) => writeln!(w, "\"{}\"", s),
                        serde_json::Value::Null => writeln!(w),
                        other => writeln!(w, "{}", other),
                    }
                }
            }
            OutputFormat::Json => {
                let line = serde_json::to_string(&record).map_err(io::Error::other)?;
                writeln!(w, "{}", line)
            }
            OutputFormat::Raw => {
                let value = match &record.value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                writeln!(w, "{}\t{}\t{}", record.oid, record.value_type, value)
            }
        }
    }

    /// Write several bindings.
    pub fn write_varbinds<W: Write>(&self, w: &mut W, varbinds: &[VarBind]) -> io::Result<()> {
        for vb in varbinds {
            self.write_varbind(w, vb)?;
        }
        Ok(())
    }

    /// Write the timing summary.
    pub fn write_timing<W: Write>(
        &self,
        w: &mut W,
        target: &str,
        results: usize,
        elapsed: Duration,
    ) -> io::Result<()> {
        let summary = Summary {
            target: target.to_string(),
            results,
            timing_ms: elapsed.as_secs_f64() * 1000.0,
        };
        match self.format {
            OutputFormat::Json => {
                let line = serde_json::to_string(&summary).map_err(io::Error::other)?;
                writeln!(w, "{}", line)
            }
            _ => writeln!(
                w,
                "\n{} result(s) from {} in {:.1}ms",
                summary.results, summary.target, summary.timing_ms
            ),
        }
    }
}

/// Write an error to stderr, with a hint for the common cases.
pub fn write_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "Error: {}", err);
    let hint = match err {
        Error::Timeout { .. } => Some("check the target address, community string and version"),
        Error::Encode { .. } => Some("GETBULK needs SNMPv2c; use --getnext or -v 2c"),
        Error::NonIncreasingOid { .. } => Some("the agent returned OIDs out of order; try --getnext"),
        _ => None,
    };
    if let Some(hint) = hint {
        let _ = writeln!(stderr, "Hint: {}", hint);
    }
}

/// Format a value, returning (type_name, json_value, formatted_string).
fn format_value(value: &Value, force_hex: bool) -> (&'static str, serde_json::Value, Option<String>) {
    match value {
        Value::Integer(v) => ("INTEGER", (*v).into(), None),
        Value::OctetString(bytes) => {
            if force_hex || !is_printable(bytes) {
                (
                    "Hex-STRING",
                    serde_json::Value::String(encode_hex(bytes)),
                    Some(format_hex_string(bytes)),
                )
            } else {
                (
                    "STRING",
                    serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()),
                    None,
                )
            }
        }
        Value::Null => ("NULL", serde_json::Value::Null, None),
        Value::ObjectIdentifier(oid) => ("OID", serde_json::Value::String(oid.to_string()), None),
        Value::IpAddress(_) => ("IpAddress", serde_json::Value::String(value.to_string()), None),
        Value::Counter32(v) => ("Counter32", (*v).into(), None),
        Value::Gauge32(v) => ("Gauge32", (*v).into(), None),
        Value::TimeTicks(v) => ("Timeticks", (*v).into(), Some(value.to_string())),
        Value::Counter64(v) => ("Counter64", (*v).into(), None),
        Value::Opaque(bytes) | Value::Unknown { data: bytes, .. } => (
            value.type_name(),
            serde_json::Value::String(encode_hex(bytes)),
            Some(format_hex_string(bytes)),
        ),
        Value::NoSuchObject => (
            "NoSuchObject",
            serde_json::Value::Null,
            Some("No Such Object available on this agent at this OID".into()),
        ),
        Value::NoSuchInstance => (
            "NoSuchInstance",
            serde_json::Value::Null,
            Some("No Such Instance currently exists at this OID".into()),
        ),
        Value::EndOfMibView => (
            "EndOfMibView",
            serde_json::Value::Null,
            Some("No more variables left in this MIB View".into()),
        ),
    }
}

/// Check if bytes are printable UTF-8.
fn is_printable(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.chars().all(|c| !c.is_control() || c.is_ascii_whitespace()),
        Err(_) => false,
    }
}

/// Format bytes as spaced hex for display.
fn format_hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
