//! zp-logging: NDJSON events + env-gated debug logging.
//!
//! Two channels:
//! - versioned events (`generate`, `run`) appended to an NDJSON file for later
//!   inspection, one JSON object per line;
//! - `debug_log`, a JSON line on stderr when `ZP_DEBUG_LOG` is set.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;
use zp_core::{Register, Registers};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Event schema version written into every event.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Environment variable that enables `debug_log`.
pub const DEBUG_ENV: &str = "ZP_DEBUG_LOG";

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

/// Stable identifier for a program text.
pub fn hash_program(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

fn debug_enabled() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| matches!(std::env::var(DEBUG_ENV).as_deref(), Ok("1" | "true" | "yes")))
}

/// Write one JSON debug line to stderr if `ZP_DEBUG_LOG` is set.
pub fn debug_log(location: &str, message: &str, data: serde_json::Value) {
    if !debug_enabled() {
        return;
    }
    let payload = serde_json::json!({
        "ts_ms": now_ms(),
        "location": location,
        "message": message,
        "data": data,
    });
    if let Ok(line) = serde_json::to_string(&payload) {
        eprintln!("{}", line);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub schema_version: u32,

    pub rounds: u32,
    pub seed_hex: String,
    /// False when the seed came from OS entropy.
    pub seed_given: bool,

    pub value_register_a: Register,
    pub value_register_b: Register,
    pub temp_register: Register,
    pub label_prefix: String,

    pub program_hash: String,
    pub program_lines: usize,
}

impl GenerateEventV1 {
    pub const EVENT: &'static str = "generate";
}

#[derive(Debug, Clone, Serialize)]
pub struct RunEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub schema_version: u32,

    pub program_hash: String,
    pub instructions: usize,
    pub steps: u64,

    pub initial: Registers,
    #[serde(rename = "final")]
    pub final_registers: Registers,
}

impl RunEventV1 {
    pub const EVENT: &'static str = "run";
}

#[derive(Debug, Error)]
pub enum NdjsonError {
    #[error("event log io: {0}")]
    Io(#[from] io::Error),
    #[error("event log json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}
