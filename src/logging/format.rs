//! JSON output lines: one JSON object per line (ndjson) so console output can be piped.

use chrono::Utc;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Envelope for one emitted result line.
#[derive(Serialize)]
pub struct OutputRecord<'a, T: Serialize> {
    pub ts: String,
    /// `analysis`, `feed_batch`, `feed_summary`, `threshold`, `retrain`, `dashboard`
    pub kind: &'a str,
    pub data: &'a T,
}

impl<'a, T: Serialize> OutputRecord<'a, T> {
    pub fn new(kind: &'a str, data: &'a T) -> Self {
        Self {
            ts: Utc::now().to_rfc3339(),
            kind,
            data,
        }
    }
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber on stderr; stdout stays free for result lines.
    /// Level from RUST_LOG, else `default_level`.
    pub fn init(json: bool, default_level: &str) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    /// Write `data` as one `OutputRecord` line.
    pub fn emit_json(kind: &str, data: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(&OutputRecord::new(kind, data))?;
        writeln!(w, "{}", line)
    }
}
