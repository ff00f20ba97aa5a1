//! Gate artifact writers.
//!
//! The machine-readable summary (per-code counts) and the
//! human-readable dump go to caller-supplied sinks. These run whether
//! or not the gate passed - a failed run still explains itself.

use std::io::Write;
use tsbind_common::DiagnosticBag;

/// Write both gate artifacts.
pub fn persist_artifacts(
    diagnostics: &DiagnosticBag,
    summary_out: &mut dyn Write,
    human_out: &mut dyn Write,
) -> std::io::Result<()> {
    let summary = diagnostics.summary();
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    summary_out.write_all(json.as_bytes())?;
    summary_out.write_all(b"\n")?;
    diagnostics.write_human(human_out)
}
