// SPDX-License-Identifier: MIT OR Apache-2.0
//! Report rendering
//!
//! [`TableRenderer`] prints a header once and then redraws the latency and
//! bandwidth rows in place; [`JsonRenderer`] emits one JSON object per round.

use memlat::{AccessPattern, RoundReport};
use serde::Serialize;
use std::io::{self, Write};

/// Moves the cursor up over the two data rows
const CURSOR_UP_TWO: &str = "\x1b[2A";
/// Clears from the cursor to the end of the line
const CLEAR_EOL: &str = "\x1b[K";

/// Something that can present a round report
pub trait Render {
    /// Presents `report`
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    fn render(&mut self, report: &RoundReport) -> io::Result<()>;
}

/// Header row: `Type`, the six pattern labels, `Cycles`, `Mean`
#[must_use]
pub fn header_row() -> String {
    let mut row = format!("{:<16}", "Type");
    for pattern in AccessPattern::ALL {
        row.push_str(&format!(" {:<10}", pattern.label()));
    }
    row.push_str(&format!(" {:<10} {:<10}", "Cycles", "Mean"));
    row.trim_end().to_string()
}

/// Latency row with the round count and cross-pattern mean
#[must_use]
pub fn latency_row(report: &RoundReport) -> String {
    let mut row = format!("{:<16}", "Latency (ns)");
    for entry in &report.patterns {
        row.push_str(&format!(" {:<10.2}", entry.average.mean_latency_ns));
    }
    row.push_str(&format!(
        " {:<10} {:.2}",
        report.round,
        report.mean_latency_ns()
    ));
    row
}

/// Bandwidth row; the `Cycles` column is left blank
#[must_use]
pub fn bandwidth_row(report: &RoundReport) -> String {
    let mut row = format!("{:<16}", "Bandwidth (GB/s)");
    for entry in &report.patterns {
        row.push_str(&format!(" {:<10.2}", entry.average.mean_bandwidth_gbps));
    }
    row.push_str(&format!(" {:<10} {:.2}", "", report.mean_bandwidth_gbps()));
    row
}

/// Live table redrawn in place every round
pub struct TableRenderer<W: Write> {
    out: W,
    drawn: bool,
}

impl<W: Write> TableRenderer<W> {
    /// Wraps `out`; the header is written on the first render
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out, drawn: false }
    }

    /// Consumes the renderer, returning the writer
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for TableRenderer<W> {
    fn render(&mut self, report: &RoundReport) -> io::Result<()> {
        if self.drawn {
            self.out.write_all(CURSOR_UP_TWO.as_bytes())?;
        } else {
            writeln!(self.out, "{}", header_row())?;
            self.drawn = true;
        }
        writeln!(self.out, "\r{}{CLEAR_EOL}", latency_row(report))?;
        writeln!(self.out, "\r{}{CLEAR_EOL}", bandwidth_row(report))?;
        self.out.flush()
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(flatten)]
    report: &'a RoundReport,
    mean_latency_ns: f64,
    mean_bandwidth_gbps: f64,
}

/// One JSON object per round, newline separated
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    /// Wraps `out`
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the renderer, returning the writer
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for JsonRenderer<W> {
    fn render(&mut self, report: &RoundReport) -> io::Result<()> {
        let line = JsonLine {
            report,
            mean_latency_ns: report.mean_latency_ns(),
            mean_bandwidth_gbps: report.mean_bandwidth_gbps(),
        };
        serde_json::to_writer(&mut self.out, &line).map_err(io::Error::other)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
