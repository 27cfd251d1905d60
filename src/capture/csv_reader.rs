//! CSV capture export reader
//!
//! Logic analyzers export decoded serial traffic as CSV with one row per
//! bus byte: a start timestamp in seconds and the byte value. This reader
//! loads an export fully into memory at open time (captures are modest and
//! random access keeps replay simple), validates it row by row, and yields
//! [`ByteEvent`]s sequentially.
//!
//! Exports carry start times only. Each byte's end time is taken as the
//! next byte's start; the final byte gets the median inter-byte gap, which
//! tracks the bus baud rate even across idle stretches.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use hubtrace::capture::CsvCaptureReader;
//!
//! fn read_bytes() -> hubtrace::Result<()> {
//!     let mut reader = CsvCaptureReader::open("trace.csv")?;
//!     println!("Capture holds {} bytes over {:.3}s", reader.total_bytes(), reader.duration());
//!
//!     while let Some(event) = reader.read_next() {
//!         println!("{:.6}s: {:#04x}", event.start_time, event.value);
//!     }
//!     Ok(())
//! }
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::types::ByteEvent;
use crate::{HubtraceError, Result};

/// Fallback byte duration when a capture is too short to estimate one.
const FALLBACK_BYTE_TIME: f64 = 1e-5;

/// Sequential reader over a CSV capture export.
#[derive(Debug)]
pub struct CsvCaptureReader {
    events: Vec<ByteEvent>,
    position: usize,
    path: PathBuf,
}

impl CsvCaptureReader {
    /// Open a capture export for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .map_err(|e| HubtraceError::capture_file(path.as_ref().to_path_buf(), e))?;
        Self::from_reader_with_path(file, path.as_ref().to_path_buf())
    }

    /// Create a reader from CSV content (for testing and in-memory replay).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_path(reader, PathBuf::from("<memory>"))
    }

    fn from_reader_with_path<R: Read>(reader: R, path: PathBuf) -> Result<Self> {
        let events = parse_capture(reader)?;
        info!(
            "Opened capture {}: {} bytes over {:.3}s",
            path.display(),
            events.len(),
            events.last().map(|e| e.end_time).unwrap_or(0.0)
        );
        Ok(Self { events, position: 0, path })
    }

    /// Path of the underlying export.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total number of bytes in the capture.
    pub fn total_bytes(&self) -> usize {
        self.events.len()
    }

    /// Number of bytes already read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Capture duration in seconds, from first byte start to last byte end.
    pub fn duration(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.end_time - first.start_time,
            _ => 0.0,
        }
    }

    /// Mean byte rate of the capture in bytes per second.
    pub fn byte_rate(&self) -> f64 {
        let duration = self.duration();
        if duration > 0.0 { self.events.len() as f64 / duration } else { 0.0 }
    }

    /// Read the next byte event, advancing the position.
    pub fn read_next(&mut self) -> Option<ByteEvent> {
        let event = self.events.get(self.position).copied()?;
        self.position += 1;
        Some(event)
    }

    /// Reset the read position to the start of the capture.
    pub fn rewind(&mut self) {
        debug!("rewinding capture to byte 0");
        self.position = 0;
    }
}

fn parse_capture<R: Read>(reader: R) -> Result<Vec<ByteEvent>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| HubtraceError::capture_format("header row", e.to_string()))?;

    let time_column = headers
        .iter()
        .position(|h| h.starts_with("Time"))
        .ok_or_else(|| HubtraceError::capture_format("header row", "no Time column"))?;
    let value_column = headers
        .iter()
        .position(|h| h.starts_with("Value") || h.starts_with("Data"))
        .ok_or_else(|| HubtraceError::capture_format("header row", "no Value column"))?;

    let mut starts = Vec::new();
    let mut values = Vec::new();

    for (row, record) in csv_reader.records().enumerate() {
        // Header row is line 1
        let line = row + 2;
        let record =
            record.map_err(|e| HubtraceError::capture_format(format!("row {line}"), e.to_string()))?;

        let start = field(&record, time_column, line)?
            .parse::<f64>()
            .map_err(|e| HubtraceError::capture_format(format!("row {line}"), e.to_string()))?;

        if let Some(previous) = starts.last()
            && start < *previous
        {
            return Err(HubtraceError::capture_format(
                format!("row {line}"),
                format!("timestamp {start} regresses below {previous}"),
            ));
        }

        starts.push(start);
        values.push(parse_byte(field(&record, value_column, line)?, line)?);
    }

    Ok(assemble_events(&starts, &values))
}

fn field<'r>(record: &'r csv::StringRecord, column: usize, line: usize) -> Result<&'r str> {
    record.get(column).ok_or_else(|| {
        HubtraceError::capture_format(format!("row {line}"), format!("missing column {column}"))
    })
}

/// Parse a byte value, accepting the `0x`-prefixed hex the analyzer
/// exports as well as plain decimal.
fn parse_byte(text: &str, line: usize) -> Result<u8> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => text.parse::<u8>(),
    };
    parsed.map_err(|_| {
        HubtraceError::capture_format(format!("row {line}"), format!("invalid byte value '{text}'"))
    })
}

/// Derive per-byte end times from successor start times, estimating the
/// final byte's width from the median inter-byte gap.
fn assemble_events(starts: &[f64], values: &[u8]) -> Vec<ByteEvent> {
    let mut gaps: Vec<f64> = starts.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let tail_gap = if gaps.is_empty() {
        FALLBACK_BYTE_TIME
    } else {
        gaps.sort_by(|a, b| a.total_cmp(b));
        gaps[gaps.len() / 2]
    };

    starts
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (start, value))| {
            let end = starts.get(i + 1).copied().unwrap_or(start + tail_gap);
            ByteEvent::new(*value, *start, end)
        })
        .collect()
}
