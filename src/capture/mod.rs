//! Capture file reading for trace replay
//!
//! Decoders are fed from recorded bus captures. This module reads the CSV
//! exports logic analyzers produce and turns them into the timestamped
//! byte events the decoder consumes.

mod csv_reader;

pub use csv_reader::CsvCaptureReader;
