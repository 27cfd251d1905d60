//! Error types for capture decoding.
//!
//! The decode core itself never fails: framing mismatches are normal
//! protocol noise and are handled as control flow inside
//! [`RhspDecoder`](crate::RhspDecoder). Errors exist at the boundaries —
//! reading capture files, parsing configuration, and the streaming layer.
//!
//! ## Helper Constructors
//!
//! Use helper methods for common error scenarios:
//!
//! ```rust
//! use hubtrace::HubtraceError;
//! use std::path::PathBuf;
//!
//! let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
//! let file_error = HubtraceError::capture_file(PathBuf::from("/path/to/trace.csv"), io_err);
//!
//! let format_error = HubtraceError::capture_format("header row", "missing Value column");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for capture operations.
pub type Result<T, E = HubtraceError> = std::result::Result<T, E>;

/// Main error type for capture decoding operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HubtraceError {
    #[error("Capture file error: {path}")]
    CaptureFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Capture format error in {context}: {details}")]
    CaptureFormat { context: String, details: String },

    #[error("Invalid decoder configuration: {reason}")]
    Config {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Packet channel closed: {context}")]
    ChannelClosed { context: String },
}

impl HubtraceError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// A closed packet channel only means one receiver fell behind or was
    /// dropped; resubscribing on the connection yields a fresh receiver.
    /// File and format errors require the capture itself to change.
    pub fn is_retryable(&self) -> bool {
        match self {
            HubtraceError::CaptureFile { .. } => false,
            HubtraceError::CaptureFormat { .. } => false,
            HubtraceError::Config { .. } => false,
            HubtraceError::ChannelClosed { .. } => true,
        }
    }

    /// Helper constructor for capture file errors with path context.
    pub fn capture_file(path: PathBuf, source: std::io::Error) -> Self {
        HubtraceError::CaptureFile { path, source }
    }

    /// Helper constructor for capture format errors.
    pub fn capture_format(context: impl Into<String>, details: impl Into<String>) -> Self {
        HubtraceError::CaptureFormat { context: context.into(), details: details.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        HubtraceError::Config { reason: reason.into(), source: None }
    }

    /// Helper constructor for configuration errors with source.
    pub fn config_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        HubtraceError::Config { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for closed-channel errors.
    pub fn channel_closed(context: impl Into<String>) -> Self {
        HubtraceError::ChannelClosed { context: context.into() }
    }
}

impl From<std::io::Error> for HubtraceError {
    fn from(err: std::io::Error) -> Self {
        HubtraceError::CaptureFile { path: PathBuf::from("<unknown>"), source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn error_messages_contain_their_context(
                context in "[a-zA-Z0-9 _-]+",
                details in "[a-zA-Z0-9 _-]+",
                reason in "[a-zA-Z0-9 _-]+"
            ) {
                let format_error = HubtraceError::capture_format(context.clone(), details.clone());
                let format_msg = format_error.to_string();
                prop_assert!(format_msg.contains(&context));
                prop_assert!(format_msg.contains(&details));

                let config_error = HubtraceError::config(reason.clone());
                prop_assert!(config_error.to_string().contains(&reason));

                let channel_error = HubtraceError::channel_closed(context.clone());
                prop_assert!(channel_error.to_string().contains(&context));
            }

            #[test]
            fn io_conversions_preserve_source_message(message in "[a-zA-Z0-9 ]+") {
                let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, message.clone());
                let converted: HubtraceError = io_err.into();
                match converted {
                    HubtraceError::CaptureFile { source, .. } => {
                        prop_assert_eq!(source.to_string(), message);
                    }
                    _ => prop_assert!(false, "Expected CaptureFile error from io::Error conversion"),
                }
            }
        }
    }

    #[test]
    fn error_constructors_validation() {
        let file_error = HubtraceError::capture_file(
            PathBuf::from("/trace.csv"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "test"),
        );
        assert!(matches!(file_error, HubtraceError::CaptureFile { .. }));

        let format_error = HubtraceError::capture_format("row 3", "bad byte value");
        assert!(matches!(format_error, HubtraceError::CaptureFormat { .. }));

        let config_error = HubtraceError::config("interface base collides with system ids");
        assert!(matches!(config_error, HubtraceError::Config { .. }));
    }

    #[test]
    fn error_traits_validation() {
        // Compile-time check: HubtraceError must be Send + Sync + 'static
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<HubtraceError>();

        let error = HubtraceError::config("test");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn retryable_classification() {
        assert!(HubtraceError::channel_closed("subscriber").is_retryable());
        assert!(!HubtraceError::capture_format("header", "truncated").is_retryable());
        assert!(!HubtraceError::config("bad base").is_retryable());
    }

    #[test]
    fn config_error_chains_source() {
        let source = std::io::Error::other("yaml parse failed");
        let error = HubtraceError::config_with_source("settings file unreadable", Box::new(source));

        let chained = std::error::Error::source(&error).expect("source preserved");
        assert!(chained.to_string().contains("yaml parse failed"));
    }
}
