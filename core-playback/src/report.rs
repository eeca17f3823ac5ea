//! # Error Reporting
//!
//! Playback failures never propagate out of control operations; they are
//! handed to an [`ErrorReporter`] instead. Hosts can forward them to a toast,
//! a crash reporter, or just the log.

use tracing::error;

use crate::error::PlaybackError;

/// Sink for playback failures.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorReporter: bridge_traits::platform::PlatformSendSync {
    /// `context` names the failed operation ("play", "load", "pause", ...).
    fn report_error(&self, context: &str, error: &PlaybackError);
}

/// Default reporter: logs at `error` through `tracing`.
#[derive(Debug, Default, Clone)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report_error(&self, context: &str, err: &PlaybackError) {
        error!(
            context,
            error = %err,
            transient = err.is_transient(),
            "Playback error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporters_are_object_safe() {
        let mut mock = MockErrorReporter::new();
        mock.expect_report_error().times(1).returning(|_, _| ());

        let reporters: Vec<Box<dyn ErrorReporter>> =
            vec![Box::new(mock), Box::new(TracingErrorReporter)];
        for reporter in &reporters {
            reporter.report_error("play", &PlaybackError::PlayRejected("blocked".into()));
        }
    }
}
