//! Diagnostics hook for composed and rejected statements.

use log::{debug, warn};

use crate::command::Command;
use crate::error::HpglError;

/// Observer invoked by [`Plotter`](crate::Plotter) after a statement is
/// composed and before it is sent.
pub trait Diagnostics {
    /// A statement is about to be sent. Only called when the session's
    /// `debug` flag is set.
    fn statement(&mut self, command: &Command);

    /// `operation` was skipped because its arguments were invalid.
    fn rejected(&mut self, operation: &str, error: &HpglError);
}

/// Forwards to the `log` facade: statements at debug level with control
/// bytes escaped, rejections as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn statement(&mut self, command: &Command) {
        debug!("hpgl: {}", command.escaped());
    }

    fn rejected(&mut self, operation: &str, error: &HpglError) {
        warn!("{operation}: {error}; nothing sent");
    }
}

/// Something a [`RecordingDiagnostics`] saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A statement passed to the sink.
    Statement(String),
    /// A rejected operation and the error message.
    Rejected {
        /// Operation name.
        operation: String,
        /// Rendered error.
        message: String,
    },
}

/// Keeps every diagnostic in memory, for hosts that show them in their own
/// UI and for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    /// Diagnostics in arrival order.
    pub events: Vec<Diagnostic>,
}

impl RecordingDiagnostics {
    /// Recorded rejections only.
    pub fn rejections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.events.iter().filter_map(|e| match e {
            Diagnostic::Rejected { operation, message } => {
                Some((operation.as_str(), message.as_str()))
            }
            Diagnostic::Statement(_) => None,
        })
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn statement(&mut self, command: &Command) {
        self.events
            .push(Diagnostic::Statement(command.as_str().to_owned()));
    }

    fn rejected(&mut self, operation: &str, error: &HpglError) {
        self.events.push(Diagnostic::Rejected {
            operation: operation.to_owned(),
            message: error.to_string(),
        });
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn statement(&mut self, command: &Command) {
        (**self).statement(command);
    }

    fn rejected(&mut self, operation: &str, error: &HpglError) {
        (**self).rejected(operation, error);
    }
}
