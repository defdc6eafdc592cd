//! Diagnostic delivery
//!
//! Callers register a [`DiagnosticSink`] on a session to observe
//! compiler messages as they are emitted. A sink that returns an error
//! aborts the surrounding operation: the session moves to its failed
//! state and the sink's error supersedes any pending result.

/// A caller-supplied handler for compiler diagnostic messages.
pub trait DiagnosticSink {
    /// Receive one diagnostic line. Returning `Err` converts the
    /// message into a failure propagated to the session's caller.
    fn receive(&mut self, message: &str) -> Result<(), String>;
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&str) -> Result<(), String>,
{
    fn receive(&mut self, message: &str) -> Result<(), String> {
        self(message)
    }
}
