//! Diagnostic event sink for the data clients.
//!
//! The clients never write to stdout themselves; callers inject a sink so the
//! TUI can route events to its status bar and tests can capture them.

use crate::error::ApiError;

/// Observer for client-side diagnostic events.
pub trait Diagnostics: Send + Sync {
    /// A degraded default was substituted for bad input (date clamp, swap, ...).
    fn adjustment(&self, context: &str, message: &str);

    /// An outbound request is about to be issued.
    fn request_started(&self, endpoint: &str);

    /// A request finished, successfully or not.
    fn request_finished(&self, endpoint: &str, outcome: &Result<(), &ApiError>);
}

/// Sink that drops every event. Useful as a default and in tests.
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn adjustment(&self, _context: &str, _message: &str) {}
    fn request_started(&self, _endpoint: &str) {}
    fn request_finished(&self, _endpoint: &str, _outcome: &Result<(), &ApiError>) {}
}

/// Simple sink that prints to stdout, for CLI use.
pub struct StdoutDiagnostics;

impl Diagnostics for StdoutDiagnostics {
    fn adjustment(&self, context: &str, message: &str) {
        println!("[{context}] {message}");
    }

    fn request_started(&self, endpoint: &str) {
        println!("GET {endpoint}...");
    }

    fn request_finished(&self, endpoint: &str, outcome: &Result<(), &ApiError>) {
        match outcome {
            Ok(()) => println!("  OK: {endpoint}"),
            Err(e) => println!("  FAIL: {endpoint}: {e}"),
        }
    }
}
