//! User-facing error surface.

/// Receives error-severity diagnostics for display to the user, e.g. in a
/// modal message box. Logging happens independently of the notifier.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// A notifier that shows nothing; diagnostics only reach the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnly;

impl Notifier for LogOnly {
    fn notify(&self, _message: &str) {}
}
