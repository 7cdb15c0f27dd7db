//! Reportable incident capability.

/// Error raised by a custom incident serializer.
pub type PropsError = Box<dyn std::error::Error + Send + Sync>;

/// An error value worth surfacing to a human operator.
///
/// Implementors expose a descriptive trace for the message body and may
/// optionally provide a custom property summary for the chat channel. A
/// failing serializer returns `Err` and is contained by the notifier, never
/// propagated to its caller.
pub trait Reportable: Send + Sync {
    /// Full descriptive trace text, e.g. a stack trace or error chain.
    ///
    /// Returning `None` makes the notifier substitute a fixed placeholder.
    fn trace(&self) -> Option<String>;

    /// Custom property summary included in the chat message.
    ///
    /// The default implementation reports no custom properties.
    fn chat_props(&self) -> Result<Option<String>, PropsError> {
        Ok(None)
    }
}

/// Adapter reporting any [`std::error::Error`] with no custom properties.
///
/// The trace starts with `Error: <message>`, matching the first line of a
/// JavaScript `Error#stack`, followed by one `caused by:` line per source
/// in the error chain.
pub struct ErrorReport<E>(pub E);

impl<E> Reportable for ErrorReport<E>
where
    E: std::error::Error + Send + Sync,
{
    fn trace(&self) -> Option<String> {
        let mut trace = format!("Error: {}", self.0);
        let mut source = self.0.source();
        while let Some(cause) = source {
            trace.push_str("\n    caused by: ");
            trace.push_str(&cause.to_string());
            source = cause.source();
        }
        Some(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inner;

    impl std::fmt::Display for Inner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "disk full")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "write failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_report_trace_prefix() {
        let report = ErrorReport(std::io::Error::other("boom"));
        assert_eq!(report.trace().unwrap(), "Error: boom");
    }

    #[test]
    fn test_error_report_includes_source_chain() {
        let report = ErrorReport(Outer(Inner));
        assert_eq!(
            report.trace().unwrap(),
            "Error: write failed\n    caused by: disk full"
        );
    }

    #[test]
    fn test_default_props_absent() {
        let report = ErrorReport(std::io::Error::other("boom"));
        assert!(report.chat_props().unwrap().is_none());
    }
}
