//! User-facing diagnostic messages.
//!
//! Every reported problem names the offending declaration, the cause, and
//! where possible a fix.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages.
pub mod suggestions {
    /// An include names a namespace no input provides.
    pub const MISSING_INCLUDE: &str =
        "help: Pass the description of the included namespace as an additional input";

    /// A type name could not be found.
    pub const UNRESOLVED_SYMBOL: &str =
        "help: Check the spelling or qualify the name with its namespace (e.g. `Gio.File`)";

    /// A native type from a denylisted library was used.
    pub const UNSUPPORTED_TYPE: &str =
        "help: Exclude the declaration or mark it as not introspectable";

    /// A required attribute is missing.
    pub const MISSING_FIELD: &str = "help: Regenerate the description with a newer scanner";

    /// A strict run stopped at the first failure.
    pub const BEST_EFFORT: &str = "help: Run without `--strict` to skip failing declarations";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related input file
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic::with_severity(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic::with_severity(Severity::Warning, message)
    }

    fn with_severity(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Downgrade to a warning (used for skipped declarations).
    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m".to_string(),
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m".to_string(),
                Severity::Note => "\x1b[1;36mnote\x1b[0m".to_string(),
            }
        } else {
            self.severity.to_string()
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        for suggestion in &self.suggestions {
            output.push_str(&format!("  {}\n", suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("unresolved symbol `Gio.File`")
            .with_context("referenced by Gtk.FileChooser.set_file")
            .with_suggestion(suggestions::MISSING_INCLUDE)
            .with_location("Gtk-3.0.json");

        let output = diag.format(false);
        assert!(output.starts_with("error: unresolved symbol"));
        assert!(output.contains("--> Gtk-3.0.json"));
        assert!(output.contains("= referenced by Gtk.FileChooser.set_file"));
        assert!(output.contains("help: Pass the description"));
    }

    #[test]
    fn test_warning_severity() {
        let diag = Diagnostic::error("skipped").as_warning();
        assert!(diag.format(false).starts_with("warning: skipped"));
    }
}
