use std::fmt;

use serde::Serialize;

use crate::{exception_private::ExcType, parse::CodeRange};

/// A Python exception raised while parsing or running a script.
///
/// This is the only error type returned by the public API. It carries the
/// exception type, the optional message and, when the failure can be tied to
/// a statement, a single traceback frame.
///
/// `Display` renders the exception the way CPython prints an uncaught error:
///
/// ```text
/// Traceback (most recent call last):
///   File "test.py", line 1, in <module>
///     len(5)
/// TypeError: object of type 'int' has no len()
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exception {
    exc_type: ExcType,
    message: Option<String>,
    traceback: Option<StackFrame>,
}

impl Exception {
    #[must_use]
    pub fn new(exc_type: ExcType, message: Option<String>) -> Self {
        Self {
            exc_type,
            message,
            traceback: None,
        }
    }

    #[must_use]
    pub(crate) fn with_traceback(mut self, traceback: Option<StackFrame>) -> Self {
        self.traceback = traceback;
        self
    }

    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
    }

    /// The frame of the statement that raised, if known.
    #[must_use]
    pub fn traceback(&self) -> Option<&StackFrame> {
        self.traceback.as_ref()
    }

    /// `TypeError: message` without the traceback header.
    #[must_use]
    pub fn summary(&self) -> String {
        match &self.message {
            Some(msg) if !msg.is_empty() => format!("{}: {msg}", self.exc_type),
            _ => self.exc_type.to_string(),
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(frame) = &self.traceback {
            writeln!(f, "Traceback (most recent call last):")?;
            writeln!(f, "{frame}")?;
        }
        f.write_str(&self.summary())
    }
}

impl std::error::Error for Exception {}

/// 1-based line and column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CodeLoc {
    pub line: u32,
    pub column: u32,
}

/// A single traceback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub filename: String,
    pub start: CodeLoc,
    /// The source line at `start`, trimmed; `None` when the line is out of range.
    pub preview_line: Option<String>,
}

impl StackFrame {
    pub(crate) fn from_position(position: CodeRange, filename: &str, code: &str) -> Self {
        let preview_line = (position.line as usize)
            .checked_sub(1)
            .and_then(|index| code.lines().nth(index))
            .map(|line| line.trim().to_owned())
            .filter(|line| !line.is_empty());
        Self {
            filename: filename.to_owned(),
            start: CodeLoc {
                line: position.line,
                column: position.column,
            },
            preview_line,
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  File \"{}\", line {}, in <module>", self.filename, self.start.line)?;
        if let Some(line) = &self.preview_line {
            write!(f, "\n    {line}")?;
        }
        Ok(())
    }
}
