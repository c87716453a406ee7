//! The core diagnostic type for the schema error system.
//!
//! A [`Diagnostic`] represents a single build failure with an error code,
//! labeled source spans and help text.

use std::fmt;

use crate::{
    error::{ErrorClass, error_code::ErrorCode, label::Label},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E100]: groupType (line 12): unexpected xs:complexType child node `xs:simpleContent`
///    |
/// 12 |     <xs:simpleContent>
///    |     ^^^^^^^^^^^^^^^^^^ unsupported construct
///    |
///    = help: only sequence, complexContent, group, attribute and attributeGroup are supported
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use nxschema_parser::error::{Diagnostic, ErrorCode};
    /// # use nxschema_parser::Span;
    ///
    /// let diag = Diagnostic::error("undefined name `NX_FOO`")
    ///     .with_code(ErrorCode::E200)
    ///     .with_label(Span::new(0..10), "not found")
    ///     .with_help("declare the type at the top level of the schema");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the class of the error code, if any.
    pub fn class(&self) -> Option<ErrorClass> {
        self.code.map(|code| code.class())
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E100]: message" or "error: message"
        write!(f, "error")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::error("test error");

        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.class().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::error("undefined name").with_code(ErrorCode::E200);

        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(diag.class(), Some(ErrorClass::Reference));
    }

    #[test]
    fn test_diagnostic_labels() {
        let diag = Diagnostic::error("extension cycle")
            .with_label(Span::new(10..20), "extends `b`")
            .with_secondary_label(Span::new(30..40), "which extends `a`");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("undefined name `NX_FOO`").with_code(ErrorCode::E200);

        assert_eq!(diag.to_string(), "error[E200]: undefined name `NX_FOO`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::error("something failed").with_help("try again");

        assert_eq!(diag.to_string(), "error: something failed");
        assert_eq!(diag.help(), Some("try again"));
    }
}
