//! Error codes for the schema diagnostic system.
//!
//! Error codes are organized by class:
//! - `E0xx` - Document errors
//! - `E1xx` - Structural parse errors
//! - `E2xx` - Reference errors
//! - `E3xx` - Invariant violations

use std::fmt;

/// The class of failure an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The source is not a well-formed XML Schema document.
    Document,
    /// A construct has an unsupported shape.
    Structural,
    /// A name or positional key does not resolve.
    Reference,
    /// A node was handed to the parser of another kind.
    Invariant,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorClass::Document => "document error",
            ErrorClass::Structural => "structural parse error",
            ErrorClass::Reference => "reference error",
            ErrorClass::Invariant => "invariant violation",
        };
        f.write_str(text)
    }
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E0xx)
    // =========================================================================
    /// Malformed XML.
    ///
    /// The source could not be parsed as an XML document.
    E001,

    /// Not a schema document.
    ///
    /// The document element is not an XML Schema `schema` element.
    E002,

    // =========================================================================
    // Structural Parse Errors (E1xx)
    // =========================================================================
    /// Unexpected child construct.
    ///
    /// A construct contains a child whose kind is not supported at that
    /// position. Unsupported shapes are never silently dropped.
    E100,

    /// Definition element missing or duplicated.
    ///
    /// Exactly one document-level `xs:element` is expected.
    E101,

    /// Invalid facet value.
    ///
    /// A numeric facet such as `maxLength` or an occurrence bound could not
    /// be parsed.
    E102,

    /// Missing required attribute.
    ///
    /// A construct lacks an attribute it cannot be cataloged without, such as
    /// the `name` of a top-level type or the `ref` of an attribute group
    /// reference.
    E103,

    /// Extension cycle.
    ///
    /// Complex types extend each other in a cycle.
    E104,

    /// Self-derived simple type.
    ///
    /// A simple type's base resolves back to the type itself.
    E105,

    // =========================================================================
    // Reference Errors (E2xx)
    // =========================================================================
    /// Unresolved name.
    ///
    /// A `type`, `base` or `ref` pointer names nothing in the cross-reference.
    E200,

    /// Unresolved position.
    ///
    /// No construct was cataloged at the position being assembled.
    E201,

    /// Wrong construct kind.
    ///
    /// A name resolves to a construct of a different kind than the context
    /// requires.
    E202,

    // =========================================================================
    // Invariant Violations (E3xx)
    // =========================================================================
    /// Construct kind mismatch.
    ///
    /// A node was handed to the parser of a different construct kind. This
    /// is a defect in the catalog builder, not in the input.
    E300,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E300 => "E300",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed XML",
            ErrorCode::E002 => "not a schema document",
            ErrorCode::E100 => "unexpected child construct",
            ErrorCode::E101 => "definition element missing or duplicated",
            ErrorCode::E102 => "invalid facet value",
            ErrorCode::E103 => "missing required attribute",
            ErrorCode::E104 => "extension cycle",
            ErrorCode::E105 => "self-derived simple type",
            ErrorCode::E200 => "unresolved name",
            ErrorCode::E201 => "unresolved position",
            ErrorCode::E202 => "wrong construct kind",
            ErrorCode::E300 => "construct kind mismatch",
        }
    }

    /// Returns the class this code belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorCode::E001 | ErrorCode::E002 => ErrorClass::Document,
            ErrorCode::E100
            | ErrorCode::E101
            | ErrorCode::E102
            | ErrorCode::E103
            | ErrorCode::E104
            | ErrorCode::E105 => ErrorClass::Structural,
            ErrorCode::E200 | ErrorCode::E201 | ErrorCode::E202 => ErrorClass::Reference,
            ErrorCode::E300 => ErrorClass::Invariant,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
