//! Error and diagnostic system for the schema catalog builder.
//!
//! This module provides an error handling system with:
//! - Error codes grouped into error classes
//! - Labeled spans pointing at the offending schema construct
//! - Help text for the common fixes
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single failure with an error code, source locations and help text. A
//! failed build returns a [`ParseError`] wrapping the diagnostic that aborted
//! it; no partially built catalog is ever returned.
//!
//! # Example
//!
//! ```
//! # use nxschema_parser::error::{Diagnostic, ErrorClass, ErrorCode};
//! # use nxschema_parser::Span;
//!
//! let diag = Diagnostic::error("groupType (line 12): unexpected xs:complexType child node `xs:simpleContent`")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(340..358), "unsupported construct")
//!     .with_help("only sequence, complexContent, group, attribute and attributeGroup are supported");
//!
//! assert_eq!(diag.class(), Some(ErrorClass::Structural));
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorClass, ErrorCode};
pub use label::Label;
pub use parse_error::ParseError;
