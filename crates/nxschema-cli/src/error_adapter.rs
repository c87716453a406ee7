//! Rendering of catalog build failures with miette.
//!
//! A failed build yields one [`Report`] per diagnostic, each pointing into
//! the schema document it came from, or a single [`Report`] for failures
//! that happen before any document text is available.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, LabeledSpan, MietteError, MietteSpanContents, SourceCode,
    SourceSpan, SpanContents,
};

use nxschema::NxSchemaError;
use nxschema_parser::{
    Span,
    error::{Diagnostic, ErrorClass},
};

/// Schema document text labelled with the file or version it was read from.
#[derive(Debug, Clone, Copy)]
pub struct SchemaText<'a> {
    origin: &'a str,
    text: &'a str,
}

impl<'a> SchemaText<'a> {
    pub fn new(origin: &'a str, text: &'a str) -> Self {
        Self { origin, text }
    }
}

impl SourceCode for SchemaText<'_> {
    fn read_span<'a>(
        &'a self,
        span: &SourceSpan,
        context_lines_before: usize,
        context_lines_after: usize,
    ) -> Result<Box<dyn SpanContents<'a> + 'a>, MietteError> {
        let contents =
            SourceCode::read_span(self.text, span, context_lines_before, context_lines_after)?;
        Ok(Box::new(MietteSpanContents::new_named(
            self.origin.to_string(),
            contents.data(),
            *contents.span(),
            contents.line(),
            contents.column(),
            contents.line_count(),
        )))
    }
}

/// One renderable failure.
#[derive(Debug)]
pub enum Report<'a> {
    /// A build diagnostic located in the schema text.
    Diagnostic {
        diag: &'a Diagnostic,
        text: SchemaText<'a>,
    },
    /// An I/O, snapshot or configuration failure.
    Failure(&'a NxSchemaError),
}

/// Module path segment naming a diagnostic class in report codes.
fn class_segment(class: ErrorClass) -> &'static str {
    match class {
        ErrorClass::Document => "document",
        ErrorClass::Structural => "structure",
        ErrorClass::Reference => "reference",
        ErrorClass::Invariant => "invariant",
    }
}

fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Diagnostic { diag, .. } => match diag.class() {
                Some(class) => write!(f, "{class}: {}", diag.message()),
                None => f.write_str(diag.message()),
            },
            Report::Failure(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Report<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Report::Diagnostic { .. } => None,
            Report::Failure(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            Report::Diagnostic { diag, .. } => {
                let code = diag.code()?;
                format!("nxschema::{}::{code}", class_segment(code.class()))
            }
            Report::Failure(NxSchemaError::Io(_)) => "nxschema::io".to_string(),
            Report::Failure(NxSchemaError::Source(_)) => "nxschema::source".to_string(),
            Report::Failure(NxSchemaError::Config(_)) => "nxschema::config".to_string(),
            Report::Failure(NxSchemaError::Parse { .. }) => return None,
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Report::Diagnostic { diag, .. } => match (diag.help(), diag.class()) {
                (Some(help), _) => Some(Box::new(help)),
                (None, Some(ErrorClass::Invariant)) => Some(Box::new(
                    "the catalog builder dispatched a node to the wrong parser; this is a bug",
                )),
                (None, _) => None,
            },
            Report::Failure(NxSchemaError::Source(_)) => Some(Box::new(
                "snapshots are looked up as <cache_dir>/<version>/<document>",
            )),
            Report::Failure(_) => None,
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            Report::Diagnostic { text, .. } => Some(text),
            Report::Failure(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Report::Diagnostic { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }

        Some(Box::new(diag.labels().iter().map(|label| {
            let message = Some(label.message().to_string());
            let span = to_source_span(label.span());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Splits a build failure into reports, naming `origin` as the schema source.
pub fn reports<'a>(err: &'a NxSchemaError, origin: &'a str) -> Vec<Report<'a>> {
    match err {
        NxSchemaError::Parse { err, src } => {
            let text = SchemaText::new(origin, src);
            err.diagnostics()
                .iter()
                .map(|diag| Report::Diagnostic { diag, text })
                .collect()
        }
        _ => vec![Report::Failure(err)],
    }
}

#[cfg(test)]
mod tests {
    use miette::{GraphicalReportHandler, GraphicalTheme};
    use nxschema_parser::error::{ErrorCode, ParseError};

    use super::*;

    const SOURCE: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="definition" type="nx:missingType"/>
</xs:schema>"#;

    fn render(report: &Report<'_>) -> String {
        let mut out = String::new();
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .render_report(&mut out, report)
            .unwrap();
        out
    }

    fn unresolved_type() -> NxSchemaError {
        let start = SOURCE.find("nx:missingType").unwrap();
        let diag = Diagnostic::error("definition (line 2): unknown type `missingType`")
            .with_code(ErrorCode::E200)
            .with_label(Span::new(start..start + 14), "not declared");
        NxSchemaError::new_parse_error(ParseError::from(diag), SOURCE)
    }

    #[test]
    fn test_one_report_per_diagnostic() {
        let diags = vec![
            Diagnostic::error("first").with_code(ErrorCode::E100),
            Diagnostic::error("second").with_code(ErrorCode::E200),
            Diagnostic::error("third"),
        ];
        let err = NxSchemaError::new_parse_error(ParseError::from(diags), SOURCE);

        let reports = reports(&err, "nxdl.xsd");
        let messages: Vec<_> = reports.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "structural parse error: first",
                "reference error: second",
                "third"
            ]
        );
    }

    #[test]
    fn test_code_names_error_class() {
        let err = unresolved_type();
        let reports = reports(&err, "nxdl.xsd");

        assert_eq!(
            reports[0].code().unwrap().to_string(),
            "nxschema::reference::E200"
        );
    }

    #[test]
    fn test_rendered_report_names_schema_file() {
        let err = unresolved_type();
        let reports = reports(&err, "schemas/nxdl.xsd");
        let rendered = render(&reports[0]);

        assert!(rendered.contains("nxschema::reference::E200"));
        assert!(rendered.contains("schemas/nxdl.xsd:"));
        assert!(rendered.contains("not declared"));
    }

    #[test]
    fn test_schema_text_read_span() {
        let text = SchemaText::new("version v2018.5", SOURCE);
        let contents = text.read_span(&SourceSpan::new(1.into(), 9), 0, 0).unwrap();

        assert_eq!(contents.name(), Some("version v2018.5"));
        assert_eq!(contents.line(), 0);
    }

    #[test]
    fn test_invariant_help() {
        let diag = Diagnostic::error("groupType (line 3): expected xs:attribute, got xs:element")
            .with_code(ErrorCode::E300);
        let err = NxSchemaError::new_parse_error(ParseError::from(diag), SOURCE);
        let reports = reports(&err, "nxdl.xsd");

        assert_eq!(
            reports[0].code().unwrap().to_string(),
            "nxschema::invariant::E300"
        );
        assert!(reports[0].help().unwrap().to_string().contains("bug"));
    }

    #[test]
    fn test_labels_keep_primary_flag() {
        let diag = Diagnostic::error("groupType (line 7): extension cycle")
            .with_code(ErrorCode::E104)
            .with_label(Span::new(0..5), "extends fieldType")
            .with_secondary_label(Span::new(10..15), "which extends groupType")
            .with_help("break the cycle");
        let err = NxSchemaError::new_parse_error(ParseError::from(diag), SOURCE);
        let reports = reports(&err, "nxdl.xsd");

        let labels: Vec<_> = reports[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert_eq!(labels[1].label(), Some("which extends groupType"));
        assert!(!labels[1].primary());
        assert_eq!(reports[0].help().unwrap().to_string(), "break the cycle");
    }

    #[test]
    fn test_failure_report() {
        let err = NxSchemaError::Config("no cache".to_string());
        let reports = reports(&err, "version v3.2");

        assert_eq!(reports.len(), 1);
        assert!(matches!(reports[0], Report::Failure(_)));
        assert_eq!(reports[0].to_string(), "Configuration error: no cache");
        assert_eq!(reports[0].code().unwrap().to_string(), "nxschema::config");
        assert!(reports[0].source_code().is_none());
    }
}
