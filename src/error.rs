//! Error types.

use std::fmt;

use cssparser::{BasicParseError, BasicParseErrorKind, ParseErrorKind, ToCss};
use markup5ever::QualName;
use thiserror::Error;

/// A short-lived error from parsing an attribute value.
///
/// The lifetime of the error is the same as the `cssparser::ParserInput`
/// that was used to create a `cssparser::Parser`.  That is, it is the
/// lifetime of the string data that is being parsed.  Code that must keep an
/// error around longer converts it through [`AttributeResultExt`].
pub type ParseError<'i> = cssparser::ParseError<'i, ValueErrorKind>;

/// A simple error which refers to an attribute's value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueErrorKind {
    /// The value could not be parsed
    Parse(String),

    // The value could be parsed, but is invalid
    Value(String),
}

impl ValueErrorKind {
    pub fn parse_error(s: &str) -> ValueErrorKind {
        ValueErrorKind::Parse(s.to_string())
    }

    pub fn value_error(s: &str) -> ValueErrorKind {
        ValueErrorKind::Value(s.to_string())
    }
}

impl fmt::Display for ValueErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ValueErrorKind::Parse(ref s) => write!(f, "parse error: {}", s),

            ValueErrorKind::Value(ref s) => write!(f, "invalid value: {}", s),
        }
    }
}

impl<'a> From<BasicParseError<'a>> for ValueErrorKind {
    fn from(e: BasicParseError<'_>) -> ValueErrorKind {
        let BasicParseError { kind, .. } = e;

        let msg = match kind {
            BasicParseErrorKind::UnexpectedToken(_) => "unexpected token",
            BasicParseErrorKind::EndOfInput => "unexpected end of input",
            BasicParseErrorKind::AtRuleInvalid(_) => "invalid @-rule",
            BasicParseErrorKind::AtRuleBodyInvalid => "invalid @-rule body",
            BasicParseErrorKind::QualifiedRuleInvalid => "invalid qualified rule",
        };

        ValueErrorKind::parse_error(msg)
    }
}

/// A complete error for an attribute and its erroneous value
#[derive(Debug, Clone, PartialEq)]
pub struct ElementError {
    pub attr: QualName,
    pub err: ValueErrorKind,
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.attr.expanded(), self.err)
    }
}

impl std::error::Error for ElementError {}

/// Helper for converting `Result<O, ParseError>` into `Result<O, ElementError>`
pub trait AttributeResultExt<O> {
    fn attribute(self, attr: QualName) -> Result<O, ElementError>;
}

impl<'i, O> AttributeResultExt<O> for Result<O, ParseError<'i>> {
    fn attribute(self, attr: QualName) -> Result<O, ElementError> {
        self.map_err(|e| e.kind)
            .map_err(|e| match e {
                ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(t)) => {
                    let mut s = String::from("unexpected token '");
                    t.to_css(&mut s).unwrap(); // cannot fail for a string
                    s.push('\'');
                    ValueErrorKind::Parse(s)
                }

                ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
                    ValueErrorKind::parse_error("unexpected end of input")
                }

                ParseErrorKind::Basic(_) => {
                    unreachable!("attribute parsers do not handle CSS rules")
                }

                ParseErrorKind::Custom(err) => err,
            })
            .map_err(|err| ElementError { attr, err })
    }
}

/// Errors that abort the conversion of a whole document.
///
/// Everything else degrades per element: a failing element is omitted, its
/// siblings keep converting, and the failure is reported through the session
/// log or a result value.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The root viewport has a non-positive or non-finite size; no
    /// coordinate mapping is possible.
    #[error("invalid viewport: {0}")]
    InvalidViewport(String),

    /// A transform inversion was requested on a singular matrix.
    #[error("transformation matrix is not invertible")]
    NonInvertibleTransform,

    /// The document root is missing, is not an `svg` element, or carries no
    /// usable size information.
    #[error("invalid document root: {0}")]
    InvalidDocumentRoot(String),

    /// The byte stream could not be parsed as XML at all.
    #[error("XML parse error: {0}")]
    Xml(String),
}

/// Errors from assembling a filter effect.
///
/// These never cross the filter engine's boundary; the engine folds them
/// into a `FilterResult` with `success: false` and the caller substitutes a
/// no-op effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("referenced filter \"{0}\" does not exist")]
    FilterNotFound(String),

    #[error("filter contains no supported primitive")]
    UnsupportedPrimitive,

    #[error("error assembling effect: {0}")]
    Assembly(String),
}
