//! SVG element representation.

use std::fmt;

use markup5ever::QualName;

use crate::error::ElementError;
use crate::session::Session;
use crate::svg2pptx_log;
use crate::xml::Attributes;

/// A generic SVG element: its qualified name plus its attributes.
///
/// Unlike a renderer, a converter does not need a parsed per-element data
/// payload up front; converters and the filter engine read attribute values
/// on demand through [`Attributes`] and the `Parse` trait.
pub struct Element {
    element_name: QualName,
    attributes: Attributes,
}

impl Element {
    pub fn new(element_name: QualName, attributes: Attributes) -> Element {
        Element {
            element_name,
            attributes,
        }
    }

    pub fn element_name(&self) -> &QualName {
        &self.element_name
    }

    /// The element's local name, e.g. `rect` or `feFuncR`.
    pub fn local_name(&self) -> &str {
        &self.element_name.local
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn get_id(&self) -> Option<&str> {
        self.attributes.get_id()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element_name().local)?;
        write!(f, " id={}", self.get_id().unwrap_or("None"))?;
        Ok(())
    }
}

/// Sets `dest` from the parse result, or keeps the default value.
///
/// If the value could not be parsed, ignores it and logs the error.  SVG
/// wants invalid attribute values to be treated as if the attribute had not
/// been set at all.
pub fn set_attribute<T>(dest: &mut T, parse_result: Result<T, ElementError>, session: &Session) {
    match parse_result {
        Ok(v) => *dest = v,
        Err(e) => {
            svg2pptx_log!(session, "ignoring attribute with invalid value: {}", e);
        }
    }
}
