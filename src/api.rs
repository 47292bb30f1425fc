//! The public API for converting documents.

use crate::context::{ConversionContext, ResourceNeed, Services};
use crate::coord::{CanvasGeometry, CoordinateSystem};
use crate::converters::default_registry;
use crate::document::Document;
use crate::error::ConversionError;
use crate::node::element_children;
use crate::registry::ConverterRegistry;
use crate::session::Session;

/// The result of converting one document.
///
/// `fragments` holds one DrawingML fragment per convertible top-level
/// element, in document order, which is the paint order of the slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub fragments: Vec<String>,
    pub resources: Vec<ResourceNeed>,
}

impl Conversion {
    /// All fragments concatenated, ready for a shape-tree container.
    pub fn drawingml(&self) -> String {
        self.fragments.concat()
    }
}

/// Converts an SVG byte stream with the default converters and services.
pub fn convert_bytes(bytes: &[u8], canvas: CanvasGeometry) -> Result<Conversion, ConversionError> {
    let session = Session::new();
    let document = Document::load_from_bytes(bytes, &session)?;
    let registry = default_registry();

    convert_document(&document, canvas, Services::default(), &registry, session)
}

/// Converts an SVG string with the default converters and services.
pub fn convert_str(s: &str, canvas: CanvasGeometry) -> Result<Conversion, ConversionError> {
    let session = Session::new();
    let document = Document::load_from_str(s, &session)?;
    let registry = default_registry();

    convert_document(&document, canvas, Services::default(), &registry, session)
}

/// Converts an already-loaded document.
///
/// The registry may be shared between calls and across threads; the
/// context created here is private to this call.  Only a structurally
/// unusable document errors out; everything element-level degrades to an
/// omission with a log line.
pub fn convert_document(
    document: &Document,
    canvas: CanvasGeometry,
    services: Services,
    registry: &ConverterRegistry,
    session: Session,
) -> Result<Conversion, ConversionError> {
    let viewbox = document.get_viewbox(&session)?;
    let coords = CoordinateSystem::new(viewbox, canvas)?;

    let mut ctx = ConversionContext::new(session, coords, services);

    for child in element_children(&document.root()) {
        if let Some(fragment) = registry.convert_node(&child, document, &mut ctx) {
            ctx.push_fragment(fragment);
        }
    }

    let (fragments, resources) = ctx.into_output();

    Ok(Conversion {
        fragments,
        resources,
    })
}
