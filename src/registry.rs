//! Capability-based dispatch from SVG elements to converters.

use crate::context::ConversionContext;
use crate::document::Document;
use crate::element::Element;
use crate::error::ElementError;
use crate::node::{Node, NodeBorrow};

/// Converts one kind of SVG element into a DrawingML fragment.
///
/// This is an open set: converters are probed with [`can_convert`] in
/// registration order and the first claimant wins, so new element support
/// is added by registering another converter, not by modifying the
/// registry.
///
/// [`can_convert`]: ElementConverter::can_convert
pub trait ElementConverter: Send + Sync {
    fn can_convert(&self, elem: &Element) -> bool;

    /// Converts the element, returning its fragment.
    ///
    /// An empty fragment means "recognized, renders nothing" (e.g. `defs`).
    /// Errors are contained by the dispatch loop; they never abort the
    /// document.
    fn convert(
        &self,
        node: &Node,
        document: &Document,
        registry: &ConverterRegistry,
        ctx: &mut ConversionContext,
    ) -> Result<String, ElementError>;
}

/// The set of registered converters, probed in registration order.
///
/// Once populated the registry is immutable and can be shared read-only
/// across threads; each document conversion carries its own context.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: Vec<Box<dyn ElementConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, converter: Box<dyn ElementConverter>) {
        self.converters.push(converter);
    }

    /// First registered converter that claims the element, if any.
    pub fn get_converter(&self, elem: &Element) -> Option<&dyn ElementConverter> {
        self.converters
            .iter()
            .map(|c| c.as_ref())
            .find(|c| c.can_convert(elem))
    }

    /// Dispatches one node, containing any failure.
    ///
    /// Returns the fragment to append, or `None` when the element is
    /// skipped: unknown tag, conversion error, or a recognized
    /// non-rendering element.  Skips are logged, never propagated, so a
    /// bad element costs only itself and not its siblings.
    pub fn convert_node(
        &self,
        node: &Node,
        document: &Document,
        ctx: &mut ConversionContext,
    ) -> Option<String> {
        if !node.is_element() {
            return None;
        }

        let converter = {
            let elem = node.borrow_element();
            match self.get_converter(&elem) {
                Some(c) => c,
                None => {
                    svg2pptx_log!(ctx.session, "skipping element {} with no converter", *elem);
                    return None;
                }
            }
        };

        match converter.convert(node, document, self, ctx) {
            Ok(fragment) if fragment.is_empty() => None,
            Ok(fragment) => Some(fragment),
            Err(e) => {
                svg2pptx_log!(
                    ctx.session,
                    "omitting element {}: {}",
                    *node.borrow_element(),
                    e
                );
                None
            }
        }
    }
}
