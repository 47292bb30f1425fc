//! Converters from SVG elements to DrawingML fragments.

use crate::context::ConversionContext;
use crate::document::Document;
use crate::element::Element;
use crate::error::ElementError;
use crate::node::Node;
use crate::registry::{ConverterRegistry, ElementConverter};

pub mod group;
pub mod path;
pub mod shape;
pub mod text;

/// Elements that are recognized but render nothing by themselves.
///
/// `defs` content and filter machinery are consumed by reference from the
/// elements that use them; registering them here keeps the dispatch loop
/// from logging them as unknown.
pub struct NonRenderingConverter;

const NON_RENDERING: &[&str] = &[
    "defs",
    "desc",
    "filter",
    "feComponentTransfer",
    "feFuncR",
    "feFuncG",
    "feFuncB",
    "feFuncA",
    "metadata",
    "style",
    "title",
];

impl ElementConverter for NonRenderingConverter {
    fn can_convert(&self, elem: &Element) -> bool {
        NON_RENDERING.contains(&elem.local_name())
    }

    fn convert(
        &self,
        _node: &Node,
        _document: &Document,
        _registry: &ConverterRegistry,
        _ctx: &mut ConversionContext,
    ) -> Result<String, ElementError> {
        Ok(String::new())
    }
}

/// A registry with the full default converter set.
pub fn default_registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::new();

    registry.register(Box::new(group::GroupConverter));
    registry.register(Box::new(shape::ShapeConverter));
    registry.register(Box::new(path::PathConverter));
    registry.register(Box::new(text::TextConverter));
    registry.register(Box::new(NonRenderingConverter));

    registry
}
