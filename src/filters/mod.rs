//! Mapping of SVG filter semantics onto PowerPoint's native color effects.
//!
//! PowerPoint has no per-pixel filter graph; it has a fixed, small
//! vocabulary of color effects (`biLevel`, `duotone`, `grayscl`, `gamma`).
//! This module translates the subset of SVG filter primitives that admit a
//! vector-first mapping (exemplified by `feComponentTransfer`) into that
//! vocabulary, degrading to a placeholder effect when no native mapping
//! exists.  Nothing in here rasterizes and nothing in here fails a
//! document: every outcome is a [`FilterResult`].

use cssparser::{BasicParseError, Parser};

use crate::context::ConversionContext;
use crate::document::Document;
use crate::drawingml;
use crate::error::*;
use crate::node::{element_children, Node, NodeBorrow};
use crate::parse_identifiers;
use crate::parsers::{CustomIdent, Parse};
use crate::svg2pptx_log;

pub mod classify;
pub mod component_transfer;

/// An enumeration of possible inputs for a filter primitive.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum Input {
    #[default]
    Unspecified,
    SourceGraphic,
    SourceAlpha,
    BackgroundImage,
    BackgroundAlpha,
    FillPaint,
    StrokePaint,
    FilterOutput(CustomIdent),
}

impl Parse for Input {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        parser
            .try_parse(|p| {
                parse_identifiers!(
                    p,
                    "SourceGraphic" => Input::SourceGraphic,
                    "SourceAlpha" => Input::SourceAlpha,
                    "BackgroundImage" => Input::BackgroundImage,
                    "BackgroundAlpha" => Input::BackgroundAlpha,
                    "FillPaint" => Input::FillPaint,
                    "StrokePaint" => Input::StrokePaint,
                )
            })
            .or_else(|_: BasicParseError<'_>| {
                let ident = CustomIdent::parse(parser)?;
                Ok(Input::FilterOutput(ident))
            })
    }
}

/// Classification details carried alongside the rendered effect.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterMetadata {
    /// Name of the chosen classification branch, e.g. `"binary"`.
    pub classification: &'static str,

    /// Diagnostic score for the transfer functions involved.
    ///
    /// Computed for every filter but not consulted when choosing a branch;
    /// the vector-first mapping is always attempted.
    pub complexity: f64,
}

/// Outcome of mapping one filter to a DrawingML effect.
///
/// `success: false` never propagates as an error; the caller substitutes a
/// no-op effect and keeps converting.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    pub success: bool,
    pub drawingml: String,
    pub metadata: FilterMetadata,
    pub error: Option<String>,
}

impl FilterResult {
    fn failed(err: FilterError) -> FilterResult {
        FilterResult {
            success: false,
            drawingml: String::new(),
            metadata: FilterMetadata {
                classification: "none",
                complexity: 0.0,
            },
            error: Some(err.to_string()),
        }
    }
}

/// Extracts the fragment id from a `filter="url(#id)"` attribute value.
pub fn parse_filter_reference(value: &str) -> Option<String> {
    let v = value.trim();

    let inner = v.strip_prefix("url(")?.strip_suffix(')')?.trim();
    let inner = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(inner);

    inner.strip_prefix('#').map(str::to_string)
}

/// Resolves a `filter` attribute value to the filter element it references.
///
/// A dangling or malformed reference means "no effect", with a log line; it
/// is never an error.
pub fn resolve_filter(
    document: &Document,
    value: &str,
    ctx: &ConversionContext,
) -> Option<Node> {
    let id = match parse_filter_reference(value) {
        Some(id) => id,
        None => {
            svg2pptx_log!(ctx.session, "ignoring malformed filter reference \"{}\"", value);
            return None;
        }
    };

    let node = document.lookup_internal(&id);

    match node {
        Some(ref n) if n.borrow_element().local_name() == "filter" => node,
        _ => {
            svg2pptx_log!(
                ctx.session,
                "{}",
                FilterError::FilterNotFound(id)
            );
            None
        }
    }
}

/// Maps a `filter` element to a DrawingML effect.
///
/// Walks the filter's primitives in document order and applies the first
/// one with a vector-first mapping.  The pipeline is parse → classify →
/// render; classification cannot fail (worst case is the complex fallback)
/// and rendering cannot fail (complex renders a placeholder), so the only
/// failure mode is a filter with no supported primitive at all.
pub fn apply_filter(filter_node: &Node, ctx: &ConversionContext) -> FilterResult {
    for child in element_children(filter_node) {
        if child.borrow_element().local_name() == "feComponentTransfer" {
            return apply_component_transfer(&child, ctx);
        }
    }

    svg2pptx_log!(
        ctx.session,
        "filter {} has no supported primitive",
        filter_node.borrow_element()
    );

    FilterResult::failed(FilterError::UnsupportedPrimitive)
}

/// Maps one `feComponentTransfer` element to a DrawingML effect.
pub fn apply_component_transfer(node: &Node, ctx: &ConversionContext) -> FilterResult {
    let params = component_transfer::parse(node, &ctx.session);

    let classification = classify::classify(&params);
    let complexity = classify::complexity_score(&params);

    let drawingml = drawingml::render_effect(&classification, &*ctx.services.color);

    FilterResult {
        success: true,
        drawingml,
        metadata: FilterMetadata {
            classification: classification.name(),
            complexity,
        },
        error: None,
    }
}
