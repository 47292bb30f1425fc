//! Converter for the basic shapes: `rect`, `circle`, `ellipse`, `line`.

use markup5ever::{expanded_name, local_name, namespace_url, ns};

use crate::context::ConversionContext;
use crate::document::Document;
use crate::drawingml::{render_preset_shape, ShapeProps};
use crate::element::{set_attribute, Element};
use crate::error::ElementError;
use crate::filters;
use crate::node::{Node, NodeBorrow};
use crate::parsers::ParseValue;
use crate::rect::Rect;
use crate::registry::{ConverterRegistry, ElementConverter};
use crate::svg2pptx_log;
use crate::transform::Transform;

/// Geometry attributes shared by the basic shapes, with SVG defaults.
#[derive(Default)]
struct ShapeAttrs {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    cx: f64,
    cy: f64,
    r: f64,
    rx: f64,
    ry: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    transform: Transform,
}

impl ShapeAttrs {
    fn parse(elem: &Element, ctx: &ConversionContext) -> ShapeAttrs {
        let mut attrs = ShapeAttrs::default();
        let session = &ctx.session;

        for (attr, value) in elem.attributes().iter() {
            match attr.expanded() {
                expanded_name!("", "x") => set_attribute(&mut attrs.x, attr.parse(value), session),
                expanded_name!("", "y") => set_attribute(&mut attrs.y, attr.parse(value), session),
                expanded_name!("", "width") => {
                    set_attribute(&mut attrs.width, attr.parse(value), session)
                }
                expanded_name!("", "height") => {
                    set_attribute(&mut attrs.height, attr.parse(value), session)
                }
                expanded_name!("", "cx") => {
                    set_attribute(&mut attrs.cx, attr.parse(value), session)
                }
                expanded_name!("", "cy") => {
                    set_attribute(&mut attrs.cy, attr.parse(value), session)
                }
                expanded_name!("", "r") => set_attribute(&mut attrs.r, attr.parse(value), session),
                expanded_name!("", "rx") => {
                    set_attribute(&mut attrs.rx, attr.parse(value), session)
                }
                expanded_name!("", "ry") => {
                    set_attribute(&mut attrs.ry, attr.parse(value), session)
                }
                expanded_name!("", "x1") => {
                    set_attribute(&mut attrs.x1, attr.parse(value), session)
                }
                expanded_name!("", "y1") => {
                    set_attribute(&mut attrs.y1, attr.parse(value), session)
                }
                expanded_name!("", "x2") => {
                    set_attribute(&mut attrs.x2, attr.parse(value), session)
                }
                expanded_name!("", "y2") => {
                    set_attribute(&mut attrs.y2, attr.parse(value), session)
                }
                expanded_name!("", "transform") => {
                    set_attribute(&mut attrs.transform, attr.parse(value), session)
                }
                _ => (),
            }
        }

        attrs
    }
}

/// Resolves the `fill` attribute to a hex color, `None` for `fill="none"`.
pub(super) fn resolve_fill(elem: &Element, ctx: &ConversionContext) -> Option<String> {
    match elem.attributes().get("fill") {
        None => Some("000000".to_string()),
        Some("none") => None,
        Some(spec) => match ctx.services.color.parse_color(spec) {
            Ok(color) => Some(ctx.services.color.format_hex(color)),
            Err(e) => {
                svg2pptx_log!(ctx.session, "ignoring fill \"{}\": {}", spec, e);
                Some("000000".to_string())
            }
        },
    }
}

/// Maps the element's `filter` reference to an effect fragment, if any.
///
/// Unsupported or dangling filters yield `None`; the shape renders without
/// an effect instead of failing.
pub(super) fn resolve_effect(
    elem: &Element,
    document: &Document,
    ctx: &ConversionContext,
) -> Option<String> {
    let value = elem.attributes().get("filter")?;
    let filter_node = filters::resolve_filter(document, value, ctx)?;

    let result = filters::apply_filter(&filter_node, ctx);

    if result.success {
        svg2pptx_log!(
            ctx.session,
            "filter on {} mapped to {} effect (complexity {:.1})",
            elem,
            result.metadata.classification,
            result.metadata.complexity
        );
        Some(result.drawingml)
    } else {
        svg2pptx_log!(
            ctx.session,
            "substituting no-op effect on {}: {}",
            elem,
            result.error.as_deref().unwrap_or("unknown failure")
        );
        None
    }
}

pub struct ShapeConverter;

impl ElementConverter for ShapeConverter {
    fn can_convert(&self, elem: &Element) -> bool {
        matches!(elem.local_name(), "rect" | "circle" | "ellipse" | "line")
    }

    fn convert(
        &self,
        node: &Node,
        document: &Document,
        _registry: &ConverterRegistry,
        ctx: &mut ConversionContext,
    ) -> Result<String, ElementError> {
        let elem = node.borrow_element();
        let attrs = ShapeAttrs::parse(&elem, ctx);

        let (user_rect, preset, fillable) = match elem.local_name() {
            "rect" => (
                Rect::new(
                    attrs.x,
                    attrs.y,
                    attrs.x + attrs.width,
                    attrs.y + attrs.height,
                ),
                "rect",
                true,
            ),

            "circle" => (
                Rect::new(
                    attrs.cx - attrs.r,
                    attrs.cy - attrs.r,
                    attrs.cx + attrs.r,
                    attrs.cy + attrs.r,
                ),
                "ellipse",
                true,
            ),

            "ellipse" => (
                Rect::new(
                    attrs.cx - attrs.rx,
                    attrs.cy - attrs.ry,
                    attrs.cx + attrs.rx,
                    attrs.cy + attrs.ry,
                ),
                "ellipse",
                true,
            ),

            "line" => (
                Rect::new(
                    attrs.x1.min(attrs.x2),
                    attrs.y1.min(attrs.y2),
                    attrs.x1.max(attrs.x2),
                    attrs.y1.max(attrs.y2),
                ),
                "line",
                false,
            ),

            _ => unreachable!("can_convert admitted an unknown shape"),
        };

        // A shape with no area disables rendering; lines may be degenerate
        // along one axis.
        if fillable && (user_rect.width() <= 0.0 || user_rect.height() <= 0.0) {
            svg2pptx_log!(ctx.session, "not rendering zero-sized {}", *elem);
            return Ok(String::new());
        }

        let transform = ctx.current_transform.compose(&attrs.transform);
        let mapped = transform.transform_rect(&user_rect);

        let (offset, extent) = ctx.coords.rect_to_emu(&mapped);

        let fill_hex = if fillable {
            resolve_fill(&elem, ctx)
        } else {
            None
        };
        let effect = resolve_effect(&elem, document, ctx);

        let name = match elem.get_id() {
            Some(id) => id.to_string(),
            None => elem.local_name().to_string(),
        };

        let props = ShapeProps {
            name: &name,
            offset,
            extent,
            fill_hex,
            effect: effect.as_deref(),
        };

        let id = ctx.next_shape_id();
        Ok(render_preset_shape(id, preset, &props))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Services;
    use crate::coord::{CanvasGeometry, CoordinateSystem};
    use crate::session::Session;

    fn convert_first(svg: &str) -> Option<String> {
        let session = Session::default();
        let document = Document::load_from_str(svg, &session).unwrap();

        let viewbox = document.get_viewbox(&session).unwrap();
        let coords =
            CoordinateSystem::new(viewbox, CanvasGeometry::new(9_144_000, 9_144_000)).unwrap();
        let mut ctx = ConversionContext::new(session, coords, Services::default());

        let registry = crate::converters::default_registry();
        let node = document.root().children().next().unwrap();
        registry.convert_node(&node, &document, &mut ctx)
    }

    #[test]
    fn rect_fills_the_canvas() {
        let s = convert_first(
            r#"<svg viewBox="0 0 100 100">
                 <rect x="0" y="0" width="100" height="100"/>
               </svg>"#,
        )
        .unwrap();

        assert!(s.contains("<a:off x=\"0\" y=\"0\"/>"));
        assert!(s.contains("<a:ext cx=\"9144000\" cy=\"9144000\"/>"));
        assert!(s.contains("prst=\"rect\""));
    }

    #[test]
    fn circle_maps_to_ellipse_preset() {
        let s = convert_first(
            r#"<svg viewBox="0 0 100 100"><circle cx="50" cy="50" r="25"/></svg>"#,
        )
        .unwrap();

        assert!(s.contains("prst=\"ellipse\""));
        assert!(s.contains("<a:off x=\"2286000\" y=\"2286000\"/>"));
        assert!(s.contains("<a:ext cx=\"4572000\" cy=\"4572000\"/>"));
    }

    #[test]
    fn zero_sized_rect_renders_nothing() {
        assert_eq!(
            convert_first(r#"<svg viewBox="0 0 100 100"><rect width="0" height="10"/></svg>"#),
            None
        );
    }

    #[test]
    fn horizontal_line_is_allowed() {
        let s = convert_first(
            r#"<svg viewBox="0 0 100 100"><line x1="0" y1="50" x2="100" y2="50"/></svg>"#,
        )
        .unwrap();

        assert!(s.contains("prst=\"line\""));
        assert!(s.contains("<a:ext cx=\"9144000\" cy=\"0\"/>"));
    }

    #[test]
    fn fill_none_emits_no_solid_fill() {
        let s = convert_first(
            r#"<svg viewBox="0 0 100 100"><rect width="10" height="10" fill="none"/></svg>"#,
        )
        .unwrap();

        assert!(!s.contains("<a:solidFill>"));
    }

    #[test]
    fn fill_color_is_formatted_hex() {
        let s = convert_first(
            r##"<svg viewBox="0 0 100 100"><rect width="10" height="10" fill="#ff0000"/></svg>"##,
        )
        .unwrap();

        assert!(s.contains("<a:solidFill><a:srgbClr val=\"FF0000\"/></a:solidFill>"));
    }

    #[test]
    fn transform_attribute_moves_the_shape() {
        let s = convert_first(
            r#"<svg viewBox="0 0 100 100">
                 <rect width="10" height="10" transform="translate(10 20)"/>
               </svg>"#,
        )
        .unwrap();

        assert!(s.contains("<a:off x=\"914400\" y=\"1828800\"/>"));
        assert!(s.contains("<a:ext cx=\"914400\" cy=\"914400\"/>"));
    }

    #[test]
    fn malformed_geometry_attribute_keeps_default() {
        // width falls back to 0, so nothing renders; no panic, no error
        assert_eq!(
            convert_first(
                r#"<svg viewBox="0 0 100 100"><rect width="wat" height="10"/></svg>"#
            ),
            None
        );
    }

    #[test]
    fn binary_filter_effect_lands_in_shape() {
        let session = Session::default();
        let document = Document::load_from_str(
            r#"<svg viewBox="0 0 100 100">
                 <defs>
                   <filter id="f1">
                     <feComponentTransfer>
                       <feFuncR type="discrete" tableValues="0 1"/>
                       <feFuncG type="discrete" tableValues="0 1"/>
                       <feFuncB type="discrete" tableValues="0 1"/>
                     </feComponentTransfer>
                   </filter>
                 </defs>
                 <rect width="100" height="100" filter="url(#f1)"/>
               </svg>"#,
            &session,
        )
        .unwrap();

        let viewbox = document.get_viewbox(&session).unwrap();
        let coords =
            CoordinateSystem::new(viewbox, CanvasGeometry::new(9_144_000, 9_144_000)).unwrap();
        let mut ctx = ConversionContext::new(session, coords, Services::default());
        let registry = crate::converters::default_registry();

        let rect = document.root().children().nth(1).unwrap();
        let s = registry.convert_node(&rect, &document, &mut ctx).unwrap();

        assert!(s.contains("<a:biLevel thresh=\"50000\"/>"));
    }

    #[test]
    fn dangling_filter_reference_degrades() {
        let s = convert_first(
            r#"<svg viewBox="0 0 100 100">
                 <rect width="10" height="10" filter="url(#nope)"/>
               </svg>"#,
        )
        .unwrap();

        assert!(!s.contains("biLevel"));
    }
}
