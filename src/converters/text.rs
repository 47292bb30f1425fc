//! Converter for `text` elements.

use markup5ever::{expanded_name, local_name, namespace_url, ns};

use crate::context::{ConversionContext, ResourceNeed};
use crate::document::Document;
use crate::drawingml::{render_text_shape, ShapeProps};
use crate::element::{set_attribute, Element};
use crate::error::ElementError;
use crate::node::{text_content, Node, NodeBorrow};
use crate::parsers::ParseValue;
use crate::rect::Rect;
use crate::registry::{ConverterRegistry, ElementConverter};
use crate::svg2pptx_log;
use crate::transform::Transform;

const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Rough advance-width factor for sizing the text box.
///
/// The real extent depends on font metrics, which are a packaging-stage
/// concern; the box only needs to be stable and large enough for
/// PowerPoint's own layout to take over.
const APPROX_GLYPH_ASPECT: f64 = 0.6;

const LINE_HEIGHT_FACTOR: f64 = 1.2;

pub struct TextConverter;

impl ElementConverter for TextConverter {
    fn can_convert(&self, elem: &Element) -> bool {
        elem.local_name() == "text"
    }

    fn convert(
        &self,
        node: &Node,
        _document: &Document,
        _registry: &ConverterRegistry,
        ctx: &mut ConversionContext,
    ) -> Result<String, ElementError> {
        let elem = node.borrow_element();

        let content = text_content(node);
        let content = content.trim();
        if content.is_empty() {
            svg2pptx_log!(ctx.session, "not rendering {} with no content", *elem);
            return Ok(String::new());
        }

        let mut x = 0.0;
        let mut y = 0.0;
        let mut font_size = DEFAULT_FONT_SIZE;
        let mut transform = Transform::default();

        for (attr, value) in elem.attributes().iter() {
            match attr.expanded() {
                expanded_name!("", "x") => set_attribute(&mut x, attr.parse(value), &ctx.session),
                expanded_name!("", "y") => set_attribute(&mut y, attr.parse(value), &ctx.session),
                expanded_name!("", "transform") => {
                    set_attribute(&mut transform, attr.parse(value), &ctx.session)
                }
                _ => {
                    if attr.ns == ns!() && &*attr.local == "font-size" {
                        set_attribute(&mut font_size, attr.parse(value), &ctx.session);
                    }
                }
            }
        }

        let font_family = elem.attributes().get("font-family").map(str::to_string);

        if let Some(ref family) = font_family {
            ctx.declare_resource(ResourceNeed::Font(family.clone()));
        }

        // The SVG anchor is the baseline start; approximate the box from
        // the character count.
        let width = content.chars().count() as f64 * font_size * APPROX_GLYPH_ASPECT;
        let height = font_size * LINE_HEIGHT_FACTOR;
        let user_rect = Rect::new(x, y - font_size, x + width, y - font_size + height);

        let mapped = ctx
            .current_transform
            .compose(&transform)
            .transform_rect(&user_rect);
        let (offset, extent) = ctx.coords.rect_to_emu(&mapped);

        let name = match elem.get_id() {
            Some(id) => id.to_string(),
            None => "text".to_string(),
        };

        let props = ShapeProps {
            name: &name,
            offset,
            extent,
            fill_hex: None,
            effect: None,
        };

        let id = ctx.next_shape_id();
        Ok(render_text_shape(
            id,
            content,
            font_family.as_deref(),
            &props,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Services;
    use crate::coord::{CanvasGeometry, CoordinateSystem};
    use crate::session::Session;

    fn convert(svg: &str) -> (Option<String>, Vec<ResourceNeed>) {
        let session = Session::default();
        let document = Document::load_from_str(svg, &session).unwrap();

        let viewbox = document.get_viewbox(&session).unwrap();
        let coords =
            CoordinateSystem::new(viewbox, CanvasGeometry::new(9_144_000, 9_144_000)).unwrap();
        let mut ctx = ConversionContext::new(session, coords, Services::default());
        let registry = crate::converters::default_registry();

        let node = document.root().children().next().unwrap();
        let fragment = registry.convert_node(&node, &document, &mut ctx);

        let (_, resources) = ctx.into_output();
        (fragment, resources)
    }

    #[test]
    fn renders_a_run_with_content() {
        let (s, _) = convert(
            r#"<svg viewBox="0 0 100 100"><text x="10" y="20">Hi &amp; bye</text></svg>"#,
        );
        let s = s.unwrap();

        assert!(s.contains("<p:txBody>"));
        assert!(s.contains("<a:t>Hi &amp; bye</a:t>"));
    }

    #[test]
    fn declares_font_resource() {
        let (s, resources) = convert(
            r#"<svg viewBox="0 0 100 100">
                 <text y="20" font-family="Fira Sans">x</text>
               </svg>"#,
        );

        assert!(s.unwrap().contains("<a:latin typeface=\"Fira Sans\"/>"));
        assert_eq!(resources, vec![ResourceNeed::Font("Fira Sans".to_string())]);
    }

    #[test]
    fn empty_text_renders_nothing() {
        let (s, resources) = convert(r#"<svg viewBox="0 0 100 100"><text y="20">  </text></svg>"#);

        assert_eq!(s, None);
        assert!(resources.is_empty());
    }
}
