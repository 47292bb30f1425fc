//! Converter for container elements: `g` and nested `svg`.

use markup5ever::{expanded_name, local_name, namespace_url, ns};

use crate::context::ConversionContext;
use crate::document::Document;
use crate::drawingml::render_group;
use crate::element::{set_attribute, Element};
use crate::error::ElementError;
use crate::limits;
use crate::node::{element_children, Node, NodeBorrow};
use crate::parsers::ParseValue;
use crate::registry::{ConverterRegistry, ElementConverter};
use crate::svg2pptx_log;
use crate::transform::Transform;

pub struct GroupConverter;

impl ElementConverter for GroupConverter {
    fn can_convert(&self, elem: &Element) -> bool {
        matches!(elem.local_name(), "g" | "svg")
    }

    fn convert(
        &self,
        node: &Node,
        document: &Document,
        registry: &ConverterRegistry,
        ctx: &mut ConversionContext,
    ) -> Result<String, ElementError> {
        if ctx.group_depth >= limits::MAX_GROUP_DEPTH {
            svg2pptx_log!(
                ctx.session,
                "exceeded maximum group nesting, ignoring {}",
                *node.borrow_element()
            );
            return Ok(String::new());
        }

        let (name, transform) = {
            let elem = node.borrow_element();

            let mut transform = Transform::default();
            for (attr, value) in elem.attributes().iter() {
                if attr.expanded() == expanded_name!("", "transform") {
                    set_attribute(&mut transform, attr.parse(value), &ctx.session);
                }
            }

            let name = match elem.get_id() {
                Some(id) => id.to_string(),
                None => "group".to_string(),
            };

            (name, transform)
        };

        let id = ctx.next_shape_id();

        // Child geometry sees the accumulated transform; groups do not
        // translate to a DrawingML xfrm of their own.
        let saved = ctx.current_transform;
        ctx.current_transform = saved.compose(&transform);
        ctx.group_depth += 1;

        let children: Vec<String> = element_children(node)
            .filter_map(|child| registry.convert_node(&child, document, ctx))
            .collect();

        ctx.group_depth -= 1;
        ctx.current_transform = saved;

        if children.is_empty() {
            Ok(String::new())
        } else {
            Ok(render_group(id, &name, &children))
        }
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
    fn group_wraps_children() {
        let s = convert_first(
            r#"<svg viewBox="0 0 100 100">
                 <g id="layer1">
                   <rect width="10" height="10"/>
                   <rect x="20" width="10" height="10"/>
                 </g>
               </svg>"#,
        )
        .unwrap();

        assert!(s.starts_with("<p:grpSp>"));
        assert!(s.contains("name=\"layer1\""));
        assert_eq!(s.matches("<p:sp>").count(), 2);
    }

    #[test]
    fn group_transform_applies_to_children() {
        let s = convert_first(
            r#"<svg viewBox="0 0 100 100">
                 <g transform="translate(10 0)">
                   <rect width="10" height="10" transform="translate(0 20)"/>
                 </g>
               </svg>"#,
        )
        .unwrap();

        assert!(s.contains("<a:off x=\"914400\" y=\"1828800\"/>"));
    }

    #[test]
    fn empty_group_renders_nothing() {
        assert_eq!(
            convert_first(r#"<svg viewBox="0 0 100 100"><g/></svg>"#),
            None
        );
    }

    #[test]
    fn unknown_children_are_skipped_but_siblings_convert() {
        let s = convert_first(
            r#"<svg viewBox="0 0 100 100">
                 <g>
                   <blink/>
                   <rect width="10" height="10"/>
                 </g>
               </svg>"#,
        )
        .unwrap();

        assert_eq!(s.matches("<p:sp>").count(), 1);
    }
}
