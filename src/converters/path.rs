//! Converter for `path` elements, with a parser for path data.
//!
//! The parser handles the command subset a custom geometry can express:
//! move, line (including the horizontal/vertical shorthands), cubic curves,
//! and close.  Relative commands are resolved to absolute coordinates while
//! parsing.

use markup5ever::{local_name, namespace_url, ns, QualName};

use crate::context::ConversionContext;
use crate::document::Document;
use crate::drawingml::{render_custgeom_shape, ShapeProps};
use crate::element::{set_attribute, Element};
use crate::error::{ElementError, ValueErrorKind};
use crate::node::{Node, NodeBorrow};
use crate::parsers::ParseValue;
use crate::rect::Rect;
use crate::registry::{ConverterRegistry, ElementConverter};
use crate::svg2pptx_log;
use crate::transform::Transform;

use super::shape::{resolve_effect, resolve_fill};

/// One absolute path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    Close,
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.bytes.len()
    }

    /// Peeks at a command letter without consuming it.
    fn peek_command(&mut self) -> Option<u8> {
        self.skip_separators();
        match self.bytes.get(self.pos) {
            Some(&b) if b.is_ascii_alphabetic() => Some(b),
            _ => None,
        }
    }

    fn take_command(&mut self) -> Option<u8> {
        let cmd = self.peek_command()?;
        self.pos += 1;
        Some(cmd)
    }

    fn number(&mut self) -> Result<f64, ValueErrorKind> {
        self.skip_separators();
        let start = self.pos;

        if matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }

        while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }

        if matches!(self.bytes.get(self.pos), Some(b'.')) {
            self.pos += 1;
            while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        if matches!(self.bytes.get(self.pos), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let slice = &self.bytes[start..self.pos];
        let parsed = std::str::from_utf8(slice)
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite());

        match parsed {
            Some(v) => Ok(v),
            None => Err(ValueErrorKind::parse_error("expected number in path data")),
        }
    }

    fn coordinate_pair(&mut self) -> Result<(f64, f64), ValueErrorKind> {
        let x = self.number()?;
        let y = self.number()?;
        Ok((x, y))
    }
}

/// Parses path data into absolute segments.
pub fn parse_path_data(d: &str) -> Result<Vec<PathSeg>, ValueErrorKind> {
    let mut lexer = Lexer::new(d);
    let mut segs = Vec::new();

    // current point, and the start of the current subpath for Z
    let mut cur = (0.0, 0.0);
    let mut subpath_start = (0.0, 0.0);

    while !lexer.at_end() {
        let cmd = lexer
            .take_command()
            .ok_or_else(|| ValueErrorKind::parse_error("expected path command"))?;

        let relative = cmd.is_ascii_lowercase();
        let rel = |base: (f64, f64), p: (f64, f64)| {
            if relative {
                (base.0 + p.0, base.1 + p.1)
            } else {
                p
            }
        };

        match cmd.to_ascii_uppercase() {
            b'M' => {
                let p = rel(cur, lexer.coordinate_pair()?);
                segs.push(PathSeg::MoveTo(p.0, p.1));
                cur = p;
                subpath_start = p;

                // further coordinate pairs are implicit line-tos
                while !lexer.at_end() && lexer.peek_command().is_none() {
                    let p = rel(cur, lexer.coordinate_pair()?);
                    segs.push(PathSeg::LineTo(p.0, p.1));
                    cur = p;
                }
            }

            b'L' => loop {
                let p = rel(cur, lexer.coordinate_pair()?);
                segs.push(PathSeg::LineTo(p.0, p.1));
                cur = p;

                if lexer.at_end() || lexer.peek_command().is_some() {
                    break;
                }
            },

            b'H' => loop {
                let x = lexer.number()?;
                let x = if relative { cur.0 + x } else { x };
                segs.push(PathSeg::LineTo(x, cur.1));
                cur.0 = x;

                if lexer.at_end() || lexer.peek_command().is_some() {
                    break;
                }
            },

            b'V' => loop {
                let y = lexer.number()?;
                let y = if relative { cur.1 + y } else { y };
                segs.push(PathSeg::LineTo(cur.0, y));
                cur.1 = y;

                if lexer.at_end() || lexer.peek_command().is_some() {
                    break;
                }
            },

            b'C' => loop {
                let c1 = rel(cur, lexer.coordinate_pair()?);
                let c2 = rel(cur, lexer.coordinate_pair()?);
                let p = rel(cur, lexer.coordinate_pair()?);
                segs.push(PathSeg::CurveTo(c1.0, c1.1, c2.0, c2.1, p.0, p.1));
                cur = p;

                if lexer.at_end() || lexer.peek_command().is_some() {
                    break;
                }
            },

            b'Z' => {
                segs.push(PathSeg::Close);
                cur = subpath_start;
            }

            _ => {
                return Err(ValueErrorKind::value_error(
                    "unsupported path command",
                ));
            }
        }
    }

    Ok(segs)
}

fn transform_segs(segs: &[PathSeg], t: &Transform) -> Vec<PathSeg> {
    segs.iter()
        .map(|seg| match *seg {
            PathSeg::MoveTo(x, y) => {
                let (x, y) = t.transform_point(x, y);
                PathSeg::MoveTo(x, y)
            }
            PathSeg::LineTo(x, y) => {
                let (x, y) = t.transform_point(x, y);
                PathSeg::LineTo(x, y)
            }
            PathSeg::CurveTo(x1, y1, x2, y2, x, y) => {
                let (x1, y1) = t.transform_point(x1, y1);
                let (x2, y2) = t.transform_point(x2, y2);
                let (x, y) = t.transform_point(x, y);
                PathSeg::CurveTo(x1, y1, x2, y2, x, y)
            }
            PathSeg::Close => PathSeg::Close,
        })
        .collect()
}

fn seg_points(seg: &PathSeg) -> Vec<(f64, f64)> {
    match *seg {
        PathSeg::MoveTo(x, y) | PathSeg::LineTo(x, y) => vec![(x, y)],
        PathSeg::CurveTo(x1, y1, x2, y2, x, y) => vec![(x1, y1), (x2, y2), (x, y)],
        PathSeg::Close => vec![],
    }
}

fn bounding_box(segs: &[PathSeg]) -> Option<Rect> {
    let mut points = segs.iter().flat_map(seg_points);

    let first = points.next()?;
    let mut bbox = Rect::new(first.0, first.1, first.0, first.1);

    for (x, y) in points {
        bbox = bbox.union(&Rect::new(x, y, x, y));
    }

    Some(bbox)
}

pub struct PathConverter;

impl ElementConverter for PathConverter {
    fn can_convert(&self, elem: &Element) -> bool {
        elem.local_name() == "path"
    }

    fn convert(
        &self,
        node: &Node,
        document: &Document,
        _registry: &ConverterRegistry,
        ctx: &mut ConversionContext,
    ) -> Result<String, ElementError> {
        let elem = node.borrow_element();

        let d = match elem.attributes().get("d") {
            Some(d) => d,
            None => {
                svg2pptx_log!(ctx.session, "not rendering {} without path data", *elem);
                return Ok(String::new());
            }
        };

        let d_attr = QualName::new(None, ns!(), local_name!("d"));

        let segs = parse_path_data(d).map_err(|err| ElementError { attr: d_attr, err })?;

        let mut transform = Transform::default();
        for (attr, value) in elem.attributes().iter() {
            if &*attr.local == "transform" {
                set_attribute(&mut transform, attr.parse(value), &ctx.session);
            }
        }

        let segs = transform_segs(&segs, &ctx.current_transform.compose(&transform));

        let bbox = match bounding_box(&segs) {
            Some(b) => b,
            None => {
                svg2pptx_log!(ctx.session, "not rendering empty {}", *elem);
                return Ok(String::new());
            }
        };

        let (offset, extent) = ctx.coords.rect_to_emu(&bbox);

        let emu = |x: f64, y: f64| {
            let (ex, ey) = ctx.coords.to_emu(x, y);
            (ex - offset.0, ey - offset.1)
        };

        let mut path_xml = format!("<a:path w=\"{}\" h=\"{}\">", extent.0, extent.1);
        for seg in &segs {
            match *seg {
                PathSeg::MoveTo(x, y) => {
                    let (x, y) = emu(x, y);
                    path_xml
                        .push_str(&format!("<a:moveTo><a:pt x=\"{}\" y=\"{}\"/></a:moveTo>", x, y));
                }
                PathSeg::LineTo(x, y) => {
                    let (x, y) = emu(x, y);
                    path_xml.push_str(&format!("<a:lnTo><a:pt x=\"{}\" y=\"{}\"/></a:lnTo>", x, y));
                }
                PathSeg::CurveTo(x1, y1, x2, y2, x, y) => {
                    let (x1, y1) = emu(x1, y1);
                    let (x2, y2) = emu(x2, y2);
                    let (x, y) = emu(x, y);
                    path_xml.push_str(&format!(
                        "<a:cubicBezTo><a:pt x=\"{}\" y=\"{}\"/><a:pt x=\"{}\" y=\"{}\"/><a:pt x=\"{}\" y=\"{}\"/></a:cubicBezTo>",
                        x1, y1, x2, y2, x, y
                    ));
                }
                PathSeg::Close => path_xml.push_str("<a:close/>"),
            }
        }
        path_xml.push_str("</a:path>");

        let fill_hex = resolve_fill(&elem, ctx);
        let effect = resolve_effect(&elem, document, ctx);

        let name = match elem.get_id() {
            Some(id) => id.to_string(),
            None => "path".to_string(),
        };

        let props = ShapeProps {
            name: &name,
            offset,
            extent,
            fill_hex,
            effect: effect.as_deref(),
        };

        let id = ctx.next_shape_id();
        Ok(render_custgeom_shape(id, &path_xml, &props))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Services;
    use crate::coord::{CanvasGeometry, CoordinateSystem};
    use crate::session::Session;

    #[test]
    fn parses_absolute_commands() {
        let segs = parse_path_data("M 0 0 L 10 0 L 10 10 Z").unwrap();
        assert_eq!(
            segs,
            vec![
                PathSeg::MoveTo(0.0, 0.0),
                PathSeg::LineTo(10.0, 0.0),
                PathSeg::LineTo(10.0, 10.0),
                PathSeg::Close,
            ]
        );
    }

    #[test]
    fn resolves_relative_commands() {
        let segs = parse_path_data("m 10 10 l 5 0 v 5 h -5 z").unwrap();
        assert_eq!(
            segs,
            vec![
                PathSeg::MoveTo(10.0, 10.0),
                PathSeg::LineTo(15.0, 10.0),
                PathSeg::LineTo(15.0, 15.0),
                PathSeg::LineTo(10.0, 15.0),
                PathSeg::Close,
            ]
        );
    }

    #[test]
    fn implicit_line_to_after_move() {
        let segs = parse_path_data("M 0 0 10 0 10 10").unwrap();
        assert_eq!(
            segs,
            vec![
                PathSeg::MoveTo(0.0, 0.0),
                PathSeg::LineTo(10.0, 0.0),
                PathSeg::LineTo(10.0, 10.0),
            ]
        );
    }

    #[test]
    fn parses_cubic_curves() {
        let segs = parse_path_data("M0,0 C 1,2 3,4 5,6").unwrap();
        assert_eq!(
            segs,
            vec![
                PathSeg::MoveTo(0.0, 0.0),
                PathSeg::CurveTo(1.0, 2.0, 3.0, 4.0, 5.0, 6.0),
            ]
        );
    }

    #[test]
    fn rejects_garbage_and_unsupported_commands() {
        assert!(parse_path_data("M 0 banana").is_err());
        assert!(parse_path_data("M 0 0 A 1 1 0 0 0 2 2").is_err());
        assert!(parse_path_data("?").is_err());
    }

    #[test]
    fn empty_path_data_is_empty() {
        assert_eq!(parse_path_data("").unwrap(), vec![]);
        assert_eq!(parse_path_data("   ").unwrap(), vec![]);
    }

    #[test]
    fn converts_a_triangle() {
        let session = Session::default();
        let document = Document::load_from_str(
            r#"<svg viewBox="0 0 100 100">
                 <path d="M 0 0 L 100 0 L 50 100 Z"/>
               </svg>"#,
            &session,
        )
        .unwrap();

        let viewbox = document.get_viewbox(&session).unwrap();
        let coords =
            CoordinateSystem::new(viewbox, CanvasGeometry::new(9_144_000, 9_144_000)).unwrap();
        let mut ctx = ConversionContext::new(session, coords, Services::default());
        let registry = crate::converters::default_registry();

        let node = document.root().children().next().unwrap();
        let s = registry.convert_node(&node, &document, &mut ctx).unwrap();

        assert!(s.contains("<a:custGeom>"));
        assert!(s.contains("<a:path w=\"9144000\" h=\"9144000\">"));
        assert!(s.contains("<a:moveTo><a:pt x=\"0\" y=\"0\"/></a:moveTo>"));
        assert!(s.contains("<a:close/>"));
    }

    #[test]
    fn bad_path_data_omits_the_element() {
        let session = Session::default();
        let document = Document::load_from_str(
            r#"<svg viewBox="0 0 100 100"><path d="M 0 0 Q 1 1 2 2"/></svg>"#,
            &session,
        )
        .unwrap();

        let viewbox = document.get_viewbox(&session).unwrap();
        let coords =
            CoordinateSystem::new(viewbox, CanvasGeometry::new(9_144_000, 9_144_000)).unwrap();
        let mut ctx = ConversionContext::new(session, coords, Services::default());
        let registry = crate::converters::default_registry();

        let node = document.root().children().next().unwrap();
        assert_eq!(registry.convert_node(&node, &document, &mut ctx), None);
    }
}
