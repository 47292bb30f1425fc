//! Loading an SVG document into a tree of nodes.

use std::collections::HashMap;
use std::str;

use markup5ever::{expanded_name, local_name, namespace_url, ns, LocalName, Namespace, QualName};

use crate::element::Element;
use crate::error::ConversionError;
use crate::node::{Node, NodeBorrow, NodeData};
use crate::parsers::ParseValue;
use crate::rect::Rect;
use crate::session::Session;
use crate::svg2pptx_log;
use crate::viewbox::ViewBox;
use crate::xml::Attributes;

/// A loaded SVG document and its id → node index.
pub struct Document {
    root: Node,
    ids: HashMap<String, Node>,
}

impl Document {
    /// Parses an XML byte stream into a document tree.
    pub fn load_from_bytes(bytes: &[u8], session: &Session) -> Result<Document, ConversionError> {
        let s = str::from_utf8(bytes)
            .map_err(|e| ConversionError::Xml(format!("document is not UTF-8: {}", e)))?;

        Self::load_from_str(s, session)
    }

    pub fn load_from_str(s: &str, session: &Session) -> Result<Document, ConversionError> {
        let xml =
            roxmltree::Document::parse(s).map_err(|e| ConversionError::Xml(e.to_string()))?;

        let root_elem = xml.root_element();
        if root_elem.tag_name().name() != "svg" {
            return Err(ConversionError::InvalidDocumentRoot(format!(
                "expected svg, found {}",
                root_elem.tag_name().name()
            )));
        }

        let root = build_node(root_elem);

        let mut ids = HashMap::new();
        collect_ids(&root, &mut ids, session);

        Ok(Document { root, ids })
    }

    pub fn root(&self) -> Node {
        self.root.clone()
    }

    /// Looks up a node by its `id` attribute.
    pub fn lookup_internal(&self, id: &str) -> Option<Node> {
        self.ids.get(id).cloned()
    }

    /// The user-space rectangle established by the document root.
    ///
    /// Prefers the `viewBox` attribute; a root without one but with `width`
    /// and `height` gets the equivalent `0 0 w h` view box.  A root with
    /// neither carries no usable size information, which is a
    /// document-structural error.
    pub fn get_viewbox(&self, session: &Session) -> Result<Rect, ConversionError> {
        let root = self.root();
        let elem = root.borrow_element();

        let mut viewbox: Option<ViewBox> = None;
        let mut width: Option<f64> = None;
        let mut height: Option<f64> = None;

        for (attr, value) in elem.attributes().iter() {
            match attr.expanded() {
                expanded_name!("", "viewBox") => {
                    let parsed: Result<ViewBox, _> = attr.parse(value);
                    match parsed {
                        Ok(vb) => viewbox = Some(vb),
                        Err(e) => {
                            svg2pptx_log!(session, "ignoring attribute with invalid value: {}", e);
                        }
                    }
                }

                expanded_name!("", "width") => width = parse_dimension(value),
                expanded_name!("", "height") => height = parse_dimension(value),

                _ => (),
            }
        }

        if let Some(vb) = viewbox {
            return Ok(*vb);
        }

        match (width, height) {
            (Some(w), Some(h)) => Ok(Rect::from_size(w, h)),
            _ => Err(ConversionError::InvalidDocumentRoot(
                "root has neither viewBox nor width/height".to_string(),
            )),
        }
    }
}

/// Parses `width`/`height` attribute values, allowing a `px` suffix.
fn parse_dimension(value: &str) -> Option<f64> {
    let number = value.trim().trim_end_matches("px").trim();

    match number.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

fn build_node(xml_node: roxmltree::Node<'_, '_>) -> Node {
    let name = QualName::new(
        None,
        xml_node
            .tag_name()
            .namespace()
            .map(Namespace::from)
            .unwrap_or_else(|| ns!()),
        LocalName::from(xml_node.tag_name().name()),
    );

    let attributes = Attributes::from_xml(
        xml_node
            .attributes()
            .map(|a| (a.namespace(), a.name(), a.value())),
    );

    let node = Node::new(NodeData::Element(Box::new(Element::new(name, attributes))));

    for child in xml_node.children() {
        if child.is_element() {
            node.append(build_node(child));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                if !text.trim().is_empty() {
                    node.append(Node::new(NodeData::Text(text.to_string())));
                }
            }
        }
    }

    node
}

fn collect_ids(node: &Node, ids: &mut HashMap<String, Node>, session: &Session) {
    if node.is_element() {
        if let Some(id) = node.borrow_element().get_id() {
            if ids.contains_key(id) {
                svg2pptx_log!(session, "ignoring duplicate id \"{}\"", id);
            } else {
                ids.insert(id.to_string(), node.clone());
            }
        }
    }

    for child in node.children() {
        collect_ids(&child, ids, session);
    }
}
