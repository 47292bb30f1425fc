//! The `feComponentTransfer` filter primitive and its transfer functions.

use cssparser::Parser;
use markup5ever::{expanded_name, local_name, namespace_url, ns};

use crate::element::set_attribute;
use crate::error::*;
use crate::limits;
use crate::node::{Node, NodeBorrow};
use crate::parse_identifiers;
use crate::parsers::{CustomIdent, NumberList, NumberListLength, Parse, ParseValue};
use crate::session::Session;
use crate::svg2pptx_log;

use super::Input;

/// Color components that can be influenced by `feComponentTransfer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R,
    G,
    B,
    A,
}

impl Channel {
    /// Local name of the child element that defines this channel.
    fn func_element_name(self) -> &'static str {
        match self {
            Channel::R => "feFuncR",
            Channel::G => "feFuncG",
            Channel::B => "feFuncB",
            Channel::A => "feFuncA",
        }
    }
}

/// Component transfer function types.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionType {
    Identity,
    Table,
    Discrete,
    Linear,
    Gamma,
}

impl Parse for FunctionType {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        Ok(parse_identifiers!(
            parser,
            "identity" => FunctionType::Identity,
            "table" => FunctionType::Table,
            "discrete" => FunctionType::Discrete,
            "linear" => FunctionType::Linear,
            "gamma" => FunctionType::Gamma,
        )?)
    }
}

/// One channel's transfer function, in the shape classification wants.
#[derive(Clone, Debug, PartialEq)]
pub enum TransferFunction {
    Identity,
    Table(Vec<f64>),
    Discrete(Vec<f64>),
    Linear { slope: f64, intercept: f64 },
    Gamma { amplitude: f64, exponent: f64, offset: f64 },
}

/// A parsed `feFuncR`/`feFuncG`/`feFuncB`/`feFuncA` element.
///
/// Defaults are the ones from the SVG specification: `slope=1`,
/// `intercept=0`, `amplitude=1`, `exponent=1`, `offset=0`, empty table.
#[derive(Clone, Debug, PartialEq)]
pub struct FeFunc {
    pub channel: Channel,
    pub function_type: FunctionType,
    pub table_values: Vec<f64>,
    pub slope: f64,
    pub intercept: f64,
    pub amplitude: f64,
    pub exponent: f64,
    pub offset: f64,
}

impl FeFunc {
    pub fn default_for(channel: Channel) -> Self {
        Self {
            channel,
            function_type: FunctionType::Identity,
            table_values: Vec::new(),
            slope: 1.0,
            intercept: 0.0,
            amplitude: 1.0,
            exponent: 1.0,
            offset: 0.0,
        }
    }

    /// Reads attribute values leniently.
    ///
    /// A value that fails to parse is ignored and the default kept, so a
    /// channel with garbage in it degrades to the identity function rather
    /// than failing the filter.
    pub fn set_attributes(&mut self, elem: &crate::element::Element, session: &Session) {
        for (attr, value) in elem.attributes().iter() {
            match attr.expanded() {
                expanded_name!("", "type") => {
                    set_attribute(&mut self.function_type, attr.parse(value), session)
                }
                expanded_name!("", "tableValues") => {
                    // Limit list size to mitigate malicious documents
                    let parsed = NumberList::parse_str(value, NumberListLength::Unbounded)
                        .attribute(attr.clone())
                        .and_then(|NumberList(v)| {
                            if v.len() > limits::MAX_TABLE_VALUES {
                                Err(ElementError {
                                    attr: attr.clone(),
                                    err: ValueErrorKind::value_error("too many values"),
                                })
                            } else {
                                Ok(v)
                            }
                        });

                    match parsed {
                        Ok(v) => self.table_values = v,
                        Err(e) => {
                            svg2pptx_log!(session, "ignoring attribute with invalid value: {}", e);
                        }
                    }
                }
                expanded_name!("", "slope") => {
                    set_attribute(&mut self.slope, attr.parse(value), session)
                }
                expanded_name!("", "intercept") => {
                    set_attribute(&mut self.intercept, attr.parse(value), session)
                }
                expanded_name!("", "amplitude") => {
                    set_attribute(&mut self.amplitude, attr.parse(value), session)
                }
                expanded_name!("", "exponent") => {
                    set_attribute(&mut self.exponent, attr.parse(value), session)
                }
                expanded_name!("", "offset") => {
                    set_attribute(&mut self.offset, attr.parse(value), session)
                }

                _ => (),
            }
        }

        // The table function type with empty table_values is considered
        // an identity function.
        match self.function_type {
            FunctionType::Table | FunctionType::Discrete => {
                if self.table_values.is_empty() {
                    self.function_type = FunctionType::Identity;
                }
            }
            _ => (),
        }
    }

    pub fn transfer_function(&self) -> TransferFunction {
        match self.function_type {
            FunctionType::Identity => TransferFunction::Identity,
            FunctionType::Table => TransferFunction::Table(self.table_values.clone()),
            FunctionType::Discrete => TransferFunction::Discrete(self.table_values.clone()),
            FunctionType::Linear => TransferFunction::Linear {
                slope: self.slope,
                intercept: self.intercept,
            },
            FunctionType::Gamma => TransferFunction::Gamma {
                amplitude: self.amplitude,
                exponent: self.exponent,
                offset: self.offset,
            },
        }
    }
}

/// Parsed contents of one `feComponentTransfer` element.
///
/// A channel is `None` when the element has no `feFunc*` child for it;
/// classification treats that the same as an explicit identity function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentTransferParams {
    pub input: Input,
    pub result: Option<CustomIdent>,
    pub red: Option<TransferFunction>,
    pub green: Option<TransferFunction>,
    pub blue: Option<TransferFunction>,
    pub alpha: Option<TransferFunction>,
}

impl ComponentTransferParams {
    /// The RGB channels in classification order.
    pub fn rgb(&self) -> [&Option<TransferFunction>; 3] {
        [&self.red, &self.green, &self.blue]
    }

    pub fn defined(&self) -> impl Iterator<Item = &TransferFunction> {
        [&self.red, &self.green, &self.blue, &self.alpha]
            .into_iter()
            .flatten()
    }
}

/// Parses one `feComponentTransfer` element and its `feFunc*` children.
///
/// Never fails: every malformed piece degrades to its default with a log
/// line.  When a channel has several `feFunc*` children the last one in
/// document order wins.
pub fn parse(node: &Node, session: &Session) -> ComponentTransferParams {
    let mut params = ComponentTransferParams::default();

    {
        let elem = node.borrow_element();
        for (attr, value) in elem.attributes().iter() {
            match attr.expanded() {
                expanded_name!("", "in") => {
                    let mut input = Input::Unspecified;
                    set_attribute(&mut input, attr.parse(value), session);
                    params.input = input;
                }
                expanded_name!("", "result") => {
                    let mut result = None;
                    set_attribute(&mut result, attr.parse(value).map(Some), session);
                    params.result = result;
                }
                _ => (),
            }
        }
    }

    params.red = parse_channel(node, Channel::R, session);
    params.green = parse_channel(node, Channel::G, session);
    params.blue = parse_channel(node, Channel::B, session);
    params.alpha = parse_channel(node, Channel::A, session);

    params
}

fn parse_channel(node: &Node, channel: Channel, session: &Session) -> Option<TransferFunction> {
    let func_node = node
        .children()
        .rev()
        .filter(|c| c.is_element())
        .find(|c| c.borrow_element().local_name() == channel.func_element_name())?;

    let mut func = FeFunc::default_for(channel);
    func.set_attributes(&func_node.borrow_element(), session);

    Some(func.transfer_function())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn parse_snippet(s: &str) -> ComponentTransferParams {
        let session = Session::default();
        let svg = format!("<svg viewBox=\"0 0 1 1\">{}</svg>", s);
        let doc = Document::load_from_str(&svg, &session).unwrap();

        let fe = doc.root().children().next().unwrap();
        parse(&fe, &session)
    }

    #[test]
    fn parses_all_function_types() {
        let params = parse_snippet(
            r#"<feComponentTransfer in="SourceGraphic" result="out">
                 <feFuncR type="discrete" tableValues="0 1"/>
                 <feFuncG type="linear" slope="0.5" intercept="0.25"/>
                 <feFuncB type="gamma" amplitude="1.1" exponent="2.2" offset="-0.1"/>
                 <feFuncA type="table" tableValues="0 0.5 1"/>
               </feComponentTransfer>"#,
        );

        assert_eq!(params.input, Input::SourceGraphic);
        assert_eq!(params.result, Some(CustomIdent("out".to_string())));
        assert_eq!(params.red, Some(TransferFunction::Discrete(vec![0.0, 1.0])));
        assert_eq!(
            params.green,
            Some(TransferFunction::Linear {
                slope: 0.5,
                intercept: 0.25
            })
        );
        assert_eq!(
            params.blue,
            Some(TransferFunction::Gamma {
                amplitude: 1.1,
                exponent: 2.2,
                offset: -0.1
            })
        );
        assert_eq!(
            params.alpha,
            Some(TransferFunction::Table(vec![0.0, 0.5, 1.0]))
        );
    }

    #[test]
    fn missing_channels_are_none() {
        let params = parse_snippet("<feComponentTransfer/>");

        assert_eq!(params.red, None);
        assert_eq!(params.green, None);
        assert_eq!(params.blue, None);
        assert_eq!(params.alpha, None);
    }

    #[test]
    fn garbage_table_values_degrade_to_identity() {
        let params = parse_snippet(
            r#"<feComponentTransfer>
                 <feFuncR type="discrete" tableValues="abc def"/>
               </feComponentTransfer>"#,
        );

        // type stays discrete, table stays empty, empty table means identity
        assert_eq!(params.red, Some(TransferFunction::Identity));
    }

    #[test]
    fn unknown_type_degrades_to_identity() {
        let params = parse_snippet(
            r#"<feComponentTransfer>
                 <feFuncG type="sinusoidal" slope="2"/>
               </feComponentTransfer>"#,
        );

        assert_eq!(params.green, Some(TransferFunction::Identity));
    }

    #[test]
    fn empty_table_is_identity() {
        let params = parse_snippet(
            r#"<feComponentTransfer>
                 <feFuncB type="table" tableValues=""/>
               </feComponentTransfer>"#,
        );

        assert_eq!(params.blue, Some(TransferFunction::Identity));
    }

    #[test]
    fn last_func_child_wins() {
        let params = parse_snippet(
            r#"<feComponentTransfer>
                 <feFuncR type="linear" slope="0.2"/>
                 <feFuncR type="discrete" tableValues="0 1"/>
               </feComponentTransfer>"#,
        );

        assert_eq!(params.red, Some(TransferFunction::Discrete(vec![0.0, 1.0])));
    }

    #[test]
    fn malformed_numeric_attribute_keeps_default() {
        let params = parse_snippet(
            r#"<feComponentTransfer>
                 <feFuncR type="linear" slope="banana" intercept="0.5"/>
               </feComponentTransfer>"#,
        );

        assert_eq!(
            params.red,
            Some(TransferFunction::Linear {
                slope: 1.0,
                intercept: 0.5
            })
        );
    }

    #[test]
    fn oversized_table_degrades_to_identity() {
        let values = vec!["0.5"; limits::MAX_TABLE_VALUES + 1].join(" ");
        let params = parse_snippet(&format!(
            r#"<feComponentTransfer>
                 <feFuncR type="table" tableValues="{}"/>
               </feComponentTransfer>"#,
            values
        ));

        assert_eq!(params.red, Some(TransferFunction::Identity));
    }
}
