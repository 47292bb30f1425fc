//! Store XML element attributes and their values.

use std::slice;

use markup5ever::{
    expanded_name, local_name, namespace_url, ns, LocalName, Namespace, QualName,
};
use string_cache::DefaultAtom;

use crate::limits;

/// Type used to store attribute values.
///
/// Attribute values are often repeated in an SVG file, so we intern them using the
/// string_cache crate.
pub type AttributeValue = DefaultAtom;

/// Iterable array of attribute/value pairs for one element.
#[derive(Clone)]
pub struct Attributes {
    attrs: Box<[(QualName, AttributeValue)]>,
    id_idx: Option<u16>,
}

/// Iterator from `Attributes.iter`.
pub struct AttributesIter<'a>(slice::Iter<'a, (QualName, AttributeValue)>);

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    pub fn new() -> Attributes {
        Attributes {
            attrs: [].into(),
            id_idx: None,
        }
    }

    /// Collects the attributes of a parsed XML element.
    ///
    /// Attributes beyond [`limits::MAX_LOADED_ATTRIBUTES`] are dropped.
    pub fn from_xml<'a, I>(attrs: I) -> Attributes
    where
        I: Iterator<Item = (Option<&'a str>, &'a str, &'a str)>,
    {
        let mut array = Vec::new();
        let mut id_idx = None;

        for (uri, localname, value) in attrs.take(limits::MAX_LOADED_ATTRIBUTES) {
            let qual_name = QualName::new(
                None,
                uri.map(Namespace::from).unwrap_or_else(|| namespace_url!("")),
                LocalName::from(localname),
            );

            if qual_name.expanded() == expanded_name!("", "id") {
                id_idx = Some(array.len() as u16);
            }

            array.push((qual_name, DefaultAtom::from(value)));
        }

        Attributes {
            attrs: array.into(),
            id_idx,
        }
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Creates an iterator that yields `(QualName, &'a str)` tuples.
    pub fn iter(&self) -> AttributesIter<'_> {
        AttributesIter(self.attrs.iter())
    }

    pub fn get_id(&self) -> Option<&str> {
        self.id_idx.and_then(|idx| {
            self.attrs
                .get(usize::from(idx))
                .map(|(_name, value)| &value[..])
        })
    }

    /// Looks up an un-namespaced attribute by its local name.
    pub fn get(&self, local_name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name.ns == ns!() && &*name.local == local_name)
            .map(|(_, value)| &value[..])
    }
}

impl<'a> Iterator for AttributesIter<'a> {
    type Item = (QualName, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(a, v)| (a.clone(), v.as_ref()))
    }
}
