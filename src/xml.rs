//! Owned, namespace-resolved XML tree.
//!
//! Each XML part is parsed once into an [`XmlElement`] tree whose element
//! and attribute names carry their resolved namespace URI rather than the
//! prefix used in the source, so `w:p` under the transitional namespace and
//! `w:p` under the strict namespace are told apart by URI.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use crate::options::DEFAULT_MAX_DEPTH;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

/// A resolved attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttr {
    /// Namespace URI; empty for unprefixed attributes
    pub ns: String,
    /// Local name
    pub local: String,
    /// Unescaped value
    pub value: String,
}

/// Child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its namespace URI and local name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Namespace URI; empty when unbound
    pub ns: String,
    /// Local name
    pub local: String,
    /// Attributes in document order, namespace declarations excluded
    pub attrs: Vec<XmlAttr>,
    /// Element and text children in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Parse an XML blob into its root element.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_with_limit(bytes, DEFAULT_MAX_DEPTH)
    }

    /// Parse an XML blob, rejecting element nesting deeper than `max_depth`.
    pub fn parse_with_limit(bytes: &[u8], max_depth: usize) -> Result<Self> {
        let content = decode_xml_bytes(bytes)?;
        Self::parse_str_with_limit(&content, max_depth)
    }

    /// Parse an XML string into its root element.
    pub fn parse_str(content: &str) -> Result<Self> {
        Self::parse_str_with_limit(content, DEFAULT_MAX_DEPTH)
    }

    /// Parse an XML string, rejecting element nesting deeper than `max_depth`.
    pub fn parse_str_with_limit(content: &str, max_depth: usize) -> Result<Self> {
        let mut reader = NsReader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf)?;
            if matches!(event, Event::Start(_) | Event::Empty(_)) && stack.len() >= max_depth {
                return Err(Error::XmlParse(format!(
                    "element nesting deeper than {}",
                    max_depth
                )));
            }
            match event {
                Event::Start(ref e) => {
                    let element = open_element(&reader, e)?;
                    stack.push(element);
                }
                Event::Empty(ref e) => {
                    let element = open_element(&reader, e)?;
                    close_element(element, &mut stack, &mut root);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        close_element(element, &mut stack, &mut root);
                    }
                }
                Event::Text(ref e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = e.unescape()?;
                        if !text.is_empty() {
                            parent.children.push(XmlNode::Text(text.into_owned()));
                        }
                    }
                }
                Event::CData(ref e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(e).into_owned();
                        parent.children.push(XmlNode::Text(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::XmlParse(format!(
                "unclosed element <{}>",
                stack.last().map(|e| e.local.as_str()).unwrap_or_default()
            )));
        }
        root.ok_or_else(|| Error::XmlParse("document has no root element".to_string()))
    }

    /// Whether this element has the given namespace and local name.
    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.local == local && self.ns == ns
    }

    /// Attribute value by namespace and local name.
    pub fn attr(&self, ns: &str, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.local == local && a.ns == ns)
            .map(|a| a.value.as_str())
    }

    /// Attribute value by local name, whatever its namespace.
    pub fn attr_local(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.local == local)
            .map(|a| a.value.as_str())
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given name.
    pub fn child(&self, ns: &str, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.is(ns, local))
    }

    /// All child elements with the given name.
    pub fn children_named<'a>(
        &'a self,
        ns: &'a str,
        local: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |e| e.is(ns, local))
    }

    /// Concatenated text of this element's direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Every descendant element, depth-first, excluding `self`.
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        let mut stack: Vec<&XmlElement> = self.elements().collect();
        stack.reverse();
        while let Some(element) = stack.pop() {
            out.push(element);
            let start = stack.len();
            stack.extend(element.elements());
            stack[start..].reverse();
        }
        out
    }
}

impl Drop for XmlElement {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let XmlNode::Element(mut element) = node {
                pending.append(&mut element.children);
            }
        }
    }
}

fn open_element(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Result<XmlElement> {
    let (ns, local) = reader.resolve_element(e.name());
    let mut element = XmlElement {
        ns: namespace_string(ns),
        local: String::from_utf8_lossy(local.as_ref()).into_owned(),
        attrs: Vec::new(),
        children: Vec::new(),
    };

    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (ns, local) = reader.resolve_attribute(attr.key);
        element.attrs.push(XmlAttr {
            ns: namespace_string(ns),
            local: String::from_utf8_lossy(local.as_ref()).into_owned(),
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(element)
}

fn close_element(element: XmlElement, stack: &mut [XmlElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn namespace_string(result: ResolveResult<'_>) -> String {
    match result {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).into_owned(),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => String::new(),
    }
}
