//! Relationships between parts.
//!
//! Two shapes exist. [`SerializedRelationship`] is what a `.rels` descriptor
//! says, with the target still a string. [`Relationship`] is the wired edge
//! after assembly, whose internal target is a [`PartId`] handle into the
//! package arena. Edges never own their targets.

use crate::error::{Error, Result};
use crate::opc::constants::target_mode;
use crate::opc::packuri::PackURI;
use crate::opc::part::PartId;
use std::collections::HashMap;

/// A relationship as read from a `.rels` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedRelationship {
    /// Directory that relative targets resolve against
    pub base_uri: String,
    /// Relationship ID (e.g., "rId1")
    pub r_id: String,
    /// Relationship type URI
    pub reltype: String,
    /// Target exactly as written
    pub target_ref: String,
    /// Whether TargetMode="External"
    pub external: bool,
}

impl SerializedRelationship {
    /// Check if this is an external relationship.
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Absolute partname of an internal target.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.external {
            return Err(Error::InvalidPackUri(format!(
                "{} is external and has no partname",
                self.r_id
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref)
    }
}

/// Parse a relationship descriptor.
///
/// `None` (no descriptor) and an empty blob both yield an empty list.
pub fn parse_rels_xml(blob: Option<&[u8]>, base_uri: &str) -> Result<Vec<SerializedRelationship>> {
    let Some(blob) = blob else {
        return Ok(Vec::new());
    };
    let content = crate::container::decode_xml_bytes(blob)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut srels = Vec::new();
    let mut reader = quick_xml::Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Empty(ref e))
            | Ok(quick_xml::events::Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut r_id = String::new();
                let mut reltype = String::new();
                let mut target_ref = String::new();
                let mut external = false;

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => r_id = attr.unescape_value()?.to_string(),
                        b"Type" => reltype = attr.unescape_value()?.to_string(),
                        b"Target" => target_ref = attr.unescape_value()?.to_string(),
                        b"TargetMode" => {
                            external = attr
                                .unescape_value()?
                                .eq_ignore_ascii_case(target_mode::EXTERNAL)
                        }
                        _ => {}
                    }
                }

                if !r_id.is_empty() {
                    srels.push(SerializedRelationship {
                        base_uri: base_uri.to_string(),
                        r_id,
                        reltype,
                        target_ref,
                        external,
                    });
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(format!("relationships: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(srels)
}

/// Where a wired relationship points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelTarget {
    /// A part in the same package, by arena handle
    Internal(PartId),
    /// A literal external address
    External(String),
}

/// A wired relationship from a source part (or the package) to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    target_ref: String,
    target: RelTarget,
}

impl Relationship {
    /// Create a relationship.
    pub fn new(r_id: String, reltype: String, target_ref: String, target: RelTarget) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            target,
        }
    }

    /// Relationship ID.
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Relationship type URI.
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Target as written in the descriptor.
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Resolved target.
    pub fn target(&self) -> &RelTarget {
        &self.target
    }

    /// Internal target handle, if any.
    pub fn target_part(&self) -> Option<PartId> {
        match self.target {
            RelTarget::Internal(id) => Some(id),
            RelTarget::External(_) => None,
        }
    }

    /// Check if this is an external relationship.
    pub fn is_external(&self) -> bool {
        matches!(self.target, RelTarget::External(_))
    }
}

/// Ordered collection of relationships, indexable by id.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship. A repeated id replaces the earlier entry in place.
    pub fn add(&mut self, rel: Relationship) {
        if let Some(&index) = self.by_id.get(rel.r_id()) {
            log::debug!("duplicate relationship id {}, keeping the later one", rel.r_id());
            self.rels[index] = rel;
            return;
        }
        self.by_id.insert(rel.r_id.clone(), self.rels.len());
        self.rels.push(rel);
    }

    /// Get a relationship by ID.
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.by_id.get(r_id).map(|&i| &self.rels[i])
    }

    /// Iterate in descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Relationships of one type, in descriptor order.
    pub fn by_type<'a>(&'a self, reltype: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.rels.iter().filter(move |rel| rel.reltype == reltype)
    }

    /// The single relationship of a type.
    ///
    /// When several exist the first wins, matching what Word does with a
    /// duplicated styles or numbering link.
    pub fn part_with_reltype<'a>(&'a self, reltype: &'a str) -> Result<&'a Relationship> {
        self.by_type(reltype)
            .next()
            .ok_or_else(|| Error::RelationshipNotFound(format!("no relationship of type '{}'", reltype)))
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/a&amp;b" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_rels_xml() {
        let srels = parse_rels_xml(Some(RELS), "/word").unwrap();
        assert_eq!(srels.len(), 3);

        assert_eq!(srels[0].r_id, "rId1");
        assert_eq!(
            srels[0].target_partname().unwrap().as_str(),
            "/word/styles.xml"
        );
        assert_eq!(
            srels[1].target_partname().unwrap().as_str(),
            "/media/image1.png"
        );

        assert!(srels[2].is_external());
        assert_eq!(srels[2].target_ref, "https://example.com/a&b");
        assert!(srels[2].target_partname().is_err());
    }

    #[test]
    fn test_absent_descriptor_is_empty() {
        assert!(parse_rels_xml(None, "/word").unwrap().is_empty());
        assert!(parse_rels_xml(Some(b"  "), "/word").unwrap().is_empty());
    }

    #[test]
    fn test_relationships_collection() {
        let mut rels = Relationships::new();
        rels.add(Relationship::new(
            "rId2".to_string(),
            "http://test/type1".to_string(),
            "target2.xml".to_string(),
            RelTarget::Internal(PartId(1)),
        ));
        rels.add(Relationship::new(
            "rId1".to_string(),
            "http://test/type1".to_string(),
            "target1.xml".to_string(),
            RelTarget::Internal(PartId(0)),
        ));
        rels.add(Relationship::new(
            "rId3".to_string(),
            "http://test/link".to_string(),
            "https://example.com".to_string(),
            RelTarget::External("https://example.com".to_string()),
        ));

        assert_eq!(rels.len(), 3);
        assert_eq!(rels.get("rId1").unwrap().target_part(), Some(PartId(0)));
        assert!(rels.get("rId4").is_none());
        assert!(rels.get("rId3").unwrap().is_external());

        let order: Vec<&str> = rels.iter().map(|r| r.r_id()).collect();
        assert_eq!(order, ["rId2", "rId1", "rId3"]);

        assert_eq!(rels.by_type("http://test/type1").count(), 2);
        assert_eq!(
            rels.part_with_reltype("http://test/type1").unwrap().r_id(),
            "rId2"
        );
        assert!(matches!(
            rels.part_with_reltype("http://test/missing"),
            Err(Error::RelationshipNotFound(_))
        ));
    }
}
