//! Package parts and the content-type factory.
//!
//! Every part is created once during assembly and lives in the package arena
//! until the package is dropped. Parts refer to each other only through
//! [`PartId`] handles held in their relationship collections.

use crate::error::{Error, Result};
use crate::opc::constants::{content_type as ct, relationship_type as rt};
use crate::opc::packuri::PackURI;
use crate::opc::reader::SerializedPart;
use crate::opc::rel::Relationships;
use crate::xml::XmlElement;
use serde::Serialize;
use std::cell::OnceCell;

/// Handle to a part in a package arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub(crate) usize);

impl PartId {
    /// Position of the part in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Image formats recognized by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Emf,
    Wmf,
}

impl ImageFormat {
    /// Identify an image by its magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(ImageFormat::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"GIF8") {
            Some(ImageFormat::Gif)
        } else if data.starts_with(b"BM") {
            Some(ImageFormat::Bmp)
        } else if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            Some(ImageFormat::Tiff)
        } else if data.len() >= 44 && data.starts_with(&[1, 0, 0, 0]) && &data[40..44] == b" EMF" {
            Some(ImageFormat::Emf)
        } else if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A])
            || data.starts_with(&[1, 0, 9, 0])
            || data.starts_with(&[2, 0, 9, 0])
        {
            Some(ImageFormat::Wmf)
        } else {
            None
        }
    }

    /// The content type this format is normally declared with.
    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Png => ct::PNG,
            ImageFormat::Jpeg => ct::JPEG,
            ImageFormat::Gif => ct::GIF,
            ImageFormat::Bmp => ct::BMP,
            ImageFormat::Tiff => ct::TIFF,
            ImageFormat::Emf => ct::X_EMF,
            ImageFormat::Wmf => ct::X_WMF,
        }
    }
}

/// What the main document part learned from its relationships.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPartInfo {
    /// Style definitions part
    pub styles: Option<PartId>,
    /// Numbering definitions part
    pub numbering: Option<PartId>,
}

/// What an image part learned from its bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePartInfo {
    /// Format detected from the blob, if recognizable
    pub detected: Option<ImageFormat>,
}

/// The specialized representation chosen for a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartKind {
    /// Main word-processing document (including template and macro variants)
    Document(DocumentPartInfo),
    /// Style definitions
    Styles,
    /// Numbering definitions
    Numbering,
    /// Core document properties
    CoreProperties,
    /// Raster or vector image
    Image(ImagePartInfo),
    /// Any other XML part
    Xml,
    /// Unclassified binary data
    Opaque,
}

impl PartKind {
    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            PartKind::Document(_) => "document",
            PartKind::Styles => "styles",
            PartKind::Numbering => "numbering",
            PartKind::CoreProperties => "core-properties",
            PartKind::Image(_) => "image",
            PartKind::Xml => "xml",
            PartKind::Opaque => "opaque",
        }
    }

    /// Whether parts of this kind carry an XML payload.
    pub fn is_xml(&self) -> bool {
        !matches!(self, PartKind::Image(_) | PartKind::Opaque)
    }
}

/// Content-type to part-kind table.
pub struct PartFactory;

impl PartFactory {
    /// Choose the specialized representation for a content type.
    pub fn kind_for(content_type: &str) -> PartKind {
        match content_type {
            ct::WML_DOCUMENT_MAIN
            | ct::WML_TEMPLATE_MAIN
            | ct::WML_DOCUMENT_MACRO
            | ct::WML_TEMPLATE_MACRO => PartKind::Document(DocumentPartInfo::default()),
            ct::WML_STYLES => PartKind::Styles,
            ct::WML_NUMBERING => PartKind::Numbering,
            ct::OPC_CORE_PROPERTIES => PartKind::CoreProperties,
            other if other.starts_with("image/") => PartKind::Image(ImagePartInfo::default()),
            other if other.ends_with("+xml") || other.ends_with("/xml") => PartKind::Xml,
            _ => PartKind::Opaque,
        }
    }

    /// Construct a part with an empty relationship collection.
    pub fn load(spart: SerializedPart) -> Part {
        let kind = Self::kind_for(&spart.content_type);
        Part {
            partname: spart.partname,
            content_type: spart.content_type,
            reltype: spart.reltype,
            blob: spart.blob,
            rels: Relationships::new(),
            kind,
            max_depth: spart.max_depth,
            root: OnceCell::new(),
        }
    }
}

/// A part of an OOXML package.
#[derive(Debug)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    reltype: String,
    blob: Vec<u8>,
    rels: Relationships,
    kind: PartKind,
    max_depth: usize,
    root: OnceCell<std::result::Result<XmlElement, String>>,
}

impl Part {
    /// The partname of this part.
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// The content type of this part.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Type of the relationship through which the part was first reached.
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Raw bytes.
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Outgoing relationships.
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    pub(crate) fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// The specialized representation.
    pub fn kind(&self) -> &PartKind {
        &self.kind
    }

    /// Root element of an XML part, parsed on first access.
    ///
    /// A parse failure is cached too: every later call reports the same error.
    pub fn root(&self) -> Result<&XmlElement> {
        if !self.kind.is_xml() {
            return Err(Error::InvalidData(format!(
                "{} ({}) is not an XML part",
                self.partname, self.content_type
            )));
        }
        self.root
            .get_or_init(|| {
                XmlElement::parse_with_limit(&self.blob, self.max_depth).map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|msg| Error::XmlParse(format!("{}: {}", self.partname, msg)))
    }

    /// Validation that needs resolved relationships.
    ///
    /// `content_types` is indexed by [`PartId`]. Problems are logged, never
    /// returned: a mismatch does not stop the part from being usable.
    pub(crate) fn after_assembly(&mut self, content_types: &[String]) {
        let content_type_of =
            |id: PartId| content_types.get(id.index()).map(String::as_str).unwrap_or_default();

        match &mut self.kind {
            PartKind::Document(info) => {
                for rel in self.rels.iter() {
                    let Some(target) = rel.target_part() else {
                        continue;
                    };
                    let (slot, expected) = if rt::matches(rel.reltype(), rt::STYLES) {
                        (&mut info.styles, ct::WML_STYLES)
                    } else if rt::matches(rel.reltype(), rt::NUMBERING) {
                        (&mut info.numbering, ct::WML_NUMBERING)
                    } else {
                        continue;
                    };
                    if slot.is_some() {
                        continue;
                    }
                    if content_type_of(target) != expected {
                        log::warn!(
                            "{} links {} with content type {}, expected {}",
                            self.partname,
                            rel.r_id(),
                            content_type_of(target),
                            expected
                        );
                    }
                    *slot = Some(target);
                }
            }
            PartKind::Image(info) => {
                info.detected = ImageFormat::sniff(&self.blob);
                match info.detected {
                    Some(format) if !self.content_type.eq_ignore_ascii_case(format.content_type()) => {
                        log::warn!(
                            "{} is declared {} but its bytes look like {:?}",
                            self.partname,
                            self.content_type,
                            format
                        );
                    }
                    None if !self.blob.is_empty() => {
                        log::debug!("{} has an unrecognized image signature", self.partname);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_MAX_DEPTH;

    fn spart(partname: &str, content_type: &str, blob: &[u8]) -> SerializedPart {
        SerializedPart {
            partname: PackURI::new(partname).unwrap(),
            content_type: content_type.to_string(),
            reltype: String::new(),
            blob: blob.to_vec(),
            srels: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[test]
    fn test_factory_table() {
        assert!(matches!(
            PartFactory::kind_for(ct::WML_DOCUMENT_MACRO),
            PartKind::Document(_)
        ));
        assert_eq!(PartFactory::kind_for(ct::WML_STYLES), PartKind::Styles);
        assert!(matches!(PartFactory::kind_for("image/png"), PartKind::Image(_)));
        assert_eq!(
            PartFactory::kind_for("application/vnd.openxmlformats-officedocument.theme+xml"),
            PartKind::Xml
        );
        assert_eq!(PartFactory::kind_for("application/xml"), PartKind::Xml);
        assert_eq!(PartFactory::kind_for(ct::OPAQUE), PartKind::Opaque);
    }

    #[test]
    fn test_root_parsed_once_and_cached() {
        let part = PartFactory::load(spart("/word/a.xml", "application/xml", b"<a><b/></a>"));
        let first = part.root().unwrap() as *const XmlElement;
        let second = part.root().unwrap() as *const XmlElement;
        assert_eq!(first, second);
        assert_eq!(part.root().unwrap().local, "a");
    }

    #[test]
    fn test_root_errors() {
        let broken = PartFactory::load(spart("/word/a.xml", "application/xml", b"<a><b></a>"));
        assert!(matches!(broken.root(), Err(Error::XmlParse(_))));
        assert!(matches!(broken.root(), Err(Error::XmlParse(_))));

        let image = PartFactory::load(spart("/media/i.png", "image/png", b"\x89PNG"));
        assert!(matches!(image.root(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_root_honours_depth_ceiling() {
        let mut shallow = spart("/word/a.xml", "application/xml", b"<a><b><c/></b></a>");
        shallow.max_depth = 2;
        let part = PartFactory::load(shallow);
        assert!(matches!(part.root(), Err(Error::XmlParse(_))));
    }

    #[test]
    fn test_image_sniffing() {
        assert_eq!(ImageFormat::sniff(b"\x89PNG\r\n\x1a\n"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(b"\xFF\xD8\xFF\xE0"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"II*\0"), Some(ImageFormat::Tiff));
        assert_eq!(ImageFormat::sniff(b"hello"), None);

        let mut part = PartFactory::load(spart("/media/i.png", "image/png", b"GIF89a"));
        part.after_assembly(&[]);
        assert_eq!(
            part.kind(),
            &PartKind::Image(ImagePartInfo {
                detected: Some(ImageFormat::Gif)
            })
        );
    }
}
