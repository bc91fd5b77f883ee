//! ZIP container abstraction for OOXML packages.
//!
//! The container is the physical layer: it opens the archive, serves raw
//! member bytes by partname, and parses the `[Content_Types].xml` map. It
//! knows nothing about relationships beyond where their descriptors live.

use crate::error::{Error, Result};
use crate::opc::packuri::{PackURI, CONTENT_TYPES_URI};
use crate::options::PackageOptions;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// When we decode UTF-16 XML to a Rust String (UTF-8), the XML declaration
/// still says encoding="UTF-16". This causes quick-xml to fail when it tries
/// to re-interpret the already-decoded UTF-8 string as UTF-16.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// OOXML parts are typically UTF-8 encoded, but some (especially older
/// or non-standard documents) use UTF-16.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        let content = decode_utf16_le(&bytes[2..])?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let content = decode_utf16_be(&bytes[2..])?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // UTF-16 without BOM: ASCII markup leaves zero bytes in every other slot
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16_le(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16_be(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16_le(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;
    let units = (0..len)
        .step_by(2)
        .map(|i| u16::from_le_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn decode_utf16_be(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;
    let units = (0..len)
        .step_by(2)
        .map(|i| u16::from_be_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Content type map built from `[Content_Types].xml`.
///
/// Lookup order is exact partname override (case-insensitive), then the
/// default registered for the partname's extension.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeMap {
    /// Extension (lowercase, no dot) to content type
    defaults: HashMap<String, String>,
    /// Partname (lowercase) to content type
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Parse a content types descriptor.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut map = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(ref e))
                | Ok(quick_xml::events::Event::Start(ref e)) => {
                    let local = e.local_name();
                    let is_default = local.as_ref() == b"Default";
                    let is_override = local.as_ref() == b"Override";

                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes().flatten().filter(|_| is_default || is_override) {
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => {
                                key = Some(attr.unescape_value()?.to_string());
                            }
                            b"ContentType" => {
                                content_type = Some(attr.unescape_value()?.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(key), Some(content_type)) = (key, content_type) {
                        if is_default {
                            map.add_default(&key, content_type);
                        } else {
                            map.add_override(&key, content_type);
                        }
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(format!("content types: {}", e))),
                _ => {}
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Register a default content type for an extension.
    pub fn add_default(&mut self, extension: &str, content_type: String) {
        self.defaults
            .insert(extension.trim_start_matches('.').to_lowercase(), content_type);
    }

    /// Register an override content type for a partname.
    pub fn add_override(&mut self, partname: &str, content_type: String) {
        let key = if partname.starts_with('/') {
            partname.to_lowercase()
        } else {
            format!("/{}", partname.to_lowercase())
        };
        self.overrides.insert(key, content_type);
    }

    /// Look up the content type for a partname.
    pub fn get(&self, partname: &PackURI) -> Result<&str> {
        if let Some(ct) = self.overrides.get(&partname.as_str().to_lowercase()) {
            return Ok(ct);
        }
        if let Some(ct) = self.defaults.get(&partname.ext().to_lowercase()) {
            return Ok(ct);
        }
        Err(Error::ContentTypeNotFound(partname.to_string()))
    }

    /// Number of override entries.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

/// OOXML container abstraction over a ZIP archive.
pub struct Container {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
    /// Lowercased member name to the name actually stored in the archive
    folded_names: HashMap<String, String>,
    max_part_size: Option<u64>,
}

impl Container {
    /// Open a container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docweave::container::Container;
    ///
    /// let container = Container::open("document.docx")?;
    /// # Ok::<(), docweave::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_options(data, &PackageOptions::default())
    }

    /// Create a container from a byte vector with explicit limits.
    pub fn from_bytes_with_options(data: Vec<u8>, options: &PackageOptions) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        let folded_names = archive
            .file_names()
            .map(|name| (name.to_lowercase(), name.to_string()))
            .collect();
        Ok(Self {
            archive: RefCell::new(archive),
            folded_names,
            max_part_size: options.max_part_size,
        })
    }

    /// Create a container from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Map a partname to the member name stored in the archive, if any.
    fn member_for(&self, partname: &PackURI) -> Option<String> {
        let membername = partname.membername();
        if self.archive.borrow().index_for_name(membername).is_some() {
            return Some(membername.to_string());
        }
        self.folded_names.get(&membername.to_lowercase()).cloned()
    }

    /// Read a member by archive name, enforcing the size ceiling.
    ///
    /// Failures are scoped to the member so callers can drop just that part.
    fn read_member(&self, name: &str) -> Result<Vec<u8>> {
        let part_read = |reason: String| Error::PartRead {
            member: name.to_string(),
            reason,
        };

        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(name).map_err(|e| part_read(e.to_string()))?;
        if let Some(max) = self.max_part_size {
            if file.size() > max {
                return Err(part_read(format!(
                    "{} bytes, over the {} byte limit",
                    file.size(),
                    max
                )));
            }
        }
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data).map_err(|e| part_read(e.to_string()))?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn contains(&self, partname: &PackURI) -> bool {
        self.member_for(partname).is_some()
    }

    /// List all member names in the archive.
    pub fn member_names(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// Parse the package's `[Content_Types].xml`.
    ///
    /// Absence is fatal: no part can be classified without it.
    pub fn content_types(&self) -> Result<ContentTypeMap> {
        let uri = PackURI::new(CONTENT_TYPES_URI)?;
        let member = self
            .member_for(&uri)
            .ok_or_else(|| Error::MissingComponent("[Content_Types].xml".to_string()))?;
        let bytes = self.read_member(&member)?;
        ContentTypeMap::parse(&decode_xml_bytes(&bytes)?)
    }

    /// Read the raw bytes of a part.
    ///
    /// A missing archive entry yields an empty blob: some producers write
    /// relationships to members they never store.
    pub fn blob_for(&self, partname: &PackURI) -> Result<Vec<u8>> {
        match self.member_for(partname) {
            Some(member) => self.read_member(&member),
            None => {
                log::debug!("no archive member for {}, using empty blob", partname);
                Ok(Vec::new())
            }
        }
    }

    /// Read the relationship descriptor for a part (or `/` for the package).
    ///
    /// Returns `None` when the part has no descriptor.
    pub fn rels_blob_for(&self, source: &PackURI) -> Result<Option<Vec<u8>>> {
        let rels_uri = source.rels_uri()?;
        match self.member_for(&rels_uri) {
            Some(member) => self.read_member(&member).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("members", &self.folded_names.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            for (name, data) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    const CONTENT_TYPES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="XML" ContentType="application/xml"/>
    <Default Extension="png" ContentType="image/png"/>
    <Override PartName="/word/Document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    #[test]
    fn test_content_type_lookup_order() {
        let map = ContentTypeMap::parse(std::str::from_utf8(CONTENT_TYPES).unwrap()).unwrap();

        let doc = PackURI::new("/word/document.xml").unwrap();
        assert_eq!(
            map.get(&doc).unwrap(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"
        );

        let other = PackURI::new("/word/settings.xml").unwrap();
        assert_eq!(map.get(&other).unwrap(), "application/xml");

        let image = PackURI::new("/word/media/image1.PNG").unwrap();
        assert_eq!(map.get(&image).unwrap(), "image/png");

        let unknown = PackURI::new("/word/embeddings/object.bin").unwrap();
        assert!(matches!(
            map.get(&unknown),
            Err(Error::ContentTypeNotFound(_))
        ));
    }

    #[test]
    fn test_missing_blob_is_empty() {
        let data = build_zip(&[("[Content_Types].xml", CONTENT_TYPES)]);
        let container = Container::from_bytes(data).unwrap();

        let missing = PackURI::new("/word/media/gone.png").unwrap();
        assert!(container.blob_for(&missing).unwrap().is_empty());
        assert!(!container.contains(&missing));
    }

    #[test]
    fn test_rels_blob_absent_is_none() {
        let data = build_zip(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("word/document.xml", b"<w:document/>"),
            ("word/_rels/document.xml.rels", b"<Relationships/>"),
        ]);
        let container = Container::from_bytes(data).unwrap();

        let doc = PackURI::new("/word/document.xml").unwrap();
        assert_eq!(
            container.rels_blob_for(&doc).unwrap().as_deref(),
            Some(&b"<Relationships/>"[..])
        );

        let styles = PackURI::new("/word/styles.xml").unwrap();
        assert!(container.rels_blob_for(&styles).unwrap().is_none());
    }

    #[test]
    fn test_case_insensitive_member_fallback() {
        let data = build_zip(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("Word/Document.xml", b"<w:document/>"),
        ]);
        let container = Container::from_bytes(data).unwrap();

        let doc = PackURI::new("/word/document.xml").unwrap();
        assert!(container.contains(&doc));
        assert_eq!(container.blob_for(&doc).unwrap(), b"<w:document/>");
    }

    #[test]
    fn test_missing_content_types_is_fatal() {
        let data = build_zip(&[("word/document.xml", b"<w:document/>")]);
        let container = Container::from_bytes(data).unwrap();
        assert!(matches!(
            container.content_types(),
            Err(Error::MissingComponent(_))
        ));
    }

    #[test]
    fn test_not_a_zip() {
        let result = Container::from_bytes(b"definitely not a zip archive".to_vec());
        assert!(matches!(result, Err(Error::Container(_))));
    }

    #[test]
    fn test_part_size_limit() {
        let data = build_zip(&[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("word/document.xml", &[b'x'; 64]),
        ]);
        let options = PackageOptions::new().with_max_part_size(Some(16));
        let container = Container::from_bytes_with_options(data, &options).unwrap();

        let doc = PackURI::new("/word/document.xml").unwrap();
        assert!(matches!(
            container.blob_for(&doc),
            Err(Error::PartRead { .. })
        ));
    }

    #[test]
    fn test_corrupt_member_is_part_scoped() {
        let payload = b"<w:styles>payload</w:styles>";
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let stored = SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            zip.start_file("[Content_Types].xml", stored).unwrap();
            zip.write_all(CONTENT_TYPES).unwrap();
            zip.start_file("word/styles.xml", stored).unwrap();
            zip.write_all(payload).unwrap();
            zip.finish().unwrap();
        }
        let at = buffer
            .windows(payload.len())
            .position(|w| w == payload)
            .unwrap();
        buffer[at + 12] ^= 0xff;

        let container = Container::from_bytes(buffer).unwrap();
        let styles = PackURI::new("/word/styles.xml").unwrap();
        match container.blob_for(&styles) {
            Err(Error::PartRead { member, .. }) => assert_eq!(member, "word/styles.xml"),
            other => panic!("expected a part read error, got {:?}", other),
        }
        assert!(container.content_types().is_ok());
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        assert_eq!(decode_xml_bytes(b"<?xml>").unwrap(), "<?xml>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let text = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_xml_bytes(&bytes).unwrap();
        assert_eq!(decoded, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>");
    }
}
