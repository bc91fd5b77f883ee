//! Pack URIs: absolute, slash-rooted part identifiers.

use crate::error::{Error, Result};

/// The package pseudo-partname, representing the package itself.
pub const PACKAGE_URI: &str = "/";

/// The URI of the content types descriptor.
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

/// A partname within an OPC package.
///
/// Pack URIs always begin with a forward slash and use forward slashes as
/// separators, e.g. `/word/document.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a pack URI, rejecting strings that are not slash-rooted.
    pub fn new(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(Error::InvalidPackUri(format!(
                "pack URI must begin with slash, got '{}'",
                uri
            )));
        }
        Ok(Self { uri })
    }

    /// The package root (`/`).
    pub fn package() -> Self {
        Self {
            uri: PACKAGE_URI.to_string(),
        }
    }

    /// Resolve a relationship target against a base directory.
    ///
    /// `("/word", "../media/image1.png")` becomes `/media/image1.png`. An
    /// absolute reference ignores the base. Fragment identifiers are dropped
    /// and percent-escapes decoded.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self> {
        let reference = relative_ref.split('#').next().unwrap_or_default();
        let reference = percent_decode(reference);
        if reference.is_empty() {
            return Err(Error::InvalidPackUri(format!(
                "empty target reference '{}'",
                relative_ref
            )));
        }

        let joined = if reference.starts_with('/') {
            reference
        } else if base_uri.ends_with('/') {
            format!("{}{}", base_uri, reference)
        } else {
            format!("{}/{}", base_uri, reference)
        };
        Self::new(normalize_path(&joined))
    }

    /// Directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Filename portion; empty for the package root.
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// Numeric suffix of a tuple partname: 21 for `/ppt/slides/slide21.xml`.
    pub fn idx(&self) -> Option<u32> {
        let filename = self.filename();
        let stem = match filename.rfind('.') {
            Some(pos) => &filename[..pos],
            None => filename,
        };
        let digits = stem
            .bytes()
            .rev()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 || digits == stem.len() {
            return None;
        }
        stem[stem.len() - digits..].parse().ok()
    }

    /// The zip member name: the URI with its leading slash removed.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Relative reference from `base_uri` to this partname.
    ///
    /// `/ppt/slideLayouts/slideLayout1.xml` relative to `/ppt/slides` is
    /// `../slideLayouts/slideLayout1.xml`.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        // The last segment of `to` is the filename; never consume it as a directory
        let common = from
            .iter()
            .zip(to.iter().take(to.len().saturating_sub(1)))
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<&str> = Vec::with_capacity(from.len() - common + to.len());
        segments.extend(std::iter::repeat_n("..", from.len() - common));
        segments.extend(&to[common..]);
        segments.join("/")
    }

    /// Partname of the relationship descriptor for this source.
    ///
    /// `/word/_rels/document.xml.rels` for `/word/document.xml`, and
    /// `/_rels/.rels` for the package root.
    pub fn rels_uri(&self) -> Result<PackURI> {
        let base = self.base_uri();
        let rels_filename = format!("{}.rels", self.filename());
        if base == "/" {
            Self::new(format!("/_rels/{}", rels_filename))
        } else {
            Self::new(format!("{}/_rels/{}", base, rels_filename))
        }
    }

    /// Whether this is the package pseudo-partname.
    pub fn is_package(&self) -> bool {
        self.uri == PACKAGE_URI
    }

    /// The full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

/// Collapse `.` and `..` segments and duplicate slashes.
fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(segment),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Decode `%XX` escapes; malformed escapes are kept literally.
fn percent_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_string();
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packuri_new() {
        assert!(PackURI::new("/word/document.xml").is_ok());
        assert!(matches!(
            PackURI::new("word/document.xml"),
            Err(Error::InvalidPackUri(_))
        ));
    }

    #[test]
    fn test_base_uri_and_filename() {
        let uri = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(uri.base_uri(), "/ppt/slides");
        assert_eq!(uri.filename(), "slide1.xml");
        assert_eq!(uri.ext(), "xml");

        let top = PackURI::new("/[Content_Types].xml").unwrap();
        assert_eq!(top.base_uri(), "/");

        let root = PackURI::package();
        assert_eq!(root.base_uri(), "/");
        assert_eq!(root.filename(), "");
        assert_eq!(root.membername(), "");
    }

    #[test]
    fn test_idx() {
        assert_eq!(PackURI::new("/ppt/slides/slide21.xml").unwrap().idx(), Some(21));
        assert_eq!(PackURI::new("/ppt/presentation.xml").unwrap().idx(), None);
        assert_eq!(PackURI::new("/word/12.xml").unwrap().idx(), None);
    }

    #[test]
    fn test_from_rel_ref() {
        let uri = PackURI::from_rel_ref("/word", "../media/image1.png").unwrap();
        assert_eq!(uri.as_str(), "/media/image1.png");

        let uri = PackURI::from_rel_ref("/word", "styles.xml").unwrap();
        assert_eq!(uri.as_str(), "/word/styles.xml");

        let uri = PackURI::from_rel_ref("/", "word/document.xml").unwrap();
        assert_eq!(uri.as_str(), "/word/document.xml");

        let uri = PackURI::from_rel_ref("/word", "/customXml/item1.xml").unwrap();
        assert_eq!(uri.as_str(), "/customXml/item1.xml");

        let uri = PackURI::from_rel_ref("/word", "./media/../media/image%201.png").unwrap();
        assert_eq!(uri.as_str(), "/word/media/image 1.png");

        let uri = PackURI::from_rel_ref("/word", "document.xml#bookmark").unwrap();
        assert_eq!(uri.as_str(), "/word/document.xml");
    }

    #[test]
    fn test_relative_ref_round_trip() {
        let cases = [
            ("/word", "styles.xml"),
            ("/word", "media/image1.png"),
            ("/ppt/slides", "../slideLayouts/slideLayout1.xml"),
            ("/word/glossary", "../../customXml/item1.xml"),
            ("/", "word/document.xml"),
        ];
        for (base, target) in cases {
            let resolved = PackURI::from_rel_ref(base, target).unwrap();
            assert_eq!(resolved.relative_ref(base), target, "base {}", base);
        }
    }

    #[test]
    fn test_rels_uri() {
        let uri = PackURI::new("/word/document.xml").unwrap();
        assert_eq!(uri.rels_uri().unwrap().as_str(), "/word/_rels/document.xml.rels");

        let root = PackURI::package();
        assert_eq!(root.rels_uri().unwrap().as_str(), "/_rels/.rels");
    }
}
