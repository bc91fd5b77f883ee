//! Package flavor detection.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::opc::constants::{content_type as ct, relationship_type as rt};
use crate::opc::packuri::PACKAGE_URI;
use crate::opc::rel::parse_rels_xml;
use crate::opc::{Package, PackURI};
use serde::Serialize;
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Macro and template markers of a flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub macro_enabled: bool,
    pub template: bool,
}

impl Variant {
    const PLAIN: Variant = Variant {
        macro_enabled: false,
        template: false,
    };
    const MACRO: Variant = Variant {
        macro_enabled: true,
        template: false,
    };
    const TEMPLATE: Variant = Variant {
        macro_enabled: false,
        template: true,
    };
    const MACRO_TEMPLATE: Variant = Variant {
        macro_enabled: true,
        template: true,
    };
}

/// Which Office application family a package belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum PackageFlavor {
    Wordprocessing(Variant),
    Spreadsheet(Variant),
    Presentation(Variant),
}

impl PackageFlavor {
    /// Classify a main-part content type.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        Some(match content_type {
            ct::WML_DOCUMENT_MAIN => PackageFlavor::Wordprocessing(Variant::PLAIN),
            ct::WML_DOCUMENT_MACRO => PackageFlavor::Wordprocessing(Variant::MACRO),
            ct::WML_TEMPLATE_MAIN => PackageFlavor::Wordprocessing(Variant::TEMPLATE),
            ct::WML_TEMPLATE_MACRO => PackageFlavor::Wordprocessing(Variant::MACRO_TEMPLATE),
            ct::SML_SHEET_MAIN => PackageFlavor::Spreadsheet(Variant::PLAIN),
            ct::SML_SHEET_MACRO => PackageFlavor::Spreadsheet(Variant::MACRO),
            ct::SML_TEMPLATE_MAIN => PackageFlavor::Spreadsheet(Variant::TEMPLATE),
            ct::SML_TEMPLATE_MACRO => PackageFlavor::Spreadsheet(Variant::MACRO_TEMPLATE),
            ct::PML_PRESENTATION_MAIN => PackageFlavor::Presentation(Variant::PLAIN),
            ct::PML_PRESENTATION_MACRO => PackageFlavor::Presentation(Variant::MACRO),
            ct::PML_TEMPLATE_MAIN => PackageFlavor::Presentation(Variant::TEMPLATE),
            ct::PML_TEMPLATE_MACRO => PackageFlavor::Presentation(Variant::MACRO_TEMPLATE),
            _ => return None,
        })
    }

    pub fn variant(&self) -> Variant {
        match self {
            PackageFlavor::Wordprocessing(v)
            | PackageFlavor::Spreadsheet(v)
            | PackageFlavor::Presentation(v) => *v,
        }
    }

    pub fn is_wordprocessing(&self) -> bool {
        matches!(self, PackageFlavor::Wordprocessing(_))
    }

    /// Returns the file extension for this flavor.
    pub fn extension(&self) -> &'static str {
        let v = self.variant();
        match (self, v.template, v.macro_enabled) {
            (PackageFlavor::Wordprocessing(_), false, false) => "docx",
            (PackageFlavor::Wordprocessing(_), false, true) => "docm",
            (PackageFlavor::Wordprocessing(_), true, false) => "dotx",
            (PackageFlavor::Wordprocessing(_), true, true) => "dotm",
            (PackageFlavor::Spreadsheet(_), false, false) => "xlsx",
            (PackageFlavor::Spreadsheet(_), false, true) => "xlsm",
            (PackageFlavor::Spreadsheet(_), true, false) => "xltx",
            (PackageFlavor::Spreadsheet(_), true, true) => "xltm",
            (PackageFlavor::Presentation(_), false, false) => "pptx",
            (PackageFlavor::Presentation(_), false, true) => "pptm",
            (PackageFlavor::Presentation(_), true, false) => "potx",
            (PackageFlavor::Presentation(_), true, true) => "potm",
        }
    }

    /// Returns a human-readable name for this flavor.
    pub fn name(&self) -> &'static str {
        match self {
            PackageFlavor::Wordprocessing(_) => "Word Document",
            PackageFlavor::Spreadsheet(_) => "Excel Workbook",
            PackageFlavor::Presentation(_) => "PowerPoint Presentation",
        }
    }
}

impl std::fmt::Display for PackageFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (.{})", self.name(), self.extension())
    }
}

/// Detect the flavor of an assembled package.
pub fn detect_flavor(package: &Package) -> Result<PackageFlavor> {
    let main = package.main_document()?;
    let content_type = package.part(main).content_type();
    PackageFlavor::from_content_type(content_type)
        .ok_or_else(|| Error::UnsupportedFormat(content_type.to_string()))
}

/// Detect the flavor from raw bytes without assembling the whole package.
///
/// Only the content types and the root relationships are read.
pub fn detect_flavor_from_bytes(data: &[u8]) -> Result<PackageFlavor> {
    if !is_zip_file(data) {
        return Err(Error::UnsupportedFormat("not a ZIP container".to_string()));
    }
    let container = Container::from_bytes(data.to_vec())?;
    let content_types = container.content_types()?;
    let root_rels = container
        .rels_blob_for(&PackURI::package())?
        .ok_or_else(|| Error::MissingComponent("_rels/.rels".to_string()))?;

    let main = parse_rels_xml(Some(&root_rels), PACKAGE_URI)?
        .into_iter()
        .find(|rel| !rel.is_external() && rt::matches(&rel.reltype, rt::OFFICE_DOCUMENT))
        .ok_or_else(|| Error::RelationshipNotFound(rt::OFFICE_DOCUMENT.to_string()))?;
    let partname = main.target_partname()?;
    let content_type = content_types.get(&partname)?;
    PackageFlavor::from_content_type(content_type)
        .ok_or_else(|| Error::UnsupportedFormat(content_type.to_string()))
}

/// Detect the flavor of a file on disk.
pub fn detect_flavor_from_path(path: impl AsRef<Path>) -> Result<PackageFlavor> {
    let data = std::fs::read(path.as_ref())?;
    detect_flavor_from_bytes(&data)
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_display() {
        let docx = PackageFlavor::from_content_type(ct::WML_DOCUMENT_MAIN).unwrap();
        assert_eq!(docx.to_string(), "Word Document (.docx)");
        assert!(docx.is_wordprocessing());

        let xltm = PackageFlavor::from_content_type(ct::SML_TEMPLATE_MACRO).unwrap();
        assert_eq!(xltm.extension(), "xltm");
        assert!(xltm.variant().macro_enabled && xltm.variant().template);

        assert_eq!(
            PackageFlavor::from_content_type(ct::PML_PRESENTATION_MACRO)
                .unwrap()
                .extension(),
            "pptm"
        );
        assert!(PackageFlavor::from_content_type("text/plain").is_none());
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x00, 0x00, 0x00, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B]));
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_flavor_from_bytes(b"not a zip file");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }
}
