//! Synthetic packages for integration tests.
//!
//! Packages are written in memory with `zip::ZipWriter`, so the tests need
//! no fixture files on disk.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
pub const CT_NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
pub const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

pub const RT_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const RT_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
pub const RT_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
pub const RT_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const RT_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
pub const RT_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// Eight bytes of PNG signature plus filler.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

/// One relationship entry: id, type, target, external.
pub struct Rel<'a> {
    pub id: &'a str,
    pub reltype: &'a str,
    pub target: &'a str,
    pub external: bool,
}

impl<'a> Rel<'a> {
    pub fn internal(id: &'a str, reltype: &'a str, target: &'a str) -> Self {
        Self {
            id,
            reltype,
            target,
            external: false,
        }
    }

    pub fn external(id: &'a str, reltype: &'a str, target: &'a str) -> Self {
        Self {
            id,
            reltype,
            target,
            external: true,
        }
    }
}

/// Serialize a relationships descriptor.
pub fn rels_xml(rels: &[Rel<'_>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for rel in rels {
        let mode = if rel.external {
            r#" TargetMode="External""#
        } else {
            ""
        };
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
            rel.id, rel.reltype, rel.target, mode
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Serialize a content-types descriptor with the usual defaults plus overrides.
pub fn content_types_xml(overrides: &[(&str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>"#,
    );
    for (partname, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            partname, content_type
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// In-memory zip builder.
#[derive(Default)]
pub struct PackageBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.entries.push((name.to_string(), data.as_ref().to_vec()));
        self
    }

    pub fn content_types(self, overrides: &[(&str, &str)]) -> Self {
        let xml = content_types_xml(overrides);
        self.entry("[Content_Types].xml", xml)
    }

    pub fn rels(self, name: &str, rels: &[Rel<'_>]) -> Self {
        let xml = rels_xml(rels);
        self.entry(name, xml)
    }

    pub fn build(self) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            for (name, data) in &self.entries {
                zip.start_file(name.as_str(), SimpleFileOptions::default())
                    .expect("start zip entry");
                zip.write_all(data).expect("write zip entry");
            }
            zip.finish().expect("finish zip");
        }
        buffer
    }
}

/// Wrap body content in a `w:document`.
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}"
    xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
    xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
    xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
    xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">
<w:body>{body}</w:body>
</w:document>"#
    )
}

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault>
    <w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:rPr><w:color w:val="333333"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:keepNext/><w:spacing w:before="240" w:after="0"/><w:outlineLvl w:val="0"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="32"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading2">
    <w:name w:val="heading 2"/>
    <w:basedOn w:val="Heading1"/>
    <w:pPr><w:outlineLvl w:val="1"/></w:pPr>
    <w:rPr><w:i/><w:sz w:val="26"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="LoopA">
    <w:name w:val="Loop A"/><w:basedOn w:val="LoopB"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="LoopB">
    <w:name w:val="Loop B"/><w:basedOn w:val="LoopA"/>
  </w:style>
  <w:style w:type="table" w:styleId="Banded">
    <w:name w:val="Banded"/>
    <w:tblPr><w:tblStyleRowBandSize w:val="1"/></w:tblPr>
    <w:tblStylePr w:type="firstRow"><w:rPr><w:b/></w:rPr><w:tcPr><w:shd w:val="clear" w:fill="1F4E79"/></w:tcPr></w:tblStylePr>
    <w:tblStylePr w:type="band1Horz"><w:tcPr><w:shd w:val="clear" w:fill="DDEBF7"/></w:tcPr></w:tblStylePr>
  </w:style>
</w:styles>"#;

pub const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%2)"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#;

pub const CORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:dcterms="http://purl.org/dc/terms/">
  <dc:title>Quarterly Report</dc:title>
  <dc:creator>Analytics Team</dc:creator>
  <dcterms:created>2024-03-01T09:00:00Z</dcterms:created>
</cp:coreProperties>"#;

/// 3 rows x 2 columns: the right column is merged across the first two
/// rows and the last row is one cell spanning both columns.
pub const TABLE: &str = r#"<w:tbl>
  <w:tblPr><w:tblStyle w:val="Banded"/><w:tblLook w:val="04A0"/></w:tblPr>
  <w:tblGrid><w:gridCol w:w="2000"/><w:gridCol w:w="2000"/></w:tblGrid>
  <w:tr>
    <w:tc><w:p><w:r><w:t>A1</w:t></w:r></w:p></w:tc>
    <w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>B1</w:t></w:r></w:p></w:tc>
  </w:tr>
  <w:tr>
    <w:tc><w:p><w:r><w:t>A2</w:t></w:r></w:p></w:tc>
    <w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc>
  </w:tr>
  <w:tr>
    <w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>Total</w:t></w:r></w:p></w:tc>
  </w:tr>
</w:tbl>"#;

pub const PICTURE: &str = r#"<w:p><w:r><w:drawing>
  <wp:inline>
    <wp:extent cx="952500" cy="952500"/>
    <wp:docPr id="1" name="Picture 1"/>
    <a:graphic>
      <a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">
        <pic:pic><pic:blipFill><a:blip r:embed="rId4"/></pic:blipFill></pic:pic>
      </a:graphicData>
    </a:graphic>
  </wp:inline>
</w:drawing></w:r></w:p>"#;

/// A word-processing package with styles, numbering, core properties,
/// one table and one embedded image.
pub fn sample_docx() -> Vec<u8> {
    let body = format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Summary</w:t></w:r></w:p>
<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>First</w:t></w:r></w:p>
{TABLE}
{PICTURE}"#
    );

    PackageBuilder::new()
        .content_types(&[
            ("/word/document.xml", CT_DOCUMENT),
            ("/word/styles.xml", CT_STYLES),
            ("/word/numbering.xml", CT_NUMBERING),
            ("/docProps/core.xml", CT_CORE),
        ])
        .rels(
            "_rels/.rels",
            &[
                Rel::internal("rId1", RT_OFFICE_DOCUMENT, "word/document.xml"),
                Rel::internal("rId2", RT_CORE, "docProps/core.xml"),
            ],
        )
        .entry("word/document.xml", document_xml(&body))
        .rels(
            "word/_rels/document.xml.rels",
            &[
                Rel::internal("rId1", RT_STYLES, "styles.xml"),
                Rel::internal("rId2", RT_NUMBERING, "numbering.xml"),
                Rel::external("rId3", RT_HYPERLINK, "https://example.com/"),
                Rel::internal("rId4", RT_IMAGE, "media/image1.png"),
            ],
        )
        .entry("word/styles.xml", STYLES)
        .entry("word/numbering.xml", NUMBERING)
        .entry("word/media/image1.png", PNG_BYTES)
        .entry("docProps/core.xml", CORE)
        .build()
}
