//! Word document handle.

use super::cascade::StyleResolver;
use super::numbering::{Numbering, NumberingDefinitions};
use super::properties::StyleFragment;
use super::styles::{StyleKind, StyleSheet};
use super::table::{CellPosition, TableGrid};
use crate::detect::{detect_flavor, PackageFlavor};
use crate::error::{Error, Result};
use crate::metadata::CoreProperties;
use crate::opc::{Package, PartId, PartKind};
use crate::options::PackageOptions;
use crate::schema::{self, Body, Node, NumberingEl, Styles, Table, TableLook};
use std::io::Read;
use std::path::Path;
use std::rc::Rc;

/// An opened word-processing package with its style and numbering engines.
///
/// Style resolutions and list counters are cached inside the handle, so a
/// `Document` is not `Sync`.
///
/// # Example
///
/// ```no_run
/// use docweave::{Document, StyleKind};
///
/// let doc = Document::open("report.docx")?;
/// let heading = doc.resolve_style("Heading1", StyleKind::Paragraph)?;
/// println!("bold: {:?}", heading.run.bold);
/// # Ok::<(), docweave::Error>(())
/// ```
#[derive(Debug)]
pub struct Document {
    package: Package,
    main: PartId,
    flavor: PackageFlavor,
    styles: StyleResolver,
    numbering: Numbering,
}

impl Document {
    /// Open a document from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, &PackageOptions::default())
    }

    /// Open a document from a file path with explicit load limits.
    pub fn open_with_options(path: impl AsRef<Path>, options: &PackageOptions) -> Result<Self> {
        Self::from_package(Package::open_with_options(path, options)?)
    }

    /// Open a document from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Open a document from bytes with explicit load limits.
    pub fn from_bytes_with_options(data: Vec<u8>, options: &PackageOptions) -> Result<Self> {
        Self::from_package(Package::from_bytes_with_options(data, options)?)
    }

    /// Open a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_package(Package::from_reader(reader)?)
    }

    /// Open a document asynchronously. The file is read with tokio, the
    /// package is then assembled synchronously.
    #[cfg(feature = "async")]
    pub async fn open_async(path: impl AsRef<Path>) -> Result<Self> {
        let data = tokio::fs::read(path.as_ref()).await?;
        Self::from_bytes(data)
    }

    /// Wrap an assembled package. Fails unless it is a word-processing package.
    pub fn from_package(package: Package) -> Result<Self> {
        let flavor = detect_flavor(&package)?;
        if !flavor.is_wordprocessing() {
            return Err(Error::UnsupportedFormat(format!(
                "expected a word-processing package, found {}",
                flavor
            )));
        }
        let main = package.main_document()?;

        let info = match package.part(main).kind() {
            PartKind::Document(info) => info.clone(),
            other => {
                return Err(Error::UnsupportedFormat(format!(
                    "main part is {}, not a document",
                    other.name()
                )))
            }
        };

        let sheet = match info.styles {
            Some(id) => match package.part(id).root() {
                Ok(root) => StyleSheet::from_styles(Styles::new(root)),
                Err(e) => {
                    log::warn!("unreadable style part, using an empty style table: {}", e);
                    StyleSheet::default()
                }
            },
            None => StyleSheet::default(),
        };

        let definitions = match info.numbering {
            Some(id) => match package.part(id).root() {
                Ok(root) => NumberingDefinitions::from_numbering(NumberingEl::new(root)),
                Err(e) => {
                    log::warn!("unreadable numbering part, lists are unavailable: {}", e);
                    NumberingDefinitions::default()
                }
            },
            None => NumberingDefinitions::default(),
        };

        Ok(Self {
            package,
            main,
            flavor,
            styles: StyleResolver::new(sheet),
            numbering: Numbering::new(definitions),
        })
    }

    /// Release the document and every part it owns.
    pub fn close(self) {
        drop(self);
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Handle of the main document part.
    pub fn main_part(&self) -> PartId {
        self.main
    }

    pub fn flavor(&self) -> PackageFlavor {
        self.flavor
    }

    /// Schema-bound root element of a part.
    pub fn root_content_of(&self, part: PartId) -> Result<Node<'_>> {
        let root = self.package.part(part).root()?;
        Ok(schema::bind(root))
    }

    /// The main document body.
    pub fn body(&self) -> Result<Body<'_>> {
        let root = self.package.part(self.main).root()?;
        schema::Document::new(root)
            .body()
            .ok_or_else(|| Error::MissingComponent("w:body".to_string()))
    }

    /// Top-level tables of the body, in document order.
    pub fn tables(&self) -> Result<Vec<Table<'_>>> {
        Ok(self.body()?.tables())
    }

    /// Merge geometry of every top-level table.
    pub fn table_grids(&self) -> Result<Vec<TableGrid>> {
        Ok(self.tables()?.iter().map(TableGrid::from_table).collect())
    }

    pub fn styles(&self) -> &StyleResolver {
        &self.styles
    }

    pub fn numbering(&self) -> &Numbering {
        &self.numbering
    }

    /// Effective properties of a style.
    pub fn resolve_style(&self, style_id: &str, kind: StyleKind) -> Result<Rc<StyleFragment>> {
        self.styles.resolve(style_id, kind)
    }

    /// Effective properties of a style, falling back to the kind default
    /// when its based-on chain is cyclic.
    pub fn resolve_style_or_default(&self, style_id: &str, kind: StyleKind) -> Rc<StyleFragment> {
        self.styles.resolve_or_default(style_id, kind)
    }

    /// Effective properties of the kind's default style.
    pub fn resolve_default_style(&self, kind: StyleKind) -> Result<Rc<StyleFragment>> {
        self.styles.resolve_default_style(kind)
    }

    /// Effective properties of a table cell under a table style.
    pub fn resolve_table_cell(
        &self,
        style_id: &str,
        position: CellPosition,
        look: TableLook,
    ) -> Result<StyleFragment> {
        self.styles.resolve_table_cell(style_id, position, look)
    }

    /// Marker text for the next paragraph of a list at a level.
    pub fn text_for(&self, list_id: u32, level: u8) -> Result<String> {
        self.numbering.text_for(list_id, level)
    }

    /// Part targeted by a relationship of the main document.
    pub fn part_for(&self, rel_id: &str) -> Result<PartId> {
        self.package.related_part(Some(self.main), rel_id)
    }

    /// Bytes of the part targeted by a relationship of the main document,
    /// e.g. the image behind a drawing's `r:embed`.
    pub fn blob_for(&self, rel_id: &str) -> Result<&[u8]> {
        let id = self.part_for(rel_id)?;
        Ok(self.package.part(id).blob())
    }

    /// Core document properties.
    pub fn metadata(&self) -> Result<CoreProperties> {
        CoreProperties::from_package(&self.package)
    }
}
