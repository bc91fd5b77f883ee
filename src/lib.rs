//! # docweave
//!
//! Reader for Office Open XML packages.
//!
//! The crate opens a `.docx` (or any OPC package), walks its relationship
//! graph into an arena of parts, binds XML parts to typed element wrappers,
//! and resolves the word-processing semantics consumers need: effective
//! styles, list markers, and merged-cell table geometry.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docweave::{Document, StyleKind};
//!
//! let doc = Document::open("report.docx")?;
//!
//! // Effective properties after the based-on chain and document defaults
//! let heading = doc.resolve_style("Heading1", StyleKind::Paragraph)?;
//! println!("{}", heading.to_json()?);
//!
//! // List markers, advancing the counters
//! println!("{}", doc.text_for(1, 0)?);
//!
//! // Image bytes behind a relationship id
//! let png = doc.blob_for("rId5")?;
//! println!("{} bytes", png.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Package-Level API
//!
//! ```no_run
//! use docweave::Package;
//!
//! let package = Package::open("slides.pptx")?;
//! for (_, part) in package.iter_parts() {
//!     println!("{} {}", part.partname(), part.content_type());
//! }
//! # Ok::<(), docweave::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: `Document::open_async` with Tokio

pub mod container;
pub mod detect;
pub mod docx;
pub mod error;
pub mod metadata;
pub mod opc;
pub mod options;
pub mod schema;
pub mod xml;

// Re-exports
pub use container::{Container, ContentTypeMap};
pub use detect::{detect_flavor, detect_flavor_from_bytes, detect_flavor_from_path, PackageFlavor};
pub use docx::{
    CellGeometry, CellPosition, Document, Numbering, StyleFragment, StyleKind, StyleResolver,
    StyleSheet, TableGrid,
};
pub use error::{Error, Result};
pub use metadata::CoreProperties;
pub use opc::{Package, PackURI, Part, PartId, PartKind, RelTarget, Relationship, Relationships};
pub use options::PackageOptions;
pub use schema::{bind, ElementKind, Node};
pub use xml::XmlElement;

use std::path::Path;

/// Open a word-processing document.
///
/// Shorthand for [`Document::open`].
pub fn open(path: impl AsRef<Path>) -> Result<Document> {
    Document::open(path)
}
