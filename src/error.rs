//! Error types for the docweave library.

use std::io;
use thiserror::Error;

/// Result type alias for docweave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or resolving a package.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive could not be opened (unreadable central directory, not a zip).
    #[error("Container error: {0}")]
    Container(String),

    /// One archive member could not be read; the rest of the archive is intact.
    #[error("Cannot read {member}: {reason}")]
    PartRead {
        /// Archive member name
        member: String,
        /// What went wrong
        reason: String,
    },

    /// No override or extension default covers a part.
    #[error("Content type not found for partname: {0}")]
    ContentTypeNotFound(String),

    /// A structurally required package component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A part is not present in the package.
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// A relationship id or type could not be resolved.
    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    /// A partname or relative reference could not be turned into a pack URI.
    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required exactly-one-of child is absent.
    #[error("Schema violation in <{element}>: expected one of {expected}")]
    SchemaViolation {
        /// Local name of the element whose content model was violated
        element: String,
        /// The choices that were acceptable
        expected: String,
    },

    /// A based-on chain revisits a style already being resolved.
    #[error("Cyclic style inheritance: {0}")]
    CyclicStyle(String),

    /// A list id or level has no numbering definition.
    #[error("Numbering not found: {0}")]
    NumberingNotFound(String),

    /// The package is readable but not of the requested flavor.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid or malformed data in the package.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Container(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}
