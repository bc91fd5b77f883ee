//! Open Packaging Conventions layer.
//!
//! - [`packuri`]: partnames and relative reference resolution
//! - [`rel`]: relationship descriptors and wired relationship collections
//! - [`reader`]: visited-set walk of the relationship graph
//! - [`part`]: parts and the content-type factory
//! - [`package`]: arena assembly

pub mod constants;
pub mod package;
pub mod packuri;
pub mod part;
pub mod reader;
pub mod rel;

pub use package::Package;
pub use packuri::PackURI;
pub use part::{ImageFormat, Part, PartFactory, PartId, PartKind};
pub use rel::{RelTarget, Relationship, Relationships};
