//! WordprocessingML semantics on top of the element model.
//!
//! - [`properties`]: sparse property fragments and their merge
//! - [`styles`] and [`cascade`]: the style table and effective-style resolution
//! - [`numbering`] and [`numfmt`]: list definitions, counters and numeral systems
//! - [`table`]: logical columns and merged-cell geometry
//! - [`document`]: the [`Document`] handle

pub mod cascade;
pub mod document;
pub mod numbering;
pub mod numfmt;
pub mod properties;
pub mod styles;
pub mod table;

pub use cascade::StyleResolver;
pub use document::Document;
pub use numbering::{LevelDefinition, LevelSuffix, Numbering, NumberingDefinitions};
pub use numfmt::NumberFormat;
pub use properties::{
    CellProperties, CellVAlign, Highlight, Justification, LineHeight, ParagraphProperties,
    RunProperties, StyleFragment, TableProperties, Underline, VertAlign,
};
pub use styles::{StyleDefinition, StyleKind, StyleSheet, TableCondition};
pub use table::{CellGeometry, CellMerge, CellPosition, GridRow, TableGrid};
