//! DOCX style table (`word/styles.xml`).

use super::properties::StyleFragment;
use crate::error::Result;
use crate::schema::{StyleEl, Styles};
use crate::xml::XmlElement;
use serde::Serialize;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// Style kind (`w:style/@w:type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleKind {
    pub const ALL: [StyleKind; 4] = [
        StyleKind::Paragraph,
        StyleKind::Character,
        StyleKind::Table,
        StyleKind::Numbering,
    ];

    /// Parse a `w:type` value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paragraph" => Some(StyleKind::Paragraph),
            "character" => Some(StyleKind::Character),
            "table" => Some(StyleKind::Table),
            "numbering" => Some(StyleKind::Numbering),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StyleKind::Paragraph => "paragraph",
            StyleKind::Character => "character",
            StyleKind::Table => "table",
            StyleKind::Numbering => "numbering",
        }
    }
}

impl std::fmt::Display for StyleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural region a table-style conditional block targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TableCondition {
    WholeTable,
    Band1Vert,
    Band2Vert,
    Band1Horz,
    Band2Horz,
    FirstCol,
    LastCol,
    FirstRow,
    LastRow,
    NeCell,
    NwCell,
    SeCell,
    SwCell,
}

impl TableCondition {
    /// Application order, lowest precedence first.
    pub const ORDER: [TableCondition; 13] = [
        TableCondition::WholeTable,
        TableCondition::Band1Vert,
        TableCondition::Band2Vert,
        TableCondition::Band1Horz,
        TableCondition::Band2Horz,
        TableCondition::FirstCol,
        TableCondition::LastCol,
        TableCondition::FirstRow,
        TableCondition::LastRow,
        TableCondition::NeCell,
        TableCondition::NwCell,
        TableCondition::SeCell,
        TableCondition::SwCell,
    ];

    /// Parse a `w:tblStylePr/@w:type` value.
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "wholeTable" => TableCondition::WholeTable,
            "band1Vert" => TableCondition::Band1Vert,
            "band2Vert" => TableCondition::Band2Vert,
            "band1Horz" => TableCondition::Band1Horz,
            "band2Horz" => TableCondition::Band2Horz,
            "firstCol" => TableCondition::FirstCol,
            "lastCol" => TableCondition::LastCol,
            "firstRow" => TableCondition::FirstRow,
            "lastRow" => TableCondition::LastRow,
            "neCell" => TableCondition::NeCell,
            "nwCell" => TableCondition::NwCell,
            "seCell" => TableCondition::SeCell,
            "swCell" => TableCondition::SwCell,
            _ => return None,
        })
    }
}

/// A parsed style definition.
#[derive(Debug, Clone, Serialize)]
pub struct StyleDefinition {
    /// Style ID (e.g., "Heading1")
    pub id: String,
    /// Display name (e.g., "heading 1")
    pub name: Option<String>,
    pub kind: StyleKind,
    /// Parent style id
    pub based_on: Option<String>,
    /// Style applied to the following paragraph
    pub next: Option<String>,
    /// Linked paragraph/character counterpart
    pub link: Option<String>,
    /// `w:default="1"`
    pub is_default: bool,
    pub ui_priority: Option<i64>,
    /// Properties this style declares itself
    pub fragment: StyleFragment,
    /// Table conditional blocks, in document order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditionals: Vec<(TableCondition, StyleFragment)>,
}

impl StyleDefinition {
    fn from_element(el: StyleEl<'_>) -> Option<Self> {
        let id = el.style_id()?.to_string();
        let kind = match el.style_type() {
            Some(t) => match StyleKind::parse(t) {
                Some(kind) => kind,
                None => {
                    log::debug!("style '{}' has unknown type '{}'", id, t);
                    return None;
                }
            },
            // w:type defaults to paragraph
            None => StyleKind::Paragraph,
        };

        let conditionals = el
            .conditionals()
            .into_iter()
            .filter_map(|c| {
                let condition = c.condition().and_then(TableCondition::parse)?;
                let fragment = StyleFragment::from_elements(
                    c.paragraph_properties(),
                    c.run_properties(),
                    c.table_properties(),
                    c.cell_properties(),
                );
                Some((condition, fragment))
            })
            .collect();

        Some(Self {
            name: el.name().map(String::from),
            kind,
            based_on: el.based_on().map(String::from),
            next: el.next().map(String::from),
            link: el.link().map(String::from),
            is_default: el.is_default(),
            ui_priority: el.ui_priority(),
            fragment: StyleFragment::from_elements(
                el.paragraph_properties(),
                el.run_properties(),
                el.table_properties(),
                el.cell_properties(),
            ),
            conditionals,
            id,
        })
    }

    /// Conditional fragments for one region, in document order.
    pub fn conditional(&self, condition: TableCondition) -> impl Iterator<Item = &StyleFragment> {
        self.conditionals
            .iter()
            .filter(move |(c, _)| *c == condition)
            .map(|(_, f)| f)
    }
}

/// Collection of styles from styles.xml.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: HashMap<String, StyleDefinition>,
    /// Style ids in document order
    order: Vec<String>,
    /// `w:docDefaults/w:rPrDefault`
    default_run: StyleFragment,
    /// `w:docDefaults/w:pPrDefault`
    default_paragraph: StyleFragment,
}

impl StyleSheet {
    /// Build from a bound `w:styles` element.
    pub fn from_styles(styles: Styles<'_>) -> Self {
        let mut sheet = StyleSheet::default();

        if let Some(defaults) = styles.doc_defaults() {
            sheet.default_run =
                StyleFragment::from_elements(None, defaults.run_properties(), None, None);
            sheet.default_paragraph =
                StyleFragment::from_elements(defaults.paragraph_properties(), None, None, None);
        }

        for el in styles.styles() {
            let Some(style) = StyleDefinition::from_element(el) else {
                continue;
            };
            if sheet.styles.contains_key(&style.id) {
                log::debug!("duplicate style id '{}', keeping the first", style.id);
                continue;
            }
            sheet.order.push(style.id.clone());
            sheet.styles.insert(style.id.clone(), style);
        }

        sheet
    }

    /// Parse styles from XML content.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let root = XmlElement::parse(xml)?;
        Ok(Self::from_styles(Styles::new(&root)))
    }

    /// Look up a style by id regardless of kind.
    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.get(id)
    }

    /// Look up a style by id. A style of another kind counts as absent.
    pub fn get_of_kind(&self, id: &str, kind: StyleKind) -> Option<&StyleDefinition> {
        self.styles.get(id).filter(|s| s.kind == kind)
    }

    /// Find a style by display name, NFKC-normalized and case-insensitive.
    pub fn find_by_name(&self, name: &str) -> Option<&StyleDefinition> {
        let wanted = normalize_name(name);
        self.iter()
            .find(|s| s.name.as_deref().map(normalize_name).as_deref() == Some(wanted.as_str()))
    }

    /// The style flagged `w:default="1"` for a kind.
    pub fn default_style(&self, kind: StyleKind) -> Option<&StyleDefinition> {
        self.iter().find(|s| s.kind == kind && s.is_default)
    }

    /// Baseline patched with the document defaults that apply to `kind`.
    pub fn kind_default(&self, kind: StyleKind) -> StyleFragment {
        let mut fragment = StyleFragment::baseline();
        if matches!(kind, StyleKind::Paragraph | StyleKind::Table) {
            fragment.apply(&self.default_paragraph);
        }
        fragment.apply(&self.default_run);
        fragment
    }

    /// Styles in document order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.order.iter().filter_map(|id| self.styles.get(id))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

fn normalize_name(name: &str) -> String {
    name.nfkc().collect::<String>().to_lowercase()
}
