//! Style cascade: based-on chains, document defaults and table conditionals.

use super::properties::StyleFragment;
use super::styles::{StyleDefinition, StyleKind, StyleSheet, TableCondition};
use super::table::CellPosition;
use crate::error::{Error, Result};
use crate::schema::TableLook;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Resolves effective properties for styles of a [`StyleSheet`].
///
/// Resolved styles are cached per (kind, id). The cache is not
/// synchronized; a resolver belongs to one thread.
#[derive(Debug)]
pub struct StyleResolver {
    sheet: StyleSheet,
    defaults: HashMap<StyleKind, Rc<StyleFragment>>,
    cache: RefCell<HashMap<(StyleKind, String), Rc<StyleFragment>>>,
}

impl StyleResolver {
    pub fn new(sheet: StyleSheet) -> Self {
        let defaults = StyleKind::ALL
            .iter()
            .map(|&kind| (kind, Rc::new(sheet.kind_default(kind))))
            .collect();
        Self {
            sheet,
            defaults,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// The kind's default: baseline patched with the document defaults.
    pub fn kind_default(&self, kind: StyleKind) -> Rc<StyleFragment> {
        match self.defaults.get(&kind) {
            Some(fragment) => Rc::clone(fragment),
            None => Rc::new(self.sheet.kind_default(kind)),
        }
    }

    /// Effective properties of a style.
    ///
    /// An unknown id (or an id of another kind) yields the kind default.
    /// A based-on chain that revisits a style fails with
    /// [`Error::CyclicStyle`].
    pub fn resolve(&self, style_id: &str, kind: StyleKind) -> Result<Rc<StyleFragment>> {
        let mut stack = Vec::new();
        self.resolve_chain(style_id, kind, &mut stack)
    }

    fn resolve_chain(
        &self,
        style_id: &str,
        kind: StyleKind,
        stack: &mut Vec<String>,
    ) -> Result<Rc<StyleFragment>> {
        let key = (kind, style_id.to_string());
        if let Some(hit) = self.cache.borrow().get(&key) {
            return Ok(Rc::clone(hit));
        }

        let Some(style) = self.sheet.get_of_kind(style_id, kind) else {
            return Ok(self.kind_default(kind));
        };

        if let Some(pos) = stack.iter().position(|id| id == style_id) {
            let mut chain = stack[pos..].to_vec();
            chain.push(style_id.to_string());
            return Err(Error::CyclicStyle(chain.join(" -> ")));
        }

        stack.push(style_id.to_string());
        let parent = match style.based_on.as_deref() {
            Some(parent_id) => self.resolve_chain(parent_id, kind, stack),
            None => Ok(self.kind_default(kind)),
        };
        stack.pop();

        let parent = parent?;
        let mut resolved = StyleFragment::clone(&parent);
        resolved.apply(&style.fragment);
        let resolved = Rc::new(resolved);
        self.cache.borrow_mut().insert(key, Rc::clone(&resolved));
        Ok(resolved)
    }

    /// Like [`resolve`](Self::resolve), substituting the kind default for a
    /// cyclic chain.
    pub fn resolve_or_default(&self, style_id: &str, kind: StyleKind) -> Rc<StyleFragment> {
        match self.resolve(style_id, kind) {
            Ok(fragment) => fragment,
            Err(e) => {
                log::warn!("{}; using the {} default", e, kind);
                self.kind_default(kind)
            }
        }
    }

    /// Resolve the style flagged default for a kind, or the kind default.
    pub fn resolve_default_style(&self, kind: StyleKind) -> Result<Rc<StyleFragment>> {
        match self.sheet.default_style(kind) {
            Some(style) => self.resolve(&style.id, kind),
            None => Ok(self.kind_default(kind)),
        }
    }

    /// Effective properties of one table cell: the table style plus every
    /// conditional block whose region contains the cell, enabled by `look`.
    pub fn resolve_table_cell(
        &self,
        style_id: &str,
        position: CellPosition,
        look: TableLook,
    ) -> Result<StyleFragment> {
        let base = self.resolve(style_id, StyleKind::Table)?;
        let chain = self.chain_root_first(style_id, StyleKind::Table);
        let row_band = base.table.row_band_size.unwrap_or(1).max(1) as usize;
        let col_band = base.table.col_band_size.unwrap_or(1).max(1) as usize;

        let mut resolved = StyleFragment::clone(&base);
        for condition in TableCondition::ORDER {
            if !applies(condition, &position, &look, row_band, col_band) {
                continue;
            }
            for style in &chain {
                for fragment in style.conditional(condition) {
                    resolved.apply(fragment);
                }
            }
        }
        Ok(resolved)
    }

    /// Styles of a based-on chain, root first. Stops at a revisited id.
    fn chain_root_first(&self, style_id: &str, kind: StyleKind) -> Vec<&StyleDefinition> {
        let mut chain: Vec<&StyleDefinition> = Vec::new();
        let mut next = Some(style_id);
        while let Some(id) = next {
            let Some(style) = self.sheet.get_of_kind(id, kind) else {
                break;
            };
            if chain.iter().any(|s| s.id == style.id) {
                break;
            }
            chain.push(style);
            next = style.based_on.as_deref();
        }
        chain.reverse();
        chain
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Number of cached resolutions.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

fn applies(
    condition: TableCondition,
    pos: &CellPosition,
    look: &TableLook,
    row_band: usize,
    col_band: usize,
) -> bool {
    let first_row = look.first_row && pos.is_first_row();
    let last_row = look.last_row && pos.is_last_row();
    let first_col = look.first_column && pos.is_first_column();
    let last_col = look.last_column && pos.is_last_column();

    match condition {
        TableCondition::WholeTable => true,
        TableCondition::Band1Horz | TableCondition::Band2Horz => {
            if look.no_h_band || first_row || last_row {
                return false;
            }
            let index = pos.row - usize::from(look.first_row);
            let first_band = (index / row_band) % 2 == 0;
            first_band == (condition == TableCondition::Band1Horz)
        }
        TableCondition::Band1Vert | TableCondition::Band2Vert => {
            if look.no_v_band || first_col || last_col {
                return false;
            }
            let index = pos.column - usize::from(look.first_column);
            let first_band = (index / col_band) % 2 == 0;
            first_band == (condition == TableCondition::Band1Vert)
        }
        TableCondition::FirstRow => first_row,
        TableCondition::LastRow => last_row,
        TableCondition::FirstCol => first_col,
        TableCondition::LastCol => last_col,
        TableCondition::NwCell => first_row && first_col,
        TableCondition::NeCell => first_row && last_col,
        TableCondition::SwCell => last_row && first_col,
        TableCondition::SeCell => last_row && last_col,
    }
}
