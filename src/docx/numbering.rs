//! DOCX numbering (list) definitions and marker counters.

use super::numfmt::NumberFormat;
use super::properties::StyleFragment;
use crate::error::{Error, Result};
use crate::schema::{AbstractNum, Lvl, NumberingEl};
use crate::xml::XmlElement;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;

/// Number of list levels (`w:ilvl` 0..=8).
pub const LEVELS: usize = 9;

/// What follows the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelSuffix {
    Tab,
    Space,
    Nothing,
}

impl LevelSuffix {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("space") => LevelSuffix::Space,
            Some("nothing") => LevelSuffix::Nothing,
            _ => LevelSuffix::Tab,
        }
    }
}

/// A numbering level definition.
#[derive(Debug, Clone, Serialize)]
pub struct LevelDefinition {
    /// Level index (0-8)
    pub level: u8,
    /// Start value
    pub start: u32,
    pub format: NumberFormat,
    /// Level text (e.g., "%1.", "%1.%2.")
    pub text: String,
    /// `w:lvlRestart`: restart after this 1-based level; 0 means never
    pub restart: Option<u32>,
    /// `w:isLgl`: render ancestor levels as decimal
    pub legal: bool,
    pub suffix: LevelSuffix,
    /// Paragraph style linked to this level
    pub paragraph_style: Option<String>,
    /// Marker indentation and run formatting
    pub properties: StyleFragment,
}

impl LevelDefinition {
    fn from_element(lvl: Lvl<'_>) -> Option<Self> {
        let level = lvl.ilvl()?;
        if level as usize >= LEVELS {
            log::debug!("ignoring numbering level {}", level);
            return None;
        }
        Some(Self {
            level,
            start: lvl.start().unwrap_or(1),
            format: lvl.num_fmt().map(NumberFormat::parse).unwrap_or(NumberFormat::Decimal),
            text: lvl.lvl_text().unwrap_or_default().to_string(),
            restart: lvl.lvl_restart(),
            legal: lvl.is_lgl(),
            suffix: LevelSuffix::parse(lvl.suffix()),
            paragraph_style: lvl.paragraph_style().map(String::from),
            properties: StyleFragment::from_elements(
                lvl.paragraph_properties(),
                lvl.run_properties(),
                None,
                None,
            ),
        })
    }

    /// Whether advancing `advanced` resets this level's counter.
    fn resets_after(&self, advanced: u8) -> bool {
        match self.restart {
            None => advanced < self.level,
            Some(0) => false,
            Some(n) => (advanced as u32) < n,
        }
    }
}

/// Abstract numbering definition.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AbstractNumbering {
    /// Abstract numbering ID
    pub id: u32,
    /// Levels (0-8)
    pub levels: [Option<LevelDefinition>; LEVELS],
    /// Defers to the definition a numbering style links to
    pub num_style_link: Option<String>,
    /// The numbering style this definition implements
    pub style_link: Option<String>,
}

impl AbstractNumbering {
    fn from_element(el: AbstractNum<'_>) -> Option<Self> {
        let mut abstract_num = AbstractNumbering {
            id: el.abstract_num_id()?,
            num_style_link: el.num_style_link().map(String::from),
            style_link: el.style_link().map(String::from),
            ..Default::default()
        };
        for level in el.levels().into_iter().filter_map(LevelDefinition::from_element) {
            let index = level.level as usize;
            abstract_num.levels[index] = Some(level);
        }
        Some(abstract_num)
    }
}

/// Instance-level replacement of one level.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LevelOverride {
    pub start: Option<u32>,
    pub level: Option<LevelDefinition>,
}

/// Concrete numbering instance.
#[derive(Debug, Clone, Serialize)]
pub struct NumberingInstance {
    /// Numbering ID
    pub id: u32,
    /// Abstract numbering ID
    pub abstract_id: u32,
    pub overrides: HashMap<u8, LevelOverride>,
}

/// Collection of numbering definitions.
#[derive(Debug, Clone, Default)]
pub struct NumberingDefinitions {
    /// Abstract numbering definitions
    pub abstracts: HashMap<u32, AbstractNumbering>,
    /// Numbering instances
    pub instances: HashMap<u32, NumberingInstance>,
}

impl NumberingDefinitions {
    /// Build from a bound `w:numbering` element.
    pub fn from_numbering(numbering: NumberingEl<'_>) -> Self {
        let mut defs = NumberingDefinitions::default();

        for abstract_num in numbering
            .abstract_nums()
            .into_iter()
            .filter_map(AbstractNumbering::from_element)
        {
            defs.abstracts.entry(abstract_num.id).or_insert(abstract_num);
        }

        for num in numbering.nums() {
            let (Some(id), Some(abstract_id)) = (num.num_id(), num.abstract_num_id()) else {
                continue;
            };
            let overrides = num
                .overrides()
                .into_iter()
                .filter_map(|o| {
                    let level = o.ilvl()?;
                    Some((
                        level,
                        LevelOverride {
                            start: o.start_override(),
                            level: o.level().and_then(LevelDefinition::from_element),
                        },
                    ))
                })
                .collect();
            defs.instances.insert(
                id,
                NumberingInstance {
                    id,
                    abstract_id,
                    overrides,
                },
            );
        }

        defs
    }

    /// Parse numbering from XML content.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let root = XmlElement::parse(xml)?;
        Ok(Self::from_numbering(NumberingEl::new(&root)))
    }

    /// Abstract definition behind an instance, following `w:numStyleLink`.
    pub fn abstract_for(&self, num_id: u32) -> Result<&AbstractNumbering> {
        let instance = self
            .instances
            .get(&num_id)
            .ok_or_else(|| Error::NumberingNotFound(format!("numId {}", num_id)))?;
        let abstract_num = self.abstracts.get(&instance.abstract_id).ok_or_else(|| {
            Error::NumberingNotFound(format!(
                "abstractNumId {} (numId {})",
                instance.abstract_id, num_id
            ))
        })?;

        if let Some(link) = &abstract_num.num_style_link {
            if let Some(target) = self
                .abstracts
                .values()
                .find(|a| a.style_link.as_deref() == Some(link.as_str()))
            {
                return Ok(target);
            }
            log::debug!("numbering style link '{}' has no target", link);
        }
        Ok(abstract_num)
    }

    /// Level definition for an instance, instance overrides applied.
    pub fn level_definition(&self, num_id: u32, level: u8) -> Result<LevelDefinition> {
        let not_found = || Error::NumberingNotFound(format!("numId {} level {}", num_id, level));
        if level as usize >= LEVELS {
            return Err(not_found());
        }

        let abstract_num = self.abstract_for(num_id)?;
        let overridden = self
            .instances
            .get(&num_id)
            .and_then(|i| i.overrides.get(&level));

        let mut definition = overridden
            .and_then(|o| o.level.clone())
            .or_else(|| abstract_num.levels[level as usize].clone())
            .ok_or_else(not_found)?;
        if let Some(start) = overridden.and_then(|o| o.start) {
            definition.start = start;
        }
        Ok(definition)
    }
}

/// Numbering definitions plus the running counters of every instance.
///
/// Counters live in a `RefCell`; a `Numbering` belongs to one thread.
#[derive(Debug, Default)]
pub struct Numbering {
    defs: NumberingDefinitions,
    counters: RefCell<HashMap<u32, [Option<u32>; LEVELS]>>,
}

impl Numbering {
    pub fn new(defs: NumberingDefinitions) -> Self {
        Self {
            defs,
            counters: RefCell::new(HashMap::new()),
        }
    }

    pub fn definitions(&self) -> &NumberingDefinitions {
        &self.defs
    }

    pub fn level_definition(&self, num_id: u32, level: u8) -> Result<LevelDefinition> {
        self.defs.level_definition(num_id, level)
    }

    /// Advance the counter of `level` and return its new value.
    ///
    /// Deeper levels go back to their start value unless their
    /// `w:lvlRestart` says otherwise.
    pub fn next_value(&self, num_id: u32, level: u8) -> Result<u32> {
        let definition = self.level_definition(num_id, level)?;
        let resets: Vec<usize> = (level as usize + 1..LEVELS)
            .filter(|&deeper| {
                self.defs
                    .level_definition(num_id, deeper as u8)
                    .map(|d| d.resets_after(level))
                    .unwrap_or(true)
            })
            .collect();

        let mut counters = self.counters.borrow_mut();
        let state = counters.entry(num_id).or_insert([None; LEVELS]);
        let value = match state[level as usize] {
            Some(current) => current.saturating_add(1),
            None => definition.start,
        };
        state[level as usize] = Some(value);
        for deeper in resets {
            state[deeper] = None;
        }
        Ok(value)
    }

    /// Current counter value without advancing, `None` before first use.
    pub fn current_value(&self, num_id: u32, level: u8) -> Option<u32> {
        self.counters
            .borrow()
            .get(&num_id)
            .and_then(|state| state.get(level as usize).copied().flatten())
    }

    /// Marker text for the next paragraph of `num_id` at `level`.
    ///
    /// `%1`..`%9` in the level text are replaced by the current value of
    /// that level, formatted in that level's numeral system.
    pub fn text_for(&self, num_id: u32, level: u8) -> Result<String> {
        self.next_value(num_id, level)?;
        let definition = self.level_definition(num_id, level)?;

        let mut out = String::new();
        let mut chars = definition.text.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            let Some(slot) = chars.peek().and_then(|d| d.to_digit(10)).filter(|d| (1..=9).contains(d))
            else {
                out.push(c);
                continue;
            };
            chars.next();
            let referenced = (slot - 1) as u8;
            out.push_str(&self.render_level(num_id, referenced, &definition));
        }
        Ok(out)
    }

    fn render_level(&self, num_id: u32, referenced: u8, current: &LevelDefinition) -> String {
        let referenced_def = if referenced == current.level {
            Some(current.clone())
        } else {
            self.defs.level_definition(num_id, referenced).ok()
        };
        let value = self
            .current_value(num_id, referenced)
            .or_else(|| referenced_def.as_ref().map(|d| d.start))
            .unwrap_or(1);
        let format = match referenced_def {
            Some(_) if current.legal && referenced < current.level => NumberFormat::Decimal,
            Some(d) => d.format,
            None => NumberFormat::Decimal,
        };
        format.format(value)
    }

    /// Clear every counter.
    pub fn reset(&self) {
        self.counters.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBERING: &str = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/>
      <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%1.%2)"/></w:lvl>
    <w:lvl w:ilvl="2"><w:start w:val="1"/><w:numFmt w:val="lowerRoman"/><w:lvlText w:val="%3"/><w:lvlRestart w:val="0"/></w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="1">
    <w:lvl w:ilvl="0"><w:start w:val="3"/><w:numFmt w:val="upperRoman"/><w:lvlText w:val="%1"/></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%1.%2"/><w:isLgl/></w:lvl>
    <w:lvl w:ilvl="2"><w:start w:val="1"/><w:numFmt w:val="klingon"/><w:lvlText w:val="(%3)"/></w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="2"><w:numStyleLink w:val="ListStyle"/></w:abstractNum>
  <w:abstractNum w:abstractNumId="3"><w:styleLink w:val="ListStyle"/>
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="0"/>
    <w:lvlOverride w:ilvl="0"><w:startOverride w:val="5"/></w:lvlOverride>
  </w:num>
  <w:num w:numId="3"><w:abstractNumId w:val="1"/></w:num>
  <w:num w:numId="4"><w:abstractNumId w:val="2"/></w:num>
  <w:num w:numId="9"><w:abstractNumId w:val="42"/></w:num>
</w:numbering>"#;

    fn numbering() -> Numbering {
        Numbering::new(NumberingDefinitions::parse(NUMBERING.as_bytes()).unwrap())
    }

    #[test]
    fn test_nested_restart() {
        let n = numbering();
        assert_eq!(n.text_for(1, 0).unwrap(), "1.");
        assert_eq!(n.text_for(1, 1).unwrap(), "1.a)");
        assert_eq!(n.text_for(1, 1).unwrap(), "1.b)");
        assert_eq!(n.text_for(1, 0).unwrap(), "2.");
        assert_eq!(n.text_for(1, 1).unwrap(), "2.a)");
    }

    #[test]
    fn test_shallower_advance_leaves_deeper_next_value() {
        let n = numbering();
        n.text_for(1, 0).unwrap();
        let first = n.text_for(1, 0).unwrap();
        let second = n.text_for(1, 0).unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("2.", "3."));
        assert_eq!(n.current_value(1, 1), None);
        assert_eq!(n.next_value(1, 1).unwrap(), 1);
    }

    #[test]
    fn test_lvl_restart_zero_never_resets() {
        let n = numbering();
        n.text_for(1, 0).unwrap();
        assert_eq!(n.text_for(1, 2).unwrap(), "i");
        assert_eq!(n.text_for(1, 2).unwrap(), "ii");
        n.text_for(1, 0).unwrap();
        assert_eq!(n.text_for(1, 2).unwrap(), "iii");
    }

    #[test]
    fn test_instance_start_override_and_separate_counters() {
        let n = numbering();
        assert_eq!(n.text_for(2, 0).unwrap(), "5.");
        assert_eq!(n.text_for(1, 0).unwrap(), "1.");
        assert_eq!(n.text_for(2, 0).unwrap(), "6.");
        assert_eq!(n.level_definition(2, 0).unwrap().start, 5);
        assert_eq!(n.level_definition(1, 0).unwrap().start, 1);
    }

    #[test]
    fn test_legal_and_unknown_format() {
        let n = numbering();
        assert_eq!(n.text_for(3, 0).unwrap(), "III");
        assert_eq!(n.text_for(3, 1).unwrap(), "3.a");
        assert_eq!(n.text_for(3, 2).unwrap(), "(1)");
    }

    #[test]
    fn test_style_link_and_missing_definitions() {
        let n = numbering();
        assert_eq!(n.text_for(4, 0).unwrap(), "•");
        assert!(matches!(n.text_for(77, 0), Err(Error::NumberingNotFound(_))));
        assert!(matches!(n.text_for(9, 0), Err(Error::NumberingNotFound(_))));
        assert!(matches!(n.text_for(1, 5), Err(Error::NumberingNotFound(_))));
    }

    #[test]
    fn test_level_properties_and_reset() {
        let n = numbering();
        let def = n.level_definition(1, 0).unwrap();
        assert_eq!(def.properties.paragraph.indent_left, Some(720));
        assert_eq!(def.properties.paragraph.indent_hanging, Some(360));
        assert_eq!(def.suffix, LevelSuffix::Tab);

        n.text_for(1, 0).unwrap();
        n.reset();
        assert_eq!(n.text_for(1, 0).unwrap(), "1.");
    }
}
