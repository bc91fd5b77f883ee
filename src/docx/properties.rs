//! Sparse formatting properties.
//!
//! Every field is optional: `None` means "not declared at this level".
//! [`apply`](StyleFragment::apply) overwrites only the fields the more
//! specific layer declares, so unset fields fall through from ancestors.

use crate::schema::{child_on_off, child_val, parse_int, w_attr, w_child, NumberingRef, ParagraphPr};
use crate::xml::XmlElement;
use serde::Serialize;

macro_rules! patch {
    ($dst:ident, $src:ident; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )+
    };
}

/// Underline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Underline {
    None,
    Single,
    Double,
    Thick,
    Dotted,
    Dashed,
    Wave,
    Words,
}

impl Underline {
    /// Unknown values degrade to single.
    pub fn parse(value: &str) -> Self {
        match value {
            "none" => Underline::None,
            "single" => Underline::Single,
            "double" => Underline::Double,
            "thick" => Underline::Thick,
            "dotted" | "dottedHeavy" => Underline::Dotted,
            "dash" | "dashedHeavy" | "dashLong" | "dashLongHeavy" | "dotDash" | "dotDotDash" => {
                Underline::Dashed
            }
            "wave" | "wavyHeavy" | "wavyDouble" => Underline::Wave,
            "words" => Underline::Words,
            other => {
                log::debug!("unknown underline '{}', using single", other);
                Underline::Single
            }
        }
    }
}

/// Text highlight color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Highlight {
    None,
    Yellow,
    Green,
    Cyan,
    Magenta,
    Blue,
    Red,
    DarkBlue,
    DarkCyan,
    DarkGreen,
    DarkMagenta,
    DarkRed,
    DarkYellow,
    DarkGray,
    LightGray,
    Black,
    White,
}

impl Highlight {
    /// Unknown values degrade to yellow.
    pub fn parse(value: &str) -> Self {
        match value {
            "none" => Highlight::None,
            "yellow" => Highlight::Yellow,
            "green" => Highlight::Green,
            "cyan" => Highlight::Cyan,
            "magenta" => Highlight::Magenta,
            "blue" => Highlight::Blue,
            "red" => Highlight::Red,
            "darkBlue" => Highlight::DarkBlue,
            "darkCyan" => Highlight::DarkCyan,
            "darkGreen" => Highlight::DarkGreen,
            "darkMagenta" => Highlight::DarkMagenta,
            "darkRed" => Highlight::DarkRed,
            "darkYellow" => Highlight::DarkYellow,
            "darkGray" => Highlight::DarkGray,
            "lightGray" => Highlight::LightGray,
            "black" => Highlight::Black,
            "white" => Highlight::White,
            other => {
                log::debug!("unknown highlight '{}', using yellow", other);
                Highlight::Yellow
            }
        }
    }

    /// RGB hex value, `None` for no highlight.
    pub fn hex(self) -> Option<&'static str> {
        Some(match self {
            Highlight::None => return None,
            Highlight::Yellow => "FFFF00",
            Highlight::Green => "00FF00",
            Highlight::Cyan => "00FFFF",
            Highlight::Magenta => "FF00FF",
            Highlight::Blue => "0000FF",
            Highlight::Red => "FF0000",
            Highlight::DarkBlue => "000080",
            Highlight::DarkCyan => "008080",
            Highlight::DarkGreen => "008000",
            Highlight::DarkMagenta => "800080",
            Highlight::DarkRed => "800000",
            Highlight::DarkYellow => "808000",
            Highlight::DarkGray => "808080",
            Highlight::LightGray => "C0C0C0",
            Highlight::Black => "000000",
            Highlight::White => "FFFFFF",
        })
    }
}

/// Vertical text alignment within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VertAlign {
    Baseline,
    Superscript,
    Subscript,
}

impl VertAlign {
    /// Unknown values degrade to baseline.
    pub fn parse(value: &str) -> Self {
        match value {
            "superscript" => VertAlign::Superscript,
            "subscript" => VertAlign::Subscript,
            "baseline" => VertAlign::Baseline,
            other => {
                log::debug!("unknown vertical alignment '{}', using baseline", other);
                VertAlign::Baseline
            }
        }
    }
}

/// Horizontal alignment of paragraphs and tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    Left,
    Center,
    Right,
    Both,
    Distribute,
}

impl Justification {
    /// Unknown values degrade to left.
    pub fn parse(value: &str) -> Self {
        match value {
            "left" | "start" => Justification::Left,
            "center" => Justification::Center,
            "right" | "end" => Justification::Right,
            "both" => Justification::Both,
            "distribute" => Justification::Distribute,
            other => {
                log::debug!("unknown justification '{}', using left", other);
                Justification::Left
            }
        }
    }
}

/// Vertical alignment inside a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellVAlign {
    Top,
    Center,
    Bottom,
}

impl CellVAlign {
    /// Unknown values degrade to top.
    pub fn parse(value: &str) -> Self {
        match value {
            "top" => CellVAlign::Top,
            "center" => CellVAlign::Center,
            "bottom" => CellVAlign::Bottom,
            other => {
                log::debug!("unknown cell alignment '{}', using top", other);
                CellVAlign::Top
            }
        }
    }
}

/// Line height handed down to runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "rule", content = "value")]
pub enum LineHeight {
    /// Multiple of the font's natural line height
    Multiple(f64),
    /// Exactly this many points
    Exact(f64),
    /// At least this many points
    AtLeast(f64),
}

/// Paragraph line spacing as declared (`w:spacing/@w:line`, `@w:lineRule`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineSpacing {
    pub line: i64,
    pub rule: LineRule,
}

/// `w:lineRule`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineRule {
    Auto,
    Exact,
    AtLeast,
}

impl LineSpacing {
    /// Convert to a line height: 240ths of a line, or twips to points.
    pub fn line_height(self) -> LineHeight {
        match self.rule {
            LineRule::Auto => LineHeight::Multiple(self.line as f64 / 240.0),
            LineRule::Exact => LineHeight::Exact(self.line as f64 / 20.0),
            LineRule::AtLeast => LineHeight::AtLeast(self.line as f64 / 20.0),
        }
    }
}

/// Character (run) properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<Underline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_strike: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_caps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// ASCII / high-ANSI font
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_east_asia: Option<String>,
    /// Size in half-points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Hex RGB or `auto`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vert_align: Option<VertAlign>,
    /// Character spacing adjustment in twips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_spacing: Option<i64>,
    /// Line height promoted from paragraph spacing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<LineHeight>,
}

impl RunProperties {
    /// Read a `w:rPr` element.
    pub fn from_element(rpr: &XmlElement) -> Self {
        let fonts = w_child(rpr, "rFonts");
        Self {
            bold: child_on_off(rpr, "b"),
            italic: child_on_off(rpr, "i"),
            underline: child_val(rpr, "u").map(Underline::parse).or_else(|| {
                // <w:u/> without a value is a single underline
                w_child(rpr, "u").map(|_| Underline::Single)
            }),
            strike: child_on_off(rpr, "strike"),
            double_strike: child_on_off(rpr, "dstrike"),
            caps: child_on_off(rpr, "caps"),
            small_caps: child_on_off(rpr, "smallCaps"),
            hidden: child_on_off(rpr, "vanish"),
            font: fonts.and_then(|f| w_attr(f, "ascii").or_else(|| w_attr(f, "hAnsi"))).map(String::from),
            font_east_asia: fonts.and_then(|f| w_attr(f, "eastAsia")).map(String::from),
            size: child_val(rpr, "sz")
                .and_then(parse_int)
                .and_then(|n| u32::try_from(n).ok()),
            color: child_val(rpr, "color").map(String::from),
            highlight: child_val(rpr, "highlight").map(Highlight::parse),
            vert_align: child_val(rpr, "vertAlign").map(VertAlign::parse),
            character_spacing: child_val(rpr, "spacing").and_then(parse_int),
            line_height: None,
        }
    }

    /// Overwrite the fields `other` declares.
    pub fn apply(&mut self, other: &RunProperties) {
        patch!(self, other;
            bold, italic, underline, strike, double_strike, caps, small_caps, hidden,
            font, font_east_asia, size, color, highlight, vert_align, character_spacing,
            line_height,
        );
    }

    /// Font size in points.
    pub fn size_points(&self) -> Option<f64> {
        self.size.map(|half| half as f64 / 2.0)
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Paragraph properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParagraphProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<Justification>,
    /// Twips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_before: Option<i64>,
    /// Twips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_after: Option<i64>,
    /// Declared line spacing; moved into the run set by [`StyleFragment`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<LineSpacing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_left: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_right: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_first_line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_hanging: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_next: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_lines: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numbering: Option<NumberingRef>,
}

impl ParagraphProperties {
    /// Read a `w:pPr` element.
    pub fn from_element(ppr: &XmlElement) -> Self {
        let wrapped = ParagraphPr::new(ppr);
        let spacing = wrapped.spacing();
        let indentation = wrapped.indentation().unwrap_or_default();
        let line_spacing = spacing.and_then(|s| {
            let line = s.line()?;
            let rule = match s.line_rule() {
                Some("exact") => LineRule::Exact,
                Some("atLeast") => LineRule::AtLeast,
                _ => LineRule::Auto,
            };
            Some(LineSpacing { line, rule })
        });

        Self {
            justification: wrapped.justification().map(Justification::parse),
            spacing_before: spacing.and_then(|s| s.before()),
            spacing_after: spacing.and_then(|s| s.after()),
            line_spacing,
            indent_left: indentation.left,
            indent_right: indentation.right,
            indent_first_line: indentation.first_line,
            indent_hanging: indentation.hanging,
            keep_next: wrapped.keep_next(),
            keep_lines: wrapped.keep_lines(),
            outline_level: wrapped.outline_level(),
            numbering: wrapped.numbering(),
        }
    }

    /// Overwrite the fields `other` declares.
    pub fn apply(&mut self, other: &ParagraphProperties) {
        patch!(self, other;
            justification, spacing_before, spacing_after, line_spacing,
            indent_left, indent_right, indent_first_line, indent_hanging,
            keep_next, keep_lines, outline_level, numbering,
        );
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Table-level properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<Justification>,
    /// Twips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_band_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_band_size: Option<u32>,
}

impl TableProperties {
    /// Read a `w:tblPr` element.
    pub fn from_element(tbl_pr: &XmlElement) -> Self {
        let band = |name: &str| {
            child_val(tbl_pr, name)
                .and_then(parse_int)
                .and_then(|n| u32::try_from(n).ok())
        };
        Self {
            justification: child_val(tbl_pr, "jc").map(Justification::parse),
            indent: w_child(tbl_pr, "tblInd").and_then(|i| w_attr(i, "w")).and_then(parse_int),
            row_band_size: band("tblStyleRowBandSize"),
            col_band_size: band("tblStyleColBandSize"),
        }
    }

    pub fn apply(&mut self, other: &TableProperties) {
        patch!(self, other; justification, indent, row_band_size, col_band_size);
    }
}

/// Cell-level properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellProperties {
    /// Shading fill, hex RGB or `auto`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_align: Option<CellVAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_wrap: Option<bool>,
}

impl CellProperties {
    /// Read a `w:tcPr` element.
    pub fn from_element(tc_pr: &XmlElement) -> Self {
        Self {
            shading: w_child(tc_pr, "shd")
                .and_then(|s| w_attr(s, "fill"))
                .map(String::from),
            v_align: child_val(tc_pr, "vAlign").map(CellVAlign::parse),
            no_wrap: child_on_off(tc_pr, "noWrap"),
        }
    }

    pub fn apply(&mut self, other: &CellProperties) {
        patch!(self, other; shading, v_align, no_wrap);
    }
}

/// One layer of a cascade: everything a style (or a conditional block,
/// or the document defaults) declares.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleFragment {
    pub paragraph: ParagraphProperties,
    pub run: RunProperties,
    pub table: TableProperties,
    pub cell: CellProperties,
}

impl StyleFragment {
    /// Build a fragment from property elements, any of which may be absent.
    pub fn from_elements(
        ppr: Option<&XmlElement>,
        rpr: Option<&XmlElement>,
        tbl_pr: Option<&XmlElement>,
        tc_pr: Option<&XmlElement>,
    ) -> Self {
        let mut fragment = Self {
            paragraph: ppr.map(ParagraphProperties::from_element).unwrap_or_default(),
            run: rpr.map(RunProperties::from_element).unwrap_or_default(),
            table: tbl_pr.map(TableProperties::from_element).unwrap_or_default(),
            cell: tc_pr.map(CellProperties::from_element).unwrap_or_default(),
        };
        fragment.promote_line_height();
        fragment
    }

    /// Move paragraph line spacing into the run set as a line height.
    ///
    /// Line height is resolved against font metrics, which belong to runs.
    pub fn promote_line_height(&mut self) {
        if let Some(spacing) = self.paragraph.line_spacing.take() {
            self.run.line_height = Some(spacing.line_height());
        }
    }

    /// Overwrite every field `other` declares.
    pub fn apply(&mut self, other: &StyleFragment) {
        self.paragraph.apply(&other.paragraph);
        self.run.apply(&other.run);
        self.table.apply(&other.table);
        self.cell.apply(&other.cell);
        self.promote_line_height();
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to compact JSON.
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Built-in values used when neither the document defaults nor any
    /// style declare a property.
    pub fn baseline() -> Self {
        Self {
            paragraph: ParagraphProperties {
                justification: Some(Justification::Left),
                spacing_before: Some(0),
                spacing_after: Some(0),
                indent_left: Some(0),
                indent_right: Some(0),
                ..Default::default()
            },
            run: RunProperties {
                bold: Some(false),
                italic: Some(false),
                strike: Some(false),
                size: Some(20),
                line_height: Some(LineHeight::Multiple(1.0)),
                ..Default::default()
            },
            table: TableProperties {
                justification: Some(Justification::Left),
                row_band_size: Some(1),
                col_band_size: Some(1),
                ..Default::default()
            },
            cell: CellProperties {
                v_align: Some(CellVAlign::Top),
                ..Default::default()
            },
        }
    }
}
