//! WordprocessingML wrappers.

use super::dml::{Anchor, Inline, Placement};
use super::{child_on_off, child_val, is_wml, on_off, parse_int, r_attr, w_attr, w_child, w_children, w_val};
use crate::error::{Error, Result};
use crate::opc::constants::namespace as ns;
use crate::xml::XmlElement;
use serde::Serialize;

wrapper!(
    /// `w:document`
    Document
);

impl<'a> Document<'a> {
    /// The document body.
    pub fn body(&self) -> Option<Body<'a>> {
        w_child(self.el, "body").map(Body::new)
    }
}

wrapper!(
    /// `w:body`
    Body
);

/// A block-level item of a body or cell.
#[derive(Debug, Clone, Copy)]
pub enum BlockItem<'a> {
    Paragraph(Paragraph<'a>),
    Table(Table<'a>),
}

impl<'a> Body<'a> {
    /// Paragraphs and tables in document order.
    pub fn blocks(&self) -> Vec<BlockItem<'a>> {
        blocks_of(self.el)
    }

    /// Top-level paragraphs.
    pub fn paragraphs(&self) -> Vec<Paragraph<'a>> {
        w_children(self.el, "p").map(Paragraph::new).collect()
    }

    /// Top-level tables.
    pub fn tables(&self) -> Vec<Table<'a>> {
        w_children(self.el, "tbl").map(Table::new).collect()
    }
}

fn blocks_of(el: &XmlElement) -> Vec<BlockItem<'_>> {
    el.elements()
        .filter(|c| is_wml(&c.ns))
        .filter_map(|c| match c.local.as_str() {
            "p" => Some(BlockItem::Paragraph(Paragraph::new(c))),
            "tbl" => Some(BlockItem::Table(Table::new(c))),
            _ => None,
        })
        .collect()
}

/// A paragraph's list membership (`w:numPr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberingRef {
    /// Numbering instance id (`w:numId`)
    pub num_id: u32,
    /// List level (`w:ilvl`), 0-based
    pub level: u8,
}

wrapper!(
    /// `w:p`
    Paragraph
);

/// Inline content of a paragraph.
#[derive(Debug, Clone, Copy)]
pub enum ParagraphContent<'a> {
    Run(Run<'a>),
    Hyperlink(Hyperlink<'a>),
    BookmarkStart(BookmarkStart<'a>),
}

impl<'a> Paragraph<'a> {
    /// Paragraph properties.
    pub fn properties(&self) -> Option<ParagraphPr<'a>> {
        w_child(self.el, "pPr").map(ParagraphPr::new)
    }

    /// Directly applied paragraph style.
    pub fn style_id(&self) -> Option<&'a str> {
        self.properties().and_then(|p| p.style_id())
    }

    /// List membership, if the paragraph is numbered directly.
    pub fn numbering(&self) -> Option<NumberingRef> {
        self.properties().and_then(|p| p.numbering())
    }

    /// Runs, hyperlinks, and bookmarks in order.
    pub fn content(&self) -> Vec<ParagraphContent<'a>> {
        self.el
            .elements()
            .filter(|c| is_wml(&c.ns))
            .filter_map(|c| match c.local.as_str() {
                "r" => Some(ParagraphContent::Run(Run::new(c))),
                "hyperlink" => Some(ParagraphContent::Hyperlink(Hyperlink::new(c))),
                "bookmarkStart" => Some(ParagraphContent::BookmarkStart(BookmarkStart::new(c))),
                _ => None,
            })
            .collect()
    }

    /// Every run, including those inside hyperlinks.
    pub fn runs(&self) -> Vec<Run<'a>> {
        let mut runs = Vec::new();
        for item in self.content() {
            match item {
                ParagraphContent::Run(run) => runs.push(run),
                ParagraphContent::Hyperlink(link) => runs.extend(link.runs()),
                ParagraphContent::BookmarkStart(_) => {}
            }
        }
        runs
    }

    /// Plain text of the paragraph.
    pub fn text(&self) -> String {
        self.runs().iter().map(Run::text).collect()
    }
}

wrapper!(
    /// `w:pPr`
    ParagraphPr
);

/// `w:ind` values in twips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indentation {
    pub left: Option<i64>,
    pub right: Option<i64>,
    pub first_line: Option<i64>,
    pub hanging: Option<i64>,
}

impl<'a> ParagraphPr<'a> {
    /// `w:pStyle`
    pub fn style_id(&self) -> Option<&'a str> {
        child_val(self.el, "pStyle")
    }

    /// `w:numPr`. A missing level means level 0.
    pub fn numbering(&self) -> Option<NumberingRef> {
        let num_pr = w_child(self.el, "numPr")?;
        let num_id = child_val(num_pr, "numId").and_then(parse_int)?;
        let level = child_val(num_pr, "ilvl").and_then(parse_int).unwrap_or(0);
        Some(NumberingRef {
            num_id: u32::try_from(num_id).ok()?,
            level: level.clamp(0, 8) as u8,
        })
    }

    /// Raw `w:jc` value.
    pub fn justification(&self) -> Option<&'a str> {
        child_val(self.el, "jc")
    }

    /// `w:spacing`, bound in paragraph context.
    pub fn spacing(&self) -> Option<Spacing<'a>> {
        w_child(self.el, "spacing").map(|s| Spacing::new(s, SpacingContext::Paragraph))
    }

    /// `w:ind`, accepting both the `left/right` and `start/end` spellings.
    pub fn indentation(&self) -> Option<Indentation> {
        let ind = w_child(self.el, "ind")?;
        let twips = |a: &str, b: &str| w_attr(ind, a).or_else(|| w_attr(ind, b)).and_then(parse_int);
        Some(Indentation {
            left: twips("left", "start"),
            right: twips("right", "end"),
            first_line: w_attr(ind, "firstLine").and_then(parse_int),
            hanging: w_attr(ind, "hanging").and_then(parse_int),
        })
    }

    /// `w:keepNext`
    pub fn keep_next(&self) -> Option<bool> {
        child_on_off(self.el, "keepNext")
    }

    /// `w:keepLines`
    pub fn keep_lines(&self) -> Option<bool> {
        child_on_off(self.el, "keepLines")
    }

    /// `w:outlineLvl`
    pub fn outline_level(&self) -> Option<u8> {
        child_val(self.el, "outlineLvl")
            .and_then(parse_int)
            .and_then(|n| u8::try_from(n).ok())
    }

    /// Run properties of the paragraph mark.
    pub fn run_properties(&self) -> Option<RunPr<'a>> {
        w_child(self.el, "rPr").map(RunPr::new)
    }
}

wrapper!(
    /// `w:r`
    Run
);

/// Optional choice of run content.
#[derive(Debug, Clone, Copy)]
pub enum RunItem<'a> {
    Text(Text<'a>),
    Break(Break<'a>),
    Tab(Tab<'a>),
    Drawing(Drawing<'a>),
    /// Registered or not, anything else inside a run
    Other(&'a XmlElement),
}

impl<'a> Run<'a> {
    /// Run properties.
    pub fn properties(&self) -> Option<RunPr<'a>> {
        w_child(self.el, "rPr").map(RunPr::new)
    }

    /// Directly applied character style.
    pub fn style_id(&self) -> Option<&'a str> {
        self.properties().and_then(|p| p.style_id())
    }

    /// Content items in order, excluding `w:rPr`.
    pub fn items(&self) -> Vec<RunItem<'a>> {
        self.el
            .elements()
            .filter(|c| !(c.local == "rPr" && is_wml(&c.ns)))
            .map(|c| {
                if !is_wml(&c.ns) {
                    return RunItem::Other(c);
                }
                match c.local.as_str() {
                    "t" => RunItem::Text(Text::new(c)),
                    "br" => RunItem::Break(Break::new(c)),
                    "tab" => RunItem::Tab(Tab::new(c)),
                    "drawing" => RunItem::Drawing(Drawing::new(c)),
                    _ => RunItem::Other(c),
                }
            })
            .collect()
    }

    /// Plain text: tabs and breaks become `\t` and `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in self.items() {
            match item {
                RunItem::Text(t) => out.push_str(&t.text()),
                RunItem::Tab(_) => out.push('\t'),
                RunItem::Break(_) => out.push('\n'),
                RunItem::Other(el) if el.local == "cr" => out.push('\n'),
                _ => {}
            }
        }
        out
    }

    /// Drawings embedded in the run.
    pub fn drawings(&self) -> Vec<Drawing<'a>> {
        w_children(self.el, "drawing").map(Drawing::new).collect()
    }
}

wrapper!(
    /// `w:rPr`
    RunPr
);

impl<'a> RunPr<'a> {
    /// `w:rStyle`
    pub fn style_id(&self) -> Option<&'a str> {
        child_val(self.el, "rStyle")
    }

    /// `w:spacing`, bound in character context.
    pub fn spacing(&self) -> Option<Spacing<'a>> {
        w_child(self.el, "spacing").map(|s| Spacing::new(s, SpacingContext::Run))
    }
}

wrapper!(
    /// `w:t`
    Text
);

impl Text<'_> {
    /// The literal text.
    pub fn text(&self) -> String {
        self.el.text()
    }

    /// Whether `xml:space="preserve"` is set.
    pub fn preserves_space(&self) -> bool {
        self.el.attr_local("space") == Some("preserve")
    }
}

/// `w:br` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    TextWrapping,
    Page,
    Column,
}

wrapper!(
    /// `w:br`
    Break
);

impl Break<'_> {
    /// Break type; unknown values are text wrapping.
    pub fn kind(&self) -> BreakKind {
        match w_attr(self.el, "type") {
            Some("page") => BreakKind::Page,
            Some("column") => BreakKind::Column,
            _ => BreakKind::TextWrapping,
        }
    }
}

wrapper!(
    /// `w:tab` inside a run
    Tab
);

wrapper!(
    /// `w:hyperlink`
    Hyperlink
);

impl<'a> Hyperlink<'a> {
    /// Relationship id of an external target.
    pub fn r_id(&self) -> Option<&'a str> {
        r_attr(self.el, "id")
    }

    /// Bookmark name of an internal target.
    pub fn anchor(&self) -> Option<&'a str> {
        w_attr(self.el, "anchor")
    }

    /// Runs inside the link.
    pub fn runs(&self) -> Vec<Run<'a>> {
        w_children(self.el, "r").map(Run::new).collect()
    }
}

wrapper!(
    /// `w:bookmarkStart`
    BookmarkStart
);

impl<'a> BookmarkStart<'a> {
    pub fn id(&self) -> Option<&'a str> {
        w_attr(self.el, "id")
    }

    pub fn name(&self) -> Option<&'a str> {
        w_attr(self.el, "name")
    }
}

wrapper!(
    /// `w:tbl`
    Table
);

impl<'a> Table<'a> {
    /// Table properties.
    pub fn properties(&self) -> Option<TablePr<'a>> {
        w_child(self.el, "tblPr").map(TablePr::new)
    }

    /// Directly applied table style.
    pub fn style_id(&self) -> Option<&'a str> {
        self.properties().and_then(|p| p.style_id())
    }

    /// `w:tblGrid`
    pub fn grid(&self) -> Option<TblGrid<'a>> {
        w_child(self.el, "tblGrid").map(TblGrid::new)
    }

    /// Rows in order.
    pub fn rows(&self) -> Vec<TableRow<'a>> {
        w_children(self.el, "tr").map(TableRow::new).collect()
    }
}

wrapper!(
    /// `w:tblPr`
    TablePr
);

impl<'a> TablePr<'a> {
    /// `w:tblStyle`
    pub fn style_id(&self) -> Option<&'a str> {
        child_val(self.el, "tblStyle")
    }

    /// `w:tblLook`
    pub fn look(&self) -> Option<TblLook<'a>> {
        w_child(self.el, "tblLook").map(TblLook::new)
    }

    /// Raw `w:jc` value.
    pub fn justification(&self) -> Option<&'a str> {
        child_val(self.el, "jc")
    }

    /// `w:tblStyleRowBandSize`
    pub fn row_band_size(&self) -> Option<u32> {
        child_val(self.el, "tblStyleRowBandSize")
            .and_then(parse_int)
            .and_then(|n| u32::try_from(n).ok())
    }

    /// `w:tblStyleColBandSize`
    pub fn col_band_size(&self) -> Option<u32> {
        child_val(self.el, "tblStyleColBandSize")
            .and_then(parse_int)
            .and_then(|n| u32::try_from(n).ok())
    }
}

/// Which conditional table-style regions a table enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableLook {
    pub first_row: bool,
    pub last_row: bool,
    pub first_column: bool,
    pub last_column: bool,
    pub no_h_band: bool,
    pub no_v_band: bool,
}

impl TableLook {
    /// Value Word assumes when a table carries no `w:tblLook`.
    pub const DEFAULT_BITMASK: u32 = 0x04A0;

    /// Decode the legacy hexadecimal bitmask form.
    pub fn from_bitmask(mask: u32) -> Self {
        Self {
            first_row: mask & 0x0020 != 0,
            last_row: mask & 0x0040 != 0,
            first_column: mask & 0x0080 != 0,
            last_column: mask & 0x0100 != 0,
            no_h_band: mask & 0x0200 != 0,
            no_v_band: mask & 0x0400 != 0,
        }
    }

    /// Every conditional region enabled, banding included.
    pub fn all() -> Self {
        Self {
            first_row: true,
            last_row: true,
            first_column: true,
            last_column: true,
            no_h_band: false,
            no_v_band: false,
        }
    }
}

impl Default for TableLook {
    fn default() -> Self {
        Self::from_bitmask(Self::DEFAULT_BITMASK)
    }
}

wrapper!(
    /// `w:tblLook`
    TblLook
);

impl TblLook<'_> {
    /// Decode the look. Explicit attributes win over the bitmask.
    pub fn look(&self) -> TableLook {
        let mut look = w_val(self.el)
            .and_then(|v| u32::from_str_radix(v.trim(), 16).ok())
            .map(TableLook::from_bitmask)
            .unwrap_or_default();
        let flag = |name: &str| w_attr(self.el, name).map(|v| on_off(Some(v)));
        if let Some(v) = flag("firstRow") {
            look.first_row = v;
        }
        if let Some(v) = flag("lastRow") {
            look.last_row = v;
        }
        if let Some(v) = flag("firstColumn") {
            look.first_column = v;
        }
        if let Some(v) = flag("lastColumn") {
            look.last_column = v;
        }
        if let Some(v) = flag("noHBand") {
            look.no_h_band = v;
        }
        if let Some(v) = flag("noVBand") {
            look.no_v_band = v;
        }
        look
    }
}

wrapper!(
    /// `w:tblGrid`
    TblGrid
);

impl<'a> TblGrid<'a> {
    pub fn columns(&self) -> Vec<GridCol<'a>> {
        w_children(self.el, "gridCol").map(GridCol::new).collect()
    }

    /// Column widths in twips; missing widths are 0.
    pub fn widths(&self) -> Vec<i64> {
        self.columns().iter().map(|c| c.width().unwrap_or(0)).collect()
    }
}

wrapper!(
    /// `w:gridCol`
    GridCol
);

impl GridCol<'_> {
    pub fn width(&self) -> Option<i64> {
        w_attr(self.el, "w").and_then(parse_int)
    }
}

wrapper!(
    /// `w:tr`
    TableRow
);

impl<'a> TableRow<'a> {
    /// Row properties.
    pub fn properties(&self) -> Option<RowPr<'a>> {
        w_child(self.el, "trPr").map(RowPr::new)
    }

    /// Cells in order.
    pub fn cells(&self) -> Vec<TableCell<'a>> {
        w_children(self.el, "tc").map(TableCell::new).collect()
    }

    /// Grid columns skipped before the first cell.
    pub fn grid_before(&self) -> u32 {
        self.properties().map(|p| p.grid_before()).unwrap_or(0)
    }

    /// Whether the row repeats as a header.
    pub fn is_header(&self) -> bool {
        self.properties().map(|p| p.is_header()).unwrap_or(false)
    }
}

wrapper!(
    /// `w:trPr`
    RowPr
);

impl RowPr<'_> {
    pub fn grid_before(&self) -> u32 {
        child_val(self.el, "gridBefore")
            .and_then(parse_int)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    }

    pub fn grid_after(&self) -> u32 {
        child_val(self.el, "gridAfter")
            .and_then(parse_int)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    }

    /// `w:tblHeader`
    pub fn is_header(&self) -> bool {
        child_on_off(self.el, "tblHeader").unwrap_or(false)
    }

    /// `w:cantSplit`
    pub fn cant_split(&self) -> bool {
        child_on_off(self.el, "cantSplit").unwrap_or(false)
    }
}

/// Vertical merge marker of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VMerge {
    /// Starts a vertically merged region
    Restart,
    /// Continues the region from the row above
    Continue,
}

wrapper!(
    /// `w:tc`
    TableCell
);

impl<'a> TableCell<'a> {
    /// Cell properties.
    pub fn properties(&self) -> Option<CellPr<'a>> {
        w_child(self.el, "tcPr").map(CellPr::new)
    }

    /// Declared column span, default 1.
    pub fn grid_span(&self) -> u32 {
        self.properties().and_then(|p| p.grid_span()).unwrap_or(1).max(1)
    }

    /// Vertical merge marker, if any.
    pub fn v_merge(&self) -> Option<VMerge> {
        self.properties().and_then(|p| p.v_merge())
    }

    /// Paragraphs and nested tables in order.
    pub fn blocks(&self) -> Vec<BlockItem<'a>> {
        blocks_of(self.el)
    }

    /// Paragraphs directly in the cell.
    pub fn paragraphs(&self) -> Vec<Paragraph<'a>> {
        w_children(self.el, "p").map(Paragraph::new).collect()
    }

    /// Plain text, paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs()
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

wrapper!(
    /// `w:tcPr`
    CellPr
);

impl<'a> CellPr<'a> {
    /// `w:gridSpan`
    pub fn grid_span(&self) -> Option<u32> {
        child_val(self.el, "gridSpan")
            .and_then(parse_int)
            .and_then(|n| u32::try_from(n).ok())
    }

    /// `w:vMerge`
    pub fn v_merge(&self) -> Option<VMerge> {
        w_child(self.el, "vMerge").map(|v| VMergeEl::new(v).value())
    }

    /// `w:shd/@w:fill`
    pub fn shading_fill(&self) -> Option<&'a str> {
        w_child(self.el, "shd").and_then(|s| w_attr(s, "fill"))
    }

    /// Raw `w:vAlign` value.
    pub fn v_align(&self) -> Option<&'a str> {
        child_val(self.el, "vAlign")
    }
}

wrapper!(
    /// `w:vMerge`
    VMergeEl
);

impl VMergeEl<'_> {
    /// A missing value means continue.
    pub fn value(&self) -> VMerge {
        match w_val(self.el) {
            Some("restart") => VMerge::Restart,
            _ => VMerge::Continue,
        }
    }
}

wrapper!(
    /// `w:styles`
    Styles
);

impl<'a> Styles<'a> {
    pub fn doc_defaults(&self) -> Option<DocDefaults<'a>> {
        w_child(self.el, "docDefaults").map(DocDefaults::new)
    }

    pub fn styles(&self) -> Vec<StyleEl<'a>> {
        w_children(self.el, "style").map(StyleEl::new).collect()
    }
}

wrapper!(
    /// `w:docDefaults`
    DocDefaults
);

impl<'a> DocDefaults<'a> {
    /// `w:rPrDefault/w:rPr`
    pub fn run_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "rPrDefault").and_then(|d| w_child(d, "rPr"))
    }

    /// `w:pPrDefault/w:pPr`
    pub fn paragraph_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "pPrDefault").and_then(|d| w_child(d, "pPr"))
    }
}

wrapper!(
    /// `w:style`
    StyleEl
);

impl<'a> StyleEl<'a> {
    pub fn style_id(&self) -> Option<&'a str> {
        w_attr(self.el, "styleId")
    }

    /// Raw `w:type`; absent means paragraph.
    pub fn style_type(&self) -> Option<&'a str> {
        w_attr(self.el, "type")
    }

    pub fn name(&self) -> Option<&'a str> {
        child_val(self.el, "name")
    }

    pub fn based_on(&self) -> Option<&'a str> {
        child_val(self.el, "basedOn")
    }

    pub fn next(&self) -> Option<&'a str> {
        child_val(self.el, "next")
    }

    pub fn link(&self) -> Option<&'a str> {
        child_val(self.el, "link")
    }

    /// `w:default="1"`
    pub fn is_default(&self) -> bool {
        w_attr(self.el, "default").is_some_and(|v| on_off(Some(v)))
    }

    pub fn ui_priority(&self) -> Option<i64> {
        child_val(self.el, "uiPriority").and_then(parse_int)
    }

    pub fn paragraph_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "pPr")
    }

    pub fn run_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "rPr")
    }

    pub fn table_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "tblPr")
    }

    pub fn cell_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "tcPr")
    }

    /// `w:tblStylePr` blocks.
    pub fn conditionals(&self) -> Vec<TableStylePr<'a>> {
        w_children(self.el, "tblStylePr").map(TableStylePr::new).collect()
    }
}

wrapper!(
    /// `w:tblStylePr`
    TableStylePr
);

impl<'a> TableStylePr<'a> {
    /// Raw `w:type`, e.g. `firstRow`.
    pub fn condition(&self) -> Option<&'a str> {
        w_attr(self.el, "type")
    }

    pub fn paragraph_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "pPr")
    }

    pub fn run_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "rPr")
    }

    pub fn table_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "tblPr")
    }

    pub fn cell_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "tcPr")
    }
}

wrapper!(
    /// `w:numbering`
    NumberingEl
);

impl<'a> NumberingEl<'a> {
    pub fn abstract_nums(&self) -> Vec<AbstractNum<'a>> {
        w_children(self.el, "abstractNum").map(AbstractNum::new).collect()
    }

    pub fn nums(&self) -> Vec<Num<'a>> {
        w_children(self.el, "num").map(Num::new).collect()
    }
}

fn u32_attr(el: &XmlElement, local: &str) -> Option<u32> {
    w_attr(el, local)
        .and_then(parse_int)
        .and_then(|n| u32::try_from(n).ok())
}

fn u32_child(el: &XmlElement, local: &str) -> Option<u32> {
    child_val(el, local)
        .and_then(parse_int)
        .and_then(|n| u32::try_from(n).ok())
}

wrapper!(
    /// `w:abstractNum`
    AbstractNum
);

impl<'a> AbstractNum<'a> {
    pub fn abstract_num_id(&self) -> Option<u32> {
        u32_attr(self.el, "abstractNumId")
    }

    pub fn levels(&self) -> Vec<Lvl<'a>> {
        w_children(self.el, "lvl").map(Lvl::new).collect()
    }

    /// `w:numStyleLink`: this definition defers to a numbering style.
    pub fn num_style_link(&self) -> Option<&'a str> {
        child_val(self.el, "numStyleLink")
    }

    /// `w:styleLink`: this definition is the one a numbering style names.
    pub fn style_link(&self) -> Option<&'a str> {
        child_val(self.el, "styleLink")
    }
}

wrapper!(
    /// `w:lvl`
    Lvl
);

impl<'a> Lvl<'a> {
    pub fn ilvl(&self) -> Option<u8> {
        u32_attr(self.el, "ilvl").and_then(|n| u8::try_from(n).ok())
    }

    pub fn start(&self) -> Option<u32> {
        u32_child(self.el, "start")
    }

    pub fn num_fmt(&self) -> Option<&'a str> {
        child_val(self.el, "numFmt")
    }

    pub fn lvl_text(&self) -> Option<&'a str> {
        child_val(self.el, "lvlText")
    }

    pub fn lvl_restart(&self) -> Option<u32> {
        u32_child(self.el, "lvlRestart")
    }

    pub fn is_lgl(&self) -> bool {
        child_on_off(self.el, "isLgl").unwrap_or(false)
    }

    pub fn suffix(&self) -> Option<&'a str> {
        child_val(self.el, "suff")
    }

    pub fn paragraph_style(&self) -> Option<&'a str> {
        child_val(self.el, "pStyle")
    }

    pub fn paragraph_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "pPr")
    }

    pub fn run_properties(&self) -> Option<&'a XmlElement> {
        w_child(self.el, "rPr")
    }
}

wrapper!(
    /// `w:num`
    Num
);

impl<'a> Num<'a> {
    pub fn num_id(&self) -> Option<u32> {
        u32_attr(self.el, "numId")
    }

    pub fn abstract_num_id(&self) -> Option<u32> {
        u32_child(self.el, "abstractNumId")
    }

    pub fn overrides(&self) -> Vec<LvlOverride<'a>> {
        w_children(self.el, "lvlOverride").map(LvlOverride::new).collect()
    }
}

wrapper!(
    /// `w:lvlOverride`
    LvlOverride
);

impl<'a> LvlOverride<'a> {
    pub fn ilvl(&self) -> Option<u8> {
        u32_attr(self.el, "ilvl").and_then(|n| u8::try_from(n).ok())
    }

    pub fn start_override(&self) -> Option<u32> {
        u32_child(self.el, "startOverride")
    }

    /// Replacement level definition.
    pub fn level(&self) -> Option<Lvl<'a>> {
        w_child(self.el, "lvl").map(Lvl::new)
    }
}

/// Which shape a `w:spacing` element has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingContext {
    /// Inside `w:pPr`: before/after/line
    Paragraph,
    /// Inside `w:rPr`: character spacing in `w:val`
    Run,
}

impl SpacingContext {
    /// Discriminate by the parent element.
    pub fn from_parent(parent: &XmlElement) -> Self {
        if parent.local == "rPr" {
            SpacingContext::Run
        } else {
            SpacingContext::Paragraph
        }
    }

    /// Discriminate by the attributes present.
    pub fn from_attrs(el: &XmlElement) -> Self {
        let paragraph_attr = ["before", "after", "line", "lineRule", "beforeLines", "afterLines"]
            .iter()
            .any(|a| w_attr(el, a).is_some());
        if w_val(el).is_some() && !paragraph_attr {
            SpacingContext::Run
        } else {
            SpacingContext::Paragraph
        }
    }
}

/// `w:spacing`, carrying the accessors of both shapes.
#[derive(Debug, Clone, Copy)]
pub struct Spacing<'a> {
    el: &'a XmlElement,
    context: SpacingContext,
}

impl<'a> Spacing<'a> {
    pub fn new(el: &'a XmlElement, context: SpacingContext) -> Self {
        Self { el, context }
    }

    pub fn element(&self) -> &'a XmlElement {
        self.el
    }

    pub fn context(&self) -> SpacingContext {
        self.context
    }

    fn paragraph_attr(&self, local: &str) -> Option<&'a str> {
        match self.context {
            SpacingContext::Paragraph => w_attr(self.el, local),
            SpacingContext::Run => None,
        }
    }

    /// Space before, twips.
    pub fn before(&self) -> Option<i64> {
        self.paragraph_attr("before").and_then(parse_int)
    }

    /// Space after, twips.
    pub fn after(&self) -> Option<i64> {
        self.paragraph_attr("after").and_then(parse_int)
    }

    /// Line spacing: 240ths of a line for `auto`, twips otherwise.
    pub fn line(&self) -> Option<i64> {
        self.paragraph_attr("line").and_then(parse_int)
    }

    /// Raw `w:lineRule`.
    pub fn line_rule(&self) -> Option<&'a str> {
        self.paragraph_attr("lineRule")
    }

    /// Character spacing adjustment, twips.
    pub fn character_spacing(&self) -> Option<i64> {
        match self.context {
            SpacingContext::Run => w_val(self.el).and_then(parse_int),
            SpacingContext::Paragraph => None,
        }
    }
}

/// `w:drawing`, with its required placement choice resolved on construction.
#[derive(Debug, Clone, Copy)]
pub struct Drawing<'a> {
    el: &'a XmlElement,
    placement: Option<Placement<'a>>,
}

impl<'a> Drawing<'a> {
    pub fn new(el: &'a XmlElement) -> Self {
        let placement = el.elements().find_map(|c| {
            if c.ns != ns::WP {
                return None;
            }
            match c.local.as_str() {
                "inline" => Some(Placement::Inline(Inline::new(c))),
                "anchor" => Some(Placement::Anchor(Anchor::new(c))),
                _ => None,
            }
        });
        Self { el, placement }
    }

    pub fn element(&self) -> &'a XmlElement {
        self.el
    }

    /// Exactly one of `wp:inline` or `wp:anchor`.
    pub fn placement(&self) -> Result<Placement<'a>> {
        self.placement.ok_or_else(|| Error::SchemaViolation {
            element: "w:drawing".to_string(),
            expected: "wp:inline | wp:anchor".to_string(),
        })
    }

    /// Relationship id of the embedded picture, if this drawing shows one.
    pub fn image_rel_id(&self) -> Result<Option<&'a str>> {
        let placement = self.placement()?;
        Ok(placement
            .graphic()
            .and_then(|g| g.picture())
            .and_then(|p| p.blip())
            .and_then(|b| b.embed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> XmlElement {
        XmlElement::parse_str(xml).unwrap()
    }

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    #[test]
    fn test_paragraph_text_and_numbering() {
        let xml = format!(
            r#"<w:p {W}>
  <w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="1"/><w:numId w:val="3"/></w:numPr></w:pPr>
  <w:r><w:t>Hello</w:t><w:tab/><w:t xml:space="preserve"> world</w:t></w:r>
  <w:hyperlink r:id="rId5"><w:r><w:t>!</w:t></w:r></w:hyperlink>
</w:p>"#
        );
        let el = parse(&xml);
        let p = Paragraph::new(&el);
        assert_eq!(p.style_id(), Some("ListParagraph"));
        assert_eq!(p.numbering(), Some(NumberingRef { num_id: 3, level: 1 }));
        assert_eq!(p.text(), "Hello\t world!");
        assert_eq!(p.runs().len(), 2);

        match p.content()[1] {
            ParagraphContent::Hyperlink(link) => assert_eq!(link.r_id(), Some("rId5")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_table_look_forms() {
        let el = parse(&format!(r#"<w:tblLook {W} w:val="04A0"/>"#));
        let look = TblLook::new(&el).look();
        assert!(look.first_row && look.first_column && look.no_v_band);
        assert!(!look.last_row && !look.no_h_band);

        let el = parse(&format!(
            r#"<w:tblLook {W} w:firstRow="0" w:lastRow="1" w:firstColumn="1" w:lastColumn="0" w:noHBand="1" w:noVBand="0"/>"#
        ));
        let look = TblLook::new(&el).look();
        assert!(!look.first_row && look.last_row && look.no_h_band && !look.no_v_band);

        assert_eq!(TableLook::default(), TableLook::from_bitmask(0x04A0));
    }

    #[test]
    fn test_cell_merge_markers() {
        let el = parse(&format!(
            r#"<w:tr {W}>
  <w:tc><w:tcPr><w:gridSpan w:val="2"/><w:vMerge w:val="restart"/></w:tcPr><w:p/></w:tc>
  <w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc>
  <w:tc><w:p/></w:tc>
</w:tr>"#
        ));
        let cells = TableRow::new(&el).cells();
        assert_eq!(cells[0].grid_span(), 2);
        assert_eq!(cells[0].v_merge(), Some(VMerge::Restart));
        assert_eq!(cells[1].v_merge(), Some(VMerge::Continue));
        assert_eq!(cells[2].grid_span(), 1);
        assert_eq!(cells[2].v_merge(), None);
    }

    #[test]
    fn test_drawing_required_choice() {
        let el = parse(&format!(r#"<w:drawing {W}><w:other/></w:drawing>"#));
        let drawing = Drawing::new(&el);
        assert!(matches!(
            drawing.placement(),
            Err(Error::SchemaViolation { .. })
        ));
        assert!(drawing.image_rel_id().is_err());
    }

    #[test]
    fn test_run_items() {
        let el = parse(&format!(
            r#"<w:r {W}><w:rPr><w:b/></w:rPr><w:t>a</w:t><w:br w:type="page"/><w:sym/></w:r>"#
        ));
        let items = Run::new(&el).items();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], RunItem::Text(_)));
        match items[1] {
            RunItem::Break(b) => assert_eq!(b.kind(), BreakKind::Page),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(items[2], RunItem::Other(_)));
    }
}
