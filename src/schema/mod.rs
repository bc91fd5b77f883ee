//! Schema-bound element model.
//!
//! A closed table built once per process maps `(namespace, local name)` to an
//! [`ElementKind`]. [`bind`] wraps an [`XmlElement`] in the typed wrapper for
//! its kind, or [`Node::Untyped`] when the pair is not registered.
//!
//! Wrappers borrow the element and compute every accessor from it on each
//! call. Elements are immutable once a part is parsed, so the only values
//! computed up front are choice groups (see [`dml::Placement`] and
//! [`dml::GraphicContent`]).

macro_rules! wrapper {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            el: &'a crate::xml::XmlElement,
        }

        impl<'a> $name<'a> {
            /// Wrap an element.
            pub fn new(el: &'a crate::xml::XmlElement) -> Self {
                Self { el }
            }

            /// The underlying element.
            pub fn element(&self) -> &'a crate::xml::XmlElement {
                self.el
            }
        }
    };
}

pub mod dml;
pub mod wml;

use crate::opc::constants::namespace as ns;
use crate::xml::XmlElement;
use std::collections::HashMap;
use std::sync::LazyLock;

pub use dml::{Anchor, Blip, ChartRef, Graphic, GraphicContent, Inline, Picture, Placement};
pub use wml::*;

/// Semantic kind of a registered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Document,
    Body,
    Paragraph,
    ParagraphProperties,
    Run,
    RunProperties,
    Text,
    Break,
    Tab,
    Hyperlink,
    BookmarkStart,
    Table,
    TableProperties,
    TableLook,
    TableGrid,
    GridColumn,
    TableRow,
    RowProperties,
    TableCell,
    CellProperties,
    VerticalMerge,
    Styles,
    DocDefaults,
    Style,
    TableStyleProperties,
    Numbering,
    AbstractNumbering,
    Level,
    NumberingInstance,
    LevelOverride,
    Spacing,
    Drawing,
    Inline,
    Anchor,
    Graphic,
    GraphicData,
    Picture,
    Blip,
    Chart,
}

const WML_TAGS: &[(&str, ElementKind)] = &[
    ("document", ElementKind::Document),
    ("body", ElementKind::Body),
    ("p", ElementKind::Paragraph),
    ("pPr", ElementKind::ParagraphProperties),
    ("r", ElementKind::Run),
    ("rPr", ElementKind::RunProperties),
    ("t", ElementKind::Text),
    ("br", ElementKind::Break),
    ("tab", ElementKind::Tab),
    ("hyperlink", ElementKind::Hyperlink),
    ("bookmarkStart", ElementKind::BookmarkStart),
    ("tbl", ElementKind::Table),
    ("tblPr", ElementKind::TableProperties),
    ("tblLook", ElementKind::TableLook),
    ("tblGrid", ElementKind::TableGrid),
    ("gridCol", ElementKind::GridColumn),
    ("tr", ElementKind::TableRow),
    ("trPr", ElementKind::RowProperties),
    ("tc", ElementKind::TableCell),
    ("tcPr", ElementKind::CellProperties),
    ("vMerge", ElementKind::VerticalMerge),
    ("styles", ElementKind::Styles),
    ("docDefaults", ElementKind::DocDefaults),
    ("style", ElementKind::Style),
    ("tblStylePr", ElementKind::TableStyleProperties),
    ("numbering", ElementKind::Numbering),
    ("abstractNum", ElementKind::AbstractNumbering),
    ("lvl", ElementKind::Level),
    ("num", ElementKind::NumberingInstance),
    ("lvlOverride", ElementKind::LevelOverride),
    ("spacing", ElementKind::Spacing),
    ("drawing", ElementKind::Drawing),
];

static REGISTRY: LazyLock<HashMap<(&'static str, &'static str), ElementKind>> =
    LazyLock::new(|| {
        let mut table = HashMap::new();
        for wml in [ns::WML, ns::WML_STRICT] {
            for &(local, kind) in WML_TAGS {
                table.insert((wml, local), kind);
            }
        }
        table.insert((ns::WP, "inline"), ElementKind::Inline);
        table.insert((ns::WP, "anchor"), ElementKind::Anchor);
        table.insert((ns::A, "graphic"), ElementKind::Graphic);
        table.insert((ns::A, "graphicData"), ElementKind::GraphicData);
        table.insert((ns::A, "blip"), ElementKind::Blip);
        table.insert((ns::PIC, "pic"), ElementKind::Picture);
        table.insert((ns::C, "chart"), ElementKind::Chart);
        table
    });

/// Look up the registered kind of an element.
pub fn kind_of(el: &XmlElement) -> Option<ElementKind> {
    REGISTRY.get(&(el.ns.as_str(), el.local.as_str())).copied()
}

/// An element bound to its semantic wrapper.
#[derive(Debug, Clone)]
pub enum Node<'a> {
    Document(Document<'a>),
    Body(Body<'a>),
    Paragraph(Paragraph<'a>),
    ParagraphProperties(ParagraphPr<'a>),
    Run(Run<'a>),
    RunProperties(RunPr<'a>),
    Text(Text<'a>),
    Break(Break<'a>),
    Tab(Tab<'a>),
    Hyperlink(Hyperlink<'a>),
    BookmarkStart(BookmarkStart<'a>),
    Table(Table<'a>),
    TableProperties(TablePr<'a>),
    TableLook(TblLook<'a>),
    TableGrid(TblGrid<'a>),
    GridColumn(GridCol<'a>),
    TableRow(TableRow<'a>),
    RowProperties(RowPr<'a>),
    TableCell(TableCell<'a>),
    CellProperties(CellPr<'a>),
    VerticalMerge(VMergeEl<'a>),
    Styles(Styles<'a>),
    DocDefaults(DocDefaults<'a>),
    Style(StyleEl<'a>),
    TableStyleProperties(TableStylePr<'a>),
    Numbering(NumberingEl<'a>),
    AbstractNumbering(AbstractNum<'a>),
    Level(Lvl<'a>),
    NumberingInstance(Num<'a>),
    LevelOverride(LvlOverride<'a>),
    Spacing(Spacing<'a>),
    Drawing(Drawing<'a>),
    Inline(Inline<'a>),
    Anchor(Anchor<'a>),
    Graphic(Graphic<'a>),
    GraphicData(Graphic<'a>),
    Picture(Picture<'a>),
    Blip(Blip<'a>),
    Chart(ChartRef<'a>),
    /// Not a registered (namespace, tag) pair
    Untyped(&'a XmlElement),
}

impl<'a> Node<'a> {
    /// The registered kind, or `None` for untyped nodes.
    pub fn kind(&self) -> Option<ElementKind> {
        kind_of(self.element())
    }

    /// The underlying element.
    pub fn element(&self) -> &'a XmlElement {
        match self {
            Node::Document(w) => w.element(),
            Node::Body(w) => w.element(),
            Node::Paragraph(w) => w.element(),
            Node::ParagraphProperties(w) => w.element(),
            Node::Run(w) => w.element(),
            Node::RunProperties(w) => w.element(),
            Node::Text(w) => w.element(),
            Node::Break(w) => w.element(),
            Node::Tab(w) => w.element(),
            Node::Hyperlink(w) => w.element(),
            Node::BookmarkStart(w) => w.element(),
            Node::Table(w) => w.element(),
            Node::TableProperties(w) => w.element(),
            Node::TableLook(w) => w.element(),
            Node::TableGrid(w) => w.element(),
            Node::GridColumn(w) => w.element(),
            Node::TableRow(w) => w.element(),
            Node::RowProperties(w) => w.element(),
            Node::TableCell(w) => w.element(),
            Node::CellProperties(w) => w.element(),
            Node::VerticalMerge(w) => w.element(),
            Node::Styles(w) => w.element(),
            Node::DocDefaults(w) => w.element(),
            Node::Style(w) => w.element(),
            Node::TableStyleProperties(w) => w.element(),
            Node::Numbering(w) => w.element(),
            Node::AbstractNumbering(w) => w.element(),
            Node::Level(w) => w.element(),
            Node::NumberingInstance(w) => w.element(),
            Node::LevelOverride(w) => w.element(),
            Node::Spacing(w) => w.element(),
            Node::Drawing(w) => w.element(),
            Node::Inline(w) => w.element(),
            Node::Anchor(w) => w.element(),
            Node::Graphic(w) | Node::GraphicData(w) => w.element(),
            Node::Picture(w) => w.element(),
            Node::Blip(w) => w.element(),
            Node::Chart(w) => w.element(),
            Node::Untyped(el) => *el,
        }
    }
}

/// Bind an element without knowing its parent.
///
/// The one context-dependent tag, `w:spacing`, is discriminated by the
/// attributes it carries.
pub fn bind(el: &XmlElement) -> Node<'_> {
    bind_with_parent(el, None)
}

/// Bind an element whose parent is known.
pub fn bind_child<'a>(parent: &'a XmlElement, el: &'a XmlElement) -> Node<'a> {
    bind_with_parent(el, Some(parent))
}

fn bind_with_parent<'a>(el: &'a XmlElement, parent: Option<&'a XmlElement>) -> Node<'a> {
    let Some(kind) = kind_of(el) else {
        return Node::Untyped(el);
    };
    match kind {
        ElementKind::Document => Node::Document(Document::new(el)),
        ElementKind::Body => Node::Body(Body::new(el)),
        ElementKind::Paragraph => Node::Paragraph(Paragraph::new(el)),
        ElementKind::ParagraphProperties => Node::ParagraphProperties(ParagraphPr::new(el)),
        ElementKind::Run => Node::Run(Run::new(el)),
        ElementKind::RunProperties => Node::RunProperties(RunPr::new(el)),
        ElementKind::Text => Node::Text(Text::new(el)),
        ElementKind::Break => Node::Break(Break::new(el)),
        ElementKind::Tab => Node::Tab(Tab::new(el)),
        ElementKind::Hyperlink => Node::Hyperlink(Hyperlink::new(el)),
        ElementKind::BookmarkStart => Node::BookmarkStart(BookmarkStart::new(el)),
        ElementKind::Table => Node::Table(Table::new(el)),
        ElementKind::TableProperties => Node::TableProperties(TablePr::new(el)),
        ElementKind::TableLook => Node::TableLook(TblLook::new(el)),
        ElementKind::TableGrid => Node::TableGrid(TblGrid::new(el)),
        ElementKind::GridColumn => Node::GridColumn(GridCol::new(el)),
        ElementKind::TableRow => Node::TableRow(TableRow::new(el)),
        ElementKind::RowProperties => Node::RowProperties(RowPr::new(el)),
        ElementKind::TableCell => Node::TableCell(TableCell::new(el)),
        ElementKind::CellProperties => Node::CellProperties(CellPr::new(el)),
        ElementKind::VerticalMerge => Node::VerticalMerge(VMergeEl::new(el)),
        ElementKind::Styles => Node::Styles(Styles::new(el)),
        ElementKind::DocDefaults => Node::DocDefaults(DocDefaults::new(el)),
        ElementKind::Style => Node::Style(StyleEl::new(el)),
        ElementKind::TableStyleProperties => Node::TableStyleProperties(TableStylePr::new(el)),
        ElementKind::Numbering => Node::Numbering(NumberingEl::new(el)),
        ElementKind::AbstractNumbering => Node::AbstractNumbering(AbstractNum::new(el)),
        ElementKind::Level => Node::Level(Lvl::new(el)),
        ElementKind::NumberingInstance => Node::NumberingInstance(Num::new(el)),
        ElementKind::LevelOverride => Node::LevelOverride(LvlOverride::new(el)),
        ElementKind::Spacing => {
            let context = match parent {
                Some(p) => SpacingContext::from_parent(p),
                None => SpacingContext::from_attrs(el),
            };
            Node::Spacing(Spacing::new(el, context))
        }
        ElementKind::Drawing => Node::Drawing(Drawing::new(el)),
        ElementKind::Inline => Node::Inline(Inline::new(el)),
        ElementKind::Anchor => Node::Anchor(Anchor::new(el)),
        ElementKind::Graphic | ElementKind::GraphicData => {
            let graphic = Graphic::new(el);
            if kind == ElementKind::Graphic {
                Node::Graphic(graphic)
            } else {
                Node::GraphicData(graphic)
            }
        }
        ElementKind::Picture => Node::Picture(Picture::new(el)),
        ElementKind::Blip => Node::Blip(Blip::new(el)),
        ElementKind::Chart => Node::Chart(ChartRef::new(el)),
    }
}

/// Whether a namespace URI is WordprocessingML (transitional or strict).
pub fn is_wml(namespace: &str) -> bool {
    namespace == ns::WML || namespace == ns::WML_STRICT
}

/// First WordprocessingML child with the given local name.
pub(crate) fn w_child<'a>(el: &'a XmlElement, local: &str) -> Option<&'a XmlElement> {
    el.elements().find(|c| c.local == local && is_wml(&c.ns))
}

/// WordprocessingML children with the given local name.
pub(crate) fn w_children<'a>(
    el: &'a XmlElement,
    local: &'a str,
) -> impl Iterator<Item = &'a XmlElement> + 'a {
    el.elements().filter(move |c| c.local == local && is_wml(&c.ns))
}

/// A WordprocessingML attribute. Unqualified spellings are accepted too.
pub(crate) fn w_attr<'a>(el: &'a XmlElement, local: &str) -> Option<&'a str> {
    el.attrs
        .iter()
        .find(|a| a.local == local && (is_wml(&a.ns) || a.ns.is_empty()))
        .map(|a| a.value.as_str())
}

/// The `w:val` attribute.
pub(crate) fn w_val(el: &XmlElement) -> Option<&str> {
    w_attr(el, "val")
}

/// `w:val` of the named child.
pub(crate) fn child_val<'a>(el: &'a XmlElement, local: &str) -> Option<&'a str> {
    w_child(el, local).and_then(w_val)
}

/// An `r:` attribute (relationship reference), transitional or strict.
pub(crate) fn r_attr<'a>(el: &'a XmlElement, local: &str) -> Option<&'a str> {
    el.attrs
        .iter()
        .find(|a| a.local == local && (a.ns == ns::R || a.ns == ns::R_STRICT))
        .map(|a| a.value.as_str())
}

/// Interpret an on/off value; a missing value means on.
pub fn on_off(value: Option<&str>) -> bool {
    !matches!(value, Some("0") | Some("false") | Some("off"))
}

/// Toggle property carried by a child element, `None` when the child is absent.
pub(crate) fn child_on_off(el: &XmlElement, local: &str) -> Option<bool> {
    w_child(el, local).map(|c| on_off(w_val(c)))
}

/// Parse a numeric attribute, tolerating a trailing unit or fraction.
pub(crate) fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    value.parse::<f64>().ok().map(|f| f.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> XmlElement {
        XmlElement::parse_str(xml).unwrap()
    }

    #[test]
    fn test_registry_covers_both_wml_namespaces() {
        let transitional = parse(r#"<w:p xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#);
        let strict = parse(r#"<w:p xmlns:w="http://purl.oclc.org/ooxml/wordprocessingml/main"/>"#);
        assert_eq!(kind_of(&transitional), Some(ElementKind::Paragraph));
        assert_eq!(kind_of(&strict), Some(ElementKind::Paragraph));
        assert!(matches!(bind(&strict), Node::Paragraph(_)));
    }

    #[test]
    fn test_unregistered_is_untyped() {
        let el = parse(r#"<w:customXml xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#);
        assert!(matches!(bind(&el), Node::Untyped(_)));
        assert_eq!(bind(&el).kind(), None);

        let foreign = parse(r#"<p xmlns="urn:other"/>"#);
        assert!(matches!(bind(&foreign), Node::Untyped(_)));
    }

    #[test]
    fn test_spacing_discriminated_by_parent() {
        let ppr = parse(
            r#"<w:pPr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:spacing w:before="120" w:after="240" w:line="360" w:lineRule="auto"/></w:pPr>"#,
        );
        let spacing = ppr.elements().next().unwrap();
        match bind_child(&ppr, spacing) {
            Node::Spacing(s) => {
                assert_eq!(s.context(), SpacingContext::Paragraph);
                assert_eq!(s.before(), Some(120));
                assert_eq!(s.line(), Some(360));
            }
            other => panic!("unexpected {:?}", other),
        }

        let rpr = parse(
            r#"<w:rPr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:spacing w:val="-20"/></w:rPr>"#,
        );
        let spacing = rpr.elements().next().unwrap();
        match bind_child(&rpr, spacing) {
            Node::Spacing(s) => {
                assert_eq!(s.context(), SpacingContext::Run);
                assert_eq!(s.character_spacing(), Some(-20));
                assert_eq!(s.before(), None);
            }
            other => panic!("unexpected {:?}", other),
        }

        // Without a parent the attributes decide
        assert_eq!(
            SpacingContext::from_attrs(spacing),
            SpacingContext::Run
        );
    }

    #[test]
    fn test_on_off() {
        assert!(on_off(None));
        assert!(on_off(Some("1")));
        assert!(on_off(Some("true")));
        assert!(!on_off(Some("0")));
        assert!(!on_off(Some("false")));
    }
}
