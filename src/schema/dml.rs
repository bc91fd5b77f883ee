//! DrawingML wrappers reached from `w:drawing`.

use super::r_attr;
use crate::opc::constants::namespace as ns;
use crate::xml::XmlElement;

/// Where a drawing sits: exactly one of inline or floating.
#[derive(Debug, Clone, Copy)]
pub enum Placement<'a> {
    Inline(Inline<'a>),
    Anchor(Anchor<'a>),
}

impl<'a> Placement<'a> {
    fn element(&self) -> &'a XmlElement {
        match self {
            Placement::Inline(i) => i.element(),
            Placement::Anchor(a) => a.element(),
        }
    }

    /// Size in EMUs (`wp:extent`).
    pub fn extent(&self) -> Option<(i64, i64)> {
        extent_of(self.element())
    }

    /// `wp:docPr/@name`
    pub fn name(&self) -> Option<&'a str> {
        doc_pr(self.element()).and_then(|d| d.attr("", "name"))
    }

    /// `wp:docPr/@descr`, the alt text.
    pub fn description(&self) -> Option<&'a str> {
        doc_pr(self.element()).and_then(|d| d.attr("", "descr"))
    }

    /// `a:graphic`
    pub fn graphic(&self) -> Option<Graphic<'a>> {
        self.element().child(ns::A, "graphic").map(Graphic::new)
    }
}

fn extent_of(el: &XmlElement) -> Option<(i64, i64)> {
    let extent = el.child(ns::WP, "extent")?;
    let cx = extent.attr("", "cx")?.parse().ok()?;
    let cy = extent.attr("", "cy")?.parse().ok()?;
    Some((cx, cy))
}

fn doc_pr(el: &XmlElement) -> Option<&XmlElement> {
    el.child(ns::WP, "docPr")
}

wrapper!(
    /// `wp:inline`
    Inline
);

impl Inline<'_> {
    /// Size in EMUs.
    pub fn extent(&self) -> Option<(i64, i64)> {
        extent_of(self.el)
    }
}

wrapper!(
    /// `wp:anchor`
    Anchor
);

impl Anchor<'_> {
    /// Size in EMUs.
    pub fn extent(&self) -> Option<(i64, i64)> {
        extent_of(self.el)
    }

    /// `@behindDoc`
    pub fn behind_text(&self) -> bool {
        matches!(self.el.attr("", "behindDoc"), Some("1") | Some("true"))
    }
}

/// Optional choice inside `a:graphicData`.
#[derive(Debug, Clone, Copy)]
pub enum GraphicContent<'a> {
    Picture(Picture<'a>),
    Chart(ChartRef<'a>),
    Other(&'a XmlElement),
}

/// `a:graphic` or `a:graphicData`, with its content resolved on construction.
#[derive(Debug, Clone, Copy)]
pub struct Graphic<'a> {
    el: &'a XmlElement,
    content: Option<GraphicContent<'a>>,
}

impl<'a> Graphic<'a> {
    pub fn new(el: &'a XmlElement) -> Self {
        let data = if el.is(ns::A, "graphicData") {
            Some(el)
        } else {
            el.child(ns::A, "graphicData")
        };
        let content = data.and_then(|d| d.elements().next()).map(|c| {
            if c.is(ns::PIC, "pic") {
                GraphicContent::Picture(Picture::new(c))
            } else if c.is(ns::C, "chart") {
                GraphicContent::Chart(ChartRef::new(c))
            } else {
                GraphicContent::Other(c)
            }
        });
        Self { el, content }
    }

    pub fn element(&self) -> &'a XmlElement {
        self.el
    }

    /// `a:graphicData/@uri`
    pub fn uri(&self) -> Option<&'a str> {
        if self.el.local == "graphicData" {
            self.el.attr("", "uri")
        } else {
            self.el
                .child(ns::A, "graphicData")
                .and_then(|d| d.attr("", "uri"))
        }
    }

    pub fn content(&self) -> Option<GraphicContent<'a>> {
        self.content
    }

    /// The picture, when that is what the graphic holds.
    pub fn picture(&self) -> Option<Picture<'a>> {
        match self.content {
            Some(GraphicContent::Picture(p)) => Some(p),
            _ => None,
        }
    }
}

wrapper!(
    /// `pic:pic`
    Picture
);

impl<'a> Picture<'a> {
    /// `pic:blipFill/a:blip`
    pub fn blip(&self) -> Option<Blip<'a>> {
        self.el
            .child(ns::PIC, "blipFill")
            .and_then(|f| f.child(ns::A, "blip"))
            .map(Blip::new)
    }

    /// `pic:nvPicPr/pic:cNvPr/@name`
    pub fn name(&self) -> Option<&'a str> {
        self.el
            .child(ns::PIC, "nvPicPr")
            .and_then(|n| n.child(ns::PIC, "cNvPr"))
            .and_then(|c| c.attr("", "name"))
    }
}

wrapper!(
    /// `a:blip`
    Blip
);

impl<'a> Blip<'a> {
    /// `r:embed`: relationship to an image part.
    pub fn embed(&self) -> Option<&'a str> {
        r_attr(self.el, "embed")
    }

    /// `r:link`: relationship to an external image.
    pub fn link(&self) -> Option<&'a str> {
        r_attr(self.el, "link")
    }
}

wrapper!(
    /// `c:chart` reference inside a graphic
    ChartRef
);

impl<'a> ChartRef<'a> {
    pub fn r_id(&self) -> Option<&'a str> {
        r_attr(self.el, "id")
    }
}
