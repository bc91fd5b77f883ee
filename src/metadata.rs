//! Core document properties (`docProps/core.xml`).

use crate::error::Result;
use crate::opc::constants::{namespace as ns, relationship_type as rt};
use crate::opc::Package;
use crate::xml::XmlElement;
use serde::Serialize;

/// Dublin Core and OPC core properties of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoreProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Document author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Creation date (W3CDTF, as written)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Last modification date (W3CDTF, as written)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CoreProperties {
    /// Read the core-properties part reachable from the package root.
    ///
    /// A package without one yields empty properties.
    pub fn from_package(package: &Package) -> Result<Self> {
        let Ok(id) = package.part_by_reltype(rt::CORE_PROPERTIES) else {
            return Ok(Self::default());
        };
        let root = package.part(id).root()?;
        Ok(Self::from_element(root))
    }

    /// Read a `cp:coreProperties` element.
    pub fn from_element(root: &XmlElement) -> Self {
        let text = |namespace: &str, local: &str| {
            root.child(namespace, local)
                .map(|el| el.text().trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            title: text(ns::DC, "title"),
            subject: text(ns::DC, "subject"),
            creator: text(ns::DC, "creator"),
            keywords: text(ns::CP, "keywords"),
            description: text(ns::DC, "description"),
            last_modified_by: text(ns::CP, "lastModifiedBy"),
            revision: text(ns::CP, "revision"),
            created: text(ns::DCTERMS, "created"),
            modified: text(ns::DCTERMS, "modified"),
            category: text(ns::CP, "category"),
        }
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
