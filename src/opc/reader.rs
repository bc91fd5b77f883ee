//! Relationship graph loader.
//!
//! Walks the package's relationship graph depth-first from the root
//! descriptor and yields every reachable part once, with its blob and its
//! still-unwired relationships. Cycles and shared targets terminate on the
//! visited set.

use crate::container::{Container, ContentTypeMap};
use crate::error::{Error, Result};
use crate::opc::constants::{content_type as ct, relationship_type as rt};
use crate::opc::packuri::PackURI;
use crate::opc::rel::{parse_rels_xml, SerializedRelationship};
use crate::options::PackageOptions;
use std::collections::HashSet;

/// A part as loaded from the container, before it is turned into a [`Part`].
///
/// [`Part`]: crate::opc::part::Part
#[derive(Debug)]
pub struct SerializedPart {
    /// The partname of this part
    pub partname: PackURI,
    /// Content type from the content-types map
    pub content_type: String,
    /// Type of the first relationship that reached this part
    pub reltype: String,
    /// Raw bytes
    pub blob: Vec<u8>,
    /// Outgoing relationships, unwired
    pub srels: Vec<SerializedRelationship>,
    /// Nesting ceiling applied when the blob is parsed as XML
    pub max_depth: usize,
}

/// Everything the factory needs to assemble a package.
#[derive(Debug)]
pub struct PackageReader {
    pkg_srels: Vec<SerializedRelationship>,
    sparts: Vec<SerializedPart>,
}

impl PackageReader {
    /// Load the relationship graph reachable from the package root.
    ///
    /// The content-types descriptor and the root relationship descriptor are
    /// both required; every other defect narrows to the affected part.
    pub fn from_container(container: &Container, options: &PackageOptions) -> Result<Self> {
        let content_types = container.content_types()?;

        let root = PackURI::package();
        let root_rels = container
            .rels_blob_for(&root)?
            .ok_or_else(|| Error::MissingComponent("_rels/.rels".to_string()))?;
        let pkg_srels = parse_rels_xml(Some(&root_rels), root.base_uri())?;

        let mut walker = Walker {
            container,
            content_types: &content_types,
            options,
            visited: HashSet::new(),
            sparts: Vec::new(),
        };
        walker.walk(&pkg_srels)?;

        log::debug!(
            "loaded {} parts from {} root relationships",
            walker.sparts.len(),
            pkg_srels.len()
        );
        let sparts = walker.sparts;
        Ok(Self { pkg_srels, sparts })
    }

    /// Package-level relationships.
    pub fn pkg_srels(&self) -> &[SerializedRelationship] {
        &self.pkg_srels
    }

    /// Every reachable part, in discovery order.
    pub fn sparts(&self) -> &[SerializedPart] {
        &self.sparts
    }

    /// Split into root relationships and parts.
    pub fn into_parts(self) -> (Vec<SerializedRelationship>, Vec<SerializedPart>) {
        (self.pkg_srels, self.sparts)
    }
}

struct Walker<'a> {
    container: &'a Container,
    content_types: &'a ContentTypeMap,
    options: &'a PackageOptions,
    visited: HashSet<PackURI>,
    sparts: Vec<SerializedPart>,
}

impl Walker<'_> {
    fn walk(&mut self, root_srels: &[SerializedRelationship]) -> Result<()> {
        let mut pending = vec![root_srels.to_vec().into_iter()];

        while let Some(frontier) = pending.last_mut() {
            let Some(srel) = frontier.next() else {
                pending.pop();
                continue;
            };
            if srel.is_external() {
                continue;
            }
            let partname = match srel.target_partname() {
                Ok(partname) => partname,
                Err(e) => {
                    log::debug!("skipping relationship {}: {}", srel.r_id, e);
                    continue;
                }
            };
            if !self.visited.insert(partname.clone()) {
                continue;
            }
            if !self.container.contains(&partname) {
                log::debug!(
                    "relationship {} targets {}, which is not in the archive",
                    srel.r_id,
                    partname
                );
                continue;
            }
            if self.sparts.len() >= self.options.max_parts {
                return Err(Error::InvalidData(format!(
                    "package has more than {} parts",
                    self.options.max_parts
                )));
            }

            let content_type = self.content_type_for(&partname, &srel.reltype)?;
            let blob = match self.container.blob_for(&partname) {
                Ok(blob) => blob,
                Err(e) if is_required(&srel.reltype) => return Err(e),
                Err(e) => {
                    log::warn!("dropping {}: {}", partname, e);
                    continue;
                }
            };
            let part_srels = self.part_srels(&partname);

            pending.push(part_srels.clone().into_iter());
            self.sparts.push(SerializedPart {
                partname,
                content_type,
                reltype: srel.reltype,
                blob,
                srels: part_srels,
                max_depth: self.options.max_depth,
            });
        }
        Ok(())
    }

    /// Outgoing relationships of a part; an unreadable descriptor counts as none.
    fn part_srels(&self, partname: &PackURI) -> Vec<SerializedRelationship> {
        let srels = self
            .container
            .rels_blob_for(partname)
            .and_then(|blob| parse_rels_xml(blob.as_deref(), partname.base_uri()));
        match srels {
            Ok(srels) => srels,
            Err(e) => {
                log::warn!("ignoring relationships of {}: {}", partname, e);
                Vec::new()
            }
        }
    }

    fn content_type_for(&self, partname: &PackURI, reltype: &str) -> Result<String> {
        match self.content_types.get(partname) {
            Ok(found) => Ok(found.to_string()),
            Err(e) if is_required(reltype) || self.options.strict_content_types => Err(e),
            Err(_) => {
                log::warn!("no content type for {}, treating as opaque", partname);
                Ok(ct::OPAQUE.to_string())
            }
        }
    }
}

/// Parts without which the package cannot be interpreted.
fn is_required(reltype: &str) -> bool {
    rt::matches(reltype, rt::OFFICE_DOCUMENT)
}
