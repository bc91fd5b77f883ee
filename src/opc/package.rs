//! Package assembly.
//!
//! The package owns every part in a single arena. Relationships hold
//! [`PartId`] handles into that arena, so dropping the package frees all
//! parts at once whatever cycles the relationship graph contains.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::opc::constants::relationship_type as rt;
use crate::opc::packuri::PackURI;
use crate::opc::part::{Part, PartFactory, PartId};
use crate::opc::reader::PackageReader;
use crate::opc::rel::{RelTarget, Relationship, Relationships, SerializedRelationship};
use crate::options::PackageOptions;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// An assembled OOXML package.
#[derive(Debug)]
pub struct Package {
    parts: Vec<Part>,
    index: HashMap<PackURI, PartId>,
    rels: Relationships,
}

impl Package {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docweave::opc::Package;
    ///
    /// let package = Package::open("report.docx")?;
    /// for (_, part) in package.iter_parts() {
    ///     println!("{} {}", part.partname(), part.content_type());
    /// }
    /// # Ok::<(), docweave::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, &PackageOptions::default())
    }

    /// Open a package from a file path with explicit options.
    pub fn open_with_options(path: impl AsRef<Path>, options: &PackageOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(data, options)
    }

    /// Load a package from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_options(data, &PackageOptions::default())
    }

    /// Load a package from bytes with explicit options.
    pub fn from_bytes_with_options(data: Vec<u8>, options: &PackageOptions) -> Result<Self> {
        let container = Container::from_bytes_with_options(data, options)?;
        Self::from_container(&container, options)
    }

    /// Load a package from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Walk the container's relationship graph and assemble the arena.
    pub fn from_container(container: &Container, options: &PackageOptions) -> Result<Self> {
        let reader = PackageReader::from_container(container, options)?;
        Ok(Self::assemble(reader))
    }

    fn assemble(reader: PackageReader) -> Self {
        let (pkg_srels, sparts) = reader.into_parts();

        // Pass 1: every part, no edges
        let mut parts = Vec::with_capacity(sparts.len());
        let mut pending = Vec::with_capacity(sparts.len());
        let mut index = HashMap::with_capacity(sparts.len());
        for mut spart in sparts {
            let id = PartId(parts.len());
            index.insert(spart.partname.clone(), id);
            pending.push(std::mem::take(&mut spart.srels));
            parts.push(PartFactory::load(spart));
        }

        // Pass 2: edges, as handles into the arena
        let rels = wire(&pkg_srels, &index);
        for (part, srels) in parts.iter_mut().zip(&pending) {
            *part.rels_mut() = wire(srels, &index);
        }

        let content_types: Vec<String> = parts.iter().map(|p| p.content_type().to_string()).collect();
        for part in &mut parts {
            part.after_assembly(&content_types);
        }

        Self { parts, index, rels }
    }

    /// Package-level relationships.
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// A part by handle.
    ///
    /// Handles are only produced by this package, so they are always valid.
    pub fn part(&self, id: PartId) -> &Part {
        &self.parts[id.0]
    }

    /// Look up a part by name.
    pub fn part_by_name(&self, partname: &PackURI) -> Option<PartId> {
        self.index.get(partname).copied()
    }

    /// Iterate parts in discovery order.
    pub fn iter_parts(&self) -> impl Iterator<Item = (PartId, &Part)> {
        self.parts.iter().enumerate().map(|(i, part)| (PartId(i), part))
    }

    /// Number of parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Relationships of a part, or of the package when `source` is `None`.
    pub fn rels_of(&self, source: Option<PartId>) -> &Relationships {
        match source {
            Some(id) => self.part(id).rels(),
            None => &self.rels,
        }
    }

    /// Follow a relationship id from a source part to an internal target.
    pub fn related_part(&self, source: Option<PartId>, r_id: &str) -> Result<PartId> {
        let rel = self
            .rels_of(source)
            .get(r_id)
            .ok_or_else(|| Error::RelationshipNotFound(r_id.to_string()))?;
        rel.target_part().ok_or_else(|| {
            Error::PartNotFound(format!("{} targets external {}", r_id, rel.target_ref()))
        })
    }

    /// The package-level part with the given relationship type.
    pub fn part_by_reltype(&self, reltype: &str) -> Result<PartId> {
        self.rels
            .iter()
            .filter(|rel| rt::matches(rel.reltype(), reltype))
            .find_map(Relationship::target_part)
            .ok_or_else(|| Error::PartNotFound(format!("no part for relationship type {}", reltype)))
    }

    /// The main document part (officeDocument target).
    pub fn main_document(&self) -> Result<PartId> {
        self.part_by_reltype(rt::OFFICE_DOCUMENT)
    }
}

fn wire(srels: &[SerializedRelationship], index: &HashMap<PackURI, PartId>) -> Relationships {
    let mut rels = Relationships::new();
    for srel in srels {
        let target = if srel.is_external() {
            RelTarget::External(srel.target_ref.clone())
        } else {
            match srel.target_partname().ok().and_then(|name| index.get(&name).copied()) {
                Some(id) => RelTarget::Internal(id),
                None => {
                    log::debug!(
                        "dropping relationship {} from {}: target {} is not in the package",
                        srel.r_id,
                        srel.base_uri,
                        srel.target_ref
                    );
                    continue;
                }
            }
        };
        rels.add(Relationship::new(
            srel.r_id.clone(),
            srel.reltype.clone(),
            srel.target_ref.clone(),
            target,
        ));
    }
    rels
}
