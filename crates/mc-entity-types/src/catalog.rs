//! Immutable per-version kind catalogs.

use std::borrow::Cow;
use std::slice;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::kind::{Kind, KindDef, KindId, ProtocolVersion, UNASSIGNED_WIRE_ID, VersionDefinition};
use crate::{Error, Result};

/// All kinds of one protocol version, indexed by wire id and by name.
///
/// Catalogs are only ever produced by [`CatalogBuilder::build`] and never
/// change afterwards.
#[derive(Debug)]
pub struct Catalog {
    version: ProtocolVersion,
    kinds: Vec<Kind>,
    by_wire_id: FxHashMap<i32, KindId>,
    by_name: FxHashMap<Cow<'static, str>, KindId>,
    fallback: Option<KindId>,
}

impl Catalog {
    #[must_use]
    pub fn builder(version: ProtocolVersion) -> CatalogBuilder {
        CatalogBuilder {
            version,
            fallback: None,
            defs: Vec::new(),
        }
    }

    pub fn from_definition(def: &VersionDefinition) -> Result<Self> {
        let mut builder = Self::builder(def.version).kinds(def.kinds.iter().cloned());
        builder.fallback.clone_from(&def.fallback);
        builder.build()
    }

    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    #[inline]
    #[must_use]
    pub fn lookup_by_id(&self, wire_id: i32) -> Option<&Kind> {
        self.by_wire_id.get(&wire_id).map(|&id| self.kind(id))
    }

    #[inline]
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<&Kind> {
        self.by_name.get(name).map(|&id| self.kind(id))
    }

    /// Panics if `id` was issued by another catalog with more kinds.
    #[inline]
    #[must_use]
    pub fn kind(&self, id: KindId) -> &Kind {
        &self.kinds[id.index()]
    }

    #[must_use]
    pub fn get(&self, id: KindId) -> Option<&Kind> {
        self.kinds.get(id.index())
    }

    /// Whether `kind` is this catalog's own record (same version and slot).
    #[must_use]
    pub fn owns(&self, kind: &Kind) -> bool {
        kind.version == self.version
            && self
                .get(kind.id)
                .is_some_and(|own| own.name == kind.name)
    }

    #[must_use]
    pub fn parent(&self, kind: &Kind) -> Option<&Kind> {
        kind.parent.map(|p| self.kind(p))
    }

    /// Kind substituted for unknown wire ids.
    #[must_use]
    pub fn fallback(&self) -> Option<&Kind> {
        self.fallback.map(|id| self.kind(id))
    }

    /// Every kind in registration order. Call again to restart.
    pub fn all(&self) -> slice::Iter<'_, Kind> {
        self.kinds.iter()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Kind> + Clone {
        self.kinds.iter().filter(|k| k.is_root())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Compare two versions by logical name.
    #[must_use]
    pub fn diff<'a>(&'a self, newer: &'a Catalog) -> CatalogDiff<'a> {
        let mut diff = CatalogDiff::default();
        for kind in self.all() {
            match newer.lookup_by_name(&kind.name) {
                None => diff.removed.push(kind),
                Some(other) if other.wire_id != kind.wire_id => {
                    diff.renumbered.push((kind, other));
                }
                Some(_) => {}
            }
        }
        diff.added = newer
            .all()
            .filter(|k| self.lookup_by_name(&k.name).is_none())
            .collect();
        diff
    }
}

/// Name-level differences between two catalogs.
#[derive(Debug, Default)]
pub struct CatalogDiff<'a> {
    /// Present only in the newer catalog.
    pub added: Vec<&'a Kind>,
    /// Present only in the older catalog.
    pub removed: Vec<&'a Kind>,
    /// Same name, different wire id: `(older, newer)`.
    pub renumbered: Vec<(&'a Kind, &'a Kind)>,
}

impl CatalogDiff<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.renumbered.is_empty()
    }
}

/// Collects kind definitions for one version and validates them in [`build`](Self::build).
#[derive(Debug)]
pub struct CatalogBuilder {
    version: ProtocolVersion,
    fallback: Option<Cow<'static, str>>,
    defs: Vec<KindDef>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    InProgress,
    Done,
}

impl CatalogBuilder {
    /// Designate the kind returned for unknown wire ids. It must be a root.
    #[must_use]
    pub fn fallback(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.fallback = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, def: KindDef) -> Self {
        self.defs.push(def);
        self
    }

    #[must_use]
    pub fn kinds(mut self, defs: impl IntoIterator<Item = KindDef>) -> Self {
        self.defs.extend(defs);
        self
    }

    pub fn build(self) -> Result<Catalog> {
        let version = self.version;
        let mut kinds: Vec<Kind> = Vec::with_capacity(self.defs.len());
        let mut by_name: FxHashMap<Cow<'static, str>, KindId> = FxHashMap::default();
        let mut by_wire_id: FxHashMap<i32, KindId> = FxHashMap::default();
        let mut parent_names = Vec::with_capacity(self.defs.len());

        for (index, def) in self.defs.into_iter().enumerate() {
            let id = KindId(index as u32);
            if by_name.insert(def.name.clone(), id).is_some() {
                return Err(Error::DuplicateKindName {
                    version,
                    name: def.name.into_owned(),
                });
            }

            let wire_id = match def.id {
                UNASSIGNED_WIRE_ID => None,
                n if n < 0 => {
                    return Err(Error::InvalidWireId {
                        version,
                        kind: def.name.into_owned(),
                        wire_id: n,
                    });
                }
                n => Some(n),
            };

            if let Some(wire_id) = wire_id {
                if let Some(&first) = by_wire_id.get(&wire_id) {
                    let first = &kinds[first.index()];
                    return Err(Error::DuplicateWireId {
                        version,
                        wire_id,
                        first: first.name.to_string(),
                        second: def.name.into_owned(),
                    });
                }
                by_wire_id.insert(wire_id, id);
            }

            parent_names.push(def.parent);
            kinds.push(Kind {
                id,
                version,
                name: def.name,
                wire_id,
                parent: None,
            });
        }

        // Parents may be declared after their children, so link in a second pass.
        for (kind, parent) in kinds.iter_mut().zip(parent_names) {
            let Some(parent) = parent else { continue };
            let Some(&pid) = by_name.get(&parent) else {
                return Err(Error::UnknownParent {
                    version,
                    kind: kind.name.to_string(),
                    parent: parent.into_owned(),
                });
            };
            kind.parent = Some(pid);
        }

        check_acyclic(version, &kinds)?;

        let fallback = match self.fallback {
            None => None,
            Some(name) => {
                let Some(&id) = by_name.get(&name) else {
                    return Err(Error::UnknownFallback {
                        version,
                        name: name.into_owned(),
                    });
                };
                if !kinds[id.index()].is_root() {
                    return Err(Error::FallbackNotRoot {
                        version,
                        name: name.into_owned(),
                    });
                }
                Some(id)
            }
        };

        Ok(Catalog {
            version,
            kinds,
            by_wire_id,
            by_name,
            fallback,
        })
    }
}

fn check_acyclic(version: ProtocolVersion, kinds: &[Kind]) -> Result<()> {
    let mut visit = vec![Visit::Unseen; kinds.len()];
    let mut path: SmallVec<[usize; 16]> = SmallVec::new();

    for start in 0..kinds.len() {
        let mut cur = Some(start);
        while let Some(i) = cur {
            match visit[i] {
                Visit::Done => break,
                Visit::InProgress => {
                    return Err(Error::CyclicParent {
                        version,
                        kind: kinds[i].name.to_string(),
                    });
                }
                Visit::Unseen => {
                    visit[i] = Visit::InProgress;
                    path.push(i);
                    cur = kinds[i].parent.map(KindId::index);
                }
            }
        }
        for i in path.drain(..) {
            visit[i] = Visit::Done;
        }
    }
    Ok(())
}
