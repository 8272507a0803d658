//! Process-wide registry of supported protocol versions.
//!
//! Registration builds everything for a version (catalog, resolver, ancestry
//! index) plus a fresh crosswalk, and only then publishes a new snapshot.
//! Readers load the current snapshot without locking; a failed registration
//! leaves the published snapshot as it was.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::ancestry::{AncestryIndex, KnownKinds};
use crate::crosswalk::VersionCrosswalk;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::kind::{Kind, KindId, ProtocolVersion, VersionDefinition};
use crate::resolver::{Resolution, TypeResolver};
use crate::{Catalog, Error, Result};

/// Everything built for one protocol version.
#[derive(Debug)]
pub struct VersionEntry {
    name: String,
    resolver: TypeResolver,
    ancestry: AncestryIndex,
}

impl VersionEntry {
    fn build(def: &VersionDefinition, sink: Arc<dyn DiagnosticSink>) -> Result<Self> {
        let catalog = Arc::new(Catalog::from_definition(def)?);
        let ancestry = AncestryIndex::build(&catalog);
        Ok(Self {
            name: def.name.to_string(),
            resolver: TypeResolver::new(catalog, sink),
            ancestry,
        })
    }

    /// Game version name, e.g. `"1.16.2"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.resolver.catalog()
    }

    #[must_use]
    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    #[must_use]
    pub fn ancestry(&self) -> &AncestryIndex {
        &self.ancestry
    }
}

/// An immutable view of all registered versions.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    entries: FxHashMap<ProtocolVersion, Arc<VersionEntry>>,
    crosswalk: VersionCrosswalk,
}

impl RegistrySnapshot {
    fn with_entry(&self, version: ProtocolVersion, entry: Arc<VersionEntry>) -> Result<Self> {
        let mut entries = self.entries.clone();
        entries.insert(version, entry);

        // Crosswalk tables need a last-resort target in every version.
        if entries.len() > 1 {
            let mut bare: Vec<_> = entries
                .iter()
                .filter(|(_, e)| e.catalog().fallback().is_none())
                .map(|(&v, _)| v)
                .collect();
            bare.sort_unstable();
            if let Some(&version) = bare.first() {
                return Err(Error::MissingFallback { version });
            }
        }

        let pairs: Vec<_> = entries
            .values()
            .map(|e| (e.catalog(), e.ancestry()))
            .collect();
        let crosswalk = VersionCrosswalk::build(&pairs)?;
        Ok(Self { entries, crosswalk })
    }

    /// Registered versions, ascending.
    #[must_use]
    pub fn versions(&self) -> &[ProtocolVersion] {
        self.crosswalk.versions()
    }

    #[must_use]
    pub fn entry(&self, version: ProtocolVersion) -> Option<&Arc<VersionEntry>> {
        self.entries.get(&version)
    }

    fn get(&self, version: ProtocolVersion) -> Result<&VersionEntry> {
        self.entries
            .get(&version)
            .map(|entry| &**entry)
            .ok_or(Error::UnsupportedVersion(version))
    }

    pub fn catalog(&self, version: ProtocolVersion) -> Result<&Catalog> {
        Ok(self.get(version)?.catalog())
    }

    /// Kind for a wire id seen in a packet of `version`.
    pub fn resolve(&self, version: ProtocolVersion, wire_id: i32) -> Result<&Kind> {
        self.get(version)?.resolver.resolve(wire_id)
    }

    pub fn resolve_detailed(
        &self,
        version: ProtocolVersion,
        wire_id: i32,
    ) -> Result<Resolution<'_>> {
        self.get(version)?.resolver.resolve_detailed(wire_id)
    }

    /// The kind of `to` that corresponds to `kind` of `from`.
    pub fn translate(
        &self,
        kind: &Kind,
        from: ProtocolVersion,
        to: ProtocolVersion,
    ) -> Result<&Kind> {
        let source = self.get(from)?;
        if !source.catalog().owns(kind) {
            return Err(Error::VersionMismatch {
                kind: kind.name().to_owned(),
                expected: from,
            });
        }
        let target = self.get(to)?;
        let id = self.crosswalk.translate(kind.id(), from, to)?;
        Ok(target.catalog().kind(id))
    }

    /// Whether `kind` is `ancestor` or descends from it. Kinds of different
    /// versions are never related.
    #[must_use]
    pub fn is_descendant_of(&self, kind: &Kind, ancestor: &Kind) -> bool {
        kind.version() == ancestor.version()
            && self.get(kind.version()).is_ok_and(|entry| {
                entry.catalog().owns(kind)
                    && entry.catalog().owns(ancestor)
                    && entry.ancestry.is_descendant_of(kind.id(), ancestor.id())
            })
    }

    pub fn nearest_known_ancestor<K>(&self, kind: &Kind, known: &K) -> Result<&Kind>
    where
        K: KnownKinds + ?Sized,
    {
        let entry = self.get(kind.version())?;
        if !entry.catalog().owns(kind) {
            return Err(Error::VersionMismatch {
                kind: kind.name().to_owned(),
                expected: kind.version(),
            });
        }
        let id: KindId = entry.ancestry.nearest_known_ancestor(kind, known)?;
        Ok(entry.catalog().kind(id))
    }
}

/// Registry of protocol versions shared by all connections.
pub struct ProtocolRegistry {
    current: ArcSwap<RegistrySnapshot>,
    sink: Arc<dyn DiagnosticSink>,
    writer: Mutex<()>,
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl ProtocolRegistry {
    #[must_use]
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            current: ArcSwap::from_pointee(RegistrySnapshot::default()),
            sink,
            writer: Mutex::new(()),
        }
    }

    /// Build and publish a version. Replaces an earlier registration of the
    /// same version number.
    pub fn register(&self, def: &VersionDefinition) -> Result<()> {
        let _guard = self.writer.lock();

        let published = self.build_snapshot(def).inspect_err(|err| {
            warn!("{} ({}) not registered: {}", def.version, def.name, err);
        })?;
        let kinds = published
            .entry(def.version)
            .map_or(0, |e| e.catalog().len());
        self.current.store(Arc::new(published));

        info!("registered {} ({}) with {} kinds", def.version, def.name, kinds);
        Ok(())
    }

    pub fn register_json(&self, json: &str) -> Result<()> {
        let def = VersionDefinition::from_json(json)?;
        self.register(&def)
    }

    fn build_snapshot(&self, def: &VersionDefinition) -> Result<RegistrySnapshot> {
        let entry = Arc::new(VersionEntry::build(def, self.sink.clone())?);
        self.current.load().with_entry(def.version, entry)
    }

    /// The currently published snapshot. Hold it for the duration of one
    /// packet so all lookups see the same set of versions.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.load_full()
    }

    #[must_use]
    pub fn is_supported(&self, version: ProtocolVersion) -> bool {
        self.current.load().entries.contains_key(&version)
    }
}

impl fmt::Debug for ProtocolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolRegistry")
            .field("versions", &self.current.load().versions())
            .finish_non_exhaustive()
    }
}
