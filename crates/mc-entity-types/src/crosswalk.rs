//! Cross-version kind translation.
//!
//! Kinds are joined across versions by logical name. A kind missing from the
//! target version maps to its nearest ancestor that the target still knows, and
//! failing that to the target's fallback kind.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ancestry::AncestryIndex;
use crate::kind::{KindId, ProtocolVersion};
use crate::{Catalog, Error, Result};

#[derive(Debug, Default)]
pub struct VersionCrosswalk {
    /// `(from, to)` -> target kind, indexed by source kind.
    tables: FxHashMap<(ProtocolVersion, ProtocolVersion), Box<[KindId]>>,
    versions: Vec<ProtocolVersion>,
}

impl VersionCrosswalk {
    /// Precompute tables for every ordered pair of distinct versions.
    pub fn build(versions: &[(&Catalog, &AncestryIndex)]) -> Result<Self> {
        let mut tables = FxHashMap::default();
        for &(from, index) in versions {
            for &(to, _) in versions {
                if from.version() == to.version() {
                    continue;
                }
                let table = pair_table(from, index, to)?;
                tables.insert((from.version(), to.version()), table);
            }
        }

        let mut versions: Vec<_> = versions.iter().map(|(c, _)| c.version()).collect();
        versions.sort_unstable();
        versions.dedup();
        Ok(Self { tables, versions })
    }

    #[must_use]
    pub fn versions(&self) -> &[ProtocolVersion] {
        &self.versions
    }

    /// The kind in `to` corresponding to `kind` of `from`.
    ///
    /// # Panics
    ///
    /// If `kind` was not issued by the catalog registered for `from`.
    pub fn translate(
        &self,
        kind: KindId,
        from: ProtocolVersion,
        to: ProtocolVersion,
    ) -> Result<KindId> {
        if from == to {
            return Ok(kind);
        }
        let table = self
            .tables
            .get(&(from, to))
            .ok_or_else(|| Error::UnsupportedVersion(self.missing(from, to)))?;
        Ok(table[kind.index()])
    }

    fn missing(&self, from: ProtocolVersion, to: ProtocolVersion) -> ProtocolVersion {
        if self.versions.binary_search(&from).is_ok() {
            to
        } else {
            from
        }
    }
}

fn pair_table(from: &Catalog, index: &AncestryIndex, to: &Catalog) -> Result<Box<[KindId]>> {
    from.all()
        .map(|kind| {
            if let Some(same) = to.lookup_by_name(kind.name()) {
                return Ok(same.id());
            }

            let mapped = index
                .nearest_matching(kind.id(), |id| {
                    to.lookup_by_name(from.kind(id).name()).is_some()
                })
                .and_then(|id| to.lookup_by_name(from.kind(id).name()))
                .or_else(|| to.fallback())
                .ok_or_else(|| Error::NoMatchingRule {
                    version: to.version(),
                    kind: kind.name().to_owned(),
                })?;

            debug!(
                "{} {} has no counterpart in {}, using {}",
                from.version(),
                kind.name(),
                to.version(),
                mapped.name()
            );
            Ok(mapped.id())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::KindDef;

    const OLD: ProtocolVersion = ProtocolVersion(736);
    const NEW: ProtocolVersion = ProtocolVersion(751);

    fn old() -> Catalog {
        Catalog::builder(OLD)
            .fallback("ENTITY")
            .kind(KindDef::root("ENTITY", -1))
            .kind(KindDef::new("ABSTRACT_MONSTER", -1, "ENTITY"))
            .kind(KindDef::new("ABSTRACT_PIGLIN", -1, "ABSTRACT_MONSTER"))
            .kind(KindDef::new("PIGLIN", 60, "ABSTRACT_PIGLIN"))
            .kind(KindDef::new("PILLAGER", 61, "ABSTRACT_MONSTER"))
            .build()
            .unwrap()
    }

    fn new() -> Catalog {
        Catalog::builder(NEW)
            .fallback("ENTITY")
            .kind(KindDef::root("ENTITY", -1))
            .kind(KindDef::new("ABSTRACT_MONSTER", -1, "ENTITY"))
            .kind(KindDef::new("ABSTRACT_PIGLIN", -1, "ABSTRACT_MONSTER"))
            .kind(KindDef::new("PIGLIN", 60, "ABSTRACT_PIGLIN"))
            .kind(KindDef::new("PIGLIN_BRUTE", 61, "ABSTRACT_PIGLIN"))
            .kind(KindDef::new("PILLAGER", 62, "ABSTRACT_MONSTER"))
            .kind(KindDef::new("STRANGER", 200, "ENTITY"))
            .kind(KindDef::root("DETACHED", 201))
            .build()
            .unwrap()
    }

    #[test]
    fn test_translate_by_name_and_ancestry() {
        let (old, new) = (old(), new());
        let (old_ix, new_ix) = (AncestryIndex::build(&old), AncestryIndex::build(&new));
        let walk = VersionCrosswalk::build(&[(&old, &old_ix), (&new, &new_ix)]).unwrap();
        assert_eq!(walk.versions(), [OLD, NEW]);

        let to_old = |name: &str| {
            let kind = new.lookup_by_name(name).unwrap().id();
            old.kind(walk.translate(kind, NEW, OLD).unwrap()).name()
        };
        assert_eq!(to_old("PILLAGER"), "PILLAGER");
        assert_eq!(to_old("PIGLIN_BRUTE"), "ABSTRACT_PIGLIN");
        assert_eq!(to_old("STRANGER"), "ENTITY");
        assert_eq!(to_old("DETACHED"), "ENTITY");

        let pillager = old.lookup_by_id(61).unwrap();
        let there = walk.translate(pillager.id(), OLD, NEW).unwrap();
        assert_eq!(new.kind(there).wire_id(), Some(62));
        let back = walk.translate(there, NEW, OLD).unwrap();
        assert_eq!(back, pillager.id());

        assert_eq!(walk.translate(there, NEW, NEW).unwrap(), there);
    }

    #[test]
    fn test_unknown_pair() {
        let old = old();
        let old_ix = AncestryIndex::build(&old);
        let walk = VersionCrosswalk::build(&[(&old, &old_ix)]).unwrap();
        let err = walk
            .translate(KindId(0), OLD, ProtocolVersion(1))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(ProtocolVersion(1))));
    }

    #[test]
    fn test_target_without_fallback() {
        let bare = Catalog::builder(OLD)
            .kind(KindDef::root("ROOT", -1))
            .build()
            .unwrap();
        let new = new();
        let (bare_ix, new_ix) = (AncestryIndex::build(&bare), AncestryIndex::build(&new));
        let err = VersionCrosswalk::build(&[(&bare, &bare_ix), (&new, &new_ix)]).unwrap_err();
        assert!(matches!(err, Error::NoMatchingRule { version: OLD, .. }));
    }
}
