//! Rules registered against kinds, dispatched to the most specific match.

use rustc_hash::FxHashMap;

use crate::ancestry::{AncestryIndex, KnownKinds};
use crate::kind::{Kind, KindId};
use crate::{Catalog, Error, Result};

/// Rules (typically metadata rewriters) keyed by the kind they handle.
///
/// A rule registered for an abstract kind covers every descendant that has no
/// more specific rule of its own.
#[derive(Debug)]
pub struct RuleTable<R> {
    rules: FxHashMap<KindId, R>,
}

impl<R> Default for RuleTable<R> {
    fn default() -> Self {
        Self {
            rules: FxHashMap::default(),
        }
    }
}

impl<R> RuleTable<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` for `kind`, returning the rule it replaced.
    pub fn insert(&mut self, kind: &Kind, rule: R) -> Option<R> {
        self.rules.insert(kind.id(), rule)
    }

    /// Register by logical name.
    pub fn insert_named(&mut self, catalog: &Catalog, name: &str, rule: R) -> Result<Option<R>> {
        let kind = catalog
            .lookup_by_name(name)
            .ok_or_else(|| Error::UnknownKind {
                version: catalog.version(),
                name: name.to_owned(),
            })?;
        Ok(self.insert(kind, rule))
    }

    #[must_use]
    pub fn get(&self, kind: KindId) -> Option<&R> {
        self.rules.get(&kind)
    }

    /// The rule of `kind` or of its nearest ancestor that has one.
    pub fn dispatch(&self, index: &AncestryIndex, kind: &Kind) -> Result<(KindId, &R)> {
        let owner = index.nearest_known_ancestor(kind, self)?;
        Ok((owner, &self.rules[&owner]))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<R> KnownKinds for RuleTable<R> {
    fn contains_kind(&self, kind: KindId) -> bool {
        self.rules.contains_key(&kind)
    }
}
