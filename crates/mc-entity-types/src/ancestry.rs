//! Precomputed ancestor chains.
//!
//! Every kind's chain (itself first, root last) is stored back to back in one
//! arena. Because a chain ends at its root, the ancestor at depth `d` of a kind
//! with chain `c` sits at `c[c.len() - 1 - d]`, which makes descendant checks a
//! single comparison.

use std::collections::HashSet;
use std::hash::BuildHasher;

use crate::kind::{Kind, KindId, ProtocolVersion};
use crate::{Catalog, Error, Result};

/// A set of kinds that something (usually a rule) is registered for.
pub trait KnownKinds {
    fn contains_kind(&self, kind: KindId) -> bool;
}

impl<S: BuildHasher> KnownKinds for HashSet<KindId, S> {
    fn contains_kind(&self, kind: KindId) -> bool {
        self.contains(&kind)
    }
}

impl KnownKinds for [KindId] {
    fn contains_kind(&self, kind: KindId) -> bool {
        self.contains(&kind)
    }
}

impl<const N: usize> KnownKinds for [KindId; N] {
    fn contains_kind(&self, kind: KindId) -> bool {
        self.contains(&kind)
    }
}

impl KnownKinds for Vec<KindId> {
    fn contains_kind(&self, kind: KindId) -> bool {
        self.contains(&kind)
    }
}

#[derive(Debug)]
pub struct AncestryIndex {
    version: ProtocolVersion,
    /// Chains of all kinds, concatenated in catalog order.
    chains: Vec<KindId>,
    /// `chains[offsets[i]..offsets[i + 1]]` is the chain of kind `i`.
    offsets: Vec<u32>,
}

impl AncestryIndex {
    /// The catalog must already be acyclic, which [`Catalog`] construction guarantees.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let mut chains = Vec::with_capacity(catalog.len() * 4);
        let mut offsets = Vec::with_capacity(catalog.len() + 1);
        offsets.push(0);

        for kind in catalog.all() {
            let mut cur = Some(kind.id());
            while let Some(id) = cur {
                chains.push(id);
                cur = catalog.kind(id).parent();
            }
            offsets.push(chains.len() as u32);
        }

        Self {
            version: catalog.version(),
            chains,
            offsets,
        }
    }

    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// `kind` followed by its ancestors, closest first.
    ///
    /// # Panics
    ///
    /// If `kind` was not issued by the catalog this index was built from.
    #[inline]
    #[must_use]
    pub fn chain(&self, kind: KindId) -> &[KindId] {
        let i = kind.index();
        &self.chains[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }

    /// Number of ancestors; roots have depth 0.
    #[inline]
    #[must_use]
    pub fn depth(&self, kind: KindId) -> usize {
        self.chain(kind).len() - 1
    }

    #[must_use]
    pub fn root_of(&self, kind: KindId) -> KindId {
        let chain = self.chain(kind);
        chain[chain.len() - 1]
    }

    /// True if `ancestor` is `kind` or one of its ancestors.
    ///
    /// # Panics
    ///
    /// If either id was not issued by the catalog this index was built from.
    #[inline]
    #[must_use]
    pub fn is_descendant_of(&self, kind: KindId, ancestor: KindId) -> bool {
        let chain = self.chain(kind);
        let depth = self.depth(ancestor);
        depth < chain.len() && chain[chain.len() - 1 - depth] == ancestor
    }

    /// First entry of `kind`'s chain that `known` contains.
    pub fn nearest_known_ancestor<K>(&self, kind: &Kind, known: &K) -> Result<KindId>
    where
        K: KnownKinds + ?Sized,
    {
        self.nearest_matching(kind.id(), |id| known.contains_kind(id))
            .ok_or_else(|| Error::NoMatchingRule {
                version: self.version,
                kind: kind.name().to_owned(),
            })
    }

    pub fn nearest_matching(
        &self,
        kind: KindId,
        mut pred: impl FnMut(KindId) -> bool,
    ) -> Option<KindId> {
        self.chain(kind).iter().copied().find(|&id| pred(id))
    }

    /// Deepest kind that both `a` and `b` descend from, if they share a tree.
    #[must_use]
    pub fn nearest_common_ancestor(&self, a: KindId, b: KindId) -> Option<KindId> {
        self.chain(a)
            .iter()
            .rev()
            .zip(self.chain(b).iter().rev())
            .take_while(|(x, y)| x == y)
            .last()
            .map(|(&x, _)| x)
    }
}
