//! Wire id to kind resolution with fallback.

use std::fmt;
use std::sync::Arc;

use crate::diagnostics::{DiagnosticSink, UnresolvedWireId};
use crate::kind::{Kind, UNASSIGNED_WIRE_ID};
use crate::{Catalog, Error, Result};

/// Outcome of resolving a wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Exact(&'a Kind),
    /// The id is unknown to this version; `kind` is the catalog's fallback.
    Fallback { kind: &'a Kind, unresolved: i32 },
}

impl<'a> Resolution<'a> {
    #[must_use]
    pub const fn kind(self) -> &'a Kind {
        match self {
            Resolution::Exact(kind) | Resolution::Fallback { kind, .. } => kind,
        }
    }

    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Resolution::Fallback { .. })
    }
}

/// Resolves wire ids against one catalog.
///
/// Unknown ids never fail: they degrade to the catalog's fallback kind and
/// one [`UnresolvedWireId`] event is handed to the sink.
#[derive(Clone)]
pub struct TypeResolver {
    catalog: Arc<Catalog>,
    sink: Arc<dyn DiagnosticSink>,
}

impl TypeResolver {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { catalog, sink }
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[inline]
    pub fn resolve(&self, wire_id: i32) -> Result<&Kind> {
        self.resolve_detailed(wire_id).map(Resolution::kind)
    }

    pub fn resolve_detailed(&self, wire_id: i32) -> Result<Resolution<'_>> {
        let version = self.catalog.version();
        if wire_id == UNASSIGNED_WIRE_ID {
            return Err(Error::AbstractKindRequested { version });
        }

        if let Some(kind) = self.catalog.lookup_by_id(wire_id) {
            return Ok(Resolution::Exact(kind));
        }

        let kind = self
            .catalog
            .fallback()
            .ok_or(Error::MissingFallback { version })?;
        self.sink.unresolved(UnresolvedWireId { version, wire_id });
        Ok(Resolution::Fallback {
            kind,
            unresolved: wire_id,
        })
    }
}

impl fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeResolver")
            .field("version", &self.catalog.version())
            .field("kinds", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{ChannelSink, NullSink};
    use crate::{KindDef, ProtocolVersion};

    const V: ProtocolVersion = ProtocolVersion(751);

    fn catalog(fallback: bool) -> Arc<Catalog> {
        let mut builder = Catalog::builder(V)
            .kind(KindDef::root("ENTITY", -1))
            .kind(KindDef::new("LIVINGENTITY", -1, "ENTITY"))
            .kind(KindDef::new("PLAYER", 106, "LIVINGENTITY"));
        if fallback {
            builder = builder.fallback("ENTITY");
        }
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn test_resolve_known() {
        let resolver = TypeResolver::new(catalog(true), Arc::new(NullSink));
        let res = resolver.resolve_detailed(106).unwrap();
        assert!(!res.is_fallback());
        assert_eq!(res.kind().name(), "PLAYER");
    }

    #[test]
    fn test_resolve_unknown_falls_back_and_reports_once() {
        let (sink, rx) = ChannelSink::bounded(8);
        let resolver = TypeResolver::new(catalog(true), Arc::new(sink));

        let res = resolver.resolve_detailed(999).unwrap();
        assert_eq!(res.kind().name(), "ENTITY");
        assert!(matches!(res, Resolution::Fallback { unresolved: 999, .. }));

        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            [UnresolvedWireId {
                version: V,
                wire_id: 999
            }]
        );
    }

    #[test]
    fn test_resolve_sentinel_is_misuse() {
        let (sink, rx) = ChannelSink::bounded(8);
        let resolver = TypeResolver::new(catalog(true), Arc::new(sink));
        assert!(matches!(
            resolver.resolve(-1),
            Err(Error::AbstractKindRequested { .. })
        ));
        assert!(rx.is_empty());
    }

    #[test]
    fn test_resolve_without_fallback() {
        let resolver = TypeResolver::new(catalog(false), Arc::new(NullSink));
        assert_eq!(resolver.resolve(106).unwrap().name(), "PLAYER");
        assert!(matches!(
            resolver.resolve(999),
            Err(Error::MissingFallback { .. })
        ));
    }
}
