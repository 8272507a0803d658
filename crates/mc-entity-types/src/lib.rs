//! Versioned entity-type catalogs for protocol translation.
//!
//! Each protocol version gets one immutable [`Catalog`] of entity kinds. Kinds
//! carry an optional wire id and at most one parent, forming a forest:
//!
//! ```text
//! ENTITY
//!  ├── ITEM(37)
//!  └── LIVINGENTITY
//!       ├── ARMOR_STAND(1)
//!       └── PLAYER(106)
//! ```
//!
//! On top of a catalog sit a [`TypeResolver`] (wire id to kind, degrading to a
//! fallback kind for unknown ids), an [`AncestryIndex`] (descendant checks and
//! nearest-known-ancestor lookups for rule dispatch) and a [`VersionCrosswalk`]
//! (the corresponding kind in another version, joined by logical name).
//! [`ProtocolRegistry`] ties them together and publishes immutable snapshots
//! that any number of connections can read without locking.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mc_entity_types::{Catalog, KindDef, NullSink, ProtocolVersion, TypeResolver};
//!
//! let catalog = Catalog::builder(ProtocolVersion::new(751))
//!     .fallback("ENTITY")
//!     .kind(KindDef::root("ENTITY", -1))
//!     .kind(KindDef::new("LIVINGENTITY", -1, "ENTITY"))
//!     .kind(KindDef::new("PLAYER", 106, "LIVINGENTITY"))
//!     .build()?;
//!
//! let resolver = TypeResolver::new(Arc::new(catalog), Arc::new(NullSink));
//! assert_eq!(resolver.resolve(106)?.name(), "PLAYER");
//! assert_eq!(resolver.resolve(999)?.name(), "ENTITY");
//! # Ok::<(), mc_entity_types::Error>(())
//! ```

mod ancestry;
mod catalog;
mod crosswalk;
mod diagnostics;
mod error;
mod kind;
mod registry;
mod resolver;
mod rules;

pub use ancestry::{AncestryIndex, KnownKinds};
pub use catalog::{Catalog, CatalogBuilder, CatalogDiff};
pub use crosswalk::VersionCrosswalk;
pub use diagnostics::{ChannelSink, DiagnosticSink, NullSink, TracingSink, UnresolvedWireId};
pub use error::{Error, Result};
pub use kind::{Kind, KindDef, KindId, ProtocolVersion, UNASSIGNED_WIRE_ID, VersionDefinition};
pub use registry::{ProtocolRegistry, RegistrySnapshot, VersionEntry};
pub use resolver::{Resolution, TypeResolver};
pub use rules::RuleTable;
