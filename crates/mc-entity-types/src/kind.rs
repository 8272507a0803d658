//! Kinds, kind definitions and protocol versions.
//!
//! A [`Kind`] is one logical entity type inside one version's [`Catalog`](crate::Catalog).
//! Kinds are stored in an arena and refer to their parent by [`KindId`], so the
//! hierarchy is plain data rather than a type hierarchy.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Wire id used by definitions for abstract kinds that never appear in packets.
pub const UNASSIGNED_WIRE_ID: i32 = -1;

/// A game protocol version number (e.g. 751 for 1.16.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolVersion(pub i32);

impl ProtocolVersion {
    #[must_use]
    pub const fn new(version: i32) -> Self {
        Self(version)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "protocol {}", self.0)
    }
}

impl From<i32> for ProtocolVersion {
    fn from(v: i32) -> Self {
        ProtocolVersion(v)
    }
}

/// Handle of a kind inside one catalog's arena.
///
/// Handles are registration indices and are only meaningful for the catalog
/// that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KindId(pub(crate) u32);

impl KindId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A logical entity type within one protocol version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kind {
    pub(crate) id: KindId,
    pub(crate) version: ProtocolVersion,
    pub(crate) name: Cow<'static, str>,
    pub(crate) wire_id: Option<i32>,
    pub(crate) parent: Option<KindId>,
}

impl Kind {
    #[must_use]
    pub const fn id(&self) -> KindId {
        self.id
    }

    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Stable logical name, the join key across versions.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wire id in this version, `None` for abstract kinds.
    #[must_use]
    pub const fn wire_id(&self) -> Option<i32> {
        self.wire_id
    }

    #[must_use]
    pub const fn parent(&self) -> Option<KindId> {
        self.parent
    }

    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        self.wire_id.is_none()
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wire_id {
            Some(id) => write!(f, "{}({id})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

fn unassigned() -> i32 {
    UNASSIGNED_WIRE_ID
}

/// One flat kind record as written in a version table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDef {
    pub name: Cow<'static, str>,
    #[serde(default = "unassigned")]
    pub id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Cow<'static, str>>,
}

impl KindDef {
    /// A kind without a parent.
    #[must_use]
    pub const fn root(name: &'static str, id: i32) -> Self {
        Self {
            name: Cow::Borrowed(name),
            id,
            parent: None,
        }
    }

    #[must_use]
    pub const fn new(name: &'static str, id: i32, parent: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            id,
            parent: Some(Cow::Borrowed(parent)),
        }
    }

    #[must_use]
    pub fn owned(name: impl Into<String>, id: i32, parent: Option<&str>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            id,
            parent: parent.map(|p| Cow::Owned(p.to_owned())),
        }
    }
}

/// Everything needed to build one version's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDefinition {
    #[serde(rename = "protocol_version")]
    pub version: ProtocolVersion,
    /// Human readable game version, e.g. `"1.16.2"`.
    pub name: Cow<'static, str>,
    /// Kind returned for wire ids this version does not know.
    #[serde(default)]
    pub fallback: Option<Cow<'static, str>>,
    pub kinds: Cow<'static, [KindDef]>,
}

impl VersionDefinition {
    #[must_use]
    pub const fn from_static(
        version: ProtocolVersion,
        name: &'static str,
        fallback: Option<&'static str>,
        kinds: &'static [KindDef],
    ) -> Self {
        let fallback = match fallback {
            Some(f) => Some(Cow::Borrowed(f)),
            None => None,
        };
        Self {
            version,
            name: Cow::Borrowed(name),
            fallback,
            kinds: Cow::Borrowed(kinds),
        }
    }

    /// Parse an operator-supplied definition.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
