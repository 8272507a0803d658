//! Error types for catalog construction and type resolution.

use thiserror::Error;

use crate::ProtocolVersion;

#[derive(Error, Debug)]
pub enum Error {
    /// Two concrete kinds of one version declare the same wire id.
    #[error("{version}: wire id {wire_id} declared by both {first} and {second}")]
    DuplicateWireId {
        version: ProtocolVersion,
        wire_id: i32,
        first: String,
        second: String,
    },

    /// A parent chain revisits a kind.
    #[error("{version}: parent chain of {kind} is cyclic")]
    CyclicParent {
        version: ProtocolVersion,
        kind: String,
    },

    #[error("{version}: kind {name} defined more than once")]
    DuplicateKindName {
        version: ProtocolVersion,
        name: String,
    },

    #[error("{version}: {kind} has invalid wire id {wire_id}")]
    InvalidWireId {
        version: ProtocolVersion,
        kind: String,
        wire_id: i32,
    },

    #[error("{version}: {kind} names unknown parent {parent}")]
    UnknownParent {
        version: ProtocolVersion,
        kind: String,
        parent: String,
    },

    #[error("{version}: fallback kind {name} is not defined")]
    UnknownFallback {
        version: ProtocolVersion,
        name: String,
    },

    #[error("{version}: fallback kind {name} is not a root")]
    FallbackNotRoot {
        version: ProtocolVersion,
        name: String,
    },

    /// Abstract kinds never appear on the wire, so asking for the sentinel id is a caller bug.
    #[error("{version}: abstract kind requested by wire id")]
    AbstractKindRequested { version: ProtocolVersion },

    /// Raised for an unknown wire id, or when bridging to a version without a fallback.
    #[error("{version}: no fallback kind configured")]
    MissingFallback { version: ProtocolVersion },

    /// Neither the kind nor any of its ancestors (root included) is known.
    #[error("{version}: no rule matches {kind} or any of its ancestors")]
    NoMatchingRule {
        version: ProtocolVersion,
        kind: String,
    },

    #[error("{version}: no kind named {name}")]
    UnknownKind {
        version: ProtocolVersion,
        name: String,
    },

    #[error("{0} is not registered")]
    UnsupportedVersion(ProtocolVersion),

    #[error("kind {kind} does not belong to {expected}")]
    VersionMismatch {
        kind: String,
        expected: ProtocolVersion,
    },

    #[error("invalid version definition: {0}")]
    Definition(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
