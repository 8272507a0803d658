//! Built-in entity type tables.
//!
//! Tables live in `data/entities/<version>.json` and are compiled into
//! `const` definitions by the build script, one module per version
//! (`v1_16_1`, `v1_16_2`, ...). [`DEFINITIONS`] lists them oldest first.
//!
//! ```
//! use mc_entity_data::{registry, v1_16_2};
//!
//! let registry = registry();
//! let snapshot = registry.snapshot();
//! let player = snapshot.resolve(v1_16_2::PROTOCOL_VERSION, v1_16_2::ids::PLAYER)?;
//! assert_eq!(player.name(), "PLAYER");
//! # Ok::<(), mc_entity_types::Error>(())
//! ```

use std::sync::Arc;

use mc_entity_types::{
    DiagnosticSink, Error, ProtocolRegistry, ProtocolVersion, TracingSink, VersionDefinition,
};
use tracing::warn;

include!(concat!(env!("OUT_DIR"), "/entities.rs"));

/// Built-in definition for a protocol version number.
#[must_use]
pub fn definition(version: ProtocolVersion) -> Option<&'static VersionDefinition> {
    DEFINITIONS.iter().find(|def| def.version == version)
}

/// Protocol version number for a game version name such as `"1.16.2"`.
#[must_use]
pub fn protocol_version(name: &str) -> Option<ProtocolVersion> {
    DEFINITIONS
        .iter()
        .find(|def| def.name == name)
        .map(|def| def.version)
}

/// Register every built-in version.
///
/// A version that fails to build is skipped and returned; the others stay usable.
pub fn register_builtin(registry: &ProtocolRegistry) -> Vec<(ProtocolVersion, Error)> {
    DEFINITIONS
        .iter()
        .filter_map(|def| registry.register(def).err().map(|e| (def.version, e)))
        .collect()
}

/// A registry holding all built-in versions, reporting unresolved ids to `sink`.
pub fn registry_with_sink(sink: Arc<dyn DiagnosticSink>) -> ProtocolRegistry {
    let registry = ProtocolRegistry::new(sink);
    for (version, err) in register_builtin(&registry) {
        warn!("built-in table for {} is unusable: {}", version, err);
    }
    registry
}

/// A registry holding all built-in versions, logging unresolved ids.
#[must_use]
pub fn registry() -> ProtocolRegistry {
    registry_with_sink(Arc::new(TracingSink))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_sorted() {
        let versions: Vec<_> = DEFINITIONS.iter().map(|d| d.version).collect();
        let mut sorted = versions.clone();
        sorted.sort();
        assert_eq!(versions, sorted);
        assert_eq!(latest::PROTOCOL_VERSION, *versions.last().unwrap());
    }

    #[test]
    fn test_lookup_helpers() {
        assert_eq!(protocol_version("1.16.2"), Some(ProtocolVersion::new(751)));
        assert_eq!(protocol_version("1.16.1"), Some(ProtocolVersion::new(736)));
        assert_eq!(protocol_version("1.8.9"), None);
        assert_eq!(
            definition(v1_16_1::PROTOCOL_VERSION).map(|d| d.kinds.len()),
            Some(v1_16_1::KINDS.len())
        );
    }

    #[test]
    fn test_generated_ids_match_tables() {
        assert_eq!(v1_16_2::ids::PLAYER, 106);
        assert_eq!(v1_16_2::ids::PIGLIN_BRUTE, 61);
        assert_eq!(v1_16_1::ids::PLAYER, 105);
        assert_eq!(v1_16_1::ids::PIGLIN, v1_16_2::ids::PIGLIN);
    }
}
