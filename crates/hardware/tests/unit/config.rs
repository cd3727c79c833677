//! Configuration tests: defaults, validation, JSON deserialization.

use pretty_assertions::assert_eq;

use emusim_core::config::{Associativity, CacheConfig, CacheLevelConfig, Config, ConfigError};

/// The default machine is the canonical 32 KiB / 512 KiB / 32 MiB hierarchy
/// with 64-byte lines and 4/8/16-way sets.
#[test]
fn default_config_is_canonical_hierarchy() {
    let config = Config::default();
    assert_eq!(config.cache.line_bytes, 64);
    assert_eq!(config.cache.levels.len(), 3);
    assert_eq!(config.cache.levels[0].capacity_bytes, 32 * 1024);
    assert_eq!(config.cache.levels[1].capacity_bytes, 512 * 1024);
    assert_eq!(config.cache.levels[2].capacity_bytes, 32 * 1024 * 1024);
    assert_eq!(config.cache.levels[0].associativity, Associativity::Ways(4));
    assert_eq!(config.cache.levels[1].associativity, Associativity::Ways(8));
    assert_eq!(config.cache.levels[2].associativity, Associativity::Ways(16));
    assert!(config.memory.max_pages.is_none());

    config.validate().unwrap();
}

/// An empty level list is rejected.
#[test]
fn no_levels_is_invalid() {
    let config = CacheConfig {
        line_bytes: 64,
        levels: vec![],
    };
    assert!(matches!(config.validate(), Err(ConfigError::NoLevels)));
}

/// A line size that is not a power of two is rejected.
#[test]
fn non_power_of_two_line_is_invalid() {
    let config = CacheConfig {
        line_bytes: 48,
        levels: vec![CacheLevelConfig {
            capacity_bytes: 480,
            associativity: Associativity::Full,
        }],
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::BadLineSize(48))
    ));
}

/// A capacity that does not split into whole sets of whole lines is
/// rejected, naming the offending level.
#[test]
fn unpartitionable_geometry_is_invalid() {
    let config = CacheConfig {
        line_bytes: 64,
        levels: vec![
            CacheLevelConfig {
                capacity_bytes: 128,
                associativity: Associativity::Full,
            },
            // 3 lines cannot form 2-way sets.
            CacheLevelConfig {
                capacity_bytes: 192,
                associativity: Associativity::Ways(2),
            },
        ],
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::BadGeometry { level: 1, .. })
    ));
}

/// A partial JSON document fills the rest from defaults.
#[test]
fn json_merges_with_defaults() {
    let config: Config = serde_json::from_str(
        r#"{
            "cache": {
                "line_bytes": 32,
                "levels": [
                    { "capacity_bytes": 1024, "associativity": { "Ways": 2 } },
                    { "capacity_bytes": 4096 }
                ]
            },
            "memory": { "max_pages": 16 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.cache.line_bytes, 32);
    assert_eq!(config.cache.levels.len(), 2);
    assert_eq!(config.cache.levels[0].associativity, Associativity::Ways(2));
    assert_eq!(config.cache.levels[1].associativity, Associativity::Full);
    assert_eq!(config.memory.max_pages, Some(16));
    assert!(!config.general.trace_instructions, "defaulted");

    config.validate().unwrap();
}
