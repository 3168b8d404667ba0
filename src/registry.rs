//! The layer registry: an explicit mapping from layer name to [`Layer`].
//!
//! The host application registers every layer it knows about up front;
//! loading resolves a name through this map and nothing else. Unknown names
//! fail with the list of registered alternatives, and include cycles are
//! detected rather than recursed into.

use std::collections::BTreeMap;

use crate::error::LayerfigError;
use crate::layer::Layer;
use crate::store::SettingsStore;

#[derive(Default)]
pub struct LayerRegistry {
    layers: BTreeMap<String, Layer>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer under `name`, replacing any previous registration.
    pub fn register(&mut self, name: &str, layer: Layer) {
        self.layers.insert(name.to_string(), layer);
    }

    /// Consuming form of [`register`](Self::register) for fluent wiring.
    pub fn with(mut self, name: &str, layer: Layer) -> Self {
        self.register(name, layer);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Registered layer names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.layers.keys().cloned().collect()
    }

    /// Resolve a layer chain into a fresh store.
    pub fn load(&self, name: &str) -> Result<SettingsStore, LayerfigError> {
        let mut store = SettingsStore::new();
        self.apply(name, &mut store)?;
        Ok(store)
    }

    /// Apply a layer chain on top of an existing store, supporting the
    /// seeded-store pattern where a pass starts from a parent's snapshot.
    pub fn apply(&self, name: &str, store: &mut SettingsStore) -> Result<(), LayerfigError> {
        let mut stack = Vec::new();
        self.apply_inner(name, store, &mut stack)
    }

    fn apply_inner(
        &self,
        name: &str,
        store: &mut SettingsStore,
        stack: &mut Vec<String>,
    ) -> Result<(), LayerfigError> {
        if stack.iter().any(|n| n == name) {
            return Err(LayerfigError::IncludeCycle(name.to_string()));
        }
        let layer = self
            .layers
            .get(name)
            .ok_or_else(|| LayerfigError::UnknownLayer {
                name: name.to_string(),
                available: self.names(),
            })?;
        stack.push(name.to_string());
        let result = layer.apply_steps(store, |inner, store| {
            self.apply_inner(inner, store, stack)
        });
        stack.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::sample_registry;

    #[test]
    fn load_single_layer() {
        let registry = sample_registry();
        let store = registry.load("base").unwrap();
        assert!(!store.get_bool("DEBUG").unwrap());
        assert!(store.is_default("DEBUG"));
        assert_eq!(store.get_str("TIME_ZONE").unwrap(), "UTC");
    }

    #[test]
    fn debug_chain_overrides_base_default() {
        let registry = sample_registry();
        let store = registry.load("debug").unwrap();
        assert!(store.get_bool("DEBUG").unwrap());
        assert!(store.explicit("DEBUG"));
        // Settings debug never touched still come from base.
        assert_eq!(store.get_str("TIME_ZONE").unwrap(), "UTC");
    }

    #[test]
    fn prod_explicit_survives_base_default() {
        let registry = sample_registry();
        let store = registry.load("prod").unwrap();
        assert!(!store.get_bool("DEBUG").unwrap());
        assert!(store.explicit("DEBUG"));
    }

    #[test]
    fn unknown_layer_lists_registered_names() {
        let registry = sample_registry();
        let err = registry.load("staging").unwrap_err();
        match err {
            LayerfigError::UnknownLayer { name, available } => {
                assert_eq!(name, "staging");
                assert!(available.contains(&"base".to_string()));
                assert!(available.contains(&"prod".to_string()));
            }
            other => panic!("Expected UnknownLayer, got {other:?}"),
        }
    }

    #[test]
    fn unknown_include_fails_the_chain() {
        let registry = LayerRegistry::new().with("top", Layer::new().include("missing"));
        let err = registry.load("top").unwrap_err();
        assert!(matches!(err, LayerfigError::UnknownLayer { ref name, .. } if name == "missing"));
    }

    #[test]
    fn include_cycle_detected() {
        let registry = LayerRegistry::new()
            .with("a", Layer::new().include("b"))
            .with("b", Layer::new().include("a"));
        let err = registry.load("a").unwrap_err();
        assert!(matches!(err, LayerfigError::IncludeCycle(ref name) if name == "a"));
    }

    #[test]
    fn self_include_detected() {
        let registry = LayerRegistry::new().with("a", Layer::new().include("a"));
        let err = registry.load("a").unwrap_err();
        assert!(matches!(err, LayerfigError::IncludeCycle(_)));
    }

    #[test]
    fn diamond_include_is_not_a_cycle() {
        let registry = LayerRegistry::new()
            .with(
                "base",
                Layer::new().with(|store: &mut SettingsStore| {
                    store.set_default("TIME_ZONE", "UTC");
                    Ok(())
                }),
            )
            .with("left", Layer::new().include("base"))
            .with("top", Layer::new().include("left").include("base"));
        let store = registry.load("top").unwrap();
        assert_eq!(store.get_str("TIME_ZONE").unwrap(), "UTC");
    }

    #[test]
    fn apply_on_seeded_store_protects_existing() {
        let registry = sample_registry();
        let mut store = SettingsStore::new();
        store.set("TIME_ZONE", "Europe/Lisbon");
        registry.apply("base", &mut store).unwrap();
        assert_eq!(store.get_str("TIME_ZONE").unwrap(), "Europe/Lisbon");
        assert!(store.explicit("TIME_ZONE"));
    }

    #[test]
    fn register_replaces_previous_layer() {
        let mut registry = sample_registry();
        registry.register(
            "base",
            Layer::new().with(|store: &mut SettingsStore| {
                store.set("TIME_ZONE", "GMT");
                Ok(())
            }),
        );
        let store = registry.load("base").unwrap();
        assert_eq!(store.get_str("TIME_ZONE").unwrap(), "GMT");
    }
}
