//! Core resolution pipeline: apply the selected layer chain and the overlays
//! on top of it, then check required settings.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Apply the selected layer chain from the registry
//! 2. Apply env var overrides as explicit sets
//! 3. Apply programmatic overrides as explicit sets (highest priority)
//! 4. Check that every required setting is present

use toml::Value;

use crate::env;
use crate::error::LayerfigError;
use crate::registry::LayerRegistry;
use crate::store::SettingsStore;

/// All pre-loaded data needed to resolve a settings pass. No I/O happens here.
pub struct ResolveInput<'a> {
    /// Registered layers to resolve names against.
    pub registry: &'a LayerRegistry,
    /// Name of the layer chain to apply.
    pub layer: String,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"MYAPP"`). `None` means env overrides disabled.
    pub env_prefix: Option<String>,
    /// Programmatic overrides as `(KEY, value)` pairs.
    pub overrides: Vec<(String, Value)>,
    /// Keys that must be present once everything has been applied.
    pub required: Vec<String>,
}

/// Resolve a settings pass from pre-loaded inputs.
///
/// Overlays are written with `set`, not `set_default`: environment variables
/// and programmatic overrides come from the operator, who outranks every
/// layer author.
pub fn resolve(input: ResolveInput<'_>) -> Result<SettingsStore, LayerfigError> {
    // 1: Layer chain
    let mut store = input.registry.load(&input.layer)?;

    // 2: Env overrides
    if let Some(prefix) = &input.env_prefix {
        for (key, value) in env::env_overlay(prefix, input.env_vars) {
            store.set(&key, value);
        }
    }

    // 3: Programmatic overrides (highest priority)
    for (key, value) in input.overrides {
        store.set(&key, value);
    }

    // 4: Required settings are fatal if absent
    store.require(&input.required)?;

    Ok(store)
}
