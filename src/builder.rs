use serde::Serialize;
use toml::Value;

use crate::error::LayerfigError;
use crate::layer::Layer;
use crate::registry::LayerRegistry;
use crate::resolve::{self, ResolveInput};
use crate::store::SettingsStore;

/// Entry point for building a layerfig settings pass.
pub struct Layerfig;

impl Layerfig {
    pub fn builder() -> LayerfigBuilder {
        LayerfigBuilder::new()
    }
}

/// Builder for registering layers and resolving a settings pass.
///
/// Gathers three kinds of input (see the crate docs for the full picture):
///
/// - **Layers**: [`layer()`](Self::layer) / [`registry()`](Self::registry) — the named chains to resolve.
/// - **Selection**: [`selector_env()`](Self::selector_env) / [`default_layer()`](Self::default_layer) — which chain runs.
/// - **Overlays**: [`env_prefix()`](Self::env_prefix), [`override_value()`](Self::override_value) — operator overrides on top.
pub struct LayerfigBuilder {
    registry: LayerRegistry,
    selector_env: Option<String>,
    default_layer: Option<String>,
    env_prefix: Option<String>,
    env_enabled: bool,
    overrides: Vec<(String, Value)>,
    required: Vec<String>,
}

impl LayerfigBuilder {
    fn new() -> Self {
        Self {
            registry: LayerRegistry::new(),
            selector_env: None,
            default_layer: None,
            env_prefix: None,
            env_enabled: true,
            overrides: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Register a layer under `name`, replacing any previous registration.
    pub fn layer(mut self, name: &str, layer: Layer) -> Self {
        self.registry.register(name, layer);
        self
    }

    /// Replace the registry wholesale, e.g. with
    /// [`profiles::builtin`](crate::profiles::builtin). Layers registered
    /// afterwards via [`layer()`](Self::layer) are added on top.
    pub fn registry(mut self, registry: LayerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Name an environment variable that selects the active layer at load
    /// time. An unset or empty variable falls through to
    /// [`default_layer()`](Self::default_layer).
    pub fn selector_env(mut self, var: &str) -> Self {
        self.selector_env = Some(var.to_string());
        self
    }

    /// The layer to load when the selector variable is unset.
    pub fn default_layer(mut self, name: &str) -> Self {
        self.default_layer = Some(name.to_string());
        self
    }

    /// Enable `{PREFIX}__KEY` environment overrides on top of the layer chain.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Disable environment overrides entirely (the selector variable is
    /// unaffected).
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Add a programmatic override. `None` values are ignored, so optional
    /// caller args pass through unchecked. Keys are uppercased to the
    /// settings naming convention.
    pub fn override_value<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.overrides.push((key.to_uppercase(), v.into()));
        }
        self
    }

    /// Add overrides from any serializable source, field by field.
    ///
    /// `None` fields are skipped and keys are uppercased, so a plain options
    /// struct maps onto `DEBUG`, `PROJECT_NAME` and friends. Composes with
    /// [`override_value`](Self::override_value); later calls take precedence.
    pub fn overrides_from<S: Serialize>(mut self, source: &S) -> Self {
        let value =
            Value::try_from(source).expect("layerfig: failed to serialize override source");
        let Value::Table(table) = value else {
            panic!("layerfig: override source did not serialize to a table");
        };
        for (key, v) in table {
            self.overrides.push((key.to_uppercase(), v));
        }
        self
    }

    /// Keys that must be present once the pass resolves; missing ones abort
    /// loading with an error naming every absentee.
    pub fn require<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.required
            .extend(keys.into_iter().map(|k| k.as_ref().to_string()));
        self
    }

    /// Resolve the active layer name from a selector value (already read from
    /// the environment) and the configured default.
    fn effective_layer(&self, selector_value: Option<String>) -> Result<String, LayerfigError> {
        if let Some(name) = selector_value
            && !name.is_empty()
        {
            return Ok(name);
        }
        self.default_layer
            .clone()
            .ok_or(LayerfigError::NoLayerSelected)
    }

    /// Resolve the effective env prefix (None if env overrides disabled).
    fn effective_env_prefix(&self) -> Option<String> {
        if !self.env_enabled {
            return None;
        }
        self.env_prefix.clone()
    }

    /// Load the layer selected by the environment (or the default) and
    /// resolve it through all overlays.
    pub fn load(self) -> Result<SettingsStore, LayerfigError> {
        let selector_value = self
            .selector_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok());
        let name = self.effective_layer(selector_value)?;
        self.load_layer(&name)
    }

    /// Load a specific layer by name, bypassing selection.
    pub fn load_layer(self, name: &str) -> Result<SettingsStore, LayerfigError> {
        let env_prefix = self.effective_env_prefix();
        let env_vars: Vec<(String, String)> = if env_prefix.is_some() {
            std::env::vars().collect()
        } else {
            Vec::new()
        };
        let Self {
            registry,
            overrides,
            required,
            ..
        } = self;

        resolve::resolve(ResolveInput {
            registry: &registry,
            layer: name.to_string(),
            env_vars,
            env_prefix,
            overrides,
            required,
        })
    }
}
