#[cfg(test)]
pub mod test {
    use toml::Value;

    use crate::layer::Layer;
    use crate::registry::LayerRegistry;
    use crate::store::SettingsStore;

    /// A small base/debug/prod chain used across the crate's tests.
    ///
    /// `base` only sets defaults; `debug` and `prod` decide `DEBUG`
    /// explicitly before including it.
    pub fn sample_registry() -> LayerRegistry {
        let base = Layer::new().with(|store: &mut SettingsStore| {
            store.set_default("DEBUG", false);
            store.set_default("TIME_ZONE", "UTC");
            store.set_default("PROJECT_NAME", "sample");
            Ok(())
        });
        let debug = Layer::new()
            .with(|store: &mut SettingsStore| {
                store.set("DEBUG", true);
                Ok(())
            })
            .include("base");
        let prod = Layer::new()
            .with(|store: &mut SettingsStore| {
                store.set("DEBUG", false);
                store.set("ALLOWED_HOSTS", Value::Array(vec!["example.com".into()]));
                Ok(())
            })
            .include("base");

        LayerRegistry::new()
            .with("base", base)
            .with("debug", debug)
            .with("prod", prod)
    }

    #[test]
    fn sample_registry_loads_every_layer() {
        let registry = sample_registry();
        for name in registry.names() {
            registry.load(&name).unwrap();
        }
    }
}
