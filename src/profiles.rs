//! Built-in settings profiles: a ready-made registry wiring the conventional
//! `base` → `debug`/`prod` → `default` chain.
//!
//! `base` carries the shared defaults and the required-settings check; the
//! environment profiles decide `DEBUG` explicitly and then include `base`,
//! so their choices are protected by the `set_default` discipline. `default`
//! is the minimal runnable configuration for when nothing selected a profile.

use std::path::PathBuf;

use toml::Value;

use crate::dirs::DirLayout;
use crate::error::LayerfigError;
use crate::layer::Layer;
use crate::registry::LayerRegistry;
use crate::secret::SecretFile;
use crate::store::SettingsStore;

fn base_defaults(store: &mut SettingsStore) -> Result<(), LayerfigError> {
    // Settings that must be in place before this profile runs. A more
    // specific layer may extend the list by setting REQUIRED_SETTINGS.
    store.set_default(
        "REQUIRED_SETTINGS",
        Value::Array(vec!["PROJECT_NAME".into(), "ADMINS".into()]),
    );
    let required: Vec<String> = store
        .get("REQUIRED_SETTINGS")?
        .as_array()
        .map(|keys| {
            keys.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();
    store.require(&required)?;

    let admins = store.get("ADMINS")?.clone();
    store.set_default("MANAGERS", admins);
    store.set_default("TIME_ZONE", "UTC");
    store.set_default("LANGUAGE_CODE", "en");
    store.set_default("TESTING", false);
    store.set_default("DEBUG", false);

    store.append_unique(
        "ALLOWED_HOSTS",
        [Value::String("localhost".into()), Value::String("127.0.0.1".into())],
    );
    store.append_unique(
        "INTERNAL_IPS",
        [Value::String("localhost".into()), Value::String("127.0.0.1".into())],
    );
    Ok(())
}

/// The shared profile: required-settings check, common defaults, directory
/// layout, secret file.
pub fn base(project_dir: impl Into<PathBuf>) -> Layer {
    Layer::new()
        .with(base_defaults)
        .with(DirLayout::new(project_dir))
        .with(SecretFile::new())
}

/// Development profile: debugging on unless a more specific layer said
/// otherwise, then everything from `base`.
pub fn debug() -> Layer {
    Layer::new()
        .with(|store: &mut SettingsStore| {
            store.set_default("DEBUG", true);
            let debug = store.get("DEBUG")?.clone();
            store.set_default("TEMPLATE_DEBUG", debug);
            Ok(())
        })
        .include("base")
}

/// Production profile: debugging off, then everything from `base`.
pub fn prod() -> Layer {
    Layer::new()
        .with(|store: &mut SettingsStore| {
            store.set_default("DEBUG", false);
            Ok(())
        })
        .include("base")
}

/// The minimal runnable profile: fills the required settings with empty
/// placeholders and chains through `debug`.
pub fn default(app_name: &str) -> Layer {
    let name = app_name.to_string();
    Layer::new()
        .with(move |store: &mut SettingsStore| {
            store.set_default("ADMINS", Value::Array(Vec::new()));
            store.set_default("PROJECT_NAME", name.clone());
            Ok(())
        })
        .include("debug")
}

/// Bootstrap profile: a placeholder secret, then the `default` chain.
///
/// Exists so tooling that generates the real secret file can run before one
/// is on disk. The placeholder is explicit, so the secret-file step leaves
/// it alone. Never deploy with it.
pub fn bootstrap() -> Layer {
    Layer::new()
        .with(|store: &mut SettingsStore| {
            store.set("SECRET_KEY", "bootstrap-placeholder");
            Ok(())
        })
        .include("default")
}

/// A registry wired with the whole built-in chain. Host layers register on
/// top and include `debug` or `prod`.
pub fn builtin(app_name: &str, project_dir: impl Into<PathBuf>) -> LayerRegistry {
    LayerRegistry::new()
        .with("base", base(project_dir))
        .with("debug", debug())
        .with("prod", prod())
        .with("default", default(app_name))
        .with("bootstrap", bootstrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Layerfig;

    fn registry() -> LayerRegistry {
        builtin("myapp", "/srv/myapp")
    }

    #[test]
    fn default_profile_is_runnable() {
        let store = registry().load("default").unwrap();
        assert_eq!(store.get_str("PROJECT_NAME").unwrap(), "myapp");
        assert_eq!(store.get("ADMINS").unwrap().as_array().unwrap().len(), 0);
        assert!(store.get_bool("DEBUG").unwrap()); // via the debug profile
        assert_eq!(store.get_str("TIME_ZONE").unwrap(), "UTC");
        assert_eq!(store.get_str("VAR_DIR").unwrap(), "/srv/myapp/var");
    }

    #[test]
    fn bootstrap_supplies_placeholder_secret() {
        let store = registry().load("bootstrap").unwrap();
        assert_eq!(store.get_str("SECRET_KEY").unwrap(), "bootstrap-placeholder");
        assert!(store.explicit("SECRET_KEY"));
        // Chains all the way through default -> debug -> base.
        assert!(store.get_bool("DEBUG").unwrap());
        assert_eq!(store.get_str("PROJECT_NAME").unwrap(), "myapp");
    }

    #[test]
    fn base_requires_project_identity() {
        let err = registry().load("base").unwrap_err();
        match err {
            LayerfigError::MissingSettings(keys) => {
                assert!(keys.contains(&"PROJECT_NAME".to_string()));
                assert!(keys.contains(&"ADMINS".to_string()));
            }
            other => panic!("Expected MissingSettings, got {other:?}"),
        }
    }

    #[test]
    fn debug_defaults_template_debug_from_debug() {
        let store = registry().load("default").unwrap();
        assert!(store.get_bool("TEMPLATE_DEBUG").unwrap());
    }

    #[test]
    fn host_layer_chains_through_prod() {
        let store = Layerfig::builder()
            .registry(registry())
            .layer(
                "site",
                Layer::new()
                    .with(|store: &mut SettingsStore| {
                        store.set("PROJECT_NAME", "site");
                        store.set(
                            "ADMINS",
                            Value::Array(vec!["ops@example.com".into()]),
                        );
                        store.set("DEBUG", true); // explicit, against prod's default
                        Ok(())
                    })
                    .include("prod"),
            )
            .no_env()
            .load_layer("site")
            .unwrap();

        assert!(store.get_bool("DEBUG").unwrap());
        assert!(store.explicit("DEBUG"));
        assert_eq!(store.get_str("PROJECT_NAME").unwrap(), "site");
        assert_eq!(
            store.get("MANAGERS").unwrap().as_array().unwrap()[0].as_str(),
            Some("ops@example.com")
        );
    }

    #[test]
    fn managers_default_to_admins() {
        let store = Layerfig::builder()
            .registry(registry())
            .layer(
                "site",
                Layer::new()
                    .with(|store: &mut SettingsStore| {
                        store.set("PROJECT_NAME", "site");
                        store.set("ADMINS", Value::Array(vec!["a@example.com".into()]));
                        Ok(())
                    })
                    .include("base"),
            )
            .no_env()
            .load_layer("site")
            .unwrap();

        let managers = store.get("MANAGERS").unwrap().as_array().unwrap();
        assert_eq!(managers[0].as_str(), Some("a@example.com"));
        assert!(store.is_default("MANAGERS"));
    }

    #[test]
    fn allowed_hosts_keep_layer_entries_and_local_ones() {
        let store = Layerfig::builder()
            .registry(registry())
            .layer(
                "site",
                Layer::new()
                    .with(|store: &mut SettingsStore| {
                        store.set("PROJECT_NAME", "site");
                        store.set("ADMINS", Value::Array(Vec::new()));
                        store.set(
                            "ALLOWED_HOSTS",
                            Value::Array(vec!["example.com".into(), "localhost".into()]),
                        );
                        Ok(())
                    })
                    .include("base"),
            )
            .no_env()
            .load_layer("site")
            .unwrap();

        let hosts: Vec<&str> = store
            .get("ALLOWED_HOSTS")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(hosts, vec!["example.com", "localhost", "127.0.0.1"]);
    }

    #[test]
    fn required_settings_list_is_extendable() {
        let store = Layerfig::builder()
            .registry(registry())
            .layer(
                "site",
                Layer::new()
                    .with(|store: &mut SettingsStore| {
                        store.set("PROJECT_NAME", "site");
                        store.set("ADMINS", Value::Array(Vec::new()));
                        store.set(
                            "REQUIRED_SETTINGS",
                            Value::Array(vec![
                                "PROJECT_NAME".into(),
                                "ADMINS".into(),
                                "SITE_ID".into(),
                            ]),
                        );
                        Ok(())
                    })
                    .include("base"),
            )
            .no_env()
            .load_layer("site");

        assert!(
            matches!(store, Err(LayerfigError::MissingSetting(ref k)) if k == "SITE_ID")
        );
    }

    #[test]
    fn prod_is_not_debug() {
        let store = Layerfig::builder()
            .registry(registry())
            .layer(
                "site",
                Layer::new()
                    .with(|store: &mut SettingsStore| {
                        store.set("PROJECT_NAME", "site");
                        store.set("ADMINS", Value::Array(Vec::new()));
                        Ok(())
                    })
                    .include("prod"),
            )
            .no_env()
            .load_layer("site")
            .unwrap();

        assert!(!store.get_bool("DEBUG").unwrap());
        assert!(!store.contains("TEMPLATE_DEBUG")); // debug profile never ran
    }
}
