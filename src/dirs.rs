//! Directory-convention defaults derived from a single base path.
//!
//! [`DirLayout`] is a settings contributor that fills in a conventional
//! project tree from one `PROJECT_DIR`:
//!
//! ```text
//! etc/            ETC_DIR
//!   local/        ETC_LOCAL_DIR
//! lib/            LIB_DIR
//! src/            SRC_DIR
//!   templates/    TEMPLATE_DIRS (list)
//!   static/       STATICFILES_DIRS (list)
//! var/            VAR_DIR, CONF_DIR
//!   db/           DB_DIR
//!   fixtures/     FIXTURE_DIRS (list)
//!   log/          LOG_DIR
//!   media/        MEDIA_ROOT
//!   static/       STATIC_ROOT
//!   tmp/          TMP_DIR
//! ```
//!
//! Every entry is written with `set_default`, and children hang off the
//! resolved parents, so a layer that explicitly sets `VAR_DIR` before this
//! step re-routes everything underneath it. No directory is ever created;
//! this is path derivation only.

use std::path::{Path, PathBuf};

use toml::Value;

use crate::error::LayerfigError;
use crate::layer::Contribute;
use crate::store::SettingsStore;

/// Settings contributor deriving a conventional project layout.
pub struct DirLayout {
    project_dir: Option<PathBuf>,
    platform_app: Option<String>,
}

impl DirLayout {
    /// Derive the layout from an explicit base path. An already-set
    /// `PROJECT_DIR` in the store still wins.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: Some(project_dir.into()),
            platform_app: None,
        }
    }

    /// Derive the layout from the store's `PROJECT_DIR` setting. Resolution
    /// fails with `MissingSetting("PROJECT_DIR")` if no layer has set one.
    pub fn from_store() -> Self {
        Self {
            project_dir: None,
            platform_app: None,
        }
    }

    /// Additionally default `CONFIG_DIR`, `DATA_DIR` and `CACHE_DIR` from the
    /// platform directories for `app` (XDG on Linux, Application Support on
    /// macOS).
    pub fn platform(mut self, app: &str) -> Self {
        self.platform_app = Some(app.to_string());
        self
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

fn store_path(store: &SettingsStore, key: &str) -> Result<PathBuf, LayerfigError> {
    Ok(PathBuf::from(store.get_str(key)?))
}

impl Contribute for DirLayout {
    fn contribute(&self, store: &mut SettingsStore) -> Result<(), LayerfigError> {
        if let Some(dir) = &self.project_dir {
            store.set_default("PROJECT_DIR", path_value(dir));
        }
        let base = store_path(store, "PROJECT_DIR")?;

        store.set_default("ETC_DIR", path_value(&base.join("etc")));
        store.set_default("LIB_DIR", path_value(&base.join("lib")));
        store.set_default("SRC_DIR", path_value(&base.join("src")));
        store.set_default("VAR_DIR", path_value(&base.join("var")));

        let etc_dir = store_path(store, "ETC_DIR")?;
        store.set_default("ETC_LOCAL_DIR", path_value(&etc_dir.join("local")));

        let var_dir = store_path(store, "VAR_DIR")?;
        store.set_default("CONF_DIR", path_value(&var_dir));
        store.set_default("DB_DIR", path_value(&var_dir.join("db")));
        store.set_default("LOG_DIR", path_value(&var_dir.join("log")));
        store.set_default("TMP_DIR", path_value(&var_dir.join("tmp")));
        store.set_default("MEDIA_ROOT", path_value(&var_dir.join("media")));
        store.set_default("STATIC_ROOT", path_value(&var_dir.join("static")));
        store.set_default(
            "FIXTURE_DIRS",
            Value::Array(vec![path_value(&var_dir.join("fixtures"))]),
        );

        let src_dir = store_path(store, "SRC_DIR")?;
        store.set_default(
            "TEMPLATE_DIRS",
            Value::Array(vec![path_value(&src_dir.join("templates"))]),
        );
        store.set_default(
            "STATICFILES_DIRS",
            Value::Array(vec![path_value(&src_dir.join("static"))]),
        );

        if let Some(app) = &self.platform_app
            && let Some(proj) = directories::ProjectDirs::from("", "", app)
        {
            store.set_default("CONFIG_DIR", path_value(proj.config_dir()));
            store.set_default("DATA_DIR", path_value(proj.data_dir()));
            store.set_default("CACHE_DIR", path_value(proj.cache_dir()));
        }

        Ok(())
    }
}
