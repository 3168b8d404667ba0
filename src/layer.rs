//! Layers: ordered bundles of settings contributions.
//!
//! A [`Layer`] is a sequence of steps applied to a [`SettingsStore`] in
//! order. A step is either a [`Contribute`] implementation (usually a
//! closure) or an include of another named layer, resolved through the
//! [`LayerRegistry`](crate::LayerRegistry) at apply time.
//!
//! Includes replace the old convention of executing a sibling settings
//! module in place: the including layer's own steps run first, so its
//! explicit values are already in the store and protected by the
//! `set_default` discipline when the more generic layer runs.

use std::path::Path;

use serde::Serialize;
use toml::{Table, Value};

use crate::error::LayerfigError;
use crate::store::SettingsStore;

/// A single settings contribution.
///
/// Blanket-implemented for closures, so most layers are built from
/// `Fn(&mut SettingsStore) -> Result<(), LayerfigError>`. Implement it on a
/// struct when the step carries configuration of its own (see
/// [`DirLayout`](crate::DirLayout) and [`SecretFile`](crate::SecretFile)).
pub trait Contribute {
    fn contribute(&self, store: &mut SettingsStore) -> Result<(), LayerfigError>;
}

impl<F> Contribute for F
where
    F: Fn(&mut SettingsStore) -> Result<(), LayerfigError>,
{
    fn contribute(&self, store: &mut SettingsStore) -> Result<(), LayerfigError> {
        self(store)
    }
}

pub(crate) enum Step {
    Contribute(Box<dyn Contribute>),
    Include(String),
}

/// An ordered sequence of contributions and includes.
#[derive(Default)]
pub struct Layer {
    pub(crate) steps: Vec<Step>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contributor step.
    pub fn with<C: Contribute + 'static>(mut self, contributor: C) -> Self {
        self.steps.push(Step::Contribute(Box::new(contributor)));
        self
    }

    /// Append an include step: apply the named layer at this position in the
    /// sequence. Place includes after the layer's own settings so those
    /// settings are in the store, and protected, before the included layer
    /// runs.
    pub fn include(mut self, name: &str) -> Self {
        self.steps.push(Step::Include(name.to_string()));
        self
    }

    /// A layer that writes every pair in `table` as an explicit value.
    pub fn from_table(table: Table) -> Self {
        Layer::new().with(move |store: &mut SettingsStore| {
            for (key, value) in &table {
                store.set(key, value.clone());
            }
            Ok(())
        })
    }

    /// Read a TOML file into an explicit-set layer.
    ///
    /// The file is read here, once, not at apply time. Parse and I/O errors
    /// carry the path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayerfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LayerfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table: Table = toml::from_str(&content).map_err(|e| LayerfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_table(table))
    }

    /// Derive an explicit-set layer from any serializable source.
    ///
    /// `None` fields are skipped and top-level keys are uppercased to the
    /// settings naming convention, so a plain options struct maps onto
    /// `DEBUG`, `PROJECT_NAME` and friends without annotation.
    pub fn from_serialize<S: Serialize>(source: &S) -> Result<Self, LayerfigError> {
        let value = Value::try_from(source).map_err(|e| LayerfigError::InvalidValue {
            key: "<source>".into(),
            reason: e.to_string(),
        })?;
        let Value::Table(table) = value else {
            return Err(LayerfigError::InvalidValue {
                key: "<source>".into(),
                reason: "source did not serialize to a table".into(),
            });
        };
        let upper: Table = table
            .into_iter()
            .map(|(key, value)| (key.to_uppercase(), value))
            .collect();
        Ok(Self::from_table(upper))
    }

    pub(crate) fn apply_steps(
        &self,
        store: &mut SettingsStore,
        mut on_include: impl FnMut(&str, &mut SettingsStore) -> Result<(), LayerfigError>,
    ) -> Result<(), LayerfigError> {
        for step in &self.steps {
            match step {
                Step::Contribute(contributor) => contributor.contribute(store)?,
                Step::Include(name) => on_include(name, store)?,
            }
        }
        Ok(())
    }
}
