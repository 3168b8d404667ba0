//! Layered, chainable settings for Rust applications. Register named layers,
//! pick one, and go.
//!
//! Layerfig resolves application settings by chaining named layers — `base`,
//! `debug`, `prod`, whatever your deployment story needs — while tracking,
//! for every key, whether its current value was chosen explicitly or filled
//! in as a default. That one distinction is what makes chaining safe: a
//! generic layer can default a hundred keys without ever clobbering the one
//! a specific layer actually decided.
//!
//! ```ignore
//! let settings = Layerfig::builder()
//!     .registry(profiles::builtin("myapp", "/srv/myapp"))
//!     .selector_env("MYAPP_SETTINGS_LAYER")
//!     .default_layer("default")
//!     .env_prefix("MYAPP")
//!     .load()?;
//!
//! let debug = settings.get_bool("DEBUG")?;
//! ```
//!
//! # Explicit versus default
//!
//! Every write to a [`SettingsStore`] goes through one of two methods:
//!
//! - [`set`](SettingsStore::set) — "I choose this value." Unconditional, and
//!   the key becomes explicit.
//! - [`set_default`](SettingsStore::set_default) — "Use this if nobody chose
//!   one." A no-op when the key exists; otherwise the key is marked
//!   defaulted and stays overridable.
//!
//! [`explicit()`](SettingsStore::explicit) reports which case a key is in,
//! and [`merge_from()`](SettingsStore::merge_from) copies only absent keys,
//! so combining stores can never demote an explicit choice.
//!
//! # Layer chaining
//!
//! A [`Layer`] is an ordered sequence of steps: contributor functions (the
//! [`Contribute`] trait, usually closures) and includes of other named
//! layers. The convention is that a layer writes its own settings first and
//! includes the more generic layer after, so its explicit values are already
//! in the store and protected when the generic defaults run:
//!
//! ```ignore
//! let prod = Layer::new()
//!     .with(|store: &mut SettingsStore| {
//!         store.set("DEBUG", false);
//!         Ok(())
//!     })
//!     .include("base");
//! ```
//!
//! Layer names resolve through an explicit [`LayerRegistry`] supplied by the
//! host application. There is no dynamic module lookup: an unknown name
//! fails with the list of registered layers, and include cycles are detected
//! rather than recursed into.
//!
//! Layers can also come from data instead of code:
//! [`Layer::from_file`] reads a TOML file, [`Layer::from_table`] wraps a
//! parsed table, and [`Layer::from_serialize`] derives one from any
//! `Serialize` source (skipping `None` fields).
//!
//! # Precedence
//!
//! ```text
//! Layer chain defaults       set_default() in any layer
//!        ↑ overridden by
//! Layer chain choices        set() in the most specific layer to run
//!        ↑ overridden by
//! Environment vars           PREFIX__KEY
//!        ↑ overridden by
//! Overrides                  .override_value()
//! ```
//!
//! Environment variables and programmatic overrides are applied as explicit
//! sets on top of the chain: they come from the operator, who outranks every
//! layer author.
//!
//! # Selecting the active layer
//!
//! [`selector_env()`](LayerfigBuilder::selector_env) names an environment
//! variable whose value picks the layer at load time;
//! [`default_layer()`](LayerfigBuilder::default_layer) is the fallback. With
//! neither, loading fails with an error naming both builder methods.
//!
//! # Required settings
//!
//! Loading is one-shot and fail-fast: [`require()`](LayerfigBuilder::require)
//! lists keys that must exist once everything has been applied, and a
//! missing one aborts the pass with an error naming every absentee. There
//! are no retries; a misconfigured process must not start.
//!
//! # Conventions included
//!
//! - [`DirLayout`] derives a conventional `etc/lib/src/var` project tree
//!   from a single base path, every entry a `set_default` so explicit
//!   overrides re-route their children. Path derivation only; no directory
//!   is created.
//! - [`SecretFile`] fills `SECRET_KEY` from a file under `CONF_DIR` when no
//!   layer provided one.
//! - [`profiles`] wires the conventional `base` → `debug`/`prod` →
//!   `default` chain into a ready-made registry.
//!
//! # Error handling
//!
//! All fallible operations return [`LayerfigError`]. Errors are designed to
//! be user-facing: missing settings name the key, unknown layers list the
//! registered ones, and missing prerequisites reference the builder method
//! to call. See the [`error`] module for the full set.

pub mod error;
pub mod profiles;

mod builder;
mod dirs;
mod env;
mod layer;
mod registry;
mod resolve;
mod secret;
mod store;

#[cfg(test)]
mod fixtures;

pub use builder::{Layerfig, LayerfigBuilder};
pub use dirs::DirLayout;
pub use error::LayerfigError;
pub use layer::{Contribute, Layer};
pub use registry::LayerRegistry;
pub use secret::SecretFile;
pub use store::SettingsStore;
