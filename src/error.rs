use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayerfigError {
    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("Missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<String>),

    #[error("Unknown layer '{name}' — registered layers: {}", .available.join(", "))]
    UnknownLayer { name: String, available: Vec<String> },

    #[error("Layer include cycle through '{0}'")]
    IncludeCycle(String),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("No layer selected — call .default_layer() or .selector_env() on the builder")]
    NoLayerSelected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_setting_names_key() {
        let err = LayerfigError::MissingSetting("ADMINS".into());
        assert!(err.to_string().contains("ADMINS"));
    }

    #[test]
    fn missing_settings_lists_all_keys() {
        let err = LayerfigError::MissingSettings(vec!["PROJECT_NAME".into(), "ADMINS".into()]);
        let msg = err.to_string();
        assert!(msg.contains("PROJECT_NAME"));
        assert!(msg.contains("ADMINS"));
    }

    #[test]
    fn unknown_layer_lists_alternatives() {
        let err = LayerfigError::UnknownLayer {
            name: "staging".into(),
            available: vec!["base".into(), "debug".into(), "prod".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("staging"));
        assert!(msg.contains("base"));
        assert!(msg.contains("prod"));
    }

    #[test]
    fn no_layer_selected_references_builder() {
        let err = LayerfigError::NoLayerSelected;
        assert!(err.to_string().contains("default_layer"));
    }
}
