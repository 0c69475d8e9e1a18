use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::model::FieldKind;
use crate::model::config::FormConfig;

/// File name looked up in the working directory
pub const FORM_FILE: &str = "stackpick.toml";

/// Starter form written by `stackpick init` and used when no file exists
pub const TEMPLATE: &str = include_str!("../templates/stackpick.toml");

/// Upper bound for `typeahead.close_delay_ms`
const MAX_CLOSE_DELAY_MS: u64 = 5000;

/// Error type for form config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse form config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid form config: {0}")]
    Invalid(String),
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where a loaded form came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSource {
    File(PathBuf),
    BuiltIn,
}

impl std::fmt::Display for FormSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormSource::File(path) => write!(f, "{}", path.display()),
            FormSource::BuiltIn => f.write_str("built-in template"),
        }
    }
}

/// Resolve the form file: an explicit path wins, then `stackpick.toml` in
/// `cwd`, else None (use the built-in template).
pub fn discover_form(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidate = cwd.join(FORM_FILE);
    candidate.is_file().then_some(candidate)
}

/// Load and validate a form from the resolved location.
pub fn load_form(explicit: Option<&Path>, cwd: &Path) -> Result<(FormConfig, FormSource), ConfigError> {
    let (config, source) = match discover_form(explicit, cwd) {
        Some(path) => (read_form(&path)?, FormSource::File(path)),
        None => (parse_form(TEMPLATE)?, FormSource::BuiltIn),
    };
    info!(source = %source, fields = config.fields.len(), "form loaded");
    Ok((config, source))
}

/// Read and validate a form file.
pub fn read_form(path: &Path) -> Result<FormConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_form(&text)
}

/// Parse and validate form TOML.
pub fn parse_form(text: &str) -> Result<FormConfig, ConfigError> {
    let config: FormConfig = toml::from_str(text)?;
    validate_form(&config)?;
    Ok(config)
}

/// Check the invariants serde cannot express.
pub fn validate_form(config: &FormConfig) -> Result<(), ConfigError> {
    if config.typeahead.close_delay_ms > MAX_CLOSE_DELAY_MS {
        return Err(ConfigError::Invalid(format!(
            "typeahead.close_delay_ms must be at most {} (got {})",
            MAX_CLOSE_DELAY_MS, config.typeahead.close_delay_ms
        )));
    }

    let mut seen = HashSet::new();
    for field in &config.fields {
        if field.id.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "field '{}' has an empty id",
                field.label
            )));
        }
        if !seen.insert(field.id.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate field id: {}",
                field.id
            )));
        }
        if field.kind == FieldKind::Suggest && field.allow_custom == Some(false) {
            return Err(ConfigError::Invalid(format!(
                "field '{}': suggest fields always accept free text",
                field.id
            )));
        }
        if field.max_length == Some(0) {
            return Err(ConfigError::Invalid(format!(
                "field '{}': max_length must be positive",
                field.id
            )));
        }
    }
    Ok(())
}

/// Write the starter form into `dir`. Refuses to overwrite unless `force`.
pub fn write_template(dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = dir.join(FORM_FILE);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path));
    }
    fs::write(&path, TEMPLATE).map_err(|e| ConfigError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}
