use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::candidate::{Candidate, FieldKind, SortMode};

/// Configuration from stackpick.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub form: FormInfo,
    #[serde(default)]
    pub typeahead: TypeaheadConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeaheadConfig {
    /// Delay between losing focus and the panel actually closing.
    /// Default: see src/templates/stackpick.toml
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
    /// Panel rows shown before the list scrolls.
    /// Default: see src/templates/stackpick.toml
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        TypeaheadConfig {
            close_delay_ms: default_close_delay_ms(),
            max_visible: default_max_visible(),
        }
    }
}

impl TypeaheadConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

/// Default: see src/templates/stackpick.toml
fn default_close_delay_ms() -> u64 {
    300
}

/// Default: see src/templates/stackpick.toml
fn default_max_visible() -> usize {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

/// One input on the form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub sort: SortMode,
    /// `None` means "whatever the kind implies": suggest fields accept
    /// free text, dropdowns do not.
    #[serde(default)]
    pub allow_custom: Option<bool>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Initial committed value
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub options: Vec<Candidate>,
    /// Shorthand for options whose label is their value
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl FieldConfig {
    pub fn allows_custom(&self) -> bool {
        self.allow_custom
            .unwrap_or(matches!(self.kind, FieldKind::Suggest))
    }

    /// Full candidate set: explicit options first, then suggestions
    pub fn candidates(&self) -> Vec<Candidate> {
        self.options
            .iter()
            .cloned()
            .chain(self.suggestions.iter().cloned().map(Candidate::plain))
            .collect()
    }
}

impl FormConfig {
    pub fn field(&self, id: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_sections() {
        let config: FormConfig = toml::from_str(
            r#"[form]
name = "x"
"#,
        )
        .unwrap();
        assert_eq!(config.typeahead.close_delay_ms, 300);
        assert_eq!(config.typeahead.max_visible, 8);
        assert_eq!(config.typeahead.close_delay(), Duration::from_millis(300));
        assert!(config.fields.is_empty());
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn allow_custom_follows_kind_unless_set() {
        let config: FormConfig = toml::from_str(
            r#"[form]
name = "x"

[[fields]]
id = "name"
label = "Name"
kind = "suggest"

[[fields]]
id = "lang"
label = "Language"

[[fields]]
id = "style"
label = "Styling"
allow_custom = true
"#,
        )
        .unwrap();
        assert!(config.field("name").unwrap().allows_custom());
        assert!(!config.field("lang").unwrap().allows_custom());
        assert!(config.field("style").unwrap().allows_custom());
        assert!(config.field("missing").is_none());
    }

    #[test]
    fn candidates_merge_options_and_suggestions() {
        let config: FormConfig = toml::from_str(
            r#"[form]
name = "x"

[[fields]]
id = "fw"
label = "Framework"
options = [{ value = "React", label = "React", category = "frontend" }]
suggestions = ["Expo"]
"#,
        )
        .unwrap();
        let candidates = config.field("fw").unwrap().candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].category.as_deref(), Some("frontend"));
        assert_eq!(candidates[1], Candidate::plain("Expo"));
    }
}
