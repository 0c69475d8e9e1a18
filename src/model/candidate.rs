use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One selectable entry in a typeahead list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Value reported to the form when this entry is chosen
    pub value: String,
    /// Text shown in the panel. Defaults to the value when omitted.
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Candidate {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Candidate {
            value: value.into(),
            label: label.into(),
            category: None,
            icon: None,
        }
    }

    /// A candidate whose label is its value (suggestion lists)
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Candidate {
            label: value.clone(),
            value,
            category: None,
            icon: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Label used for display and ordering (falls back to the value)
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.value
        } else {
            &self.label
        }
    }

    /// Case-insensitive substring match against label, value, and category.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.display_label().to_lowercase().contains(needle)
            || self.value.to_lowercase().contains(needle)
            || self
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(needle))
    }
}

/// Ordering applied to the candidate set before filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Alphabetical,
    Category,
    /// Keep the order the candidates were supplied in
    #[default]
    Custom,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Alphabetical => "alphabetical",
            SortMode::Category => "category",
            SortMode::Custom => "custom",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alphabetical" | "alpha" => Ok(SortMode::Alphabetical),
            "category" => Ok(SortMode::Category),
            "custom" | "none" => Ok(SortMode::Custom),
            other => Err(format!(
                "unknown sort mode '{}' (expected alphabetical, category, or custom)",
                other
            )),
        }
    }
}

/// Which flavour of typeahead a field is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Combo-box: shows the full list on open, filters only while editing
    #[default]
    Dropdown,
    /// Free-text input with a suggestion list that only shows matches
    Suggest,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Dropdown => "dropdown",
            FieldKind::Suggest => "suggest",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_falls_back_to_value() {
        let c = Candidate::new("ts", "");
        assert_eq!(c.display_label(), "ts");
        let c = Candidate::new("ts", "TypeScript");
        assert_eq!(c.display_label(), "TypeScript");
    }

    #[test]
    fn matches_label_value_and_category() {
        let c = Candidate::new("next", "Next.js").with_category("Frontend");
        assert!(c.matches("next.j"));
        assert!(c.matches("next"));
        assert!(c.matches("front"));
        assert!(!c.matches("vue"));
    }

    #[test]
    fn matches_without_category() {
        let c = Candidate::plain("Figma");
        assert!(c.matches("fig"));
        assert!(!c.matches("other"));
    }

    #[test]
    fn sort_mode_parses_aliases() {
        assert_eq!("Alphabetical".parse::<SortMode>(), Ok(SortMode::Alphabetical));
        assert_eq!("alpha".parse::<SortMode>(), Ok(SortMode::Alphabetical));
        assert_eq!("category".parse::<SortMode>(), Ok(SortMode::Category));
        assert_eq!("none".parse::<SortMode>(), Ok(SortMode::Custom));
        assert!("random".parse::<SortMode>().is_err());
    }

    #[test]
    fn candidate_deserializes_with_optional_fields() {
        let c: Candidate = toml::from_str(r#"value = "Vue.js""#).unwrap();
        assert_eq!(c.value, "Vue.js");
        assert_eq!(c.display_label(), "Vue.js");
        assert!(c.category.is_none());
        assert!(c.icon.is_none());
    }
}
