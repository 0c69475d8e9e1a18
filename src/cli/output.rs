use serde::Serialize;

use crate::model::{Candidate, FieldConfig};
use crate::ops::listing::Group;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct FieldJson {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub sort: String,
    pub allow_custom: bool,
    pub required: bool,
    pub disabled: bool,
    pub candidates: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

#[derive(Serialize)]
pub struct CandidateJson {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub name: String,
    pub candidates: Vec<CandidateJson>,
}

#[derive(Serialize)]
pub struct OptionsJson {
    pub field: String,
    pub sort: String,
    pub candidates: Vec<CandidateJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupJson>>,
}

#[derive(Serialize)]
pub struct FilterJson {
    pub field: String,
    pub text: String,
    pub filtered: bool,
    pub candidates: Vec<CandidateJson>,
    /// Set when nothing matches and Enter would keep the typed text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
}

#[derive(Serialize)]
pub struct CheckJson {
    pub valid: bool,
    pub source: String,
    pub fields: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn field_to_json(field: &FieldConfig) -> FieldJson {
    FieldJson {
        id: field.id.clone(),
        label: field.label.clone(),
        kind: field.kind.as_str().to_string(),
        sort: field.sort.as_str().to_string(),
        allow_custom: field.allows_custom(),
        required: field.required,
        disabled: field.disabled,
        candidates: field.candidates().len(),
        max_length: field.max_length,
    }
}

pub fn candidate_to_json(candidate: &Candidate) -> CandidateJson {
    CandidateJson {
        value: candidate.value.clone(),
        label: candidate.display_label().to_string(),
        category: candidate.category.clone(),
        icon: candidate.icon.clone(),
    }
}

/// Groups carry positions into `visible`; resolve them to candidates.
pub fn groups_to_json(groups: &[Group], visible: &[&Candidate]) -> Vec<GroupJson> {
    groups
        .iter()
        .map(|g| GroupJson {
            name: g.name.clone(),
            candidates: g
                .rows
                .iter()
                .filter_map(|&row| visible.get(row))
                .map(|c| candidate_to_json(c))
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One line per field: `id  kind  sort  N candidates  [flags]`
pub fn format_field_line(field: &FieldConfig) -> String {
    let mut flags = Vec::new();
    if field.required {
        flags.push("required");
    }
    if field.allows_custom() {
        flags.push("free text");
    }
    if field.disabled {
        flags.push("disabled");
    }
    let count = field.candidates().len();
    let mut line = format!(
        "{:<14} {:<8} {:<12} {} candidate{}",
        field.id,
        field.kind.as_str(),
        field.sort.as_str(),
        count,
        if count == 1 { "" } else { "s" }
    );
    if !flags.is_empty() {
        line.push_str(&format!("  [{}]", flags.join(", ")));
    }
    line
}

/// A candidate as the panel would show it, with the value when it differs
/// from the label.
pub fn format_candidate_line(candidate: &Candidate, indent: usize) -> String {
    let mut line = " ".repeat(indent);
    if let Some(icon) = &candidate.icon {
        line.push_str(icon);
        line.push(' ');
    }
    line.push_str(candidate.display_label());
    if candidate.display_label() != candidate.value {
        line.push_str(&format!("  ({})", candidate.value));
    }
    line
}

/// Flat or grouped candidate listing
pub fn format_candidates(visible: &[&Candidate], groups: Option<&[Group]>) -> Vec<String> {
    match groups {
        Some(groups) => groups
            .iter()
            .flat_map(|g| {
                std::iter::once(format!("{}:", g.name)).chain(
                    g.rows
                        .iter()
                        .filter_map(|&row| visible.get(row))
                        .map(|c| format_candidate_line(c, 2)),
                )
            })
            .collect(),
        None => visible.iter().map(|c| format_candidate_line(c, 0)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config_io::{TEMPLATE, parse_form};
    use crate::model::SortMode;
    use crate::ops::listing::{group_by_category, visible_indices};
    use pretty_assertions::assert_eq;

    #[test]
    fn field_lines() {
        let config = parse_form(TEMPLATE).unwrap();
        assert_eq!(
            format_field_line(config.field("name").unwrap()),
            "name           suggest  custom       5 candidates  [required, free text]"
        );
        assert_eq!(
            format_field_line(config.field("language").unwrap()),
            "language       dropdown alphabetical 3 candidates"
        );
    }

    #[test]
    fn candidate_line_shows_value_when_label_differs() {
        let c = Candidate::new("next", "Next.js").with_icon("N");
        assert_eq!(format_candidate_line(&c, 2), "  N Next.js  (next)");
        assert_eq!(format_candidate_line(&Candidate::plain("Vue.js"), 0), "Vue.js");
    }

    #[test]
    fn grouped_listing() {
        let candidates = vec![
            Candidate::plain("React").with_category("Web"),
            Candidate::plain("Flutter").with_category("Mobile"),
            Candidate::plain("Angular").with_category("Web"),
        ];
        let order = visible_indices(&candidates, SortMode::Category, None);
        let visible: Vec<&Candidate> = order.iter().map(|&i| &candidates[i]).collect();
        let groups = group_by_category(&candidates, &order);
        assert_eq!(
            format_candidates(&visible, Some(&groups)),
            vec!["Mobile:", "  Flutter", "Web:", "  Angular", "  React"]
        );

        let json = serde_json::to_value(groups_to_json(&groups, &visible)).unwrap();
        assert_eq!(json[1]["name"], "Web");
        assert_eq!(json[1]["candidates"][0]["value"], "Angular");
        assert!(json[1]["candidates"][0].get("icon").is_none());
    }
}
