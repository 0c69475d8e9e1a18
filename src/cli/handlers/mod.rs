mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::model::{Candidate, FieldConfig, FieldKind, FormConfig, SortMode};
use crate::ops::listing::{group_by_category, visible_indices};
use crate::ops::typeahead::{Typeahead, TypeaheadOptions};
use crate::tui::app::Submission;

/// Error type for command handlers
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0}")]
    Terminal(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), CliError> {
    let json = cli.json;
    let cwd = std::env::current_dir()?;
    let form = cli.form.as_deref();

    match cli.command {
        None => cmd_run_form(form, &cwd, json),
        Some(cmd) => match cmd {
            // Init does not read a form
            Commands::Init(args) => cmd_init(args, &cwd),
            Commands::Fields => cmd_fields(form, &cwd, json),
            Commands::Options(args) => cmd_options(args, form, &cwd, json),
            Commands::Filter(args) => cmd_filter(args, form, &cwd, json),
            Commands::Check => cmd_check(form, &cwd, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load(form: Option<&Path>, cwd: &Path) -> Result<FormConfig, CliError> {
    let (config, _source) = config_io::load_form(form, cwd)?;
    Ok(config)
}

fn find_field<'a>(config: &'a FormConfig, id: &str) -> Result<&'a FieldConfig, CliError> {
    config
        .field(id)
        .ok_or_else(|| CliError::UnknownField(id.to_string()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Interactive form
// ---------------------------------------------------------------------------

fn cmd_run_form(form: Option<&Path>, cwd: &Path, json: bool) -> Result<(), CliError> {
    let config = load(form, cwd)?;
    if config.fields.is_empty() {
        return Err(ConfigError::Invalid("form has no fields".into()).into());
    }
    let submitted = crate::tui::run(config).map_err(|e| CliError::Terminal(e.to_string()))?;
    match submitted {
        Some(values) => print_submission(&values, json),
        None => {
            debug!("form closed without submitting");
            Ok(())
        }
    }
}

fn print_submission(values: &Submission, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(values);
    }
    for (id, value) in values {
        println!("{}: {}", id, value);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_fields(form: Option<&Path>, cwd: &Path, json: bool) -> Result<(), CliError> {
    let config = load(form, cwd)?;
    if json {
        let fields: Vec<FieldJson> = config.fields.iter().map(field_to_json).collect();
        return print_json(&fields);
    }
    for field in &config.fields {
        println!("{}", format_field_line(field));
    }
    Ok(())
}

fn cmd_options(args: OptionsArgs, form: Option<&Path>, cwd: &Path, json: bool) -> Result<(), CliError> {
    let config = load(form, cwd)?;
    let field = find_field(&config, &args.field)?;
    let sort = args.sort.unwrap_or(field.sort);

    let candidates = field.candidates();
    let order = visible_indices(&candidates, sort, None);
    let visible: Vec<&Candidate> = order.iter().map(|&i| &candidates[i]).collect();
    let groups = (sort == SortMode::Category).then(|| group_by_category(&candidates, &order));

    if json {
        return print_json(&OptionsJson {
            field: field.id.clone(),
            sort: sort.as_str().to_string(),
            candidates: visible.iter().map(|c| candidate_to_json(c)).collect(),
            groups: groups.as_deref().map(|g| groups_to_json(g, &visible)),
        });
    }
    for line in format_candidates(&visible, groups.as_deref()) {
        println!("{}", line);
    }
    Ok(())
}

/// Type `text` into a fresh widget for the field and report what its panel
/// would list. Free text is forced on so the text always reaches the filter.
fn cmd_filter(args: FilterArgs, form: Option<&Path>, cwd: &Path, json: bool) -> Result<(), CliError> {
    let config = load(form, cwd)?;
    let field = find_field(&config, &args.field)?;

    let mut options = TypeaheadOptions::from_field(field, &config.typeahead);
    options.allow_custom = true;
    options.disabled = false;
    options.max_length = None;
    if let Some(sort) = args.sort {
        options.sort = sort;
    }

    let mut typeahead = Typeahead::new("", field.candidates(), options);
    typeahead.focus();
    typeahead.set_draft(args.text.as_str());

    let visible: Vec<&Candidate> = typeahead.visible().collect();
    let custom = (visible.is_empty() && !args.text.is_empty()).then(|| args.text.clone());
    let groups = typeahead.groups();

    if json {
        return print_json(&FilterJson {
            field: field.id.clone(),
            text: args.text.clone(),
            filtered: typeahead.should_filter(),
            candidates: visible.iter().map(|c| candidate_to_json(c)).collect(),
            custom,
        });
    }

    if let Some(text) = custom {
        println!("no matches; Enter keeps \"{}\"", text);
        return Ok(());
    }
    if visible.is_empty() && field.kind == FieldKind::Suggest {
        println!("no suggestions for empty text");
        return Ok(());
    }
    for line in format_candidates(&visible, groups.as_deref()) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_check(form: Option<&Path>, cwd: &Path, json: bool) -> Result<(), CliError> {
    let (config, source) = config_io::load_form(form, cwd)?;
    if json {
        return print_json(&CheckJson {
            valid: true,
            source: source.to_string(),
            fields: config.fields.len(),
        });
    }
    println!(
        "ok: {} ({} field{})",
        source,
        config.fields.len(),
        if config.fields.len() == 1 { "" } else { "s" }
    );
    Ok(())
}
