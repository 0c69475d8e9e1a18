use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::SortMode;

#[derive(Parser)]
#[command(name = "stackpick", about = concat!("stackpick v", env!("CARGO_PKG_VERSION"), " - pick a project stack from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Form definition to use (default: ./stackpick.toml, else the built-in form)
    #[arg(short = 'f', long = "form", global = true)]
    pub form: Option<PathBuf>,

    /// Write logs to this file (level from STACKPICK_LOG)
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the form's fields
    Fields,
    /// Show a field's candidates in panel order
    Options(OptionsArgs),
    /// Show which candidates remain after typing TEXT into a field
    Filter(FilterArgs),
    /// Validate the form definition
    Check,
    /// Write a starter stackpick.toml in the current directory
    Init(InitArgs),
}

#[derive(Args)]
pub struct OptionsArgs {
    /// Field id
    pub field: String,
    /// Override the field's sort mode (alphabetical, category, custom)
    #[arg(long)]
    pub sort: Option<SortMode>,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Field id
    pub field: String,
    /// Text to type into the field
    pub text: String,
    /// Override the field's sort mode (alphabetical, category, custom)
    #[arg(long)]
    pub sort: Option<SortMode>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing stackpick.toml
    #[arg(long)]
    pub force: bool,
}
