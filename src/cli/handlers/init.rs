use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;

use super::CliError;

/// Write the starter form into `dir`.
pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), CliError> {
    let path = config_io::write_template(dir, args.force)?;
    println!("Wrote {}", path.display());
    println!("Edit the [[fields]] entries, then run `stackpick` to fill in the form.");
    Ok(())
}
