use clap::Parser;
use stackpick::cli::commands::Cli;
use stackpick::cli::{handlers, logging};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_file.as_deref(), cli.command.is_none()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
