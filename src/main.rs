mod cli;
mod core;
mod logging;
mod repl;
mod tui;

use clap::Parser;

use crate::cli::Cli;
use crate::core::error::BoardError;

fn run() -> Result<(), BoardError> {
    let args = Cli::parse();
    logging::init(args.log_file.as_deref())?;
    let config = args.session_config()?;

    if args.plain {
        repl::run(config, args.start)
    } else {
        tui::run(config, args.start)
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
