//! codeshape CLI entry point.

use clap::Parser;
use codeshape::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Commands::Parse(args) if args.verbose);
    cli::init_logging(verbose);

    let exit_code = match cli.command {
        Commands::Parse(args) => match cli::run_parse(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                EXIT_ERROR
            }
        },
        Commands::Languages => match cli::run_languages() {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                EXIT_ERROR
            }
        },
    };

    std::process::exit(exit_code);
}
