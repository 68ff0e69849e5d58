//! cspect CLI entry point.

use clap::Parser;
use cspect::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze(args) => cli::run_analyze(&args),
        Commands::Structure(args) => cli::run_structure(&args),
        Commands::Summary(args) => cli::run_summary(&args),
        Commands::FindClass(args) => cli::run_find_class(&args),
        Commands::FindElements(args) => cli::run_find_elements(&args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
