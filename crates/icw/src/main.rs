use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            error_exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli)?;

    match &cli.command {
        Commands::Lists => commands::lists::lists(&ctx),
        Commands::Newlist { name } => commands::lists::newlist(&ctx, name),
        Commands::Droplist { name, yes } => commands::lists::droplist(&ctx, name, *yes),
        Commands::Add { list, tokens } => commands::add::execute(&ctx, list, tokens),
        Commands::Modify { id, tokens } => commands::modify::execute(&ctx, *id, tokens),
        Commands::Done { ids } => commands::done::execute(&ctx, ids),
        Commands::Delete { ids, yes } => commands::delete::execute(&ctx, ids, *yes),
        Commands::Move { id, list } => commands::mv::execute(&ctx, *id, list),
        Commands::Show { id } => commands::show::execute(&ctx, *id),
        Commands::Report { name, constraints } => {
            commands::report::execute(&ctx, name.as_deref(), constraints)
        }
        Commands::Cleanup { list, yes } => commands::cleanup::execute(&ctx, list, *yes),
        Commands::Export { constraints } => commands::export::execute(&ctx, constraints),
        Commands::Calculate { expression } => commands::calculate::execute(&ctx, expression),
        Commands::Info { topic } => commands::info::execute(&ctx, *topic),
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Store(_) => ExitCode::from(4),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::Change(_) => ExitCode::from(1),
        CommandError::Date(_) => ExitCode::from(1),
        CommandError::Json(_) => ExitCode::from(1),
        CommandError::Usage(_) => ExitCode::from(1),
    }
}
