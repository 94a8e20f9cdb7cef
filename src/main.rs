use clap::Parser;
use digisafe::cli::commands;
use digisafe::cli::{load_settings, output, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // A broken settings file is reported by the command itself; logging
    // just falls back to the default filter.
    let log_level = load_settings(&cli).ok().and_then(|s| s.log_level);
    digisafe::logging::init(log_level.as_deref());

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Status => commands::status::execute(&cli),
        Commands::List { ref search } => commands::list::execute(&cli, search.as_deref()),
        Commands::Add {
            ref name,
            ref username,
            ref notes,
            generate,
        } => commands::add::execute(&cli, name, username, notes, generate),
        Commands::AddFile {
            ref name,
            ref path,
            ref notes,
        } => commands::add_file::execute(&cli, name, path, notes),
        Commands::Get {
            ref name,
            show,
            copy,
        } => commands::get::execute(&cli, name, show, copy),
        Commands::Export { ref name, ref dest } => commands::export::execute(&cli, name, dest),
        Commands::Delete { ref name, force } => commands::delete::execute(&cli, name, force),
        Commands::Generate { length, no_symbols } => {
            commands::generate::execute(&cli, length, no_symbols)
        }
        Commands::Reset { force } => commands::reset::execute(&cli, force),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
