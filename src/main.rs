use clap::Parser;
use color_eyre::Result;
use domify::{
    Config, Profile, Store,
    cli::{Cli, Commands},
};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // Profile comes solely from the --dev flag
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path, profile)?,
        None => Config::load_with_profile(profile)?,
    };

    let db_path = config.get_database_path();
    let store = Store::open(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = domify::tui::App::new(config, store, profile)?;
            domify::tui::run_event_loop(app)?;
        }
        Commands::AddGrocery { name } => {
            domify::cli::handle_add_grocery(name, &store)?;
        }
        Commands::AddTodo { text } => {
            domify::cli::handle_add_todo(text, &store)?;
        }
        Commands::ParseReceipt { file, import } => {
            domify::cli::handle_parse_receipt(file, import, &store)?;
        }
    }

    Ok(())
}
