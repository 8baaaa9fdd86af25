use clap::Parser;
use console::style;

use ragstore::cli::commands;
use ragstore::cli::output::get_formatter;
use ragstore::cli::{Cli, Commands};
use ragstore::models::{Config, OutputFormat};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{} failed to load config, using defaults: {}",
                style("Warning:").yellow().bold(),
                e
            );
            Config::default()
        }
    };

    let format = cli.format.unwrap_or(config.search.default_format);

    if let Err(e) = run_command(cli.command, config, format).await {
        let formatter = get_formatter(format);
        eprintln!("{}", formatter.format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    config: Config,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Status => commands::handle_status(config, format).await,
        Commands::Create(args) => commands::handle_create(args, config, format).await,
        Commands::Ingest(args) => commands::handle_ingest(args, config, format).await,
        Commands::Query(args) => commands::handle_query(args, config, format).await,
        Commands::Collections => commands::handle_collections(config, format).await,
        Commands::Items(args) => commands::handle_items(args, config, format).await,
        Commands::Delete(args) => commands::handle_delete(args, config, format).await,
    }
}
