mod cli;
mod commands;
mod config;
mod navigator;
mod observability;
mod output;

use std::sync::Arc;

use anyhow::Result;
use bookportal_client::Portal;
use clap::Parser;

use cli::{Cli, Commands, ConfigCommands};
use commands::App;
use navigator::TerminalNavigator;
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::resolve(cli.config.as_deref(), cli.server.as_deref())?;
    observability::init_tracing(&config.logging.level);

    let storage = config::session_storage(&config, &cli.profile)?;
    let session_file = storage.path().to_path_buf();
    let portal = Portal::builder(config)
        .with_session_storage(storage)
        .with_navigator(Arc::new(TerminalNavigator::new(&cli.profile)))
        .build()?;
    let app = App {
        portal,
        format: cli.format.unwrap_or_default(),
        profile: cli.profile.clone(),
    };

    match &cli.command {
        Commands::Login(args) => commands::auth::login(&app, args).await?,
        Commands::Register(args) => commands::auth::register(&app, args).await?,
        Commands::Logout => commands::auth::logout(&app)?,
        Commands::Whoami => commands::auth::whoami(&app)?,
        Commands::Profile(args) => commands::auth::profile(&app, &args.command).await?,
        Commands::Books(args) => commands::books::run(&app, &args.command).await?,
        Commands::Feedback(args) => commands::feedback::run(&app, &args.command).await?,
        Commands::Users(args) => commands::users::run(&app, &args.command).await?,
        Commands::Dashboard => commands::portal::dashboard(&app).await?,
        Commands::Open(args) => commands::portal::open(&app, &args.path)?,
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => commands::portal::show_config(&app, &session_file)?,
        },
    }

    Ok(())
}
