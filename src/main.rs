use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{
    AddArgs, ConfigCommand, DeleteArgs, IngredientCommand, ListArgs, NotificationCommand,
    ResetArgs, ShowArgs, SummaryArgs, UpdateArgs,
};
use config::Config;
use foodcost_core::{DemoSeed, DemoStore, FileSlot, StoreOptions, SNAPSHOT_KEY};

#[derive(Parser)]
#[command(name = "foodcost")]
#[command(version)]
#[command(about = "Food cost demo data manager", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the records of a collection
    List(ListArgs),

    /// Show one record
    Show(ShowArgs),

    /// Add a record from a JSON object
    Add(AddArgs),

    /// Update fields of a record
    Update(UpdateArgs),

    /// Delete a record
    Delete(DeleteArgs),

    /// Manage ingredients
    Ingredient(IngredientCommand),

    /// Manage notifications
    Notification(NotificationCommand),

    /// Restore the demo data to its initial state
    Reset(ResetArgs),

    /// Show cost and inventory statistics
    Summary(SummaryArgs),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("FOODCOST_LOG")
                .unwrap_or_else(|_| "foodcost=warn,foodcost_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        Some(command) => {
            let mut store = open_store(&config)?;
            dispatch(command, &mut store, &config)?;

            if let Some(e) = store.last_persist_error() {
                eprintln!("Warning: changes were not saved: {}", e);
            }
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn dispatch(
    command: Commands,
    store: &mut DemoStore,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List(args) => args.run(store),
        Commands::Show(args) => args.run(store),
        Commands::Add(args) => args.run(store),
        Commands::Update(args) => args.run(store),
        Commands::Delete(args) => args.run(store),
        Commands::Ingredient(cmd) => cmd.run(store),
        Commands::Notification(cmd) => cmd.run(store),
        Commands::Reset(args) => args.run(store),
        Commands::Summary(args) => args.run(store),
        Commands::Config(cmd) => cmd.run(config),
    }
}

fn open_store(config: &Config) -> Result<DemoStore, Box<dyn std::error::Error>> {
    let slot = FileSlot::new(config.data_dir.value.clone(), SNAPSHOT_KEY)?;
    tracing::debug!("Using snapshot at {}", slot.path().display());

    let options = StoreOptions {
        low_stock_threshold: config.low_stock_threshold.value,
    };
    Ok(DemoStore::open(slot, DemoSeed, options))
}
