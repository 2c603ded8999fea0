//! Command-line interface for shelf.
//!
//! Launches the interactive menu or the web form, and prints the resolved
//! configuration or catalog statistics.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::core::CatalogStore;

pub mod menu;

pub use menu::{Menu, MenuChoice};

/// shelf - Library catalog and lending tracker
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog snapshot file (overrides the config file)
    #[arg(short, long, global = true, env = "SHELF_DATA")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive numbered menu (default)
    Menu,

    /// Serve the web form
    Serve {
        /// Address to bind to (defaults to the configured server address)
        #[arg(short, long)]
        address: Option<String>,
    },

    /// Show catalog statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command.unwrap_or(Commands::Menu) {
            Commands::Menu => run_menu(self.data),
            Commands::Serve { address } => serve(self.data, address).await,
            Commands::Stats { json } => show_stats(self.data, json),
            Commands::Config => show_config(),
        }
    }
}

/// Resolve the snapshot path: explicit flag first, then configuration
fn data_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(path),
        None => crate::config::data_file(),
    }
}

fn open_store(flag: Option<PathBuf>) -> Result<CatalogStore> {
    let path = data_path(flag)?;
    CatalogStore::open(&path)
        .with_context(|| format!("Failed to open catalog: {}", path.display()))
}

/// Run the interactive menu on stdin/stdout
fn run_menu(data: Option<PathBuf>) -> Result<()> {
    let mut store = open_store(data)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&mut store, stdin.lock(), stdout.lock())
        .run()
        .context("Terminal I/O failed")
}

/// Serve the web form until interrupted
async fn serve(data: Option<PathBuf>, address: Option<String>) -> Result<()> {
    let store = open_store(data)?;
    let address = match address {
        Some(address) => address,
        None => crate::config::config()?.address.clone(),
    };

    crate::web::serve(store, &address).await
}

/// Print catalog statistics
fn show_stats(data: Option<PathBuf>, json: bool) -> Result<()> {
    let store = open_store(data)?;
    let stats = store.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Catalog: {}", store.path().display());
    println!("Books:            {}", stats.total_books);
    println!("Copies:           {}", stats.total_copies);
    println!("Available copies: {}", stats.available_copies);
    println!("Members:          {}", stats.total_members);
    println!("Active loans:     {}", stats.active_loans);

    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let config = crate::config::config()?;

    println!("Resolved configuration:");
    println!("  Home:        {}", config.home.display());
    println!("  Data file:   {}", config.data_file.display());
    println!("  Address:     {}", config.address);
    match &config.config_file {
        Some(path) => println!("  Config file: {}", path.display()),
        None => println!("  Config file: (none, using env vars or defaults)"),
    }

    Ok(())
}
