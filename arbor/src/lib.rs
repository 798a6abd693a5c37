mod config;
mod paths;
mod shell;

use std::path::PathBuf;

use arbor_state::TreeStore;
use arbor_tree::flatten_ids;
use arbor_view::{ForestView, visible_rows};
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, info};

pub use crate::config::{Config, ConfigError, FetchConfig};
pub use crate::paths::{Paths, PathsError};
pub use crate::shell::{CommandParseError, HELP, ShellCommand, ShellError, run_shell};

#[derive(Parser, Debug)]
#[command(name = "arbor", version, about = "Browse and edit a lazily loaded tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file, or a directory holding arbor.toml
    #[arg(long = "config", env = "ARBOR_CONFIG", global = true)]
    pub config_path: Option<PathBuf>,

    #[arg(long = "log", global = true, default_value = "info")]
    pub log: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the configured tree
    Show {
        /// Print visible rows as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// List every node id, depth first
    Ids,
    /// Edit the tree interactively, one command per line
    Shell,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("failed to encode rows: {0}")]
    Json(#[from] serde_json::Error),
}

/// `--config` (or `ARBOR_CONFIG`) when given, otherwise `arbor.toml` in the
/// user config dir, otherwise built-in defaults.
pub async fn get_config(cli: &Cli) -> Result<Config, AppError> {
    if let Some(path) = &cli.config_path {
        return Ok(Config::load(path).await?);
    }
    let default_path = match Paths::create() {
        Ok(paths) => paths.config_file(),
        Err(error) => {
            debug!(%error, "no config dir");
            return Ok(Config::default());
        }
    };
    if default_path.exists() {
        Ok(Config::load(&default_path).await?)
    } else {
        debug!(path = %default_path.display(), "no config file, using defaults");
        Ok(Config::default())
    }
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config = get_config(&cli).await?;
    match cli.command {
        Command::Show { json } => cmd_show(config, json),
        Command::Ids => cmd_ids(config),
        Command::Shell => cmd_shell(config).await,
    }
}

fn cmd_show(config: Config, json: bool) -> Result<(), AppError> {
    if json {
        let rows = visible_rows(&config.forest);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", ForestView(&config.forest));
    }
    Ok(())
}

fn cmd_ids(config: Config) -> Result<(), AppError> {
    for id in flatten_ids(&config.forest) {
        println!("{id}");
    }
    Ok(())
}

async fn cmd_shell(config: Config) -> Result<(), AppError> {
    let Config {
        path,
        fetch,
        forest,
    } = config;
    info!(
        config = ?path,
        delay = ?fetch.delay,
        timeout = ?fetch.timeout,
        "starting shell"
    );
    let store = TreeStore::new(forest, fetch.fetcher());
    run_shell(store, tokio::io::stdin(), tokio::io::stdout()).await?;
    Ok(())
}
