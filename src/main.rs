use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use db::open;
use types::OutputFmt;

mod cli;
mod commands;
mod dates;
mod db;
mod models;
mod notify;
mod report;
mod store;
mod types;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let fmt = if cli.json {
        OutputFmt::Json
    } else {
        OutputFmt::Text
    };

    let pool = open("./liftlog.db").await?;

    match cli.cmd {
        Commands::Workout(cmd) => commands::workout::handle(cmd, &pool, fmt).await?,
        Commands::Routine(cmd) => commands::routine::handle(cmd, &pool, fmt).await?,
        Commands::Report(cmd) => commands::report::handle(cmd, &pool, fmt).await?,
        Commands::Config(cmd) => commands::config::handle(cmd).await?,
        Commands::Db(cmd) => commands::db::handle(cmd, &pool).await?,
    }

    Ok(())
}
