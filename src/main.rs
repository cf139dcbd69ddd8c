mod cli;
mod config;
mod content;
mod export;
mod listing;
mod notice;
mod paths;
mod poll;
mod pretty;
mod render;
mod shell;
mod vault;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
		.init();
	cli.run().await
}
