mod api;
mod app;
mod config;
mod draft;
mod error;
mod logger;
mod state;
mod utils;

use crate::app::App;
use crate::config::Config;
use anyhow::Result;
use clap::{App as Cli, Arg};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIRECTORY")
                .help("Use a custom configuration directory")
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    App::start(config).await?;
    Ok(())
}
