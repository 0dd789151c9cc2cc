//! DualTab admin console entry point.

mod api;
mod app;
mod config;
mod error;
mod events;
mod logger;
mod ordering;
mod state;
mod ui;

use crate::app::App;
use crate::config::Config;
use anyhow::Result;
use clap::{App as ClapApp, Arg};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapApp::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal admin console for the DualTab new-tab backend")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Path to the configuration directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("api-url")
                .short("u")
                .long("api-url")
                .value_name("URL")
                .help("Override the backend API base URL")
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(api_url) = matches.value_of("api-url") {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }

    App::start(config).await
}
