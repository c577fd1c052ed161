use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod input;
mod providers;
mod services;
mod store;
mod transcript;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::{ChatState, create_command_registry};
use crate::config::Config;
use crate::core::error::AgentError;
use crate::providers::openai::OpenAIProvider;
use crate::services::{WeatherClient, WikiClient};
use crate::store::Store;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "pchat=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<(), AgentError> {
    let config = Config::resolve(&args)?;
    let timeout = config.request_timeout();

    let provider = OpenAIProvider::with_endpoint(
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.model.clone(),
        timeout,
    )?;
    let weather = WeatherClient::new(
        config.weather_base_url.clone(),
        config.weather_api_key.clone(),
        timeout,
    )?;
    let wiki = WikiClient::new(config.wiki_base_url.clone(), timeout)?;

    let db_path = config.database_path();
    let store = Store::open(&db_path)?;
    tracing::debug!(db = %db_path.display(), model = %config.model, "session ready");

    let state = ChatState::new(Box::new(provider), weather, wiki, store, config.save_dir());
    let mut app = Application::new(state, create_command_registry());
    app.run().await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        display::display_error(&e.to_string());
        std::process::exit(1);
    }
}
