mod app;
mod config;
mod error;
mod handlers;
mod index;
mod models;
mod nav;
mod parser;
mod render;
mod resolver;
mod source;
mod suggest;
mod tasks;

use app::App;
use config::Config;
use handlers::Interaction;
use log::{error, info};
use resolver::Resolver;
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    let source = source::from_config(&config)?;

    let catalog = tasks::loader::spawn_catalog_load(Arc::clone(&source), config.clone());
    let mut app = App::new(Resolver::new(source, &config), catalog);

    // loading page until the first view is ready
    handlers::publish(&app, &config.output_path).await?;

    // First argument is the page's query string, e.g. "?q=...&toggles=1,0"
    let initial = env::args().nth(1).unwrap_or_default();
    handlers::handle_interaction(&mut app, Interaction::Open(initial), &config.output_path).await;
    handlers::publish(&app, &config.output_path).await?;

    info!("Ready. Type a location, or toggle/view/open/suggest/up/down/select/pick/url/quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(interaction) = Interaction::parse(&line) else {
            continue;
        };
        if !handlers::handle_interaction(&mut app, interaction, &config.output_path).await {
            break;
        }
        if let Err(e) = handlers::publish(&app, &config.output_path).await {
            error!("Failed to write page: {}", e);
        }
    }

    Ok(())
}
