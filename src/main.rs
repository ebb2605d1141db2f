use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use kubechat_core::{ChatBackend, Config, HttpChatClient};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser, Debug)]
#[command(name = "kubechat")]
#[command(about = "Chat with a Kubernetes AI assistant from the terminal", version)]
struct Cli {
    /// Chat endpoint to POST questions to (overrides the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Persist --endpoint to the config file before starting
    #[arg(long, requires = "endpoint")]
    save: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(endpoint) = cli.endpoint.clone() {
        config.endpoint = Some(endpoint);
        if cli.save {
            config.save().context("Failed to save config")?;
        }
    }

    let level = logging::level_for(cli.verbose, config.log_level.as_deref());
    let log_path = logging::init(&level)?;

    let client = match config.timeout() {
        Some(timeout) => HttpChatClient::with_timeout(config.endpoint(), timeout)?,
        None => HttpChatClient::new(config.endpoint()),
    };
    let endpoint = client.endpoint().to_string();
    tracing::info!(log = %log_path.display(), %endpoint, "starting kubechat");

    let backend: Arc<dyn ChatBackend> = Arc::new(client);
    let mut app = App::new(backend, &endpoint);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    if let Err(e) = &result {
        tracing::error!("kubechat exited with error: {:?}", e);
    }
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();
    let tx = events.sender();

    app.widget.start();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event, &tx),
            None => break,
        }
    }

    Ok(())
}
