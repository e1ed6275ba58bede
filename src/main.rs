use clap::Parser;
use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod app;
mod client;
mod config;
mod handler;
mod session;
mod theme;
mod tui;
mod ui;

use app::App;
use config::Config;

#[derive(Parser)]
#[command(name = "petchat")]
#[command(about = "Terminal chat client for the pet-community assistant")]
struct Cli {
    /// Assistant server base URL (overrides the config file)
    #[arg(long)]
    server_url: Option<String>,

    /// Color scheme: light or dark (overrides the config file)
    #[arg(long)]
    theme: Option<String>,

    /// Log directive, e.g. "petchat=debug"
    #[arg(long)]
    log_level: Option<String>,
}

/// Log to a file under the config directory; the terminal is owned by the TUI.
fn init_logging(directive: Option<&str>) -> Result<()> {
    let log_dir = Config::config_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("petchat.log"))?;

    let directive = directive.unwrap_or("petchat=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|_| Config::new());
    let overridden = cli.server_url.is_some() || cli.theme.is_some();
    if let Some(url) = cli.server_url {
        config.server_url = Some(url);
    }
    if let Some(theme) = cli.theme {
        config.theme = Some(theme);
    }
    if overridden {
        // Flags become the new defaults for the next run
        let _ = config.save();
    }

    init_logging(cli.log_level.as_deref())?;
    tracing::info!("petchat v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("assistant endpoint: {}", config.server_url());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(&config, events.sender());

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(
    terminal: &mut tui::Tui,
    events: &mut tui::EventHandler,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event);
        } else {
            break;
        }
    }
    Ok(())
}
