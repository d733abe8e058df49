use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, MouseButton,
    MouseEventKind,
};
use crossterm::execute;
use tracing::info;

use procwatch::action::{Action, Direction};
use procwatch::app::App;
use procwatch::config::{self, Config, LogFormat, LogLevel, load_config, load_config_from_path};
use procwatch::event::{Event, EventHandler};
use procwatch::logging;
use procwatch::system::collector::SnapshotCollector;
use procwatch::ui;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(
    name = "procwatch",
    version,
    about = "Terminal process monitor with a paged, searchable process table"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Processes shown per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Log verbosity
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Log line format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print one snapshot as JSON and exit instead of starting the UI.
    #[arg(long, default_value_t = false)]
    dump: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(target) = logging::target_for(&config.logging, cli.dump) {
        logging::init(&config.logging, target)?;
    }

    if cli.dump {
        return dump_snapshot();
    }

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture, EnableFocusChange)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(std::io::stdout(), DisableMouseCapture, DisableFocusChange);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config).await;

    execute!(stdout(), DisableMouseCapture, DisableFocusChange)?;
    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: Config) -> Result<()> {
    let refresh_rate = config.general.refresh_rate();
    let mut app = App::new(config);
    let mut events = EventHandler::new(refresh_rate);
    info!(?refresh_rate, "ui started");

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let should_draw = match event {
            Event::Key(key) => {
                let action = app.map_key(key);
                app.dispatch(action);
                true
            }
            Event::Mouse(mouse) => {
                let action = match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        Action::SelectAt(mouse.column, mouse.row)
                    }
                    MouseEventKind::ScrollDown => Action::Navigate(Direction::Down),
                    MouseEventKind::ScrollUp => Action::Navigate(Direction::Up),
                    _ => Action::None,
                };
                let redraw = action != Action::None;
                app.dispatch(action);
                redraw
            }
            Event::Refresh => {
                app.refresh_data();
                true
            }
            Event::Redraw => true,
        };
        if should_draw {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    app.shutdown(SHUTDOWN_GRACE);
    info!("ui stopped");
    Ok(())
}

/// Headless mode: one sampled pass, printed as JSON ordered by pid.
fn dump_snapshot() -> Result<()> {
    let collector = SnapshotCollector::new(Duration::ZERO);
    let snapshot = collector
        .collect_now()
        .wrap_err("failed to collect process snapshot")?;

    let mut processes = snapshot.as_ref().clone();
    processes.sort_by_key(|p| p.pid);
    info!(count = processes.len(), "dumping snapshot");

    let json = serde_json::to_string_pretty(&processes)?;
    println!("{json}");
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(size) = cli.page_size {
        config.general.processes_per_page = size;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if let Some(ref file) = cli.log_file {
        config.logging.file = Some(file.clone());
    }

    config
}
