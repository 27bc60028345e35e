//! Summon Entry Point
//!
//! Launches the summoning ritual in the alternate screen.
//!
//! Usage:
//!   summon
//!
//! Configuration comes from `$XDG_CONFIG_HOME/summoner/summon.toml` and
//! `SUMMON_*` / `OLLAMA_*` environment variables. Logs go to `summon.log`
//! in the working directory; set `RUST_LOG` to change the level.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use summoner_core::load_config;
use summoner_tui::App;

/// Pause after the startup beep
const CHIME_PAUSE: Duration = Duration::from_millis(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The terminal belongs to the renderer, so logs go to a file
    let log_file = File::create("summon.log")?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: summon requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or SSH ran without -t.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut app = App::new(&config);
    app.chime();
    tokio::time::sleep(CHIME_PAUSE).await;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let result = run_app(&mut app, &mut stdout).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, Show, LeaveAlternateScreen)?;

    // Propagate any errors
    if let Err(e) = &result {
        tracing::error!(error = %e, "Ritual aborted");
    }
    result
}

async fn run_app(app: &mut App, stdout: &mut io::Stdout) -> anyhow::Result<()> {
    let (width, height) = terminal::size()?;
    app.start(usize::from(width), usize::from(height))?;
    app.run(stdout).await
}
