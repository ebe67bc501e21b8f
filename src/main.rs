mod app;
mod config;
mod generation;
mod options;
mod ui;

use crate::app::App;
use crate::config::Config;
use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "postsmith", about = "AI-assisted social content generation in your terminal")]
struct Args {
    /// Path to the config file (default: <config dir>/postsmith/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// API key override (takes precedence over the config file and env)
    #[arg(long)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = App::new(&config).run(&mut terminal).await;

    // Restore the terminal even when the app loop errored.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
