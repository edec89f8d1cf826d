//! Vista Terminal Demo - Service Card Grid
//!
//! Cards reveal as they scroll into view and tilt toward the mouse.
//! Controls:
//!   - j/k, arrows, mouse wheel: Scroll
//!   - Mouse: Hover a card to tilt and focus it
//!   - Q/ESC: Quit

use clap::Parser;
use std::path::PathBuf;
use vista_terminal::{load_config, TerminalApp};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RON file with reveal and tilt settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of cards in the grid
    #[arg(long, default_value_t = 12)]
    cards: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    log::info!("starting terminal host with {} cards", args.cards);

    let mut app = TerminalApp::new(config, args.cards)?;
    app.run()?;

    Ok(())
}
